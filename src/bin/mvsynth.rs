use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mvsynth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a track into an MP4 (requires the renderer and `ffmpeg`).
    Convert(ConvertArgs),
    /// Print the renderer arguments a track translates to, one per line.
    Args(ArgsArgs),
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Track record JSON.
    #[arg(long)]
    track: PathBuf,

    /// Output resolution, e.g. `1280x720`.
    #[arg(long)]
    resolution: String,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Converter config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory asset keys resolve against; defaults to the track file's directory.
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Abort the conversion after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Parser, Debug)]
struct ArgsArgs {
    /// Track record JSON.
    #[arg(long)]
    track: PathBuf,

    /// Output resolution, e.g. `1280x720`.
    #[arg(long)]
    resolution: String,

    /// Converter config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory asset keys resolve against; defaults to the track file's directory.
    #[arg(long)]
    assets_root: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Args(args) => cmd_args(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<mvsynth::ConverterConfig> {
    match path {
        Some(path) => Ok(mvsynth::ConverterConfig::from_path(path)?),
        None => Ok(mvsynth::ConverterConfig::default()),
    }
}

fn load_track(path: &Path) -> anyhow::Result<mvsynth::Track> {
    let record = mvsynth::TrackRecord::from_path(path)?;
    let track = record
        .into_track()
        .with_context(|| format!("track record '{}'", path.display()))?;
    Ok(track)
}

fn assets_root(explicit: Option<PathBuf>, track_path: &Path) -> PathBuf {
    explicit.unwrap_or_else(|| {
        track_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    })
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.timeout.is_some() {
        config.timeout_secs = args.timeout;
    }
    let track = load_track(&args.track)?;
    let source = mvsynth::LocalAssetSource::new(assets_root(args.assets_root, &args.track));

    let converter = mvsynth::MusicVideoConverter::new(config, Arc::new(source))?;
    let video = converter.convert(&track, &args.resolution)?;
    let out = video.persist(&args.out)?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_args(args: ArgsArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let track = load_track(&args.track)?;
    let resolution: mvsynth::Resolution = args.resolution.parse()?;
    let source = mvsynth::LocalAssetSource::new(assets_root(args.assets_root, &args.track));

    let music = source.resolve(&track.music);
    let image = track.image.as_ref().map(|img| source.resolve(img));
    let inputs = mvsynth::TranslateInputs {
        music: &music,
        image: image.as_deref(),
        default_artwork: &config.default_artwork,
        banner_image: &config.banner_image,
    };

    let invocation = mvsynth::translate(&track, resolution, &inputs);
    for arg in config.renderer.args.iter() {
        println!("{arg}");
    }
    for arg in invocation.args_lossy() {
        println!("{arg}");
    }
    Ok(())
}
