use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::error::{MvError, MvResult};
use crate::process::EngineCommand;

/// Converter settings shared by every run.
///
/// Every field has a default, so a JSON config only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Rendering engine; the translated arguments follow its prefix arguments.
    pub renderer: EngineCommand,
    /// Transcoding engine (an `ffmpeg`-compatible command line).
    pub transcoder: EngineCommand,
    /// Extra transcoder output options, e.g. codec and quality settings.
    pub ffmpeg_options: Vec<String>,
    /// Artwork used for tracks without an image.
    pub default_artwork: PathBuf,
    /// Image drawn by the banner effect.
    pub banner_image: PathBuf,
    /// Directory for staged files; the system temp dir when unset.
    pub staging_dir: Option<PathBuf>,
    /// Wall-clock limit for one conversion.
    pub timeout_secs: Option<u64>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            renderer: EngineCommand::new("node_modules/.bin/electron")
                .arg("genmv")
                .arg("--"),
            transcoder: EngineCommand::new("ffmpeg"),
            ffmpeg_options: Vec::new(),
            default_artwork: PathBuf::from("assets/default_artwork.png"),
            banner_image: PathBuf::from("assets/banner.png"),
            staging_dir: None,
            timeout_secs: None,
        }
    }
}

impl ConverterConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> MvResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| MvError::validation(format!("parse converter config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MvResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MvError::validation(format!("open converter config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> MvResult<()> {
        if self.renderer.program.as_os_str().is_empty() {
            return Err(MvError::validation("renderer program must not be empty"));
        }
        if self.transcoder.program.as_os_str().is_empty() {
            return Err(MvError::validation("transcoder program must not be empty"));
        }
        if self.timeout_secs == Some(0) {
            return Err(MvError::validation("timeout_secs must be non-zero when set"));
        }
        Ok(())
    }

    /// Configured run timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
