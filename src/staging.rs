//! Staging of pipeline-local files.
//!
//! Every staged file is a [`TempPath`]: it is deleted when dropped, so an early return or a panic
//! anywhere in a run releases it. Only a successful run turns the output file into a kept file.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tempfile::{Builder, TempPath};

use crate::foundation::error::{MvError, MvResult};
use crate::track::model::{AssetRef, Track};

/// "Fetch to local file" capability of the asset storage collaborator.
pub trait AssetSource: Send + Sync {
    /// Materialize `asset` at `dest`, overwriting whatever is there.
    fn fetch_to(&self, asset: &AssetRef, dest: &Path) -> anyhow::Result<()>;
}

/// [`AssetSource`] backed by a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct LocalAssetSource {
    root: PathBuf,
}

impl LocalAssetSource {
    /// Resolve asset keys relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path an asset key resolves to.
    pub fn resolve(&self, asset: &AssetRef) -> PathBuf {
        self.root.join(asset.as_str())
    }
}

impl AssetSource for LocalAssetSource {
    fn fetch_to(&self, asset: &AssetRef, dest: &Path) -> anyhow::Result<()> {
        let src = self.resolve(asset);
        std::fs::copy(&src, dest)
            .with_context(|| format!("copy '{}' to '{}'", src.display(), dest.display()))?;
        Ok(())
    }
}

/// Local files owned by one pipeline run.
#[derive(Debug)]
pub struct StagedInputs {
    audio: TempPath,
    image: Option<TempPath>,
    output: TempPath,
}

impl StagedInputs {
    /// Materialize the track's audio (and image, when present) and reserve the output file.
    ///
    /// On error, whatever was already staged is released before returning.
    pub fn stage(source: &dyn AssetSource, track: &Track, dir: Option<&Path>) -> MvResult<Self> {
        let audio = stage_asset(source, &track.music, "music", dir)?;
        let image = track
            .image
            .as_ref()
            .map(|asset| stage_asset(source, asset, "image", dir))
            .transpose()?;
        let output = reserve_output(dir)?;

        tracing::debug!(
            audio = %audio.display(),
            image = ?image.as_deref().map(Path::display),
            output = %output.display(),
            "staged inputs",
        );
        Ok(Self {
            audio,
            image,
            output,
        })
    }

    /// Staged audio file.
    pub fn audio(&self) -> &Path {
        &self.audio
    }

    /// Staged image file, if the track has one.
    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    /// Output video file the transcoder writes to.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Delete every staged file, including the output.
    ///
    /// Dropping has the same effect; this variant reports deletion failures.
    pub fn release(self) {
        let Self {
            audio,
            image,
            output,
        } = self;
        for path in [Some(output), image, Some(audio)].into_iter().flatten() {
            let shown = path.to_path_buf();
            if let Err(e) = path.close() {
                tracing::warn!(path = %shown.display(), error = %e, "failed to delete staged file");
            }
        }
    }

    /// Keep the output file and release the inputs.
    ///
    /// Keeping is the last fallible step: if it fails, the output is deleted with the inputs.
    pub fn into_output(self) -> MvResult<ConvertedVideo> {
        let Self { output, .. } = self;
        let path = output
            .keep()
            .map_err(|e| anyhow::Error::new(e.error).context("keep converted video"))?;
        Ok(ConvertedVideo { path })
    }
}

/// A finished video file. The caller owns it; it is not deleted on drop.
#[derive(Debug)]
pub struct ConvertedVideo {
    path: PathBuf,
}

impl ConvertedVideo {

    /// Current location of the video.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the video to `dest`, creating parent directories as needed.
    pub fn persist(self, dest: impl AsRef<Path>) -> MvResult<PathBuf> {
        let dest = dest.as_ref();
        ensure_parent_dir(dest)?;
        let Self { path } = self;
        if std::fs::rename(&path, dest).is_err() {
            // Likely a cross-device move.
            std::fs::copy(&path, dest).with_context(|| {
                format!("copy '{}' to '{}'", path.display(), dest.display())
            })?;
            std::fs::remove_file(&path)
                .with_context(|| format!("remove '{}'", path.display()))?;
        }
        Ok(dest.to_path_buf())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> MvResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn temp_builder<'a>(prefix: &'a str, suffix: &'a str) -> Builder<'a, 'a> {
    let mut b = Builder::new();
    b.prefix(prefix).suffix(suffix);
    b
}

fn create_temp(builder: &Builder<'_, '_>, dir: Option<&Path>) -> std::io::Result<TempPath> {
    let file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    Ok(file.into_temp_path())
}

fn stage_asset(
    source: &dyn AssetSource,
    asset: &AssetRef,
    label: &str,
    dir: Option<&Path>,
) -> MvResult<TempPath> {
    let path = create_temp(&temp_builder("mvsynth-", ""), dir)
        .context("create staging file")?;
    source.fetch_to(asset, &path).map_err(|e| {
        MvError::input_unavailable(format!("{label} asset '{asset}': {e:#}"))
    })?;
    Ok(path)
}

fn reserve_output(dir: Option<&Path>) -> MvResult<TempPath> {
    let path = create_temp(&temp_builder("music-", ".mp4"), dir)
        .context("create output video file")?;
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/staging.rs"]
mod tests;
