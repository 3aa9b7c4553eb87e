use std::sync::Arc;

use crate::foundation::core::Resolution;
use crate::foundation::error::{MvError, MvResult};
use crate::pipeline::config::ConverterConfig;
use crate::process::render::start_renderer;
use crate::process::transcode::{TranscodeRequest, transcode_watched};
use crate::process::watch::{CancelFlag, RunWatch};
use crate::staging::{AssetSource, ConvertedVideo, StagedInputs};
use crate::track::model::Track;
use crate::translate::{RenderInvocation, TranslateInputs, translate};

/// Turns tracks into muxed music videos.
///
/// A converter holds no per-run state; concurrent [`MusicVideoConverter::convert`] calls are
/// independent of each other.
#[derive(Clone)]
pub struct MusicVideoConverter {
    config: ConverterConfig,
    source: Arc<dyn AssetSource>,
}

impl std::fmt::Debug for MusicVideoConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicVideoConverter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MusicVideoConverter {
    /// Create a converter fetching assets from `source`.
    pub fn new(config: ConverterConfig, source: Arc<dyn AssetSource>) -> MvResult<Self> {
        config.validate()?;
        Ok(Self { config, source })
    }

    /// Borrow the settings.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert `track` at `resolution` (`"WxH"`).
    pub fn convert(&self, track: &Track, resolution: &str) -> MvResult<ConvertedVideo> {
        let resolution: Resolution = resolution.parse()?;
        self.convert_with_cancel(track, resolution, &CancelFlag::new())
    }

    /// Convert `track`, stopping early once `cancel` is set.
    ///
    /// Whatever the outcome, both engines have exited and every staged file except a successful
    /// output is gone by the time this returns.
    #[tracing::instrument(
        skip_all,
        fields(title = %track.title, music = %track.music, resolution = %resolution)
    )]
    pub fn convert_with_cancel(
        &self,
        track: &Track,
        resolution: Resolution,
        cancel: &CancelFlag,
    ) -> MvResult<ConvertedVideo> {
        let watch = RunWatch::new(cancel.clone(), self.config.timeout());
        watch.check()?;

        let staged = StagedInputs::stage(
            self.source.as_ref(),
            track,
            self.config.staging_dir.as_deref(),
        )?;

        match self.run(track, resolution, &staged, &watch) {
            Ok(()) => {
                let video = staged.into_output()?;
                tracing::info!(output = %video.path().display(), "conversion finished");
                Ok(video)
            }
            Err(e) => {
                tracing::warn!(error = %e, "conversion failed");
                staged.release();
                Err(e)
            }
        }
    }

    /// Renderer invocation for `track` with the given staged files.
    pub fn invocation(
        &self,
        track: &Track,
        resolution: Resolution,
        staged: &StagedInputs,
    ) -> RenderInvocation {
        let inputs = TranslateInputs {
            music: staged.audio(),
            image: staged.image(),
            default_artwork: &self.config.default_artwork,
            banner_image: &self.config.banner_image,
        };
        translate(track, resolution, &inputs)
    }

    fn run(
        &self,
        track: &Track,
        resolution: Resolution,
        staged: &StagedInputs,
        watch: &RunWatch,
    ) -> MvResult<()> {
        let invocation = self.invocation(track, resolution, staged);
        tracing::debug!(args = ?invocation.args_lossy(), "translated renderer arguments");

        watch.check()?;
        let mut renderer = start_renderer(&self.config.renderer, &invocation)?;
        let frames = renderer.take_stdout()?;

        let request = TranscodeRequest {
            audio: staged.audio(),
            resolution,
            output: staged.output(),
            title: &track.title,
            artist: &track.artist,
            extra_options: &self.config.ffmpeg_options,
        };
        // An early return drops `renderer`, which kills it.
        let exit = transcode_watched(&self.config.transcoder, &request, frames, watch)?;

        if !exit.success() {
            let end = renderer.terminate();
            if let Some(err) = end.failure() {
                tracing::debug!(transcoder = %exit.status, "transcoder failed after the renderer");
                return Err(err);
            }
            tracing::debug!(renderer = %end, "renderer state after transcoder failure");
            return Err(MvError::transcode(exit.status.to_string(), exit.stderr));
        }

        renderer.join(watch)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/convert.rs"]
mod tests;
