use std::ffi::OsString;
use std::path::Path;
use std::process::{Child, ChildStdout, ExitStatus, Stdio};
use std::time::Duration;

use crate::foundation::core::{RAW_FRAME_RATE, RAW_PIXEL_FORMAT, Resolution};
use crate::foundation::error::{MvError, MvResult};
use crate::process::EngineCommand;
use crate::process::guard::{ChildGuard, StderrTail};
use crate::process::watch::{CancelFlag, RunWatch};

const STDERR_GRACE: Duration = Duration::from_secs(2);

/// Everything the transcoder needs besides the frame stream.
#[derive(Clone, Copy, Debug)]
pub struct TranscodeRequest<'a> {
    /// Original audio file, muxed as-is.
    pub audio: &'a Path,
    /// Size of the raw frames on the pipe.
    pub resolution: Resolution,
    /// File the muxed video is written to (overwritten).
    pub output: &'a Path,
    /// Value of the `title` metadata tag.
    pub title: &'a str,
    /// Value of the `artist` metadata tag.
    pub artist: &'a str,
    /// Additional output options placed right before the output path.
    pub extra_options: &'a [String],
}

/// How the transcoder ended.
#[derive(Debug)]
pub struct TranscodeExit {
    /// Raw exit status.
    pub status: ExitStatus,
    /// Tail of the transcoder's stderr.
    pub stderr: String,
}

impl TranscodeExit {
    /// `true` for a zero exit status.
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Transcoder arguments for `req`: audio first, then the raw frame pipe.
pub fn transcode_args(req: &TranscodeRequest<'_>) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(24 + req.extra_options.len());
    args.extend(["-y", "-i"].map(OsString::from));
    args.push(req.audio.into());
    args.extend(
        [
            "-f",
            "rawvideo",
            "-framerate",
            &RAW_FRAME_RATE.to_string(),
            "-pixel_format",
            RAW_PIXEL_FORMAT,
            "-video_size",
            &req.resolution.to_string(),
            "-i",
            "pipe:",
            "-vf",
            "format=yuv420p,vflip",
            "-metadata",
            &format!("title={}", req.title),
            "-metadata",
            &format!("artist={}", req.artist),
        ]
        .map(OsString::from),
    );
    args.extend(req.extra_options.iter().map(OsString::from));
    args.push(req.output.into());
    args
}

/// Run the transcoder on `frames` and block until it exits.
pub fn transcode(
    engine: &EngineCommand,
    req: &TranscodeRequest<'_>,
    frames: ChildStdout,
) -> MvResult<TranscodeExit> {
    transcode_watched(engine, req, frames, &RunWatch::new(CancelFlag::new(), None))
}

/// [`transcode`] under a cancellation/deadline watch.
///
/// When the watch fires the transcoder is killed before the error is returned.
pub(crate) fn transcode_watched(
    engine: &EngineCommand,
    req: &TranscodeRequest<'_>,
    frames: ChildStdout,
    watch: &RunWatch,
) -> MvResult<TranscodeExit> {
    let mut child = spawn_transcoder(engine, req, frames)?;
    let stderr = StderrTail::capture(&mut child);
    let mut guard = ChildGuard::new("transcoder", child);
    tracing::info!(pid = guard.id(), output = %req.output.display(), "transcoder started");

    let status = watch.wait(&mut guard)?;
    let stderr = stderr.collect(STDERR_GRACE);
    tracing::info!(%status, "transcoder exited");
    Ok(TranscodeExit { status, stderr })
}

fn spawn_transcoder(
    engine: &EngineCommand,
    req: &TranscodeRequest<'_>,
    frames: ChildStdout,
) -> MvResult<Child> {
    // `cmd` owns the parent's copy of the pipe; it must not outlive the spawn, or the renderer
    // never sees a broken pipe when the transcoder dies.
    let mut cmd = engine.command(transcode_args(req));
    cmd.stdin(Stdio::from(frames))
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd.spawn().map_err(|e| {
        MvError::process_launch(format!(
            "failed to spawn transcoder '{}': {e}",
            engine.display_name()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/process/transcode.rs"]
mod tests;
