use std::process::{ChildStdout, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::foundation::error::{MvError, MvResult};
use crate::process::EngineCommand;
use crate::process::guard::{ChildGuard, StderrTail};
use crate::process::watch::{CancelFlag, RunWatch};
use crate::translate::RenderInvocation;

const STDERR_GRACE: Duration = Duration::from_secs(2);
const EXIT_GRACE: Duration = Duration::from_millis(200);

/// A running rendering engine and the raw frame stream on its stdout.
///
/// Dropping a stream that was never joined kills the renderer.
#[derive(Debug)]
pub struct RenderStream {
    guard: ChildGuard,
    stdout: Option<ChildStdout>,
    stderr: StderrTail,
}

/// Launch the rendering engine for `invocation`.
///
/// The renderer writes raw frames to its stdout until the audio ends. This does not wait for
/// it; hand [`RenderStream::take_stdout`] to the transcoder and join afterwards.
pub fn start_renderer(
    engine: &EngineCommand,
    invocation: &RenderInvocation,
) -> MvResult<RenderStream> {
    let mut cmd = engine.command(invocation.args.iter().cloned());
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
        MvError::process_launch(format!(
            "failed to spawn renderer '{}': {e}",
            engine.display_name()
        ))
    })?;
    let stderr = StderrTail::capture(&mut child);
    let stdout = child.stdout.take();
    let guard = ChildGuard::new("renderer", child);
    let stdout = stdout
        .ok_or_else(|| MvError::process_launch("failed to open renderer stdout (unexpected)"))?;

    tracing::info!(
        pid = guard.id(),
        resolution = %invocation.resolution,
        args = invocation.args.len(),
        "renderer started",
    );
    Ok(RenderStream {
        guard,
        stdout: Some(stdout),
        stderr,
    })
}

impl RenderStream {
    /// OS process id of the renderer.
    pub fn id(&self) -> u32 {
        self.guard.id()
    }

    /// Take the readable end of the frame pipe. Succeeds once.
    pub fn take_stdout(&mut self) -> MvResult<ChildStdout> {
        self.stdout
            .take()
            .ok_or_else(|| MvError::render_stream("renderer stdout was already taken"))
    }

    /// Wait for the renderer to exit and check its status.
    pub fn wait(self) -> MvResult<()> {
        self.join(&RunWatch::new(CancelFlag::new(), None))
    }

    /// Wait for the renderer under `watch`; a non-zero exit is a render stream failure.
    pub(crate) fn join(self, watch: &RunWatch) -> MvResult<()> {
        let Self {
            mut guard,
            stdout,
            stderr,
        } = self;
        drop(stdout);

        let status = watch.wait(&mut guard)?;
        let diagnostics = stderr.collect(STDERR_GRACE);
        if !status.success() {
            return Err(MvError::render_stream(format!(
                "renderer exited with {status}: {diagnostics}"
            )));
        }
        tracing::debug!(%status, "renderer finished");
        Ok(())
    }

    /// Stop the renderer after the transcoder gave up on the stream.
    ///
    /// A renderer that is exiting anyway gets a short grace period to be reaped; one still
    /// running after that is killed.
    pub(crate) fn terminate(self) -> RendererEnd {
        let Self {
            mut guard, stderr, ..
        } = self;

        let deadline = Instant::now() + EXIT_GRACE;
        let mut status = None;
        loop {
            match guard.try_wait() {
                Ok(Some(s)) => {
                    status = Some(s);
                    break;
                }
                Ok(None) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(error = %e, "failed to poll renderer");
                    break;
                }
            }
        }
        let killed = status.is_none();
        if killed {
            status = guard.kill();
        }

        RendererEnd {
            status,
            killed,
            diagnostics: stderr.collect(STDERR_GRACE),
        }
    }
}

/// How the renderer ended once the transcoder had stopped reading.
#[derive(Debug)]
pub(crate) struct RendererEnd {
    status: Option<ExitStatus>,
    killed: bool,
    diagnostics: String,
}

impl RendererEnd {
    /// The render stream failure this ending amounts to, if the renderer failed on its own.
    ///
    /// Dying of `SIGPIPE` after the transcoder closed the pipe does not count.
    pub(crate) fn failure(&self) -> Option<MvError> {
        let status = self.status.filter(|_| !self.killed)?;
        if status.success() || broken_pipe(status) {
            return None;
        }
        Some(MvError::render_stream(format!(
            "renderer exited with {status}: {}",
            self.diagnostics
        )))
    }
}

impl std::fmt::Display for RendererEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.status, self.killed) {
            (Some(status), true) => write!(f, "killed ({status})")?,
            (Some(status), false) => write!(f, "{status}")?,
            (None, _) => f.write_str("unknown status")?,
        }
        if !self.diagnostics.is_empty() {
            write!(f, ": {}", self.diagnostics)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn broken_pipe(status: ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt as _;
    status.signal() == Some(nix::sys::signal::Signal::SIGPIPE as i32)
}

#[cfg(not(unix))]
fn broken_pipe(_status: ExitStatus) -> bool {
    false
}

#[cfg(test)]
#[path = "../../tests/unit/process/render.rs"]
mod tests;
