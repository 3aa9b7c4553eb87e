use std::io::{self, Read};
use std::process::{Child, ExitStatus};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Bytes of stderr retained per engine; older output is discarded.
pub(crate) const STDERR_TAIL_BYTES: usize = 8 * 1024;

/// Child process that is killed and reaped unless it has already been waited on.
#[derive(Debug)]
pub(crate) struct ChildGuard {
    role: &'static str,
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    pub(crate) fn new(role: &'static str, child: Child) -> Self {
        Self {
            role,
            child,
            reaped: false,
        }
    }

    pub(crate) fn role(&self) -> &'static str {
        self.role
    }

    pub(crate) fn id(&self) -> u32 {
        self.child.id()
    }

    pub(crate) fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        let status = self.child.try_wait()?;
        if status.is_some() {
            self.reaped = true;
        }
        Ok(status)
    }

    pub(crate) fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }

    /// Kill the child and its process group if it is still running, then reap it.
    ///
    /// Returns the exit status when it could be collected.
    pub(crate) fn kill(&mut self) -> Option<ExitStatus> {
        if self.reaped {
            return None;
        }
        if let Err(e) = self.kill_group() {
            tracing::debug!(role = self.role, pid = self.child.id(), error = %e, "kill failed");
        }
        match self.wait() {
            Ok(status) => Some(status),
            Err(e) => {
                tracing::warn!(role = self.role, pid = self.child.id(), error = %e, "failed to reap child");
                None
            }
        }
    }

    #[cfg(unix)]
    fn kill_group(&mut self) -> io::Result<()> {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        let pgid = i32::try_from(self.child.id()).map_err(io::Error::other)?;
        match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
            Ok(()) => Ok(()),
            // Not a group leader (spawned without a process group).
            Err(_) => self.child.kill(),
        }
    }

    #[cfg(not(unix))]
    fn kill_group(&mut self) -> io::Result<()> {
        self.child.kill()
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            tracing::warn!(role = self.role, pid = self.child.id(), "terminating abandoned child");
            self.kill();
        }
    }
}

/// Background reader keeping the last [`STDERR_TAIL_BYTES`] of a child's stderr.
///
/// Draining keeps a chatty child from blocking on a full stderr pipe.
#[derive(Debug)]
pub(crate) struct StderrTail {
    buf: Arc<Mutex<Vec<u8>>>,
    handle: Option<JoinHandle<()>>,
}

impl StderrTail {
    pub(crate) fn capture(child: &mut Child) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let handle = child.stderr.take().map(|stderr| {
            let buf = Arc::clone(&buf);
            std::thread::spawn(move || drain_into(stderr, &buf))
        });
        Self { buf, handle }
    }

    /// Collect what was captured, waiting up to `grace` for the stream to close.
    ///
    /// The stream can outlive the child when it leaked into grandchildren.
    pub(crate) fn collect(mut self, grace: Duration) -> String {
        if let Some(handle) = self.handle.take() {
            let deadline = Instant::now() + grace;
            while !handle.is_finished() && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(10));
            }
            if handle.is_finished() && handle.join().is_err() {
                tracing::warn!("stderr drain thread panicked");
            }
        }
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).trim().to_string()
    }
}

fn drain_into<R: Read>(mut r: R, buf: &Mutex<Vec<u8>>) {
    let mut chunk = [0u8; 4096];
    loop {
        match r.read(&mut chunk) {
            Ok(0) => return,
            Ok(n) => {
                let mut buf = buf.lock().unwrap_or_else(PoisonError::into_inner);
                push_tail(&mut buf, &chunk[..n], STDERR_TAIL_BYTES);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return,
        }
    }
}

fn push_tail(buf: &mut Vec<u8>, chunk: &[u8], limit: usize) {
    buf.extend_from_slice(chunk);
    if buf.len() > limit {
        let excess = buf.len() - limit;
        buf.drain(..excess);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/process/guard.rs"]
mod tests;
