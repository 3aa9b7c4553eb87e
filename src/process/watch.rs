use std::process::ExitStatus;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context as _;

use crate::foundation::error::{MvError, MvResult};
use crate::process::guard::ChildGuard;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Shared flag requesting that a running conversion stop.
///
/// Clones share the same flag, so one clone can be handed to another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`CancelFlag::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Cancellation flag and deadline governing one run.
#[derive(Clone, Debug)]
pub(crate) struct RunWatch {
    cancel: CancelFlag,
    limit: Option<(Instant, Duration)>,
}

impl RunWatch {
    pub(crate) fn new(cancel: CancelFlag, timeout: Option<Duration>) -> Self {
        Self {
            cancel,
            limit: timeout.map(|t| (Instant::now() + t, t)),
        }
    }

    /// Return the error the run must stop with, if any.
    pub(crate) fn check(&self) -> MvResult<()> {
        if self.cancel.is_cancelled() {
            return Err(MvError::Cancelled);
        }
        if let Some((deadline, timeout)) = self.limit
            && Instant::now() >= deadline
        {
            return Err(MvError::TimedOut(timeout));
        }
        Ok(())
    }

    /// Block until `child` exits, or until the run is cancelled or times out.
    ///
    /// On cancellation or timeout the child is left running; the caller's guard terminates it.
    pub(crate) fn wait(&self, child: &mut ChildGuard) -> MvResult<ExitStatus> {
        let role = child.role();
        loop {
            if let Some(status) = child
                .try_wait()
                .with_context(|| format!("wait for {role}"))?
            {
                return Ok(status);
            }
            self.check()?;
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/process/watch.rs"]
mod tests;
