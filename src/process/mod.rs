//! Supervision of the two external engines.

/// Kill-on-drop child handles and stderr capture.
pub mod guard;
/// Rendering engine launch.
pub mod render;
/// Transcoding engine launch and wait.
pub mod transcode;
/// Cancellation and deadlines for blocking waits.
pub mod watch;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

/// Program plus fixed leading arguments used to launch an engine.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EngineCommand {
    /// Executable to run. Resolved through `PATH` when it has no directory component.
    pub program: PathBuf,
    /// Arguments placed before the pipeline's own arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

impl EngineCommand {
    /// Engine invoked as `program` with no prefix arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a prefix argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Command for one run. On unix the engine leads a new process group, so
    /// [`guard::ChildGuard::kill`] reaches whatever the engine spawned too.
    pub(crate) fn command<I>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).args(args);
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut cmd, 0);
        cmd
    }

    pub(crate) fn display_name(&self) -> String {
        self.program.display().to_string()
    }
}
