use std::time::Duration;

/// Convenience result type used across the conversion pipeline.
pub type MvResult<T> = Result<T, MvError>;

/// Top-level error taxonomy returned by [`crate::MusicVideoConverter::convert`].
#[derive(thiserror::Error, Debug)]
pub enum MvError {
    /// Malformed caller input (resolution, track record, configuration).
    #[error("validation error: {0}")]
    Validation(String),

    /// A source asset could not be materialized to a local file.
    #[error("input unavailable: {0}")]
    InputUnavailable(String),

    /// One of the external engines could not be started.
    #[error("process launch failure: {0}")]
    ProcessLaunch(String),

    /// The rendering engine terminated abnormally while streaming frames.
    #[error("render stream failure: {0}")]
    RenderStream(String),

    /// The transcoding engine exited unsuccessfully.
    #[error("transcode failure: transcoder exited with {status}: {detail}")]
    Transcode {
        /// Raw process status description, as reported by the OS.
        status: String,
        /// Trimmed diagnostic output captured from the transcoder.
        detail: String,
    },

    /// The run was cancelled through its [`crate::CancelFlag`].
    #[error("conversion cancelled")]
    Cancelled,

    /// The run exceeded its configured wall-clock limit.
    #[error("conversion timed out after {0:?}")]
    TimedOut(Duration),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Field-less classification of an [`MvError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`MvError::Validation`].
    Validation,
    /// See [`MvError::InputUnavailable`].
    InputUnavailable,
    /// See [`MvError::ProcessLaunch`].
    ProcessLaunch,
    /// See [`MvError::RenderStream`].
    RenderStream,
    /// See [`MvError::Transcode`].
    Transcode,
    /// See [`MvError::Cancelled`].
    Cancelled,
    /// See [`MvError::TimedOut`].
    TimedOut,
    /// See [`MvError::Other`].
    Other,
}

impl MvError {
    /// Build a [`MvError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MvError::InputUnavailable`] value.
    pub fn input_unavailable(msg: impl Into<String>) -> Self {
        Self::InputUnavailable(msg.into())
    }

    /// Build a [`MvError::ProcessLaunch`] value.
    pub fn process_launch(msg: impl Into<String>) -> Self {
        Self::ProcessLaunch(msg.into())
    }

    /// Build a [`MvError::RenderStream`] value.
    pub fn render_stream(msg: impl Into<String>) -> Self {
        Self::RenderStream(msg.into())
    }

    /// Build a [`MvError::Transcode`] value.
    pub fn transcode(status: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Transcode {
            status: status.into(),
            detail: detail.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::InputUnavailable(_) => ErrorKind::InputUnavailable,
            Self::ProcessLaunch(_) => ErrorKind::ProcessLaunch,
            Self::RenderStream(_) => ErrorKind::RenderStream,
            Self::Transcode { .. } => ErrorKind::Transcode,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::TimedOut(_) => ErrorKind::TimedOut,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
