use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;

use crate::EventName;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),

    #[error("Shutting down, cannot publish the event.")]
    ShuttingDown,

    #[error("Task submission rejected: {0}")]
    SubmissionRejected(#[from] Rejection),

    #[error("Handler for event '{event}' failed: {reason}")]
    Handler { event: EventName, reason: Arc<str> },

    #[error("No Tokio runtime available to spawn workers: {0}")]
    RuntimeUnavailable(#[from] tokio::runtime::TryCurrentError),
}

/// Reasons an input is refused before anything is queued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("event name can not be empty")]
    EmptyEventName,

    #[error("payload can not be empty")]
    EmptyPayload,

    #[error("malformed payload: {0}")]
    MalformedPayload(Arc<str>),

    #[error("invalid configuration: {0}")]
    InvalidConfig(Arc<str>),
}

/// Why the worker pool refused a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("the worker queue has reached its capacity")]
    QueueFull,

    #[error("the worker pool is not running")]
    PoolStopped,
}

impl Error {
    pub(crate) fn handler<R: ToString>(event: &EventName, reason: R) -> Self {
        Error::Handler {
            event: event.clone(),
            reason: Arc::from(reason.to_string()),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    pub fn is_shutting_down(&self) -> bool {
        matches!(self, Error::ShuttingDown)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Error::SubmissionRejected(_))
    }
}

impl<J> From<TrySendError<J>> for Error {
    fn from(e: TrySendError<J>) -> Self {
        match e {
            TrySendError::Full(_) => Error::SubmissionRejected(Rejection::QueueFull),
            TrySendError::Closed(_) => Error::SubmissionRejected(Rejection::PoolStopped),
        }
    }
}
