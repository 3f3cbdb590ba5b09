//! Retry outcomes.

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed cause carried through a retry loop.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// OperationError is what an operation callback returns instead of a value.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Try again later. The optional cause is surfaced if retries run out.
    #[error("operation not done{}", describe(.cause))]
    NotDone { cause: Option<BoxError> },

    /// Stop immediately.
    #[error("operation failed: {cause}")]
    Failed {
        #[source]
        cause: BoxError,
    },
}

impl OperationError {
    pub fn not_done() -> Self {
        OperationError::NotDone { cause: None }
    }

    pub fn not_done_with(cause: impl Into<BoxError>) -> Self {
        OperationError::NotDone {
            cause: Some(cause.into()),
        }
    }

    pub fn failed(cause: impl Into<BoxError>) -> Self {
        OperationError::Failed {
            cause: cause.into(),
        }
    }

    pub fn is_not_done(&self) -> bool {
        matches!(self, OperationError::NotDone { .. })
    }
}

/// RetryError is the final outcome of a retry loop that did not succeed.
#[derive(Debug, Error)]
pub enum RetryError {
    /// The caller cancelled during a wait. The operation is not done; this
    /// is neither success nor a hard failure.
    #[error("retry cancelled before the operation completed")]
    Cancelled,

    /// The backoff policy stopped. Wraps the last retryable cause, if any.
    #[error("operation not done{}", describe(.cause))]
    Exhausted { cause: Option<BoxError> },

    #[error("operation failed: {cause}")]
    Failed {
        #[source]
        cause: BoxError,
    },
}

impl RetryError {
    /// Returns true when the operation did not complete but did not fail
    /// either.
    pub fn is_not_done(&self) -> bool {
        matches!(self, RetryError::Cancelled | RetryError::Exhausted { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled)
    }

    /// The underlying cause, if one was recorded.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            RetryError::Cancelled => None,
            RetryError::Exhausted { cause } => cause.as_deref(),
            RetryError::Failed { cause } => Some(cause.as_ref()),
        }
    }
}

fn describe(cause: &Option<BoxError>) -> String {
    match cause {
        Some(c) => format!(": {}", c),
        None => String::new(),
    }
}
