//! Error returned by the execute helpers.

use crate::signal::StopReason;
use thiserror::Error;

/// Result type for operations driven by [`Retry::execute`](crate::Retry::execute).
pub type Result<T, E> = std::result::Result<T, RetryError<E>>;

/// Why an executed operation did not produce a value.
///
/// The plain [`Retry::next`](crate::Retry::next) gate never fails; this type
/// only exists for the helpers that also run the operation.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The retry predicate rejected the error, so the loop gave up early.
    #[error("non-retryable error after {attempts} attempt(s)")]
    NonRetryable {
        /// Operation runs, including the failing one.
        attempts: u32,
        /// The rejected error.
        #[source]
        source: E,
    },

    /// The driver stopped while the operation was still failing.
    #[error("retry loop stopped after {attempts} attempt(s): {reason}")]
    Stopped {
        /// Operation runs.
        attempts: u32,
        /// Why the driver stopped.
        reason: StopReason,
        /// The error from the last run.
        #[source]
        source: E,
    },

    /// The driver had already stopped, so the operation never ran.
    #[error("retry loop already stopped: {0}")]
    AlreadyStopped(StopReason),
}

impl<E> RetryError<E> {
    /// Operation runs before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::NonRetryable { attempts, .. } | Self::Stopped { attempts, .. } => *attempts,
            Self::AlreadyStopped(_) => 0,
        }
    }

    /// The driver's stop reason, if the driver stopped.
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::NonRetryable { .. } => None,
            Self::Stopped { reason, .. } | Self::AlreadyStopped(reason) => Some(*reason),
        }
    }

    /// The last error the operation returned, if it ran.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::NonRetryable { source, .. } | Self::Stopped { source, .. } => Some(source),
            Self::AlreadyStopped(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_stopped_display_and_source() {
        let err: RetryError<io::Error> = RetryError::Stopped {
            attempts: 3,
            reason: StopReason::DeadlineExceeded,
            source: io::Error::other("connection reset"),
        };

        assert_eq!(
            err.to_string(),
            "retry loop stopped after 3 attempt(s): deadline exceeded"
        );
        assert_eq!(err.source().unwrap().to_string(), "connection reset");
        assert_eq!(err.attempts(), 3);
        assert_eq!(err.stop_reason(), Some(StopReason::DeadlineExceeded));
    }

    #[test]
    fn test_already_stopped_has_no_inner_error() {
        let err: RetryError<io::Error> = RetryError::AlreadyStopped(StopReason::Cancelled);

        assert_eq!(err.to_string(), "retry loop already stopped: cancelled");
        assert!(err.source().is_none());
        assert_eq!(err.attempts(), 0);
        assert!(err.into_inner().is_none());
    }

    #[test]
    fn test_non_retryable_keeps_error() {
        let err = RetryError::NonRetryable {
            attempts: 1,
            source: io::Error::new(io::ErrorKind::PermissionDenied, "auth failed"),
        };

        assert_eq!(err.stop_reason(), None);
        assert_eq!(err.into_inner().unwrap().kind(), io::ErrorKind::PermissionDenied);
    }
}
