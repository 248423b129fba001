//! Cancellation and deadline signal observed by the retry driver.

use std::fmt;
use std::time::Duration;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

/// Why a retry loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The signal's cancellation token was cancelled.
    Cancelled,
    /// The signal's deadline passed.
    DeadlineExceeded,
    /// The configured `max_attempts` bound was reached.
    AttemptsExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline exceeded",
            Self::AttemptsExhausted => "attempts exhausted",
        };
        f.write_str(text)
    }
}

/// A cancellation token paired with an optional deadline.
///
/// Clones share the same token, so cancelling any clone stops every retry
/// loop observing it. The deadline is evaluated against tokio's clock, which
/// means paused-time tests see it fire deterministically.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tryagain::{ConstantOptions, Retry, StopSignal};
///
/// # #[tokio::main]
/// # async fn main() {
/// let signal = StopSignal::timeout(Duration::from_secs(5));
/// let mut retry = Retry::constant(ConstantOptions {
///     signal: Some(signal.clone()),
///     ..Default::default()
/// });
///
/// assert!(retry.next().await);
/// signal.cancel();
/// assert!(!retry.next().await);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl StopSignal {
    /// A signal that only fires when cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing cancellation token.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// A signal that fires `timeout` from now.
    pub fn timeout(timeout: Duration) -> Self {
        Self::new().until(deadline_after(timeout))
    }

    /// A signal that fires at `deadline`.
    pub fn deadline(deadline: Instant) -> Self {
        Self::new().until(deadline)
    }

    /// Add a deadline. When one is already set, the earlier one wins.
    pub fn until(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// A signal cancelled together with this one, but whose own
    /// cancellation does not propagate back.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// The underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The deadline, if any.
    pub fn deadline_at(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel the signal and every clone and child of it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the signal has already fired.
    pub fn is_stopped(&self) -> bool {
        self.stop_reason().is_some()
    }

    /// The reason the signal fired, or `None` while it is still live.
    ///
    /// Cancellation takes precedence over an elapsed deadline.
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.token.is_cancelled() {
            return Some(StopReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(StopReason::DeadlineExceeded),
            _ => None,
        }
    }

    /// Wait until the signal fires.
    ///
    /// Never resolves for a signal with no deadline that is never cancelled.
    pub async fn stopped(&self) -> StopReason {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => StopReason::Cancelled,
                _ = time::sleep_until(deadline) => StopReason::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                StopReason::Cancelled
            }
        }
    }
}

impl From<CancellationToken> for StopSignal {
    fn from(token: CancellationToken) -> Self {
        Self::from_token(token)
    }
}

// Instant + Duration panics on overflow; clamp to roughly thirty years.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .unwrap_or_else(|| now + Duration::from_secs(86_400 * 365 * 30))
}
