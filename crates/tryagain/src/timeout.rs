//! Default timeout used when a retry loop has neither a signal nor an
//! attempt bound.

use std::fmt::Debug;
use std::time::Duration;

/// Timeout applied to a lazily created stop signal when no `max_attempts`
/// bound is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Supplies the timeout for lazily created stop signals.
///
/// A retry driver that was given neither an explicit [`StopSignal`] nor a
/// `max_attempts` bound asks its provider once, on the first call to
/// [`Retry::next`], so the loop cannot run forever.
///
/// Providers are injected per driver through the option structs, so tests
/// can shrink the timeout without touching process-wide state.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tryagain::{ConstantOptions, FixedTimeout, Retry};
///
/// let retry = Retry::constant(ConstantOptions {
///     timeout: Some(Arc::new(FixedTimeout(Duration::from_millis(10)))),
///     ..Default::default()
/// });
/// assert_eq!(retry.attempts(), 0);
/// ```
///
/// [`StopSignal`]: crate::StopSignal
/// [`Retry::next`]: crate::Retry::next
pub trait TimeoutProvider: Send + Sync + Debug {
    /// The timeout to apply, measured from the first call to `next`.
    fn default_timeout(&self) -> Duration;
}

/// A provider that always returns the same timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimeout(pub Duration);

impl Default for FixedTimeout {
    fn default() -> Self {
        Self(DEFAULT_TIMEOUT)
    }
}

impl TimeoutProvider for FixedTimeout {
    fn default_timeout(&self) -> Duration {
        self.0
    }
}

impl TimeoutProvider for Duration {
    fn default_timeout(&self) -> Duration {
        *self
    }
}
