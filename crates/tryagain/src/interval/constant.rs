//! Fixed interval.

use super::{DEFAULT_INTERVAL, IntervalCalculator};
use std::time::Duration;

/// Waits the same interval before every retry.
///
/// # Examples
///
/// ```rust
/// use tryagain::interval::{Constant, IntervalCalculator};
/// use std::time::Duration;
///
/// let mut constant = Constant::new(Duration::from_millis(250));
/// assert_eq!(constant.calc(), Duration::from_millis(250));
/// assert_eq!(constant.calc(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant {
    interval: Duration,
}

impl Constant {
    /// Create a constant calculator.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for Constant {
    /// One second between attempts.
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl IntervalCalculator for Constant {
    fn calc(&mut self) -> Duration {
        self.interval
    }
}
