//! Interval calculators decide how long to wait before the next attempt.
//!
//! # Key Types
//!
//! - [`IntervalCalculator`] - Core trait shared by every strategy
//! - [`Constant`] - Same interval every time
//! - [`Jitter`] - Decorrelated jitter, relative to the previous wait
//! - [`ExponentialBackoff`] - Exponential growth with full jitter
//!
//! # Examples
//!
//! ```rust
//! use tryagain::interval::{ExponentialBackoff, IntervalCalculator};
//! use std::time::Duration;
//!
//! let mut backoff = ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(5));
//! let first = backoff.calc();
//! assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(200));
//! ```

mod constant;
mod exponential;
mod jitter;

pub use constant::Constant;
pub use exponential::ExponentialBackoff;
pub use jitter::Jitter;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Default interval for [`Constant`].
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Default base interval for [`Jitter`].
pub const DEFAULT_JITTER_BASE: Duration = Duration::from_secs(1);

/// Default maximum interval for [`Jitter`].
pub const DEFAULT_JITTER_MAX: Duration = Duration::from_secs(15);

/// Default base interval for [`ExponentialBackoff`].
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Default maximum interval for [`ExponentialBackoff`].
pub const DEFAULT_BACKOFF_MAX: Duration = Duration::from_secs(64);

/// Computes the wait before the next attempt.
///
/// A calculator may keep state between calls (the previous interval, its own
/// attempt counter) but must never block. It is owned and driven by a single
/// [`Retry`](crate::Retry), which calls [`calc`](Self::calc) once per wait;
/// the first attempt of a loop never consults the calculator.
///
/// # Examples
///
/// A custom linear strategy:
///
/// ```rust
/// use tryagain::interval::IntervalCalculator;
/// use std::time::Duration;
///
/// struct Linear {
///     step: Duration,
///     waits: u32,
/// }
///
/// impl IntervalCalculator for Linear {
///     fn calc(&mut self) -> Duration {
///         self.waits += 1;
///         self.step * self.waits
///     }
/// }
///
/// let mut linear = Linear { step: Duration::from_millis(10), waits: 0 };
/// assert_eq!(linear.calc(), Duration::from_millis(10));
/// assert_eq!(linear.calc(), Duration::from_millis(20));
/// ```
pub trait IntervalCalculator: Send {
    /// Calculate the next wait.
    ///
    /// A zero duration means "retry immediately".
    fn calc(&mut self) -> Duration;
}

impl<C: IntervalCalculator + ?Sized> IntervalCalculator for Box<C> {
    fn calc(&mut self) -> Duration {
        (**self).calc()
    }
}

pub(crate) fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform sample from `[low, high)`, or `low` when the range is empty.
pub(crate) fn random_between<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    if low.is_finite() && high.is_finite() && low < high {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Seconds back to a `Duration`: NaN and negatives become zero, overflow
/// saturates.
pub(crate) fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
