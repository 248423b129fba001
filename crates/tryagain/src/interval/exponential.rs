//! Exponential backoff with full jitter.

use super::{
    DEFAULT_BACKOFF_BASE, DEFAULT_BACKOFF_MAX, IntervalCalculator, new_rng, random_between,
    secs_to_duration,
};
use rand::rngs::StdRng;
use std::time::Duration;

/// Exponential backoff strategy with a randomized lower half.
///
/// The upper bound doubles on every call, and the actual wait is drawn
/// uniformly from the upper half of `[0, bound]`, capped at `max`.
///
/// # Mathematical Formula
///
/// For call `n` (1-indexed, counted by the calculator itself):
/// ```text
/// temp  = base * 2^n
/// wait  = min(max, random(temp / 2, temp))
/// ```
///
/// # Examples
///
/// ```rust
/// use tryagain::interval::{ExponentialBackoff, IntervalCalculator};
/// use std::time::Duration;
///
/// let mut backoff = ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(1));
///
/// let first = backoff.calc(); // 100ms..200ms
/// let second = backoff.calc(); // 200ms..400ms
/// assert!(first <= Duration::from_millis(200));
/// assert!(second >= Duration::from_millis(200));
///
/// for _ in 0..10 {
///     assert!(backoff.calc() <= Duration::from_secs(1));
/// }
/// ```
///
/// # Performance Characteristics
///
/// - **Memory**: O(1), the PRNG is owned by the calculator
/// - **CPU**: O(1) per call, one power of two and one random draw
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base: Duration,
    max: Duration,
    attempt: u32,
    rng: StdRng,
}

impl ExponentialBackoff {
    /// Create an exponential backoff seeded from OS entropy.
    pub fn new(base: Duration, max: Duration) -> Self {
        Self::with_seed(base, max, None)
    }

    /// Create an exponential backoff; `Some(seed)` makes the sequence
    /// reproducible.
    pub fn with_seed(base: Duration, max: Duration, seed: Option<u64>) -> Self {
        Self {
            base,
            max,
            attempt: 0,
            rng: new_rng(seed),
        }
    }

    /// The base interval the growth starts from.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// The cap on every wait.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// How many waits this calculator has produced.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

impl Default for ExponentialBackoff {
    /// Base one second, max sixty-four seconds.
    fn default() -> Self {
        Self::new(DEFAULT_BACKOFF_BASE, DEFAULT_BACKOFF_MAX)
    }
}

impl IntervalCalculator for ExponentialBackoff {
    fn calc(&mut self) -> Duration {
        self.attempt = self.attempt.saturating_add(1);
        if self.base.is_zero() {
            return Duration::ZERO;
        }

        let temp = self.base.as_secs_f64() * 2f64.powf(f64::from(self.attempt));
        let low = temp / 2.0;

        // Once the lower half alone reaches the cap, the draw is irrelevant.
        if !low.is_finite() || low >= self.max.as_secs_f64() {
            return self.max;
        }

        secs_to_duration(random_between(&mut self.rng, low, temp)).min(self.max)
    }
}
