//! Decorrelated jitter.

use super::{
    DEFAULT_JITTER_BASE, DEFAULT_JITTER_MAX, IntervalCalculator, new_rng, random_between,
    secs_to_duration,
};
use rand::rngs::StdRng;
use std::time::Duration;

/// Decorrelated jitter: each wait is drawn relative to the previous one.
///
/// # Mathematical Formula
///
/// ```text
/// current  = base                          (before the first call)
/// next     = min(max, random(base, current * 3))
/// current  = next
/// ```
///
/// Because the upper bound follows the previous wait rather than the attempt
/// count, independent callers drift apart instead of retrying in lockstep.
/// Every returned wait lies in `[base, max]` as long as `base <= max`.
///
/// # Examples
///
/// ```rust
/// use tryagain::interval::{IntervalCalculator, Jitter};
/// use std::time::Duration;
///
/// let mut jitter = Jitter::new(Duration::from_millis(10), Duration::from_secs(1));
/// for _ in 0..20 {
///     let wait = jitter.calc();
///     assert!(wait >= Duration::from_millis(10) && wait <= Duration::from_secs(1));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Jitter {
    base: Duration,
    max: Duration,
    current: Duration,
    rng: StdRng,
}

impl Jitter {
    /// Create a jitter calculator seeded from OS entropy.
    pub fn new(base: Duration, max: Duration) -> Self {
        Self::with_seed(base, max, None)
    }

    /// Create a jitter calculator; `Some(seed)` makes the sequence
    /// reproducible.
    pub fn with_seed(base: Duration, max: Duration, seed: Option<u64>) -> Self {
        Self {
            base,
            max,
            current: base,
            rng: new_rng(seed),
        }
    }

    /// The lower bound of every wait.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// The upper bound of every wait.
    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for Jitter {
    /// Base one second, max fifteen seconds.
    fn default() -> Self {
        Self::new(DEFAULT_JITTER_BASE, DEFAULT_JITTER_MAX)
    }
}

impl IntervalCalculator for Jitter {
    fn calc(&mut self) -> Duration {
        let upper = self.current.as_secs_f64() * 3.0;
        let candidate = random_between(&mut self.rng, self.base.as_secs_f64(), upper);
        let next = secs_to_duration(candidate).max(self.base).min(self.max);
        self.current = next;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_jitter_is_not_monotonic() {
        let mut jitter = Jitter::new(Duration::from_millis(1), Duration::from_secs(3600));

        let waits: Vec<Duration> = (0..100).map(|_| jitter.calc()).collect();

        let decreased = waits.windows(2).any(|w| w[1] < w[0]);
        assert!(decreased, "expected at least one decrease, got {waits:?}");
    }

    #[test]
    fn test_max_caps_every_wait() {
        let mut jitter = Jitter::new(Duration::from_millis(1), Duration::from_millis(1));
        for _ in 0..10 {
            assert_eq!(jitter.calc(), Duration::from_millis(1));
        }
    }

    #[test]
    fn test_zero_base_stays_at_zero() {
        let mut jitter = Jitter::new(Duration::ZERO, Duration::from_secs(1));
        assert_eq!(jitter.calc(), Duration::ZERO);
        assert_eq!(jitter.calc(), Duration::ZERO);
    }

    #[test]
    fn test_odd_nanosecond_base_is_a_hard_floor() {
        let base = Duration::new(1, 7);
        let mut jitter = Jitter::with_seed(base, Duration::from_secs(2), Some(7));

        for _ in 0..1_000 {
            let wait = jitter.calc();
            assert!(wait >= base, "{wait:?} < {base:?}");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let base = Duration::from_millis(5);
        let max = Duration::from_secs(10);
        let mut a = Jitter::with_seed(base, max, Some(42));
        let mut b = Jitter::with_seed(base, max, Some(42));

        for _ in 0..16 {
            assert_eq!(a.calc(), b.calc());
        }
    }

    #[test]
    fn test_defaults() {
        let jitter = Jitter::default();
        assert_eq!(jitter.base(), Duration::from_secs(1));
        assert_eq!(jitter.max(), Duration::from_secs(15));
    }

    proptest! {
        #[test]
        fn prop_waits_within_base_and_max(
            base_ms in 1u64..1_000,
            extra_ms in 0u64..60_000,
            seed in any::<u64>(),
        ) {
            let base = Duration::from_millis(base_ms);
            let max = base + Duration::from_millis(extra_ms);
            let mut jitter = Jitter::with_seed(base, max, Some(seed));

            for _ in 0..32 {
                let wait = jitter.calc();
                prop_assert!(wait >= base, "{:?} < {:?}", wait, base);
                prop_assert!(wait <= max, "{:?} > {:?}", wait, max);
            }
        }
    }
}
