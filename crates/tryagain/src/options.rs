//! Per-strategy configuration.
//!
//! Every field is optional. Unset intervals resolve to the documented
//! defaults when the driver is built; the stop signal and the attempt bound
//! are resolved lazily by the first call to [`Retry::next`].

use crate::interval::{
    Constant, DEFAULT_BACKOFF_BASE, DEFAULT_BACKOFF_MAX, DEFAULT_INTERVAL, DEFAULT_JITTER_BASE,
    DEFAULT_JITTER_MAX, ExponentialBackoff, IntervalCalculator, Jitter,
};
use crate::retry::Retry;
use crate::signal::StopSignal;
use crate::timeout::TimeoutProvider;
use std::sync::Arc;
use std::time::Duration;

/// Options that turn into a ready-to-use [`Retry`] driver.
///
/// Implemented by the three option structs; this is what [`crate::new`]
/// accepts.
pub trait Strategy {
    /// The interval calculator the driver ends up owning.
    type Calculator: IntervalCalculator;

    /// Resolve defaults and build the driver.
    fn into_retry(self) -> Retry<Self::Calculator>;
}

/// Options for a fixed-interval retry loop.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tryagain::{ConstantOptions, Retry};
///
/// let retry = Retry::constant(ConstantOptions {
///     interval: Some(Duration::from_millis(100)),
///     max_attempts: 10,
///     ..Default::default()
/// });
/// assert_eq!(retry.max_attempts(), 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstantOptions {
    /// Stops the loop when cancelled or past its deadline.
    pub signal: Option<StopSignal>,

    /// Wait between attempts (default: 1s).
    pub interval: Option<Duration>,

    /// Maximum number of attempts; `0` leaves the loop to the deadline.
    pub max_attempts: u32,

    /// Timeout for the lazily created signal (default: 1 minute).
    pub timeout: Option<Arc<dyn TimeoutProvider>>,
}

impl Strategy for ConstantOptions {
    type Calculator = Constant;

    fn into_retry(self) -> Retry<Constant> {
        let calculator = Constant::new(self.interval.unwrap_or(DEFAULT_INTERVAL));
        Retry::with_calculator(calculator).configure(self.signal, self.max_attempts, self.timeout)
    }
}

/// Options for a decorrelated-jitter retry loop.
///
/// See [`Jitter`] for the interval formula.
#[derive(Debug, Clone, Default)]
pub struct JitterOptions {
    /// Stops the loop when cancelled or past its deadline.
    pub signal: Option<StopSignal>,

    /// Smallest wait (default: 1s).
    pub base: Option<Duration>,

    /// Largest wait (default: 15s).
    pub max: Option<Duration>,

    /// Maximum number of attempts; `0` leaves the loop to the deadline.
    pub max_attempts: u32,

    /// Timeout for the lazily created signal (default: 1 minute).
    pub timeout: Option<Arc<dyn TimeoutProvider>>,

    /// Seed for a reproducible interval sequence.
    pub seed: Option<u64>,
}

impl Strategy for JitterOptions {
    type Calculator = Jitter;

    fn into_retry(self) -> Retry<Jitter> {
        let calculator = Jitter::with_seed(
            self.base.unwrap_or(DEFAULT_JITTER_BASE),
            self.max.unwrap_or(DEFAULT_JITTER_MAX),
            self.seed,
        );
        Retry::with_calculator(calculator).configure(self.signal, self.max_attempts, self.timeout)
    }
}

/// Options for an exponential-backoff retry loop.
///
/// See [`ExponentialBackoff`] for the interval formula.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tryagain::{ExponentialBackoffOptions, Retry};
///
/// let retry = Retry::exponential_backoff(ExponentialBackoffOptions {
///     base_interval: Some(Duration::from_millis(100)),
///     max_interval: Some(Duration::from_secs(10)),
///     max_attempts: 10,
///     ..Default::default()
/// });
/// assert_eq!(retry.calculator().max(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExponentialBackoffOptions {
    /// Stops the loop when cancelled or past its deadline.
    pub signal: Option<StopSignal>,

    /// Controls the rate of growth: the n-th wait is drawn from
    /// `[base * 2^(n-1), base * 2^n)` (default: 1s).
    pub base_interval: Option<Duration>,

    /// Largest wait (default: 64s).
    pub max_interval: Option<Duration>,

    /// Maximum number of attempts; `0` leaves the loop to the deadline.
    pub max_attempts: u32,

    /// Timeout for the lazily created signal (default: 1 minute).
    pub timeout: Option<Arc<dyn TimeoutProvider>>,

    /// Seed for a reproducible interval sequence.
    pub seed: Option<u64>,
}

impl Strategy for ExponentialBackoffOptions {
    type Calculator = ExponentialBackoff;

    fn into_retry(self) -> Retry<ExponentialBackoff> {
        let calculator = ExponentialBackoff::with_seed(
            self.base_interval.unwrap_or(DEFAULT_BACKOFF_BASE),
            self.max_interval.unwrap_or(DEFAULT_BACKOFF_MAX),
            self.seed,
        );
        Retry::with_calculator(calculator).configure(self.signal, self.max_attempts, self.timeout)
    }
}

impl<C: IntervalCalculator> Retry<C> {
    fn configure(
        mut self,
        signal: Option<StopSignal>,
        max_attempts: u32,
        timeout: Option<Arc<dyn TimeoutProvider>>,
    ) -> Self {
        if let Some(signal) = signal {
            self = self.with_signal(signal);
        }
        if let Some(timeout) = timeout {
            self = self.with_timeout_provider(timeout);
        }
        self.with_max_attempts(max_attempts)
    }
}
