//! The retry driver: a boolean gate for `while` loops.

use crate::interval::{Constant, ExponentialBackoff, IntervalCalculator, Jitter};
use crate::options::{ConstantOptions, ExponentialBackoffOptions, JitterOptions, Strategy};
use crate::signal::{StopReason, StopSignal};
use crate::timeout::{FixedTimeout, TimeoutProvider};
use std::sync::Arc;
use tokio::time;
use tokio_util::sync::DropGuard;
use tracing::{debug, trace};

/// Decides, one call at a time, whether a retry loop should run again.
///
/// The driver owns an [`IntervalCalculator`] and waits for the interval it
/// computes between attempts. The loop stops when `max_attempts` is reached
/// or the [`StopSignal`] fires, whichever comes first.
///
/// # Lifecycle
///
/// - The first call to [`next`](Self::next) returns `true` immediately, so
///   the body always runs at least once.
/// - If no signal was supplied, one is created on that first call. Without
///   a `max_attempts` bound it carries the provider's default timeout (one
///   minute unless overridden); with a bound it has no deadline, so an
///   explicit attempt count is never cut short by an implicit timeout.
/// - Once `next` returns `false` the driver stays stopped.
///
/// A signal the driver created itself is cancelled when the driver stops or
/// is dropped. A caller-supplied signal is never cancelled by the driver.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tryagain::{ConstantOptions, Retry};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut retry = Retry::constant(ConstantOptions {
///     interval: Some(Duration::from_millis(1)),
///     max_attempts: 3,
///     ..Default::default()
/// });
///
/// let mut runs = 0;
/// while retry.next().await {
///     runs += 1;
/// }
/// assert_eq!(runs, 3);
/// # }
/// ```
#[derive(Debug)]
pub struct Retry<C = Box<dyn IntervalCalculator>> {
    signal: Option<StopSignal>,
    owned_signal: Option<DropGuard>,
    timeout: Arc<dyn TimeoutProvider>,
    max_attempts: u32,
    attempts: u32,
    calculator: C,
    stopped: Option<StopReason>,
}

impl Retry<Constant> {
    /// Fixed-interval retry loop.
    pub fn constant(options: ConstantOptions) -> Self {
        options.into_retry()
    }
}

impl Retry<Jitter> {
    /// Decorrelated-jitter retry loop.
    pub fn jitter(options: JitterOptions) -> Self {
        options.into_retry()
    }
}

impl Retry<ExponentialBackoff> {
    /// Exponential-backoff retry loop.
    pub fn exponential_backoff(options: ExponentialBackoffOptions) -> Self {
        options.into_retry()
    }
}

impl<C: IntervalCalculator> Retry<C> {
    /// Build a driver from any strategy's options.
    pub fn new<S>(options: S) -> Self
    where
        S: Strategy<Calculator = C>,
    {
        options.into_retry()
    }

    /// Drive a custom calculator with no signal and no attempt bound.
    pub fn with_calculator(calculator: C) -> Self {
        Self {
            signal: None,
            owned_signal: None,
            timeout: Arc::new(FixedTimeout::default()),
            max_attempts: 0,
            attempts: 0,
            calculator,
            stopped: None,
        }
    }

    /// Observe `signal` instead of creating one lazily.
    pub fn with_signal(mut self, signal: StopSignal) -> Self {
        self.signal = Some(signal);
        self.owned_signal = None;
        self
    }

    /// Stop after `max_attempts` attempts; `0` means unbounded.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Replace the provider of the lazily created signal's timeout.
    pub fn with_timeout_provider(mut self, provider: Arc<dyn TimeoutProvider>) -> Self {
        self.timeout = provider;
        self
    }

    /// Wait for the next attempt and report whether it should run.
    ///
    /// Returns `false` when the attempt bound is reached or the signal
    /// fires, either before or during the wait. Every call counts as one
    /// attempt, whatever it returns.
    ///
    /// Calls must not overlap; `&mut self` enforces that.
    pub async fn next(&mut self) -> bool {
        let proceed = self.decide().await;
        self.attempts = self.attempts.saturating_add(1);
        proceed
    }

    async fn decide(&mut self) -> bool {
        if self.stopped.is_some() {
            return false;
        }

        let signal = self.resolve_signal();

        if self.attempts == 0 {
            return true;
        }
        if self.max_attempts > 0 && self.attempts >= self.max_attempts {
            return self.stop(StopReason::AttemptsExhausted);
        }
        if let Some(reason) = signal.stop_reason() {
            return self.stop(reason);
        }

        let wait = self.calculator.calc();
        trace!(attempt = self.attempts, ?wait, "waiting before next attempt");
        if wait.is_zero() {
            // Still pass through the scheduler so other tasks can fire the signal.
            return tokio::select! {
                biased;
                reason = signal.stopped() => self.stop(reason),
                _ = tokio::task::yield_now() => true,
            };
        }

        tokio::select! {
            biased;
            reason = signal.stopped() => self.stop(reason),
            _ = time::sleep(wait) => true,
        }
    }

    fn resolve_signal(&mut self) -> StopSignal {
        if let Some(signal) = &self.signal {
            return signal.clone();
        }

        let signal = if self.max_attempts > 0 {
            debug!(max_attempts = self.max_attempts, "retry loop bounded by attempts only");
            StopSignal::new()
        } else {
            let timeout = self.timeout.default_timeout();
            debug!(?timeout, "retry loop bounded by default timeout");
            StopSignal::timeout(timeout)
        };

        self.owned_signal = Some(signal.token().clone().drop_guard());
        self.signal = Some(signal.clone());
        signal
    }

    fn stop(&mut self, reason: StopReason) -> bool {
        debug!(attempts = self.attempts, %reason, "retry loop stopped");
        self.stopped = Some(reason);
        self.owned_signal.take();
        false
    }

    /// How many times [`next`](Self::next) has been called.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The attempt bound; `0` means unbounded.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Why the loop stopped, or `None` while it may still continue.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stopped
    }

    /// The signal in effect: the caller's, the lazily created one, or `None`
    /// before the first call.
    pub fn signal(&self) -> Option<&StopSignal> {
        self.signal.as_ref()
    }

    /// The interval calculator.
    pub fn calculator(&self) -> &C {
        &self.calculator
    }
}

impl<C: IntervalCalculator + 'static> Retry<C> {
    /// Erase the calculator type, e.g. to pick a strategy at runtime.
    pub fn boxed(self) -> Retry {
        Retry {
            signal: self.signal,
            owned_signal: self.owned_signal,
            timeout: self.timeout,
            max_attempts: self.max_attempts,
            attempts: self.attempts,
            calculator: Box::new(self.calculator),
            stopped: self.stopped,
        }
    }
}

/// Constant interval of one second, bounded by the one-minute default
/// timeout.
pub fn default_constant() -> Retry<Constant> {
    Retry::constant(ConstantOptions::default())
}

/// Exponential backoff from one second up to sixty-four, bounded by the
/// one-minute default timeout.
pub fn default_exponential_backoff() -> Retry<ExponentialBackoff> {
    Retry::exponential_backoff(ExponentialBackoffOptions::default())
}
