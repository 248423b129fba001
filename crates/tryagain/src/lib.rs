#![deny(unsafe_code)]
#![warn(missing_docs)]

//! A retry loop gate for async Rust.
//!
//! `tryagain` answers one question, over and over: *should I try again?*
//! The caller keeps full control of the operation; the [`Retry`] driver only
//! decides whether another attempt should run and waits between attempts.
//!
//! - **Three interval strategies** via the [`IntervalCalculator`] trait
//!   - Constant interval
//!   - Decorrelated jitter
//!   - Exponential backoff with full jitter
//! - **Three ways to stop**: an attempt bound, a deadline, or cancellation
//!   through a [`StopSignal`]
//! - **No runaway loops**: a loop with neither a signal nor an attempt bound
//!   gets a one-minute timeout, supplied by an injectable [`TimeoutProvider`]
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use tryagain::{ExponentialBackoffOptions, Retry};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut retry = Retry::exponential_backoff(ExponentialBackoffOptions {
//!     base_interval: Some(Duration::from_millis(1)),
//!     max_interval: Some(Duration::from_millis(10)),
//!     max_attempts: 4,
//!     ..Default::default()
//! });
//!
//! let mut attempts = 0;
//! while retry.next().await {
//!     attempts += 1;
//!     // call the flaky operation here and `break` on success
//! }
//! assert_eq!(attempts, 4);
//! # }
//! ```
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use tryagain::prelude::*;
//!
//! let retry = Retry::constant(ConstantOptions::default());
//! assert_eq!(retry.calculator().interval(), std::time::Duration::from_secs(1));
//! ```

mod error;
mod execute;
pub mod interval;
mod options;
mod retry;
mod settings;
mod signal;
mod timeout;

pub use error::{Result, RetryError};
pub use interval::IntervalCalculator;
pub use options::{ConstantOptions, ExponentialBackoffOptions, JitterOptions, Strategy};
pub use retry::{Retry, default_constant, default_exponential_backoff};
pub use settings::RetrySettings;
pub use signal::{StopReason, StopSignal};
pub use timeout::{DEFAULT_TIMEOUT, FixedTimeout, TimeoutProvider};

/// Build a retry driver from any strategy's options.
///
/// ```rust
/// use std::time::Duration;
/// use tryagain::JitterOptions;
///
/// let retry = tryagain::new(JitterOptions {
///     base: Some(Duration::from_millis(10)),
///     max_attempts: 3,
///     ..Default::default()
/// });
/// assert_eq!(retry.calculator().base(), Duration::from_millis(10));
/// ```
pub fn new<S: Strategy>(options: S) -> Retry<S::Calculator> {
    options.into_retry()
}

/// Convenient re-exports of commonly used items.
///
/// Import all core types with:
///
/// ```rust
/// use tryagain::prelude::*;
/// ```
pub mod prelude {
    pub use crate::interval::{Constant, ExponentialBackoff, IntervalCalculator, Jitter};
    pub use crate::{
        ConstantOptions, ExponentialBackoffOptions, JitterOptions, Retry, StopReason, StopSignal,
        Strategy,
    };
}
