//! Serializable retry settings, for embedding in application config files.

use crate::options::{ConstantOptions, ExponentialBackoffOptions, JitterOptions, Strategy};
use crate::retry::Retry;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A retry strategy described with plain values.
///
/// Durations are whole milliseconds; absent fields take the strategy's
/// defaults. The stop signal is runtime state and cannot be expressed here;
/// use [`Retry::with_signal`] on the built driver.
///
/// # Examples
///
/// ```rust
/// use tryagain::RetrySettings;
///
/// let settings = RetrySettings::ExponentialBackoff {
///     base_interval_ms: Some(100),
///     max_interval_ms: Some(10_000),
///     max_attempts: 5,
/// };
/// let retry = settings.into_retry();
/// assert_eq!(retry.max_attempts(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RetrySettings {
    /// See [`ConstantOptions`].
    Constant {
        /// Wait between attempts.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        interval_ms: Option<u64>,
        /// Attempt bound; `0` is unbounded.
        #[serde(default)]
        max_attempts: u32,
    },
    /// See [`JitterOptions`].
    Jitter {
        /// Smallest wait.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_ms: Option<u64>,
        /// Largest wait.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_ms: Option<u64>,
        /// Attempt bound; `0` is unbounded.
        #[serde(default)]
        max_attempts: u32,
    },
    /// See [`ExponentialBackoffOptions`].
    ExponentialBackoff {
        /// Base interval of the exponential growth.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_interval_ms: Option<u64>,
        /// Largest wait.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_interval_ms: Option<u64>,
        /// Attempt bound; `0` is unbounded.
        #[serde(default)]
        max_attempts: u32,
    },
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self::ExponentialBackoff {
            base_interval_ms: None,
            max_interval_ms: None,
            max_attempts: 0,
        }
    }
}

impl RetrySettings {
    /// Build a driver for whichever strategy the settings name.
    pub fn into_retry(self) -> Retry {
        match self {
            Self::Constant {
                interval_ms,
                max_attempts,
            } => ConstantOptions {
                interval: interval_ms.map(Duration::from_millis),
                max_attempts,
                ..Default::default()
            }
            .into_retry()
            .boxed(),
            Self::Jitter {
                base_ms,
                max_ms,
                max_attempts,
            } => JitterOptions {
                base: base_ms.map(Duration::from_millis),
                max: max_ms.map(Duration::from_millis),
                max_attempts,
                ..Default::default()
            }
            .into_retry()
            .boxed(),
            Self::ExponentialBackoff {
                base_interval_ms,
                max_interval_ms,
                max_attempts,
            } => ExponentialBackoffOptions {
                base_interval: base_interval_ms.map(Duration::from_millis),
                max_interval: max_interval_ms.map(Duration::from_millis),
                max_attempts,
                ..Default::default()
            }
            .into_retry()
            .boxed(),
        }
    }
}
