/*!
 * Connection Backoff
 * Explicit, per-client backoff parameters for dialing the plugin
 */

use crate::errors::ConfigError;
use crate::limits::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Exponential backoff between connection attempts
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub base_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay: BASE_BACKOFF_DELAY,
            max_delay: MAX_BACKOFF_DELAY,
            multiplier: BACKOFF_MULTIPLIER,
            jitter: BACKOFF_JITTER,
        }
    }
}

impl BackoffConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_delay > self.max_delay {
            return Err(ConfigError::InvalidBackoff(format!(
                "base_delay {:?} exceeds max_delay {:?}",
                self.base_delay, self.max_delay
            )));
        }
        if !(self.multiplier >= 1.0) {
            return Err(ConfigError::InvalidBackoff(format!(
                "multiplier {} is below 1.0",
                self.multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(ConfigError::InvalidBackoff(format!(
                "jitter {} is outside [0, 1]",
                self.jitter
            )));
        }
        Ok(())
    }

    /// Delay after `retries` failed attempts, before jitter
    pub fn nominal_delay(&self, retries: u32) -> Duration {
        if retries == 0 {
            return self.base_delay;
        }
        let max = self.max_delay.as_secs_f64();
        let mut delay = self.base_delay.as_secs_f64();
        let mut remaining = retries;
        while delay < max && remaining > 0 {
            delay *= self.multiplier;
            remaining -= 1;
        }
        // max_delay near Duration::MAX does not survive the f64 round trip
        Duration::try_from_secs_f64(delay.min(max)).unwrap_or(self.max_delay)
    }

    /// Delay after `retries` failed attempts with jitter applied.
    ///
    /// The first delay is the base delay exactly.
    pub fn delay(&self, retries: u32) -> Duration {
        let nominal = self.nominal_delay(retries);
        if retries == 0 || self.jitter == 0.0 {
            return nominal;
        }
        let factor = 1.0 + self.jitter * rand::thread_rng().gen_range(-1.0..=1.0);
        Duration::try_from_secs_f64((nominal.as_secs_f64() * factor).max(0.0))
            .unwrap_or(self.max_delay)
    }
}

/// Dial-time connection parameters
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectParams {
    pub backoff: BackoffConfig,
    /// Floor on the time a single attempt may take.
    /// Also the connect timeout for reconnects the channel makes after construction.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub min_connect_timeout: Duration,
}

impl Default for ConnectParams {
    fn default() -> Self {
        Self {
            backoff: BackoffConfig::default(),
            min_connect_timeout: MIN_CONNECT_TIMEOUT,
        }
    }
}

impl ConnectParams {
    /// Deadline for one attempt starting now, given the current backoff delay
    pub fn attempt_timeout(&self, backoff: Duration) -> Duration {
        backoff.max(self.min_connect_timeout)
    }
}
