//! Polling configuration.

use crate::error::{HeaterError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Intervals beyond this cannot be measured on a wrapping 32-bit millisecond clock.
pub const MAX_INTERVAL: Duration = Duration::from_millis((u32::MAX / 2) as u64);

/// Cadence settings for the poll scheduler and its driving loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// How often the fast group is re-read
    pub fast_interval: Duration,
    /// How often the slow group is re-read
    pub slow_interval: Duration,
    /// Wait after startup before the first read
    pub startup_delay: Duration,
    /// How often the main loop ticks the scheduler and drains the engine
    pub tick: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            fast_interval: Duration::from_secs(5 * 60),
            slow_interval: Duration::from_secs(60 * 60),
            startup_delay: Duration::from_secs(10),
            tick: Duration::from_millis(crate::DEFAULT_TICK_MS),
        }
    }
}

impl PollConfig {
    /// Set the fast group interval.
    pub fn with_fast_interval(mut self, interval: Duration) -> Self {
        self.fast_interval = interval;
        self
    }

    /// Set the slow group interval.
    pub fn with_slow_interval(mut self, interval: Duration) -> Self {
        self.slow_interval = interval;
        self
    }

    /// Set the delay before the first read.
    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Set the main loop tick.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Check that every interval is usable with the scheduler's clock.
    pub fn validate(&self) -> Result<()> {
        for (label, interval) in [
            ("fast interval", self.fast_interval),
            ("slow interval", self.slow_interval),
        ] {
            if interval.is_zero() {
                return Err(HeaterError::config_error(format!("{} must be positive", label)));
            }
            if interval > MAX_INTERVAL {
                return Err(HeaterError::config_error(format!(
                    "{} of {:?} exceeds the maximum of {:?}",
                    label, interval, MAX_INTERVAL
                )));
            }
        }
        if self.tick.is_zero() {
            return Err(HeaterError::config_error("tick must be positive"));
        }
        Ok(())
    }
}
