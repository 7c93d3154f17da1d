//! Configuration for the poller
//!
//! The only knob the poll loop has is its interval; everything that bounds
//! how long a poll may take lives on the per-call
//! [`OperationSignal`](crate::OperationSignal).

use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for a [`Poller`](crate::Poller)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Delay between the end of one check and the start of the next.
    /// The first check always runs immediately.
    /// Default: 1 second
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

impl PollerConfig {
    /// Create a new PollerConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for conditions expected to flip quickly (local files, sockets)
    pub fn fast() -> Self {
        Self {
            interval: Duration::from_millis(100),
        }
    }

    /// Preset for slow remote state where frequent checks only add load
    pub fn relaxed() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::InvalidInterval(self.interval));
        }

        Ok(())
    }
}
