//! Configuration primitives for the MMA8491 driver.

/// Number of status reads attempted before giving up on fresh data.
pub const DEFAULT_POLL_ATTEMPTS: u16 = 150;
/// Backoff between status reads, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 20;

/// User-facing configuration for the MMA8491 acquisition sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Maximum number of `STATUS` reads per acquisition.
    pub poll_attempts: u16,
    /// Delay after each `STATUS` read that did not report fresh data.
    pub poll_interval_ms: u32,
    /// Settle time after asserting the enable line, before the first `STATUS` read.
    pub power_on_delay_us: u32,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is usable.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.poll_attempts == 0 {
            return Err(ConfigError::ZeroPollAttempts);
        }

        Ok(())
    }

    /// Worst-case time spent polling for one acquisition, in milliseconds.
    pub fn max_poll_time_ms(&self) -> u32 {
        u32::from(self.poll_attempts).saturating_mul(self.poll_interval_ms)
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the status poll retry budget.
    pub fn poll_attempts(mut self, attempts: u16) -> Self {
        self.config.poll_attempts = attempts;
        self
    }

    /// Overrides the backoff between status reads.
    pub fn poll_interval_ms(mut self, interval_ms: u32) -> Self {
        self.config.poll_interval_ms = interval_ms;
        self
    }

    /// Sets the settle time applied after powering the device on.
    pub fn power_on_delay_us(mut self, delay_us: u32) -> Self {
        self.config.power_on_delay_us = delay_us;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            power_on_delay_us: 0,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The poll budget must allow at least one `STATUS` read.
    ZeroPollAttempts,
}
