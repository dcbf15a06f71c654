//! Falling blocks configuration.
//!
//! Loaded from a JSON5 file. A commented default file is written on first start.

use std::{fs, io, path::Path};

use serde::Deserialize;

use crate::scanner::MAX_SCAN_RADIUS;

const DEFAULT_CONFIG: &str = include_str!("../../package-content/fallingblocks_config.json5");

/// Longest interval or warning accepted, in seconds (one day).
pub const MAX_DURATION_SECONDS: u64 = 86_400;

/// Errors raised while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read or the default could not be written.
    #[error("config i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The config file is not valid JSON5 or has the wrong shape.
    #[error("config could not be parsed: {0}")]
    Parse(#[from] serde_json5::Error),
    /// The config parsed but holds an unusable value.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Timing and radius settings for falling events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FallingBlocksConfig {
    /// Server ticks per second.
    pub tick_rate: u32,
    /// Lower bound of the wait between events, in seconds.
    pub interval_min_seconds: u64,
    /// Upper bound of the wait between events, in seconds.
    pub interval_max_seconds: u64,
    /// Smallest scan radius.
    pub radius_min: i32,
    /// Largest scan radius.
    pub radius_max: i32,
    /// Length of the countdown shown before an event, in seconds.
    pub warning_seconds: u64,
}

impl FallingBlocksConfig {
    /// Loads the config at `path`, writing the default file there if it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config_str = fs::read_to_string(path)?;
            let config = Self::parse(&config_str)?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_CONFIG)?;
            log::info!("Wrote default config to {}", path.display());
            Ok(Self::default())
        }
    }

    /// Parses and validates a JSON5 document. Missing fields take their defaults.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let config: FallingBlocksConfig = serde_json5::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the event loop cannot work with.
    ///
    /// Bounds with `max <= min` are accepted: the pickers clamp them to the minimum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.tick_rate) {
            return Err(ConfigError::Invalid("tick_rate must be in range 1..=1000"));
        }
        if !(1..=MAX_DURATION_SECONDS).contains(&self.warning_seconds) {
            return Err(ConfigError::Invalid("warning_seconds must be in range 1..=86400"));
        }
        if self.interval_min_seconds > MAX_DURATION_SECONDS
            || self.interval_max_seconds > MAX_DURATION_SECONDS
        {
            return Err(ConfigError::Invalid("intervals must not exceed 86400 seconds"));
        }
        let radii = 0..=MAX_SCAN_RADIUS;
        if !radii.contains(&self.radius_min) || !radii.contains(&self.radius_max) {
            return Err(ConfigError::Invalid("radii must be in range 0..=64"));
        }
        Ok(())
    }

    /// Tick rate as a tick count multiplier.
    #[must_use]
    pub fn ticks_per_second(&self) -> u64 {
        u64::from(self.tick_rate)
    }

    /// Lower interval bound in ticks.
    #[must_use]
    pub fn interval_min_ticks(&self) -> u64 {
        self.interval_min_seconds * self.ticks_per_second()
    }

    /// Upper interval bound in ticks.
    #[must_use]
    pub fn interval_max_ticks(&self) -> u64 {
        self.interval_max_seconds * self.ticks_per_second()
    }

    /// Length of the warning window in ticks.
    #[must_use]
    pub fn warning_ticks(&self) -> u64 {
        self.warning_seconds * self.ticks_per_second()
    }
}

impl Default for FallingBlocksConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20,
            interval_min_seconds: 30,
            interval_max_seconds: 120,
            radius_min: 9,
            radius_max: 15,
            warning_seconds: 5,
        }
    }
}
