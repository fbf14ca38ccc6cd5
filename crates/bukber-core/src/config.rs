//! TOML configuration
//!
//! ```toml
//! [event]
//! title = "Buka Puasa Bersama"
//! starts_at = "2026-02-23T17:00:00+07:00"
//! venue = "Umatis Resto, BSD City"
//!
//! [feed]
//! capacity = 20
//!
//! [countdown]
//! tick_ms = 1000
//! ```
//!
//! Every key is optional; a missing file means all defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BukberError, BukberResult};
use crate::event::EventDetails;
use crate::feed::DEFAULT_CAPACITY;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BukberConfig {
    #[serde(default)]
    pub event: EventDetails,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Maximum number of entries kept in the guestbook feed
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl CountdownConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_tick_ms() -> u64 {
    1000
}

impl BukberConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(raw: &str) -> BukberResult<Self> {
        let config: BukberConfig =
            toml::from_str(raw).map_err(|e| BukberError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> BukberResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| BukberError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
    }

    pub fn validate(&self) -> BukberResult<()> {
        if self.feed.capacity == 0 {
            return Err(BukberError::Config("feed.capacity must be at least 1".to_string()));
        }
        if self.countdown.tick_ms == 0 {
            return Err(BukberError::Config("countdown.tick_ms must be at least 1".to_string()));
        }
        Ok(())
    }
}
