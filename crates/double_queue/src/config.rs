//! # Queue Configuration
//!
//! Loaded once at startup, typically from a TOML file:
//!
//! ```toml
//! capacity = 4096
//! default_timeout_ms = 250
//! ```
//!
//! Missing keys fall back to [`QueueConfig::default`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QueueError, QueueResult};

/// Slots per buffer when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 50_000;

/// Wait budget used by [`offer`](crate::DoubleQueue::offer) and
/// [`poll`](crate::DoubleQueue::poll).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Configuration for a [`DoubleQueue`](crate::DoubleQueue).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    /// Slots in each of the two buffers.
    pub capacity: usize,
    /// Budget for the convenience forms, in milliseconds.
    pub default_timeout_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_timeout_ms: 500,
        }
    }
}

impl QueueConfig {
    /// Config with the given capacity and the default timeout.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidConfig`] if the document does not parse
    /// and [`QueueError::InvalidCapacity`] if the capacity is zero.
    pub fn from_toml_str(source: &str) -> QueueResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| QueueError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Same as [`from_toml_str`](Self::from_toml_str), plus
    /// [`QueueError::InvalidConfig`] if the file cannot be read.
    pub fn from_toml_file(path: impl AsRef<Path>) -> QueueResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            QueueError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks that the config describes a usable queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidCapacity`] if the capacity is zero.
    pub fn validate(&self) -> QueueResult<()> {
        if self.capacity == 0 {
            return Err(QueueError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    /// The convenience timeout as a `Duration`.
    #[inline]
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}
