//! Configuration system for the prefetch predictor.
//!
//! This module defines the configuration structures used to parameterize the
//! predictor. It provides:
//! 1. **Defaults:** Baseline tuning for the L1 and L2 stream tables.
//! 2. **Structures:** Per-level `LevelParameters` and the global `PredictorConfig`.
//! 3. **Validation:** Fail-fast checks run before a predictor is built.
//!
//! Configuration is supplied as JSON by the host simulator, or use
//! `PredictorConfig::default()`.

use serde::Deserialize;

use crate::common::constants::{LINE_BYTES, NARROW_WINDOW_LINES, WIDE_WINDOW_LINES};
use crate::common::{CacheLevel, ConfigError};

/// Default configuration constants for the predictor.
///
/// These values define the baseline tuning when not explicitly overridden
/// in the JSON configuration.
mod defaults {
    /// L1 stream table size (16 streams).
    pub const L1_TABLE_SIZE: usize = 16;

    /// L1 look-ahead limit in bytes (8 lines at 64-byte lines).
    pub const L1_MAX_PREFETCH_OFFSET: u64 = 512;

    /// L1 prefetch degree (candidates per trigger once confirmed).
    pub const L1_DEGREE: usize = 2;

    /// Confirmed accesses an L1 stream needs before reaching full degree.
    pub const L1_SLOW_START: u32 = 2;

    /// Priority of the nearest L1 candidate.
    pub const L1_PRIORITY: i32 = 1;

    /// L2 stream table size (32 streams).
    pub const L2_TABLE_SIZE: usize = 32;

    /// L2 look-ahead limit in bytes (32 lines at 64-byte lines).
    pub const L2_MAX_PREFETCH_OFFSET: u64 = 2048;

    /// L2 prefetch degree (candidates per trigger once confirmed).
    pub const L2_DEGREE: usize = 4;

    /// Confirmed accesses an L2 stream needs before reaching full degree.
    pub const L2_SLOW_START: u32 = 4;

    /// Priority of the nearest L2 candidate.
    pub const L2_PRIORITY: i32 = 0;
}

/// Immutable tuning for one monitored cache level.
///
/// # Examples
///
/// ```
/// use kprefetch_core::config::LevelParameters;
///
/// let json = r#"{ "table_size": 8, "degree": 4 }"#;
/// let params: LevelParameters = serde_json::from_str(json).unwrap();
/// assert_eq!(params.table_size, 8);
/// assert_eq!(params.degree, 4);
/// assert_eq!(params.slow_start_threshold, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LevelParameters {
    /// Maximum number of tracked streams
    #[serde(default = "LevelParameters::default_table_size")]
    pub table_size: usize,

    /// Farthest distance in bytes a prediction may reach past the last access
    #[serde(default = "LevelParameters::default_max_prefetch_offset")]
    pub max_prefetch_offset: u64,

    /// Candidates emitted per triggering access once a stream is confirmed
    #[serde(default = "LevelParameters::default_degree")]
    pub degree: usize,

    /// Confirmed accesses required before `degree` candidates are emitted
    #[serde(default = "LevelParameters::default_slow_start")]
    pub slow_start_threshold: u32,

    /// Priority of the nearest candidate; farther ones are lower
    #[serde(default = "LevelParameters::default_priority")]
    pub base_priority: i32,
}

impl LevelParameters {
    fn default_table_size() -> usize {
        defaults::L1_TABLE_SIZE
    }

    fn default_max_prefetch_offset() -> u64 {
        defaults::L1_MAX_PREFETCH_OFFSET
    }

    fn default_degree() -> usize {
        defaults::L1_DEGREE
    }

    fn default_slow_start() -> u32 {
        defaults::L1_SLOW_START
    }

    fn default_priority() -> i32 {
        defaults::L1_PRIORITY
    }

    /// Baseline tuning for the second-level table.
    ///
    /// The L2 table tracks more streams and looks further ahead, but ramps
    /// up more slowly and ranks its candidates below L1's.
    pub const fn l2_default() -> Self {
        Self {
            table_size: defaults::L2_TABLE_SIZE,
            max_prefetch_offset: defaults::L2_MAX_PREFETCH_OFFSET,
            degree: defaults::L2_DEGREE,
            slow_start_threshold: defaults::L2_SLOW_START,
            base_priority: defaults::L2_PRIORITY,
        }
    }

    /// Checks that every parameter that must be positive is positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroParameter`] naming the first zero field.
    pub fn validate(&self, level: CacheLevel) -> Result<(), ConfigError> {
        let field = if self.table_size == 0 {
            "table_size"
        } else if self.degree == 0 {
            "degree"
        } else if self.slow_start_threshold == 0 {
            "slow_start_threshold"
        } else {
            return Ok(());
        };
        Err(ConfigError::ZeroParameter { level, field })
    }
}

impl Default for LevelParameters {
    /// Baseline tuning for the first-level table.
    fn default() -> Self {
        Self {
            table_size: defaults::L1_TABLE_SIZE,
            max_prefetch_offset: defaults::L1_MAX_PREFETCH_OFFSET,
            degree: defaults::L1_DEGREE,
            slow_start_threshold: defaults::L1_SLOW_START,
            base_priority: defaults::L1_PRIORITY,
        }
    }
}

/// Root configuration structure for the predictor.
///
/// # Examples
///
/// Deserializing from JSON (typical host simulator usage):
///
/// ```
/// use kprefetch_core::config::PredictorConfig;
///
/// let json = r#"{
///     "l1": {
///         "table_size": 8,
///         "max_prefetch_offset": 256,
///         "degree": 2,
///         "slow_start_threshold": 2,
///         "base_priority": 3
///     },
///     "write_prefetch_enabled": true
/// }"#;
///
/// let config = PredictorConfig::from_json(json).unwrap();
/// assert_eq!(config.l1.table_size, 8);
/// assert_eq!(config.l2.table_size, 32);
/// assert!(config.write_prefetch_enabled);
/// assert!(!config.wide_tag_enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PredictorConfig {
    /// First-level table tuning
    #[serde(default)]
    pub l1: LevelParameters,

    /// Second-level table tuning
    #[serde(default = "LevelParameters::l2_default")]
    pub l2: LevelParameters,

    /// Allow store-triggered streams to emit prefetches
    #[serde(default)]
    pub write_prefetch_enabled: bool,

    /// Match streams over a page-sized window instead of a couple of lines
    #[serde(default)]
    pub wide_tag_enabled: bool,

    /// Cache line size in bytes, used to size the match window
    #[serde(default = "PredictorConfig::default_line_bytes")]
    pub line_bytes: u64,
}

impl PredictorConfig {
    fn default_line_bytes() -> u64 {
        LINE_BYTES
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or any error
    /// [`PredictorConfig::validate`] reports.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks both levels and the line size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLineSize`] if `line_bytes` is not a
    /// non-zero power of two, or [`ConfigError::ZeroParameter`] for the
    /// first level with a zero table size, degree or slow-start threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.line_bytes.is_power_of_two() {
            return Err(ConfigError::InvalidLineSize(self.line_bytes));
        }
        self.l1.validate(CacheLevel::L1)?;
        self.l2.validate(CacheLevel::L2)
    }

    /// Returns the tuning for `level`.
    #[inline]
    pub const fn params(&self, level: CacheLevel) -> &LevelParameters {
        match level {
            CacheLevel::L1 => &self.l1,
            CacheLevel::L2 => &self.l2,
        }
    }

    /// Distance in bytes within which an access is attributed to a stream.
    #[inline]
    pub const fn match_window(&self) -> u64 {
        let lines = if self.wide_tag_enabled {
            WIDE_WINDOW_LINES
        } else {
            NARROW_WINDOW_LINES
        };
        self.line_bytes.saturating_mul(lines)
    }
}

impl Default for PredictorConfig {
    /// Creates a default predictor configuration.
    ///
    /// Uses baseline L1/L2 tuning, 64-byte lines, the narrow match window,
    /// and no store-triggered prefetching.
    fn default() -> Self {
        Self {
            l1: LevelParameters::default(),
            l2: LevelParameters::l2_default(),
            write_prefetch_enabled: false,
            wide_tag_enabled: false,
            line_bytes: LINE_BYTES,
        }
    }
}
