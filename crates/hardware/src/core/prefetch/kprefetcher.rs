//! Table-driven Stream Prefetcher.
//!
//! Tracks address streams independently for the L1 and L2 caches. Each level
//! owns a bounded FIFO stream table and its own tuning (table size, degree,
//! look-ahead, slow-start threshold and priority). On every observed access
//! the level's table is trained and, unless the access is a store and store
//! prefetching is disabled, the matched stream emits its next candidates.
//!
//! # Performance
//!
//! - **Time Complexity:** O(T + D) per access, T the table size and D the degree
//! - **Space Complexity:** O(T1 + T2)
//! - **Best Case:** Array traversals with a constant stride in either direction
//! - **Worst Case:** More interleaved streams than table entries (FIFO thrashing)

use tracing::{debug, trace};

use super::detector::{Outcome, StrideDetector};
use super::generator;
use super::table::StreamTable;
use super::{PrefetchSink, Prefetcher};
use crate::common::{AddrPriority, CacheLevel, ConfigError, MemAccess};
use crate::config::{LevelParameters, PredictorConfig};

/// Per-level stream prefetcher state.
#[derive(Clone, Debug)]
pub struct KPrefetcher {
    /// Validated configuration.
    config: PredictorConfig,
    /// Streams observed by the first-level cache.
    l1: StreamTable,
    /// Streams observed by the second-level cache.
    l2: StreamTable,
    /// Stream matcher shared by both tables.
    detector: StrideDetector,
}

impl KPrefetcher {
    /// Creates a new prefetcher with empty stream tables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any level has a zero table size, degree or
    /// slow-start threshold, or if the line size is not a power of two.
    pub fn new(config: PredictorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            l1 = ?config.l1,
            l2 = ?config.l2,
            write_prefetch = config.write_prefetch_enabled,
            window = config.match_window(),
            "stream prefetcher configured"
        );
        Ok(Self {
            l1: StreamTable::new(CacheLevel::L1, config.l1.table_size),
            l2: StreamTable::new(CacheLevel::L2, config.l2.table_size),
            detector: StrideDetector::new(config.match_window()),
            config,
        })
    }

    /// Configuration the prefetcher was built with.
    #[inline]
    pub const fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Tuning for `level`.
    #[inline]
    pub const fn params(&self, level: CacheLevel) -> &LevelParameters {
        self.config.params(level)
    }

    /// Stream table for `level`.
    #[inline]
    pub const fn table(&self, level: CacheLevel) -> &StreamTable {
        match level {
            CacheLevel::L1 => &self.l1,
            CacheLevel::L2 => &self.l2,
        }
    }

    /// Observes an access and returns only the candidates it produced.
    pub fn observe(&mut self, access: &MemAccess) -> Vec<AddrPriority> {
        let mut addresses = Vec::new();
        self.calculate_prefetch(access, &mut addresses);
        addresses
    }
}

impl Prefetcher for KPrefetcher {
    /// Trains the access's level table and appends its stream's candidates.
    ///
    /// Store accesses always train the table, but only generate candidates
    /// when `write_prefetch_enabled` is set. First touches and repeats of a
    /// stream's last address generate nothing.
    fn calculate_prefetch(&mut self, access: &MemAccess, sink: &mut dyn PrefetchSink) {
        let (table, params) = match access.level {
            CacheLevel::L1 => (&mut self.l1, &self.config.l1),
            CacheLevel::L2 => (&mut self.l2, &self.config.l2),
        };

        let (entry, outcome) = self.detector.observe(table, access.addr, access.is_store);

        // Only a newly learned stride moves the stream forward.
        if outcome != Outcome::Trained {
            return;
        }
        if access.is_store && !self.config.write_prefetch_enabled {
            trace!(addr = access.addr, level = %access.level, "store prefetch suppressed");
            return;
        }

        let emitted = generator::generate(entry, params, sink);
        if emitted > 0 {
            trace!(addr = access.addr, level = %access.level, emitted, "stream triggered prefetch");
        }
    }
}
