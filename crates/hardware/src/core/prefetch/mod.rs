//! Hardware prefetch predictor.
//!
//! This module contains the interface and the table-driven stream prefetcher
//! used to hide memory latency in the simulated cache hierarchy.

/// Stream matching and stride training.
pub mod detector;

/// Candidate generation with slow-start ramp and look-ahead limit.
pub mod generator;

/// Per-level table-driven stream prefetcher (the predictor entry point).
pub mod kprefetcher;

/// Bounded FIFO stream tables.
pub mod table;

pub use self::detector::{Outcome, StrideDetector};
pub use self::kprefetcher::KPrefetcher;
pub use self::table::{StreamEntry, StreamState, StreamTable};

use crate::common::{AddrPriority, MemAccess};

/// Destination for prefetch candidates.
///
/// The cache model owns the sink and drains it after each call; prefetchers
/// only ever append to it.
pub trait PrefetchSink {
    /// Accepts one candidate.
    fn push_candidate(&mut self, candidate: AddrPriority);
}

impl PrefetchSink for Vec<AddrPriority> {
    #[inline]
    fn push_candidate(&mut self, candidate: AddrPriority) {
        self.push(candidate);
    }
}

/// Trait for cache prefetcher implementations.
///
/// Prefetchers observe memory access patterns and generate prefetch
/// requests to reduce cache miss penalties.
pub trait Prefetcher: Send + Sync {
    /// Observes a memory access and appends prefetch candidates.
    ///
    /// Called by the cache on each access to allow the prefetcher to
    /// learn access patterns and generate prefetch requests. Candidates
    /// already in `sink` (e.g. from other prefetchers) are left untouched.
    ///
    /// # Arguments
    ///
    /// * `access` - The access that was observed
    /// * `sink` - Output the candidates are appended to, highest priority first
    fn calculate_prefetch(&mut self, access: &MemAccess, sink: &mut dyn PrefetchSink);
}
