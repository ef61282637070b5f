//! Core predictor implementation.
//!
//! This module contains the hardware units modelled by the crate. The cache,
//! memory controller and request queues live in the host simulator; only the
//! prefetch predictor is implemented here.

/// Table-driven stream prefetcher and its stream tables.
pub mod prefetch;

pub use self::prefetch::KPrefetcher;
