//! Table-driven stream prefetch predictor for cache hierarchy simulators.
//!
//! This crate implements the prefetch predictor a simulated cache consults on
//! every access:
//! 1. **Stream Tables:** One bounded FIFO table of tracked streams per monitored level (L1, L2).
//! 2. **Stride Detection:** Attributes accesses to streams and trains stride and direction.
//! 3. **Candidate Generation:** Emits prioritized look-ahead addresses with a slow-start ramp.
//! 4. **Configuration:** Per-level tuning, store-prefetch and wide-tag switches, validated up front.
//!
//! The host simulator issues the actual fetches, deduplicates candidates
//! against in-flight requests and applies queue limits.

/// Common types (accesses, cache levels, candidates, constants, errors).
pub mod common;
/// Predictor configuration (defaults, per-level parameters, validation).
pub mod config;
/// Predictor units (stream tables, stride detector, candidate generator).
pub mod core;

/// Root configuration type; use `PredictorConfig::default()` or deserialize from JSON.
pub use crate::config::PredictorConfig;
/// Main predictor type; construct with `KPrefetcher::new`.
pub use crate::core::KPrefetcher;
/// Trait implemented by prefetchers, and the sink they append to.
pub use crate::core::prefetch::{PrefetchSink, Prefetcher};
