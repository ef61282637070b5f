//! Common types used throughout the prefetch predictor.
//!
//! This module provides the value types shared between the predictor and the
//! cache model that drives it. It includes:
//! 1. **Access Types:** The observed memory access, the cache level it pertains to,
//!    and the `(address, priority)` pairs handed back to the cache.
//! 2. **Constants:** Line size and stream-matching window widths.
//! 3. **Error Handling:** Configuration errors raised at construction time.

/// Memory access and prefetch candidate types.
pub mod access;

/// Common constants used by the predictor.
pub mod constants;

/// Configuration error types.
pub mod error;

pub use access::{AddrPriority, CacheLevel, Direction, MemAccess};
pub use constants::{NARROW_WINDOW_LINES, WIDE_WINDOW_LINES};
pub use error::ConfigError;
