//! Global Predictor Constants.
//!
//! This module defines constants used across the predictor. It includes:
//! 1. **Line Geometry:** The default cache line size the match window is derived from.
//! 2. **Match Windows:** How far (in cache lines) an access may sit from a stream's
//!    last access and still be attributed to that stream.

/// Default cache line size in bytes (64 bytes).
pub const LINE_BYTES: u64 = 64;

/// Width of the default stream-matching window, in cache lines.
///
/// An access belongs to a stream when it lies within this many lines of the
/// stream's last access, in either direction.
pub const NARROW_WINDOW_LINES: u64 = 2;

/// Width of the wide stream-matching window, in cache lines.
///
/// Selected by `wide_tag_enabled`; at 64-byte lines this spans one 4 KiB page,
/// which lets large-stride (HPC style) streams keep matching.
pub const WIDE_WINDOW_LINES: u64 = 64;
