//! Stream Table.
//!
//! A bounded, insertion-ordered collection of tracked address streams. One
//! table exists per monitored cache level. When the table is full and a new
//! stream must be admitted, the oldest stream is evicted (FIFO), regardless of
//! how recently it was used.
//!
//! Streams are kept more than two match windows apart, so any address matches
//! at most one stream. The stream an access lands in absorbs every neighbour
//! whose window it would overlap.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `find()`: O(T) linear scan
//!   - `insert()`: O(1)
//! - **Space Complexity:** O(T) where T is the table size (typically 8-64 entries)

use std::collections::VecDeque;

use tracing::debug;

use crate::common::{CacheLevel, Direction};

/// Confidence phase of a tracked stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    /// Just allocated; no stride has been observed yet.
    Untrained,
    /// Some strides observed, fewer than the slow-start threshold.
    Training,
    /// At or past the slow-start threshold; emits full degree.
    Confirmed,
}

/// One tracked access stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamEntry {
    /// Most recent demand address observed for this stream.
    pub(super) last_access_addr: u64,
    /// Most recent address predicted for this stream; base of the next prediction.
    pub(super) last_prefetch_addr: u64,
    /// Magnitude of the last non-zero delta between demand accesses.
    pub(super) stride: u64,
    /// Sign of the last non-zero delta.
    pub(super) direction: Direction,
    /// Whether the last training access was a write.
    pub(super) is_store: bool,
    /// Number of stride-carrying accesses seen since allocation.
    pub(super) confirmed_hits: u32,
}

impl StreamEntry {
    /// Creates an untrained stream anchored at `addr`.
    pub(super) const fn new(addr: u64, is_store: bool) -> Self {
        Self {
            last_access_addr: addr,
            last_prefetch_addr: addr,
            stride: 0,
            direction: Direction::Ascending,
            is_store,
            confirmed_hits: 0,
        }
    }

    /// Most recent demand address.
    #[inline]
    pub const fn last_access_addr(&self) -> u64 {
        self.last_access_addr
    }

    /// Most recent predicted address.
    #[inline]
    pub const fn last_prefetch_addr(&self) -> u64 {
        self.last_prefetch_addr
    }

    /// Detected stride magnitude in bytes (zero while untrained).
    #[inline]
    pub const fn stride(&self) -> u64 {
        self.stride
    }

    /// Detected stream direction.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the stream is being trained by stores.
    #[inline]
    pub const fn is_store(&self) -> bool {
        self.is_store
    }

    /// Stride-carrying accesses seen since allocation.
    #[inline]
    pub const fn confirmed_hits(&self) -> u32 {
        self.confirmed_hits
    }

    /// Confidence phase relative to a slow-start threshold.
    pub const fn state(&self, slow_start_threshold: u32) -> StreamState {
        if self.confirmed_hits == 0 {
            StreamState::Untrained
        } else if self.confirmed_hits < slow_start_threshold {
            StreamState::Training
        } else {
            StreamState::Confirmed
        }
    }

    /// Returns true if `addr` lies within `window` bytes of the last access.
    #[inline]
    pub const fn matches(&self, addr: u64, window: u64) -> bool {
        self.last_access_addr.abs_diff(addr) <= window
    }

    /// Whether some address would match both this stream and one last
    /// accessed at `addr`.
    #[inline]
    pub const fn overlaps(&self, addr: u64, window: u64) -> bool {
        self.matches(addr, window.saturating_mul(2))
    }
}

/// Fixed-capacity FIFO table of streams for one cache level.
#[derive(Clone, Debug)]
pub struct StreamTable {
    /// Level this table serves (used for diagnostics).
    level: CacheLevel,
    /// Entries, oldest at the front.
    entries: VecDeque<StreamEntry>,
    /// Maximum number of entries.
    capacity: usize,
}

impl StreamTable {
    /// Creates an empty table holding at most `capacity` streams.
    pub fn new(level: CacheLevel, capacity: usize) -> Self {
        Self {
            level,
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Level this table serves.
    #[inline]
    pub const fn level(&self) -> CacheLevel {
        self.level
    }

    /// Number of tracked streams.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no stream is tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of tracked streams.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the streams, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &StreamEntry> {
        self.entries.iter()
    }

    /// Returns the stream at insertion position `idx` (0 is the oldest).
    pub fn get(&self, idx: usize) -> Option<&StreamEntry> {
        self.entries.get(idx)
    }

    /// Returns the stream that `addr` would be attributed to, if any.
    pub fn lookup(&self, addr: u64, window: u64) -> Option<&StreamEntry> {
        self.find(addr, window).and_then(|idx| self.entries.get(idx))
    }

    /// Position of the stream matching `addr`.
    ///
    /// Streams never overlap, so at most one matches.
    pub(super) fn find(&self, addr: u64, window: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.matches(addr, window))
    }

    pub(super) fn entry_mut(&mut self, idx: usize) -> &mut StreamEntry {
        &mut self.entries[idx]
    }

    /// Appends `entry`, evicting the oldest stream first if the table is full.
    ///
    /// Returns the new entry's position and the evicted stream, if any.
    pub(super) fn insert(&mut self, entry: StreamEntry) -> (usize, Option<StreamEntry>) {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        (self.entries.len() - 1, evicted)
    }

    /// Drops every stream other than `keep` whose window overlaps it.
    ///
    /// Returns the position of `keep` after the removal.
    pub(super) fn remove_aliases(&mut self, keep: usize, window: u64) -> usize {
        let Some(anchor) = self.entries.get(keep).map(|e| e.last_access_addr) else {
            return keep;
        };
        let before = self.entries.len();
        let mut pos = 0;
        let mut shift = 0;
        self.entries.retain(|e| {
            let retain = pos == keep || !e.overlaps(anchor, window);
            if !retain && pos < keep {
                shift += 1;
            }
            pos += 1;
            retain
        });
        if self.entries.len() < before {
            debug!(
                level = %self.level,
                addr = anchor,
                removed = before - self.entries.len(),
                "stream absorbed overlapping streams"
            );
        }
        keep - shift
    }
}
