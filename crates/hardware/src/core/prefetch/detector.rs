//! Stride Detector.
//!
//! Attributes each observed access to a stream in a level's table, creating
//! the stream on first touch, and trains the stream's stride, direction and
//! confidence from the distance to its previous access.
//!
//! A stream only gains confidence; a changed stride retrains the stride and
//! restarts the prediction base but does not reduce the hit count. A repeat
//! access to the last address is ignored entirely.

use tracing::debug;

use super::table::{StreamEntry, StreamTable};
use crate::common::Direction;

/// What an observed access did to its stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// No stream matched; a new untrained stream was admitted.
    Allocated,
    /// A stream matched and learned a non-zero stride.
    Trained,
    /// The access repeated the stream's last address; nothing changed.
    Repeat,
}

/// Stream matcher and stride trainer.
#[derive(Clone, Copy, Debug)]
pub struct StrideDetector {
    /// Maximum distance in bytes between an access and a stream's last access.
    window: u64,
}

impl StrideDetector {
    /// Creates a detector that attributes accesses within `window` bytes.
    pub const fn new(window: u64) -> Self {
        Self { window }
    }

    /// Match window in bytes.
    #[inline]
    pub const fn window(&self) -> u64 {
        self.window
    }

    /// Finds or creates the stream for `addr` and updates it.
    ///
    /// Mutates exactly one entry of `table` (the matched or new one), plus at
    /// most one FIFO eviction and the removal of any streams whose window the
    /// updated stream now overlaps.
    ///
    /// # Arguments
    ///
    /// * `table` - The level's stream table.
    /// * `addr` - Address of the observed access.
    /// * `is_store` - Whether the access is a write.
    ///
    /// # Returns
    ///
    /// The stream the access was attributed to, and how it was updated.
    pub fn observe<'t>(
        &self,
        table: &'t mut StreamTable,
        addr: u64,
        is_store: bool,
    ) -> (&'t mut StreamEntry, Outcome) {
        let (idx, outcome) = match table.find(addr, self.window) {
            Some(idx) => {
                if !Self::train(table.entry_mut(idx), addr, is_store) {
                    return (table.entry_mut(idx), Outcome::Repeat);
                }
                (idx, Outcome::Trained)
            }
            None => (self.allocate(table, addr, is_store), Outcome::Allocated),
        };
        let idx = table.remove_aliases(idx, self.window);
        (table.entry_mut(idx), outcome)
    }

    /// Applies one access to a matched stream.
    ///
    /// Returns false for a zero-stride repeat, which leaves the entry untouched.
    fn train(entry: &mut StreamEntry, addr: u64, is_store: bool) -> bool {
        let Some(direction) = Direction::between(entry.last_access_addr, addr) else {
            return false;
        };
        let stride = entry.last_access_addr.abs_diff(addr);

        if direction != entry.direction && entry.confirmed_hits > 0 {
            debug!(
                from = entry.last_access_addr,
                to = addr,
                ?direction,
                "stream direction reversed"
            );
        }

        // Predictions made under another stride or direction, or ones the
        // demand stream has already caught up with, are no longer a valid base.
        let rebase = direction != entry.direction
            || stride != entry.stride
            || !direction.is_ahead(addr, entry.last_prefetch_addr);

        entry.direction = direction;
        entry.stride = stride;
        entry.last_access_addr = addr;
        entry.is_store = is_store;
        if rebase {
            entry.last_prefetch_addr = addr;
        }
        entry.confirmed_hits = entry.confirmed_hits.saturating_add(1);
        true
    }

    /// Admits a new stream at `addr`, evicting the oldest if the table is full.
    fn allocate(&self, table: &mut StreamTable, addr: u64, is_store: bool) -> usize {
        let (idx, evicted) = table.insert(StreamEntry::new(addr, is_store));
        if let Some(old) = evicted {
            debug!(
                level = %table.level(),
                evicted = old.last_access_addr,
                addr,
                "stream table full, evicted oldest stream"
            );
        } else {
            debug!(level = %table.level(), addr, window = self.window, "allocated stream");
        }
        idx
    }
}
