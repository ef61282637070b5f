//! Memory access and prefetch candidate definitions.
//!
//! This module defines the data exchanged between the predictor and the cache
//! model that owns it:
//! 1. **Observed Accesses:** Address, direction (load/store) and cache level.
//! 2. **Stream Direction:** Whether a stream walks up or down the address space.
//! 3. **Candidates:** Predicted addresses paired with a queue priority.

use std::fmt;

/// Monitored point in the memory hierarchy.
///
/// Each level has its own stream table and its own tuning parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheLevel {
    /// First-level data cache.
    L1,
    /// Second-level (unified) cache.
    L2,
}

impl CacheLevel {
    /// Both levels, in table order.
    pub const ALL: [Self; 2] = [Self::L1, Self::L2];
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
        }
    }
}

/// A single memory access observed by a cache level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemAccess {
    /// Byte address of the access.
    pub addr: u64,
    /// True if the access is a write.
    pub is_store: bool,
    /// Cache level that observed the access.
    pub level: CacheLevel,
}

impl MemAccess {
    /// Creates a load access at `addr` observed by `level`.
    #[inline]
    pub const fn load(addr: u64, level: CacheLevel) -> Self {
        Self {
            addr,
            is_store: false,
            level,
        }
    }

    /// Creates a store access at `addr` observed by `level`.
    #[inline]
    pub const fn store(addr: u64, level: CacheLevel) -> Self {
        Self {
            addr,
            is_store: true,
            level,
        }
    }
}

/// Direction of an address stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Successive addresses increase.
    #[default]
    Ascending,
    /// Successive addresses decrease.
    Descending,
}

impl Direction {
    /// Direction implied by moving from `from` to `to`.
    ///
    /// Equal addresses carry no direction and return `None`.
    pub fn between(from: u64, to: u64) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Self::Ascending),
            std::cmp::Ordering::Less => Some(Self::Descending),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Steps `base` by `distance` bytes in this direction.
    ///
    /// Returns `None` if the result would leave the address space.
    #[inline]
    pub const fn step(self, base: u64, distance: u64) -> Option<u64> {
        match self {
            Self::Ascending => base.checked_add(distance),
            Self::Descending => base.checked_sub(distance),
        }
    }

    /// Returns true if `addr` lies strictly beyond `base` in this direction.
    #[inline]
    pub const fn is_ahead(self, base: u64, addr: u64) -> bool {
        match self {
            Self::Ascending => addr > base,
            Self::Descending => addr < base,
        }
    }
}

/// A predicted address and the priority the prefetch queue should give it.
///
/// Higher priorities are serviced first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddrPriority {
    /// Predicted byte address.
    pub addr: u64,
    /// Queue priority.
    pub priority: i32,
}

impl AddrPriority {
    /// Creates a new candidate.
    #[inline]
    pub const fn new(addr: u64, priority: i32) -> Self {
        Self { addr, priority }
    }
}

impl fmt::Display for AddrPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}@{}", self.addr, self.priority)
    }
}
