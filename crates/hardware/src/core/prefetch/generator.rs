//! Candidate Generator.
//!
//! Turns a trained stream into an ordered run of predicted addresses. The run
//! is limited three ways:
//! 1. **Slow start:** A stream with few confirmed hits emits fewer candidates,
//!    ramping linearly up to the level's degree at the slow-start threshold.
//! 2. **Look-ahead:** No candidate may lie further than `max_prefetch_offset`
//!    bytes from the stream's last demand access.
//! 3. **Address space:** Candidates that would wrap past either end of the
//!    address space are dropped.
//!
//! The run also ends once the next candidate's priority would fall below
//! `i32::MIN`, so priorities stay strictly decreasing.
//!
//! Candidates continue from the stream's last predicted address, so repeated
//! triggers extend the prediction horizon instead of re-issuing the same lines.

use tracing::trace;

use super::PrefetchSink;
use super::table::StreamEntry;
use crate::common::AddrPriority;
use crate::config::LevelParameters;

/// Number of candidates a stream with `confirmed_hits` may emit.
///
/// Zero for an untrained stream; otherwise
/// `ceil(degree * confirmed_hits / slow_start_threshold)` clamped to
/// `[1, degree]`.
pub fn ramp_count(confirmed_hits: u32, params: &LevelParameters) -> usize {
    if confirmed_hits == 0 {
        return 0;
    }
    let threshold = u64::from(params.slow_start_threshold.max(1));
    let scaled = (params.degree as u64)
        .saturating_mul(u64::from(confirmed_hits))
        .div_ceil(threshold);
    (scaled.min(params.degree as u64) as usize).max(1)
}

/// Emits candidates for `entry` into `sink` and advances its prediction base.
///
/// # Arguments
///
/// * `entry` - A stream freshly updated by the stride detector.
/// * `params` - Tuning of the level the stream belongs to.
/// * `sink` - Output the candidates are appended to, nearest first.
///
/// # Returns
///
/// The number of candidates appended.
pub fn generate(
    entry: &mut StreamEntry,
    params: &LevelParameters,
    sink: &mut dyn PrefetchSink,
) -> usize {
    let count = ramp_count(entry.confirmed_hits, params);
    if count == 0 || entry.stride == 0 {
        return 0;
    }

    let mut farthest = None;
    let mut emitted = 0;
    for i in 1..=count {
        let Some(addr) = (entry.stride)
            .checked_mul(i as u64)
            .and_then(|distance| entry.direction.step(entry.last_prefetch_addr, distance))
        else {
            break;
        };
        // Candidates only move further out from here.
        if addr.abs_diff(entry.last_access_addr) > params.max_prefetch_offset {
            break;
        }

        let Some(priority) = i32::try_from(i - 1)
            .ok()
            .and_then(|rank| params.base_priority.checked_sub(rank))
        else {
            break;
        };
        trace!(addr, priority, stride = entry.stride, "prefetch candidate");
        sink.push_candidate(AddrPriority::new(addr, priority));
        farthest = Some(addr);
        emitted += 1;
    }

    if let Some(addr) = farthest {
        entry.last_prefetch_addr = addr;
    }
    emitted
}
