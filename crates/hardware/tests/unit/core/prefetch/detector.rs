//! Stride Detector Tests.
//!
//! Verifies stream matching under both window widths, stride and direction
//! training, repeat handling, and removal of streams that converge.

use kprefetch_core::common::{CacheLevel, Direction};
use kprefetch_core::core::prefetch::{Outcome, StreamState, StreamTable, StrideDetector};

const WINDOW: u64 = 128;

fn setup() -> (StrideDetector, StreamTable) {
    (
        StrideDetector::new(WINDOW),
        StreamTable::new(CacheLevel::L1, 8),
    )
}

// ══════════════════════════════════════════════════════════
// 1. Allocation
// ══════════════════════════════════════════════════════════

#[test]
fn first_touch_allocates_untrained_stream() {
    let (det, mut table) = setup();
    let (entry, outcome) = det.observe(&mut table, 0x1000, false);

    assert_eq!(outcome, Outcome::Allocated);
    assert_eq!(entry.last_access_addr(), 0x1000);
    assert_eq!(entry.last_prefetch_addr(), 0x1000);
    assert_eq!(entry.direction(), Direction::Ascending);
    assert_eq!(entry.stride(), 0);
    assert_eq!(entry.confirmed_hits(), 0);
    assert!(!entry.is_store());
    assert_eq!(table.len(), 1);
}

#[test]
fn access_outside_window_starts_new_stream() {
    let (det, mut table) = setup();
    let _ = det.observe(&mut table, 0x1000, false);
    let (_, outcome) = det.observe(&mut table, 0x1000 + 2 * WINDOW + 1, false);
    assert_eq!(outcome, Outcome::Allocated);
    assert_eq!(table.len(), 2);
}

/// A new stream whose window would overlap an existing one replaces it.
#[test]
fn allocation_absorbs_overlapping_neighbour() {
    let (det, mut table) = setup();
    let _ = det.observe(&mut table, 0x1000, false);
    let _ = det.observe(&mut table, 0x1040, false);

    let (entry, outcome) = det.observe(&mut table, 0x1040 + WINDOW + 1, false);
    assert_eq!(outcome, Outcome::Allocated);
    assert_eq!(entry.last_access_addr(), 0x1040 + WINDOW + 1);
    assert_eq!(entry.confirmed_hits(), 0);
    assert_eq!(table.len(), 1);
}

#[test]
fn access_at_window_edge_matches() {
    let (det, mut table) = setup();
    let _ = det.observe(&mut table, 0x1000, false);
    let (entry, outcome) = det.observe(&mut table, 0x1000 + WINDOW, false);
    assert_eq!(outcome, Outcome::Trained);
    assert_eq!(entry.stride(), WINDOW);
    assert_eq!(table.len(), 1);
}

// ══════════════════════════════════════════════════════════
// 2. Training
// ══════════════════════════════════════════════════════════

#[test]
fn ascending_access_trains_stride() {
    let (det, mut table) = setup();
    let _ = det.observe(&mut table, 0x1000, false);
    let (entry, outcome) = det.observe(&mut table, 0x1040, true);

    assert_eq!(outcome, Outcome::Trained);
    assert_eq!(entry.last_access_addr(), 0x1040);
    assert_eq!(entry.last_prefetch_addr(), 0x1040);
    assert_eq!(entry.stride(), 0x40);
    assert_eq!(entry.direction(), Direction::Ascending);
    assert_eq!(entry.confirmed_hits(), 1);
    assert!(entry.is_store());
}

#[test]
fn descending_access_trains_direction() {
    let (det, mut table) = setup();
    let _ = det.observe(&mut table, 0x1000, false);
    let (entry, _) = det.observe(&mut table, 0x0FC0, false);
    assert_eq!(entry.direction(), Direction::Descending);
    assert_eq!(entry.stride(), 0x40);
}

#[test]
fn repeat_access_changes_nothing() {
    let (det, mut table) = setup();
    let _ = det.observe(&mut table, 0x1000, false);
    let _ = det.observe(&mut table, 0x1040, false);
    let before = table.get(0).copied();

    let (_, outcome) = det.observe(&mut table, 0x1040, true);

    assert_eq!(outcome, Outcome::Repeat);
    assert_eq!(table.get(0).copied(), before);
}

#[test]
fn stride_change_never_lowers_confidence() {
    let (det, mut table) = setup();
    let _ = det.observe(&mut table, 0x1000, false);
    let _ = det.observe(&mut table, 0x1008, false);
    let _ = det.observe(&mut table, 0x1010, false);
    let (entry, _) = det.observe(&mut table, 0x1050, false);

    assert_eq!(entry.stride(), 0x40);
    assert_eq!(entry.confirmed_hits(), 3);
    assert_eq!(entry.last_prefetch_addr(), 0x1050, "base restarts at the access");
}

#[test]
fn state_follows_confirmed_hits() {
    let (det, mut table) = setup();
    let threshold = 3;
    let expected = [
        StreamState::Untrained,
        StreamState::Training,
        StreamState::Training,
        StreamState::Confirmed,
        StreamState::Confirmed,
    ];
    for (i, want) in expected.into_iter().enumerate() {
        let (entry, _) = det.observe(&mut table, 0x2000 + 0x10 * i as u64, false);
        assert_eq!(entry.state(threshold), want, "after access {i}");
    }
}

// ══════════════════════════════════════════════════════════
// 3. Window width
// ══════════════════════════════════════════════════════════

/// A 1 KiB stride never matches under the narrow window but does under the wide one.
#[test]
fn wide_window_follows_large_strides() {
    let narrow = StrideDetector::new(128);
    let wide = StrideDetector::new(4096);
    let mut narrow_table = StreamTable::new(CacheLevel::L2, 8);
    let mut wide_table = StreamTable::new(CacheLevel::L2, 8);

    for i in 0..4 {
        let addr = 0x10_0000 + 0x400 * i;
        let _ = narrow.observe(&mut narrow_table, addr, false);
        let _ = wide.observe(&mut wide_table, addr, false);
    }

    assert_eq!(narrow_table.len(), 4);
    assert!(narrow_table.iter().all(|e| e.confirmed_hits() == 0));
    assert_eq!(wide_table.len(), 1);
    assert_eq!(wide_table.get(0).map(|e| e.confirmed_hits()), Some(3));
    assert_eq!(wide.window(), 4096);
}

// ══════════════════════════════════════════════════════════
// 4. Converging streams
// ══════════════════════════════════════════════════════════

/// A stream that walks toward another stream absorbs it as soon as their
/// windows would overlap.
#[test]
fn converging_stream_absorbs_neighbour() {
    let (det, mut table) = setup();
    let _ = det.observe(&mut table, 0x1000, false);
    let _ = det.observe(&mut table, 0x1200, false);
    assert_eq!(table.len(), 2);

    let _ = det.observe(&mut table, 0x1080, false);
    assert_eq!(table.len(), 2, "windows still disjoint");

    let (entry, outcome) = det.observe(&mut table, 0x1100, false);
    assert_eq!(outcome, Outcome::Trained);
    assert_eq!(entry.last_access_addr(), 0x1100);
    assert_eq!(entry.confirmed_hits(), 2);
    assert_eq!(table.len(), 1);
    assert!(table.lookup(0x1200, WINDOW).is_none());
    assert_eq!(
        table.lookup(0x1180, WINDOW).map(|e| e.last_access_addr()),
        Some(0x1100)
    );
}

/// An older single-touch stream next to a trained one cannot take over the
/// trained stream's next access.
#[test]
fn trained_stream_keeps_its_accesses_next_to_older_stream() {
    let (det, mut table) = setup();
    for addr in [0x1200, 0x9000, 0x1000, 0x1080, 0x1100] {
        let _ = det.observe(&mut table, addr, false);
    }

    let matching = table.iter().filter(|e| e.matches(0x1180, WINDOW)).count();
    assert_eq!(matching, 1);

    let (entry, outcome) = det.observe(&mut table, 0x1180, false);
    assert_eq!(outcome, Outcome::Trained);
    assert_eq!(entry.direction(), Direction::Ascending);
    assert_eq!(entry.stride(), 0x80);
    assert_eq!(entry.confirmed_hits(), 3);

    let order: Vec<u64> = table.iter().map(|e| e.last_access_addr()).collect();
    assert_eq!(order, vec![0x9000, 0x1180]);
}
