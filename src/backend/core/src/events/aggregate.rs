//! Aggregate trait and the per-unit history aggregate.
//!
//! Aggregates are rebuilt from a unit's event stream on every read. Each
//! aggregate implements `Default` (empty state) and `apply` (fold an event).

use chrono::{DateTime, NaiveDate, Utc};

use super::event::{EventKind, LifecycleEvent};

const MILLIS_PER_DAY: i64 = 86_400_000;

// =============================================================================
// Aggregate Trait
// =============================================================================

/// State that can be reconstructed from a sequence of lifecycle events.
///
/// Given the same event stream, the resulting state is deterministic.
pub trait Aggregate: Default {
    /// Fold a single event into the state. Must not perform I/O or fail.
    fn apply(&mut self, event: &LifecycleEvent);

    /// Rebuild from scratch.
    fn replay<'a>(events: impl IntoIterator<Item = &'a LifecycleEvent>) -> Self {
        let mut state = Self::default();
        for event in events {
            state.apply(event);
        }
        state
    }
}

// =============================================================================
// Unit History
// =============================================================================

/// Refill and drum statistics for one unit.
///
/// Timestamps are kept rather than running counters so the result does not
/// depend on the order events were appended in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitHistory {
    refills: Vec<DateTime<Utc>>,
    drums: Vec<DateTime<Utc>>,
}

impl Aggregate for UnitHistory {
    fn apply(&mut self, event: &LifecycleEvent) {
        match event.kind {
            EventKind::Refill => insert_sorted(&mut self.refills, event.timestamp),
            EventKind::DrumReplace => insert_sorted(&mut self.drums, event.timestamp),
            EventKind::Install | EventKind::Dispose => {}
        }
    }
}

/// Stable insert: equal timestamps keep arrival order.
fn insert_sorted(times: &mut Vec<DateTime<Utc>>, at: DateTime<Utc>) {
    let idx = times.partition_point(|t| *t <= at);
    times.insert(idx, at);
}

impl UnitHistory {
    pub fn total_refill_count(&self) -> usize {
        self.refills.len()
    }

    pub fn total_drum_count(&self) -> usize {
        self.drums.len()
    }

    pub fn latest_refill(&self) -> Option<DateTime<Utc>> {
        self.refills.last().copied()
    }

    pub fn latest_drum(&self) -> Option<DateTime<Utc>> {
        self.drums.last().copied()
    }

    /// Refills strictly after the most recent drum replacement; 0 without one.
    pub fn refills_after_drum(&self) -> usize {
        match self.latest_drum() {
            Some(drum) => self.refills.iter().filter(|t| **t > drum).count(),
            None => 0,
        }
    }

    /// Length of the most recent refill cycle in whole days.
    pub fn refill_cycle_days(&self) -> Option<i64> {
        match self.refills.as_slice() {
            [.., previous, latest] => Some(day_gap(*previous, *latest)),
            _ => None,
        }
    }
}

/// Whole days between two instants, rounded up.
///
/// The gap is measured at millisecond resolution; anything finer is dropped
/// before rounding.
pub fn day_gap(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let millis = (b - a).num_milliseconds().abs();
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Calendar date (UTC) of an instant.
pub fn utc_date(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}
