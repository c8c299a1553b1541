//! Unit lifecycle transition.
//!
//! | event          | status after | printer held after |
//! |----------------|--------------|--------------------|
//! | `INSTALL`      | `INSTALLED`  | the event's printer |
//! | `DISPOSE`      | `DISPOSED`   | none               |
//! | `REFILL`       | unchanged    | unchanged          |
//! | `DRUM_REPLACE` | unchanged    | unchanged          |
//!
//! Refill and drum counters are not part of the unit record; they are folded
//! from the log by [`UnitHistory`](crate::events::UnitHistory).

use crate::events::{EventKind, LifecycleEvent};
use crate::inventory::{InkUnit, UnitStatus};

/// The unit after `event` has been applied.
pub fn transition(unit: &InkUnit, event: &LifecycleEvent) -> InkUnit {
    let mut next = unit.clone();
    apply(&mut next, event);
    next
}

/// In-place form of [`transition`].
pub fn apply(unit: &mut InkUnit, event: &LifecycleEvent) {
    match event.kind {
        EventKind::Install => {
            unit.status = UnitStatus::Installed;
            unit.current_printer_id = Some(event.printer_id.clone());
        }
        EventKind::Dispose => {
            unit.status = UnitStatus::Disposed;
            unit.current_printer_id = None;
        }
        EventKind::Refill | EventKind::DrumReplace => {}
    }
}
