//! Event sourcing for ink units.
//!
//! - **`event`**: lifecycle event types and the append request.
//! - **`aggregate`**: the `Aggregate` trait and `UnitHistory`, the per-unit
//!   statistics folded from a unit's events.

pub mod aggregate;
pub mod event;

pub use aggregate::*;
pub use event::*;
