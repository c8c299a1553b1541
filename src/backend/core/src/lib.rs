#![allow(clippy::result_large_err)]
//! # Inkledger Core
//!
//! Lifecycle tracking for printer ink and toner units.
//!
//! ## Architecture
//!
//! - **Events**: Append-only log of install, refill, drum and dispose events
//! - **Lifecycle**: Status transition applied to a unit for each event
//! - **Dashboard**: Per-unit refill and drum statistics folded from the log
//! - **Store**: Storage traits with in-memory and Postgres backends
//! - **API**: REST endpoints over the inventory service
//! - **Telemetry**: Structured logging and Prometheus metrics
//! - **Validation**: Field-level request validation

pub mod api;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod events;
pub mod inventory;
pub mod lifecycle;
pub mod seed;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use error::{ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, InkError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::dashboard::{compute_dashboard, UnitSummary};
    pub use crate::error::{ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, InkError, Result};
    pub use crate::events::{Aggregate, EventId, EventKind, LifecycleEvent, NewEvent, UnitHistory};
    pub use crate::inventory::{
        CreateUnitRequest, InkCatalogEntry, InkType, InkUnit, Printer, UnitPatch, UnitStatus,
    };
    pub use crate::seed::SeedData;
    pub use crate::service::{DeletedUnit, InventoryService, RecordedEvent};
    pub use crate::store::{Catalog, EventStore, InMemoryStore, InventoryStore, UnitRegistry};
    pub use crate::validation::{
        validate_field, Validate, ValidationErrorKind, ValidationErrors, ValidationResult,
    };
}
