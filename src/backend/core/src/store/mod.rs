//! Storage abstractions.
//!
//! Three narrow traits cover the records the inventory keeps:
//!
//! - **`EventStore`**: append-only lifecycle log, no business rules
//! - **`UnitRegistry`**: units keyed by `unit_id`
//! - **`Catalog`**: read-only ink models and printers
//!
//! [`InventoryStore`] bundles them with the two operations that touch more
//! than one record type. Backends: [`InMemoryStore`] and
//! [`Database`](crate::db::Database).

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::events::{EventId, LifecycleEvent};
use crate::inventory::{InkCatalogEntry, InkUnit, Printer, UnitStatus};
use crate::seed::SeedData;

// ═══════════════════════════════════════════════════════════════════════════════
// Traits
// ═══════════════════════════════════════════════════════════════════════════════

/// Append-only log of lifecycle events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Store an event as given.
    async fn append(&self, event: LifecycleEvent) -> Result<LifecycleEvent>;

    /// A unit's events, oldest first. Equal timestamps keep append order.
    async fn list_by_unit(&self, unit_id: &str) -> Result<Vec<LifecycleEvent>>;

    /// Every event, newest first.
    async fn list_all(&self) -> Result<Vec<LifecycleEvent>>;

    /// Remove one event. Returns false if it did not exist.
    async fn delete(&self, id: EventId) -> Result<bool>;

    /// Remove all of a unit's events, returning how many went.
    async fn delete_all_for_unit(&self, unit_id: &str) -> Result<u64>;
}

/// Ink units keyed by `unit_id`.
#[async_trait]
pub trait UnitRegistry: Send + Sync {
    /// Insert a new unit. Fails with `UnitAlreadyExists` on a taken id and
    /// leaves the stored unit untouched.
    async fn insert_unit(&self, unit: InkUnit) -> Result<InkUnit>;

    async fn get_unit(&self, unit_id: &str) -> Result<Option<InkUnit>>;

    /// Units whose status is in `statuses`, ordered by id.
    async fn list_units(&self, statuses: &[UnitStatus]) -> Result<Vec<InkUnit>>;

    /// Overwrite an existing unit. Fails with `UnitNotFound` if absent.
    async fn update_unit(&self, unit: InkUnit) -> Result<InkUnit>;

    /// Returns false if the unit did not exist.
    async fn remove_unit(&self, unit_id: &str) -> Result<bool>;
}

/// Read-only reference data.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn get_ink(&self, code: &str) -> Result<Option<InkCatalogEntry>>;

    async fn list_inks(&self) -> Result<Vec<InkCatalogEntry>>;

    async fn get_printer(&self, printer_id: &str) -> Result<Option<Printer>>;

    async fn list_printers(&self) -> Result<Vec<Printer>>;
}

/// Everything the inventory service needs from storage.
#[async_trait]
pub trait InventoryStore: EventStore + UnitRegistry + Catalog {
    /// Delete a unit's events, then the unit.
    ///
    /// Returns `None` when the unit does not exist, otherwise the number of
    /// events removed with it.
    async fn delete_unit_cascade(&self, unit_id: &str) -> Result<Option<u64>> {
        if self.get_unit(unit_id).await?.is_none() {
            return Ok(None);
        }
        let removed = self.delete_all_for_unit(unit_id).await?;
        self.remove_unit(unit_id).await?;
        Ok(Some(removed))
    }

    /// Wipe all four collections and load `seed`.
    async fn replace_all(&self, seed: &SeedData) -> Result<()>;

    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
