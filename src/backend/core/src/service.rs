//! Inventory service: the one place business rules run.
//!
//! The HTTP layer and tests call into [`InventoryService`]; stores never see
//! a request that has not been validated here first.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::dashboard::{compute_dashboard, UnitSummary};
use crate::error::{InkError, Result};
use crate::events::{EventId, EventKind, LifecycleEvent, NewEvent};
use crate::inventory::{CreateUnitRequest, InkCatalogEntry, InkUnit, Printer, UnitPatch, UnitStatus};
use crate::lifecycle;
use crate::seed::SeedData;
use crate::store::{InMemoryStore, InventoryStore};
use crate::telemetry::InventoryMetrics;
use crate::validation::Validate;

/// Result of recording an event: the stored event and the unit after it.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedEvent {
    pub event: LifecycleEvent,
    pub unit: InkUnit,
}

/// Unit deletion outcome.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeletedUnit {
    pub events_removed: u64,
}

#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// A service over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn InventoryStore> {
        &self.store
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════════

    /// Append an event and apply its transition to the unit.
    ///
    /// The two writes are not atomic; with concurrent writers on the same
    /// unit the last status write wins.
    #[instrument(skip(self, new), fields(unit_id = %new.unit_id, event_kind = %new.kind))]
    pub async fn record_event(&self, new: NewEvent) -> Result<RecordedEvent> {
        new.validate()?;
        self.record(LifecycleEvent::record(new)).await
    }

    /// Like [`record_event`](Self::record_event) but with a caller-chosen
    /// timestamp. Used to backfill history.
    pub async fn record_event_at(
        &self,
        timestamp: chrono::DateTime<chrono::Utc>,
        new: NewEvent,
    ) -> Result<RecordedEvent> {
        new.validate()?;
        self.record(LifecycleEvent::at(timestamp, new)).await
    }

    async fn record(&self, event: LifecycleEvent) -> Result<RecordedEvent> {
        let unit = self.get_unit(&event.unit_id).await?;

        if event.kind == EventKind::Install
            && self.store.get_printer(&event.printer_id).await?.is_none()
        {
            return Err(InkError::printer_not_found(&event.printer_id));
        }

        let event = self.store.append(event).await?;
        let unit = if event.kind.changes_status() {
            self.store
                .update_unit(lifecycle::transition(&unit, &event))
                .await?
        } else {
            unit
        };

        InventoryMetrics::event_recorded(event.kind.as_str());
        info!(event_id = %event.id, status = %unit.status, "Event recorded");

        Ok(RecordedEvent { event, unit })
    }

    /// A unit's events, oldest first. Empty for unknown units.
    pub async fn unit_history(&self, unit_id: &str) -> Result<Vec<LifecycleEvent>> {
        self.store.list_by_unit(unit_id).await
    }

    /// Every event, newest first.
    pub async fn list_events(&self) -> Result<Vec<LifecycleEvent>> {
        self.store.list_all().await
    }

    /// Administrative delete. Unit status is not recomputed.
    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: EventId) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(InkError::event_not_found(id));
        }
        warn!(event_id = %id, "Event deleted; unit state left as is");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Units
    // ═══════════════════════════════════════════════════════════════════════

    #[instrument(skip(self, request), fields(unit_id = %request.unit_id))]
    pub async fn create_unit(&self, request: CreateUnitRequest) -> Result<InkUnit> {
        request.validate()?;
        let unit = self.store.insert_unit(request.into_unit()).await?;
        InventoryMetrics::unit_created();
        info!(status = %unit.status, "Unit created");
        Ok(unit)
    }

    pub async fn get_unit(&self, unit_id: &str) -> Result<InkUnit> {
        self.store
            .get_unit(unit_id)
            .await?
            .ok_or_else(|| InkError::unit_not_found(unit_id))
    }

    /// Units in any of `statuses`; in-stock and installed when empty.
    pub async fn list_units(&self, statuses: &[UnitStatus]) -> Result<Vec<InkUnit>> {
        if statuses.is_empty() {
            return self.store.list_units(&UnitStatus::ACTIVE).await;
        }
        self.store.list_units(statuses).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_unit(&self, unit_id: &str, patch: UnitPatch) -> Result<InkUnit> {
        let current = self.get_unit(unit_id).await?;
        let next = patch.apply_to(&current)?;
        if next == current {
            return Ok(current);
        }
        self.store.update_unit(next).await
    }

    /// Delete a unit and its whole history.
    #[instrument(skip(self))]
    pub async fn delete_unit(&self, unit_id: &str) -> Result<DeletedUnit> {
        let events_removed = self
            .store
            .delete_unit_cascade(unit_id)
            .await?
            .ok_or_else(|| InkError::unit_not_found(unit_id))?;

        InventoryMetrics::unit_deleted(events_removed);
        info!(events_removed, "Unit deleted");
        Ok(DeletedUnit { events_removed })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Catalog
    // ═══════════════════════════════════════════════════════════════════════

    pub async fn list_inks(&self) -> Result<Vec<InkCatalogEntry>> {
        self.store.list_inks().await
    }

    pub async fn get_ink(&self, code: &str) -> Result<InkCatalogEntry> {
        self.store
            .get_ink(code)
            .await?
            .ok_or_else(|| InkError::ink_not_found(code))
    }

    pub async fn list_printers(&self) -> Result<Vec<Printer>> {
        self.store.list_printers().await
    }

    pub async fn get_printer(&self, printer_id: &str) -> Result<Printer> {
        self.store
            .get_printer(printer_id)
            .await?
            .ok_or_else(|| InkError::printer_not_found(printer_id))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Dashboard & admin
    // ═══════════════════════════════════════════════════════════════════════

    pub async fn dashboard(&self) -> Result<Vec<UnitSummary>> {
        compute_dashboard(self.store.as_ref()).await
    }

    /// Replace everything with the demo data set.
    #[instrument(skip(self))]
    pub async fn seed_demo(&self) -> Result<SeedData> {
        let seed = SeedData::demo();
        self.store.replace_all(&seed).await?;
        info!(
            inks = seed.inks.len(),
            printers = seed.printers.len(),
            units = seed.units.len(),
            "Demo data loaded"
        );
        Ok(seed)
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    async fn seeded() -> InventoryService {
        let service = InventoryService::in_memory();
        service.seed_demo().await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_record_unknown_unit() {
        let service = seeded().await;
        let err = service
            .record_event(NewEvent::new("NOPE", "VP-HANOI-01", EventKind::Refill))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnitNotFound);
        assert!(service.list_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_requires_known_printer() {
        let service = seeded().await;
        let err = service
            .record_event(NewEvent::new("HP80A-STOCK-001", "VP-NOWHERE", EventKind::Install))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PrinterNotFound);
        assert!(service.unit_history("HP80A-STOCK-001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_printer_rejected_before_store() {
        let service = seeded().await;
        let err = service
            .record_event(NewEvent::new("HP80A-STOCK-001", " ", EventKind::Refill))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingRequiredField);
        assert!(service.list_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_updates_unit() {
        let service = seeded().await;
        let recorded = service
            .record_event(NewEvent::new("HP80A-STOCK-002", "VP-HCM-03", EventKind::Install))
            .await
            .unwrap();

        assert_eq!(recorded.unit.status, UnitStatus::Installed);
        let stored = service.get_unit("HP80A-STOCK-002").await.unwrap();
        assert_eq!(stored.current_printer_id.as_deref(), Some("VP-HCM-03"));
    }

    #[tokio::test]
    async fn test_list_units_defaults_to_active() {
        let service = seeded().await;
        service
            .record_event(NewEvent::new("C746-STOCK-001", "VP-HCM-03", EventKind::Dispose))
            .await
            .unwrap();

        let active = service.list_units(&[]).await.unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|u| u.status.is_active()));

        let disposed = service.list_units(&[UnitStatus::Disposed]).await.unwrap();
        assert_eq!(disposed.len(), 1);
        assert_eq!(disposed[0].unit_id, "C746-STOCK-001");
    }

    #[tokio::test]
    async fn test_delete_event_does_not_reconcile() {
        let service = seeded().await;
        let recorded = service
            .record_event(NewEvent::new("HP80A-STOCK-001", "VP-HANOI-01", EventKind::Install))
            .await
            .unwrap();

        service.delete_event(recorded.event.id).await.unwrap();

        let unit = service.get_unit("HP80A-STOCK-001").await.unwrap();
        assert_eq!(unit.status, UnitStatus::Installed);
        assert!(service.unit_history("HP80A-STOCK-001").await.unwrap().is_empty());

        let err = service.delete_event(recorded.event.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::EventNotFound);
    }

    #[tokio::test]
    async fn test_update_unit_patch() {
        let service = seeded().await;
        let patch: UnitPatch =
            serde_json::from_str(r#"{"status":"IN_STOCK","custom_name":"Back on the shelf"}"#)
                .unwrap();

        let unit = service.update_unit("HP80A-INSTALLED-001", patch).await.unwrap();
        assert_eq!(unit.status, UnitStatus::InStock);
        assert!(unit.current_printer_id.is_none());
        assert_eq!(unit.custom_name.as_deref(), Some("Back on the shelf"));

        let err = service
            .update_unit("NOPE", UnitPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnitNotFound);
    }

    #[tokio::test]
    async fn test_delete_unknown_unit() {
        let service = seeded().await;
        let err = service.delete_unit("NOPE").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnitNotFound);
    }

    #[tokio::test]
    async fn test_catalog_lookups() {
        let service = seeded().await;
        assert_eq!(service.get_ink("INK-C746").await.unwrap().name, "Canon Color Cartridge 746");
        assert_eq!(
            service.get_ink("INK-404").await.unwrap_err().code(),
            ErrorCode::InkNotFound
        );
        assert_eq!(service.list_printers().await.unwrap().len(), 2);
        assert_eq!(
            service.get_printer("VP-404").await.unwrap_err().code(),
            ErrorCode::PrinterNotFound
        );
    }
}
