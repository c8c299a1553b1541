//! In-memory backend.
//!
//! Everything lives behind one `parking_lot::RwLock`, so each trait call is
//! atomic on its own. Suitable for tests, demos and single-node use.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use super::{Catalog, EventStore, InventoryStore, UnitRegistry};
use crate::error::{InkError, Result};
use crate::events::{EventId, LifecycleEvent};
use crate::inventory::{InkCatalogEntry, InkUnit, Printer, UnitStatus};
use crate::seed::SeedData;

#[derive(Debug, Default)]
struct State {
    /// Append order.
    events: Vec<LifecycleEvent>,
    units: BTreeMap<String, InkUnit>,
    inks: BTreeMap<String, InkCatalogEntry>,
    printers: BTreeMap<String, Printer>,
}

/// Process-local inventory storage.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with `seed`.
    pub fn with_seed(seed: &SeedData) -> Self {
        let store = Self::new();
        store.load(seed);
        store
    }

    fn load(&self, seed: &SeedData) {
        let mut state = self.state.write();
        *state = State::default();
        state.inks = seed
            .inks
            .iter()
            .map(|ink| (ink.code.clone(), ink.clone()))
            .collect();
        state.printers = seed
            .printers
            .iter()
            .map(|p| (p.printer_id.clone(), p.clone()))
            .collect();
        state.units = seed
            .units
            .iter()
            .map(|u| (u.unit_id.clone(), u.clone()))
            .collect();
    }

    pub fn event_count(&self) -> usize {
        self.state.read().events.len()
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    #[instrument(skip(self, event), fields(unit_id = %event.unit_id, event_kind = %event.kind))]
    async fn append(&self, event: LifecycleEvent) -> Result<LifecycleEvent> {
        self.state.write().events.push(event.clone());
        debug!(event_id = %event.id, "Event appended");
        Ok(event)
    }

    async fn list_by_unit(&self, unit_id: &str) -> Result<Vec<LifecycleEvent>> {
        let mut events: Vec<LifecycleEvent> = self
            .state
            .read()
            .events
            .iter()
            .filter(|e| e.unit_id == unit_id)
            .cloned()
            .collect();
        // stable: ties stay in append order
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }

    async fn list_all(&self) -> Result<Vec<LifecycleEvent>> {
        let mut events = self.state.read().events.clone();
        events.reverse();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: EventId) -> Result<bool> {
        let mut state = self.state.write();
        let before = state.events.len();
        state.events.retain(|e| e.id != id);
        Ok(state.events.len() != before)
    }

    #[instrument(skip(self))]
    async fn delete_all_for_unit(&self, unit_id: &str) -> Result<u64> {
        let mut state = self.state.write();
        let before = state.events.len();
        state.events.retain(|e| e.unit_id != unit_id);
        Ok((before - state.events.len()) as u64)
    }
}

#[async_trait]
impl UnitRegistry for InMemoryStore {
    #[instrument(skip(self, unit), fields(unit_id = %unit.unit_id))]
    async fn insert_unit(&self, unit: InkUnit) -> Result<InkUnit> {
        let mut state = self.state.write();
        if state.units.contains_key(&unit.unit_id) {
            return Err(InkError::unit_already_exists(&unit.unit_id));
        }
        state.units.insert(unit.unit_id.clone(), unit.clone());
        Ok(unit)
    }

    async fn get_unit(&self, unit_id: &str) -> Result<Option<InkUnit>> {
        Ok(self.state.read().units.get(unit_id).cloned())
    }

    async fn list_units(&self, statuses: &[UnitStatus]) -> Result<Vec<InkUnit>> {
        Ok(self
            .state
            .read()
            .units
            .values()
            .filter(|u| statuses.contains(&u.status))
            .cloned()
            .collect())
    }

    #[instrument(skip(self, unit), fields(unit_id = %unit.unit_id))]
    async fn update_unit(&self, unit: InkUnit) -> Result<InkUnit> {
        let mut state = self.state.write();
        match state.units.get_mut(&unit.unit_id) {
            Some(slot) => {
                *slot = unit.clone();
                Ok(unit)
            }
            None => Err(InkError::unit_not_found(&unit.unit_id)),
        }
    }

    async fn remove_unit(&self, unit_id: &str) -> Result<bool> {
        Ok(self.state.write().units.remove(unit_id).is_some())
    }
}

#[async_trait]
impl Catalog for InMemoryStore {
    async fn get_ink(&self, code: &str) -> Result<Option<InkCatalogEntry>> {
        Ok(self.state.read().inks.get(code).cloned())
    }

    async fn list_inks(&self) -> Result<Vec<InkCatalogEntry>> {
        Ok(self.state.read().inks.values().cloned().collect())
    }

    async fn get_printer(&self, printer_id: &str) -> Result<Option<Printer>> {
        Ok(self.state.read().printers.get(printer_id).cloned())
    }

    async fn list_printers(&self) -> Result<Vec<Printer>> {
        Ok(self.state.read().printers.values().cloned().collect())
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    async fn replace_all(&self, seed: &SeedData) -> Result<()> {
        self.load(seed);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
