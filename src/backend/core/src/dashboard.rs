//! Dashboard aggregation.
//!
//! Every read rebuilds each active unit's statistics from its own event
//! stream. Nothing is cached between requests.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::time::Instant;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::events::{utc_date, Aggregate, LifecycleEvent, UnitHistory};
use crate::inventory::{InkCatalogEntry, InkUnit, Printer, UnitStatus};
use crate::store::{Catalog, EventStore, UnitRegistry};
use crate::telemetry::InventoryMetrics;

/// Printer column for units that are not in a printer.
pub const IN_STORAGE: &str = "in storage";

/// Placeholder for statistics that cannot be computed yet.
pub const NOT_AVAILABLE: &str = "N/A";

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSummary {
    pub unit_id: String,
    pub ink_code: String,
    pub display_name: String,
    pub status: UnitStatus,
    pub printer: String,
    #[serde(serialize_with = "date_or_na")]
    pub latest_refill_date: Option<NaiveDate>,
    pub total_refill_count: usize,
    #[serde(serialize_with = "date_or_na")]
    pub latest_drum_date: Option<NaiveDate>,
    pub total_drum_count: usize,
    pub refills_after_drum: usize,
    #[serde(serialize_with = "days_or_na")]
    pub avg_refill_cycle: Option<i64>,
}

fn date_or_na<S>(value: &Option<NaiveDate>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}

fn days_or_na<S>(value: &Option<i64>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(days) => serializer.serialize_i64(*days),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}

impl UnitSummary {
    /// Build a row from a unit, its events and whatever reference records
    /// could be resolved.
    pub fn build(
        unit: &InkUnit,
        events: &[LifecycleEvent],
        ink: Option<&InkCatalogEntry>,
        printer: Option<&Printer>,
    ) -> Self {
        let history = UnitHistory::replay(events.iter().filter(|e| e.unit_id == unit.unit_id));

        Self {
            unit_id: unit.unit_id.clone(),
            ink_code: unit.ink_code.clone(),
            display_name: display_name(unit, ink),
            status: unit.status,
            printer: printer_display(unit, printer),
            latest_refill_date: history.latest_refill().map(utc_date),
            total_refill_count: history.total_refill_count(),
            latest_drum_date: history.latest_drum().map(utc_date),
            total_drum_count: history.total_drum_count(),
            refills_after_drum: history.refills_after_drum(),
            avg_refill_cycle: history.refill_cycle_days(),
        }
    }
}

/// Custom name, else catalog name, else the raw ink code.
pub fn display_name(unit: &InkUnit, ink: Option<&InkCatalogEntry>) -> String {
    [
        unit.custom_name.as_deref(),
        ink.map(|i| i.name.as_str()),
        Some(unit.ink_code.as_str()),
    ]
    .into_iter()
    .flatten()
    .find(|s| !s.trim().is_empty())
    .unwrap_or_default()
    .to_string()
}

/// Printer name, raw printer id if the printer record is gone, or
/// [`IN_STORAGE`].
pub fn printer_display(unit: &InkUnit, printer: Option<&Printer>) -> String {
    match (&unit.current_printer_id, printer) {
        (Some(_), Some(p)) => p.name.clone(),
        (Some(id), None) => id.clone(),
        (None, _) => IN_STORAGE.to_string(),
    }
}

/// Summaries for every in-stock or installed unit, ordered by unit id.
#[instrument(skip(store))]
pub async fn compute_dashboard<S>(store: &S) -> Result<Vec<UnitSummary>>
where
    S: EventStore + UnitRegistry + Catalog + ?Sized,
{
    let started = Instant::now();
    let units = store.list_units(&UnitStatus::ACTIVE).await?;

    let mut summaries = Vec::with_capacity(units.len());
    for unit in &units {
        let events = store.list_by_unit(&unit.unit_id).await?;
        let ink = store.get_ink(&unit.ink_code).await?;
        let printer = match &unit.current_printer_id {
            Some(id) => store.get_printer(id).await?,
            None => None,
        };
        summaries.push(UnitSummary::build(unit, &events, ink.as_ref(), printer.as_ref()));
    }
    summaries.sort_by(|a, b| a.unit_id.cmp(&b.unit_id));

    let elapsed = started.elapsed();
    InventoryMetrics::dashboard_built(elapsed, summaries.len());
    debug!(units = summaries.len(), elapsed_ms = elapsed.as_millis() as u64, "Dashboard rebuilt");

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, NewEvent};
    use crate::inventory::InkType;
    use chrono::{Duration, TimeZone, Utc};

    fn ink() -> InkCatalogEntry {
        InkCatalogEntry::new("TNR-HP80A", "HP Black Toner 80A", InkType::Toner)
    }

    fn event(kind: EventKind, day: i64) -> LifecycleEvent {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        LifecycleEvent::at(
            base + Duration::days(day),
            NewEvent::new("U-1", "VP-HANOI-01", kind),
        )
    }

    #[test]
    fn test_display_name_fallbacks() {
        let unit = InkUnit::new("U-1", "TNR-HP80A");
        assert_eq!(display_name(&unit, Some(&ink())), "HP Black Toner 80A");
        assert_eq!(display_name(&unit, None), "TNR-HP80A");

        let named = unit.clone().with_custom_name("Spare for accounting");
        assert_eq!(display_name(&named, Some(&ink())), "Spare for accounting");

        let blank = unit.with_custom_name("");
        assert_eq!(display_name(&blank, Some(&ink())), "HP Black Toner 80A");
    }

    #[test]
    fn test_printer_display() {
        let stocked = InkUnit::new("U-1", "TNR-HP80A");
        assert_eq!(printer_display(&stocked, None), IN_STORAGE);

        let installed = stocked.installed_in("VP-HANOI-01");
        let printer = Printer::new("VP-HANOI-01", "Laser P2055dn (Hanoi)");
        assert_eq!(printer_display(&installed, Some(&printer)), "Laser P2055dn (Hanoi)");
        assert_eq!(printer_display(&installed, None), "VP-HANOI-01");
    }

    #[test]
    fn test_summary_serializes_sentinels() {
        let unit = InkUnit::new("U-1", "TNR-HP80A");
        let summary = UnitSummary::build(&unit, &[], Some(&ink()), None);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["latest_refill_date"], "N/A");
        assert_eq!(json["latest_drum_date"], "N/A");
        assert_eq!(json["avg_refill_cycle"], "N/A");
        assert_eq!(json["total_refill_count"], 0);
        assert_eq!(json["printer"], IN_STORAGE);
        assert_eq!(json["status"], "IN_STOCK");
    }

    #[test]
    fn test_summary_serializes_values() {
        let unit = InkUnit::new("U-1", "TNR-HP80A");
        let events = [
            event(EventKind::Refill, 0),
            event(EventKind::DrumReplace, 2),
            event(EventKind::Refill, 5),
        ];
        let summary = UnitSummary::build(&unit, &events, None, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["latest_refill_date"], "2024-05-06");
        assert_eq!(json["latest_drum_date"], "2024-05-03");
        assert_eq!(json["avg_refill_cycle"], 5);
        assert_eq!(json["refills_after_drum"], 1);
    }

    #[test]
    fn test_build_ignores_other_units_events() {
        let unit = InkUnit::new("U-2", "TNR-HP80A");
        let events = [event(EventKind::Refill, 0)];
        let summary = UnitSummary::build(&unit, &events, None, None);
        assert_eq!(summary.total_refill_count, 0);
    }
}
