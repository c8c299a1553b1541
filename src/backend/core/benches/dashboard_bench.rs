//! Benchmarks for dashboard aggregation.
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use inkledger_core::dashboard::compute_dashboard;
use inkledger_core::events::{Aggregate, EventKind, LifecycleEvent, NewEvent, UnitHistory};
use inkledger_core::inventory::{InkUnit, UnitStatus};
use inkledger_core::seed::SeedData;
use inkledger_core::store::{EventStore, InMemoryStore, UnitRegistry};

const PRINTER: &str = "VP-HANOI-01";

fn unit_events(unit_id: &str, count: usize) -> Vec<LifecycleEvent> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let kind = if i % 5 == 4 { EventKind::DrumReplace } else { EventKind::Refill };
            LifecycleEvent::at(start + Duration::days(i as i64 * 3), NewEvent::new(unit_id, PRINTER, kind))
        })
        .collect()
}

fn populated_store(rt: &tokio::runtime::Runtime, units: usize, events_per_unit: usize) -> InMemoryStore {
    let store = InMemoryStore::with_seed(&SeedData::demo());
    rt.block_on(async {
        for n in 0..units {
            let mut unit = InkUnit::new(format!("BENCH-{:05}", n), "TNR-HP80A");
            if n % 2 == 0 {
                unit = unit.installed_in(PRINTER);
            }
            store.insert_unit(unit.clone()).await.unwrap();
            for event in unit_events(&unit.unit_id, events_per_unit) {
                store.append(event).await.unwrap();
            }
        }
    });
    store
}

fn bench_history_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_replay");
    for count in [10, 100, 1_000] {
        let events = unit_events("HP80A-STOCK-001", count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &events, |b, events| {
            b.iter(|| {
                let history = UnitHistory::replay(events.iter());
                black_box((history.refills_after_drum(), history.refill_cycle_days()))
            });
        });
    }
    group.finish();
}

fn bench_compute_dashboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_dashboard");
    let rt = tokio::runtime::Runtime::new().unwrap();
    for units in [10, 100, 500] {
        let store = populated_store(&rt, units, 20);
        group.throughput(Throughput::Elements(units as u64));
        group.bench_with_input(BenchmarkId::from_parameter(units), &store, |b, store| {
            b.iter(|| black_box(rt.block_on(compute_dashboard(store)).unwrap()));
        });
    }
    group.finish();
}

fn bench_status_filter(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = populated_store(&rt, 500, 0);
    c.bench_function("list_active_units", |b| {
        b.iter(|| black_box(rt.block_on(store.list_units(&UnitStatus::ACTIVE)).unwrap()));
    });
}

criterion_group!(benches, bench_history_replay, bench_compute_dashboard, bench_status_filter);
criterion_main!(benches);
