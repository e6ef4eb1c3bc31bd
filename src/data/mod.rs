/// Data layer: threshold registry, loading, filtering and per-town reduction.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawSample>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  dates, % of threshold (thresholds) → RecordStore
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  chemical selection per sample type + date range
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  max % of threshold per town → TownReadings
///   └───────────┘
/// ```
pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod store;
pub mod thresholds;

use std::time::Instant;

use aggregate::TownReadings;
use filter::{DateRange, FilterSelection};
use store::RecordStore;

/// Run the whole reduction for the current filters.
///
/// Returns `None` when no town qualifies (the map shows an empty layer).
pub fn town_readings(
    store: &RecordStore,
    selection: &FilterSelection,
    range: &DateRange,
) -> Option<TownReadings> {
    let started = Instant::now();
    let filtered = filter::filter_records(store.records(), selection, range);
    let n_filtered = filtered.len();
    let readings = aggregate::aggregate(filtered);
    log::debug!(
        "pipeline: {} of {} records pass filters, {} towns, {:?}",
        n_filtered,
        store.len(),
        readings.as_ref().map_or(0, |r| r.len()),
        started.elapsed()
    );
    readings
}
