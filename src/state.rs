use std::time::{Duration, Instant};

use crate::data::aggregate::TownReadings;
use crate::data::filter::{DateRange, FilterSelection, all_chemicals, default_selection};
use crate::data::store::RecordStore;
use crate::data::thresholds::SampleType;
use crate::data::town_readings;
use crate::debounce::Debouncer;
use crate::geo::TownBoundaries;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The filters the pipeline runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    pub selection: FilterSelection,
    pub range: DateRange,
}

/// The full UI state, independent of rendering.
///
/// Widgets edit `selection` and `date_range` directly and then call
/// [`AppState::filters_changed`]; the frame loop calls [`AppState::poll`]
/// so the pipeline only runs once the inputs have settled.
pub struct AppState {
    /// Loaded samples (None until a table is loaded).
    pub store: Option<RecordStore>,

    /// Town polygons for the map (None → table view).
    pub towns: Option<TownBoundaries>,

    /// Live checkbox state.
    pub selection: FilterSelection,

    /// Live date-picker state.
    pub date_range: Option<DateRange>,

    /// Latest edit waiting for the inputs to settle.
    pending: Debouncer<FilterQuery>,

    /// Filters of the last computed result.
    applied: Option<FilterQuery>,

    /// One reading per town for the applied filters; None → empty layer.
    pub readings: Option<TownReadings>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::debounce::DEFAULT_DEBOUNCE)
    }
}

impl AppState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            store: None,
            towns: None,
            selection: default_selection(),
            date_range: None,
            pending: Debouncer::new(debounce),
            applied: None,
            readings: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded sample table and compute the initial map.
    pub fn set_dataset(&mut self, store: RecordStore) {
        let range = store.full_range();
        self.date_range = Some(range);
        self.pending.cancel();
        self.applied = None;
        self.store = Some(store);
        self.apply(FilterQuery {
            selection: self.selection.clone(),
            range,
        });
        self.status_message = None;
    }

    pub fn set_towns(&mut self, towns: TownBoundaries) {
        self.towns = Some(towns);
        self.status_message = None;
    }

    /// Bounds for the date picker: the dataset's first and last sample dates.
    pub fn date_bounds(&self) -> Option<DateRange> {
        self.store.as_ref().map(RecordStore::full_range)
    }

    /// Record that the widgets changed; recomputation waits for the debounce.
    pub fn filters_changed(&mut self, now: Instant) {
        let Some(range) = self.date_range else {
            return;
        };
        self.pending.submit(
            FilterQuery {
                selection: self.selection.clone(),
                range,
            },
            now,
        );
    }

    /// Toggle a single chemical in a sample type's selection.
    pub fn toggle_chemical(&mut self, sample_type: SampleType, chemical: &str, now: Instant) {
        let selected = self.selection.entry(sample_type).or_default();
        if !selected.remove(chemical) {
            selected.insert(chemical.to_string());
        }
        self.filters_changed(now);
    }

    /// Select every chemical of a sample type.
    pub fn select_all(&mut self, sample_type: SampleType, now: Instant) {
        self.selection.insert(sample_type, all_chemicals(sample_type));
        self.filters_changed(now);
    }

    /// Deselect every chemical of a sample type.
    pub fn select_none(&mut self, sample_type: SampleType, now: Instant) {
        self.selection.entry(sample_type).or_default().clear();
        self.filters_changed(now);
    }

    /// Set the date range, clamped to the dataset's dates.
    pub fn set_date_range(&mut self, range: DateRange, now: Instant) {
        let range = match self.date_bounds() {
            Some(bounds) => range.clamped_to(&bounds),
            None => range,
        };
        self.date_range = Some(range);
        self.filters_changed(now);
    }

    /// Run the pipeline if a settled edit is due. Returns whether it ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.poll(now) {
            Some(query) => {
                self.apply(query);
                true
            }
            None => false,
        }
    }

    /// Time until the pending edit is due, for scheduling a repaint.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.pending.remaining(now)
    }

    /// Quiet period applied to filter edits.
    pub fn debounce_delay(&self) -> Duration {
        self.pending.delay()
    }

    /// True while an edit is waiting to settle.
    pub fn is_settling(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn applied(&self) -> Option<&FilterQuery> {
        self.applied.as_ref()
    }

    fn apply(&mut self, query: FilterQuery) {
        if self.applied.as_ref() == Some(&query) {
            return;
        }
        if let Some(store) = &self.store {
            self.readings = town_readings(store, &query.selection, &query.range);
        }
        self.applied = Some(query);
    }
}
