use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::model::SampleRecord;
use super::thresholds::SampleType;

// ---------------------------------------------------------------------------
// Filter inputs: chemical selection per sample type, and a date range
// ---------------------------------------------------------------------------

/// Per-sample-type selection state: sample type → set of selected chemicals.
/// A missing or empty set means no record of that sample type passes.
pub type FilterSelection = BTreeMap<SampleType, BTreeSet<String>>;

/// Initial selection: every drinking-water chemical, nothing else.
pub fn default_selection() -> FilterSelection {
    SampleType::ALL
        .into_iter()
        .map(|st| {
            let chems = if st == SampleType::DrinkingWater {
                all_chemicals(st)
            } else {
                BTreeSet::new()
            };
            (st, chems)
        })
        .collect()
}

/// Every chemical the registry knows for `sample_type`.
pub fn all_chemicals(sample_type: SampleType) -> BTreeSet<String> {
    sample_type
        .chemicals()
        .iter()
        .map(|(chem, _)| chem.to_string())
        .collect()
}

/// Inclusive date range. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clamp both ends into `bounds` (the dataset's observed dates).
    pub fn clamped_to(&self, bounds: &DateRange) -> DateRange {
        DateRange {
            start: self.start.clamp(bounds.start, bounds.end),
            end: self.end.clamp(bounds.start, bounds.end),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Whether the record's chemical is selected for its own sample type.
pub fn is_selected(record: &SampleRecord, selection: &FilterSelection) -> bool {
    SampleType::ALL.into_iter().any(|st| {
        record.sample_type == st.name()
            && selection
                .get(&st)
                .is_some_and(|chems| chems.contains(&record.parameter))
    })
}

/// Records inside `range` whose chemical is selected for their sample type,
/// in input order.
pub fn filter_records<'a>(
    records: &'a [SampleRecord],
    selection: &FilterSelection,
    range: &DateRange,
) -> Vec<&'a SampleRecord> {
    records
        .iter()
        .filter(|r| range.contains(r.sample_date) && is_selected(r, selection))
        .collect()
}
