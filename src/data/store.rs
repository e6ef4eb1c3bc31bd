use chrono::{NaiveDate, NaiveDateTime};

use super::error::DataError;
use super::filter::DateRange;
use super::model::{RawSample, SampleDate, SampleRecord};
use super::thresholds;

// ---------------------------------------------------------------------------
// Threshold percentage rounding
// ---------------------------------------------------------------------------

/// Round a threshold percentage for display.
///
/// * `None` stays `None`.
/// * Values above 1 keep two decimal places.
/// * Values in `(0, 1)` keep two significant digits.
/// * Everything else (1, 0, negatives) is returned unchanged.
pub fn custom_round(value: Option<f64>) -> Option<f64> {
    let x = value?;
    if x > 1.0 {
        Some(round_to(x, 2))
    } else if x > 0.0 && x < 1.0 {
        let exponent = x.log10().floor() as i32;
        Some(round_to(x, 1 - exponent))
    } else {
        Some(x)
    }
}

/// Round half away from zero to `decimals` places.
///
/// Divides by the power of ten so the result is the nearest `f64` to the
/// decimal value (`46.0 / 1e5 == 0.00046`).
fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    // Subnormal inputs need more decimals than an f64 scale can hold.
    if !scale.is_finite() {
        return x;
    }
    (x * scale).round() / scale
}

/// Percentage of the applicable threshold, rounded; `None` when the pair has no threshold.
pub fn threshold_pct(sample_type: &str, parameter: &str, concentration: f64) -> Option<f64> {
    let limit = thresholds::threshold(sample_type, parameter)?;
    custom_round(Some(concentration / limit * 100.0))
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a sample date; any time-of-day part is dropped.
pub fn parse_sample_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    None
}

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

/// The normalised sample table, loaded once per dataset.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<SampleRecord>,
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl RecordStore {
    /// Normalise raw rows into records, keeping their order.
    pub fn load(rows: Vec<RawSample>) -> Result<Self, DataError> {
        let mut records = Vec::with_capacity(rows.len());

        for (row, raw) in rows.into_iter().enumerate() {
            let parsed = match &raw.sample_date {
                SampleDate::Day(day) => Some(*day),
                SampleDate::Text(text) => parse_sample_date(text),
            };
            let sample_date = parsed.ok_or_else(|| DataError::InvalidDate {
                row,
                value: raw.sample_date.to_string(),
            })?;

            if !raw.concentration.is_finite() {
                return Err(DataError::InvalidConcentration {
                    row,
                    value: raw.concentration,
                });
            }

            let threshold_pct = threshold_pct(&raw.sample_type, &raw.parameter, raw.concentration);

            records.push(SampleRecord {
                town: raw.town,
                sample_date,
                parameter: raw.parameter,
                sample_type: raw.sample_type,
                concentration: raw.concentration,
                units: raw.units,
                threshold_pct,
                current_site_name: raw.current_site_name,
                treatment_status: raw.ts,
            });
        }

        let min_date = records.iter().map(|r| r.sample_date).min().ok_or(DataError::Empty)?;
        let max_date = records.iter().map(|r| r.sample_date).max().ok_or(DataError::Empty)?;

        let without_threshold = records.iter().filter(|r| r.threshold_pct.is_none()).count();
        log::debug!(
            "{} of {} records have no threshold for their sample type/chemical",
            without_threshold,
            records.len()
        );

        Ok(RecordStore {
            records,
            min_date,
            max_date,
        })
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    /// The range covering every record; the initial date filter.
    pub fn full_range(&self) -> DateRange {
        DateRange::new(self.min_date, self.max_date)
    }

    /// Number of distinct towns in the table.
    pub fn town_count(&self) -> usize {
        let mut towns: Vec<&str> = self.records.iter().map(|r| r.town.as_str()).collect();
        towns.sort_unstable();
        towns.dedup();
        towns.len()
    }
}
