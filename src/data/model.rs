use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RawSample – one row of the input table, as loaded
// ---------------------------------------------------------------------------

/// A row of the sample table before normalisation.
///
/// Column names follow the cleaned DEP export. Any other column (for
/// example a precomputed `threshold_pct`) is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSample {
    pub town: String,
    pub sample_date: SampleDate,
    pub parameter: String,
    pub sample_type: String,
    pub concentration: f64,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub current_site_name: String,
    /// Treatment status.
    #[serde(default)]
    pub ts: String,
}

/// The `sample_date` cell: text from CSV/JSON, or an already typed day from
/// a Parquet date or timestamp column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum SampleDate {
    Text(String),
    Day(NaiveDate),
}

impl From<String> for SampleDate {
    fn from(text: String) -> Self {
        SampleDate::Text(text)
    }
}

impl From<&str> for SampleDate {
    fn from(text: &str) -> Self {
        SampleDate::Text(text.to_string())
    }
}

impl From<NaiveDate> for SampleDate {
    fn from(day: NaiveDate) -> Self {
        SampleDate::Day(day)
    }
}

impl fmt::Display for SampleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleDate::Text(text) => f.write_str(text),
            SampleDate::Day(day) => write!(f, "{day}"),
        }
    }
}

// ---------------------------------------------------------------------------
// SampleRecord – a normalised row
// ---------------------------------------------------------------------------

/// A typed sample with its percentage of the applicable threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub town: String,
    pub sample_date: NaiveDate,
    pub parameter: String,
    pub sample_type: String,
    pub concentration: f64,
    pub units: String,
    /// `None` iff the registry has no threshold for `(sample_type, parameter)`.
    pub threshold_pct: Option<f64>,
    pub current_site_name: String,
    pub treatment_status: String,
}

impl SampleRecord {
    /// The attribute bag handed to the map for tooltips.
    pub fn attributes(&self) -> TownAttributes {
        TownAttributes {
            town: self.town.clone(),
            threshold_pct: self.threshold_pct,
            parameter: self.parameter.clone(),
            concentration: self.concentration,
            units: self.units.clone(),
            sample_type: self.sample_type.clone(),
            current_site_name: self.current_site_name.clone(),
            sample_date: self.sample_date.format("%Y-%m-%d").to_string(),
            ts: self.treatment_status.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// TownAttributes – what the renderer shows for a town
// ---------------------------------------------------------------------------

/// Display aliases for the tooltip, in the same order as [`TownAttributes::rows`].
pub const TOOLTIP_ALIASES: [&str; 9] = [
    "Town",
    "% of threshold",
    "Chemical",
    "Concentration",
    "Units",
    "Sample type",
    "Site name",
    "Date",
    "Treatment status",
];

/// Per-town properties merged onto the town geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TownAttributes {
    pub town: String,
    pub threshold_pct: Option<f64>,
    pub parameter: String,
    pub concentration: f64,
    pub units: String,
    pub sample_type: String,
    pub current_site_name: String,
    pub sample_date: String,
    pub ts: String,
}

impl TownAttributes {
    /// `(alias, value)` pairs for the tooltip grid.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let pct = match self.threshold_pct {
            Some(v) => v.to_string(),
            None => "n/a".to_string(),
        };
        let values = [
            self.town.clone(),
            pct,
            self.parameter.clone(),
            self.concentration.to_string(),
            self.units.clone(),
            self.sample_type.clone(),
            self.current_site_name.clone(),
            self.sample_date.clone(),
            self.ts.clone(),
        ];
        TOOLTIP_ALIASES.into_iter().zip(values).collect()
    }
}
