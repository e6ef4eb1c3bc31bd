use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::timezone::Tz;
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::{
    ArrowTimestampType, DataType, Date32Type, Date64Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
};
use chrono::NaiveDate;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{RawSample, SampleDate};
use super::store::RecordStore;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and normalise a sample table.
pub fn load_samples(path: &Path) -> Result<RecordStore> {
    let rows = load_file(path)?;
    let store = RecordStore::load(rows)
        .with_context(|| format!("normalising samples from {}", path.display()))?;
    log::info!(
        "Loaded {} samples for {} towns from {} ({} to {})",
        store.len(),
        store.town_count(),
        path.display(),
        store.min_date(),
        store.max_date()
    );
    Ok(store)
}

/// Read raw sample rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the sample columns (the cleaned DEP export)
/// * `.json`    – `[{ "town": ..., "sample_date": ..., ... }, ...]`
/// * `.parquet` – one column per field; dates as text, Date32/Date64 or Timestamp
pub fn load_file(path: &Path) -> Result<Vec<RawSample>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<RawSample>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize().enumerate() {
        let row: RawSample = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<RawSample>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON sample records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

const REQUIRED_COLUMNS: [&str; 5] = [
    "town",
    "sample_date",
    "parameter",
    "sample_type",
    "concentration",
];

fn load_parquet(path: &Path) -> Result<Vec<RawSample>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for name in REQUIRED_COLUMNS {
            if schema.index_of(name).is_err() {
                bail!("Parquet file missing '{name}' column");
            }
        }
        let column = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i));

        let town = column("town");
        let sample_date = column("sample_date");
        let parameter = column("parameter");
        let sample_type = column("sample_type");
        let concentration = column("concentration").context("concentration column")?;
        let units = column("units");
        let site = column("current_site_name");
        let ts = column("ts");

        for row in 0..batch.num_rows() {
            let conc = extract_f64(concentration, row)
                .with_context(|| format!("Row {row}: failed to read 'concentration'"))?;

            rows.push(RawSample {
                town: extract_string(town, row)?,
                sample_date: extract_date(sample_date, row)?,
                parameter: extract_string(parameter, row)?,
                sample_type: extract_string(sample_type, row)?,
                concentration: conc,
                units: extract_string(units, row)?,
                current_site_name: extract_string(site, row)?,
                ts: extract_string(ts, row)?,
            });
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Render a cell as text; absent columns and nulls become `""`.
fn extract_string(col: Option<&Arc<dyn Array>>, row: usize) -> Result<String> {
    match col {
        Some(col) if !col.is_null(row) => array_value_to_string(col.as_ref(), row)
            .with_context(|| format!("Row {row}: cannot render {:?} value", col.data_type())),
        _ => Ok(String::new()),
    }
}

/// Read the `sample_date` cell. Date and timestamp columns become a typed
/// day directly; anything else is rendered as text and parsed later.
///
/// Zoned timestamps take the calendar day in their own zone. Named zones
/// need `chrono-tz`, which is not enabled, so those fall back to the UTC day.
fn extract_date(col: Option<&Arc<dyn Array>>, row: usize) -> Result<SampleDate> {
    let Some(col) = col.filter(|c| !c.is_null(row)) else {
        return Ok(SampleDate::Text(String::new()));
    };

    let day = match col.data_type() {
        DataType::Date32 => col.as_primitive::<Date32Type>().value_as_date(row),
        DataType::Date64 => col.as_primitive::<Date64Type>().value_as_date(row),
        DataType::Timestamp(unit, tz) => {
            let tz = tz.as_deref().and_then(|name| name.parse::<Tz>().ok());
            match unit {
                TimeUnit::Second => timestamp_day::<TimestampSecondType>(col, row, tz),
                TimeUnit::Millisecond => timestamp_day::<TimestampMillisecondType>(col, row, tz),
                TimeUnit::Microsecond => timestamp_day::<TimestampMicrosecondType>(col, row, tz),
                TimeUnit::Nanosecond => timestamp_day::<TimestampNanosecondType>(col, row, tz),
            }
        }
        _ => return extract_string(Some(col), row).map(SampleDate::Text),
    };

    day.map(SampleDate::Day)
        .with_context(|| format!("Row {row}: {:?} value out of range", col.data_type()))
}

fn timestamp_day<T: ArrowTimestampType>(
    col: &Arc<dyn Array>,
    row: usize,
    tz: Option<Tz>,
) -> Option<NaiveDate> {
    let array = col.as_primitive::<T>();
    match tz {
        Some(tz) => array
            .value_as_datetime_with_tz(row, tz)
            .map(|dt| dt.date_naive()),
        None => array.value_as_datetime(row).map(|dt| dt.date()),
    }
}

/// Read a numeric cell as `f64`.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null concentration");
    }
    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row) as f64,
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row) as f64,
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row) as f64,
        _ => {
            let text = array_value_to_string(col.as_ref(), row)?;
            text.trim()
                .parse::<f64>()
                .with_context(|| format!("'{text}' is not a number"))?
        }
    };
    Ok(value)
}
