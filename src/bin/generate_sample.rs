use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use pfas_map::data::thresholds::SampleType;
use serde::Serialize;
use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

#[derive(Serialize)]
struct SampleRow {
    town: String,
    sample_date: String,
    parameter: String,
    sample_type: String,
    concentration: f64,
    units: String,
    current_site_name: String,
    ts: String,
}

/// Towns laid out on a grid of 0.25° cells over central Maine.
const TOWNS: [&str; 16] = [
    "Fairfield",
    "Unity",
    "Skowhegan",
    "Oakland",
    "Waterville",
    "Clinton",
    "Benton",
    "Albion",
    "Augusta",
    "Belgrade",
    "Sidney",
    "Winslow",
    "Gardiner",
    "Hallowell",
    "Vassalboro",
    "China",
];
const GRID_COLS: usize = 4;
const ORIGIN: [f64; 2] = [-70.0, 44.2];
const CELL: f64 = 0.25;

const SITES: [&str; 4] = ["Residence", "Dairy Farm", "Field", "Pond"];
const TREATMENT: [&str; 3] = ["Untreated", "Treated", ""];

fn town_geojson() -> serde_json::Value {
    let features: Vec<serde_json::Value> = TOWNS
        .iter()
        .enumerate()
        .map(|(i, town)| {
            let x0 = ORIGIN[0] + (i % GRID_COLS) as f64 * CELL;
            let y0 = ORIGIN[1] + (i / GRID_COLS) as f64 * CELL;
            json!({
                "type": "Feature",
                "properties": { "TOWN": town },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [x0, y0], [x0 + CELL, y0], [x0 + CELL, y0 + CELL],
                        [x0, y0 + CELL], [x0, y0]
                    ]]
                }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

fn generate_rows(rng: &mut SimpleRng, n: usize) -> Vec<SampleRow> {
    let first_day = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default();
    let mut rows = Vec::with_capacity(n);

    for i in 0..n {
        let sample_type = *rng.pick(&SampleType::ALL);
        let &(parameter, threshold) = rng.pick(sample_type.chemicals());
        // Log-uniform between 1% and ~3000% of the threshold.
        let pct = 10f64.powf(rng.next_f64() * 3.5);
        let concentration = (threshold * pct / 100.0 * 1000.0).round() / 1000.0;
        let date = first_day + Duration::days(rng.below(5 * 365) as i64);

        rows.push(SampleRow {
            town: rng.pick(&TOWNS).to_string(),
            sample_date: date.format("%Y-%m-%d").to_string(),
            parameter: parameter.to_string(),
            sample_type: sample_type.name().to_string(),
            concentration,
            units: sample_type.unit().to_string(),
            current_site_name: format!("{} {}", rng.pick(&SITES), i % 50),
            ts: rng.pick(&TREATMENT).to_string(),
        });
    }

    // A few rows with no threshold, like untracked compounds in the DEP export.
    for town in TOWNS.iter().take(3) {
        rows.push(SampleRow {
            town: town.to_string(),
            sample_date: "2021-06-01".into(),
            parameter: "PFPEA".into(),
            sample_type: "Drinking Water".into(),
            concentration: 3.2,
            units: "ng/L".into(),
            current_site_name: "Residence".into(),
            ts: String::new(),
        });
    }

    rows
}

fn write_csv(rows: &[SampleRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[SampleRow], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("town", DataType::Utf8, false),
        Field::new("sample_date", DataType::Utf8, false),
        Field::new("parameter", DataType::Utf8, false),
        Field::new("sample_type", DataType::Utf8, false),
        Field::new("concentration", DataType::Float64, false),
        Field::new("units", DataType::Utf8, false),
        Field::new("current_site_name", DataType::Utf8, false),
        Field::new("ts", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.town.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.sample_date.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.parameter.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.sample_type.as_str()))),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.concentration).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.units.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.current_site_name.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.ts.as_str()))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng, 600);

    write_csv(&rows, "sample_pfas.csv")?;
    write_parquet(&rows, "sample_pfas.parquet")?;
    let geojson = serde_json::to_string(&town_geojson())?;
    std::fs::write("sample_towns.geojson", geojson).context("writing GeoJSON")?;

    println!(
        "Wrote {} samples for {} towns to sample_pfas.csv / sample_pfas.parquet and sample_towns.geojson",
        rows.len(),
        TOWNS.len()
    );
    Ok(())
}
