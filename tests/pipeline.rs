//! End-to-end tests: sample table on disk → records → readings → map features.

use std::collections::BTreeSet;
use std::io::Write;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use pfas_map::color::{bucket, classify, legend_colors};
use pfas_map::data::aggregate::aggregate;
use pfas_map::data::filter::{DateRange, FilterSelection, filter_records};
use pfas_map::data::loader::load_samples;
use pfas_map::data::thresholds::SampleType;
use pfas_map::data::town_readings;
use pfas_map::geo::parse_feature_collection;
use pfas_map::state::AppState;
use serde_json::json;
use tempfile::NamedTempFile;

const CSV: &str = "\
town,sample_date,parameter,sample_type,concentration,units,current_site_name,ts
Bangor,2022-01-10,PFOA,Drinking Water,2,ng/L,Residence 1,Untreated
Bangor,2022-03-10,PFOS,Drinking Water,8,ng/L,Residence 2,Treated
Portland,2022-02-10,PFOA,Soil,370,ng/g,Field 1,
";

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn selection(entries: &[(SampleType, &[&str])]) -> FilterSelection {
    let mut selection: FilterSelection = SampleType::ALL
        .into_iter()
        .map(|st| (st, BTreeSet::new()))
        .collect();
    for (st, chems) in entries {
        selection.insert(*st, chems.iter().map(|c| c.to_string()).collect());
    }
    selection
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn bangor_and_portland_scenario() {
    let file = write_csv(CSV);
    let store = load_samples(file.path()).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.full_range(), DateRange::new(date(2022, 1, 10), date(2022, 3, 10)));

    let sel = selection(&[
        (SampleType::DrinkingWater, &["PFOA", "PFOS"]),
        (SampleType::Soil, &["PFOA"]),
    ]);
    let readings = town_readings(&store, &sel, &store.full_range()).unwrap();

    assert_eq!(readings.len(), 2);
    let bangor = readings.get("Bangor").unwrap();
    let portland = readings.get("Portland").unwrap();
    assert_eq!(bangor.record.parameter, "PFOS");
    assert_eq!(bangor.threshold_pct(), Some(200.0));
    assert_eq!(portland.threshold_pct(), Some(50.0));

    let colors = legend_colors();
    assert_eq!(classify(bangor.threshold_pct()), colors[2]);
    assert_eq!(classify(portland.threshold_pct()), colors[1]);
    assert_eq!(bucket(200.0), 2);
    assert_eq!(bucket(50.0), 1);
}

#[test]
fn empty_selection_gives_empty_result() {
    let file = write_csv(CSV);
    let store = load_samples(file.path()).unwrap();
    let readings = town_readings(&store, &selection(&[]), &store.full_range());
    assert!(readings.is_none());
}

#[test]
fn chemical_selected_under_other_sample_type_does_not_leak() {
    let file = write_csv(CSV);
    let store = load_samples(file.path()).unwrap();
    // PFOA is selected for soil only, so Bangor's drinking-water PFOA stays out.
    let sel = selection(&[(SampleType::Soil, &["PFOA"])]);
    let readings = town_readings(&store, &sel, &store.full_range()).unwrap();
    assert_eq!(readings.len(), 1);
    assert!(readings.get("Bangor").is_none());
}

#[test]
fn reading_is_the_max_of_filtered_records() {
    let file = write_csv(CSV);
    let store = load_samples(file.path()).unwrap();
    let sel = selection(&[(SampleType::DrinkingWater, &["PFOA", "PFOS"])]);
    let range = store.full_range();

    let filtered = filter_records(store.records(), &sel, &range);
    let readings = aggregate(filtered.iter().copied()).unwrap();
    for reading in readings.iter() {
        let best = filtered
            .iter()
            .filter(|r| r.town == reading.town())
            .filter_map(|r| r.threshold_pct)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(reading.threshold_pct(), Some(best));
    }

    // Aggregating the winners again changes nothing.
    let again = aggregate(readings.records()).unwrap();
    assert_eq!(again.len(), readings.len());
    for reading in readings.iter() {
        assert_eq!(again.get(reading.town()), Some(reading));
    }
}

#[test]
fn narrowed_date_range_changes_winner() {
    let file = write_csv(CSV);
    let store = load_samples(file.path()).unwrap();
    let sel = selection(&[(SampleType::DrinkingWater, &["PFOA", "PFOS"])]);
    let range = DateRange::new(date(2022, 1, 1), date(2022, 2, 28));
    let readings = town_readings(&store, &sel, &range).unwrap();
    assert_eq!(readings.get("Bangor").unwrap().threshold_pct(), Some(50.0));
}

#[test]
fn readings_join_town_boundaries() {
    let file = write_csv(CSV);
    let store = load_samples(file.path()).unwrap();
    let sel = selection(&[
        (SampleType::DrinkingWater, &["PFOA", "PFOS"]),
        (SampleType::Soil, &["PFOA"]),
    ]);
    let readings = town_readings(&store, &sel, &store.full_range()).unwrap();

    let square = |x: f64| json!([[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]);
    let geojson = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "town": "Bangor" },
              "geometry": { "type": "Polygon", "coordinates": square(0.0) } },
            { "type": "Feature", "properties": { "town": "Augusta" },
              "geometry": { "type": "Polygon", "coordinates": square(2.0) } },
            { "type": "Feature", "properties": { "town": "Portland" },
              "geometry": { "type": "Polygon", "coordinates": square(4.0) } }
        ]
    });
    let towns = parse_feature_collection(&geojson).unwrap();
    assert_eq!(towns.len(), 3);

    let features = towns.join(&readings);
    let names: Vec<&str> = features.iter().map(|f| f.shape.town.as_str()).collect();
    assert_eq!(names, ["Bangor", "Portland"]);
    assert_eq!(features[0].fill, legend_colors()[2]);
    assert!(features[1].shape.contains([4.5, 0.5]));
    assert!(!features[1].shape.contains([2.5, 0.5]));

    let attrs = features[0].reading.record.attributes();
    assert_eq!(attrs.town, "Bangor");
    assert_eq!(attrs.sample_date, "2022-03-10");
}

#[test]
fn state_debounces_then_recomputes() {
    let file = write_csv(CSV);
    let store = load_samples(file.path()).unwrap();
    let mut state = AppState::new(Duration::from_millis(750));
    state.set_dataset(store);
    assert_eq!(state.readings.as_ref().unwrap().len(), 1);

    let t0 = Instant::now();
    state.toggle_chemical(SampleType::Soil, "PFOA", t0);
    assert!(!state.poll(t0 + Duration::from_millis(749)));
    assert!(state.poll(t0 + Duration::from_millis(750)));
    assert_eq!(state.readings.as_ref().unwrap().len(), 2);
}

#[test]
fn malformed_rows_are_rejected() {
    let bad_date = write_csv(
        "town,sample_date,parameter,sample_type,concentration\n\
         Bangor,not-a-date,PFOA,Drinking Water,2\n",
    );
    assert!(load_samples(bad_date.path()).is_err());

    let bad_number = write_csv(
        "town,sample_date,parameter,sample_type,concentration\n\
         Bangor,2022-01-10,PFOA,Drinking Water,lots\n",
    );
    assert!(load_samples(bad_number.path()).is_err());

    let header_only = write_csv("town,sample_date,parameter,sample_type,concentration\n");
    assert!(load_samples(header_only.path()).is_err());
}
