use std::path::Path;

use anyhow::{Context, Result};
use palette::Srgba;
use serde_json::Value as JsonValue;

use crate::color;
use crate::data::aggregate::{TownReading, TownReadings};

// ---------------------------------------------------------------------------
// Town boundaries
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    #[error("no town polygons found")]
    NoTowns,
}

/// A closed ring of `[lon, lat]` points.
pub type Ring = Vec<[f64; 2]>;

/// One town's outline. Holes are dropped; a multipolygon keeps every outer ring.
#[derive(Debug, Clone, PartialEq)]
pub struct TownShape {
    pub town: String,
    pub rings: Vec<Ring>,
}

impl TownShape {
    pub fn contains(&self, point: [f64; 2]) -> bool {
        self.rings.iter().any(|ring| point_in_ring(point, ring))
    }
}

/// Town polygons keyed by the `town` join column.
#[derive(Debug, Clone, Default)]
pub struct TownBoundaries {
    pub shapes: Vec<TownShape>,
}

impl TownBoundaries {
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Inner join on `town`: one map feature per shape with a reading.
    pub fn join<'a>(&'a self, readings: &'a TownReadings) -> Vec<MapFeature<'a>> {
        self.shapes
            .iter()
            .filter_map(|shape| {
                let reading = readings.get(&shape.town)?;
                Some(MapFeature {
                    shape,
                    reading,
                    fill: color::classify(reading.threshold_pct()),
                })
            })
            .collect()
    }
}

/// A town polygon with its reading and legend colour.
#[derive(Debug, Clone)]
pub struct MapFeature<'a> {
    pub shape: &'a TownShape,
    pub reading: &'a TownReading,
    pub fill: Srgba<u8>,
}

/// Load town boundaries from a GeoJSON file.
pub fn load_boundaries(path: &Path) -> Result<TownBoundaries> {
    let text = std::fs::read_to_string(path).context("reading GeoJSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing GeoJSON")?;
    let boundaries = parse_feature_collection(&root)
        .with_context(|| format!("reading town boundaries from {}", path.display()))?;
    log::info!(
        "Loaded {} town boundaries from {}",
        boundaries.len(),
        path.display()
    );
    Ok(boundaries)
}

/// Extract town shapes from a `FeatureCollection`.
///
/// The town name is read from the `town` property, falling back to `TOWN`.
/// Features without a name or without polygon geometry are skipped.
pub fn parse_feature_collection(root: &JsonValue) -> Result<TownBoundaries, GeoError> {
    if root.get("type").and_then(JsonValue::as_str) != Some("FeatureCollection") {
        return Err(GeoError::NotFeatureCollection);
    }
    let features = root
        .get("features")
        .and_then(JsonValue::as_array)
        .ok_or(GeoError::NotFeatureCollection)?;

    let mut shapes = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let props = feature.get("properties");
        let town = props
            .and_then(|p| p.get("town").or_else(|| p.get("TOWN")))
            .and_then(JsonValue::as_str);
        let Some(town) = town else {
            log::warn!("GeoJSON feature {i} has no town name, skipped");
            continue;
        };

        let rings = feature.get("geometry").map(outer_rings).unwrap_or_default();
        if rings.is_empty() {
            log::warn!("GeoJSON feature {i} ({town}) has no polygon geometry, skipped");
            continue;
        }

        shapes.push(TownShape {
            town: town.to_string(),
            rings,
        });
    }

    if shapes.is_empty() {
        return Err(GeoError::NoTowns);
    }
    Ok(TownBoundaries { shapes })
}

/// Outer rings of a `Polygon` or `MultiPolygon` geometry.
fn outer_rings(geometry: &JsonValue) -> Vec<Ring> {
    let coords = geometry.get("coordinates");
    match geometry.get("type").and_then(JsonValue::as_str) {
        Some("Polygon") => coords
            .and_then(JsonValue::as_array)
            .and_then(|rings| rings.first())
            .and_then(parse_ring)
            .into_iter()
            .collect(),
        Some("MultiPolygon") => coords
            .and_then(JsonValue::as_array)
            .map(|polys| {
                polys
                    .iter()
                    .filter_map(|poly| poly.as_array()?.first().and_then(parse_ring))
                    .collect()
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn parse_ring(ring: &JsonValue) -> Option<Ring> {
    let points: Option<Ring> = ring
        .as_array()?
        .iter()
        .map(|pt| {
            let pt = pt.as_array()?;
            Some([pt.first()?.as_f64()?, pt.get(1)?.as_f64()?])
        })
        .collect();
    points.filter(|p| p.len() >= 3)
}

/// Even-odd ray casting test.
pub fn point_in_ring(point: [f64; 2], ring: &[[f64; 2]]) -> bool {
    let [x, y] = point;
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::aggregate;
    use crate::data::model::SampleRecord;
    use chrono::NaiveDate;
    use serde_json::json;

    fn square(x0: f64, y0: f64) -> JsonValue {
        json!([[[x0, y0], [x0 + 1.0, y0], [x0 + 1.0, y0 + 1.0], [x0, y0 + 1.0], [x0, y0]]])
    }

    fn collection() -> JsonValue {
        json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"TOWN": "Bangor"},
                 "geometry": {"type": "Polygon", "coordinates": square(0.0, 0.0)}},
                {"type": "Feature", "properties": {"town": "Portland"},
                 "geometry": {"type": "MultiPolygon",
                              "coordinates": [square(5.0, 5.0), square(7.0, 7.0)]}},
                {"type": "Feature", "properties": {"TOWN": "Orono"},
                 "geometry": {"type": "Polygon", "coordinates": square(2.0, 0.0)}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Polygon", "coordinates": square(9.0, 9.0)}},
                {"type": "Feature", "properties": {"TOWN": "Nowhere"}, "geometry": null}
            ]
        })
    }

    fn rec(town: &str, pct: f64) -> SampleRecord {
        SampleRecord {
            town: town.into(),
            sample_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            parameter: "PFOA".into(),
            sample_type: "Drinking Water".into(),
            concentration: 1.0,
            units: "ng/L".into(),
            threshold_pct: Some(pct),
            current_site_name: String::new(),
            treatment_status: String::new(),
        }
    }

    #[test]
    fn test_parse_feature_collection() {
        let b = parse_feature_collection(&collection()).unwrap();
        let towns: Vec<&str> = b.shapes.iter().map(|s| s.town.as_str()).collect();
        assert_eq!(towns, vec!["Bangor", "Portland", "Orono"]);
        assert_eq!(b.shapes[1].rings.len(), 2);
        assert_eq!(b.shapes[0].rings[0].len(), 5);
    }

    #[test]
    fn test_rejects_non_collection() {
        let err = parse_feature_collection(&json!({"type": "Feature"})).unwrap_err();
        assert!(matches!(err, GeoError::NotFeatureCollection));
        let err = parse_feature_collection(&json!({"type": "FeatureCollection", "features": []}))
            .unwrap_err();
        assert!(matches!(err, GeoError::NoTowns));
    }

    #[test]
    fn test_point_in_ring() {
        let ring = vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]];
        assert!(point_in_ring([1.0, 1.0], &ring));
        assert!(!point_in_ring([3.0, 1.0], &ring));
        assert!(!point_in_ring([1.0, -0.5], &ring));
    }

    #[test]
    fn test_contains_any_part() {
        let b = parse_feature_collection(&collection()).unwrap();
        assert!(b.shapes[1].contains([7.5, 7.5]));
        assert!(!b.shapes[1].contains([6.5, 6.5]));
    }

    #[test]
    fn test_join_is_inner() {
        let b = parse_feature_collection(&collection()).unwrap();
        let recs = vec![rec("Bangor", 200.0), rec("Portland", 50.0), rec("Augusta", 5.0)];
        let readings = aggregate(&recs).unwrap();
        let features = b.join(&readings);
        let towns: Vec<&str> = features.iter().map(|f| f.shape.town.as_str()).collect();
        assert_eq!(towns, vec!["Bangor", "Portland"]);
        assert_eq!(features[0].fill, color::legend_colors()[2]);
        assert_eq!(features[1].fill, color::legend_colors()[1]);
    }
}
