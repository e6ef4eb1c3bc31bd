use std::collections::HashMap;

use super::model::SampleRecord;

// ---------------------------------------------------------------------------
// Per-town reduction
// ---------------------------------------------------------------------------

/// The representative reading for one town: its highest threshold percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct TownReading {
    pub record: SampleRecord,
}

impl TownReading {
    pub fn town(&self) -> &str {
        &self.record.town
    }

    /// Always `Some` for an aggregated reading.
    pub fn threshold_pct(&self) -> Option<f64> {
        self.record.threshold_pct
    }
}

/// One reading per qualifying town, ordered by the position of each
/// town's winning record in the filtered input.
#[derive(Debug, Clone, PartialEq)]
pub struct TownReadings {
    readings: Vec<TownReading>,
    index: HashMap<String, usize>,
}

impl TownReadings {
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TownReading> {
        self.readings.iter()
    }

    pub fn get(&self, town: &str) -> Option<&TownReading> {
        self.index.get(town).map(|&i| &self.readings[i])
    }

    /// The winning records, in order.
    pub fn records(&self) -> impl Iterator<Item = &SampleRecord> {
        self.readings.iter().map(|r| &r.record)
    }
}

/// Reduce filtered records to one reading per town.
///
/// The winner of each town is the first record (in input order) carrying the
/// town's maximum `threshold_pct`. Records without a percentage are never
/// chosen, so a town where every record lacks one is left out.
///
/// Returns `None` when no town qualifies.
pub fn aggregate<'a, I>(records: I) -> Option<TownReadings>
where
    I: IntoIterator<Item = &'a SampleRecord>,
{
    // town → (position of the current winner, winner)
    let mut best: HashMap<&str, (usize, &SampleRecord)> = HashMap::new();

    for (pos, record) in records.into_iter().enumerate() {
        let Some(pct) = record.threshold_pct else {
            continue;
        };
        match best.get_mut(record.town.as_str()) {
            Some((best_pos, best_rec)) => {
                // Strictly greater: ties keep the earlier record.
                if best_rec.threshold_pct.is_some_and(|cur| pct > cur) {
                    *best_pos = pos;
                    *best_rec = record;
                }
            }
            None => {
                best.insert(record.town.as_str(), (pos, record));
            }
        }
    }

    if best.is_empty() {
        return None;
    }

    let mut winners: Vec<(usize, &SampleRecord)> = best.into_values().collect();
    winners.sort_unstable_by_key(|&(pos, _)| pos);

    let readings: Vec<TownReading> = winners
        .into_iter()
        .map(|(_, rec)| TownReading {
            record: rec.clone(),
        })
        .collect();
    let index = readings
        .iter()
        .enumerate()
        .map(|(i, r)| (r.record.town.clone(), i))
        .collect();

    Some(TownReadings { readings, index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(town: &str, param: &str, pct: Option<f64>) -> SampleRecord {
        SampleRecord {
            town: town.into(),
            sample_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            parameter: param.into(),
            sample_type: "Drinking Water".into(),
            concentration: 1.0,
            units: "ng/L".into(),
            threshold_pct: pct,
            current_site_name: String::new(),
            treatment_status: String::new(),
        }
    }

    #[test]
    fn test_max_per_town() {
        let recs = vec![
            rec("Bangor", "PFOA", Some(50.0)),
            rec("Bangor", "PFOS", Some(200.0)),
            rec("Portland", "PFOA", Some(50.0)),
            rec("Bangor", "PFNA", Some(20.0)),
        ];
        let out = aggregate(&recs).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.get("Bangor").unwrap().record.parameter, "PFOS");
        assert_eq!(out.get("Bangor").unwrap().threshold_pct(), Some(200.0));
        assert_eq!(out.get("Portland").unwrap().threshold_pct(), Some(50.0));
    }

    #[test]
    fn test_tie_keeps_first() {
        let recs = vec![
            rec("Bangor", "PFOA", Some(75.0)),
            rec("Bangor", "PFOS", Some(75.0)),
            rec("Bangor", "PFNA", Some(75.0)),
        ];
        let out = aggregate(&recs).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("Bangor").unwrap().record.parameter, "PFOA");
    }

    #[test]
    fn test_absent_pct_never_wins() {
        let recs = vec![
            rec("Bangor", "XYZ", None),
            rec("Bangor", "PFOA", Some(0.5)),
            rec("Bangor", "ABC", None),
        ];
        let out = aggregate(&recs).unwrap();
        assert_eq!(out.get("Bangor").unwrap().record.parameter, "PFOA");
    }

    #[test]
    fn test_town_with_only_absent_pct_is_dropped() {
        let recs = vec![
            rec("Bangor", "XYZ", None),
            rec("Portland", "PFOA", Some(10.0)),
        ];
        let out = aggregate(&recs).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out.get("Bangor").is_none());
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(aggregate(&Vec::<SampleRecord>::new()).is_none());
        assert!(aggregate(&vec![rec("Bangor", "XYZ", None)]).is_none());
    }

    #[test]
    fn test_order_follows_winning_record() {
        let recs = vec![
            rec("Bangor", "PFOA", Some(1.5)),
            rec("Portland", "PFOA", Some(9.0)),
            rec("Bangor", "PFOS", Some(3.0)),
        ];
        let out = aggregate(&recs).unwrap();
        let towns: Vec<&str> = out.iter().map(|r| r.town()).collect();
        assert_eq!(towns, vec!["Portland", "Bangor"]);
    }

    #[test]
    fn test_idempotent_on_reduced_input() {
        let recs = vec![
            rec("Orono", "PFOA", Some(12.0)),
            rec("Bangor", "PFOS", Some(200.0)),
            rec("Portland", "PFNA", Some(0.0)),
        ];
        let once = aggregate(&recs).unwrap();
        let reduced: Vec<SampleRecord> = once.records().cloned().collect();
        assert_eq!(reduced, recs);

        let twice = aggregate(&reduced).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_negative_and_zero_pct_still_qualify() {
        let recs = vec![rec("Bangor", "PFOA", Some(-1.0)), rec("Bangor", "PFOS", Some(0.0))];
        let out = aggregate(&recs).unwrap();
        assert_eq!(out.get("Bangor").unwrap().record.parameter, "PFOS");
    }
}
