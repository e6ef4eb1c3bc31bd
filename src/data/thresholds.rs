use std::fmt;

// ---------------------------------------------------------------------------
// Sample types
// ---------------------------------------------------------------------------

/// The medium a sample was taken from.
///
/// The variant order is the order of the checkbox groups in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SampleType {
    DrinkingWater,
    Soil,
    Milk,
    Meat,
    Filet,
}

impl SampleType {
    pub const ALL: [SampleType; 5] = [
        SampleType::DrinkingWater,
        SampleType::Soil,
        SampleType::Milk,
        SampleType::Meat,
        SampleType::Filet,
    ];

    /// Name as it appears in the `sample_type` column.
    pub fn name(self) -> &'static str {
        match self {
            SampleType::DrinkingWater => "Drinking Water",
            SampleType::Soil => "Soil",
            SampleType::Milk => "Milk",
            SampleType::Meat => "Meat",
            SampleType::Filet => "Filet",
        }
    }

    /// Exact-match lookup by column value.
    pub fn from_name(name: &str) -> Option<SampleType> {
        SampleType::ALL.into_iter().find(|st| st.name() == name)
    }

    /// Display unit for concentrations and thresholds of this sample type.
    pub fn unit(self) -> &'static str {
        match self {
            SampleType::DrinkingWater | SampleType::Milk => "ng/L",
            SampleType::Soil | SampleType::Meat | SampleType::Filet => "ng/g",
        }
    }

    /// Chemicals with a regulatory threshold for this sample type, in declaration order.
    pub fn chemicals(self) -> &'static [(&'static str, f64)] {
        match self {
            SampleType::DrinkingWater => DRINKING_WATER,
            SampleType::Soil => SOIL,
            SampleType::Milk => MILK,
            SampleType::Meat => MEAT,
            SampleType::Filet => FILET,
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Threshold tables (MCLs for drinking water, Maine DEP RAGs otherwise)
// ---------------------------------------------------------------------------

const DRINKING_WATER: &[(&str, f64)] = &[
    ("PFOA", 4.0),
    ("PFOS", 4.0),
    ("PFHXS", 10.0),
    ("HFPO-DA", 10.0),
    ("PFNA", 10.0),
    ("SUM OF 6 PFAS", 20.0),
];

// Park-user soil screening levels.
const SOIL: &[(&str, f64)] = &[
    ("PFOA", 740.0),
    ("PFOS", 490.0),
    ("PFHXS", 4900.0),
    ("PFNA", 740.0),
    ("PFBS", 74000.0),
    ("PFBA", 300000.0),
    ("PFHXA", 120000.0),
];

const MILK: &[(&str, f64)] = &[("PFOS", 210.0)];

const MEAT: &[(&str, f64)] = &[("PFOS", 3.4)];

const FILET: &[(&str, f64)] = &[("PFOS", 3.5)];

/// Threshold for a `(sample_type, parameter)` pair as they appear in the data.
///
/// Returns `None` for unknown sample types or chemicals without a threshold.
pub fn threshold(sample_type: &str, parameter: &str) -> Option<f64> {
    SampleType::from_name(sample_type)?
        .chemicals()
        .iter()
        .find(|(chem, _)| *chem == parameter)
        .map(|&(_, value)| value)
}

/// Format a threshold for a checkbox label: thousands separators, no
/// trailing `.0` on whole numbers (`300000.0` → `"300,000"`, `3.4` → `"3.4"`).
pub fn format_threshold(value: f64) -> String {
    let text = value.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

/// Checkbox label for a chemical: `"PFOA - 740 ng/g"`.
pub fn chemical_label(sample_type: SampleType, chemical: &str, value: f64) -> String {
    format!(
        "{chemical} - {} {}",
        format_threshold(value),
        sample_type.unit()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_lookup() {
        assert_eq!(threshold("Drinking Water", "PFOA"), Some(4.0));
        assert_eq!(threshold("Soil", "PFBA"), Some(300000.0));
        assert_eq!(threshold("Meat", "PFOS"), Some(3.4));
        assert_eq!(threshold("Filet", "PFOS"), Some(3.5));
    }

    #[test]
    fn test_threshold_missing_pair() {
        assert_eq!(threshold("Milk", "PFOA"), None);
        assert_eq!(threshold("Groundwater", "PFOA"), None);
        // Lookup is exact, like the column values.
        assert_eq!(threshold("drinking water", "PFOA"), None);
    }

    #[test]
    fn test_units() {
        assert_eq!(SampleType::DrinkingWater.unit(), "ng/L");
        assert_eq!(SampleType::Soil.unit(), "ng/g");
        assert_eq!(SampleType::Milk.unit(), "ng/L");
        assert_eq!(SampleType::Meat.unit(), "ng/g");
        assert_eq!(SampleType::Filet.unit(), "ng/g");
    }

    #[test]
    fn test_every_threshold_positive() {
        for st in SampleType::ALL {
            assert!(!st.chemicals().is_empty());
            for &(_, value) in st.chemicals() {
                assert!(value > 0.0);
            }
        }
    }

    #[test]
    fn test_name_round_trip() {
        for st in SampleType::ALL {
            assert_eq!(SampleType::from_name(st.name()), Some(st));
        }
    }

    #[test]
    fn test_format_threshold() {
        assert_eq!(format_threshold(4.0), "4");
        assert_eq!(format_threshold(740.0), "740");
        assert_eq!(format_threshold(4900.0), "4,900");
        assert_eq!(format_threshold(300000.0), "300,000");
        assert_eq!(format_threshold(3.4), "3.4");
    }

    #[test]
    fn test_chemical_label() {
        assert_eq!(
            chemical_label(SampleType::Soil, "PFBS", 74000.0),
            "PFBS - 74,000 ng/g"
        );
    }
}
