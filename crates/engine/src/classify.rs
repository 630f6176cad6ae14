//! Vegetation-cover classification
//!
//! An ordered set of labeled NDVI intervals that tiles [-1, 1].
//! Intervals are half-open `[lower, upper)` except the final bucket,
//! whose upper bound is inclusive, so exactly one rule matches any
//! valid NDVI value.

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use verdant_core::raster::{Raster, RasterElement};
use verdant_core::{Error, Result};

/// Output sentinel for pixels with no valid NDVI value
pub const CLASS_NODATA: u8 = u8::MAX;

/// Tolerance for the contiguity check between adjacent rule bounds
const BOUND_TOLERANCE: f64 = 1e-12;

/// A labeled NDVI interval `[lower, upper)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRule {
    pub lower: f64,
    pub upper: f64,
    pub label: String,
}

impl ClassRule {
    pub fn new(lower: f64, upper: f64, label: impl Into<String>) -> Self {
        Self {
            lower,
            upper,
            label: label.into(),
        }
    }
}

/// An ordered, non-overlapping, exhaustive classification over [-1, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ClassRule>", into = "Vec<ClassRule>")]
pub struct ClassScheme {
    rules: Vec<ClassRule>,
}

impl ClassScheme {
    /// Build a scheme from an ordered rule list, validating that the
    /// bounds increase monotonically and tile [-1, 1] without gaps.
    pub fn new(rules: Vec<ClassRule>) -> Result<Self> {
        Self::validate(&rules)?;
        Ok(Self { rules })
    }

    fn validate(rules: &[ClassRule]) -> Result<()> {
        let invalid = |msg: String| Error::InvalidClassScheme(msg);

        if rules.is_empty() {
            return Err(invalid("rule list is empty".into()));
        }
        if rules.len() >= CLASS_NODATA as usize {
            return Err(invalid(format!(
                "too many rules ({}, max {})",
                rules.len(),
                CLASS_NODATA as usize - 1
            )));
        }

        for rule in rules {
            if !rule.lower.is_finite() || !rule.upper.is_finite() {
                return Err(invalid(format!("non-finite bound in '{}'", rule.label)));
            }
            if rule.lower >= rule.upper {
                return Err(invalid(format!(
                    "'{}' has lower {} >= upper {}",
                    rule.label, rule.lower, rule.upper
                )));
            }
        }

        for pair in rules.windows(2) {
            if (pair[0].upper - pair[1].lower).abs() > BOUND_TOLERANCE {
                return Err(invalid(format!(
                    "gap or overlap between '{}' (upper {}) and '{}' (lower {})",
                    pair[0].label, pair[0].upper, pair[1].label, pair[1].lower
                )));
            }
        }

        let first = &rules[0];
        let last = &rules[rules.len() - 1];
        if (first.lower - -1.0).abs() > BOUND_TOLERANCE || (last.upper - 1.0).abs() > BOUND_TOLERANCE
        {
            return Err(invalid(format!(
                "rules cover [{}, {}], expected [-1, 1]",
                first.lower, last.upper
            )));
        }

        Ok(())
    }

    /// Five-bucket vegetation-density scheme
    pub fn five_class() -> Self {
        Self {
            rules: vec![
                ClassRule::new(-1.0, -0.1, "Water"),
                ClassRule::new(-0.1, 0.1, "Bare Soil"),
                ClassRule::new(0.1, 0.2, "Sparse Vegetation"),
                ClassRule::new(0.2, 0.4, "Moderate Vegetation"),
                ClassRule::new(0.4, 1.0, "Dense Vegetation"),
            ],
        }
    }

    /// Four-bucket land-cover scheme
    pub fn four_class() -> Self {
        Self {
            rules: vec![
                ClassRule::new(-1.0, -0.1, "Water"),
                ClassRule::new(-0.1, 0.1, "Barren (Rock/Sand/Snow)"),
                ClassRule::new(0.1, 0.4, "Shrub and Grassland"),
                ClassRule::new(0.4, 1.0, "Temperate/Tropical Rainforest"),
            ],
        }
    }

    /// The ordered rule list
    pub fn rules(&self) -> &[ClassRule] {
        &self.rules
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Label for a class index produced by [`classify`]
    pub fn label(&self, index: u8) -> Option<&str> {
        self.rules.get(index as usize).map(|r| r.label.as_str())
    }

    /// Index of the unique rule containing `value`, or `None` for NaN
    /// or values outside the scheme's range.
    pub fn class_of(&self, value: f64) -> Option<u8> {
        if value.is_nan() {
            return None;
        }
        let last = self.rules.len() - 1;
        for (i, rule) in self.rules.iter().enumerate() {
            let in_bucket = value >= rule.lower
                && (value < rule.upper || (i == last && value <= rule.upper));
            if in_bucket {
                return Some(i as u8);
            }
        }
        None
    }
}

impl TryFrom<Vec<ClassRule>> for ClassScheme {
    type Error = String;

    fn try_from(rules: Vec<ClassRule>) -> std::result::Result<Self, String> {
        Self::new(rules).map_err(|e| e.to_string())
    }
}

impl From<ClassScheme> for Vec<ClassRule> {
    fn from(scheme: ClassScheme) -> Self {
        scheme.rules
    }
}

/// Assign each valid NDVI pixel its classification bucket.
///
/// Returns a same-shape `Raster<u8>` of rule indices; masked pixels get
/// [`CLASS_NODATA`]. Pure function, no side effects.
pub fn classify(ndvi: &Raster<f64>, scheme: &ClassScheme) -> Result<Raster<u8>> {
    let (rows, cols) = ndvi.shape();
    let nodata = ndvi.nodata();

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![CLASS_NODATA; cols];
            for col in 0..cols {
                let value = unsafe { ndvi.get_unchecked(row, col) };
                if value.is_nodata(nodata) {
                    continue;
                }
                if let Some(index) = scheme.class_of(value) {
                    row_data[col] = index;
                }
            }
            row_data
        })
        .collect();

    let mut output = ndvi.with_same_meta::<u8>(rows, cols);
    output.set_nodata(Some(CLASS_NODATA));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ndvi(values: Vec<f64>, rows: usize, cols: usize) -> Raster<f64> {
        let mut r = Raster::from_vec(values, rows, cols).unwrap();
        r.set_nodata(Some(f64::NAN));
        r
    }

    #[test]
    fn test_five_class_buckets() {
        let scheme = ClassScheme::five_class();
        assert_eq!(scheme.label(scheme.class_of(-0.5).unwrap()), Some("Water"));
        assert_eq!(scheme.label(scheme.class_of(0.0).unwrap()), Some("Bare Soil"));
        assert_eq!(
            scheme.label(scheme.class_of(0.15).unwrap()),
            Some("Sparse Vegetation")
        );
        assert_eq!(
            scheme.label(scheme.class_of(0.3).unwrap()),
            Some("Moderate Vegetation")
        );
        assert_eq!(
            scheme.label(scheme.class_of(0.8).unwrap()),
            Some("Dense Vegetation")
        );
    }

    #[test]
    fn test_four_class_spec_example() {
        // red=[[0.1, 0.2]], nir=[[0.3, 0.2]] -> ndvi [[0.5, 0.0]]
        let scheme = ClassScheme::four_class();
        assert_eq!(
            scheme.label(scheme.class_of(0.5).unwrap()),
            Some("Temperate/Tropical Rainforest")
        );
        assert_eq!(
            scheme.label(scheme.class_of(0.0).unwrap()),
            Some("Barren (Rock/Sand/Snow)")
        );
    }

    #[test]
    fn test_lower_bounds_inclusive_upper_exclusive() {
        let scheme = ClassScheme::five_class();
        // 0.1 belongs to Sparse, not Bare Soil
        assert_eq!(
            scheme.label(scheme.class_of(0.1).unwrap()),
            Some("Sparse Vegetation")
        );
        // Final bucket includes its upper bound
        assert_eq!(
            scheme.label(scheme.class_of(1.0).unwrap()),
            Some("Dense Vegetation")
        );
        assert_eq!(scheme.label(scheme.class_of(-1.0).unwrap()), Some("Water"));
    }

    #[test]
    fn test_exactly_one_bucket_for_every_value() {
        for scheme in [ClassScheme::five_class(), ClassScheme::four_class()] {
            let mut v = -1.0;
            while v <= 1.0 {
                let matches = scheme
                    .rules()
                    .iter()
                    .enumerate()
                    .filter(|(i, r)| {
                        let last = *i == scheme.len() - 1;
                        v >= r.lower && (v < r.upper || (last && v <= r.upper))
                    })
                    .count();
                assert_eq!(matches, 1, "value {} matched {} buckets", v, matches);
                assert!(scheme.class_of(v).is_some());
                v += 0.001;
            }
        }
    }

    #[test]
    fn test_validation_rejects_gaps() {
        let rules = vec![
            ClassRule::new(-1.0, 0.0, "low"),
            ClassRule::new(0.1, 1.0, "high"),
        ];
        assert!(matches!(
            ClassScheme::new(rules),
            Err(Error::InvalidClassScheme(_))
        ));
    }

    #[test]
    fn test_validation_rejects_wrong_coverage() {
        let rules = vec![ClassRule::new(-0.5, 1.0, "all")];
        assert!(ClassScheme::new(rules).is_err());

        let rules = vec![ClassRule::new(-1.0, 0.9, "all")];
        assert!(ClassScheme::new(rules).is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_bounds() {
        let rules = vec![
            ClassRule::new(-1.0, 0.5, "low"),
            ClassRule::new(0.5, 0.2, "bad"),
        ];
        assert!(ClassScheme::new(rules).is_err());
    }

    #[test]
    fn test_classify_raster() {
        let ndvi = make_ndvi(vec![-0.5, 0.0, 0.15, 0.3, 0.8, f64::NAN], 2, 3);
        let scheme = ClassScheme::five_class();

        let classes = classify(&ndvi, &scheme).unwrap();

        assert_eq!(classes.get(0, 0).unwrap(), 0); // Water
        assert_eq!(classes.get(0, 1).unwrap(), 1); // Bare Soil
        assert_eq!(classes.get(0, 2).unwrap(), 2); // Sparse
        assert_eq!(classes.get(1, 0).unwrap(), 3); // Moderate
        assert_eq!(classes.get(1, 1).unwrap(), 4); // Dense
        assert_eq!(classes.get(1, 2).unwrap(), CLASS_NODATA);
    }

    #[test]
    fn test_classify_marks_output_nodata() {
        let ndvi = make_ndvi(vec![f64::NAN; 4], 2, 2);
        let classes = classify(&ndvi, &ClassScheme::four_class()).unwrap();

        assert_eq!(classes.nodata(), Some(CLASS_NODATA));
        assert!(classes.get(0, 0).unwrap().is_nodata(classes.nodata()));
        assert_eq!(classes.valid_count(), 0);
    }

    #[test]
    fn test_scheme_json_roundtrip() {
        let scheme = ClassScheme::four_class();
        let json = serde_json::to_string(&scheme).unwrap();
        let back: ClassScheme = serde_json::from_str(&json).unwrap();
        assert_eq!(scheme, back);
    }

    #[test]
    fn test_scheme_json_rejects_invalid() {
        let json = r#"[{"lower": -1.0, "upper": 0.0, "label": "a"},
                       {"lower": 0.5, "upper": 1.0, "label": "b"}]"#;
        assert!(serde_json::from_str::<ClassScheme>(json).is_err());
    }
}
