//! NDVI value and class-bucket distributions
//!
//! Both histograms only count valid pixels. A fully masked raster
//! yields zero counts with `valid_count == 0` so downstream charting
//! can report "no valid data" instead of failing.

use verdant_core::raster::{Raster, RasterElement};
use verdant_core::{Error, Result};

use crate::classify::{ClassScheme, CLASS_NODATA};

/// Parameters for value histograms
#[derive(Debug, Clone)]
pub struct HistogramParams {
    /// Number of equal-width bins over [-1, 1]
    pub bins: usize,
    /// Subsample every k-th row and column (1 = every pixel)
    pub stride: usize,
}

impl Default for HistogramParams {
    fn default() -> Self {
        Self { bins: 50, stride: 1 }
    }
}

/// Frequency distribution of NDVI values over [-1, 1]
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: Vec<u64>,
    valid_count: u64,
}

impl Histogram {
    /// Per-bin counts, in bin order
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of bins
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total valid pixels counted
    pub fn valid_count(&self) -> u64 {
        self.valid_count
    }

    /// Whether no valid pixel was counted
    pub fn is_empty(&self) -> bool {
        self.valid_count == 0
    }

    /// (lower, upper) edges of bin `i`
    pub fn bin_edges(&self, i: usize) -> (f64, f64) {
        let width = 2.0 / self.counts.len() as f64;
        (-1.0 + i as f64 * width, -1.0 + (i + 1) as f64 * width)
    }
}

/// Histogram of valid NDVI values into fixed-width bins over [-1, 1].
///
/// Values of exactly 1.0 land in the last bin. `stride` subsamples the
/// grid the way the interactive histogram does for large scenes.
pub fn value_histogram(ndvi: &Raster<f64>, params: &HistogramParams) -> Result<Histogram> {
    if params.bins == 0 {
        return Err(Error::InvalidParameter {
            name: "bins",
            value: "0".into(),
            reason: "at least one bin required".into(),
        });
    }
    if params.stride == 0 {
        return Err(Error::InvalidParameter {
            name: "stride",
            value: "0".into(),
            reason: "stride must be >= 1".into(),
        });
    }

    let (rows, cols) = ndvi.shape();
    let nodata = ndvi.nodata();
    let bins = params.bins;

    let mut counts = vec![0u64; bins];
    let mut valid_count = 0u64;

    for row in (0..rows).step_by(params.stride) {
        for col in (0..cols).step_by(params.stride) {
            let value = unsafe { ndvi.get_unchecked(row, col) };
            if value.is_nodata(nodata) || !(-1.0..=1.0).contains(&value) {
                continue;
            }
            let bin = (((value + 1.0) / 2.0) * bins as f64) as usize;
            counts[bin.min(bins - 1)] += 1;
            valid_count += 1;
        }
    }

    Ok(Histogram {
        counts,
        valid_count,
    })
}

/// Pixel count for one classification bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCount {
    pub label: String,
    pub count: u64,
}

/// Per-bucket counts of a classified raster, in rule order.
///
/// Indices outside the scheme (including the nodata sentinel) are
/// ignored.
pub fn class_histogram(classes: &Raster<u8>, scheme: &ClassScheme) -> Result<Vec<ClassCount>> {
    let mut counts = vec![0u64; scheme.len()];

    for &index in classes.data().iter() {
        if index == CLASS_NODATA {
            continue;
        }
        if let Some(slot) = counts.get_mut(index as usize) {
            *slot += 1;
        }
    }

    Ok(scheme
        .rules()
        .iter()
        .zip(counts)
        .map(|(rule, count)| ClassCount {
            label: rule.label.clone(),
            count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    fn make_ndvi(values: Vec<f64>, rows: usize, cols: usize) -> Raster<f64> {
        let mut r = Raster::from_vec(values, rows, cols).unwrap();
        r.set_nodata(Some(f64::NAN));
        r
    }

    #[test]
    fn test_value_histogram_bins() {
        let ndvi = make_ndvi(vec![-1.0, -0.5, 0.0, 0.5, 1.0, f64::NAN], 2, 3);
        let hist = value_histogram(&ndvi, &HistogramParams { bins: 4, stride: 1 }).unwrap();

        // bins: [-1,-0.5) [-0.5,0) [0,0.5) [0.5,1]
        assert_eq!(hist.counts(), &[1, 1, 1, 2]);
        assert_eq!(hist.valid_count(), 5);
    }

    #[test]
    fn test_value_one_lands_in_last_bin() {
        let ndvi = make_ndvi(vec![1.0], 1, 1);
        let hist = value_histogram(&ndvi, &HistogramParams::default()).unwrap();
        assert_eq!(hist.counts()[hist.bins() - 1], 1);
    }

    #[test]
    fn test_bin_edges() {
        let ndvi = make_ndvi(vec![0.0], 1, 1);
        let hist = value_histogram(&ndvi, &HistogramParams { bins: 4, stride: 1 }).unwrap();

        assert_eq!(hist.bin_edges(0), (-1.0, -0.5));
        let (lo, hi) = hist.bin_edges(3);
        assert!((lo - 0.5).abs() < 1e-12);
        assert!((hi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stride_subsamples() {
        // 4x4 grid, stride 2 visits 4 pixels
        let ndvi = make_ndvi(vec![0.5; 16], 4, 4);
        let hist = value_histogram(&ndvi, &HistogramParams { bins: 10, stride: 2 }).unwrap();
        assert_eq!(hist.valid_count(), 4);
    }

    #[test]
    fn test_all_masked_is_graceful() {
        let ndvi = make_ndvi(vec![f64::NAN; 9], 3, 3);
        let hist = value_histogram(&ndvi, &HistogramParams::default()).unwrap();

        assert!(hist.is_empty());
        assert_eq!(hist.valid_count(), 0);
        assert!(hist.counts().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_zero_bins_rejected() {
        let ndvi = make_ndvi(vec![0.0], 1, 1);
        let result = value_histogram(&ndvi, &HistogramParams { bins: 0, stride: 1 });
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_class_histogram() {
        let ndvi = make_ndvi(vec![-0.5, 0.0, 0.15, 0.3, 0.8, f64::NAN], 2, 3);
        let scheme = ClassScheme::five_class();
        let classes = classify(&ndvi, &scheme).unwrap();

        let counts = class_histogram(&classes, &scheme).unwrap();

        assert_eq!(counts.len(), 5);
        assert_eq!(counts[0].label, "Water");
        assert!(counts.iter().all(|c| c.count == 1));
        let total: u64 = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 5); // NaN pixel not counted
    }
}
