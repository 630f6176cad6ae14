//! Bounded random sampling and CSV export
//!
//! A scene can easily hold tens of millions of valid pixels; the export
//! draws a uniform sample without replacement, capped at 100,000 rows,
//! and never includes masked pixels.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Write as _;
use std::path::Path;
use verdant_core::raster::Raster;
use verdant_core::{Error, Result};

/// Hard cap on exported rows
pub const MAX_SAMPLE_ROWS: usize = 100_000;

/// Parameters for sampling
#[derive(Debug, Clone)]
pub struct SampleParams {
    /// Maximum number of values drawn (clamped to [`MAX_SAMPLE_ROWS`])
    pub max_rows: usize,
    /// Seed for a deterministic draw; `None` uses the thread RNG
    pub seed: Option<u64>,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            max_rows: MAX_SAMPLE_ROWS,
            seed: None,
        }
    }
}

/// Draw a uniform sample of valid NDVI values without replacement.
///
/// Returns every valid value when there are no more than `max_rows` of
/// them.
///
/// # Errors
/// `Error::EmptyResult` when every pixel is masked;
/// `Error::InvalidParameter` for a zero `max_rows`.
pub fn sample_valid(ndvi: &Raster<f64>, params: &SampleParams) -> Result<Vec<f64>> {
    if params.max_rows == 0 {
        return Err(Error::InvalidParameter {
            name: "max_rows",
            value: "0".into(),
            reason: "at least one row required".into(),
        });
    }
    let cap = params.max_rows.min(MAX_SAMPLE_ROWS);

    let values: Vec<f64> = ndvi.valid_values().collect();
    if values.is_empty() {
        return Err(Error::EmptyResult);
    }
    if values.len() <= cap {
        return Ok(values);
    }

    let indices = match params.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            rand::seq::index::sample(&mut rng, values.len(), cap)
        }
        None => {
            let mut rng = rand::thread_rng();
            rand::seq::index::sample(&mut rng, values.len(), cap)
        }
    };

    Ok(indices.iter().map(|i| values[i]).collect())
}

/// Render sampled values as CSV: header `NDVI`, one value per row.
pub fn to_csv(values: &[f64]) -> String {
    let mut out = String::with_capacity(values.len() * 8 + 8);
    out.push_str("NDVI\n");
    for v in values {
        // Infallible for String
        let _ = writeln!(out, "{}", v);
    }
    out
}

/// Sample a raster and write the CSV to `path`.
pub fn write_csv<P: AsRef<Path>>(
    ndvi: &Raster<f64>,
    params: &SampleParams,
    path: P,
) -> Result<usize> {
    let values = sample_valid(ndvi, params)?;
    std::fs::write(path, to_csv(&values))?;
    Ok(values.len())
}
