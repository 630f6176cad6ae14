//! Normalized Difference Vegetation Index
//!
//! `NDVI = (NIR - Red) / (NIR + Red + ε)`
//!
//! The ε term (1e-10) only guards the both-bands-zero case so that a
//! dark pixel comes out as ≈ 0 instead of a division error; it is far
//! below reflectance precision and never moves NDVI outside [-1, 1]
//! for real inputs.

use ndarray::Array2;
use rayon::prelude::*;
use verdant_core::raster::Raster;
use verdant_core::{Error, Result};

use crate::sensor::{Calibration, Sensor};

/// Denominator stabilizer for the zero/zero case
pub const EPSILON: f64 = 1e-10;

/// Parameters for NDVI computation
#[derive(Debug, Clone, Default)]
pub struct NdviParams {
    /// Radiometric scaling applied to both bands before the index.
    /// The default is `Identity`: bands are never corrected silently.
    pub calibration: Calibration,
}

impl NdviParams {
    /// Use the platform's DN-to-reflectance calibration
    pub fn for_sensor(sensor: Sensor) -> Self {
        Self {
            calibration: sensor.default_calibration(),
        }
    }
}

/// Compute NDVI from co-registered red and NIR bands.
///
/// Each band's own nodata sentinel marks invalid pixels; a pixel
/// invalid in either band, or whose arithmetic yields a non-finite
/// value, is NaN in the output — never a fabricated number. Finite
/// results are clipped to [-1, 1].
///
/// The output raster carries the red band's geotransform and NaN as
/// its nodata sentinel.
///
/// # Errors
/// `Error::ShapeMismatch` when the band grids differ in shape.
pub fn ndvi(red: &Raster<f64>, nir: &Raster<f64>, params: &NdviParams) -> Result<Raster<f64>> {
    if red.shape() != nir.shape() {
        return Err(Error::ShapeMismatch {
            er: red.rows(),
            ec: red.cols(),
            ar: nir.rows(),
            ac: nir.cols(),
        });
    }

    let (rows, cols) = red.shape();
    let cal = params.calibration;

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for col in 0..cols {
                let r_dn = unsafe { red.get_unchecked(row, col) };
                let n_dn = unsafe { nir.get_unchecked(row, col) };

                // Sentinels apply to raw values, before calibration
                if red.is_nodata(r_dn) || nir.is_nodata(n_dn) {
                    continue;
                }

                let r = cal.apply(r_dn);
                let n = cal.apply(n_dn);

                let value = (n - r) / (n + r + EPSILON);
                if value.is_finite() {
                    row_data[col] = value.clamp(-1.0, 1.0);
                }
            }
            row_data
        })
        .collect();

    let mut output = red.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(f64::NAN));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(output)
}
