//! # Verdant Engine
//!
//! NDVI derivation and classification over single-band rasters.
//!
//! The pipeline is `upload -> compute -> visualize/export`, and this
//! crate owns the compute half:
//!
//! - **sensor**: per-platform radiometric calibration (DN to reflectance)
//! - **ndvi**: masked, ε-stabilized, clipped normalized difference
//! - **classify**: ordered vegetation-cover buckets over [-1, 1]
//! - **histogram**: value-bin and class-bucket distributions
//! - **sample**: capped random sample of valid values, CSV export
//!
//! Every operation is a pure function of its inputs: no shared state,
//! no side effects, safe to call concurrently for different input pairs.

pub mod classify;
pub mod histogram;
pub mod ndvi;
pub mod sample;
pub mod sensor;

pub use classify::{classify, ClassRule, ClassScheme, CLASS_NODATA};
pub use histogram::{class_histogram, value_histogram, ClassCount, Histogram, HistogramParams};
pub use ndvi::{ndvi, NdviParams};
pub use sample::{sample_valid, to_csv, write_csv, SampleParams, MAX_SAMPLE_ROWS};
pub use sensor::{Calibration, Sensor};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classify::{classify, ClassRule, ClassScheme, CLASS_NODATA};
    pub use crate::histogram::{class_histogram, value_histogram, Histogram, HistogramParams};
    pub use crate::ndvi::{ndvi, NdviParams};
    pub use crate::sample::{sample_valid, to_csv, write_csv, SampleParams};
    pub use crate::sensor::{Calibration, Sensor};
    pub use verdant_core::prelude::*;
}
