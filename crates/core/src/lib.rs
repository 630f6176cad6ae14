//! # Verdant Core
//!
//! Core types and I/O for the verdant NDVI toolkit.
//!
//! This crate provides:
//! - `Raster<T>`: Generic single-band raster grid with a nodata sentinel
//! - `GeoTransform`: Affine transformation for georeferencing
//! - The shared error taxonomy for band processing
//! - GeoTIFF I/O (native `tiff` backend; optional GDAL backend for
//!   formats like Sentinel-2 JPEG2000)

pub mod error;
pub mod io;
pub mod raster;

pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
}
