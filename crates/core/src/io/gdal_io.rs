//! Raster reading and writing using GDAL
//!
//! Handles the formats the native reader cannot: Sentinel-2 bands ship
//! as JPEG2000 granules, which GDAL decodes transparently from the same
//! entry point.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use gdal::raster::GdalType;
use gdal::{Dataset, DriverManager};
use std::path::Path;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone)]
pub struct GeoTiffOptions {
    /// Compression type: "DEFLATE", "LZW", "ZSTD", "NONE"
    pub compression: String,
    /// Tile size for tiled TIFFs (0 for strips)
    pub tile_size: usize,
}

impl Default for GeoTiffOptions {
    fn default() -> Self {
        Self {
            compression: "DEFLATE".to_string(),
            tile_size: 256,
        }
    }
}

/// Read a raster band into a `Raster` through GDAL.
///
/// Accepts any format GDAL can open (GeoTIFF, JPEG2000, ...).
/// `band` is 1-indexed and defaults to 1.
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement + GdalType + Copy,
    P: AsRef<Path>,
{
    let label = path.as_ref().display().to_string();
    let dataset = Dataset::open(path.as_ref()).map_err(|e| Error::UnreadableRaster {
        path: label.clone(),
        reason: e.to_string(),
    })?;
    let band_idx = band.unwrap_or(1);
    let rasterband = dataset
        .rasterband(band_idx)
        .map_err(|e| Error::UnreadableRaster {
            path: label.clone(),
            reason: e.to_string(),
        })?;

    let (cols, rows) = dataset.raster_size();

    let buffer = rasterband
        .read_as::<T>((0, 0), (cols, rows), (cols, rows), None)
        .map_err(|e| Error::UnreadableRaster {
            path: label,
            reason: e.to_string(),
        })?;

    let mut raster = Raster::from_vec(buffer.data().to_vec(), rows, cols)?;

    if let Ok(gt) = dataset.geo_transform() {
        raster.set_transform(GeoTransform::from_gdal(gt));
    }

    if let Some(nodata) = rasterband.no_data_value() {
        if let Some(nd) = num_traits::cast(nodata) {
            raster.set_nodata(Some(nd));
        }
    }

    Ok(raster)
}

/// Write a Raster to a GeoTIFF file through GDAL
pub fn write_geotiff<T, P>(
    raster: &Raster<T>,
    path: P,
    options: Option<GeoTiffOptions>,
) -> Result<()>
where
    T: RasterElement + GdalType + Copy,
    P: AsRef<Path>,
{
    let opts = options.unwrap_or_default();
    let driver = DriverManager::get_driver_by_name("GTiff")?;

    let (rows, cols) = raster.shape();

    let mut create_options = vec![format!("COMPRESS={}", opts.compression)];
    if opts.tile_size > 0 {
        create_options.push("TILED=YES".to_string());
        create_options.push(format!("BLOCKXSIZE={}", opts.tile_size));
        create_options.push(format!("BLOCKYSIZE={}", opts.tile_size));
    }
    let create_options_refs: Vec<&str> = create_options.iter().map(|s| s.as_str()).collect();

    let mut dataset = driver.create_with_band_type_with_options::<T, _>(
        path.as_ref(),
        cols as isize,
        rows as isize,
        1,
        &create_options_refs,
    )?;

    dataset.set_geo_transform(&raster.transform().to_gdal())?;

    let mut band = dataset.rasterband(1)?;

    if let Some(nodata) = raster.nodata() {
        if let Some(nd) = num_traits::cast(nodata) {
            band.set_no_data_value(Some(nd))?;
        }
    }

    let data: Vec<T> = raster.data().iter().copied().collect();
    let mut buffer = gdal::raster::Buffer::new((cols, rows), data);
    band.write((0, 0), (cols, rows), &mut buffer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_read_roundtrip() {
        let mut raster: Raster<f64> = Raster::new(16, 16);
        raster.set_transform(GeoTransform::new(399960.0, 4800000.0, 10.0, -10.0));
        raster.set_nodata(Some(0.0));

        for i in 0..16 {
            for j in 0..16 {
                raster.set(i, j, (i * 16 + j) as f64 / 100.0).unwrap();
            }
        }

        let tmp = NamedTempFile::with_suffix(".tif").unwrap();
        write_geotiff(&raster, tmp.path(), None).unwrap();

        let loaded: Raster<f64> = read_geotiff(tmp.path(), None).unwrap();

        assert_eq!(loaded.shape(), raster.shape());
        assert_eq!(loaded.get(5, 5).unwrap(), raster.get(5, 5).unwrap());
        assert_eq!(loaded.nodata(), Some(0.0));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let result: Result<Raster<f64>> = read_geotiff("/nonexistent/band.jp2", None);
        assert!(matches!(result, Err(Error::UnreadableRaster { .. })));
    }
}
