//! Native GeoTIFF reading/writing (without GDAL dependency)
//!
//! Uses the `tiff` crate for single-band TIFF I/O. Reads the
//! geotransform tags and the GDAL_NODATA sentinel so that masking
//! survives a round trip. For formats this reader cannot decode
//! (e.g. Sentinel-2 JPEG2000), enable the `gdal` feature.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

// GeoTIFF / GDAL private tags
const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    /// Nodata sentinel to record in the GDAL_NODATA tag.
    /// Defaults to the raster's own sentinel.
    pub nodata_override: Option<f64>,
}

/// Read a single-band GeoTIFF file into a Raster
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let label = path.as_ref().display().to_string();
    let file = File::open(path.as_ref()).map_err(|e| Error::UnreadableRaster {
        path: label.clone(),
        reason: e.to_string(),
    })?;
    decode_geotiff(file, band, &label)
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
///
/// Same as `read_geotiff` but operates on a byte slice. Useful when the
/// band arrives through an upload rather than the filesystem.
pub fn read_geotiff_from_buffer<T>(data: &[u8], band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data), band, "<buffer>")
}

/// Internal: decode a GeoTIFF from any `Read + Seek` source
fn decode_geotiff<T, R>(reader: R, _band: Option<usize>, label: &str) -> Result<Raster<T>>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let unreadable = |reason: String| Error::UnreadableRaster {
        path: label.to_string(),
        reason,
    };

    let mut decoder =
        Decoder::new(reader).map_err(|e| unreadable(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| unreadable(format!("cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| unreadable(format!("cannot read image data: {}", e)))?;

    let data: Vec<T> = match result {
        DecodingResult::F32(buf) => cast_samples(&buf),
        DecodingResult::F64(buf) => cast_samples(&buf),
        DecodingResult::U8(buf) => cast_samples(&buf),
        DecodingResult::U16(buf) => cast_samples(&buf),
        DecodingResult::U32(buf) => cast_samples(&buf),
        DecodingResult::I8(buf) => cast_samples(&buf),
        DecodingResult::I16(buf) => cast_samples(&buf),
        DecodingResult::I32(buf) => cast_samples(&buf),
        _ => return Err(unreadable("unsupported TIFF pixel format".to_string())),
    };

    if data.len() != rows * cols {
        return Err(unreadable(format!(
            "sample count {} does not match {}x{}",
            data.len(),
            rows,
            cols
        )));
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Ok(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }

    if let Some(nodata) = read_nodata(&mut decoder) {
        raster.set_nodata(num_traits::cast(nodata));
    }

    Ok(raster)
}

fn cast_samples<S, T>(buf: &[S]) -> Vec<T>
where
    S: Copy + num_traits::NumCast,
    T: RasterElement,
{
    buf.iter()
        .map(|&v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

/// Attempt to read a GeoTransform from ModelPixelScaleTag + ModelTiepointTag
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::ModelPixelScaleTag)
        .map_err(|_| Error::Other("no pixel scale tag".into()))?;

    let tiepoint = decoder
        .get_tag_f64_vec(Tag::ModelTiepointTag)
        .map_err(|_| Error::Other("no tiepoint tag".into()))?;

    if scale.len() >= 2 && tiepoint.len() >= 6 {
        // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
        let pixel_width = scale[0];
        let pixel_height = -scale[1]; // Negative for north-up

        return Ok(GeoTransform::new(
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        ));
    }

    Err(Error::Other("cannot determine geotransform".into()))
}

/// Attempt to read the GDAL_NODATA sentinel (ASCII tag)
fn read_nodata<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder
        .get_tag_ascii_string(Tag::GdalNodata)
        .ok()?;
    text.trim().trim_end_matches('\0').parse::<f64>().ok()
}

/// Write a Raster to a GeoTIFF file
///
/// Writes as 32-bit float grayscale with geotransform and GDAL_NODATA
/// tags.
pub fn write_geotiff<T, P>(
    raster: &Raster<T>,
    path: P,
    options: Option<GeoTiffOptions>,
) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    encode_geotiff(raster, file, options.unwrap_or_default())
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(
    raster: &Raster<T>,
    options: Option<GeoTiffOptions>,
) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), options.unwrap_or_default())?;
    Ok(buf)
}

/// Internal: encode a Raster as GeoTIFF into any `Write + Seek` sink
fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: std::io::Write + std::io::Seek,
{
    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();

    // Convert data to f32
    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::Other(format!("cannot create TIFF image: {}", e)))?;

    let gt = raster.transform();

    // ModelPixelScaleTag
    let scale = vec![gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(MODEL_PIXEL_SCALE), scale.as_slice())
        .map_err(|e| Error::Other(format!("cannot write scale tag: {}", e)))?;

    // ModelTiepointTag
    let tiepoint = vec![0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(MODEL_TIEPOINT), tiepoint.as_slice())
        .map_err(|e| Error::Other(format!("cannot write tiepoint tag: {}", e)))?;

    // Minimal GeoKeyDirectoryTag so GIS tools recognize the output as a
    // GeoTIFF: GTModelTypeGeoKey=1 (Projected), GTRasterTypeGeoKey=1
    // (RasterPixelIsArea).
    let geokeys: Vec<u16> = vec![
        1, 1, 0, 2, // Version 1.1.0, 2 keys
        1024, 0, 1, 1, // GTModelTypeGeoKey
        1025, 0, 1, 1, // GTRasterTypeGeoKey
    ];
    image
        .encoder()
        .write_tag(Tag::Unknown(GEO_KEY_DIRECTORY), geokeys.as_slice())
        .map_err(|e| Error::Other(format!("cannot write geokey tag: {}", e)))?;

    // GDAL_NODATA so downstream readers can rebuild the mask
    let nodata = options
        .nodata_override
        .or_else(|| raster.nodata().and_then(|nd| nd.to_f64()));
    if let Some(nd) = nodata {
        let text = if nd.is_nan() {
            "nan".to_string()
        } else {
            format!("{}", nd)
        };
        image
            .encoder()
            .write_tag(Tag::Unknown(GDAL_NODATA), text.as_str())
            .map_err(|e| Error::Other(format!("cannot write nodata tag: {}", e)))?;
    }

    image
        .write_data(&data)
        .map_err(|e| Error::Other(format!("cannot write image data: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_raster() -> Raster<f64> {
        let mut r = Raster::from_vec(vec![0.1, 0.2, 0.3, 0.4], 2, 2).unwrap();
        r.set_transform(GeoTransform::new(300000.0, 5000040.0, 30.0, -30.0));
        r.set_nodata(Some(-9999.0));
        r
    }

    #[test]
    fn buffer_roundtrip_preserves_data_and_transform() {
        let raster = sample_raster();
        let buf = write_geotiff_to_buffer(&raster, None).unwrap();
        let loaded: Raster<f64> = read_geotiff_from_buffer(&buf, None).unwrap();

        assert_eq!(loaded.shape(), raster.shape());
        assert!((loaded.get(0, 0).unwrap() - 0.1).abs() < 1e-6);
        assert!((loaded.transform().origin_x - 300000.0).abs() < 1e-6);
        assert!((loaded.transform().pixel_width - 30.0).abs() < 1e-6);
    }

    #[test]
    fn buffer_roundtrip_preserves_nodata_sentinel() {
        let raster = sample_raster();
        let buf = write_geotiff_to_buffer(&raster, None).unwrap();
        let loaded: Raster<f64> = read_geotiff_from_buffer(&buf, None).unwrap();

        assert_eq!(loaded.nodata(), Some(-9999.0));
    }

    #[test]
    fn file_roundtrip() {
        let raster = sample_raster();
        let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();
        write_geotiff(&raster, tmp.path(), None).unwrap();

        let loaded: Raster<f64> = read_geotiff(tmp.path(), None).unwrap();
        assert_eq!(loaded.shape(), (2, 2));
        assert!((loaded.get(1, 1).unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn corrupt_input_is_unreadable() {
        let result: Result<Raster<f64>> = read_geotiff_from_buffer(b"not a tiff", None);
        assert!(matches!(result, Err(Error::UnreadableRaster { .. })));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let result: Result<Raster<f64>> = read_geotiff("/nonexistent/band.tif", None);
        assert!(matches!(result, Err(Error::UnreadableRaster { .. })));
    }
}
