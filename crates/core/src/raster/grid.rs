//! Main Raster type

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, RasterElement};
use ndarray::{Array2, ArrayView2};

/// A georeferenced single-band raster grid.
///
/// `Raster<T>` stores values of type `T` in a 2D grid (row-major) with
/// an affine geotransform and an optional nodata sentinel. Once a band
/// has been read it is treated as immutable by the processing code.
///
/// # Example
///
/// ```ignore
/// use verdant_core::Raster;
///
/// let mut red: Raster<f64> = Raster::new(2, 2);
/// red.set(0, 0, 0.1)?;
/// red.set_nodata(Some(-9999.0));
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
    /// Affine transformation
    transform: GeoTransform,
    /// Nodata sentinel
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
            transform: GeoTransform::default(),
            nodata: None,
        }
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
            transform: GeoTransform::default(),
            nodata: None,
        }
    }

    /// Create a raster from existing data in row-major order
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self {
            data: array,
            transform: GeoTransform::default(),
            nodata: None,
        })
    }

    /// Create a raster with the same transform but a different cell type
    pub fn with_same_meta<U: RasterElement>(&self, rows: usize, cols: usize) -> Raster<U> {
        Raster {
            data: Array2::zeros((rows, cols)),
            transform: self.transform,
            nodata: None,
        }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    // Metadata

    /// Get the geotransform
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Set the geotransform
    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    /// Get the nodata sentinel
    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// Set the nodata sentinel
    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    // Value checks

    /// Check if a value matches the nodata sentinel
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    /// Number of cells that carry a measurement
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|&&v| !self.is_nodata(v)).count()
    }

    /// Iterator over valid (non-nodata) cell values
    pub fn valid_values(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied().filter(|&v| !self.is_nodata(v))
    }

    // Statistics

    /// Basic statistics (min, max, mean) over valid cells
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min = None;
        let mut max = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter() {
            if self.is_nodata(value) {
                continue;
            }

            if min.map_or(true, |m| value < m) {
                min = Some(value);
            }
            if max.map_or(true, |m| value > m) {
                max = Some(value);
            }

            if let Some(v) = value.to_f64() {
                sum += v;
                count += 1;
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        RasterStatistics {
            min,
            max,
            mean,
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<f64> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
    }

    #[test]
    fn test_raster_access() {
        let mut raster: Raster<f64> = Raster::new(10, 10);
        raster.set(5, 5, 42.0).unwrap();
        assert_eq!(raster.get(5, 5).unwrap(), 42.0);
        assert!(raster.get(10, 0).is_err());
    }

    #[test]
    fn test_from_vec_wrong_length() {
        let result: Result<Raster<f64>> = Raster::from_vec(vec![1.0; 5], 2, 3);
        assert!(result.is_err());
    }

    #[test]
    fn test_valid_count_with_sentinel() {
        let mut raster: Raster<f64> = Raster::filled(3, 3, 1.0);
        raster.set_nodata(Some(-9999.0));
        raster.set(0, 0, -9999.0).unwrap();
        raster.set(1, 1, f64::NAN).unwrap();

        assert_eq!(raster.valid_count(), 7);
        assert_eq!(raster.valid_values().count(), 7);
    }

    #[test]
    fn test_raster_statistics() {
        let mut raster: Raster<f64> = Raster::new(2, 2);
        raster.set(0, 0, -0.5).unwrap();
        raster.set(0, 1, 0.5).unwrap();
        raster.set(1, 0, 1.0).unwrap();
        raster.set(1, 1, f64::NAN).unwrap();
        raster.set_nodata(Some(f64::NAN));

        let stats = raster.statistics();
        assert_eq!(stats.min, Some(-0.5));
        assert_eq!(stats.max, Some(1.0));
        assert_eq!(stats.valid_count, 3);
        assert_eq!(stats.nodata_count, 1);
    }
}
