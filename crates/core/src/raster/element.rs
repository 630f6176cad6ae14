//! Raster element trait for generic cell values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a raster cell.
///
/// Bounds the value types a band may carry: raw digital numbers arrive
/// as unsigned integers, reflectance and NDVI as floats.
pub trait RasterElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Default nodata sentinel for this type
    fn default_nodata() -> Self;

    /// Check if this value matches the nodata sentinel.
    ///
    /// For float types a NaN value is always treated as nodata, even
    /// when no sentinel is set.
    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    /// Whether this type is a floating point type
    fn is_float() -> bool;

    /// Convert self to f64
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }
}

macro_rules! impl_raster_element_int {
    ($t:ty) => {
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::MIN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                match nodata {
                    Some(nd) => *self == nd,
                    None => false,
                }
            }

            fn is_float() -> bool {
                false
            }
        }
    };
}

macro_rules! impl_raster_element_float {
    ($t:ty) => {
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::NAN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                if self.is_nan() {
                    return true;
                }
                match nodata {
                    Some(nd) => (self - nd).abs() < <$t>::EPSILON * 100.0,
                    None => false,
                }
            }

            fn is_float() -> bool {
                true
            }
        }
    };
}

impl_raster_element_int!(i16);
impl_raster_element_int!(i32);
impl_raster_element_int!(u8);
impl_raster_element_int!(u16);
impl_raster_element_int!(u32);
impl_raster_element_float!(f32);
impl_raster_element_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_always_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!(f64::NAN.is_nodata(Some(-9999.0)));
    }

    #[test]
    fn int_nodata_needs_sentinel() {
        assert!(!0u16.is_nodata(None));
        assert!(0u16.is_nodata(Some(0)));
        assert!(!1u16.is_nodata(Some(0)));
    }
}
