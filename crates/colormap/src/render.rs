//! Raster-to-RGBA rendering

use crate::scheme::{evaluate, ColorScheme, Rgb};
use verdant_core::raster::{Raster, RasterElement};
use verdant_engine::classify::{ClassScheme, CLASS_NODATA};

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Convert an NDVI raster to an RGBA pixel buffer.
///
/// The value domain is the fixed NDVI range [-1, 1]; -1 maps to the
/// scheme's first stop, +1 to its last. Returns `rows * cols * 4` bytes
/// in row-major order. Nodata and non-finite pixels are transparent.
pub fn ndvi_to_rgba(ndvi: &Raster<f64>, scheme: ColorScheme) -> Vec<u8> {
    let nodata = ndvi.nodata();
    let mut rgba = vec![0u8; ndvi.len() * 4];

    for (i, &value) in ndvi.data().iter().enumerate() {
        let offset = i * 4;

        if value.is_nodata(nodata) || !value.is_finite() {
            rgba[offset..offset + 4].copy_from_slice(&TRANSPARENT);
            continue;
        }

        let t = (value + 1.0) / 2.0;
        let Rgb { r, g, b } = evaluate(scheme, t);
        rgba[offset] = r;
        rgba[offset + 1] = g;
        rgba[offset + 2] = b;
        rgba[offset + 3] = 255;
    }

    rgba
}

/// Flat colors for classification buckets, in rule order
#[derive(Debug, Clone)]
pub struct ClassPalette {
    colors: Vec<Rgb>,
}

impl ClassPalette {
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self { colors }
    }

    /// Palette for [`ClassScheme::five_class`]:
    /// Water, Bare Soil, Sparse, Moderate, Dense
    pub fn five_class() -> Self {
        Self::new(vec![
            Rgb::new(49, 107, 196),
            Rgb::new(196, 168, 132),
            Rgb::new(205, 215, 120),
            Rgb::new(120, 180, 70),
            Rgb::new(20, 110, 40),
        ])
    }

    /// Palette for [`ClassScheme::four_class`]:
    /// Water, Barren, Shrub/Grassland, Rainforest
    pub fn four_class() -> Self {
        Self::new(vec![
            Rgb::new(49, 107, 196),
            Rgb::new(210, 200, 180),
            Rgb::new(170, 200, 90),
            Rgb::new(10, 90, 35),
        ])
    }

    /// A palette matching a scheme's bucket count
    pub fn for_scheme(scheme: &ClassScheme) -> Option<Self> {
        match scheme.len() {
            4 => Some(Self::four_class()),
            5 => Some(Self::five_class()),
            _ => None,
        }
    }

    pub fn color(&self, index: u8) -> Option<Rgb> {
        self.colors.get(index as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Convert a classified raster to an RGBA pixel buffer using flat
/// per-bucket colors. The nodata sentinel and any index outside the
/// palette render transparent.
pub fn classes_to_rgba(classes: &Raster<u8>, palette: &ClassPalette) -> Vec<u8> {
    let mut rgba = vec![0u8; classes.len() * 4];

    for (i, &index) in classes.data().iter().enumerate() {
        let offset = i * 4;

        if index == CLASS_NODATA {
            rgba[offset..offset + 4].copy_from_slice(&TRANSPARENT);
            continue;
        }

        match palette.color(index) {
            Some(Rgb { r, g, b }) => {
                rgba[offset] = r;
                rgba[offset + 1] = g;
                rgba[offset + 2] = b;
                rgba[offset + 3] = 255;
            }
            None => rgba[offset..offset + 4].copy_from_slice(&TRANSPARENT),
        }
    }

    rgba
}
