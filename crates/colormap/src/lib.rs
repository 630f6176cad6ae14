//! # Verdant Colormap
//!
//! Color mapping for NDVI rasters: a diverging value scale over the
//! fixed [-1, 1] domain, and flat per-bucket palettes for classified
//! grids. The entry points are [`ndvi_to_rgba`] and [`classes_to_rgba`],
//! which produce RGBA pixel buffers for the map view; nodata pixels are
//! rendered transparent.

mod render;
mod scheme;

pub use render::{classes_to_rgba, ndvi_to_rgba, ClassPalette};
pub use scheme::{evaluate, ColorScheme, ColorStop, Rgb};
