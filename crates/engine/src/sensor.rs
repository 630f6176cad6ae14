//! Satellite platforms and radiometric calibration
//!
//! Raw band values are digital numbers (DN); each platform defines its
//! own transform from DN to surface reflectance. The transform is
//! plain configuration so the same engine serves calibrated and
//! uncalibrated inputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported satellite platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sensor {
    /// Landsat 8/9 (OLI / OLI-2), Collection 2 Level-2 products.
    /// Red = band 4, NIR = band 5.
    Landsat8_9,
    /// Sentinel-2 (MSI), Level-2A products.
    /// Red = band 4, NIR = band 8.
    Sentinel2,
}

impl Sensor {
    /// Human-readable platform name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Landsat8_9 => "Landsat 8/9",
            Self::Sentinel2 => "Sentinel-2",
        }
    }

    /// The platform's DN-to-reflectance calibration.
    ///
    /// Landsat Collection 2 Level-2 surface reflectance uses a linear
    /// rescale (`DN * 0.0000275 - 0.2`); Sentinel-2 L2A uses a fixed
    /// 10000 divisor.
    pub fn default_calibration(&self) -> Calibration {
        match self {
            Self::Landsat8_9 => Calibration::Linear {
                gain: 0.0000275,
                offset: -0.2,
            },
            Self::Sentinel2 => Calibration::Divisor(10000.0),
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sensor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "landsat" | "landsat8" | "landsat9" | "landsat8_9" | "landsat-8/9" => {
                Ok(Self::Landsat8_9)
            }
            "sentinel" | "sentinel2" | "sentinel-2" => Ok(Self::Sentinel2),
            other => Err(format!(
                "unknown sensor '{}' (expected 'landsat' or 'sentinel2')",
                other
            )),
        }
    }
}

/// Radiometric scaling from raw digital numbers to reflectance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Calibration {
    /// `dn * gain + offset`
    Linear { gain: f64, offset: f64 },
    /// `dn / divisor`
    Divisor(f64),
    /// Inputs are already reflectance
    Identity,
}

impl Calibration {
    /// Apply the transform to a single sample
    #[inline]
    pub fn apply(&self, dn: f64) -> f64 {
        match *self {
            Self::Linear { gain, offset } => dn * gain + offset,
            Self::Divisor(d) => dn / d,
            Self::Identity => dn,
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::Identity
    }
}
