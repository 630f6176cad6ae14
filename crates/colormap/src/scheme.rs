//! Color schemes and multi-stop interpolation

/// RGB color with channels in 0..=255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Available color schemes for NDVI rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Red -> Yellow -> Green diverging scale (ColorBrewer RdYlGn),
    /// the conventional NDVI map scale
    RdYlGn,
    /// White -> dark green sequential scale
    Greens,
}

impl ColorScheme {
    /// All available schemes, useful for UI combo boxes
    pub const ALL: &[ColorScheme] = &[Self::RdYlGn, Self::Greens];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::RdYlGn => "Red-Yellow-Green",
            Self::Greens => "Greens",
        }
    }

    fn stops(&self) -> &'static [ColorStop] {
        match self {
            Self::RdYlGn => RD_YL_GN_STOPS,
            Self::Greens => GREENS_STOPS,
        }
    }
}

// ColorBrewer RdYlGn-11 endpoints and midpoints
const RD_YL_GN_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, 165, 0, 38),
    ColorStop::new(0.2, 230, 97, 68),
    ColorStop::new(0.4, 253, 190, 112),
    ColorStop::new(0.5, 255, 255, 191),
    ColorStop::new(0.6, 188, 226, 120),
    ColorStop::new(0.8, 82, 181, 92),
    ColorStop::new(1.0, 0, 104, 55),
];

const GREENS_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, 247, 252, 245),
    ColorStop::new(0.5, 116, 196, 118),
    ColorStop::new(1.0, 0, 68, 27),
];

/// Evaluate a scheme at normalized position `t` in [0, 1].
///
/// `t` outside [0, 1] clamps to the end stops.
pub fn evaluate(scheme: ColorScheme, t: f64) -> Rgb {
    let stops = scheme.stops();
    let t = t.clamp(0.0, 1.0);

    if t <= stops[0].t {
        return stops[0].color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.t {
            let span = b.t - a.t;
            let f = if span > 0.0 { (t - a.t) / span } else { 0.0 };
            return Rgb::new(
                lerp(a.color.r, b.color.r, f),
                lerp(a.color.g, b.color.g, f),
                lerp(a.color.b, b.color.b, f),
            );
        }
    }
    stops[stops.len() - 1].color
}

fn lerp(a: u8, b: u8, f: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * f).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_stops() {
        assert_eq!(evaluate(ColorScheme::RdYlGn, 0.0), Rgb::new(165, 0, 38));
        assert_eq!(evaluate(ColorScheme::RdYlGn, 1.0), Rgb::new(0, 104, 55));
    }

    #[test]
    fn midpoint_is_neutral_yellow() {
        assert_eq!(evaluate(ColorScheme::RdYlGn, 0.5), Rgb::new(255, 255, 191));
    }

    #[test]
    fn out_of_range_clamps() {
        assert_eq!(
            evaluate(ColorScheme::Greens, -3.0),
            evaluate(ColorScheme::Greens, 0.0)
        );
        assert_eq!(
            evaluate(ColorScheme::Greens, 7.0),
            evaluate(ColorScheme::Greens, 1.0)
        );
    }

    #[test]
    fn interpolation_is_monotone_between_stops() {
        let a = evaluate(ColorScheme::Greens, 0.1);
        let b = evaluate(ColorScheme::Greens, 0.4);
        // Greens darken as t grows
        assert!(a.r > b.r);
    }
}
