//! # Colour Gradients
//!
//! Fixed colour ramps used to shade force diagrams. A gradient is a short,
//! ordered table of [`ColorStop`]s; a normalized magnitude in `[0, 1]` picks
//! the two stops bracketing it and blends them by an integer percentage.
//!
//! The blend is emitted as a Typst colour expression so the document engine
//! does the mixing:
//!
//! ```rust
//! use beam_core::gradient::SHEAR_GRADIENT;
//!
//! // Exactly on a stop: the stop's own colour
//! assert_eq!(SHEAR_GRADIENT.color_at(0.5).to_typst(), r##"rgb("#00ff00")"##);
//!
//! // Halfway between green (0.5) and yellow (0.6)
//! assert_eq!(
//!     SHEAR_GRADIENT.color_at(0.55).to_typst(),
//!     r##"color.mix((rgb("#ffff00"), 50%), (rgb("#00ff00"), 50%), space: rgb)"##
//! );
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// 8-bit sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Typst constructor expression, e.g. `rgb("#ff8000")`
    pub fn to_typst(&self) -> String {
        format!("rgb(\"{}\")", self)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// A pure colour anchored at a normalized threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub threshold: f64,
    pub name: &'static str,
    pub color: Rgb,
}

/// Fill colour for one diagram strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Exactly one stop's colour
    Pure(Rgb),
    /// `percent`% of `upper` mixed with the rest of `lower`
    Blend { lower: Rgb, upper: Rgb, percent: u8 },
}

impl Fill {
    pub fn to_typst(&self) -> String {
        match *self {
            Fill::Pure(c) => c.to_typst(),
            Fill::Blend { lower, upper, percent } => format!(
                "color.mix(({}, {}%), ({}, {}%), space: rgb)",
                upper.to_typst(),
                percent,
                lower.to_typst(),
                100 - percent
            ),
        }
    }
}

/// Ordered colour ramp over `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    stops: &'static [ColorStop],
}

const NAVY: Rgb = Rgb(0x00, 0x00, 0x80);
const BLUE: Rgb = Rgb(0x00, 0x00, 0xff);
const CYAN: Rgb = Rgb(0x00, 0xff, 0xff);
const GREEN: Rgb = Rgb(0x00, 0xff, 0x00);
const YELLOW: Rgb = Rgb(0xff, 0xff, 0x00);
const ORANGE: Rgb = Rgb(0xff, 0x80, 0x00);
const RED: Rgb = Rgb(0xff, 0x00, 0x00);

/// Shear force ramp: most negative shear deep blue, most positive red
pub const SHEAR_GRADIENT: Gradient = Gradient {
    stops: &[
        ColorStop { threshold: 0.0, name: "navy", color: NAVY },
        ColorStop { threshold: 0.2, name: "blue", color: BLUE },
        ColorStop { threshold: 0.4, name: "cyan", color: CYAN },
        ColorStop { threshold: 0.5, name: "green", color: GREEN },
        ColorStop { threshold: 0.6, name: "yellow", color: YELLOW },
        ColorStop { threshold: 0.8, name: "orange", color: ORANGE },
        ColorStop { threshold: 1.0, name: "red", color: RED },
    ],
};

/// Bending moment ramp: deep blue at the lowest moment, red at the highest
pub const MOMENT_GRADIENT: Gradient = Gradient {
    stops: &[
        ColorStop { threshold: 0.0, name: "navy", color: NAVY },
        ColorStop { threshold: 0.2, name: "blue", color: BLUE },
        ColorStop { threshold: 0.4, name: "cyan", color: CYAN },
        ColorStop { threshold: 0.7, name: "yellow", color: YELLOW },
        ColorStop { threshold: 1.0, name: "red", color: RED },
    ],
};

impl Gradient {
    pub fn stops(&self) -> &'static [ColorStop] {
        self.stops
    }

    /// Colour for a normalized magnitude. Values outside `[0, 1]` are
    /// clamped; NaN maps to the first stop.
    pub fn color_at(&self, norm: f64) -> Fill {
        let norm = if norm.is_nan() { 0.0 } else { norm.clamp(0.0, 1.0) };

        if let Some(stop) = self.stops.iter().find(|s| s.threshold == norm) {
            return Fill::Pure(stop.color);
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if norm > lo.threshold && norm < hi.threshold {
                let ratio = (norm - lo.threshold) / (hi.threshold - lo.threshold);
                let percent = ((ratio * 100.0) as u8).min(100);
                return match percent {
                    0 => Fill::Pure(lo.color),
                    100 => Fill::Pure(hi.color),
                    p => Fill::Blend {
                        lower: lo.color,
                        upper: hi.color,
                        percent: p,
                    },
                };
            }
        }

        // Below the first or above the last threshold
        match self.stops.first() {
            Some(first) if norm < first.threshold => Fill::Pure(first.color),
            _ => Fill::Pure(self.stops[self.stops.len() - 1].color),
        }
    }
}
