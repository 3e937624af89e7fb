//! Colours and polygon style presets shared by every map adapter.
//!
//! A region is drawn with one of two presets, picked by its hover state:
//!
//! | preset        | border      | weight | fill opacity | z-order  |
//! |---------------|-------------|--------|--------------|----------|
//! | `normal`      | `#FFFFFF`   | 1      | 0.7          | as added |
//! | `highlighted` | `#666666`   | 3      | 0.9          | front    |
//!
//! The fill colour itself always comes from the colour scale (`crate::scale`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same colour, fully opaque.
    pub const fn opaque(&self) -> Rgba {
        Rgba::rgb(self.r, self.g, self.b)
    }

    /// `#RRGGBB`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error for malformed `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {0:?}")]
pub struct ParseColorError(pub String);

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Rgba::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
pub const HIGHLIGHT_BORDER: Rgba = Rgba::rgb(102, 102, 102);

/// Visual parameters of one region polygon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolygonStyle {
    pub fill: Rgba,
    pub fill_opacity: f64,
    pub stroke: Rgba,
    pub weight: u32,
}

impl PolygonStyle {
    /// Default preset for a region with the given fill.
    pub fn normal(fill: Rgba) -> Self {
        Self {
            fill,
            fill_opacity: 0.7,
            stroke: WHITE,
            weight: 1,
        }
    }

    /// Preset applied while the pointer is over the region.
    pub fn highlighted(fill: Rgba) -> Self {
        Self {
            fill,
            fill_opacity: 0.9,
            stroke: HIGHLIGHT_BORDER,
            weight: 3,
        }
    }

    /// Fill colour with `fill_opacity` folded into the alpha channel.
    pub fn fill_rgba(&self) -> Rgba {
        let a = (self.fill_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba::new(self.fill.r, self.fill.g, self.fill.b, a)
    }
}
