//! The fixed five-band colour scale.
//!
//! Bands are half-open on the right except the last one, which is closed at 100:
//! `[0,20) [20,40) [40,60) [60,80) [80,100]`. Threshold values resolve to the upper
//! band, so `color_for_value(Some(20.0))` is the `[20,40)` colour.

use crate::style::Rgba;

/// One of the five value bands, light to dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorBand {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ColorBand {
    pub const ALL: [ColorBand; 5] = [
        ColorBand::VeryLow,
        ColorBand::Low,
        ColorBand::Medium,
        ColorBand::High,
        ColorBand::VeryHigh,
    ];

    /// Band for a value. Below 0 clamps to the first band, above 100 to the last,
    /// `NaN` counts as 0.
    pub fn for_value(value: f64) -> ColorBand {
        let v = if value.is_nan() { 0.0 } else { value };
        if v < 20.0 {
            ColorBand::VeryLow
        } else if v < 40.0 {
            ColorBand::Low
        } else if v < 60.0 {
            ColorBand::Medium
        } else if v < 80.0 {
            ColorBand::High
        } else {
            ColorBand::VeryHigh
        }
    }

    /// Inclusive lower bound of the band.
    pub fn lower(self) -> u32 {
        self.index() as u32 * 20
    }

    /// Upper bound (exclusive, except 100 for the top band).
    pub fn upper(self) -> u32 {
        self.lower() + 20
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn color(self) -> Rgba {
        PALETTE[self.index()]
    }

    /// Legend text, e.g. `20–40%`.
    pub fn label(self) -> String {
        format!("{}–{}%", self.lower(), self.upper())
    }
}

// Light yellow to dark red.
const PALETTE: [Rgba; 5] = [
    Rgba::rgb(0xFF, 0xED, 0xA0), // #FFEDA0
    Rgba::rgb(0xFE, 0xB2, 0x4C), // #FEB24C
    Rgba::rgb(0xFD, 0x8D, 0x3C), // #FD8D3C
    Rgba::rgb(0xE3, 0x1A, 0x1C), // #E31A1C
    Rgba::rgb(0x80, 0x00, 0x26), // #800026
];

/// Fill colour for an optional value; a missing value renders like `0`.
pub fn color_for_value(value: Option<f64>) -> Rgba {
    ColorBand::for_value(value.unwrap_or(0.0)).color()
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba,
}

/// Static legend describing the fixed scale (not the data distribution).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            entries: ColorBand::ALL
                .iter()
                .map(|b| LegendEntry {
                    label: b.label(),
                    color: b.color(),
                })
                .collect(),
        }
    }
}

impl Default for Legend {
    fn default() -> Self {
        Legend::new("Value")
    }
}
