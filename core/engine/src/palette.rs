//! FILENAME: core/engine/src/palette.rs
//! PURPOSE: Named color palettes and the color arithmetic chart encodings need.
//! CONTEXT: Colors are assigned to series/categories by cyclic index into the
//! selected palette. Unknown palette names fall back to the default palette.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PALETTE: &str = "default";

const PALETTES: &[(&str, &[&str])] = &[
    (
        "default",
        &[
            "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f",
            "#edc948", "#b07aa1", "#ff9da7", "#9c755f", "#bab0ac",
        ],
    ),
    (
        "vibrant",
        &[
            "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231",
            "#911eb4", "#46f0f0", "#f032e6", "#bcf60c", "#fabebe",
        ],
    ),
    (
        "pastel",
        &[
            "#a6cee3", "#b2df8a", "#fb9a99", "#fdbf6f", "#cab2d6",
            "#ffff99", "#8dd3c7", "#bebada", "#fccde5", "#d9d9d9",
        ],
    ),
    (
        "ocean",
        &[
            "#03045e", "#023e8a", "#0077b6", "#0096c7", "#00b4d8",
            "#48cae4", "#90e0ef", "#ade8f4",
        ],
    ),
    (
        "sunset",
        &[
            "#ff6b6b", "#f06595", "#cc5de8", "#845ef7", "#5c7cfa",
            "#ff922b", "#fcc419", "#e8590c",
        ],
    ),
    (
        "earth",
        &[
            "#8c510a", "#bf812d", "#dfc27d", "#80cdc1", "#35978f",
            "#01665e", "#543005", "#003c30",
        ],
    ),
    (
        "monochrome",
        &["#1a1a1a", "#404040", "#666666", "#8c8c8c", "#b3b3b3", "#d9d9d9"],
    ),
];

/// An ordered list of colors selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    colors: &'static [&'static str],
}

impl Palette {
    /// Resolves a palette name, falling back to the default palette.
    pub fn named(name: Option<&str>) -> Palette {
        let requested = name.unwrap_or(DEFAULT_PALETTE);
        let &(name, colors) = PALETTES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(requested))
            .unwrap_or(&PALETTES[0]);
        Palette { name, colors }
    }

    /// Color for the `index`-th series/category (cyclic).
    pub fn color(&self, index: usize) -> &'static str {
        self.colors[index % self.colors.len()]
    }

    pub fn colors(&self) -> &'static [&'static str] {
        self.colors
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        PALETTES.iter().map(|(n, _)| *n)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::named(None)
    }
}

// ============================================================================
// COLOR
// ============================================================================

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8, // Alpha channel (255 = opaque)
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Convert to CSS hex or rgba() string.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.2})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }

    /// Parse from hex string (e.g., "#FF0000" or "FF0000").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::new(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color::with_alpha(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Same color with the given opacity (0.0 - 1.0).
    pub fn faded(&self, opacity: f32) -> Color {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color { a: alpha, ..*self }
    }

    /// Linear interpolation between two colors, `t` in 0.0 - 1.0.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Semi-transparent variant of a hex color, used for area fills.
pub fn translucent(hex: &str, opacity: f32) -> String {
    Color::from_hex(hex)
        .map(|c| c.faded(opacity).to_css())
        .unwrap_or_else(|| hex.to_string())
}
