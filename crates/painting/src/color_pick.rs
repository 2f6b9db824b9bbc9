//! Color picking from surface names.
//!
//! A surface whose name carries a hex color token (`#rgb` or `#rrggbb`) acts as
//! a palette swatch: touching it selects that color instead of painting.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Six-digit form is tried first so `#1a2b3c` never matches as `#1a2`.
static HEX_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)#([0-9a-f]{6}|[0-9a-f]{3})").ok());

/// A color selected from a surface name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPick {
    /// Normalized lower-case `#rrggbb`
    pub hex: String,
    /// Components in [0, 1]
    pub rgb: [f32; 3],
}

impl ColorPick {
    /// RGBA with the given alpha
    pub fn rgba(&self, alpha: f32) -> [f32; 4] {
        [self.rgb[0], self.rgb[1], self.rgb[2], alpha]
    }
}

/// Find the first hex color token in `name`.
///
/// Returns `None` when the name has no token; that is not an error.
pub fn pick_color(name: &str) -> Option<ColorPick> {
    let regex = HEX_TOKEN.as_ref()?;
    let digits = regex.captures(name)?.get(1)?.as_str().to_ascii_lowercase();

    let hex = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        digits
    };

    let channel = |i: usize| -> Option<f32> {
        let byte = u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok()?;
        Some(byte as f32 / 255.0)
    };
    let rgb = [channel(0)?, channel(1)?, channel(2)?];

    Some(ColorPick {
        hex: format!("#{hex}"),
        rgb,
    })
}
