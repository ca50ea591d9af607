use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Pack an RGB triple into a 24-bit key: `(r << 16) | (g << 8) | b`.
#[inline(always)]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline(always)]
pub fn unpack_rgb(key: u32) -> Srgb<u8> {
    Srgb::new((key >> 16) as u8, (key >> 8) as u8, key as u8)
}

/// Lowercase `#rrggbb`.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Parse `#rrggbb` or `rrggbb`, in either case.
pub fn parse_hex(value: &str) -> Result<Srgb<u8>> {
    let invalid = || ExtractError::InvalidHex {
        value: value.to_string(),
    };
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
    let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
    let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
    Ok(Srgb::new(r, g, b))
}

/// Percentage of `total` rounded to two decimal places.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((count as f64 / total as f64) * 100.0 * 100.0).round() / 100.0
}

/// One entry of the extracted palette, as handed to the color grid and
/// persisted with the artwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedColor {
    pub hex: String,
    pub pct: f64,
}

impl ExtractedColor {
    pub fn from_key(key: u32, count: u64, considered: u64) -> Self {
        Self {
            hex: to_hex(unpack_rgb(key)),
            pct: percentage(count, considered),
        }
    }

    pub fn rgb(&self) -> Result<Srgb<u8>> {
        parse_hex(&self.hex)
    }
}
