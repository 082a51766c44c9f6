//! Opaque RGB colors and the contrast rules used by chips and outlined text.

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Luminance at or above which a background gets a black foreground.
pub const FOREGROUND_THRESHOLD: u32 = 126;

/// Luminance below which text gets a white outline instead of a black one.
pub const STRING_BORDER_THRESHOLD: u32 = 10;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Mid gray, used for fortified units and plain missions.
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);
    /// Fill color for settlements that hate nobody in particular.
    pub const UNKNOWN_NATION: Rgb = Rgb::new(72, 72, 72);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed `0xAARRGGBB` value with a fully opaque alpha.
    pub fn argb(self) -> u32 {
        0xff00_0000 | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Lower-case hex of the packed ARGB value, as embedded in asset keys.
    pub fn argb_hex(self) -> String {
        format!("{:08x}", self.argb())
    }

    /// Perceptual luminance, `0.3R + 0.59G + 0.11B`.
    pub fn luminance(self) -> f32 {
        self.luminance_centi() as f32 / 100.0
    }

    /// Luminance scaled by 100 so threshold comparisons stay exact.
    pub fn luminance_centi(self) -> u32 {
        30 * u32::from(self.r) + 59 * u32::from(self.g) + 11 * u32::from(self.b)
    }

    /// RGBA array with full alpha.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// High-contrast foreground for text drawn on `background`.
    ///
    /// A missing background is treated as light.
    pub fn foreground_for(background: Option<Rgb>) -> Rgb {
        match background {
            Some(bg) if bg.luminance_centi() < FOREGROUND_THRESHOLD * 100 => Rgb::WHITE,
            _ => Rgb::BLACK,
        }
    }

    /// Outline color for glyphs drawn in this color: black unless the text
    /// itself is nearly black.
    pub fn string_border(self) -> Rgb {
        if self.luminance_centi() < STRING_BORDER_THRESHOLD * 100 {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    /// Parses `#rrggbb` or `rrggbb`.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(CoreError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| CoreError::InvalidColor(s.to_string()))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_hex_is_opaque() {
        assert_eq!(Rgb::BLACK.argb_hex(), "ff000000");
        assert_eq!(Rgb::new(200, 50, 50).argb_hex(), "ffc83232");
    }

    #[test]
    fn test_foreground_boundary() {
        let exact = Rgb::new(126, 126, 126);
        assert_eq!(exact.luminance_centi(), 12_600);
        assert_eq!(Rgb::foreground_for(Some(exact)), Rgb::BLACK);
        assert_eq!(Rgb::foreground_for(Some(Rgb::new(125, 125, 125))), Rgb::WHITE);
        assert_eq!(Rgb::foreground_for(Some(Rgb::WHITE)), Rgb::BLACK);
        assert_eq!(Rgb::foreground_for(None), Rgb::BLACK);
    }

    #[test]
    fn test_string_border() {
        assert_eq!(Rgb::BLACK.string_border(), Rgb::WHITE);
        assert_eq!(Rgb::new(5, 5, 5).string_border(), Rgb::WHITE);
        assert_eq!(Rgb::new(200, 200, 0).string_border(), Rgb::BLACK);
    }

    #[test]
    fn test_parse() {
        assert_eq!("#c83232".parse::<Rgb>().unwrap(), Rgb::new(200, 50, 50));
        assert_eq!("FFFFFF".parse::<Rgb>().unwrap(), Rgb::WHITE);
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("zzzzzz".parse::<Rgb>().is_err());
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "#010203");
    }
}
