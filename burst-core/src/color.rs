//! Body colours.
//!
//! Colours travel through the configuration snapshot as `#rrggbb` strings and
//! are stored as [`Rgb`]. Fragments get a random shade of their parent's
//! fragment colour so a burst reads as one family of balls.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{BurstError, BurstResult};

/// An 8-bit RGB colour, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Fallback colours used when no base colour is configured.
pub const PALETTE: [Rgb; 16] = [
    Rgb::new(0xFF, 0x52, 0x52),
    Rgb::new(0xFF, 0x40, 0x81),
    Rgb::new(0xE0, 0x40, 0xFB),
    Rgb::new(0x7C, 0x4D, 0xFF),
    Rgb::new(0x53, 0x6D, 0xFE),
    Rgb::new(0x44, 0x8A, 0xFF),
    Rgb::new(0x40, 0xC4, 0xFF),
    Rgb::new(0x18, 0xFF, 0xFF),
    Rgb::new(0x64, 0xFF, 0xDA),
    Rgb::new(0x69, 0xF0, 0xAE),
    Rgb::new(0xB2, 0xFF, 0x59),
    Rgb::new(0xEE, 0xFF, 0x41),
    Rgb::new(0xFF, 0xFF, 0x00),
    Rgb::new(0xFF, 0xD7, 0x40),
    Rgb::new(0xFF, 0xAB, 0x40),
    Rgb::new(0xFF, 0x6E, 0x40),
];

/// Largest shade variation applied to fragment colours.
pub const SHADE_SPREAD: f64 = 0.4;

impl Rgb {
    /// Default main body colour.
    pub const RED: Rgb = Rgb::new(0xFF, 0x52, 0x52);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb`, or either form without the leading `#`.
    pub fn from_hex(hex: &str) -> BurstResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(BurstError::InvalidColor(hex.to_string())),
        };

        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| BurstError::InvalidColor(hex.to_string()))
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lighten (positive) or darken (negative) every channel by
    /// `variation * 100`, saturating at 0 and 255.
    pub fn shade(&self, variation: f64) -> Self {
        let offset = (variation * 100.0).round();
        let adjust = |c: u8| (f64::from(c) + offset).clamp(0.0, 255.0) as u8;
        Self::new(adjust(self.r), adjust(self.g), adjust(self.b))
    }

    /// A random shade within [`SHADE_SPREAD`] of this colour.
    pub fn random_shade<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        self.shade(rng.gen_range(-SHADE_SPREAD..SHADE_SPREAD))
    }

    /// A random entry of [`PALETTE`].
    pub fn random_palette<R: Rng + ?Sized>(rng: &mut R) -> Self {
        PALETTE[rng.gen_range(0..PALETTE.len())]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::RED
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = BurstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = BurstError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}
