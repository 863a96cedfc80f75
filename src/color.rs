//! Color transcoding between direct RGB samples and the level format's
//! delta-HSV representation.
//!
//! Placed blocks never carry their own RGB. Each one points at a shared
//! reference color channel and stores a hue shift plus saturation and
//! brightness offsets relative to that channel. With a reference channel
//! at full saturation and full brightness, `delta + 1` is the absolute
//! value of the original pixel.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3 or 6 hex chars after #)
    #[error("invalid color length {0}, expected 3 or 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// HSV string did not have five `a`-separated fields
    #[error("malformed HSV value '{0}'")]
    MalformedHsv(String),
}

/// A direct 8-bit RGB sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to HSV: hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
    pub fn to_hsv(self) -> Hsv {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;

        let hue = if chroma == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / chroma).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / chroma + 2.0)
        } else {
            60.0 * ((r - g) / chroma + 4.0)
        };

        let saturation = if max == 0.0 { 0.0 } else { chroma / max };

        // rem_euclid can land exactly on 360 for tiny negative inputs
        let hue = if hue >= 360.0 { hue - 360.0 } else { hue };

        Hsv { hue, saturation, value: max }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// An absolute HSV color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    /// Hue in degrees, `[0, 360)`
    pub hue: f32,
    /// Saturation, `[0, 1]`
    pub saturation: f32,
    /// Value (brightness), `[0, 1]`
    pub value: f32,
}

/// Hue/saturation/brightness offsets relative to a reference color channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaHsv {
    /// Hue shift in degrees
    pub hue: f32,
    /// Saturation offset, `[-1, 1]` when relative
    pub saturation: f32,
    /// Brightness offset, `[-1, 1]` when relative
    pub brightness: f32,
    /// Saturation is an offset from the reference channel
    pub saturation_relative: bool,
    /// Brightness is an offset from the reference channel
    pub brightness_relative: bool,
}

impl DeltaHsv {
    /// Encode an RGB sample as offsets from a fully saturated, fully bright
    /// reference channel.
    ///
    /// Both relative flags are always set. Alpha is not represented.
    pub fn from_rgb(rgb: Rgb) -> Self {
        let hsv = rgb.to_hsv();
        Self {
            hue: hsv.hue,
            saturation: hsv.saturation - 1.0,
            brightness: hsv.value - 1.0,
            saturation_relative: true,
            brightness_relative: true,
        }
    }

    /// The identity offset (no change from the reference channel).
    pub const fn identity() -> Self {
        Self {
            hue: 0.0,
            saturation: 0.0,
            brightness: 0.0,
            saturation_relative: true,
            brightness_relative: true,
        }
    }

    /// Whether every component lies in the range the level format accepts.
    pub fn is_in_range(&self) -> bool {
        let offset_ok = |v: f32, relative: bool| {
            let range = if relative { -1.0..=1.0 } else { 0.0..=2.0 };
            v.is_finite() && range.contains(&v)
        };
        self.hue.is_finite()
            && (-360.0..=360.0).contains(&self.hue)
            && offset_ok(self.saturation, self.saturation_relative)
            && offset_ok(self.brightness, self.brightness_relative)
    }
}

impl Default for DeltaHsv {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for DeltaHsv {
    /// Level-string form: `h a s a v a S a B`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}a{}a{}a{}a{}",
            self.hue,
            self.saturation,
            self.brightness,
            self.saturation_relative as u8,
            self.brightness_relative as u8
        )
    }
}

impl FromStr for DeltaHsv {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ColorError::MalformedHsv(s.to_string());
        let fields: Vec<&str> = s.split('a').collect();
        if fields.len() != 5 {
            return Err(malformed());
        }

        let float = |v: &str| v.parse::<f32>().map_err(|_| malformed());
        let flag = |v: &str| match v {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => Err(malformed()),
        };

        Ok(Self {
            hue: float(fields[0])?,
            saturation: float(fields[1])?,
            brightness: float(fields[2])?,
            saturation_relative: flag(fields[3])?,
            brightness_relative: flag(fields[4])?,
        })
    }
}

/// Parse a `#RGB` or `#RRGGBB` hex color.
pub fn parse_hex_rgb(s: &str) -> Result<Rgb, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let bad_length = |_| ColorError::InvalidLength(hex.len());
    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map_err(bad_length);
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(bad_length);

    match hex.len() {
        3 => Ok(Rgb::new(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 => Ok(Rgb::new(pair(0)?, pair(2)?, pair(4)?)),
        len => Err(ColorError::InvalidLength(len)),
    }
}
