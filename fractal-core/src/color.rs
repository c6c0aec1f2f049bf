//! Colors carried by segments and emitted with draw intents.
//!
//! The engine only needs two things from colors: parsing the hex strings
//! used in parameter sets, and deriving a branch's tip color from an HSL
//! gradient. Everything else (blending, color spaces of the target surface)
//! is left to the render sink.

use crate::error::GrowthError;

/// An opaque 8-bit sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb` (the leading `#` is optional).
    ///
    /// ### Errors
    /// Returns [`GrowthError::InvalidParameter`] when the string is not a
    /// three or six digit hex color.
    pub fn from_hex(hex: &str) -> Result<Self, GrowthError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let bad = || GrowthError::invalid("color", format!("`{hex}` is not a hex color"));

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| bad());
        match digits.len() {
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // `#abc` is shorthand for `#aabbcc`.
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(bad()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation per channel, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::rgb(r, g, b)
    }
}

/// A color in HSL form: hue in degrees, saturation and lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    pub fn to_color(self) -> Color {
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = self.h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Color::rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

/// Gradient mode settings.
///
/// The trunk starts at `root`; every segment's tip gets a lightness
/// interpolated between `from` and `to` by its length, with hue and
/// saturation taken from `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient {
    pub root: Color,
    pub from: Hsl,
    pub to: Hsl,
}

/// Segment length at which the gradient reaches `to`.
pub const GRADIENT_REFERENCE_LENGTH: f32 = 100.0;

impl Gradient {
    /// Tip color for a segment of the given length.
    pub fn branch_color(&self, length: f32) -> Color {
        let t = (length / GRADIENT_REFERENCE_LENGTH).clamp(0.0, 1.0);
        let l = self.from.l + (self.to.l - self.from.l) * t;
        Hsl::new(self.to.h, self.to.s, l).to_color()
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            root: Color::rgb(0xf7, 0xfb, 0xff),
            from: Hsl::new(217.0, 31.0, 20.0),
            to: Hsl::new(217.0, 31.0, 80.0),
        }
    }
}
