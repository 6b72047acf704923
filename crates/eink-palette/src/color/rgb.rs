//! 8-bit RGB color type

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// An opaque 8-bit sRGB color.
///
/// Used for palette entries, backgrounds and decoded pixels. Alpha is
/// resolved before a pixel becomes an `Rgb` (see [`Rgb::composite_over`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a byte array [R, G, B].
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Squared Euclidean distance in RGB space.
    ///
    /// # Example
    /// ```
    /// use eink_palette::Rgb;
    /// assert_eq!(Rgb::new(255, 0, 0).distance_squared(Rgb::new(255, 255, 0)), 255 * 255);
    /// ```
    #[inline]
    pub fn distance_squared(self, other: Self) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Spread between the strongest and weakest channel; 0 for greys.
    ///
    /// # Example
    /// ```
    /// use eink_palette::Rgb;
    /// assert_eq!(Rgb::new(255, 255, 0).chroma(), 255);
    /// assert_eq!(Rgb::new(90, 90, 90).chroma(), 0);
    /// ```
    #[inline]
    pub fn chroma(self) -> u8 {
        self.r.max(self.g).max(self.b) - self.r.min(self.g).min(self.b)
    }

    /// Resolve a straight-alpha RGBA pixel against an opaque background.
    ///
    /// Fully opaque pixels pass through unchanged and fully transparent ones
    /// become the background.
    ///
    /// # Example
    /// ```
    /// use eink_palette::Rgb;
    /// assert_eq!(Rgb::composite_over([0, 0, 0, 0], Rgb::WHITE), Rgb::WHITE);
    /// assert_eq!(Rgb::composite_over([10, 20, 30, 255], Rgb::WHITE), Rgb::new(10, 20, 30));
    /// ```
    #[inline]
    pub fn composite_over(rgba: [u8; 4], background: Self) -> Self {
        let [r, g, b, a] = rgba;
        match a {
            255 => Self::new(r, g, b),
            0 => background,
            _ => {
                let af = a as u16;
                let blend = |fg: u8, bg: u8| ((fg as u16 * af + bg as u16 * (255 - af)) / 255) as u8;
                Self::new(
                    blend(r, background.r),
                    blend(g, background.g),
                    blend(b, background.b),
                )
            }
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`, case-insensitive,
    /// with surrounding whitespace trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: 0xF -> 0xFF
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
