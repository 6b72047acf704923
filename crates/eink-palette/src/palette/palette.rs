//! Ordered device palette with optional padding entries.
//!
//! Fixed-size palette formats (a 256-entry PNG `PLTE`, controller lookup
//! tables) need more entries than the panel has inks. `Palette` keeps the real
//! colors at indices `0..len()` and tracks any filler that follows them, so
//! matching never lands on a padding entry.

use std::collections::HashSet;
use std::str::FromStr;

use super::error::PaletteError;
use crate::color::Rgb;

/// Largest palette an 8-bit index can address.
pub const MAX_PALETTE_LEN: usize = 256;

/// Color used for padding entries.
const PADDING_COLOR: Rgb = Rgb::BLACK;

/// An ordered, deduplicated color palette.
///
/// # Example
///
/// ```
/// use eink_palette::{Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::WHITE, Rgb::BLACK, Rgb::new(255, 255, 0)])
///     .unwrap()
///     .padded_to(256)
///     .unwrap();
///
/// assert_eq!(palette.len(), 3);
/// assert_eq!(palette.table().len(), 256);
/// assert_eq!(palette.find_nearest(Rgb::new(250, 240, 10)), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    // Real colors first, then padding
    table: Vec<Rgb>,
    real_len: usize,
}

impl Palette {
    /// Create a palette from real colors.
    ///
    /// # Errors
    ///
    /// - `colors` is empty ([`PaletteError::EmptyPalette`])
    /// - more than 256 colors ([`PaletteError::TooManyColors`])
    /// - a color repeats ([`PaletteError::DuplicateColor`])
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Self::from_table(colors, colors.len())
    }

    /// Create a palette from colors, silently dropping repeats.
    ///
    /// Device palettes are sometimes published with a duplicate entry (e.g. a
    /// "clean" white listed after the regular white). The first occurrence
    /// keeps its position.
    pub fn deduplicated(colors: &[Rgb]) -> Result<Self, PaletteError> {
        let mut seen = HashSet::new();
        let unique: Vec<Rgb> = colors.iter().copied().filter(|c| seen.insert(*c)).collect();
        Self::new(&unique)
    }

    /// Build a palette from a fixed-size table whose first `real_len` entries
    /// are real colors and whose remainder is padding.
    ///
    /// `real_len` may be zero; such a palette is valid as a table but
    /// quantizing against it fails with `QuantizeError::EmptyPalette`.
    pub fn from_table(table: &[Rgb], real_len: usize) -> Result<Self, PaletteError> {
        if table.len() > MAX_PALETTE_LEN {
            return Err(PaletteError::TooManyColors { len: table.len() });
        }
        if real_len > table.len() {
            return Err(PaletteError::InvalidTable {
                real_len,
                table_len: table.len(),
            });
        }

        let mut seen = HashSet::new();
        for (i, color) in table[..real_len].iter().enumerate() {
            if !seen.insert(*color) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        Ok(Self {
            table: table.to_vec(),
            real_len,
        })
    }

    /// Create a palette from hex color strings such as `"#FFFF00"` or `"#FF0"`.
    pub fn from_hex(colors: &[&str]) -> Result<Self, PaletteError> {
        let parsed = colors
            .iter()
            .map(|s| Rgb::from_str(s).map_err(PaletteError::ParseColor))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&parsed)
    }

    /// Extend the table with padding entries up to `size` entries.
    ///
    /// A palette already at or above `size` is returned unchanged.
    pub fn padded_to(mut self, size: usize) -> Result<Self, PaletteError> {
        if size > MAX_PALETTE_LEN {
            return Err(PaletteError::TooManyColors { len: size });
        }
        if self.table.len() < size {
            self.table.resize(size, PADDING_COLOR);
        }
        Ok(self)
    }

    /// Number of real (selectable) colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.real_len
    }

    /// Returns true if there are no real colors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.real_len == 0
    }

    /// Number of padding entries after the real colors.
    #[inline]
    pub fn padding_len(&self) -> usize {
        self.table.len() - self.real_len
    }

    /// The real colors, in palette order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.table[..self.real_len]
    }

    /// The whole table including padding.
    #[inline]
    pub fn table(&self) -> &[Rgb] {
        &self.table
    }

    /// Color at a table index (real or padding).
    #[inline]
    pub fn color(&self, idx: usize) -> Rgb {
        self.table[idx]
    }

    /// Index of a real color that matches exactly.
    pub fn index_of(&self, color: Rgb) -> Option<usize> {
        self.colors().iter().position(|&c| c == color)
    }

    /// Nearest real color by squared Euclidean RGB distance.
    ///
    /// Among equally distant entries the one whose chroma is closest to the
    /// pixel's wins, so a saturated pixel keeps a saturated color (pure red
    /// goes to yellow rather than black). Remaining ties go to the earliest
    /// index. Returns 0 for a palette without real colors; callers guard
    /// against that case (see `Quantizer`).
    #[inline]
    pub fn find_nearest(&self, color: Rgb) -> usize {
        let mut best_idx = 0;
        let mut best_key = (u32::MAX, u8::MAX);

        // Linear scan, palettes are tiny
        for (i, &entry) in self.colors().iter().enumerate() {
            let dist = color.distance_squared(entry);
            if dist > best_key.0 {
                continue;
            }
            let key = (dist, color.chroma().abs_diff(entry.chroma()));
            if key < best_key {
                best_key = key;
                best_idx = i;
                if dist == 0 {
                    break;
                }
            }
        }

        best_idx
    }

    /// Flat `[R, G, B, ...]` bytes for the whole table, as a PNG `PLTE` chunk expects.
    pub fn to_plte(&self) -> Vec<u8> {
        self.table.iter().flat_map(|c| c.to_bytes()).collect()
    }
}
