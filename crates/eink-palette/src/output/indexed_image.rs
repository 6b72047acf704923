//! IndexedImage: palette indices with dimensions and the owning palette.

use super::Mask;
use crate::palette::Palette;

/// A quantized image.
///
/// Stores one `u8` palette index per pixel in row-major order. Every index
/// refers to a real palette color (never a padding entry).
///
/// # Example
///
/// ```
/// use eink_palette::{IndexedImage, Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::WHITE, Rgb::BLACK]).unwrap();
/// let image = IndexedImage::new(vec![0, 1, 1, 0], 2, 2, palette);
///
/// assert_eq!(image.pixel(1, 0), 1);
/// assert_eq!(image.to_rgb().len(), 2 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedImage {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl IndexedImage {
    /// Create an image from palette indices.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    /// Palette indices in row-major order.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Consume the image, returning its indices.
    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Index at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.indices[y * self.width + x]
    }

    /// Expand to `[R, G, B, ...]` bytes through the palette.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            rgb.extend_from_slice(&self.palette.color(idx as usize).to_bytes());
        }
        rgb
    }

    /// Selection of every pixel whose index is in `selected`.
    pub fn mask(&self, selected: &[u8]) -> Mask {
        let bits = self
            .indices
            .iter()
            .map(|idx| selected.contains(idx))
            .collect();
        Mask::new(bits, self.width, self.height)
    }

    /// Mirror horizontally (`flip_x`) and/or vertically (`flip_y`).
    pub fn flipped(&self, flip_x: bool, flip_y: bool) -> Self {
        if !flip_x && !flip_y {
            return self.clone();
        }

        let mut indices = Vec::with_capacity(self.indices.len());
        for y in 0..self.height {
            let sy = if flip_y { self.height - 1 - y } else { y };
            let row = &self.indices[sy * self.width..(sy + 1) * self.width];
            if flip_x {
                indices.extend(row.iter().rev());
            } else {
                indices.extend_from_slice(row);
            }
        }

        Self::new(indices, self.width, self.height, self.palette.clone())
    }
}
