//! Palette quantization.
//!
//! [`Quantizer`] maps every pixel of an RGB or RGBA buffer to the index of
//! the nearest real color in a [`Palette`]. Alpha is resolved against an
//! opaque background first, so transparent regions take the background
//! color instead of black.

mod diffusion;
mod error;

pub use error::QuantizeError;

use crate::color::Rgb;
use crate::output::IndexedImage;
use crate::palette::Palette;

/// How the matching error is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    /// Plain nearest-color matching.
    #[default]
    None,
    /// Floyd-Steinberg error diffusion.
    FloydSteinberg,
}

/// Nearest-color quantizer builder.
///
/// Configuration methods consume and return `self`; the quantize methods take
/// `&self` so one quantizer serves any number of images.
///
/// # Example
///
/// ```
/// use eink_palette::{DitherMode, Palette, Quantizer, Rgb};
///
/// let palette = Palette::new(&[Rgb::WHITE, Rgb::BLACK]).unwrap();
/// let quantizer = Quantizer::new(palette)
///     .background(Rgb::WHITE)
///     .dither(DitherMode::None);
///
/// let image = quantizer.quantize_rgb(&[10, 10, 10, 240, 240, 240], 2, 1).unwrap();
/// assert_eq!(image.indices(), &[1, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct Quantizer {
    palette: Palette,
    background: Rgb,
    dither: DitherMode,
}

impl Quantizer {
    /// Create a quantizer for `palette` with a white background and no dithering.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            background: Rgb::WHITE,
            dither: DitherMode::None,
        }
    }

    /// Background that translucent pixels are composited over.
    #[inline]
    pub fn background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    /// Error handling mode.
    #[inline]
    pub fn dither(mut self, mode: DitherMode) -> Self {
        self.dither = mode;
        self
    }

    /// The palette indices refer to.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Quantize straight-alpha RGBA bytes.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::DimensionMismatch`] if `rgba.len() != width * height * 4`,
    /// [`QuantizeError::EmptyPalette`] if the palette has no real colors.
    pub fn quantize_rgba(
        &self,
        rgba: &[u8],
        width: usize,
        height: usize,
    ) -> Result<IndexedImage, QuantizeError> {
        check_len(rgba.len(), width, height, 4)?;
        let pixels: Vec<Rgb> = rgba
            .chunks_exact(4)
            .map(|px| Rgb::composite_over([px[0], px[1], px[2], px[3]], self.background))
            .collect();
        self.quantize_pixels(&pixels, width, height)
    }

    /// Quantize opaque RGB bytes.
    pub fn quantize_rgb(
        &self,
        rgb: &[u8],
        width: usize,
        height: usize,
    ) -> Result<IndexedImage, QuantizeError> {
        check_len(rgb.len(), width, height, 3)?;
        let pixels: Vec<Rgb> = rgb
            .chunks_exact(3)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();
        self.quantize_pixels(&pixels, width, height)
    }

    /// Quantize already-opaque pixels in row-major order.
    pub fn quantize_pixels(
        &self,
        pixels: &[Rgb],
        width: usize,
        height: usize,
    ) -> Result<IndexedImage, QuantizeError> {
        if pixels.len() != width * height {
            return Err(QuantizeError::DimensionMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        if self.palette.is_empty() {
            return Err(QuantizeError::EmptyPalette);
        }

        let indices = match self.dither {
            DitherMode::None => pixels
                .iter()
                .map(|&px| self.palette.find_nearest(px) as u8)
                .collect(),
            DitherMode::FloydSteinberg => {
                diffusion::floyd_steinberg(pixels, width, height, &self.palette)
            }
        };

        Ok(IndexedImage::new(indices, width, height, self.palette.clone()))
    }
}

fn check_len(
    actual: usize,
    width: usize,
    height: usize,
    channels: usize,
) -> Result<(), QuantizeError> {
    let expected = width * height * channels;
    if actual != expected {
        return Err(QuantizeError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn white_black_yellow() -> Palette {
        Palette::new(&[Rgb::WHITE, Rgb::BLACK, Rgb::new(255, 255, 0)]).unwrap()
    }

    #[test]
    fn test_pure_red_maps_to_yellow() {
        let rgb: Vec<u8> = [255, 0, 0].repeat(6);
        let image = Quantizer::new(white_black_yellow())
            .quantize_rgb(&rgb, 3, 2)
            .unwrap();
        assert_eq!(image.indices(), &[2; 6]);
    }

    #[test]
    fn test_transparent_falls_through_to_background() {
        let rgba = [0, 0, 0, 0, 0, 0, 0, 0];
        let image = Quantizer::new(white_black_yellow())
            .quantize_rgba(&rgba, 2, 1)
            .unwrap();
        assert_eq!(image.indices(), &[0, 0]);

        let on_black = Quantizer::new(white_black_yellow())
            .background(Rgb::BLACK)
            .quantize_rgba(&rgba, 2, 1)
            .unwrap();
        assert_eq!(on_black.indices(), &[1, 1]);
    }

    #[test]
    fn test_idempotent_on_palette_colors() {
        let palette = white_black_yellow();
        let rgb: Vec<u8> = [255, 255, 255, 0, 0, 0, 255, 255, 0, 200, 30, 30]
            .into_iter()
            .cycle()
            .take(4 * 4 * 3)
            .collect();

        for mode in [DitherMode::None, DitherMode::FloydSteinberg] {
            let quantizer = Quantizer::new(palette.clone()).dither(mode);
            let once = quantizer.quantize_rgb(&rgb, 4, 4).unwrap();
            let twice = quantizer.quantize_rgb(&once.to_rgb(), 4, 4).unwrap();
            assert_eq!(once.indices(), twice.indices(), "mode {:?}", mode);
        }
    }

    #[test]
    fn test_padding_entries_never_selected() {
        let palette = Palette::new(&[Rgb::WHITE, Rgb::new(255, 0, 0)])
            .unwrap()
            .padded_to(256)
            .unwrap();
        let rgb = [0u8; 12];
        let image = Quantizer::new(palette).quantize_rgb(&rgb, 2, 2).unwrap();
        assert!(image.indices().iter().all(|&i| i < 2));
    }

    #[test]
    fn test_empty_palette_error() {
        let palette = Palette::from_table(&[Rgb::BLACK; 4], 0).unwrap();
        let result = Quantizer::new(palette).quantize_rgb(&[0, 0, 0], 1, 1);
        assert_eq!(result.unwrap_err(), QuantizeError::EmptyPalette);
    }

    #[test]
    fn test_dimension_mismatch() {
        let result = Quantizer::new(white_black_yellow()).quantize_rgba(&[0; 7], 2, 1);
        assert_eq!(
            result.unwrap_err(),
            QuantizeError::DimensionMismatch {
                expected: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn test_zero_sized_image() {
        let image = Quantizer::new(white_black_yellow())
            .quantize_rgb(&[], 0, 0)
            .unwrap();
        assert!(image.indices().is_empty());
    }
}
