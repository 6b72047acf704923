#![allow(clippy::module_inception)]

//! eink-palette: fixed-palette quantization for e-ink displays
//!
//! E-ink controllers accept only a handful of discrete colors. This crate
//! reduces a full-color raster to such a palette and splits the result into
//! per-color selections for controllers that want one bitplane per ink.
//!
//! # Quick Start
//!
//! ```
//! use eink_palette::{Palette, Quantizer, Rgb};
//!
//! let palette = Palette::new(&[Rgb::WHITE, Rgb::BLACK, Rgb::new(255, 255, 0)]).unwrap();
//!
//! // 2x1 RGBA image: one red pixel, one transparent pixel
//! let rgba = [255, 0, 0, 255, 0, 0, 0, 0];
//! let image = Quantizer::new(palette).quantize_rgba(&rgba, 2, 1).unwrap();
//!
//! // Red lands on yellow, transparency falls through to the white background
//! assert_eq!(image.indices(), &[2, 0]);
//!
//! // One bitplane for the accent ink
//! let yellow = image.mask(&[2]);
//! assert_eq!(yellow.count_on(), 1);
//! ```
//!
//! # Matching
//!
//! Nearest color is chosen by squared Euclidean distance in 8-bit RGB
//! space. Equal distances prefer the entry with the closest chroma, then the
//! earliest palette index, so results are stable for a given palette order. Padding entries of a fixed-size palette table
//! are never candidates.
//!
//! # Pipeline
//!
//! ```text
//! RGBA input
//!     |
//!     v
//! composite alpha over background (white by default)
//!     |
//!     v
//! nearest real palette entry  (optionally Floyd-Steinberg diffusion)
//!     |
//!     v
//! IndexedImage  ---> to_rgb() / mask(indices) / flipped(x, y)
//! ```

pub mod color;
pub mod output;
pub mod palette;
pub mod quantize;

pub use color::Rgb;
pub use output::{IndexedImage, Mask};
pub use palette::{Palette, PaletteError, ParseColorError};
pub use quantize::{DitherMode, QuantizeError, Quantizer};
