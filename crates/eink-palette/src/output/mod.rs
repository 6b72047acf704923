//! Quantization output types.
//!
//! [`IndexedImage`] is the canonical result of quantization: one palette
//! index per pixel plus the palette itself. [`Mask`] is a per-pixel
//! selection derived from it.

mod indexed_image;
mod mask;

pub use indexed_image::IndexedImage;
pub use mask::Mask;
