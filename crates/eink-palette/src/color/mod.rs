//! Color type and conversion utilities
//!
//! Panels and image files both speak 8-bit sRGB, and matching happens in that
//! space too, so a single byte-based [`Rgb`] type is all the crate needs.
//!
//! # Example
//!
//! ```
//! use eink_palette::Rgb;
//!
//! let yellow: Rgb = "#FFFF00".parse().unwrap();
//! assert_eq!(yellow, Rgb::new(255, 255, 0));
//! assert_eq!(yellow.to_string(), "#FFFF00");
//! ```

mod rgb;

pub use rgb::Rgb;
