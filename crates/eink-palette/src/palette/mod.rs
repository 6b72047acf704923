//! Palette types and utilities
//!
//! This module provides the ordered device palette and the error types for
//! parsing and validating it.

mod error;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::{Palette, MAX_PALETTE_LEN};
