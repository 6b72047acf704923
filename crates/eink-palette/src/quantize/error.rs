//! Error types for quantization

use std::fmt;

/// Error type for [`Quantizer`](super::Quantizer) operations.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantizeError {
    /// The palette holds no real colors (padding only)
    EmptyPalette,
    /// Pixel buffer length does not match the stated dimensions
    DimensionMismatch {
        /// Expected buffer length (`width * height * channels`)
        expected: usize,
        /// Actual buffer length
        actual: usize,
    },
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::EmptyPalette => {
                write!(f, "palette has no real colors to quantize against")
            }
            QuantizeError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel buffer has {} bytes, expected {}",
                    actual, expected
                )
            }
        }
    }
}

impl std::error::Error for QuantizeError {}
