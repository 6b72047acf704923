//! Error types for palette operations

use std::fmt;
use std::num::ParseIntError;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for palette validation.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// No colors provided in palette
    EmptyPalette,
    /// More entries than an 8-bit index can address
    TooManyColors {
        /// Number of entries requested
        len: usize,
    },
    /// Duplicate color found at the specified index
    DuplicateColor {
        /// Index where the duplicate was found
        index: usize,
    },
    /// Real-color count exceeds the table it is supposed to prefix
    InvalidTable {
        /// Declared number of real colors
        real_len: usize,
        /// Total table length
        table_len: usize,
    },
    /// Invalid hex color string
    ParseColor(ParseColorError),
}

impl From<ParseColorError> for PaletteError {
    fn from(err: ParseColorError) -> Self {
        PaletteError::ParseColor(err)
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => {
                write!(f, "palette cannot be empty")
            }
            PaletteError::TooManyColors { len } => {
                write!(f, "palette has {} entries (max 256)", len)
            }
            PaletteError::DuplicateColor { index } => {
                write!(f, "duplicate color found at index {}", index)
            }
            PaletteError::InvalidTable {
                real_len,
                table_len,
            } => {
                write!(
                    f,
                    "palette table declares {} real colors but holds only {} entries",
                    real_len, table_len
                )
            }
            PaletteError::ParseColor(err) => {
                write!(f, "invalid color: {}", err)
            }
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_error_messages() {
        assert_eq!(
            PaletteError::EmptyPalette.to_string(),
            "palette cannot be empty"
        );
        assert_eq!(
            PaletteError::TooManyColors { len: 300 }.to_string(),
            "palette has 300 entries (max 256)"
        );
        assert_eq!(
            PaletteError::InvalidTable {
                real_len: 4,
                table_len: 3
            }
            .to_string(),
            "palette table declares 4 real colors but holds only 3 entries"
        );
    }

    #[test]
    fn test_parse_error_has_source() {
        use std::error::Error;
        let err: PaletteError = ParseColorError::InvalidLength.into();
        assert!(err.source().is_some());
        assert!(PaletteError::EmptyPalette.source().is_none());
    }
}
