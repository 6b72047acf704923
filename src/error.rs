use eink_palette::{PaletteError, QuantizeError};
use thiserror::Error;

use crate::models::RecordKey;

/// Failure to lay text out inside a box.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("No font size >= {min_size} fits {max_width}x{max_height}")]
    NoSizeFits {
        min_size: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("Failed to load font '{family}': {reason}")]
    FontLoad { family: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Failed to allocate {width}x{height} pixmap")]
    PixmapAllocation { width: u32, height: u32 },

    #[error(
        "Region {width}x{height} at ({x}, {y}) exceeds {canvas_width}x{canvas_height} canvas"
    )]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    #[error("Text render error: {0}")]
    TextRender(String),
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Missing icon for category '{0}'")]
    MissingIcon(String),

    #[error("Failed to fit {block} text: {source}")]
    Fit {
        block: &'static str,
        #[source]
        source: FitError,
    },

    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    #[error("Layout needs at least {needed_width}x{needed_height}, canvas is {width}x{height}")]
    LayoutOverflow {
        width: u32,
        height: u32,
        needed_width: u32,
        needed_height: u32,
    },

    #[error("Quantize error: {0}")]
    Quantize(#[from] QuantizeError),
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image is {actual_width}x{actual_height}, display is {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No record for '{0}'")]
    RecordNotFound(RecordKey),

    #[error("No sprite for '{0}'")]
    SpriteNotFound(RecordKey),

    #[error("No renderable record after {attempts} attempts")]
    NoRenderableRecord { attempts: u32 },

    #[error("Compose error: {0}")]
    Compose(#[from] ComposeError),

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),
}
