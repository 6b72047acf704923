//! Assertion helpers for tests.

use inkdex::rendering::Canvas;
use pretty_assertions::assert_eq;

pub const BLACK_PX: [u8; 4] = [0, 0, 0, 255];
pub const WHITE_PX: [u8; 4] = [255, 255, 255, 255];

/// Assert the canvas pixel at `(x, y)` has the given straight RGBA value
pub fn assert_pixel(canvas: &Canvas, x: u32, y: u32, expected: [u8; 4]) {
    assert_eq!(
        canvas.pixel(x, y),
        Some(expected),
        "Unexpected pixel at ({x}, {y})"
    );
}

/// Assert bytes start with the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}
