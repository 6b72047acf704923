//! Fixed-metric font so layouts can be checked without font files.

use eink_palette::Rgb;
use inkdex::error::{CanvasError, FitError};
use inkdex::rendering::{Canvas, FontLoader, GlyphFont};
use std::cell::Cell;

/// Every character advances `size / 2`; a line is `ceil(1.25 * size)` tall.
/// Non-space glyphs are drawn as solid blocks of the full line height.
pub struct BlockFont {
    size: u32,
}

impl BlockFont {
    pub fn advance(&self) -> u32 {
        self.size / 2
    }
}

impl GlyphFont for BlockFont {
    fn size(&self) -> u32 {
        self.size
    }

    fn line_height(&self) -> u32 {
        (self.size * 5).div_ceil(4)
    }

    fn measure(&self, text: &str) -> Result<u32, FitError> {
        Ok(text.trim_end().chars().count() as u32 * self.advance())
    }

    fn draw(
        &self,
        canvas: &mut Canvas,
        x: u32,
        y: u32,
        text: &str,
        color: Rgb,
    ) -> Result<(), CanvasError> {
        canvas.check_bounds(x, y, 1, self.line_height())?;
        let advance = self.advance().max(1);
        for (i, c) in text.chars().enumerate() {
            let gx = x + i as u32 * advance;
            if gx + advance > canvas.width() {
                break;
            }
            if !c.is_whitespace() {
                canvas.fill_rect(gx, y, advance, self.line_height(), color)?;
            }
        }
        Ok(())
    }
}

/// Loader for [`BlockFont`] that counts loads.
#[derive(Default)]
pub struct BlockFontLoader {
    pub loads: Cell<u32>,
}

impl FontLoader for BlockFontLoader {
    type Font = BlockFont;

    fn load(&self, size: u32) -> Result<BlockFont, FitError> {
        self.loads.set(self.loads.get() + 1);
        Ok(BlockFont { size })
    }
}
