//! Shrink-and-wrap text fitting.
//!
//! Text is wrapped greedily at a starting size; if the wrapped block is too
//! tall, the size drops by one and the text is re-wrapped from scratch until
//! it fits or the minimum size is passed.

use eink_palette::Rgb;

use super::font::{FontLoader, GlyphFont};
use super::Canvas;
use crate::error::{CanvasError, FitError};

/// Size range and spacing for one fitting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOptions {
    pub initial_size: u32,
    pub min_size: u32,
    /// Extra pixels between consecutive lines
    pub line_spacing: u32,
}

impl FitOptions {
    pub fn new(initial_size: u32, min_size: u32) -> Self {
        Self {
            initial_size,
            min_size,
            line_spacing: 0,
        }
    }

    pub fn line_spacing(mut self, spacing: u32) -> Self {
        self.line_spacing = spacing;
        self
    }
}

/// Result of fitting: wrapped lines and the measured block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    pub size: u32,
    pub line_height: u32,
    pub line_spacing: u32,
    /// Widest line
    pub width: u32,
    pub height: u32,
}

impl TextLayout {
    /// Vertical distance between the tops of consecutive lines.
    pub fn line_pitch(&self) -> u32 {
        self.line_height + self.line_spacing
    }

    fn empty(size: u32, line_spacing: u32) -> Self {
        Self {
            lines: vec![String::new()],
            size,
            line_height: 0,
            line_spacing,
            width: 0,
            height: 0,
        }
    }
}

/// A layout together with the font it was measured with.
pub struct FittedText<F> {
    pub layout: TextLayout,
    /// `None` for empty text, which never loads a font
    pub font: Option<F>,
}

impl<F: GlyphFont> FittedText<F> {
    /// Draw every line with the block's top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut Canvas, x: u32, y: u32, color: Rgb) -> Result<(), CanvasError> {
        let Some(font) = &self.font else {
            return Ok(());
        };
        let pitch = self.layout.line_pitch();
        for (i, line) in self.layout.lines.iter().enumerate() {
            font.draw(canvas, x, y + i as u32 * pitch, line, color)?;
        }
        Ok(())
    }
}

/// Fit `text` into `max_width` x `max_height`.
///
/// Whitespace of any kind separates words. A single word wider than the box
/// is placed on its own line anyway, so the block width may exceed
/// `max_width` in that case.
pub fn fit<L: FontLoader>(
    text: &str,
    loader: &L,
    max_width: u32,
    max_height: u32,
    options: FitOptions,
) -> Result<FittedText<L::Font>, FitError> {
    fit_paragraphs(&[text], loader, max_width, max_height, options)
}

/// Fit several paragraphs with a forced line break between each.
///
/// All paragraphs share one font size and are shrunk together.
pub fn fit_paragraphs<L: FontLoader>(
    paragraphs: &[&str],
    loader: &L,
    max_width: u32,
    max_height: u32,
    options: FitOptions,
) -> Result<FittedText<L::Font>, FitError> {
    let no_fit = FitError::NoSizeFits {
        min_size: options.min_size,
        max_width,
        max_height,
    };

    if paragraphs.iter().all(|p| p.trim().is_empty()) {
        return Ok(FittedText {
            layout: TextLayout::empty(options.initial_size, options.line_spacing),
            font: None,
        });
    }
    if options.min_size == 0 || options.initial_size < options.min_size {
        return Err(no_fit);
    }

    for size in (options.min_size..=options.initial_size).rev() {
        let font = loader.load(size)?;

        let mut lines = Vec::new();
        for paragraph in paragraphs {
            lines.extend(wrap(paragraph, &font, max_width)?);
        }

        let line_height = font.line_height();
        let height = lines.len() as u32 * (line_height + options.line_spacing) - options.line_spacing;
        if height > max_height {
            tracing::trace!(size, height, max_height, "Text too tall, shrinking");
            continue;
        }

        let mut width = 0;
        for line in &lines {
            width = width.max(font.measure(line)?);
        }

        tracing::debug!(size, lines = lines.len(), width, height, "Fitted text");
        return Ok(FittedText {
            layout: TextLayout {
                lines,
                size,
                line_height,
                line_spacing: options.line_spacing,
                width,
                height,
            },
            font: Some(font),
        });
    }

    Err(no_fit)
}

/// Greedy word wrap at one font size.
fn wrap<F: GlyphFont>(text: &str, font: &F, max_width: u32) -> Result<Vec<String>, FitError> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if font.measure(&candidate)? > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Loader for a family that is not installed.
    struct MissingFamily;

    struct NeverLoaded;

    impl GlyphFont for NeverLoaded {
        fn size(&self) -> u32 {
            0
        }

        fn line_height(&self) -> u32 {
            0
        }

        fn measure(&self, _text: &str) -> Result<u32, FitError> {
            Ok(0)
        }

        fn draw(&self, _: &mut Canvas, _: u32, _: u32, _: &str, _: Rgb) -> Result<(), CanvasError> {
            Ok(())
        }
    }

    impl FontLoader for MissingFamily {
        type Font = NeverLoaded;

        fn load(&self, _size: u32) -> Result<NeverLoaded, FitError> {
            Err(FitError::FontLoad {
                family: "Pokemon GB".to_string(),
                reason: "family not installed".to_string(),
            })
        }
    }

    #[test]
    fn test_font_load_error_propagates() {
        let result = fit("An amazing mouse.", &MissingFamily, 200, 80, FitOptions::new(24, 10));
        assert!(matches!(result, Err(FitError::FontLoad { .. })));
    }

    #[test]
    fn test_blank_paragraphs_skip_font() {
        let fitted = fit_paragraphs(&["", " \t"], &MissingFamily, 0, 0, FitOptions::new(12, 8)).unwrap();
        assert_eq!(fitted.layout.height, 0);
        assert_eq!(fitted.layout.size, 12);

        let mut canvas = Canvas::new(2, 2).unwrap();
        fitted.draw(&mut canvas, 0, 0, Rgb::BLACK).unwrap();
        assert_eq!(canvas.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_line_pitch() {
        let layout = TextLayout {
            lines: vec!["a".to_string(), "b".to_string()],
            size: 24,
            line_height: 30,
            line_spacing: 8,
            width: 12,
            height: 68,
        };
        assert_eq!(layout.line_pitch(), 38);
    }
}
