pub mod canvas;
pub mod composer;
pub mod font;
pub mod png_encode;
pub mod text_fit;

pub use canvas::Canvas;
pub use composer::{Composer, DescriptionChoice};
pub use font::{FontLoader, GlyphFont, SvgFont, SvgFontLoader};
pub use png_encode::encode_indexed_png;
pub use text_fit::{fit, fit_paragraphs, FitOptions, FittedText, TextLayout};
