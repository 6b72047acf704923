//! Font loading and text rasterization.
//!
//! [`FontLoader`] hands out a [`GlyphFont`] per point size. The production
//! loader, [`SvgFontLoader`], measures and draws text through usvg/resvg
//! against a shared `fontdb::Database`.

use eink_palette::Rgb;
use resvg::usvg::{self, Transform};
use std::borrow::Cow;
use std::sync::Arc;

use super::Canvas;
use crate::error::{CanvasError, FitError};

/// Text with a fixed size: measuring and drawing single lines.
pub trait GlyphFont {
    /// Point size this font was loaded at.
    fn size(&self) -> u32;

    /// Height of one line of ink, from the top of capitals to the bottom of
    /// descenders.
    fn line_height(&self) -> u32;

    /// Width in pixels of `text` on a single line.
    fn measure(&self, text: &str) -> Result<u32, FitError>;

    /// Draw one line with its top-left corner at `(x, y)`.
    ///
    /// The line box must start inside the canvas and its height must fit;
    /// ink past the right edge is clipped.
    fn draw(
        &self,
        canvas: &mut Canvas,
        x: u32,
        y: u32,
        text: &str,
        color: Rgb,
    ) -> Result<(), CanvasError>;
}

/// Capability to load a font at a given size.
pub trait FontLoader {
    type Font: GlyphFont;

    fn load(&self, size: u32) -> Result<Self::Font, FitError>;
}

/// Probe covering capital and descender extents.
const METRICS_PROBE: &str = "\u{c1}g";

/// Loads fonts from a font database and renders text via SVG.
pub struct SvgFontLoader {
    fontdb: Arc<fontdb::Database>,
    family: String,
}

impl SvgFontLoader {
    /// Build a font database from `fonts` plus the system fonts, and check that
    /// `family` resolves.
    pub fn with_fonts(
        fonts: Vec<(String, Cow<'static, [u8]>)>,
        family: impl Into<String>,
    ) -> Result<Self, FitError> {
        let family = family.into();
        let mut fontdb = fontdb::Database::new();

        for (name, data) in fonts {
            fontdb.load_font_data(data.into_owned());
            tracing::debug!(font = %name, "Loaded font");
        }

        // Load system fonts as fallback
        fontdb.load_system_fonts();
        resolve_generic_families(&mut fontdb);

        tracing::info!(font_count = fontdb.len(), family = %family, "Loaded fonts");

        let families = [generic_family(&family)];
        let query = fontdb::Query {
            families: &families,
            ..Default::default()
        };
        if fontdb.query(&query).is_none() {
            return Err(FitError::FontLoad {
                family,
                reason: "family not found in font database".to_string(),
            });
        }

        Ok(Self {
            fontdb: Arc::new(fontdb),
            family,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Names of every family in the database.
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .fontdb
            .faces()
            .filter_map(|f| f.families.first().map(|(name, _)| name.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }
}

impl FontLoader for SvgFontLoader {
    type Font = SvgFont;

    fn load(&self, size: u32) -> Result<SvgFont, FitError> {
        let mut font = SvgFont {
            fontdb: self.fontdb.clone(),
            family: self.family.clone(),
            size,
            line_height: 0,
            top: 0.0,
        };

        let tree = font
            .parse(METRICS_PROBE, Rgb::BLACK)
            .map_err(|reason| font.load_error(reason))?;
        if !tree.root().has_children() {
            return Err(font.load_error("font renders no glyphs".to_string()));
        }

        let bbox = tree.root().abs_bounding_box();
        font.top = bbox.top();
        font.line_height = (bbox.bottom() - bbox.top()).ceil().max(1.0) as u32;

        tracing::trace!(
            size,
            line_height = font.line_height,
            "Loaded font size"
        );
        Ok(font)
    }
}

/// A font at one size, rendered through usvg/resvg.
pub struct SvgFont {
    fontdb: Arc<fontdb::Database>,
    family: String,
    size: u32,
    line_height: u32,
    /// Offset from the SVG text origin to the top of the line box
    top: f32,
}

impl SvgFont {
    fn parse(&self, text: &str, color: Rgb) -> Result<usvg::Tree, String> {
        // Canvas size only has to be valid; bounding boxes are not clipped to it
        let width = self.size.max(1) * (text.chars().count() as u32 + 1);
        let height = self.size.max(1) * 2;
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><text x="0" y="{size}" font-family="{family}" font-size="{size}" fill="{color}" xml:space="preserve">{text}</text></svg>"#,
            size = self.size,
            family = escape_xml(&self.family),
            text = escape_xml(text),
        );

        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        usvg::Tree::from_str(&svg, &options).map_err(|e| e.to_string())
    }

    fn load_error(&self, reason: String) -> FitError {
        FitError::FontLoad {
            family: self.family.clone(),
            reason,
        }
    }
}

impl GlyphFont for SvgFont {
    fn size(&self) -> u32 {
        self.size
    }

    fn line_height(&self) -> u32 {
        self.line_height
    }

    fn measure(&self, text: &str) -> Result<u32, FitError> {
        if text.trim().is_empty() {
            return Ok(0);
        }
        let tree = self
            .parse(text, Rgb::BLACK)
            .map_err(|reason| self.load_error(reason))?;
        if !tree.root().has_children() {
            return Ok(0);
        }
        Ok(tree.root().abs_bounding_box().right().ceil().max(0.0) as u32)
    }

    fn draw(
        &self,
        canvas: &mut Canvas,
        x: u32,
        y: u32,
        text: &str,
        color: Rgb,
    ) -> Result<(), CanvasError> {
        canvas.check_bounds(x, y, 1, self.line_height)?;
        if text.trim().is_empty() {
            return Ok(());
        }

        let tree = self.parse(text, color).map_err(CanvasError::TextRender)?;
        let transform = Transform::from_translate(x as f32, y as f32 - self.top);
        resvg::render(&tree, transform, &mut canvas.pixmap_mut().as_mut());
        Ok(())
    }
}

/// Families tried, in order, when a generic family's default is not installed.
const GENERIC_FALLBACKS: &[&str] = &["DejaVu Sans", "Liberation Sans", "Noto Sans", "FreeSans"];

/// Point serif/sans-serif/monospace at an installed family when fontdb's
/// defaults (Times New Roman, Arial, Courier New) are missing.
fn resolve_generic_families(db: &mut fontdb::Database) {
    let fallback = GENERIC_FALLBACKS
        .iter()
        .find(|&&name| installed(db, fontdb::Family::Name(name)))
        .map(|name| name.to_string())
        .or_else(|| {
            db.faces()
                .filter_map(|f| f.families.first().map(|(name, _)| name.clone()))
                .min()
        });
    let Some(fallback) = fallback else {
        return;
    };

    if !installed(db, fontdb::Family::SansSerif) {
        tracing::debug!(family = %fallback, "Using fallback for sans-serif");
        db.set_sans_serif_family(fallback.clone());
    }
    if !installed(db, fontdb::Family::Serif) {
        db.set_serif_family(fallback.clone());
    }
    if !installed(db, fontdb::Family::Monospace) {
        db.set_monospace_family(fallback);
    }
}

fn installed(db: &fontdb::Database, family: fontdb::Family<'_>) -> bool {
    let families = [family];
    db.query(&fontdb::Query {
        families: &families,
        ..Default::default()
    })
    .is_some()
}

fn generic_family(name: &str) -> fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => fontdb::Family::Serif,
        "sans-serif" => fontdb::Family::SansSerif,
        "monospace" => fontdb::Family::Monospace,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        _ => fontdb::Family::Name(name),
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
