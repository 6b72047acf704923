//! Card composition: sprite, info block, type icons, description and
//! dividers on one canvas, then quantization.

use eink_palette::{IndexedImage, Quantizer, Rgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tiny_skia::Pixmap;

use super::font::{FontLoader, GlyphFont};
use super::text_fit::{fit, fit_paragraphs, FitOptions};
use super::Canvas;
use crate::error::ComposeError;
use crate::models::{EntityRecord, LayoutPolicy};
use crate::services::RasterStore;

const TEXT_COLOR: Rgb = Rgb::BLACK;
const DIVIDER_COLOR: Rgb = Rgb::BLACK;

/// Which description candidate to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptionChoice {
    /// Uniformly random per render
    #[default]
    Random,
    /// Fixed candidate; wraps around when past the end
    Index(usize),
    /// Uniformly random from a seeded generator
    Seeded(u64),
}

impl DescriptionChoice {
    /// Pick one of `candidates`, or `""` when there are none.
    pub fn pick<'a>(&self, candidates: &'a [String]) -> &'a str {
        if candidates.is_empty() {
            return "";
        }
        let idx = match *self {
            DescriptionChoice::Random => rand::thread_rng().gen_range(0..candidates.len()),
            DescriptionChoice::Index(i) => i % candidates.len(),
            DescriptionChoice::Seeded(seed) => {
                StdRng::seed_from_u64(seed).gen_range(0..candidates.len())
            }
        };
        &candidates[idx]
    }
}

/// Assembles cards with a font loader and a fixed layout policy.
pub struct Composer<L> {
    fonts: L,
    layout: LayoutPolicy,
    dump_dir: Option<PathBuf>,
}

impl<L: FontLoader> Composer<L> {
    pub fn new(fonts: L, layout: LayoutPolicy) -> Self {
        Self {
            fonts,
            layout,
            dump_dir: None,
        }
    }

    /// Write intermediate canvases to `dir` on every compose.
    pub fn with_dump_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dump_dir = dir;
        self
    }

    pub fn layout(&self) -> &LayoutPolicy {
        &self.layout
    }

    pub fn fonts(&self) -> &L {
        &self.fonts
    }

    /// Compose a full-color card of `width` x `height`.
    ///
    /// Any failure discards the partially built canvas.
    pub fn compose(
        &self,
        record: &EntityRecord,
        sprite: &Pixmap,
        icons: &dyn RasterStore,
        width: u32,
        height: u32,
        choice: DescriptionChoice,
    ) -> Result<Canvas, ComposeError> {
        let layout = &self.layout;
        let (min_width, min_height) = layout.min_canvas_size();
        if width < min_width || height < min_height {
            return Err(ComposeError::LayoutOverflow {
                width,
                height,
                needed_width: min_width,
                needed_height: min_height,
            });
        }

        let sprite_size = layout.sprite_size;
        tracing::debug!(
            id = record.id,
            name = %record.name,
            width,
            height,
            sprite_size,
            "Composing card"
        );

        let mut canvas = Canvas::new(width, height)?;

        // Transparent sprite pixels fall through to the white canvas
        canvas.paste_scaled(sprite, 0, 0, sprite_size, sprite_size, layout.smooth_sprite)?;

        let info = self.info_block(record, icons, layout.info_width(width), sprite_size)?;
        canvas.paste_canvas(&info, sprite_size + layout.info_gap, 0)?;

        let description = choice.pick(&record.description_candidates);
        let dex = self.description_block(description, width, height - sprite_size)?;
        canvas.paste_canvas(&dex, 0, sprite_size)?;

        self.draw_dividers(&mut canvas)?;

        self.dump(&canvas, "composite.png");
        Ok(canvas)
    }

    /// Compose and reduce to the quantizer's palette.
    #[allow(clippy::too_many_arguments)]
    pub fn compose_quantized(
        &self,
        record: &EntityRecord,
        sprite: &Pixmap,
        icons: &dyn RasterStore,
        width: u32,
        height: u32,
        choice: DescriptionChoice,
        quantizer: &Quantizer,
    ) -> Result<IndexedImage, ComposeError> {
        let canvas = self.compose(record, sprite, icons, width, height, choice)?;
        let image = quantizer.quantize_rgba(
            &canvas.to_rgba(),
            canvas.width() as usize,
            canvas.height() as usize,
        )?;
        Ok(image)
    }

    /// Id and name, then one column per type with its label and icon.
    fn info_block(
        &self,
        record: &EntityRecord,
        icons: &dyn RasterStore,
        width: u32,
        height: u32,
    ) -> Result<Canvas, ComposeError> {
        let layout = &self.layout;
        let mut canvas = Canvas::new(width, height)?;

        let id_line = format!("No. {}", record.id);
        let name_line = record.display_name();
        let text = fit_paragraphs(
            &[id_line.as_str(), name_line.as_str()],
            &self.fonts,
            width.saturating_sub(2 * layout.info_x),
            height.saturating_sub(layout.info_y),
            FitOptions::new(layout.info_font_size, layout.info_min_font_size)
                .line_spacing(layout.info_line_spacing),
        )
        .map_err(|source| ComposeError::Fit {
            block: "info",
            source,
        })?;
        text.draw(&mut canvas, layout.info_x, layout.info_y, TEXT_COLOR)?;

        if !record.categories.is_empty() {
            let font = match text.font {
                Some(font) => font,
                None => self
                    .fonts
                    .load(layout.info_font_size)
                    .map_err(|source| ComposeError::Fit {
                        block: "info",
                        source,
                    })?,
            };
            let type_y = layout.info_y + text.layout.height + layout.type_gap;
            // A block pushed past the bottom fails on its first placement
            let types = self.type_block(
                record,
                icons,
                &font,
                width - layout.info_x,
                height.saturating_sub(type_y).max(1),
            )?;
            canvas.paste_canvas(&types, layout.info_x, type_y)?;
        }

        self.dump(&canvas, "info-canvas.png");
        Ok(canvas)
    }

    fn type_block<F: GlyphFont>(
        &self,
        record: &EntityRecord,
        icons: &dyn RasterStore,
        font: &F,
        width: u32,
        height: u32,
    ) -> Result<Canvas, ComposeError> {
        let layout = &self.layout;
        let mut canvas = Canvas::new(width, height)?;
        let icon_y = font.line_height() + layout.icon_offset;
        let mut cursor = 0;

        for category in &record.categories {
            let icon = icons
                .load_raster(&category.name)
                .ok_or_else(|| ComposeError::MissingIcon(category.name.clone()))?;
            tracing::debug!(
                category = %category.name,
                width = icon.width(),
                height = icon.height(),
                "Placing type icon"
            );

            font.draw(
                &mut canvas,
                cursor,
                0,
                &format!("Type {}/", category.slot),
                TEXT_COLOR,
            )?;
            canvas.paste(&icon, cursor + layout.type_indent, icon_y)?;
            cursor += icon.width() + layout.type_indent;
        }

        self.dump(&canvas, "type-canvas.png");
        Ok(canvas)
    }

    fn description_block(
        &self,
        text: &str,
        width: u32,
        height: u32,
    ) -> Result<Canvas, ComposeError> {
        let layout = &self.layout;
        let pad = layout.description_padding;
        let mut canvas = Canvas::new(width, height)?;

        tracing::debug!(text, "Writing description");
        let fitted = fit(
            text,
            &self.fonts,
            width - 2 * pad,
            height - 2 * pad,
            FitOptions::new(layout.description_font_size, layout.description_min_font_size)
                .line_spacing(layout.description_line_spacing),
        )
        .map_err(|source| ComposeError::Fit {
            block: "description",
            source,
        })?;
        fitted.draw(&mut canvas, pad, pad, TEXT_COLOR)?;

        self.dump(&canvas, "dex-canvas.png");
        Ok(canvas)
    }

    /// Thick bar plus thin rule below the sprite across the full width, and
    /// the same pair right of the sprite over its height.
    fn draw_dividers(&self, canvas: &mut Canvas) -> Result<(), ComposeError> {
        let layout = &self.layout;
        let center = layout.sprite_size + 1;
        let start = center.saturating_sub(layout.divider_width / 2);
        let rule = center + layout.rule_offset;
        let (width, sprite) = (canvas.width(), layout.sprite_size);

        canvas.fill_rect(0, start, width, layout.divider_width, DIVIDER_COLOR)?;
        canvas.fill_rect(0, rule, width, 1, DIVIDER_COLOR)?;
        canvas.fill_rect(start, 0, layout.divider_width, sprite, DIVIDER_COLOR)?;
        canvas.fill_rect(rule, 0, 1, sprite, DIVIDER_COLOR)?;
        Ok(())
    }

    fn dump(&self, canvas: &Canvas, name: &str) {
        if let Some(dir) = &self.dump_dir {
            canvas.dump(dir, name);
        }
    }
}
