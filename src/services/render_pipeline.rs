use eink_palette::{DitherMode, IndexedImage, Quantizer};
use rand::seq::SliceRandom;
use rand::Rng;
use tiny_skia::Pixmap;

use crate::error::RenderError;
use crate::models::{AppConfig, DisplaySpec, EntityRecord, RecordKey};
use crate::rendering::{Composer, DescriptionChoice, FontLoader};
use crate::services::{DirRasterStore, DirRecordStore, DisplayDriver, RasterStore, RecordStore};

/// A record together with its sprite, ready to compose.
pub struct Selection {
    pub key: RecordKey,
    pub record: EntityRecord,
    pub sprite: Pixmap,
}

/// Orchestrates record selection, composition, quantization and display.
pub struct RenderPipeline<L> {
    records: Box<dyn RecordStore>,
    sprites: Box<dyn RasterStore>,
    icons: Box<dyn RasterStore>,
    composer: Composer<L>,
    quantizer: Quantizer,
    max_random_attempts: u32,
}

impl<L: FontLoader> RenderPipeline<L> {
    pub fn new(
        records: Box<dyn RecordStore>,
        sprites: Box<dyn RasterStore>,
        icons: Box<dyn RasterStore>,
        composer: Composer<L>,
        quantizer: Quantizer,
    ) -> Self {
        Self {
            records,
            sprites,
            icons,
            composer,
            quantizer,
            max_random_attempts: 100,
        }
    }

    /// Pipeline over the on-disk data directory described by `config`.
    pub fn from_config(config: &AppConfig, composer: Composer<L>, quantizer: Quantizer) -> Self {
        Self::new(
            Box::new(DirRecordStore::new(
                config.dex_dir(),
                config.record_list_path(),
                config.description_language.clone(),
            )),
            Box::new(DirRasterStore::new(config.sprite_dir())),
            Box::new(DirRasterStore::new(config.icon_dir())),
            composer,
            quantizer,
        )
        .with_max_random_attempts(config.max_random_attempts)
    }

    /// Pipeline for `spec`, quantizing against the configured palette
    /// override or the panel's native colors.
    pub fn for_display(
        config: &AppConfig,
        composer: Composer<L>,
        spec: &DisplaySpec,
        dither: DitherMode,
    ) -> Result<Self, RenderError> {
        let palette = config.palette_for(spec)?;
        tracing::debug!(colors = palette.len(), padding = palette.padding_len(), "Using palette");
        Ok(Self::from_config(config, composer, Quantizer::new(palette).dither(dither)))
    }

    pub fn with_max_random_attempts(mut self, attempts: u32) -> Self {
        self.max_random_attempts = attempts;
        self
    }

    pub fn composer(&self) -> &Composer<L> {
        &self.composer
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Resolve `key`, or pick random keys until one has both a record and a
    /// sprite.
    pub fn select<R: Rng + ?Sized>(
        &self,
        key: Option<&RecordKey>,
        rng: &mut R,
    ) -> Result<Selection, RenderError> {
        let Some(key) = key else {
            let keys = self.records.keys();
            for attempt in 1..=self.max_random_attempts {
                if let Some(selection) = self.pick_random(&keys, attempt, rng) {
                    return Ok(selection);
                }
            }
            return Err(self.give_up(keys.len()));
        };

        let record = self
            .records
            .lookup(key)
            .ok_or_else(|| RenderError::RecordNotFound(key.clone()))?;
        let sprite = self
            .sprites
            .load_raster(&key.to_string())
            .ok_or_else(|| RenderError::SpriteNotFound(key.clone()))?;
        tracing::info!(key = %key, id = record.id, name = %record.name, "Selected record");
        Ok(Selection {
            key: key.clone(),
            record,
            sprite,
        })
    }

    /// One random draw; `None` when the drawn key lacks a record or sprite.
    fn pick_random<R: Rng + ?Sized>(
        &self,
        keys: &[RecordKey],
        attempt: u32,
        rng: &mut R,
    ) -> Option<Selection> {
        let key = keys.choose(rng)?;
        let Some(record) = self.records.lookup(key) else {
            tracing::debug!(key = %key, attempt, "No record, retrying");
            return None;
        };
        let Some(sprite) = self.sprites.load_raster(&key.to_string()) else {
            tracing::debug!(key = %key, attempt, "No sprite, retrying");
            return None;
        };
        tracing::info!(key = %key, id = record.id, name = %record.name, attempt, "Selected random record");
        Some(Selection {
            key: key.clone(),
            record,
            sprite,
        })
    }

    fn give_up(&self, keys: usize) -> RenderError {
        tracing::warn!(keys, attempts = self.max_random_attempts, "No renderable record found");
        RenderError::NoRenderableRecord {
            attempts: self.max_random_attempts,
        }
    }

    /// Compose `selection` at the display's size and quantize it.
    pub fn render(
        &self,
        selection: &Selection,
        spec: &DisplaySpec,
        choice: DescriptionChoice,
    ) -> Result<IndexedImage, RenderError> {
        let image = self.composer.compose_quantized(
            &selection.record,
            &selection.sprite,
            self.icons.as_ref(),
            spec.width,
            spec.height,
            choice,
            &self.quantizer,
        )?;
        Ok(image)
    }

    /// Orient `image` for the display and push it.
    pub fn show(
        &self,
        display: &mut dyn DisplayDriver,
        image: &IndexedImage,
    ) -> Result<(), RenderError> {
        let spec = *display.spec();
        let oriented = image.flipped(spec.flip_x, spec.flip_y);
        display.push(&oriented)?;
        Ok(())
    }

    /// Select, render and show in one go.
    ///
    /// Without a key, a record that fails to compose (missing icon, text
    /// that never fits) counts as one attempt and another is drawn.
    pub fn run<R: Rng + ?Sized>(
        &self,
        display: &mut dyn DisplayDriver,
        key: Option<&RecordKey>,
        choice: DescriptionChoice,
        rng: &mut R,
    ) -> Result<Selection, RenderError> {
        let spec = *display.spec();

        if key.is_some() {
            let selection = self.select(key, rng)?;
            let image = self.render(&selection, &spec, choice)?;
            self.show(display, &image)?;
            return Ok(selection);
        }

        let keys = self.records.keys();
        for attempt in 1..=self.max_random_attempts {
            let Some(selection) = self.pick_random(&keys, attempt, rng) else {
                continue;
            };
            match self.render(&selection, &spec, choice) {
                Ok(image) => {
                    self.show(display, &image)?;
                    return Ok(selection);
                }
                Err(RenderError::Compose(e)) => {
                    tracing::warn!(key = %selection.key, attempt, %e, "Render failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(self.give_up(keys.len()))
    }
}
