//! Test fixtures: records, rasters, data directories and a capturing display.

use eink_palette::{IndexedImage, Palette, Quantizer, Rgb};
use inkdex::error::DisplayError;
use inkdex::models::{DisplaySpec, EntityRecord};
use inkdex::services::{DisplayDriver, InMemoryRasterStore};
use std::fs;
use std::path::Path;
use tiny_skia::Pixmap;

pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const BLUE: Rgb = Rgb::new(0, 0, 255);
pub const GREEN: Rgb = Rgb::new(0, 255, 0);

pub const PIKACHU_JSON: &str = r#"{
    "id": 25,
    "name": "pikachu",
    "types": [{"slot": 1, "type": {"name": "electric"}}],
    "flavor_text_entries": [
        {"flavor_text": "An amazing\nmouse.", "language": {"name": "en"}},
        {"flavor_text": "It stores electricity\u000cin its cheeks.", "language": {"name": "en"}},
        {"flavor_text": "An amazing mouse.", "language": {"name": "en"}},
        {"flavor_text": "Une souris incroyable.", "language": {"name": "fr"}}
    ]
}"#;

/// Opaque square raster of one color.
pub fn solid(size: u32, color: Rgb) -> Pixmap {
    let mut pixmap = Pixmap::new(size, size).unwrap();
    pixmap.fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255));
    pixmap
}

pub fn pikachu() -> EntityRecord {
    EntityRecord::new(25, "pikachu")
        .with_category(1, "electric")
        .with_descriptions(["An amazing mouse.", "It stores electricity in its cheeks."])
}

pub fn bulbasaur() -> EntityRecord {
    EntityRecord::new(1, "bulbasaur")
        .with_category(2, "poison")
        .with_category(1, "grass")
        .with_descriptions(["A strange seed was planted on its back at birth."])
}

/// Icons for every category used by the fixture records.
pub fn icons() -> InMemoryRasterStore {
    InMemoryRasterStore::new()
        .with_raster("electric", solid(8, BLUE))
        .with_raster("grass", solid(8, GREEN))
        .with_raster("poison", solid(8, BLUE))
}

pub fn impression_quantizer() -> Quantizer {
    Quantizer::new(Palette::deduplicated(DisplaySpec::IMPRESSION_57.palette).unwrap())
}

/// Lay out a data directory with one record, its sprite and its icon.
///
/// `pokemon.json` also lists an entry without any files.
pub fn write_data_dir(root: &Path) {
    fs::create_dir_all(root.join("dex")).unwrap();
    fs::create_dir_all(root.join("sprites/pokemon")).unwrap();
    fs::create_dir_all(root.join("sprites/types")).unwrap();

    fs::write(root.join("pokemon.json"), r#"{"1": "bulbasaur", "25": "pikachu"}"#).unwrap();
    fs::write(root.join("dex/pikachu.json"), PIKACHU_JSON).unwrap();
    fs::write(root.join("dex/25.json"), PIKACHU_JSON).unwrap();
    solid(16, RED)
        .save_png(root.join("sprites/pokemon/pikachu.png"))
        .unwrap();
    solid(16, RED).save_png(root.join("sprites/pokemon/25.png")).unwrap();
    solid(8, BLUE)
        .save_png(root.join("sprites/types/electric.png"))
        .unwrap();
}

/// Display that keeps every pushed image.
pub struct CaptureDisplay {
    pub spec: DisplaySpec,
    pub pushed: Vec<IndexedImage>,
}

impl CaptureDisplay {
    pub fn new(spec: DisplaySpec) -> Self {
        Self {
            spec,
            pushed: Vec::new(),
        }
    }
}

impl DisplayDriver for CaptureDisplay {
    fn spec(&self) -> &DisplaySpec {
        &self.spec
    }

    fn push(&mut self, image: &IndexedImage) -> Result<(), DisplayError> {
        self.pushed.push(image.clone());
        Ok(())
    }
}
