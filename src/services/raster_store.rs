use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tiny_skia::Pixmap;

use crate::models::is_safe_stem;

/// Lookup of sprites and icons by key.
pub trait RasterStore {
    /// Raster for `key`, or `None` when missing or unreadable.
    fn load_raster(&self, key: &str) -> Option<Pixmap>;
}

/// PNG files named `<key>.png` in one directory.
pub struct DirRasterStore {
    dir: PathBuf,
}

impl DirRasterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RasterStore for DirRasterStore {
    fn load_raster(&self, key: &str) -> Option<Pixmap> {
        if !is_safe_stem(key) {
            tracing::warn!(key, "Rejected raster key that is not a plain file name");
            return None;
        }
        let path = self.dir.join(format!("{key}.png"));
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Raster not found");
            return None;
        }
        match Pixmap::load_png(&path) {
            Ok(pixmap) => Some(pixmap),
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to decode raster");
                None
            }
        }
    }
}

/// Rasters held in memory.
#[derive(Default, Clone)]
pub struct InMemoryRasterStore {
    rasters: HashMap<String, Pixmap>,
}

impl InMemoryRasterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raster(mut self, key: impl Into<String>, raster: Pixmap) -> Self {
        self.rasters.insert(key.into(), raster);
        self
    }
}

impl RasterStore for InMemoryRasterStore {
    fn load_raster(&self, key: &str) -> Option<Pixmap> {
        self.rasters.get(key).cloned()
    }
}
