//! Asset loading with an embedded config fallback
//!
//! - If CONFIG_FILE is NOT set: use the embedded config.yaml
//! - If CONFIG_FILE IS set and the file is missing: seed it with the embedded config
//! - If CONFIG_FILE IS set and the file exists: use it
//!
//! Fonts come from FONTS_DIR (or the configured font directory) only; system
//! fonts are added by the font loader.

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "config/"]
#[include = "config.yaml"]
struct EmbeddedConfig;

const CONFIG_NAME: &str = "config.yaml";

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
pub struct AssetLoader {
    /// External fonts directory (from FONTS_DIR env var)
    fonts_dir: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    pub fn new(fonts_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            fonts_dir,
            config_file,
        }
    }

    /// Create a loader from FONTS_DIR and CONFIG_FILE.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os("FONTS_DIR").map(PathBuf::from),
            std::env::var_os("CONFIG_FILE").map(PathBuf::from),
        )
    }

    pub fn fonts_dir(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Use `dir` for fonts unless FONTS_DIR already chose one.
    pub fn with_default_fonts_dir(mut self, dir: Option<PathBuf>) -> Self {
        if self.fonts_dir.is_none() {
            self.fonts_dir = dir;
        }
        self
    }

    /// Get all font data (for loading into fontdb)
    pub fn get_fonts(&self) -> Vec<(String, Cow<'static, [u8]>)> {
        let mut fonts = Vec::new();

        if let Some(ref dir) = self.fonts_dir {
            match fs::read_dir(dir) {
                Ok(entries) => {
                    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
                    paths.sort();
                    for path in paths {
                        let is_font = path.extension().and_then(|e| e.to_str()).is_some_and(
                            |ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"),
                        );
                        if !is_font {
                            continue;
                        }
                        match fs::read(&path) {
                            Ok(data) => {
                                let name = path
                                    .file_name()
                                    .map(|n| n.to_string_lossy().to_string())
                                    .unwrap_or_default();
                                tracing::trace!(font = %name, "Loading font from filesystem");
                                fonts.push((name, Cow::Owned(data)));
                            }
                            Err(e) => {
                                tracing::warn!(path = %path.display(), %e, "Failed to read font")
                            }
                        }
                    }
                }
                Err(e) => tracing::warn!(dir = %dir.display(), %e, "Failed to read fonts directory"),
            }
        }

        fonts
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get(CONFIG_NAME)
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write the embedded config to CONFIG_FILE if it is set but missing.
    ///
    /// Returns whether a file was written.
    pub fn seed_if_configured(&self) -> io::Result<bool> {
        let Some(ref path) = self.config_file else {
            return Ok(false);
        };
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        match EmbeddedConfig::get(CONFIG_NAME) {
            Some(data) => {
                fs::write(path, &*data.data)?;
                tracing::info!(path = %path.display(), "Seeded config file with embedded default");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Extract the embedded config (init command)
    ///
    /// Writes to CONFIG_FILE if set, otherwise `./config.yaml`.
    pub fn init(&self, force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();
        let path = self
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("./config.yaml"));

        if !force && path.exists() {
            report.skipped.push(path.display().to_string());
            return Ok(report);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(data) = EmbeddedConfig::get(CONFIG_NAME) {
            fs::write(&path, &*data.data)?;
            report.written.push(path.display().to_string());
        }

        Ok(report)
    }
}
