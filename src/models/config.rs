use crate::assets::AssetLoader;
use crate::models::{DisplaySpec, LayoutPolicy};
use eink_palette::{Palette, PaletteError};
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the record data (dex/, sprites/, pokemon.json)
    pub data_dir: PathBuf,

    pub font: FontConfig,

    /// Display preset name (see `DisplaySpec::PRESETS`)
    pub display: String,

    /// Hex colors replacing the display's native palette
    pub palette: Option<Vec<String>>,

    pub layout: LayoutPolicy,

    /// Language code of the flavor texts to use
    pub description_language: String,

    /// Random picks to try before giving up on finding a record with a sprite
    pub max_random_attempts: u32,

    /// Write intermediate canvases here when set
    pub debug_dump_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FontConfig {
    /// Font family, or a generic family such as "sans-serif"
    pub family: String,
    /// Extra font files to load (overridden by FONTS_DIR)
    pub dir: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            dir: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./pokemon"),
            font: FontConfig::default(),
            display: "impression-5.7".to_string(),
            palette: None,
            layout: LayoutPolicy::default(),
            description_language: "en".to_string(),
            max_random_attempts: 100,
            debug_dump_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        display = %config.display,
                        data_dir = %config.data_dir.display(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply DATA_DIR and DEBUG_DUMP_DIR overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var_os("DATA_DIR").map(PathBuf::from),
            std::env::var_os("DEBUG_DUMP_DIR").map(PathBuf::from),
        )
    }

    fn with_overrides(mut self, data_dir: Option<PathBuf>, dump_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(dir) = dump_dir {
            self.debug_dump_dir = Some(dir);
        }
        self
    }

    /// The configured display preset, if the name is known.
    pub fn display_spec(&self) -> Option<DisplaySpec> {
        DisplaySpec::from_name(&self.display)
    }

    /// Palette to quantize against: the configured override or the display's
    /// native colors.
    pub fn palette_for(&self, spec: &DisplaySpec) -> Result<Palette, PaletteError> {
        match &self.palette {
            Some(colors) => {
                let colors: Vec<&str> = colors.iter().map(String::as_str).collect();
                Palette::from_hex(&colors)
            }
            None => Palette::deduplicated(spec.palette),
        }
    }

    pub fn dex_dir(&self) -> PathBuf {
        self.data_dir.join("dex")
    }

    pub fn record_list_path(&self) -> PathBuf {
        self.data_dir.join("pokemon.json")
    }

    pub fn sprite_dir(&self) -> PathBuf {
        self.data_dir.join("sprites").join("pokemon")
    }

    pub fn icon_dir(&self) -> PathBuf {
        self.data_dir.join("sprites").join("types")
    }
}
