//! Application configuration.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use wordsketch_core::brush::{DEFAULT_BRUSH_COLOR, DEFAULT_BRUSH_SIZE};
use wordsketch_core::cache::{DEFAULT_PROGRESS_TTL, DEFAULT_WORD_SET_TTL};
use wordsketch_core::{
    Brush, BrushError, FileStore, OfflineCache, StorageResult, TtlPolicy, parse_color,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },
    #[error(transparent)]
    Brush(#[from] BrushError),
}

/// Settings for the drawing surface, the CLI and the offline cache.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backing store width in pixels.
    pub width: u32,
    /// Backing store height in pixels.
    pub height: u32,
    pub brush_color: String,
    pub brush_size: f64,
    /// Background painted under the strokes. `None` exports a transparent image.
    pub background: Option<String>,
    pub word_set_ttl_secs: u64,
    pub progress_ttl_secs: u64,
    /// Cache directory. Defaults to the platform data directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            brush_color: DEFAULT_BRUSH_COLOR.to_string(),
            brush_size: DEFAULT_BRUSH_SIZE,
            background: Some("#ffffff".to_string()),
            word_set_ttl_secs: DEFAULT_WORD_SET_TTL.as_secs(),
            progress_ttl_secs: DEFAULT_PROGRESS_TTL.as_secs(),
            cache_dir: None,
        }
    }
}

impl AppConfig {
    /// Load a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that sizes and colors are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidCanvasSize {
                width: self.width,
                height: self.height,
            });
        }
        self.brush()?;
        self.background_color()?;
        Ok(())
    }

    /// Starting brush.
    pub fn brush(&self) -> Result<Brush, BrushError> {
        Brush::new(&self.brush_color, self.brush_size)
    }

    pub fn background_color(&self) -> Result<Option<Color>, BrushError> {
        self.background.as_deref().map(parse_color).transpose()
    }

    pub fn word_set_ttl(&self) -> TtlPolicy {
        TtlPolicy::inclusive(Duration::from_secs(self.word_set_ttl_secs))
    }

    pub fn progress_ttl(&self) -> TtlPolicy {
        TtlPolicy::new(Duration::from_secs(self.progress_ttl_secs))
    }

    /// Open the file-backed offline cache with the configured TTLs.
    pub fn open_cache(&self) -> StorageResult<OfflineCache<FileStore>> {
        let store = match &self.cache_dir {
            Some(dir) => FileStore::new(dir.clone())?,
            None => FileStore::default_location()?,
        };
        log::debug!("Offline cache at {}", store.base_path().display());
        Ok(OfflineCache::new(store).with_ttls(self.word_set_ttl(), self.progress_ttl()))
    }
}
