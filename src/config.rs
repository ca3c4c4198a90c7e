use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::imageio::DEFAULT_JPEG_QUALITY;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "RETOUCH_CONFIG";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Read-only startup settings. Nothing is written back between runs.
pub struct AppConfig {
    pub window_width: Option<f32>,
    pub window_height: Option<f32>,
    /// Image opened at startup when no path is given on the command line.
    pub open_path: Option<PathBuf>,
    pub jpeg_quality: Option<u8>,
}

impl AppConfig {
    /// Returns the config file path: `$RETOUCH_CONFIG` if set, otherwise the
    /// user config directory.
    pub fn config_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(explicit));
        }
        dirs::config_dir().map(|d| d.join("retouch").join("config.toml"))
    }

    /// Loads config from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
            .unwrap_or(DEFAULT_JPEG_QUALITY)
            .clamp(1, 100)
    }
}
