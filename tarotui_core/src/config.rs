use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{PopupError, Result};

pub const DEFAULT_DATA_PATH: &str = "cards/tarot-json-master/tarot-images.json";
pub const DEFAULT_IMAGE_DIR: &str = "cards/tarot-json-master/cards";
pub const DEFAULT_IMAGE: &str = "cards/tarot-json-master/cards/m00.jpg";

/// Timings, particle sizing and asset locations for a popup.
/// Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopupConfig {
    pub auto_close_ms: u64,
    pub transition_ms: u64,
    /// Gap between making the overlay visible and starting the entrance
    pub entrance_delay_ms: u64,
    pub particle_count: usize,
    pub particle_cleanup_ms: u64,
    pub data_path: PathBuf,
    pub image_dir: PathBuf,
    pub default_image: PathBuf,
    /// Fixed seed for the particle RNG; entropy when absent
    pub seed: Option<u64>,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            auto_close_ms: 3000,
            transition_ms: 300,
            entrance_delay_ms: 10,
            particle_count: 50,
            particle_cleanup_ms: 2000,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            default_image: PathBuf::from(DEFAULT_IMAGE),
            seed: None,
        }
    }
}

impl PopupConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| PopupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| PopupError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn auto_close(&self) -> Duration {
        Duration::from_millis(self.auto_close_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn entrance_delay(&self) -> Duration {
        Duration::from_millis(self.entrance_delay_ms)
    }

    pub fn particle_cleanup(&self) -> Duration {
        Duration::from_millis(self.particle_cleanup_ms)
    }
}
