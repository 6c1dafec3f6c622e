use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoMode {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    pub fullscreen: bool,
}

impl Default for VideoMode {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            bits_per_pixel: 32,
            fullscreen: false,
        }
    }
}

/// Startup parameters of a [`Core`](crate::Core). Every field is optional in
/// JSON; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub video_mode: VideoMode,
    /// Root the file loader resolves resource paths against.
    pub data_path: PathBuf,
    pub title: String,
    pub borderless: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            video_mode: VideoMode::default(),
            data_path: PathBuf::from("data"),
            title: "Kestrel".to_string(),
            borderless: false,
        }
    }
}

impl CoreConfig {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
