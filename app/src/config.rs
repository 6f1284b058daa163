//! Application configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use elements_capture::DEFAULT_FPS;
use elements_codec::DEFAULT_JPEG_QUALITY;

/// Sound files shipped with the game, keyed by the event IDs the backend
/// emits.
const DEFAULT_SOUND_FILES: &[&str] = &[
    "fireplace-6160.wav",
    "water.wav",
    "air.wav",
    "earth.wav",
    "Eureka.wav",
];

/// Client configuration, loadable from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Base URL of the frame-processing backend.
    pub server_url: String,

    /// Platform camera index.
    pub camera_index: u32,

    /// Target frame-loop rate.
    pub fps: u32,

    /// JPEG quality for outbound frames.
    pub jpeg_quality: u8,

    /// Directory holding the sound clips.
    pub sounds_dir: PathBuf,

    /// Clip file names; each doubles as the event ID it answers to.
    pub sound_files: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            camera_index: 0,
            fps: DEFAULT_FPS,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            sounds_dir: PathBuf::from("sounds"),
            sound_files: DEFAULT_SOUND_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// `(event ID, clip path)` pairs for the sound registry.
    pub fn sound_entries(&self) -> Vec<(String, PathBuf)> {
        self.sound_files
            .iter()
            .map(|file| (file.clone(), self.sounds_dir.join(file)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server_url, "http://127.0.0.1:5000");
        assert_eq!(config.fps, 30);
        assert_eq!(config.sound_files.len(), 5);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            server_url = "http://game.example.net:8080"
            fps = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.server_url, "http://game.example.net:8080");
        assert_eq!(config.fps, 15);
        // Everything else keeps its default.
        assert_eq!(config.camera_index, 0);
        assert_eq!(config.jpeg_quality, DEFAULT_JPEG_QUALITY);
    }

    #[test]
    fn test_sound_entries_join_dir() {
        let config: AppConfig = toml::from_str(
            r#"
            sounds_dir = "/opt/elements/sounds"
            sound_files = ["water.wav"]
            "#,
        )
        .unwrap();

        let entries = config.sound_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "water.wav");
        assert_eq!(entries[0].1, PathBuf::from("/opt/elements/sounds/water.wav"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<AppConfig>("serverurl = \"typo\"").is_err());
    }
}
