// Configuration persistence
//
// User-facing settings serialized as TOML next to the binary. Missing or
// unreadable files fall back to defaults; a fresh default file is written
// so users have something to edit.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "nescore.toml";

/// Emulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    pub video: VideoConfig,
    pub controls: ControlsConfig,
}

/// Video settings for the host window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Integer window scale (256x240 times this factor)
    pub scale: u32,
    /// Enable VSync on the surface
    pub vsync: bool,
}

/// Keyboard bindings, as winit `KeyCode` names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    pub a: String,
    pub b: String,
    pub select: String,
    pub start: String,
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            video: VideoConfig {
                scale: 3,
                vsync: true,
            },
            controls: ControlsConfig {
                a: "KeyZ".to_string(),
                b: "KeyX".to_string(),
                select: "ShiftRight".to_string(),
                start: "Enter".to_string(),
                up: "ArrowUp".to_string(),
                down: "ArrowDown".to_string(),
                left: "ArrowLeft".to_string(),
                right: "ArrowRight".to_string(),
            },
        }
    }
}

impl EmulatorConfig {
    /// Load the configuration, or create the default file if absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(err) => {
                    warn!("bad config {}: {}; using defaults", path.display(), err);
                    EmulatorConfig::default()
                }
            },
            Err(_) => {
                let config = EmulatorConfig::default();
                if let Err(err) = config.save(path) {
                    warn!("could not write default config: {}", err);
                }
                config
            }
        }
    }

    /// Write the configuration as TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let config = EmulatorConfig::default();
        assert_eq!(config.video.scale, 3);
        assert_eq!(config.controls.a, "KeyZ");
        assert_eq!(config.controls.start, "Enter");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EmulatorConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: EmulatorConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.video.scale, config.video.scale);
        assert_eq!(parsed.controls.right, config.controls.right);
    }

    #[test]
    fn test_bad_config_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("nescore-config-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        fs::write(&path, "not valid [ toml").unwrap();

        let config = EmulatorConfig::load_or_default(&path);
        assert_eq!(config.video.scale, 3);
    }
}
