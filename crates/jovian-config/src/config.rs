//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Camera and orbit control settings.
    pub camera: CameraConfig,
    /// Lens flare overlay settings.
    pub lens_flare: LensFlareConfig,
    /// Live-tweak panel settings.
    pub panel: PanelConfig,
    /// Randomize action settings.
    pub randomize: RandomizeConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance from the planet center along +Z.
    pub start_distance: f32,
    /// Fraction of the pending orbit velocity applied per frame.
    pub damping_factor: f32,
    /// Radians of rotation per pixel of mouse drag.
    pub rotate_speed: f32,
    /// Zoom multiplier per wheel line.
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

/// Lens flare configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LensFlareConfig {
    pub enabled: bool,
    /// Overall flare opacity (0.0 - 1.0).
    pub opacity: f32,
    /// Optional lens-dirt image modulating the flare. A missing or unreadable
    /// file aborts startup.
    pub dirt_texture: Option<PathBuf>,
}

/// Tweak panel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PanelConfig {
    /// Serve the HTTP control panel.
    pub enabled: bool,
    /// Bind address.
    pub address: String,
    /// Port (0 = let the OS pick).
    pub port: u16,
}

/// Randomize configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RandomizeConfig {
    /// Fixed RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Randomize all parameters once before the first frame.
    pub on_start: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log frame statistics periodically.
    pub log_frame_stats: bool,
    /// Seconds between frame statistics log lines.
    pub stats_interval_secs: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
            title: "Jovian".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 1000.0,
            start_distance: 6.0,
            damping_factor: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.95,
            min_distance: 2.5,
            max_distance: 100.0,
        }
    }
}

impl Default for LensFlareConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            opacity: 0.8,
            dirt_texture: None,
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            address: "127.0.0.1".to_string(),
            port: 9777,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_frame_stats: true,
            stats_interval_secs: 5.0,
        }
    }
}

/// Platform config directory for the viewer, e.g. `~/.config/jovian`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("jovian"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_matches_scene_setup() {
        let camera = CameraConfig::default();
        assert_eq!(camera.fov_y_degrees, 45.0);
        assert_eq!(camera.near, 1.0);
        assert_eq!(camera.far, 1000.0);
        assert_eq!(camera.start_distance, 6.0);
        assert_eq!(camera.damping_factor, 0.05);
    }

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("port: 9777"));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), camera: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.panel, PanelConfig::default());
        assert_eq!(config.randomize.seed, None);
    }

    #[test]
    fn test_seed_and_dirt_texture_parse() {
        let ron_str = r#"(randomize: (seed: Some(42)), lens_flare: (dirt_texture: Some("dirt.png")))"#;
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.randomize.seed, Some(42));
        assert_eq!(
            config.lens_flare.dirt_texture.as_deref(),
            Some(Path::new("dirt.png"))
        );
    }

    #[test]
    fn test_unknown_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.randomize.seed = Some(7);
        config.panel.port = 0;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_invalid_ron_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
