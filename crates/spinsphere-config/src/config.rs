//! Configuration structs with sensible defaults and RON persistence.

use std::f32::consts::FRAC_PI_4;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Highest subdivision level accepted from config; beyond this the mesh no
/// longer fits a 16-bit index buffer.
const MAX_QUALITY: usize = 6;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Sphere mesh settings.
    pub sphere: SphereConfig,
    /// Camera and projection settings.
    pub camera: CameraConfig,
    /// Rotation and background fade settings.
    pub animation: AnimationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Sphere mesh configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SphereConfig {
    /// Octahedron subdivision passes.
    pub quality: usize,
    /// Render-time radius the unit sphere is scaled to.
    pub radius: f32,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Near clip plane distance.
    pub near: f32,
    /// Horizontal field of view in radians.
    pub fov_x: f32,
    /// Distance from the sphere center to the camera.
    pub distance: f32,
}

/// Animation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Rotation advance per frame, in radians.
    pub rotation_speed: f32,
    /// Axis the camera orbits around. Should be unit length.
    pub rotation_axis: [f32; 3],
    /// Amount the background brightness drops per frame once released.
    pub fade_step: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            quality: 3,
            radius: 0.5,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            fov_x: FRAC_PI_4,
            distance: 2.0,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 0.02,
            rotation_axis: [0.0, 1.0, 0.0],
            fade_step: 0.08,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for the demo, e.g. `~/.config/spinsphere`.
///
/// Falls back to the working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("spinsphere"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;
            config.validate()?;
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
        std::fs::create_dir_all(config_dir).map_err(ConfigError::Write)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::Write)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values the mesh generator or camera cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sphere.quality > MAX_QUALITY {
            return Err(invalid(
                "sphere.quality",
                format!("{} exceeds the maximum of {MAX_QUALITY}", self.sphere.quality),
            ));
        }
        if !(self.sphere.radius.is_finite() && self.sphere.radius > 0.0) {
            return Err(invalid("sphere.radius", "must be positive".to_string()));
        }
        if !(self.camera.near.is_finite() && self.camera.near > 0.0) {
            return Err(invalid("camera.near", "must be positive".to_string()));
        }
        if !(self.camera.fov_x > 0.0 && self.camera.fov_x < std::f32::consts::FRAC_PI_2) {
            return Err(invalid(
                "camera.fov_x",
                "must lie strictly between 0 and pi/2 radians".to_string(),
            ));
        }
        if !self.camera.distance.is_finite() {
            return Err(invalid("camera.distance", "must be finite".to_string()));
        }
        let [x, y, z] = self.animation.rotation_axis;
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return Err(invalid("animation.rotation_axis", "must be nonzero".to_string()));
        }
        if self.animation.fade_step < 0.0 {
            return Err(invalid("animation.fade_step", "must not be negative".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("quality: 3"));
        assert!(ron_str.contains("fade_step: 0.08"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(sphere: (quality: 5), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.sphere.quality, 5);
        assert_eq!(config.sphere.radius, 0.5);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.sphere.quality = 4;
        config.camera.distance = 3.5;
        config.debug.log_level = "debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "(sphere: (quality: 9))").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "sphere.quality",
                ..
            }
        ));
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.animation.rotation_speed = 0.05;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().animation.rotation_speed, 0.05);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_camera() {
        let mut config = Config::default();
        config.camera.near = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.camera.fov_x = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_axis_and_radius() {
        let mut config = Config::default();
        config.animation.rotation_axis = [0.0; 3];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sphere.radius = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_dir_ends_with_app_name() {
        let dir = default_config_dir();
        assert!(dir == Path::new(".") || dir.ends_with("spinsphere"));
    }
}
