//! Launcher configuration
//!
//! Stored as RON. Every field has a default, so a config file only needs
//! the keys it wants to change:
//!
//! ```ron
//! (
//!     fps_limit: Fps30,
//!     start_demo: Some("dash"),
//!     demos: (dash: (dash_speed: 900.0)),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::demos::camera_shake::CameraShakeConfig;
use crate::demos::combo::ComboConfig;
use crate::demos::dash::DashConfig;
use crate::demos::endless_wave::WaveConfig;
use crate::demos::health_bar::HealthBarConfig;
use crate::demos::maze::MazeConfig;
use crate::demos::particles::ParticlesConfig;
use crate::demos::patrol_chase::PatrolDemoConfig;
use crate::demos::platformer::PlatformerConfig;
use crate::demos::record_replay::RecordReplayConfig;
use crate::demos::seeded_obstacles::SeededObstaclesConfig;
use crate::demos::skill_cooldown::SkillConfig;

/// File name looked up in the working directory, then in the user config dir
pub const CONFIG_FILE_NAME: &str = "arcade-demos.ron";

/// Upper bound for window dimensions
const MAX_WINDOW_SIZE: u32 = 8192;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ValidationError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Frame rate limit options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FpsLimit {
    Fps30,
    #[default]
    Fps60,
    /// As fast as the display allows
    Unlocked,
}

impl FpsLimit {
    /// Target frame time in seconds (None = unlocked)
    pub fn frame_time(&self) -> Option<f64> {
        match self {
            FpsLimit::Fps30 => Some(1.0 / 30.0),
            FpsLimit::Fps60 => Some(1.0 / 60.0),
            FpsLimit::Unlocked => None,
        }
    }

    /// Cycle to next value
    pub fn next(self) -> Self {
        match self {
            FpsLimit::Fps30 => FpsLimit::Fps60,
            FpsLimit::Fps60 => FpsLimit::Unlocked,
            FpsLimit::Unlocked => FpsLimit::Fps30,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FpsLimit::Fps30 => "30",
            FpsLimit::Fps60 => "60",
            FpsLimit::Unlocked => "Unlocked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub high_dpi: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Arcade Demos".to_string(),
            width: 800,
            height: 600,
            high_dpi: false,
        }
    }
}

/// Per-demo tuning, one section per demo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoTuning {
    pub health_bar: HealthBarConfig,
    pub dash: DashConfig,
    pub skills: SkillConfig,
    pub combo: ComboConfig,
    pub particles: ParticlesConfig,
    pub patrol_chase: PatrolDemoConfig,
    pub camera_shake: CameraShakeConfig,
    pub platformer: PlatformerConfig,
    pub seeded_obstacles: SeededObstaclesConfig,
    pub endless_wave: WaveConfig,
    pub record_replay: RecordReplayConfig,
    pub maze: MazeConfig,
}

impl DemoTuning {
    /// Validate every section, prefixing errors with the section name
    pub fn validate(&self) -> Result<(), String> {
        let sections: [(&str, Result<(), String>); 12] = [
            ("health_bar", self.health_bar.validate()),
            ("dash", self.dash.validate()),
            ("skills", self.skills.validate()),
            ("combo", self.combo.validate()),
            ("particles", self.particles.validate()),
            ("patrol_chase", self.patrol_chase.validate()),
            ("camera_shake", self.camera_shake.validate()),
            ("platformer", self.platformer.validate()),
            ("seeded_obstacles", self.seeded_obstacles.validate()),
            ("endless_wave", self.endless_wave.validate()),
            ("record_replay", self.record_replay.validate()),
            ("maze", self.maze.validate()),
        ];
        for (name, result) in sections {
            result.map_err(|e| format!("demos.{}: {}", name, e))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub fps_limit: FpsLimit,
    /// Demo to open instead of the menu (by name, e.g. "dash")
    pub start_demo: Option<String>,
    /// Write every debug signal event to the log as a JSON line
    pub log_signals: bool,
    pub demos: DemoTuning,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            fps_limit: FpsLimit::default(),
            start_demo: None,
            log_signals: true,
            demos: DemoTuning::default(),
        }
    }
}

impl AppConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Load from the first config file found, falling back to defaults.
    /// A broken file is reported and ignored.
    pub fn load_or_default() -> (Self, ConfigSource) {
        Self::load_first(&config_search_paths())
    }

    /// Load the first existing file out of `paths`
    pub fn load_first(paths: &[PathBuf]) -> (Self, ConfigSource) {
        let Some(path) = paths.iter().find(|p| p.is_file()) else {
            log::info!("No {} found, using defaults", CONFIG_FILE_NAME);
            return (Self::default(), ConfigSource::Defaults);
        };
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                (config, ConfigSource::Loaded(path.clone()))
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                (Self::default(), ConfigSource::Rejected(path.clone()))
            }
        }
    }

    /// Write settings changed at runtime back to where they came from.
    /// Returns the path written, or None when saving is skipped.
    pub fn save_to_source(&self, source: &ConfigSource) -> Result<Option<PathBuf>, ConfigError> {
        let Some(path) = source.save_path() else {
            return Ok(None);
        };
        self.save(&path)?;
        Ok(Some(path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.window;
        if w.width == 0 || w.height == 0 || w.width > MAX_WINDOW_SIZE || w.height > MAX_WINDOW_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "window size {}x{} out of range",
                w.width, w.height
            )));
        }
        if let Some(name) = &self.start_demo {
            if crate::app::DemoKind::from_name(name).is_none() {
                return Err(ConfigError::ValidationError(format!("unknown start_demo '{}'", name)));
            }
        }
        self.demos.validate().map_err(ConfigError::ValidationError)
    }
}

/// Where the running config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file found
    Defaults,
    Loaded(PathBuf),
    /// A file exists but failed to parse or validate. It is never overwritten.
    Rejected(PathBuf),
}

impl ConfigSource {
    /// File runtime changes may be saved to, if any
    pub fn save_path(&self) -> Option<PathBuf> {
        match self {
            ConfigSource::Defaults => config_search_paths().pop(),
            ConfigSource::Loaded(path) => Some(path.clone()),
            ConfigSource::Rejected(_) => None,
        }
    }
}

/// Candidate config locations, in lookup order
pub fn config_search_paths() -> Vec<PathBuf> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("arcade-demos").join(CONFIG_FILE_NAME));
        }
        paths
    }
    #[cfg(target_arch = "wasm32")]
    {
        Vec::new()
    }
}

/// Shared check for the "positive finite number" fields in demo configs
pub(crate) fn require_positive(name: &str, value: f32) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be a positive number, got {}", name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_ron_str("()").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_ron_str(
            "(fps_limit: Fps30, start_demo: Some(\"dash\"), demos: (dash: (dash_speed: 900.0)))",
        )
        .unwrap();
        assert_eq!(config.fps_limit, FpsLimit::Fps30);
        assert_eq!(config.start_demo.as_deref(), Some("dash"));
        assert_eq!(config.demos.dash.dash_speed, 900.0);
        assert_eq!(config.demos.dash.cooldown, DashConfig::default().cooldown);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = AppConfig::default();
        config.window.width = 1024;
        config.demos.seeded_obstacles.seed = 777;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_parse_error_reported() {
        let err = AppConfig::from_ron_str("(window: (width: \"wide\"))").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("nope.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = AppConfig::from_ron_str("(window: (width: 0))").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = AppConfig::from_ron_str("(start_demo: Some(\"tetris\"))").unwrap_err();
        assert!(err.to_string().contains("tetris"));

        let err = AppConfig::from_ron_str("(demos: (dash: (cooldown: -1.0)))").unwrap_err();
        assert!(err.to_string().contains("demos.dash"));
    }

    #[test]
    fn test_rejected_file_is_never_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let original = "(demos: (dash: (dash_speed: 900.0, cooldown: -1.0)))";
        fs::write(&path, original).unwrap();

        let (mut config, source) = AppConfig::load_first(&[path.clone()]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(source, ConfigSource::Rejected(path.clone()));

        config.fps_limit = config.fps_limit.next();
        assert_eq!(config.save_to_source(&source).unwrap(), None);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_loaded_file_receives_changes() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.ron");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "(demos: (dash: (dash_speed: 900.0)))").unwrap();

        let (mut config, source) = AppConfig::load_first(&[missing, path.clone()]);
        assert_eq!(source, ConfigSource::Loaded(path.clone()));

        config.fps_limit = FpsLimit::Unlocked;
        assert_eq!(config.save_to_source(&source).unwrap(), Some(path.clone()));
        let reloaded = AppConfig::load(&path).unwrap();
        assert_eq!(reloaded.fps_limit, FpsLimit::Unlocked);
        assert_eq!(reloaded.demos.dash.dash_speed, 900.0);
    }

    #[test]
    fn test_fps_limit_cycle() {
        assert_eq!(FpsLimit::Fps30.next().next().next(), FpsLimit::Fps30);
        assert!(FpsLimit::Unlocked.frame_time().is_none());
    }
}
