//! Configuration structs with gameplay defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Locomotion and jump tuning.
    pub movement: MovementConfig,
    /// Mouse look tuning.
    pub look: LookConfig,
    /// Gravity and fixed-step settings.
    pub physics: PhysicsConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
    /// Headless sandbox session settings.
    pub sandbox: SandboxConfig,
}

/// Locomotion and jump tuning, all in meters and seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Walk speed in m/s.
    pub move_speed: f32,
    /// Speed while the sprint input is held, in m/s.
    pub sprint_speed: f32,
    /// Vertical local speed held while a jump is rising, in m/s.
    pub jump_force: f32,
    /// Longest time a held jump keeps rising, in seconds.
    pub max_jump_time: f32,
    /// Length of the downward ground probe from the body origin.
    pub ground_check_distance: f32,
    /// Bit mask of collider layers that count as ground.
    pub ground_layers: u32,
}

/// What happens to the view roll when gravity changes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RollCoupling {
    /// View roll only follows explicit roll commands.
    #[default]
    Independent,
    /// A gravity change also snaps the view roll to the direction's canonical roll.
    ResetOnGravityChange,
}

/// Mouse look tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookConfig {
    /// Degrees of rotation per raw look count.
    pub mouse_sensitivity: f32,
    /// Pitch limit in degrees, applied symmetrically.
    pub max_look_angle: f32,
    /// Gravity/view-roll coupling policy.
    pub roll_coupling: RollCoupling,
}

/// Gravity and fixed-step settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration in m/s².
    pub gravity_magnitude: f32,
    /// Simulation tick length in seconds.
    pub fixed_dt: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log the character status every N ticks (0 disables).
    pub status_interval: u32,
}

/// Headless sandbox session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SandboxConfig {
    /// Number of fixed ticks to simulate.
    pub ticks: u32,
    /// Half the edge length of the cubic test room, in meters.
    pub room_half_extent: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            sprint_speed: 8.0,
            jump_force: 5.0,
            max_jump_time: 0.3,
            ground_check_distance: 1.1,
            ground_layers: 1,
        }
    }
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.1,
            max_look_angle: 90.0,
            roll_coupling: RollCoupling::Independent,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_magnitude: 9.81,
            fixed_dt: 1.0 / 60.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            status_interval: 30,
        }
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            ticks: 900,
            room_half_extent: 6.0,
        }
    }
}

/// Platform config directory for Flavity (e.g. `~/.config/flavity`), falling
/// back to the working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("flavity"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
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
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Re-read the file; `Some` only when its contents differ from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
