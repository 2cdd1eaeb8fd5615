//! Configuration for Flavity.
//!
//! Tuning values for movement, look, gravity and the sandbox persist to disk as
//! a RON file. CLI flags override whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, LookConfig, MovementConfig, PhysicsConfig, RollCoupling, SandboxConfig,
    default_config_dir,
};
pub use error::ConfigError;
