//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, RollCoupling};

/// Flavity command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "flavity", about = "Gravity-switching character controller sandbox")]
pub struct CliArgs {
    /// Number of fixed ticks to simulate.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Walk speed in m/s.
    #[arg(long)]
    pub move_speed: Option<f32>,

    /// Look sensitivity in degrees per raw count.
    #[arg(long)]
    pub sensitivity: Option<f32>,

    /// Snap the view roll to the gravity direction whenever gravity changes.
    #[arg(long)]
    pub couple_roll: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ticks) = args.ticks {
            self.sandbox.ticks = ticks;
        }
        if let Some(speed) = args.move_speed {
            self.movement.move_speed = speed;
        }
        if let Some(sensitivity) = args.sensitivity {
            self.look.mouse_sensitivity = sensitivity;
        }
        if args.couple_roll {
            self.look.roll_coupling = RollCoupling::ResetOnGravityChange;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
