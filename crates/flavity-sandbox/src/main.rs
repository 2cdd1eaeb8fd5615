//! Flavity sandbox: a headless session in a closed room where gravity can
//! point at any of four walls.
//!
//! Loads `config.ron` (creating it on first run), applies CLI overrides, and
//! drives one character through a scripted input timeline for a fixed number
//! of ticks.
//!
//! Run with: `cargo run -p flavity-sandbox -- --ticks 900`

mod app;
mod script;

use clap::Parser;
use flavity_config::{CliArgs, Config, ConfigError, default_config_dir};
use tracing::info;

fn main() -> Result<(), ConfigError> {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(&args);

    flavity_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );

    info!("Flavity sandbox");
    info!(
        "Movement: walk {:.1} m/s, sprint {:.1} m/s, jump {:.1} m/s for {:.2}s",
        config.movement.move_speed,
        config.movement.sprint_speed,
        config.movement.jump_force,
        config.movement.max_jump_time
    );
    info!(
        "Look: sensitivity {:.3}°/count, pitch limit ±{:.0}°, roll coupling {:?}",
        config.look.mouse_sensitivity, config.look.max_look_angle, config.look.roll_coupling
    );

    let summary = app::run(&config, script::default_timeline());

    match summary.status {
        Some(status) => info!(
            "Finished {} ticks: gravity {:?}, grounded {}, position ({:.2}, {:.2}, {:.2})",
            summary.ticks,
            summary.gravity,
            status.grounded,
            status.position.x,
            status.position.y,
            status.position.z
        ),
        None => info!("Finished {} ticks with no character", summary.ticks),
    }
    Ok(())
}
