mod hazard;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::window::{Window, WindowPlugin, WindowResolution};
use clap::Parser;
use hazard::HazardPlugin;
use tracing_subscriber::EnvFilter;
use warriors_core::{CurrentLevel, GameConfig, HudPlugin, Player, PlayerHealth, WarriorsPlugin};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about = "Run the HouseWarriors character sandbox")]
struct Cli {
    /// TOML file with `[health]` and `[level]` sections.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulate without a window and exit after `--frames` frames.
    #[arg(long)]
    headless: bool,
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Seconds per headless frame.
    #[arg(long, default_value_t = 1.0 / 30.0)]
    frame_delta: f32,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Seconds between hazard hits.
    #[arg(long, default_value_t = 4.0)]
    hazard_interval: f32,
    #[arg(long, default_value_t = 5)]
    hazard_min: i32,
    #[arg(long, default_value_t = 35)]
    hazard_max: i32,
}

impl Cli {
    fn hazard(&self) -> Result<HazardPlugin> {
        ensure!(
            self.hazard_min > 0 && self.hazard_min <= self.hazard_max,
            "hazard damage range {}..={} must be positive and non-empty",
            self.hazard_min,
            self.hazard_max
        );
        ensure!(
            self.hazard_interval > 0.0,
            "hazard interval must be positive, got {}",
            self.hazard_interval
        );
        Ok(HazardPlugin {
            seed: self.seed,
            interval: self.hazard_interval,
            damage: self.hazard_min..=self.hazard_max,
        })
    }

    fn game_config(&self) -> Result<GameConfig> {
        let config = match &self.config {
            Some(path) => GameConfig::from_path(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => GameConfig::default(),
        };
        Ok(config.with_env_overrides())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.headless {
        run_headless(&cli)
    } else {
        run_windowed(&cli)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let cli = Cli::parse_from(["warriors_runner"]);
    if let Err(err) = run_windowed(&cli) {
        bevy::log::error!("{err:#}");
    }
}

fn run_windowed(cli: &Cli) -> Result<()> {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(window_plugin()))
        .insert_resource(cli.game_config()?)
        .add_plugins((WarriorsPlugin, HudPlugin, cli.hazard()?));
    app.run();
    Ok(())
}

fn run_headless(cli: &Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .ok();
    ensure!(
        cli.frame_delta.is_finite() && cli.frame_delta > 0.0,
        "frame delta must be positive, got {}",
        cli.frame_delta
    );

    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_once()))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            cli.frame_delta,
        )))
        .insert_resource(cli.game_config()?)
        .add_plugins((WarriorsPlugin, cli.hazard()?));
    app.finish();
    app.cleanup();

    for _ in 0..cli.frames {
        app.update();
    }

    let world = app.world_mut();
    let generation = world.resource::<CurrentLevel>().generation;
    let mut players = world.query_filtered::<&PlayerHealth, With<Player>>();
    for health in players.iter(world) {
        tracing::info!(
            target: "warriors_runner",
            frames = cli.frames,
            reloads = generation,
            snapshot = ?health.snapshot(),
            "headless run finished"
        );
    }
    Ok(())
}

fn window_plugin() -> WindowPlugin {
    WindowPlugin {
        primary_window: Some(Window {
            title: "HouseWarriors".into(),
            resolution: WindowResolution::new(960.0, 540.0),
            #[cfg(target_arch = "wasm32")]
            canvas: Some("#bevy-canvas".into()),
            #[cfg(target_arch = "wasm32")]
            fit_canvas_to_parent: true,
            ..default()
        }),
        ..default()
    }
}
