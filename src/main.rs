//! Brick Breaker headless runner
//!
//! Plays a session in autopilot mode at the fixed frame cadence and reports
//! how far it got.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use brick_breaker::GameConfig;
use brick_breaker::audio::{AudioManager, LogSink};
use brick_breaker::sim::{GamePhase, GameState, MenuCommand, TickInput, tick};

#[derive(Parser, Debug)]
#[command(name = "brick-breaker")]
#[command(about = "Headless brick-breaker simulation driven by the autopilot")]
struct Cli {
    /// JSON game config (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum ticks to simulate
    #[arg(long, default_value_t = 36_000)]
    ticks: u64,
    /// Starting level
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Print the final render snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut state = match cli.seed {
        Some(seed) => GameState::with_seed(config, seed),
        None => GameState::new(config),
    }
    .with_level(cli.level);
    log::info!("Brick Breaker starting on level {}", state.level());

    let mut audio = AudioManager::new(LogSink);
    let mut input = TickInput {
        command: Some(MenuCommand::Start),
        autopilot: true,
        ..Default::default()
    };
    let mut cues = 0usize;
    let mut ticks = 0u64;

    while ticks < cli.ticks && !state.exit_requested() {
        tick(&mut state, &input, 1.0);
        cues += audio.play_events(&state);
        ticks += 1;

        input.command = match state.phase() {
            GamePhase::LevelPopup => Some(MenuCommand::NextLevel),
            GamePhase::MaxPopup | GamePhase::GameOver => break,
            _ => None,
        };
    }

    log::info!(
        "Finished after {} ticks: {:?}, level {}, best level {}, score {}, lives {}, {} sound cues",
        ticks,
        state.phase(),
        state.level(),
        state.best_level(),
        state.score(),
        state.lives(),
        cues
    );

    if cli.json {
        let json = serde_json::to_string_pretty(&state.snapshot()).context("serializing snapshot")?;
        println!("{json}");
    }

    Ok(())
}
