mod config;
mod engine;
mod game;
mod input;
mod snake;
mod state;
mod term;

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::config::GameConfig;
use crate::game::{Flow, SnakeGame};

pub type TermInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Terminal snake that speeds up every time it eats")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Edge length of one grid cell, in board units
    #[arg(long)]
    cell_size: Option<i32>,

    /// Number of segments the snake starts with
    #[arg(long)]
    initial_length: Option<usize>,

    /// Starting time between ticks, in milliseconds
    #[arg(long)]
    initial_tick_ms: Option<u64>,

    /// How much shorter a tick gets per food eaten, in milliseconds
    #[arg(long)]
    tick_decrement_ms: Option<u64>,

    /// Shortest allowed tick, in milliseconds
    #[arg(long)]
    min_tick_ms: Option<u64>,

    /// Where to write the log (the terminal is busy with the game)
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(v) = self.cell_size { config.cell_size = v; }
        if let Some(v) = self.initial_length { config.initial_length = v; }
        if let Some(v) = self.initial_tick_ms { config.initial_tick_ms = v; }
        if let Some(v) = self.tick_decrement_ms { config.tick_decrement_ms = v; }
        if let Some(v) = self.min_tick_ms { config.min_tick_ms = v; }

        Ok(config.sanitized())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level.into(), Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let config = cli.game_config()?;
    info!("Starting snake with {:?}", config);

    let mut game = SnakeGame::new(config)?;
    game.initialize()?;

    let result = run(&mut game);

    // The terminal is restored even if the game loop failed
    game.restore()?;
    info!("Exiting");
    result
}

fn run(game: &mut SnakeGame) -> Result<()> {
    if game.show_intro()? == Flow::Quit {
        return Ok(());
    }

    while game.play()? == Flow::PlayAgain {}

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from(["snake", "--cell-size", "10", "--min-tick-ms", "50"]);
        let config = cli.game_config().unwrap();

        assert_eq!(config.cell_size, 10);
        assert_eq!(config.min_tick_ms, 50);
        assert_eq!(config.initial_length, 5);
        assert_eq!(config.initial_tick_ms, 200);
    }

    #[test]
    fn test_flags_are_sanitized() {
        let cli = Cli::parse_from(["snake", "--cell-size", "0", "--initial-length", "0"]);
        let config = cli.game_config().unwrap();

        assert_eq!(config.cell_size, 1);
        assert_eq!(config.initial_length, 1);
    }

    #[test]
    fn test_log_level_parsing() {
        let cli = Cli::parse_from(["snake", "--log-level", "debug"]);
        assert_eq!(LevelFilter::from(cli.log_level), LevelFilter::Debug);
        assert_eq!(cli.log_file, PathBuf::from("snake.log"));
    }
}
