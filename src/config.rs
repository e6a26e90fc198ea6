use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Largest cell size for which any terminal-sized board still fits in an i32.
pub const MAX_CELL_SIZE: i32 = 10_000;
pub const MAX_INITIAL_LENGTH: usize = 1_000;

/// Tunables for a single game. Every field can be set from a JSON file,
/// missing fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Edge length of one grid cell, in board units
    pub cell_size: i32,
    /// Number of segments the snake starts with
    pub initial_length: usize,
    pub initial_tick_ms: u64,
    /// How much faster the game gets every time food is eaten
    pub tick_decrement_ms: u64,
    /// The tick interval never drops below this
    pub min_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            cell_size: 20,
            initial_length: 5,
            initial_tick_ms: 200,
            tick_decrement_ms: 10,
            min_tick_ms: 20,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Clamps values the engine cannot work with.
    pub fn sanitized(mut self) -> Self {
        if self.cell_size < 1 {
            warn!("cell_size {} is invalid, using 1", self.cell_size);
            self.cell_size = 1;
        }

        if self.cell_size > MAX_CELL_SIZE {
            warn!("cell_size {} is too large, using {}", self.cell_size, MAX_CELL_SIZE);
            self.cell_size = MAX_CELL_SIZE;
        }

        if self.initial_length < 1 {
            warn!("initial_length must be at least 1, using 1");
            self.initial_length = 1;
        }

        if self.initial_length > MAX_INITIAL_LENGTH {
            warn!("initial_length {} is too large, using {}", self.initial_length, MAX_INITIAL_LENGTH);
            self.initial_length = MAX_INITIAL_LENGTH;
        }

        if self.min_tick_ms < 1 {
            warn!("min_tick_ms must be at least 1, using 1");
            self.min_tick_ms = 1;
        }

        if self.initial_tick_ms < self.min_tick_ms {
            warn!(
                "initial_tick_ms {} is below min_tick_ms {}, raising it",
                self.initial_tick_ms, self.min_tick_ms
            );
            self.initial_tick_ms = self.min_tick_ms;
        }

        self
    }

    pub fn initial_tick(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    pub fn tick_decrement(&self) -> Duration {
        Duration::from_millis(self.tick_decrement_ms)
    }

    pub fn min_tick(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }
}
