use std::time::Instant;

use crate::config::GameConfig;
use crate::engine::{GameEngine, Status, TickOutcome};
use crate::input::{self, KeyAction};
use crate::snake::Position;
use crate::state::GameState;
use crate::term::TermManager;

use anyhow::Result;
use crossterm::event::Event;
use crossterm::style::Color;
use log::{debug, info};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

const INTRO_LINES: [&str; 4] = [
    "Arrow keys or WASD to move",
    "Esc, Q or CTRL+C to quit",
    "",
    "Press any key to begin"
];

const GAME_OVER_LINES: [&str; 4] = [
    "Game over!",
    "",
    "Press any key to play again,",
    "or Esc, Q or CTRL+C to quit."
];

const SNAKE_COLOR: Color = Color::Green;
const FOOD_COLOR: Color = Color::Red;
const DEAD_SNAKE_COLOR: Color = Color::DarkRed;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    PlayAgain,
    Quit,
}

pub struct SnakeGame {
    config: GameConfig,
    term: TermManager,
    drawn: Vec<Position>,
}

impl SnakeGame {
    pub fn new(config: GameConfig) -> Result<Self> {
        Ok(SnakeGame { config, term: TermManager::new()?, drawn: vec![] })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()
    }

    pub fn show_intro(&mut self) -> Result<Flow> {
        self.term.show_message(&INTRO_LINES)?;

        let key = self.term.read_key_blocking()?;
        if input::map_key(&key) == KeyAction::Quit {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::PlayAgain)
    }

    /// Runs one game to completion. A fresh engine is built every time, nothing
    /// carries over from the previous game.
    pub fn play(&mut self) -> Result<Flow> {
        let cell = self.config.cell_size;
        let board = self.term.board(cell);
        let mut engine = GameEngine::new(self.config, board);

        info!("New game on a {}x{} board", board.width, board.height);
        self.redraw_all(engine.state())?;

        let mut next_tick = Instant::now() + engine.state().tick_interval();

        while engine.status() == Status::Running {
            let timeout = next_tick.saturating_duration_since(Instant::now());

            for ev in self.term.read_events(timeout)? {
                match ev {
                    Event::Key(key) => match input::map_key(&key) {
                        KeyAction::Turn(dir) => engine.on_direction_key(dir),
                        KeyAction::Quit => return Ok(Flow::Quit),
                        KeyAction::None => {}
                    },
                    Event::Resize(width, height) => {
                        info!("Terminal resized to {}x{}", width, height);
                        self.term.resize(width, height)?;
                        self.redraw_all(engine.state())?;
                    },
                    _ => {}
                }
            }

            if Instant::now() < next_tick { continue; }

            // The board is re-read every tick so a resize takes effect right away
            match engine.on_tick(self.term.board(cell)) {
                TickOutcome::Moved { ate } => {
                    if ate {
                        debug!("Tick interval now {:?}", engine.state().tick_interval());
                    }
                    self.draw_state(engine.state())?;
                },
                TickOutcome::GameOver | TickOutcome::Ignored => continue,
            }

            // Re-armed after every tick, so a speed up applies to the very next one
            next_tick = Instant::now() + engine.state().tick_interval();
        }

        self.game_over(engine.state())?;

        if input::map_key(&self.term.read_key_blocking()?) == KeyAction::Quit {
            Ok(Flow::Quit)
        } else {
            Ok(Flow::PlayAgain)
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self, state: &GameState) -> Result<()> {
        info!("Game over, final length {}", state.snake().len());

        for pos in state.body() {
            self.term.print_cell(*pos, self.config.cell_size, DEAD_SNAKE_CHAR, DEAD_SNAKE_COLOR)?;
        }

        self.term.show_message(&GAME_OVER_LINES)
    }

    fn redraw_all(&mut self, state: &GameState) -> Result<()> {
        self.term.clear()?;
        self.term.draw_borders()?;
        self.drawn.clear();
        self.draw_state(state)
    }

    /// Erases what the previous frame drew, then draws the food and every segment.
    fn draw_state(&mut self, state: &GameState) -> Result<()> {
        let cell = self.config.cell_size;

        for pos in std::mem::take(&mut self.drawn) {
            self.term.print_cell(pos, cell, ' ', Color::Reset)?;
        }

        self.term.print_cell(state.food(), cell, FOOD_CHAR, FOOD_COLOR)?;

        let body = state.body();
        for pos in body.iter().skip(1).rev() {
            self.term.print_cell(*pos, cell, SNAKE_BODY_CHAR, SNAKE_COLOR)?;
        }
        self.term.print_cell(state.head(), cell, state.snake().head_char(), SNAKE_COLOR)?;

        self.drawn.extend_from_slice(body);
        self.drawn.push(state.food());
        self.term.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_messages_list_every_quit_key() {
        let quit_keys = [
            (KeyCode::Esc, KeyModifiers::NONE, "Esc"),
            (KeyCode::Char('q'), KeyModifiers::NONE, "Q"),
            (KeyCode::Char('c'), KeyModifiers::CONTROL, "CTRL+C"),
        ];

        for (code, modifiers, label) in quit_keys.iter() {
            let ev = KeyEvent { code: *code, modifiers: *modifiers };
            assert_eq!(input::map_key(&ev), KeyAction::Quit);

            for lines in [&INTRO_LINES, &GAME_OVER_LINES].iter() {
                assert!(lines.iter().any(|l| l.contains(*label)), "{} missing from {:?}", label, lines);
            }
        }
    }
}
