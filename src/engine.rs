use log::{debug, info};
use rand::{rngs::ThreadRng, Rng};

use crate::config::GameConfig;
use crate::snake::Direction;
use crate::state::{Board, GameState};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    GameOver,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Moved { ate: bool },
    /// The head would have left the board. The engine is now terminal.
    GameOver,
    /// The game was already over; nothing changed.
    Ignored,
}

/// Owns the game state and advances it one tick at a time. Input and ticks
/// both go through `&mut self`, so they can never interleave.
pub struct GameEngine<R = ThreadRng> {
    state: GameState,
    status: Status,
    rng: R,
}

impl GameEngine<ThreadRng> {
    pub fn new(config: GameConfig, board: Board) -> Self {
        Self::with_rng(config, board, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, board: Board, mut rng: R) -> Self {
        let state = GameState::initialize(config, board, &mut rng);
        GameEngine { state, status: Status::Running, rng }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == Status::GameOver
    }

    pub fn on_direction_key(&mut self, direction: Direction) {
        if self.is_over() {
            return;
        }

        self.state.set_direction(direction);
    }

    pub fn on_tick(&mut self, board: Board) -> TickOutcome {
        if self.is_over() {
            return TickOutcome::Ignored;
        }

        let cell = self.state.config().cell_size;
        let head = self.state.head();
        let next = head + self.state.direction().step(cell);

        self.state.snake_mut().follow();

        if !board.contains(next) {
            info!("Game over at {:?}, length {}", next, self.state.snake().len());
            self.status = Status::GameOver;
            return TickOutcome::GameOver;
        }

        let food = self.state.food();
        let ate = (next.x - food.x).abs() < cell && (next.y - food.y).abs() < cell;

        if ate {
            self.state.snake_mut().grow();
            self.state.speed_up();
            self.state.place_food_randomly(board, &mut self.rng);
            debug!(
                "Ate food at {:?}, length {}, tick {:?}, next food {:?}",
                food,
                self.state.snake().len(),
                self.state.tick_interval(),
                self.state.food()
            );
        }

        self.state.snake_mut().set_head(next);
        TickOutcome::Moved { ate }
    }

    #[cfg(test)]
    fn from_state(state: GameState, rng: R) -> Self {
        GameEngine { state, status: Status::Running, rng }
    }
}
