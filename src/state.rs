use std::time::Duration;

use log::warn;
use rand::Rng;

use crate::config::GameConfig;
use crate::snake::{Direction, Position, Snake};

/// Play area in board units, as reported by the rendering surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
}

impl Board {
    pub fn new(width: i32, height: i32) -> Self {
        Board { width, height }
    }

    /// Number of whole (columns, rows) that fit, never less than one each.
    pub fn cells(&self, cell_size: i32) -> (i32, i32) {
        let cols = self.width / cell_size;
        let rows = self.height / cell_size;

        if cols < 1 || rows < 1 {
            warn!("Board {}x{} is smaller than one cell of {}", self.width, self.height, cell_size);
        }

        (cols.max(1), rows.max(1))
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    snake: Snake,
    food: Position,
    tick_interval: Duration,
}

impl GameState {
    pub fn initialize<R: Rng>(config: GameConfig, board: Board, rng: &mut R) -> Self {
        let cell = config.cell_size;
        let (cols, rows) = board.cells(cell);

        if config.initial_length as i32 > cols {
            warn!(
                "Board is {} columns wide, a snake of {} will start partly off the board",
                cols, config.initial_length
            );
        }

        // Middle segment sits on the center column, head to its right
        let head_col = cols / 2 + config.initial_length as i32 / 2;
        let head = Position::new(head_col * cell, rows / 2 * cell);
        let snake = Snake::new(head, config.initial_length, Direction::Right, cell);

        let mut state = GameState {
            config,
            snake,
            food: Position::default(),
            tick_interval: config.initial_tick(),
        };
        state.place_food_randomly(board, rng);
        state
    }

    /// Any direction is accepted, including straight back into the body.
    pub fn set_direction(&mut self, new_direction: Direction) {
        self.snake.set_direction(new_direction);
    }

    /// Picks a random cell. The snake body is not avoided.
    pub fn place_food_randomly<R: Rng>(&mut self, board: Board, rng: &mut R) {
        let cell = self.config.cell_size;
        let (max_x, max_y) = board.cells(cell);

        self.food = Position::new(rng.gen_range(0..max_x) * cell, rng.gen_range(0..max_y) * cell);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn body(&self) -> &[Position] {
        self.snake.body()
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    ///////////////////////////////////////////////////////////////////////////

    pub(crate) fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    pub(crate) fn speed_up(&mut self) {
        let faster = self.tick_interval.saturating_sub(self.config.tick_decrement());
        self.tick_interval = faster.max(self.config.min_tick());
    }

    #[cfg(test)]
    pub(crate) fn with_parts(config: GameConfig, snake: Snake, food: Position) -> Self {
        GameState { config, snake, food, tick_interval: config.initial_tick() }
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Position) {
        self.food = food;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_initialize_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = GameConfig::default();
        let state = GameState::initialize(config, Board::new(400, 300), &mut rng);

        let body = state.body();
        assert_eq!(body.len(), 5);
        assert!(body.iter().all(|p| p.y == body[0].y));
        assert_eq!(body[0].y, 7 * 20);
        for pair in body.windows(2) {
            assert_eq!(pair[0].x - pair[1].x, 20);
        }

        // Middle segment on the center column, two on either side
        assert_eq!(body[2].x, 400 / 2);
        assert_eq!(body[0].x - body[2].x, body[2].x - body[4].x);

        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.tick_interval(), config.initial_tick());
        assert!(Board::new(400, 300).contains(state.food()));
    }

    #[test]
    fn test_initialize_custom_length() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = GameConfig { initial_length: 3, cell_size: 10, ..GameConfig::default() };
        let state = GameState::initialize(config, Board::new(200, 100), &mut rng);

        assert_eq!(state.body(), &[Position::new(110, 50), Position::new(100, 50), Position::new(90, 50)]);
    }

    #[test]
    fn test_narrow_board_starts_off_board() {
        let mut rng = StdRng::seed_from_u64(5);
        let board = Board::new(60, 400);
        let state = GameState::initialize(GameConfig::default(), board, &mut rng);

        // Kept as-is: the head lands outside and the first tick ends the game
        assert_eq!(state.body()[0], Position::new(60, 200));
        assert_eq!(state.body()[4], Position::new(-20, 200));
        assert!(!board.contains(state.head()));
    }

    #[test]
    fn test_set_direction_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = GameState::initialize(GameConfig::default(), Board::new(400, 400), &mut rng);

        state.set_direction(Direction::Up);
        state.set_direction(Direction::Up);
        assert_eq!(state.direction(), Direction::Up);

        state.set_direction(Direction::Down);
        assert_eq!(state.direction(), Direction::Down);
    }

    #[test]
    fn test_food_stays_on_grid() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = GameConfig::default();
        let mut state = GameState::initialize(config, Board::new(20, 20), &mut rng);

        for cols in 1..12 {
            for rows in 1..12 {
                let board = Board::new(cols * 20, rows * 20);
                for _ in 0..20 {
                    state.place_food_randomly(board, &mut rng);
                    let food = state.food();
                    assert!(board.contains(food), "{:?} outside {:?}", food, board);
                    assert_eq!(food.x % 20, 0);
                    assert_eq!(food.y % 20, 0);
                }
            }
        }
    }

    #[test]
    fn test_food_on_degenerate_board() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = GameState::initialize(GameConfig::default(), Board::new(5, 0), &mut rng);

        state.place_food_randomly(Board::new(19, 3), &mut rng);
        assert_eq!(state.food(), Position::new(0, 0));
    }

    #[test]
    fn test_speed_up_is_floored() {
        let config = GameConfig { initial_tick_ms: 35, tick_decrement_ms: 10, min_tick_ms: 20, ..GameConfig::default() };
        let snake = Snake::new(Position::new(100, 100), 3, Direction::Right, 20);
        let mut state = GameState::with_parts(config, snake, Position::new(0, 0));

        state.speed_up();
        assert_eq!(state.tick_interval(), Duration::from_millis(25));
        state.speed_up();
        assert_eq!(state.tick_interval(), Duration::from_millis(20));
        state.speed_up();
        assert_eq!(state.tick_interval(), Duration::from_millis(20));
    }
}
