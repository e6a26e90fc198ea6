use std::ops::Add;

use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// Offset of one step in this direction on a grid of `cell_size` cells
    pub fn step(&self, cell_size: i32) -> Position {
        let (dx, dy) = self.delta();
        Position::new(dx * cell_size, dy * cell_size)
    }
}

/// Body segments, head first. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Position>,
    direction: Direction,
}

impl Snake {
    /// Lays out `size` segments one cell apart, trailing behind `head`.
    pub fn new(head: Position, size: usize, direction: Direction, cell_size: i32) -> Self {
        let back = direction.step(-cell_size);
        let body = (0..size.max(1) as i32)
            .map(|i| Position::new(head.x + back.x * i, head.y + back.y * i))
            .collect();
        Snake { body, direction }
    }

    #[cfg(test)]
    pub fn from_body(body: Vec<Position>, direction: Direction) -> Self {
        assert!(!body.is_empty());
        Snake { body, direction }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Every segment takes the place of the one ahead of it. The head stays put.
    pub fn follow(&mut self) {
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
    }

    /// Appends a copy of the current tail; the two separate on later moves.
    pub fn grow(&mut self) {
        let tail = self.body[self.body.len() - 1];
        self.body.push(tail);
    }

    pub fn set_head(&mut self, pos: Position) {
        self.body[0] = pos;
    }

    pub fn set_direction(&mut self, new_direction: Direction) {
        self.direction = new_direction;
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_delta() {
        assert_eq!(Up.delta(), (0, -1));
        assert_eq!(Down.delta(), (0, 1));
        assert_eq!(Left.delta(), (-1, 0));
        assert_eq!(Right.delta(), (1, 0));
        assert_eq!(Left.step(20), Position::new(-20, 0));
    }

    #[test]
    fn test_new_snake_trails_behind_head() {
        let snake = Snake::new(Position::new(100, 40), 3, Right, 20);
        assert_eq!(snake.body(), &[Position::new(100, 40), Position::new(80, 40), Position::new(60, 40)]);

        let snake = Snake::new(Position::new(100, 40), 2, Up, 20);
        assert_eq!(snake.body(), &[Position::new(100, 40), Position::new(100, 60)]);
    }

    #[test]
    fn test_follow_shifts_toward_tail() {
        let mut snake = Snake::from_body(vec![Position::new(40, 0), Position::new(20, 0), Position::new(0, 0)], Right);
        snake.follow();
        assert_eq!(snake.body(), &[Position::new(40, 0), Position::new(40, 0), Position::new(20, 0)]);
    }

    #[test]
    fn test_grow_duplicates_tail() {
        let mut snake = Snake::from_body(vec![Position::new(20, 0), Position::new(0, 0)], Right);
        snake.grow();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.body()[2], Position::new(0, 0));
    }

    #[test]
    fn test_single_segment_snake() {
        let mut snake = Snake::new(Position::new(0, 0), 0, Down, 20);
        assert_eq!(snake.len(), 1);
        snake.follow();
        snake.grow();
        assert_eq!(snake.body(), &[Position::new(0, 0), Position::new(0, 0)]);
    }

    #[test]
    fn test_reverse_direction_is_accepted() {
        let mut snake = Snake::new(Position::new(100, 40), 3, Right, 20);
        snake.set_direction(Left);
        assert_eq!(snake.get_direction(), Left);
        assert_eq!(snake.head_char(), '<');
    }
}
