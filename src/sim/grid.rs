//! Toroidal board geometry

use serde::{Deserialize, Serialize};

use crate::wrap;

/// A tile coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Unit step the snake takes each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const UP: Direction = Direction { dx: 0, dy: -1 };
    pub const DOWN: Direction = Direction { dx: 0, dy: 1 };
    pub const LEFT: Direction = Direction { dx: -1, dy: 0 };
    pub const RIGHT: Direction = Direction { dx: 1, dy: 0 };

    /// Build a direction from raw deltas; only the four unit steps are valid
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) | (0, 1) | (-1, 0) | (1, 0) => Some(Self { dx, dy }),
            _ => None,
        }
    }

    pub fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }

    pub fn is_reverse_of(self, other: Direction) -> bool {
        self.reversed() == other
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::RIGHT
    }
}

/// Named turn intent coming from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Up,
    Down,
    Left,
    Right,
}

impl From<Turn> for Direction {
    fn from(turn: Turn) -> Self {
        match turn {
            Turn::Up => Direction::UP,
            Turn::Down => Direction::DOWN,
            Turn::Left => Direction::LEFT,
            Turn::Right => Direction::RIGHT,
        }
    }
}

/// Fixed-size wrapped lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Normalize any position into the board
    #[inline]
    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(wrap(pos.x, self.width), wrap(pos.y, self.height))
    }

    /// Neighbouring cell one step along `dir`, wrapped
    #[inline]
    pub fn step(&self, pos: Position, dir: Direction) -> Position {
        self.wrap(Position::new(pos.x + dir.dx, pos.y + dir.dy))
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Manhattan distance taking the shorter way around each axis
    pub fn distance(&self, a: Position, b: Position) -> i32 {
        let dx = wrap(a.x - b.x, self.width);
        let dy = wrap(a.y - b.y, self.height);
        dx.min(self.width - dx) + dy.min(self.height - dy)
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }
}
