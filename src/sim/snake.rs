//! Snake motion on the wrapped grid
//!
//! Segments live in a plain `Vec`; the segment after `i` is `i + 1`. Movement
//! is a shift register: each segment takes the previous position of the one
//! in front of it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, Position};
use crate::consts::{CONVERGENCE_MAX, CONVERGENCE_MIN, CONVERGENCE_START};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Head,
    Normal,
    /// Head that cuts through its own body instead of dying
    Ram,
    /// Grown at top speed (cosmetic)
    Speedy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub position: Position,
    pub kind: SegmentKind,
    /// Ticks this segment has existed
    pub age: u32,
    pub last_direction: Direction,
    /// Cosmetic wobble in [1, 5]
    pub convergence: u8,
}

/// Result of a single `Snake::advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub new_head: Position,
    /// Head ran into the body without a ram head; nothing moved
    pub collided: bool,
    /// Segments destroyed by a ram head this move
    pub segments_cut: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    grid: Grid,
    segments: Vec<Segment>,
    direction: Direction,
}

impl Snake {
    /// Straight horizontal snake, head at the board center, facing right
    pub fn new(grid: Grid, initial_length: usize) -> Self {
        let head = grid.center();
        let segments = (0..initial_length.max(1))
            .map(|i| Segment {
                position: grid.wrap(Position::new(head.x - i as i32, head.y)),
                kind: if i == 0 {
                    SegmentKind::Head
                } else {
                    SegmentKind::Normal
                },
                age: i as u32,
                last_direction: Direction::RIGHT,
                convergence: CONVERGENCE_START,
            })
            .collect();
        Self {
            grid,
            segments,
            direction: Direction::RIGHT,
        }
    }

    /// Snake with explicit body cells (head first), facing `direction`.
    /// `None` for an empty body.
    pub fn from_positions(
        grid: Grid,
        positions: &[Position],
        direction: Direction,
    ) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let segments = positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Segment {
                position: grid.wrap(position),
                kind: if i == 0 {
                    SegmentKind::Head
                } else {
                    SegmentKind::Normal
                },
                age: i as u32,
                last_direction: direction,
                convergence: CONVERGENCE_START,
            })
            .collect();
        Some(Self {
            grid,
            segments,
            direction,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head(&self) -> Position {
        self.segments[0].position
    }

    pub fn head_kind(&self) -> SegmentKind {
        self.segments[0].kind
    }

    pub fn set_head_kind(&mut self, kind: SegmentKind) {
        self.segments[0].kind = kind;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn positions(&self) -> Vec<Position> {
        self.segments.iter().map(|s| s.position).collect()
    }

    /// Change heading. A full reversal is ignored.
    ///
    /// Returns whether the direction was accepted.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        if dir.is_reverse_of(self.direction) {
            return false;
        }
        self.direction = dir;
        true
    }

    /// Advance one cell.
    ///
    /// A non-ram head hitting the body reports `collided` and leaves the chain
    /// untouched. A ram head cuts the chain at the hit index and keeps going.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MoveOutcome {
        let new_head = self.grid.step(self.head(), self.direction);
        let mut segments_cut = 0;

        if let Some(hit) = self.segments.iter().position(|s| s.position == new_head) {
            if self.head_kind() != SegmentKind::Ram {
                return MoveOutcome {
                    new_head,
                    collided: true,
                    segments_cut: 0,
                };
            }
            // Hitting the head itself would need a zero-length move; keep at least the head
            let keep = hit.max(1);
            segments_cut = self.segments.len() - keep;
            self.segments.truncate(keep);
        }

        let convergence = {
            let last = self.segments[0].convergence as i16;
            let step = if rng.random_bool(0.5) { -1 } else { 1 };
            (last + step).clamp(CONVERGENCE_MIN as i16, CONVERGENCE_MAX as i16) as u8
        };

        for i in (1..self.segments.len()).rev() {
            let (front, back) = self.segments.split_at_mut(i);
            let prev = &front[i - 1];
            let cur = &mut back[0];
            cur.position = prev.position;
            cur.last_direction = prev.last_direction;
            cur.age += 1;
        }

        let head = &mut self.segments[0];
        head.position = new_head;
        head.last_direction = self.direction;
        head.convergence = convergence;

        MoveOutcome {
            new_head,
            collided: false,
            segments_cut,
        }
    }

    /// Append a segment on top of the tail; it separates on the next move
    pub fn grow(&mut self, kind: SegmentKind) {
        let tail = &self.segments[self.segments.len() - 1];
        let segment = Segment {
            position: tail.position,
            kind,
            age: 0,
            last_direction: tail.last_direction,
            convergence: tail.convergence,
        };
        self.segments.push(segment);
    }
}
