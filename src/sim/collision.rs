//! Pixel-space collision between grid cells and free-moving hazards
//!
//! The snake lives on integer tiles while obstacles fly in pixels, so tiles
//! are converted to boxes before testing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Position;

/// Axis-aligned bounding box (min corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Box covering one grid tile
    pub fn from_tile(pos: Position, tile_size: f32) -> Self {
        Self {
            min: Vec2::new(pos.x as f32, pos.y as f32) * tile_size,
            size: Vec2::splat(tile_size),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_box() {
        let b = Aabb::from_tile(Position::new(2, 3), 20.0);
        assert_eq!(b.min, Vec2::new(40.0, 60.0));
        assert_eq!(b.max(), Vec2::new(60.0, 80.0));
    }

    #[test]
    fn test_overlap() {
        let tile = Aabb::from_tile(Position::new(1, 1), 20.0);
        let hit = Aabb::new(Vec2::new(35.0, 22.5), Vec2::new(30.0, 15.0));
        assert!(tile.overlaps(&hit));
        assert!(hit.overlaps(&tile));
    }

    #[test]
    fn test_touching_edges_miss() {
        let tile = Aabb::from_tile(Position::new(1, 1), 20.0);
        let left = Aabb::new(Vec2::new(-10.0, 22.5), Vec2::new(30.0, 15.0));
        assert!(!tile.overlaps(&left));
        let other_row = Aabb::new(Vec2::new(25.0, 42.5), Vec2::new(30.0, 15.0));
        assert!(!tile.overlaps(&other_row));
    }
}
