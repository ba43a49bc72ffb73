//! Birds and arrows crossing the board
//!
//! Obstacles fly left to right in pixel space and vanish once past the right
//! edge. Catching one with the snake's head boosts the score multiplier.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::grid::{Grid, Position};
use crate::settings::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Bird,
    Arrow,
}

/// When new obstacles appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// One obstacle per completed poker hand
    PerHand,
    /// A new obstacle every `ms` of play
    Interval { ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Top-left corner in pixels
    pub pos: Vec2,
    /// Pixels per tick
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleManager {
    grid: Grid,
    tile_size: f32,
    kind: ObstacleKind,
    policy: SpawnPolicy,
    speed: f32,
    width: f32,
    height: f32,
    obstacles: Vec<Obstacle>,
    last_spawn_ms: u64,
}

impl ObstacleManager {
    pub fn new(grid: Grid, config: &GameConfig, now_ms: u64) -> Self {
        Self {
            grid,
            tile_size: config.tile_size,
            kind: config.obstacle_kind,
            policy: config.obstacle_spawn,
            speed: config.obstacle_speed,
            width: config.obstacle_width,
            height: config.obstacle_height,
            obstacles: Vec::new(),
            last_spawn_ms: now_ms,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    /// Launch a new obstacle just off the left edge, centered in a random row
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let row = rng.random_range(0..self.grid.height);
        self.spawn_in_row(row);
    }

    pub fn spawn_in_row(&mut self, row: i32) {
        let y = row as f32 * self.tile_size + (self.tile_size - self.height) / 2.0;
        log::debug!("{:?} launched in row {row}", self.kind);
        self.obstacles.push(Obstacle {
            kind: self.kind,
            pos: Vec2::new(-self.width, y),
            speed: self.speed,
            width: self.width,
            height: self.height,
        });
    }

    /// Move every obstacle and drop the ones that left the board.
    ///
    /// Under `SpawnPolicy::Interval` this also launches due obstacles.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, now_ms: u64) {
        if let SpawnPolicy::Interval { ms } = self.policy {
            if now_ms.saturating_sub(self.last_spawn_ms) >= ms {
                self.spawn(rng);
                self.last_spawn_ms = now_ms;
            }
        }

        let right_edge = self.grid.width as f32 * self.tile_size;
        self.obstacles.retain_mut(|o| {
            o.pos.x += o.speed;
            o.pos.x < right_edge
        });
    }

    /// Restart the interval clock from zero
    pub fn restart_clock(&mut self, now_ms: u64) {
        self.last_spawn_ms = now_ms;
    }

    /// Push the interval clock forward by time spent away from play. Progress
    /// made before the break still counts.
    pub fn skip_time(&mut self, away_ms: u64) {
        self.last_spawn_ms = self.last_spawn_ms.saturating_add(away_ms);
    }

    /// Remove and return the first obstacle overlapping the head tile
    pub fn check_collision(&mut self, head: Position) -> Option<Obstacle> {
        let head_box = Aabb::from_tile(head, self.tile_size);
        let idx = self
            .obstacles
            .iter()
            .position(|o| o.bounds().overlaps(&head_box))?;
        Some(self.obstacles.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn manager(policy: SpawnPolicy) -> ObstacleManager {
        let config = GameConfig {
            obstacle_spawn: policy,
            ..GameConfig::default()
        };
        ObstacleManager::new(Grid::new(10, 10), &config, 0)
    }

    #[test]
    fn test_spawn_off_left_edge_centered_in_row() {
        let mut obstacles = manager(SpawnPolicy::PerHand);
        obstacles.spawn_in_row(3);
        let o = &obstacles.obstacles()[0];
        assert_eq!(o.pos.x, -30.0);
        assert_eq!(o.pos.y, 60.0 + 2.5);
    }

    #[test]
    fn test_obstacle_leaves_board() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut obstacles = manager(SpawnPolicy::PerHand);
        obstacles.spawn(&mut rng);
        // 200 px board + 30 px start offset at 2 px/tick
        for _ in 0..114 {
            obstacles.update(&mut rng, 0);
        }
        assert_eq!(obstacles.obstacles().len(), 1);
        obstacles.update(&mut rng, 0);
        assert!(obstacles.obstacles().is_empty());
    }

    #[test]
    fn test_catch_removes_obstacle() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut obstacles = manager(SpawnPolicy::PerHand);
        obstacles.spawn_in_row(4);
        for _ in 0..20 {
            obstacles.update(&mut rng, 0);
        }
        // x now at 10..40 px, covering tiles 0 and 1 of row 4
        assert!(obstacles.check_collision(Position::new(1, 5)).is_none());
        let caught = obstacles.check_collision(Position::new(1, 4));
        assert!(caught.is_some());
        assert!(obstacles.obstacles().is_empty());
    }

    #[test]
    fn test_interval_policy_spawns() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut obstacles = manager(SpawnPolicy::Interval { ms: 1000 });
        obstacles.update(&mut rng, 500);
        assert!(obstacles.obstacles().is_empty());
        obstacles.update(&mut rng, 1000);
        assert_eq!(obstacles.obstacles().len(), 1);
        obstacles.update(&mut rng, 1500);
        assert_eq!(obstacles.obstacles().len(), 1);
        obstacles.update(&mut rng, 2000);
        assert_eq!(obstacles.obstacles().len(), 2);
    }

    #[test]
    fn test_skipped_time_keeps_earlier_progress() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut obstacles = manager(SpawnPolicy::Interval { ms: 1000 });
        obstacles.update(&mut rng, 900);
        // Five seconds away, then resume
        obstacles.skip_time(5000);
        obstacles.update(&mut rng, 5950);
        assert!(obstacles.obstacles().is_empty());
        obstacles.update(&mut rng, 6000);
        assert_eq!(obstacles.obstacles().len(), 1);
    }

    #[test]
    fn test_per_hand_policy_never_self_spawns() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut obstacles = manager(SpawnPolicy::PerHand);
        for t in 0..100 {
            obstacles.update(&mut rng, t * 1000);
        }
        assert!(obstacles.obstacles().is_empty());
    }
}
