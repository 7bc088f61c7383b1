//! The player's ship

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::projectile::{Color, Owner, Projectile, first_available};
use super::timer::Millis;
use crate::UP;
use crate::config::{ArenaConfig, PlayerConfig, ProjectileConfig};
use crate::consts::{PLAYER_HIT_ABOVE, PLAYER_HIT_BELOW, PLAYER_HIT_HALF_WIDTH, PLAYER_OVERRUN_PROBE};
use crate::error::FireError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerVisual {
    Intact,
    Destroyed,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub lives: u32,
    pub cooldown_ms: Millis,
    pub last_fire: Option<Millis>,
    pub projectiles: Vec<Projectile>,
    pub visual: PlayerVisual,
    config: PlayerConfig,
    arena: ArenaConfig,
}

impl Player {
    pub fn new(config: PlayerConfig, lives: u32, arena: ArenaConfig, projectile: ProjectileConfig) -> Self {
        let projectiles = (0..config.bullets)
            .map(|_| Projectile::new(Owner::Player, Color::Yellow, projectile.player_hole_radius, projectile))
            .collect();
        Self {
            pos: config.start,
            lives,
            cooldown_ms: config.cooldown_ms,
            last_fire: None,
            projectiles,
            visual: PlayerVisual::Intact,
            config,
            arena,
        }
    }

    /// One step left unless frozen or at the edge
    pub fn move_left(&mut self, frozen: bool) -> bool {
        if frozen || self.pos.x <= -self.arena.half_width + self.config.edge_margin {
            return false;
        }
        self.pos.x -= self.config.step;
        true
    }

    /// One step right unless frozen or at the edge
    pub fn move_right(&mut self, frozen: bool) -> bool {
        if frozen || self.pos.x >= self.arena.half_width - self.config.edge_margin {
            return false;
        }
        self.pos.x += self.config.step;
        true
    }

    /// Launch the first idle shot straight up
    pub fn fire(&mut self, now: Millis, frozen: bool) -> Result<(), FireError> {
        if frozen {
            return Err(FireError::Frozen);
        }
        if self
            .last_fire
            .is_some_and(|last| now.saturating_sub(last) < self.cooldown_ms)
        {
            return Err(FireError::CoolingDown);
        }
        let origin = self.pos + Vec2::new(0.0, self.config.muzzle_offset);
        let shot = first_available(&mut self.projectiles).ok_or(FireError::ResourceUnavailable)?;
        shot.launch(origin, UP, now, frozen)?;
        self.last_fire = Some(now);
        Ok(())
    }

    /// Tighten the fire cooldown for a new level, never below the floor
    pub fn shrink_cooldown(&mut self) {
        self.cooldown_ms = self
            .cooldown_ms
            .saturating_sub(self.config.cooldown_step_ms)
            .max(self.config.min_cooldown_ms);
    }

    pub fn recenter(&mut self) {
        self.pos.x = self.config.start.x;
    }

    /// Lose a life (never below zero). Returns lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Area where a formation shot counts as a hit
    pub fn hit_box(&self) -> Aabb {
        Aabb::new(
            self.pos - Vec2::new(PLAYER_HIT_HALF_WIDTH, PLAYER_HIT_BELOW),
            self.pos + Vec2::new(PLAYER_HIT_HALF_WIDTH, PLAYER_HIT_ABOVE),
        )
    }

    /// Point the formation must cover to overrun the player
    pub fn overrun_probe(&self) -> Vec2 {
        self.pos + Vec2::new(0.0, PLAYER_OVERRUN_PROBE)
    }

    /// Park every shot far below the arena
    pub fn reset_projectiles(&mut self) {
        let park = Vec2::new(0.0, -self.arena.half_height - 150.0);
        for p in &mut self.projectiles {
            p.reset(park);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(
            PlayerConfig::default(),
            5,
            ArenaConfig::default(),
            ProjectileConfig::default(),
        )
    }

    #[test]
    fn test_moves_within_edges() {
        let mut p = player();
        assert!(p.move_right(false));
        assert_eq!(p.pos.x, 20.0);
        p.pos.x = 475.0;
        assert!(!p.move_right(false));
        p.pos.x = -475.0;
        assert!(!p.move_left(false));
        assert!(!p.move_right(true));
    }

    #[test]
    fn test_fire_cooldown_and_pool() {
        let mut p = player();
        assert_eq!(p.fire(0, false), Ok(()));
        assert_eq!(p.projectiles[0].pos, Vec2::new(0.0, -255.0));
        assert_eq!(p.fire(500, false), Err(FireError::CoolingDown));
        assert_eq!(p.fire(1000, false), Ok(()));
        assert_eq!(p.fire(2000, false), Ok(()));
        assert_eq!(p.fire(3000, false), Err(FireError::ResourceUnavailable));
        assert_eq!(p.fire(4000, true), Err(FireError::Frozen));
        assert_eq!(p.last_fire, Some(2000));
    }

    #[test]
    fn test_cooldown_floor() {
        let mut p = player();
        p.shrink_cooldown();
        assert_eq!(p.cooldown_ms, 950);
        for _ in 0..10 {
            p.shrink_cooldown();
        }
        assert_eq!(p.cooldown_ms, 850);
    }

    #[test]
    fn test_hit_box_is_asymmetric() {
        let p = player();
        assert!(p.hit_box().contains(Vec2::new(23.0, -305.0)));
        assert!(p.hit_box().contains(Vec2::new(-23.0, -255.0)));
        assert!(!p.hit_box().contains(Vec2::new(0.0, -254.0)));
        assert_eq!(p.overrun_probe(), Vec2::new(0.0, -260.0));
    }

    #[test]
    fn test_lives_never_negative() {
        let mut p = player();
        p.lives = 1;
        assert_eq!(p.lose_life(), 0);
        assert_eq!(p.lose_life(), 0);
    }
}
