//! Projectiles and their explosion animation
//!
//! Lifecycle: `Idle -> Flying -> Exploding -> Idle`. A projectile lives in its
//! owner's pool for the whole session and is reusable exactly when idle.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::timer::{Millis, Timer};
use crate::config::{ArenaConfig, ProjectileConfig};
use crate::error::LaunchError;

/// Palette shared with the render collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Lime,
    HotPink,
    Blue,
    DarkGrey,
    DarkOrange,
    Gold,
}

/// Who fired the shot (decides which targets it can hit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Formation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    Idle,
    Flying,
    Exploding,
}

/// Explosion parameters for a specific kind of hit
#[derive(Debug, Clone, PartialEq)]
pub struct Burst {
    pub colors: Vec<Color>,
    pub max_radius: f32,
    pub growth: f32,
    /// Explosion center; the projectile position when `None`
    pub at: Option<Vec2>,
}

impl Burst {
    /// Alien cell destroyed
    pub fn cell(tier_color: Color, at: Vec2) -> Self {
        Self {
            colors: vec![Color::Red, tier_color],
            max_radius: 40.0,
            growth: 5.0,
            at: Some(at),
        }
    }

    /// Roving target shot down
    pub fn roving(at: Vec2) -> Self {
        Self {
            colors: vec![
                Color::Blue,
                Color::Blue,
                Color::Blue,
                Color::DarkGrey,
                Color::DarkGrey,
            ],
            max_radius: 50.0,
            growth: 7.0,
            at: Some(at),
        }
    }

    /// Player struck by a formation shot
    pub fn player_hit() -> Self {
        Self {
            colors: vec![Color::Red, Color::DarkOrange, Color::Gold],
            max_radius: 30.0,
            growth: 5.0,
            at: None,
        }
    }
}

/// Running explosion animation
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub center: Vec2,
    pub colors: Vec<Color>,
    pub max_radius: f32,
    pub growth: f32,
    /// Radius drawn on the next step
    pub size: f32,
    /// What is on screen right now
    pub shown: Option<(f32, Color)>,
}

/// Outcome of one flight step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flight {
    At(Vec2),
    OutOfBounds,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub owner: Owner,
    pub color: Color,
    pub pos: Vec2,
    pub heading: Vec2,
    /// Radius of the hole this shot punches into a shield
    pub hole_radius: f32,
    pub timer: Timer,
    state: ProjectileState,
    explosion: Option<Explosion>,
    tuning: ProjectileConfig,
}

impl Projectile {
    pub fn new(owner: Owner, color: Color, hole_radius: f32, tuning: ProjectileConfig) -> Self {
        Self {
            owner,
            color,
            pos: Vec2::ZERO,
            heading: Vec2::ZERO,
            hole_radius,
            timer: Timer::idle(),
            state: ProjectileState::Idle,
            explosion: None,
            tuning,
        }
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    /// Idle projectiles are free for reuse
    pub fn is_available(&self) -> bool {
        self.state == ProjectileState::Idle
    }

    pub fn is_flying(&self) -> bool {
        self.state == ProjectileState::Flying
    }

    pub fn explosion(&self) -> Option<&Explosion> {
        self.explosion.as_ref()
    }

    /// Start a flight from `origin`; the first step runs on the current millisecond
    pub fn launch(
        &mut self,
        origin: Vec2,
        heading: Vec2,
        now: Millis,
        frozen: bool,
    ) -> Result<(), LaunchError> {
        if frozen {
            return Err(LaunchError::Frozen);
        }
        if self.state != ProjectileState::Idle {
            return Err(LaunchError::NotIdle);
        }
        self.pos = origin;
        self.heading = heading.normalize_or_zero();
        self.state = ProjectileState::Flying;
        self.timer.schedule(now, 0);
        Ok(())
    }

    /// Move one step along the heading
    pub fn advance(&mut self, arena: &ArenaConfig) -> Flight {
        self.pos += self.heading * self.tuning.step;
        if self.pos.y < -arena.half_height || self.pos.y > arena.half_height {
            Flight::OutOfBounds
        } else {
            Flight::At(self.pos)
        }
    }

    /// Schedule the next flight step
    pub fn keep_flying(&mut self, now: Millis) {
        self.timer.schedule(now, self.tuning.flight_wait_ms);
    }

    /// End the flight. Without a burst the shot is silently consumed.
    ///
    /// Returns false when the projectile was not flying (a flight explodes at most once).
    pub fn explode<R: Rng>(&mut self, burst: Option<Burst>, now: Millis, rng: &mut R) -> bool {
        if self.state != ProjectileState::Flying {
            return false;
        }
        self.state = ProjectileState::Exploding;
        self.explosion = Some(match burst {
            Some(burst) => Explosion {
                center: burst.at.unwrap_or(self.pos),
                colors: burst.colors,
                max_radius: burst.max_radius,
                growth: burst.growth,
                size: self.tuning.explosion_start_radius,
                shown: None,
            },
            None => Explosion {
                center: self.pos,
                colors: Vec::new(),
                max_radius: f32::NEG_INFINITY,
                growth: 0.0,
                size: self.tuning.explosion_start_radius,
                shown: None,
            },
        });
        self.explosion_step(now, rng);
        true
    }

    /// Draw the next ring, or finish once the maximum radius is passed
    pub fn explosion_step<R: Rng>(&mut self, now: Millis, rng: &mut R) {
        let Some(explosion) = self.explosion.as_mut() else {
            return;
        };
        if explosion.size > explosion.max_radius || explosion.colors.is_empty() {
            self.explosion = None;
            self.state = ProjectileState::Idle;
            self.timer.clear();
            return;
        }
        let color = explosion.colors[rng.random_range(0..explosion.colors.len())];
        explosion.shown = Some((explosion.size, color));
        explosion.size += explosion.growth;
        self.timer.schedule(now, self.tuning.explosion_wait_ms);
    }

    /// Force back to idle at a parking spot (level reset)
    pub fn reset(&mut self, park: Vec2) {
        self.pos = park;
        self.state = ProjectileState::Idle;
        self.explosion = None;
        self.timer.clear();
    }
}

/// First idle projectile in a pool
pub fn first_available(pool: &mut [Projectile]) -> Option<&mut Projectile> {
    pool.iter_mut().find(|p| p.is_available())
}
