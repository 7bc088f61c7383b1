//! Roving bonus target
//!
//! Patrols across the top of the arena on its own timer, independent of the
//! formation. Parks off-screen for a random wait between passes, alternating
//! the edge it enters from.

use glam::Vec2;
use rand::Rng;

use super::geometry::Aabb;
use super::timer::{Millis, Timer};
use crate::config::{ArenaConfig, RovingConfig};
use crate::consts::{ROVING_HALF_HEIGHT, ROVING_HALF_WIDTH};

/// What one roving-target tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RovingEvent {
    Waiting,
    Entered,
    Moved,
    Exited,
    /// Play is frozen; the timer was not re-armed
    Halted,
}

#[derive(Debug, Clone)]
pub struct RovingTarget {
    pub pos: Vec2,
    /// -1.0 (leftward) or 1.0 (rightward)
    pub direction: f32,
    pub active: bool,
    pub wait_ms: Millis,
    pub last_stop: Millis,
    pub timer: Timer,
    tuning: RovingConfig,
    park_x: f32,
}

impl RovingTarget {
    /// Parked at the right edge, heading left
    pub fn new<R: Rng>(tuning: RovingConfig, arena: &ArenaConfig, now: Millis, rng: &mut R) -> Self {
        let park_x = arena.half_width + tuning.park_margin;
        Self {
            pos: Vec2::new(park_x, arena.half_height - tuning.top_inset),
            direction: -1.0,
            active: false,
            wait_ms: random_wait(&tuning, rng),
            last_stop: now,
            timer: Timer::after(now, 0),
            tuning,
            park_x,
        }
    }

    pub fn tick<R: Rng>(&mut self, now: Millis, frozen: bool, rng: &mut R) -> RovingEvent {
        if frozen {
            return RovingEvent::Halted;
        }

        let event = if self.active {
            self.pos.x += self.direction * self.tuning.speed;
            if self.pos.x <= -self.park_x || self.pos.x >= self.park_x {
                self.stop(now, rng);
                RovingEvent::Exited
            } else {
                RovingEvent::Moved
            }
        } else if now.saturating_sub(self.last_stop) > self.wait_ms {
            self.active = true;
            self.pos.x += self.direction;
            RovingEvent::Entered
        } else {
            RovingEvent::Waiting
        };

        self.timer.schedule(now, self.tuning.tick_ms);
        event
    }

    /// Shoot the target down. Returns where it was, or `None` if it was parked.
    pub fn hit<R: Rng>(&mut self, now: Millis, rng: &mut R) -> Option<Vec2> {
        if !self.active {
            return None;
        }
        let at = self.pos;
        self.stop(now, rng);
        Some(at)
    }

    pub fn hit_box(&self) -> Aabb {
        Aabb::centered(self.pos, ROVING_HALF_WIDTH, ROVING_HALF_HEIGHT)
    }

    /// Park on the edge it was heading for, facing inward, and roll a new wait.
    /// The next pass therefore enters from the opposite edge to the last one.
    fn stop<R: Rng>(&mut self, now: Millis, rng: &mut R) {
        self.active = false;
        let side = if self.direction >= 0.0 { 1.0 } else { -1.0 };
        self.pos.x = side * self.park_x;
        self.direction = -side;
        self.wait_ms = random_wait(&self.tuning, rng);
        self.last_stop = now;
    }
}

fn random_wait<R: Rng>(tuning: &RovingConfig, rng: &mut R) -> Millis {
    let (lo, hi) = tuning.wait_secs;
    rng.random_range(lo..=hi.max(lo)) * 1000
}
