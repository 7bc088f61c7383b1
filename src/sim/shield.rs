//! Destructible shields
//!
//! A shield is a fixed rectangle that accumulates circular holes. Holes are
//! kept in creation order and only disappear when the level resets.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::projectile::Projectile;
use super::timer::Millis;
use crate::consts::{SHIELD_EDGE_TOLERANCE, SHIELD_HOLE_TOLERANCE};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub center: Vec2,
    pub radius: f32,
}

impl Hole {
    /// Already-damaged area (rim tolerance excluded)
    fn swallows(&self, point: Vec2) -> bool {
        self.center.distance(point) < self.radius - SHIELD_HOLE_TOLERANCE
    }
}

#[derive(Debug, Clone)]
pub struct Shield {
    pub bounds: Aabb,
    holes: Vec<Hole>,
}

impl Shield {
    /// Shield of `width` x `height` centered on (`x`, `y`)
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            bounds: Aabb::centered(Vec2::new(x, y), width / 2.0, height / 2.0),
            holes: Vec::new(),
        }
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    /// Try to absorb a projectile at its current position.
    ///
    /// Outside the (slightly inflated) rectangle or inside an existing hole the
    /// shot passes through. Otherwise a hole is punched and the projectile is
    /// consumed without an explosion. Returns true when absorbed.
    pub fn shoot_shield<R: Rng>(&mut self, projectile: &mut Projectile, now: Millis, rng: &mut R) -> bool {
        let point = projectile.pos;
        if !self.bounds.inflate(SHIELD_EDGE_TOLERANCE).contains(point) {
            return false;
        }
        if self.holes.iter().any(|hole| hole.swallows(point)) {
            return false;
        }
        self.holes.push(Hole {
            center: point,
            radius: projectile.hole_radius,
        });
        projectile.explode(None, now, rng);
        true
    }

    /// Remove all damage
    pub fn repair(&mut self) {
        self.holes.clear();
    }
}
