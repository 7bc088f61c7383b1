//! Flight steps and hit resolution
//!
//! Targets are checked in a fixed priority per owner and the first hit ends
//! the step. Player shots: formation cell, roving target, shields. Formation
//! shots: player, shields.

use glam::Vec2;
use rand::Rng;

use super::formation::{CellHit, Formation};
use super::geometry::Aabb;
use super::projectile::{Burst, Flight, Projectile};
use super::roving::RovingTarget;
use super::shield::Shield;
use super::timer::Millis;
use crate::config::ArenaConfig;

/// Result of one flight step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Impact {
    /// Still flying; next step scheduled
    Miss,
    /// Left the arena and despawned silently
    OutOfBounds,
    Cell(CellHit),
    /// Roving target destroyed at this position
    RovingTarget(Vec2),
    Player,
    Shield,
}

/// Advance a player shot one step and resolve what it hits
pub fn fly_player_shot<R: Rng>(
    shot: &mut Projectile,
    formation: &mut Formation,
    roving: &mut RovingTarget,
    shields: &mut [Shield],
    arena: &ArenaConfig,
    now: Millis,
    rng: &mut R,
) -> Impact {
    let pos = match shot.advance(arena) {
        Flight::At(pos) => pos,
        Flight::OutOfBounds => {
            shot.explode(None, now, rng);
            return Impact::OutOfBounds;
        }
    };

    if let Some(hit) = formation.shoot_cell(pos) {
        shot.explode(Some(Burst::cell(hit.tier.color(), hit.at)), now, rng);
        return Impact::Cell(hit);
    }

    if roving.active && roving.hit_box().contains(pos) {
        if let Some(at) = roving.hit(now, rng) {
            shot.explode(Some(Burst::roving(at)), now, rng);
            return Impact::RovingTarget(at);
        }
    }

    if absorb(shot, shields, now, rng) {
        return Impact::Shield;
    }

    shot.keep_flying(now);
    Impact::Miss
}

/// Advance a formation shot one step and resolve what it hits
pub fn fly_formation_shot<R: Rng>(
    shot: &mut Projectile,
    player_box: Aabb,
    shields: &mut [Shield],
    arena: &ArenaConfig,
    now: Millis,
    rng: &mut R,
) -> Impact {
    let pos = match shot.advance(arena) {
        Flight::At(pos) => pos,
        Flight::OutOfBounds => {
            shot.explode(None, now, rng);
            return Impact::OutOfBounds;
        }
    };

    if player_box.contains(pos) {
        shot.explode(Some(Burst::player_hit()), now, rng);
        return Impact::Player;
    }

    if absorb(shot, shields, now, rng) {
        return Impact::Shield;
    }

    shot.keep_flying(now);
    Impact::Miss
}

fn absorb<R: Rng>(shot: &mut Projectile, shields: &mut [Shield], now: Millis, rng: &mut R) -> bool {
    shields.iter_mut().any(|shield| shield.shoot_shield(shot, now, rng))
}
