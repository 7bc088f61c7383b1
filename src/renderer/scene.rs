//! Read-only snapshot of everything on screen
//!
//! Built fresh from the game state whenever a front-end wants to draw. Nothing
//! here feeds back into the simulation.

use glam::Vec2;
use serde::Serialize;

use super::shapes::{ROVING_TAG, alien_tag, banner_text, player_tag, rgba};
use crate::sim::geometry::Aabb;
use crate::sim::projectile::{Owner, Projectile};
use crate::sim::shield::Hole;
use crate::sim::state::GameState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub tag: String,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotView {
    pub owner: Owner,
    pub pos: Vec2,
    pub color: [f32; 4],
}

/// One explosion ring as currently drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingView {
    pub center: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShieldView {
    pub bounds: Aabb,
    /// Creation order
    pub holes: Vec<Hole>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    pub level: u32,
    pub player_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub sprites: Vec<Sprite>,
    pub projectiles: Vec<ShotView>,
    pub explosions: Vec<RingView>,
    pub shields: Vec<ShieldView>,
    pub hud: Hud,
    pub banner: Option<String>,
}

impl Scene {
    pub fn capture(state: &GameState) -> Self {
        let formation = &state.formation;
        let frame = formation.frame();

        let mut sprites: Vec<Sprite> = formation
            .cells()
            .iter()
            .filter(|cell| cell.alive)
            .map(|cell| Sprite {
                tag: alien_tag(cell.tier, frame),
                pos: formation.world_pos(cell),
            })
            .collect();
        sprites.push(Sprite {
            tag: player_tag(state.player.visual).to_string(),
            pos: state.player.pos,
        });
        if state.roving.active {
            sprites.push(Sprite {
                tag: ROVING_TAG.to_string(),
                pos: state.roving.pos,
            });
        }

        let pools = || state.player.projectiles.iter().chain(formation.projectiles.iter());

        Self {
            sprites,
            projectiles: pools().filter(|p| p.is_flying()).map(shot_view).collect(),
            explosions: pools().filter_map(ring_view).collect(),
            shields: state
                .shields
                .iter()
                .map(|shield| ShieldView {
                    bounds: shield.bounds,
                    holes: shield.holes().to_vec(),
                })
                .collect(),
            hud: Hud {
                score: state.score,
                high_score: state.high_score,
                lives: state.lives(),
                level: state.level,
                player_name: state.player_name.as_ref().map(|n| n.to_string()),
            },
            banner: state.banner.map(banner_text),
        }
    }

    /// Sprites carrying `tag`
    pub fn count(&self, tag: &str) -> usize {
        self.sprites.iter().filter(|s| s.tag == tag).count()
    }
}

fn shot_view(p: &Projectile) -> ShotView {
    ShotView {
        owner: p.owner,
        pos: p.pos,
        color: rgba(p.color),
    }
}

fn ring_view(p: &Projectile) -> Option<RingView> {
    let explosion = p.explosion()?;
    let (radius, color) = explosion.shown?;
    Some(RingView {
        center: explosion.center,
        radius,
        color: rgba(color),
    })
}
