//! Session configuration
//!
//! Fixed when a session is constructed. Loaded from JSON on native; every
//! section falls back to the classic arcade tuning when omitted.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::timer::Millis;

/// Logical arena, origin centered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub half_width: f32,
    pub half_height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_width: 500.0,
            half_height: 350.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start: Vec2,
    /// Distance covered by one move event
    pub step: f32,
    /// Closest the player may get to a side edge
    pub edge_margin: f32,
    pub bullets: usize,
    pub cooldown_ms: Millis,
    /// Cooldown removed on every new level
    pub cooldown_step_ms: Millis,
    pub min_cooldown_ms: Millis,
    /// Shots leave this far above the player
    pub muzzle_offset: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(0.0, -275.0),
            step: 20.0,
            edge_margin: 25.0,
            bullets: 3,
            cooldown_ms: 1000,
            cooldown_step_ms: 50,
            min_cooldown_ms: 850,
            muzzle_offset: 20.0,
        }
    }
}

/// One column of the formation layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub x: f32,
    pub tier: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub start_offset: Vec2,
    pub rows: usize,
    pub row_spacing: f32,
    /// Columns in creation order (order decides ties for the lowest cell)
    pub columns: Vec<ColumnConfig>,
    /// Horizontal distance per sprite frame flip
    pub frame_wait: f32,
    pub move_speed: f32,
    pub speed_step: f32,
    pub tick_interval_ms: Millis,
    pub min_tick_interval_ms: Millis,
    pub descent_limit: i32,
    pub descent_step: f32,
    /// Distance from the side edge where the formation turns
    pub boundary_inset: f32,
    /// Vertical gap to the player that triggers a charge
    pub charge_threshold: f32,
    pub bullets: usize,
    pub hole_radius: f32,
    pub fire_cooldown_ms: Millis,
    /// Level from which an extra shot is added and cooldown shrinks
    pub extra_bullet_level: u32,
    pub extra_hole_radius: f32,
    pub fire_cooldown_cut_ms: Millis,
    /// Levels in (min, max] deepen the descent by one notch each
    pub deeper_descent_levels: (u32, u32),
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            start_offset: Vec2::new(105.0, -20.0),
            rows: 6,
            row_spacing: 55.0,
            columns: vec![
                ColumnConfig { x: -110.0, tier: 1 },
                ColumnConfig { x: -185.0, tier: 1 },
                ColumnConfig { x: -35.0, tier: 2 },
                ColumnConfig { x: 35.0, tier: 2 },
                ColumnConfig { x: 110.0, tier: 3 },
                ColumnConfig { x: 185.0, tier: 3 },
            ],
            frame_wait: 10.0,
            move_speed: 1.0,
            speed_step: 1.0 / 15.0,
            tick_interval_ms: 10,
            min_tick_interval_ms: 5,
            descent_limit: 6,
            descent_step: 5.0,
            boundary_inset: 230.0,
            charge_threshold: 20.0,
            bullets: 2,
            hole_radius: 16.0,
            fire_cooldown_ms: 1000,
            extra_bullet_level: 7,
            extra_hole_radius: 20.0,
            fire_cooldown_cut_ms: 900,
            deeper_descent_levels: (5, 10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Distance per flight step
    pub step: f32,
    pub flight_wait_ms: Millis,
    pub explosion_wait_ms: Millis,
    pub explosion_start_radius: f32,
    /// Shield hole left by a player shot
    pub player_hole_radius: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            step: 10.0,
            flight_wait_ms: 30,
            explosion_wait_ms: 12,
            explosion_start_radius: 5.0,
            player_hole_radius: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RovingConfig {
    pub speed: f32,
    pub tick_ms: Millis,
    /// Wait between passes, whole seconds, inclusive
    pub wait_secs: (u64, u64),
    /// Flight line measured down from the arena top
    pub top_inset: f32,
    /// Parking distance beyond the side edge
    pub park_margin: f32,
}

impl Default for RovingConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            tick_ms: 5,
            wait_secs: (5, 30),
            top_inset: 25.0,
            park_margin: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldConfig {
    pub xs: Vec<f32>,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            xs: vec![-300.0, 0.0, 300.0],
            y: -200.0,
            width: 100.0,
            height: 60.0,
        }
    }
}

/// Complete session tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub lives: u32,
    pub checkup_ms: Millis,
    pub level_banner_ms: Millis,
    pub arena: ArenaConfig,
    pub player: PlayerConfig,
    pub formation: FormationConfig,
    pub projectile: ProjectileConfig,
    pub roving: RovingConfig,
    pub shields: ShieldConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lives: 5,
            checkup_ms: 8,
            level_banner_ms: 2500,
            arena: ArenaConfig::default(),
            player: PlayerConfig::default(),
            formation: FormationConfig::default(),
            projectile: ProjectileConfig::default(),
            roving: RovingConfig::default(),
            shields: ShieldConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&json)?;
        log::info!("Loaded session config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load a JSON config file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default session config ({})", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "lives": 3, "formation": { "bullets": 0 } }"#).unwrap();
        assert_eq!(config.lives, 3);
        assert_eq!(config.formation.bullets, 0);
        assert_eq!(config.formation.columns.len(), 6);
        assert_eq!(config.player.bullets, 3);
        assert_eq!(config.arena, ArenaConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = SessionConfig::load_or_default("/nonexistent/space-invaders.json");
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_default_layout_is_six_by_six() {
        let config = SessionConfig::default();
        assert_eq!(config.formation.rows * config.formation.columns.len(), 36);
        assert!(config.formation.columns.iter().all(|c| (1..=3).contains(&c.tier)));
    }
}
