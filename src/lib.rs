//! Space Invaders - a timer-driven arcade simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, projectiles, shields, session)
//! - `renderer`: Read-only scene snapshots for an external front-end
//! - `highscores`: Per-player high score persistence boundary
//! - `session`: Game state wired to its persistence collaborator
//! - `config`: Construction-time tuning

pub mod config;
pub mod error;
pub mod highscores;
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::SessionConfig;
pub use error::{ConfigError, FireError, LaunchError, NameError, StoreError};
pub use highscores::{HighScoreStore, JsonFileStore, MemoryStore, PlayerName};
pub use session::Session;

use glam::Vec2;

/// Tuned geometry constants (hit boxes and tolerances match sprite extents)
pub mod consts {
    /// Half extents of an alien cell hit box
    pub const CELL_HALF_WIDTH: f32 = 30.5;
    pub const CELL_HALF_HEIGHT: f32 = 24.0;

    /// Half extents of the roving target hit box
    pub const ROVING_HALF_WIDTH: f32 = 50.0;
    pub const ROVING_HALF_HEIGHT: f32 = 20.0;

    /// Player hit box, relative to the player position
    pub const PLAYER_HIT_HALF_WIDTH: f32 = 23.0;
    pub const PLAYER_HIT_BELOW: f32 = 30.0;
    pub const PLAYER_HIT_ABOVE: f32 = 20.0;

    /// Height above the player probed for an overrunning formation
    pub const PLAYER_OVERRUN_PROBE: f32 = 15.0;

    /// Outward slack on the shield rectangle
    pub const SHIELD_EDGE_TOLERANCE: f32 = 3.0;
    /// A shot this far inside an existing hole's rim is ignored
    pub const SHIELD_HOLE_TOLERANCE: f32 = 4.0;

    /// Score for any alien cell
    pub const CELL_POINTS: u64 = 10;
    /// Score for the roving target
    pub const ROVING_POINTS: u64 = 100;

    /// Longest accepted player name
    pub const MAX_NAME_LEN: usize = 15;
}

/// Heading of shots fired by the player
pub const UP: Vec2 = Vec2::Y;
/// Heading of shots fired by the formation
pub const DOWN: Vec2 = Vec2::NEG_Y;

