//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Logical millisecond clock only
//! - Seeded RNG only
//! - Stable iteration order (pool and layout order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod formation;
pub mod geometry;
pub mod player;
pub mod projectile;
pub mod roving;
pub mod shield;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Impact, fly_formation_shot, fly_player_shot};
pub use formation::{AlienCell, CellHit, Formation, FormationEvent, FormationPhase, Tier};
pub use geometry::Aabb;
pub use player::{Player, PlayerVisual};
pub use projectile::{Burst, Color, Explosion, Owner, Projectile, ProjectileState};
pub use roving::{RovingEvent, RovingTarget};
pub use shield::{Hole, Shield};
pub use state::{Banner, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use timer::{Millis, Timer};
