//! Rendering collaborator boundary
//!
//! The core produces an immutable [`Scene`] of visual tags and primitives.
//! Drawing them is up to the front-end.

pub mod scene;
pub mod shapes;

pub use scene::{Hud, RingView, Scene, ShieldView, ShotView, Sprite};
