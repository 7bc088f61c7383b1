//! Visual tags and colors for scene primitives

use crate::sim::formation::Tier;
use crate::sim::player::PlayerVisual;
use crate::sim::projectile::Color;
use crate::sim::state::Banner;

/// Linear RGBA for a palette color
pub fn rgba(color: Color) -> [f32; 4] {
    let (r, g, b) = match color {
        Color::Red => (1.0, 0.0, 0.0),
        Color::Yellow => (1.0, 1.0, 0.0),
        Color::Lime => (0.0, 1.0, 0.0),
        Color::HotPink => (1.0, 0.41, 0.71),
        Color::Blue => (0.0, 0.0, 1.0),
        Color::DarkGrey => (0.66, 0.66, 0.66),
        Color::DarkOrange => (1.0, 0.55, 0.0),
        Color::Gold => (1.0, 0.84, 0.0),
    };
    [r, g, b, 1.0]
}

/// Registered sprite name for an alien cell
pub fn alien_tag(tier: Tier, frame: u8) -> String {
    format!("alien_{}_frame_{}", tier.number(), frame)
}

pub fn player_tag(visual: PlayerVisual) -> &'static str {
    match visual {
        PlayerVisual::Intact => "player",
        PlayerVisual::Destroyed => "broken_player",
    }
}

pub const ROVING_TAG: &str = "spaceship";

pub fn banner_text(banner: Banner) -> String {
    match banner {
        Banner::Level(level) => format!("Level {}", level),
        Banner::GameOver => "Game Over!".to_string(),
    }
}
