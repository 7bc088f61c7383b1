//! Game state and session bookkeeping
//!
//! The session owns every entity by composition. Cross-entity queries go
//! through this struct instead of any shared global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::formation::{Formation, Tier};
use super::player::Player;
use super::roving::RovingTarget;
use super::shield::Shield;
use super::timer::{Millis, Timer};
use crate::config::SessionConfig;
use crate::highscores::PlayerName;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Level cleared, banner up, waiting to restart
    LevelTransition,
    GameOver,
}

/// Transient full-screen text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    Level(u32),
    GameOver,
}

/// Things that happened during a tick (audio/UI hooks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CellDestroyed { tier: Tier, at: Vec2 },
    RovingTargetHit { at: Vec2 },
    PlayerHit { lives_left: u32 },
    ShieldDamaged,
    LevelCleared { level: u32 },
    LevelStarted { level: u32 },
    GameOver { score: u64, high_score: u64 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SessionConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Logical clock
    pub now: Millis,
    pub score: u64,
    pub high_score: u64,
    /// Current level (1-based)
    pub level: u32,
    pub phase: GamePhase,
    /// Set while a level transition or game over holds play still
    pub frozen: bool,
    pub player_name: Option<PlayerName>,
    pub banner: Option<Banner>,
    pub formation: Formation,
    pub player: Player,
    pub shields: Vec<Shield>,
    pub roving: RovingTarget,
    /// Session checkup callback
    pub checkup: Timer,
    /// Pending restart after a level banner
    pub level_start: Timer,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a level-1 session with the given seed
    pub fn new(config: SessionConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let now = 0;
        let arena = config.arena;
        let shields = config
            .shields
            .xs
            .iter()
            .map(|&x| Shield::new(x, config.shields.y, config.shields.width, config.shields.height))
            .collect();

        Self {
            seed,
            now,
            score: 0,
            high_score: 0,
            level: 1,
            phase: GamePhase::Playing,
            frozen: false,
            player_name: None,
            banner: None,
            formation: Formation::new(config.formation.clone(), arena, config.projectile, now),
            player: Player::new(config.player.clone(), config.lives, arena, config.projectile),
            shields,
            roving: RovingTarget::new(config.roving, &arena, now, &mut rng),
            checkup: Timer::after(now, 0),
            level_start: Timer::idle(),
            events: Vec::new(),
            rng,
            config,
        }
    }

    pub fn lives(&self) -> u32 {
        self.player.lives
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Add points, raising the high score alongside
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
