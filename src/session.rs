//! A game session wired to its high score store

use crate::config::SessionConfig;
use crate::error::NameError;
use crate::highscores::{HighScoreStore, PlayerName};
use crate::renderer::Scene;
use crate::sim::state::{GameEvent, GameState};
use crate::sim::tick::{TickInput, tick};
use crate::sim::timer::Millis;

pub struct Session<S: HighScoreStore> {
    state: GameState,
    store: S,
}

impl<S: HighScoreStore> Session<S> {
    /// Validate the name, load its high score and start level 1.
    ///
    /// A too-long name is rejected before anything is created. Store failures
    /// are logged and the session starts from a zero high score.
    pub fn start(
        config: SessionConfig,
        name: &str,
        clear_high_score: bool,
        store: S,
        seed: u64,
    ) -> Result<Self, NameError> {
        let player_name = PlayerName::parse(name)?;
        let mut state = GameState::new(config, seed);

        if let Some(name) = &player_name {
            if !clear_high_score {
                state.high_score = match store.load_high_score(name) {
                    Ok(score) => score,
                    Err(e) => {
                        log::warn!("Cannot load high score for {}: {}", name, e);
                        0
                    }
                };
            }
        }
        state.player_name = player_name;

        log::info!(
            "Session started: player {}, high score {}, seed {}",
            state.player_name.as_ref().map_or("<anonymous>", |n| n.as_str()),
            state.high_score,
            seed
        );
        Ok(Self { state, store })
    }

    /// Advance play by `dt_ms` and return what happened
    pub fn advance(&mut self, input: &TickInput, dt_ms: Millis) -> Vec<GameEvent> {
        tick(&mut self.state, input, dt_ms);
        let events = self.state.drain_events();
        if events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })) {
            self.persist_high_score();
        }
        events
    }

    fn persist_high_score(&mut self) {
        let Some(name) = &self.state.player_name else {
            return;
        };
        if let Err(e) = self.store.save_high_score(name, self.state.high_score) {
            log::warn!("Cannot save high score for {}: {}", name, e);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scene(&self) -> Scene {
        Scene::capture(&self.state)
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::highscores::MemoryStore;

    fn seeded_store(name: &str, score: u64) -> MemoryStore {
        let mut store = MemoryStore::new();
        let name = PlayerName::parse(name).unwrap().unwrap();
        store.save_high_score(&name, score).unwrap();
        store
    }

    fn lose_now<S: HighScoreStore>(session: &mut Session<S>) -> Vec<GameEvent> {
        session.state_mut().player.lives = 0;
        session.advance(&TickInput::default(), 16)
    }

    #[test]
    fn test_loads_high_score_for_name() {
        let session =
            Session::start(SessionConfig::default(), "Ann", false, seeded_store("ann", 900), 1).unwrap();
        assert_eq!(session.state().high_score, 900);
    }

    #[test]
    fn test_clear_high_score_ignores_stored_value() {
        let session =
            Session::start(SessionConfig::default(), "ann", true, seeded_store("ann", 900), 1).unwrap();
        assert_eq!(session.state().high_score, 0);
    }

    #[test]
    fn test_long_name_rejected() {
        let result = Session::start(
            SessionConfig::default(),
            "a_very_long_player_name",
            false,
            MemoryStore::new(),
            1,
        );
        assert!(matches!(result, Err(NameError::TooLong { len: 23, max: 15 })));
    }

    #[test]
    fn test_game_over_saves_high_score() {
        let mut session =
            Session::start(SessionConfig::default(), "ann", false, seeded_store("ann", 40), 1).unwrap();
        session.state_mut().add_score(70);
        let events = lose_now(&mut session);
        assert!(events.contains(&GameEvent::GameOver { score: 70, high_score: 70 }));
        let name = PlayerName::parse("ANN").unwrap().unwrap();
        assert_eq!(session.store().load_high_score(&name).unwrap(), 70);
    }

    #[test]
    fn test_anonymous_session_never_saves() {
        let mut session = Session::start(SessionConfig::default(), "", false, MemoryStore::new(), 1).unwrap();
        session.state_mut().add_score(30);
        lose_now(&mut session);
        assert!(session.is_over());
        assert!(session.state().player_name.is_none());
    }

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load_high_score(&self, _: &PlayerName) -> Result<u64, StoreError> {
            Err(std::io::Error::other("disk gone").into())
        }

        fn save_high_score(&mut self, _: &PlayerName, _: u64) -> Result<(), StoreError> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    #[test]
    fn test_store_failures_do_not_stop_play() {
        let mut session = Session::start(SessionConfig::default(), "ann", false, BrokenStore, 1).unwrap();
        assert_eq!(session.state().high_score, 0);
        let events = lose_now(&mut session);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    }
}
