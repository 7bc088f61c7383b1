//! Central simulation loop
//!
//! One logical millisecond at a time, due timers run in a fixed order:
//! formation, player shots, formation shots, roving target, session checkup,
//! pending level start. Entities may still read positions that another
//! callback updates later in the same millisecond; the checkup's overlap test
//! backs up the shots' own player test for that reason.

use super::collision::{Impact, fly_formation_shot, fly_player_shot};
use super::formation::{FormationContext, FormationEvent};
use super::projectile::{Burst, ProjectileState};
use super::roving::RovingTarget;
use super::state::{Banner, GameEvent, GamePhase, GameState};
use super::timer::Millis;
use crate::consts::ROVING_POINTS;

/// Input events for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

/// Apply input once, then advance the clock by `dt_ms`
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: Millis) {
    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    apply_input(state, &input);

    for _ in 0..dt_ms {
        state.now += 1;
        step(state);
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let frozen = state.frozen;
    if input.move_left {
        state.player.move_left(frozen);
    }
    if input.move_right {
        state.player.move_right(frozen);
    }
    if input.fire {
        // Cooldown, empty pool and frozen play are all silent skips
        let _ = state.player.fire(state.now, frozen);
    }
}

/// Steer under the lowest cell and fire when lined up
fn autopilot(state: &GameState, input: &mut TickInput) {
    if state.frozen {
        return;
    }
    let Some(target) = state.formation.lowest_cell() else {
        return;
    };
    let target_x = target.x;
    let player_x = state.player.pos.x;

    let slack = state.config.player.step / 2.0;
    if target_x < player_x - slack {
        input.move_left = true;
    } else if target_x > player_x + slack {
        input.move_right = true;
    } else {
        input.fire = true;
    }
}

/// Run every callback due at `state.now`
fn step(state: &mut GameState) {
    let now = state.now;

    if state.formation.timer.fire(now) {
        let ctx = FormationContext {
            player_pos: state.player.pos,
            frozen: state.frozen,
        };
        // Halted needs nothing: only a level transition or game over freezes play
        if state.formation.tick(ctx, now, &mut state.rng) == FormationEvent::Cleared {
            begin_level_transition(state);
        }
    }

    step_player_shots(state);
    step_formation_shots(state);

    if state.roving.timer.fire(now) {
        state.roving.tick(now, state.frozen, &mut state.rng);
    }

    if state.checkup.fire(now) {
        checkup(state);
    }

    if state.level_start.fire(now) {
        start_level(state);
    }
}

fn step_player_shots(state: &mut GameState) {
    let now = state.now;
    let frozen = state.frozen;
    let mut impacts = Vec::new();

    for shot in state.player.projectiles.iter_mut() {
        if !shot.timer.fire(now) {
            continue;
        }
        match shot.state() {
            ProjectileState::Flying if !frozen => impacts.push(fly_player_shot(
                shot,
                &mut state.formation,
                &mut state.roving,
                &mut state.shields,
                &state.config.arena,
                now,
                &mut state.rng,
            )),
            ProjectileState::Exploding => shot.explosion_step(now, &mut state.rng),
            _ => {}
        }
    }

    for impact in impacts {
        apply_impact(state, impact);
    }
}

fn step_formation_shots(state: &mut GameState) {
    let now = state.now;
    let frozen = state.frozen;
    let player_box = state.player.hit_box();
    let mut impacts = Vec::new();

    for shot in state.formation.projectiles.iter_mut() {
        if !shot.timer.fire(now) {
            continue;
        }
        match shot.state() {
            ProjectileState::Flying if !frozen => impacts.push(fly_formation_shot(
                shot,
                player_box,
                &mut state.shields,
                &state.config.arena,
                now,
                &mut state.rng,
            )),
            ProjectileState::Exploding => shot.explosion_step(now, &mut state.rng),
            _ => {}
        }
    }

    for impact in impacts {
        apply_impact(state, impact);
    }
}

fn apply_impact(state: &mut GameState, impact: Impact) {
    match impact {
        Impact::Cell(hit) => {
            state.add_score(hit.tier.points());
            state.push_event(GameEvent::CellDestroyed {
                tier: hit.tier,
                at: hit.at,
            });
        }
        Impact::RovingTarget(at) => {
            state.add_score(ROVING_POINTS);
            state.push_event(GameEvent::RovingTargetHit { at });
        }
        Impact::Player => player_hit(state),
        Impact::Shield => state.push_event(GameEvent::ShieldDamaged),
        Impact::Miss | Impact::OutOfBounds => {}
    }
}

fn player_hit(state: &mut GameState) {
    let lives_left = state.player.lose_life();
    state.push_event(GameEvent::PlayerHit { lives_left });
}

/// Session checkup: loss, stray hits, level clear
fn checkup(state: &mut GameState) {
    if state.frozen {
        return;
    }
    let now = state.now;

    let overrun = state.formation.hit_test(state.player.overrun_probe()).is_some();
    if state.player.lives == 0 || overrun {
        end_game(state);
        return;
    }

    let player_box = state.player.hit_box();
    let mut hits = 0;
    for shot in state.formation.projectiles.iter_mut() {
        if shot.is_flying()
            && player_box.contains(shot.pos)
            && shot.explode(Some(Burst::player_hit()), now, &mut state.rng)
        {
            hits += 1;
        }
    }
    for _ in 0..hits {
        player_hit(state);
    }

    if state.formation.is_empty() {
        begin_level_transition(state);
        return;
    }

    state.checkup.schedule(now, state.config.checkup_ms);
}

/// Freeze play and put up the next level's banner
fn begin_level_transition(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let cleared = state.level;
    state.level += 1;
    state.phase = GamePhase::LevelTransition;
    state.frozen = true;
    state.banner = Some(Banner::Level(state.level));
    state.level_start.schedule(state.now, state.config.level_banner_ms);
    state.push_event(GameEvent::LevelCleared { level: cleared });
    log::info!("Level {} cleared, score {}", cleared, state.score);
}

/// Reset the arena and resume play at the current level
fn start_level(state: &mut GameState) {
    if state.phase != GamePhase::LevelTransition {
        return;
    }
    let now = state.now;

    state.player.reset_projectiles();
    state.formation.reset_projectiles();
    for shield in &mut state.shields {
        shield.repair();
    }

    state.frozen = false;
    state.phase = GamePhase::Playing;
    state.banner = None;
    state.roving = RovingTarget::new(state.config.roving, &state.config.arena, now, &mut state.rng);
    state.formation.restart(state.level, now);
    state.player.recenter();
    state.player.shrink_cooldown();
    state.checkup.schedule(now, 0);

    state.push_event(GameEvent::LevelStarted { level: state.level });
    log::info!("Level {} started", state.level);
}

/// Freeze permanently and report the final score
fn end_game(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.frozen = true;
    state.player.visual = super::player::PlayerVisual::Destroyed;
    state.player.lives = 0;
    state.banner = Some(Banner::GameOver);
    state.push_event(GameEvent::GameOver {
        score: state.score,
        high_score: state.high_score,
    });
    log::info!(
        "Game over at level {}: score {}, high score {}",
        state.level,
        state.score,
        state.high_score
    );
}
