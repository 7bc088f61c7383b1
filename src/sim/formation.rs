//! Alien formation state machine
//!
//! All cells share one offset, direction and descent counter. Each tick the
//! formation either advances sideways, drops a notch at a boundary, reverses
//! after enough drops, or charges the player once it has come low enough.
//!
//! Charging reverses once, steps, then re-aims at the player from the lowest
//! cell, so the direction is assigned twice on that tick. The descent counter
//! then holds [`CHARGE_SENTINEL`] until the next restart: boundaries no longer
//! turn or lower the formation and it keeps sweeping in the pursuit direction.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::projectile::{Color, Owner, Projectile};
use super::timer::{Millis, Timer};
use crate::DOWN;
use crate::config::{ArenaConfig, FormationConfig, ProjectileConfig};
use crate::consts::{CELL_HALF_HEIGHT, CELL_HALF_WIDTH, CELL_POINTS};
use crate::error::FireError;

/// Descent counter value held after a charge
pub const CHARGE_SENTINEL: i32 = -1;

/// Cosmetic/scoring category of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Tier::One),
            2 => Some(Tier::Two),
            3 => Some(Tier::Three),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Three => 3,
        }
    }

    /// Same for every tier
    pub fn points(&self) -> u64 {
        CELL_POINTS
    }

    /// Second color of this tier's explosion
    pub fn color(&self) -> Color {
        match self {
            Tier::One => Color::Lime,
            Tier::Two => Color::Yellow,
            Tier::Three => Color::HotPink,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlienCell {
    /// Position relative to the formation offset
    pub offset: Vec2,
    pub tier: Tier,
    pub alive: bool,
}

/// Movement taken on the most recent tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormationPhase {
    Advancing,
    Descending,
    Reversing,
    Charging,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormationEvent {
    Advanced,
    Descended,
    Reversed,
    /// `reversed` is the direction right after the entry flip, `pursuit` the
    /// direction chosen toward the player
    Charged { reversed: f32, pursuit: f32 },
    /// No cells left; the timer was not re-armed
    Cleared,
    /// Play is frozen; the timer was not re-armed
    Halted,
}

/// What the formation needs to know about the rest of the session
#[derive(Debug, Clone, Copy)]
pub struct FormationContext {
    pub player_pos: Vec2,
    pub frozen: bool,
}

/// Cell removed by a hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellHit {
    pub tier: Tier,
    /// World position of the destroyed cell
    pub at: Vec2,
}

#[derive(Debug, Clone)]
pub struct Formation {
    cells: Vec<AlienCell>,
    pub offset: Vec2,
    /// -1.0 (leftward) or 1.0 (rightward)
    pub direction: f32,
    pub descent_counter: i32,
    pub descent_limit: i32,
    pub move_speed: f32,
    pub tick_interval_ms: Millis,
    pub fire_cooldown_ms: Millis,
    pub last_fire: Option<Millis>,
    pub projectiles: Vec<Projectile>,
    pub phase: FormationPhase,
    /// Charges taken since the last restart
    pub charges: u32,
    pub timer: Timer,
    config: FormationConfig,
    arena: ArenaConfig,
    projectile: ProjectileConfig,
}

impl Formation {
    /// Fresh level-1 formation, ticking from `now`
    pub fn new(
        config: FormationConfig,
        arena: ArenaConfig,
        projectile: ProjectileConfig,
        now: Millis,
    ) -> Self {
        let mut formation = Self {
            cells: layout(&config),
            offset: config.start_offset,
            direction: -1.0,
            descent_counter: 0,
            descent_limit: config.descent_limit,
            move_speed: config.move_speed,
            tick_interval_ms: config.tick_interval_ms,
            fire_cooldown_ms: config.fire_cooldown_ms,
            last_fire: None,
            projectiles: Vec::new(),
            phase: FormationPhase::Advancing,
            charges: 0,
            timer: Timer::after(now, 0),
            config,
            arena,
            projectile,
        };
        formation.refill_pool();
        formation
    }

    /// Rebuild the layout for `level`, keeping the pace reached so far
    pub fn restart(&mut self, level: u32, now: Millis) {
        self.cells = layout(&self.config);
        self.offset = self.config.start_offset;
        self.direction = -1.0;
        self.descent_counter = 0;
        self.fire_cooldown_ms = self.config.fire_cooldown_ms;
        self.last_fire = None;
        self.phase = FormationPhase::Advancing;
        self.charges = 0;
        self.refill_pool();
        self.update_level(level);
        self.timer.schedule(now, 0);
    }

    /// Apply one step of the difficulty ramp
    fn update_level(&mut self, level: u32) {
        let config = &self.config;
        if self.tick_interval_ms > config.min_tick_interval_ms {
            self.tick_interval_ms -= 1;
            self.move_speed += config.speed_step;
        }
        if level >= config.extra_bullet_level {
            self.projectiles.push(Projectile::new(
                Owner::Formation,
                Color::Red,
                config.extra_hole_radius,
                self.projectile,
            ));
            self.fire_cooldown_ms = self.fire_cooldown_ms.saturating_sub(config.fire_cooldown_cut_ms);
        }
        let (lo, hi) = config.deeper_descent_levels;
        if lo < level && level <= hi {
            self.descent_limit += 1;
        }
        log::info!(
            "Formation level {}: tick {}ms, speed {:.3}, descents {}, shots {}, cooldown {}ms",
            level,
            self.tick_interval_ms,
            self.move_speed,
            self.descent_limit,
            self.projectiles.len(),
            self.fire_cooldown_ms
        );
    }

    fn refill_pool(&mut self) {
        self.projectiles = (0..self.config.bullets)
            .map(|_| Projectile::new(Owner::Formation, Color::Red, self.config.hole_radius, self.projectile))
            .collect();
    }

    pub fn cells(&self) -> &[AlienCell] {
        &self.cells
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.alive_count() == 0
    }

    pub fn world_pos(&self, cell: &AlienCell) -> Vec2 {
        self.offset + cell.offset
    }

    /// Sprite frame (1 or 2), flips every `frame_wait` of horizontal travel
    pub fn frame(&self) -> u8 {
        let step = (self.offset.x / self.config.frame_wait).floor() as i64;
        step.rem_euclid(2) as u8 + 1
    }

    /// World position of the cell closest to the player (first in layout order on ties)
    pub fn lowest_cell(&self) -> Option<Vec2> {
        let mut lowest: Option<&AlienCell> = None;
        for cell in self.cells.iter().filter(|c| c.alive) {
            if lowest.is_none_or(|l| cell.offset.y < l.offset.y) {
                lowest = Some(cell);
            }
        }
        lowest.map(|cell| self.world_pos(cell))
    }

    /// Offset has entered either side's turning zone
    pub fn at_boundary(&self) -> bool {
        let edge = self.arena.half_width - self.config.boundary_inset;
        self.offset.x < -edge || self.offset.x > edge
    }

    /// Index of the first alive cell whose hit box contains `point`
    pub fn hit_test(&self, point: Vec2) -> Option<usize> {
        self.cells.iter().position(|cell| {
            cell.alive
                && Aabb::centered(self.world_pos(cell), CELL_HALF_WIDTH, CELL_HALF_HEIGHT).contains(point)
        })
    }

    /// Destroy the cell at `point`, if any
    pub fn shoot_cell(&mut self, point: Vec2) -> Option<CellHit> {
        let index = self.hit_test(point)?;
        let at = self.world_pos(&self.cells[index]);
        let cell = &mut self.cells[index];
        cell.alive = false;
        let hit = CellHit { tier: cell.tier, at };
        self.cells.retain(|c| c.alive);
        Some(hit)
    }

    /// One scheduled update
    pub fn tick<R: Rng>(&mut self, ctx: FormationContext, now: Millis, rng: &mut R) -> FormationEvent {
        if self.is_empty() {
            self.phase = FormationPhase::Cleared;
            return FormationEvent::Cleared;
        }
        if ctx.frozen {
            return FormationEvent::Halted;
        }

        let event = self.step(ctx.player_pos);

        if !self.is_empty() {
            // Cooldown and empty-pool skips are routine
            let _ = self.shoot(now, rng);
        }
        self.timer.schedule(now, self.tick_interval_ms);
        event
    }

    fn step(&mut self, player_pos: Vec2) -> FormationEvent {
        let Some(lowest) = self.lowest_cell() else {
            return FormationEvent::Cleared;
        };

        if self.descent_counter >= 0 && self.at_boundary() {
            if lowest.y - player_pos.y <= self.config.charge_threshold {
                return self.charge(player_pos);
            }
            if self.descent_counter < self.descent_limit {
                self.offset.y -= self.config.descent_step;
                self.descent_counter += 1;
                self.phase = FormationPhase::Descending;
                return FormationEvent::Descended;
            }
            self.direction = -self.direction;
            self.offset.x += self.move_speed * self.direction;
            self.descent_counter = 0;
            self.phase = FormationPhase::Reversing;
            log::debug!("Formation reversed at x={:.1}, y={:.1}", self.offset.x, self.offset.y);
            return FormationEvent::Reversed;
        }

        self.offset.x += self.move_speed * self.direction;
        self.phase = FormationPhase::Advancing;
        FormationEvent::Advanced
    }

    fn charge(&mut self, player_pos: Vec2) -> FormationEvent {
        self.direction = -self.direction;
        let reversed = self.direction;
        self.offset.x += self.move_speed * self.direction;
        self.descent_counter = CHARGE_SENTINEL;

        let lowest_x = self.lowest_cell().map_or(self.offset.x, |p| p.x);
        self.direction = if player_pos.x - lowest_x >= 0.0 { 1.0 } else { -1.0 };

        self.charges += 1;
        self.phase = FormationPhase::Charging;
        log::debug!(
            "Formation charging from x={:.1}: reversed {} then pursuing {}",
            self.offset.x,
            reversed,
            self.direction
        );
        FormationEvent::Charged {
            reversed,
            pursuit: self.direction,
        }
    }

    /// Fire from a random cell toward the player
    pub fn shoot<R: Rng>(&mut self, now: Millis, rng: &mut R) -> Result<(), FireError> {
        if self
            .last_fire
            .is_some_and(|last| now.saturating_sub(last) < self.fire_cooldown_ms)
        {
            return Err(FireError::CoolingDown);
        }
        let Some(slot) = self.projectiles.iter().position(|p| p.is_available()) else {
            return Err(FireError::ResourceUnavailable);
        };
        let alive: Vec<Vec2> = self
            .cells
            .iter()
            .filter(|c| c.alive)
            .map(|c| self.offset + c.offset)
            .collect();
        if alive.is_empty() {
            return Err(FireError::ResourceUnavailable);
        }
        let origin = alive[rng.random_range(0..alive.len())];
        self.projectiles[slot].launch(origin, DOWN, now, false)?;
        self.last_fire = Some(now);
        Ok(())
    }

    /// Park every shot far above the arena
    pub fn reset_projectiles(&mut self) {
        let park = Vec2::new(0.0, self.arena.half_height + 150.0);
        for p in &mut self.projectiles {
            p.reset(park);
        }
    }
}

/// Rows bottom to top, columns in configured order
fn layout(config: &FormationConfig) -> Vec<AlienCell> {
    let mut cells = Vec::with_capacity(config.rows * config.columns.len());
    for row in 0..config.rows {
        for column in &config.columns {
            let Some(tier) = Tier::from_number(column.tier) else {
                log::warn!("Skipping formation column with invalid tier {}", column.tier);
                continue;
            };
            cells.push(AlienCell {
                offset: Vec2::new(column.x, row as f32 * config.row_spacing),
                tier,
                alive: true,
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn formation() -> Formation {
        Formation::new(
            FormationConfig::default(),
            ArenaConfig::default(),
            ProjectileConfig::default(),
            0,
        )
    }

    fn far_below() -> FormationContext {
        FormationContext {
            player_pos: Vec2::new(0.0, -10_000.0),
            frozen: false,
        }
    }

    #[test]
    fn test_layout() {
        let f = formation();
        assert_eq!(f.alive_count(), 36);
        assert_eq!(f.cells().iter().filter(|c| c.tier == Tier::Two).count(), 12);
        assert_eq!(f.lowest_cell(), Some(Vec2::new(-5.0, -20.0)));
        assert_eq!(f.projectiles.len(), 2);
    }

    #[test]
    fn test_full_cycle_mirrors_and_resets_counter() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut f = formation();
        let mut now = 0;
        let mut descents = Vec::new();
        let mut reversed_at = None;

        while descents.len() < 7 {
            let event = f.tick(far_below(), now, &mut rng);
            now += f.tick_interval_ms;
            match event {
                FormationEvent::Descended => descents.push(f.offset.x),
                FormationEvent::Reversed => {
                    assert_eq!(descents.len(), 6);
                    assert_eq!(f.descent_counter, 0);
                    assert_eq!(f.direction, 1.0);
                    reversed_at = Some(f.offset.x);
                }
                FormationEvent::Advanced => {}
                other => panic!("unexpected {:?}", other),
            }
        }

        assert!(descents[..6].iter().all(|&x| x == -271.0));
        assert_eq!(reversed_at, Some(-270.0));
        assert_eq!(descents[6], 271.0);
        assert_eq!(f.offset.y, -20.0 - 7.0 * 5.0);
    }

    #[test]
    fn test_empty_formation_clears_without_shooting() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut f = formation();
        let points: Vec<Vec2> = f.cells().iter().map(|c| f.world_pos(c)).collect();
        for p in points {
            assert!(f.shoot_cell(p).is_some());
        }
        assert!(f.is_empty());
        assert!(f.timer.fire(0));

        assert_eq!(f.tick(far_below(), 0, &mut rng), FormationEvent::Cleared);
        assert_eq!(f.phase, FormationPhase::Cleared);
        assert!(f.projectiles.iter().all(|p| p.is_available()));
        assert!(!f.timer.is_armed());
    }

    #[test]
    fn test_frozen_halts_in_place() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut f = formation();
        let ctx = FormationContext {
            frozen: true,
            ..far_below()
        };
        assert!(f.timer.fire(0));
        assert_eq!(f.tick(ctx, 0, &mut rng), FormationEvent::Halted);
        assert_eq!(f.offset, Vec2::new(105.0, -20.0));
        assert!(!f.timer.is_armed());
    }

    #[test]
    fn test_charge_flips_twice_toward_player() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut f = formation();
        f.offset = Vec2::new(280.0, -255.0);
        f.direction = 1.0;
        f.descent_counter = 3;
        let ctx = FormationContext {
            player_pos: Vec2::new(0.0, -275.0),
            frozen: false,
        };

        let event = f.tick(ctx, 0, &mut rng);
        assert_eq!(event, FormationEvent::Charged { reversed: -1.0, pursuit: -1.0 });
        assert_eq!(f.offset.x, 279.0);
        assert_eq!(f.descent_counter, CHARGE_SENTINEL);
        assert_eq!(f.phase, FormationPhase::Charging);

        // Still inside the turning zone: the sentinel suppresses a second charge
        for _ in 0..9 {
            assert_eq!(f.tick(ctx, 0, &mut rng), FormationEvent::Advanced);
        }
        assert_eq!(f.offset.x, 270.0);
        assert_eq!(f.descent_counter, CHARGE_SENTINEL);
        assert_eq!(f.charges, 1);
    }

    #[test]
    fn test_no_second_charge_across_later_boundaries() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut f = formation();
        f.offset = Vec2::new(280.0, -255.0);
        f.direction = 1.0;
        let ctx = FormationContext {
            player_pos: Vec2::new(0.0, -275.0),
            frozen: false,
        };
        assert!(matches!(f.tick(ctx, 0, &mut rng), FormationEvent::Charged { .. }));

        // Sweeps out of the right zone, across the arena and through the left
        // zone, still within the charge threshold the whole way
        let mut entered_left_zone = false;
        for _ in 0..1000 {
            assert_eq!(f.tick(ctx, 0, &mut rng), FormationEvent::Advanced);
            entered_left_zone |= f.at_boundary() && f.offset.x < 0.0;
        }
        assert!(entered_left_zone);
        assert_eq!(f.offset, Vec2::new(279.0 - 1000.0, -255.0));
        assert_eq!(f.descent_counter, CHARGE_SENTINEL);
        assert_eq!(f.direction, -1.0);
        assert_eq!(f.charges, 1);

        // Restart clears the sentinel
        f.restart(2, 0);
        assert_eq!(f.descent_counter, 0);
        assert_eq!(f.charges, 0);
    }

    #[test]
    fn test_charge_pursues_player_on_far_side() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut f = formation();
        f.offset = Vec2::new(280.0, -260.0);
        f.direction = 1.0;
        let ctx = FormationContext {
            player_pos: Vec2::new(400.0, -275.0),
            frozen: false,
        };
        // Lowest cell ends at 279 - 110 = 169, player is ahead of it
        assert_eq!(
            f.tick(ctx, 0, &mut rng),
            FormationEvent::Charged { reversed: -1.0, pursuit: 1.0 }
        );
    }

    #[test]
    fn test_shoot_cooldown_and_pool() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut f = formation();
        assert_eq!(f.shoot(0, &mut rng), Ok(()));
        assert_eq!(f.shoot(999, &mut rng), Err(FireError::CoolingDown));
        assert_eq!(f.shoot(1000, &mut rng), Ok(()));
        assert_eq!(f.shoot(2000, &mut rng), Err(FireError::ResourceUnavailable));
        assert_eq!(f.last_fire, Some(1000));

        let shot = &f.projectiles[0];
        assert_eq!(shot.heading, Vec2::NEG_Y);
        assert!(f.cells().iter().any(|c| f.world_pos(c) == shot.pos));
    }

    #[test]
    fn test_shoot_cell_evicts() {
        let mut f = formation();
        let hit = f.shoot_cell(Vec2::new(-5.0 + 30.0, -20.0 + 20.0)).unwrap();
        assert_eq!(hit, CellHit { tier: Tier::One, at: Vec2::new(-5.0, -20.0) });
        assert_eq!(hit.tier.points(), 10);
        assert_eq!(f.alive_count(), 35);
        assert_eq!(f.cells().len(), 35);
        // Gap between columns -110 and -35 (world -5 and 70)
        assert_eq!(f.hit_test(Vec2::new(32.0, -20.0)), None);
    }

    #[test]
    fn test_restart_ramps_difficulty() {
        let mut f = formation();
        for level in 2..=7 {
            f.restart(level, 0);
        }
        assert_eq!(f.tick_interval_ms, 5);
        assert!((f.move_speed - (1.0 + 5.0 / 15.0)).abs() < 1e-5);
        assert_eq!(f.descent_limit, 8);
        assert_eq!(f.projectiles.len(), 3);
        assert_eq!(f.projectiles[2].hole_radius, 20.0);
        assert_eq!(f.fire_cooldown_ms, 100);
        assert_eq!(f.alive_count(), 36);
        assert_eq!(f.offset, Vec2::new(105.0, -20.0));
    }

    #[test]
    fn test_frame_alternates() {
        let mut f = formation();
        f.offset.x = 105.0;
        assert_eq!(f.frame(), 1);
        f.offset.x = 110.0;
        assert_eq!(f.frame(), 2);
        f.offset.x = -5.0;
        assert_eq!(f.frame(), 2);
    }
}
