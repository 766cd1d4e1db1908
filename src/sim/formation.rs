//! The enemy formation.
//!
//! Ships live in one flat list with a parallel list of spawn x positions;
//! the two are only ever pushed, removed and cleared together. Each row
//! keeps its own direction and movement strategy. An attacking ship leaves
//! its row's bookkeeping until it returns.

use std::ops::RangeInclusive;

use rand::Rng;

use super::geometry::Vec2;
use super::hooks::{emit, Cue, GameEvent, Outbox, Sprite};
use super::level::LevelPlan;
use super::pattern::{MovementPattern, RowSlot, StepParams};
use super::projectile::Projectiles;
use super::ship::{
    EnemyLevel, EnemyShip, EntityId, EntityKind, IdSource, Mode, ShipKind, SHIP_HEIGHT,
    SHIP_WIDTH,
};
use crate::error::{GalagaError, Result};

pub const FORMATION_SPEED: f32 = 2.0;
/// Margin kept from each side wall before a row turns around.
pub const MAX_DISTANCE: f32 = 40.0;
pub const ATTACK_SPEED: f32 = 4.0;
pub const ATTACK_FIRE_CHANCE: f64 = 0.02;
pub const ATTACK_DELAY_MS: RangeInclusive<u64> = 5_000..=15_000;

/// Movement ticks between cosmetic frame swaps.
const FRAME_TICKS: u32 = 10;
/// Horizontal gap a returning ship keeps from its row mates.
const SLOT_GAP: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationState {
    Initializing,
    Active,
    Cleared,
    /// Frozen after the game ended.
    Halted,
}

#[derive(Debug, Clone, Copy)]
struct RowState {
    moving_right: bool,
    flips: u32,
}

pub struct Formation {
    ships: Vec<EnemyShip>,
    origins: Vec<f32>,
    rows: Vec<RowState>,
    patterns: Vec<Box<dyn MovementPattern>>,
    width: f32,
    height: f32,
    speed: f32,
    max_distance: f32,
    fire_counter: u32,
    fire_interval: RangeInclusive<u32>,
    anim_ticks: u32,
    next_attack_ms: Option<u64>,
    state: FormationState,
    ids: IdSource,
    events: Outbox,
}

impl Formation {
    pub fn new(width: f32, height: f32, events: Outbox) -> Self {
        Self {
            ships: Vec::new(),
            origins: Vec::new(),
            rows: Vec::new(),
            patterns: Vec::new(),
            width,
            height,
            speed: FORMATION_SPEED,
            max_distance: MAX_DISTANCE,
            fire_counter: 0,
            fire_interval: 1..=1,
            anim_ticks: 0,
            next_attack_ms: None,
            state: FormationState::Initializing,
            ids: IdSource::new(EntityKind::Ship(ShipKind::Enemy)),
            events,
        }
    }

    /// Lay out a fresh set of rows from `plan`. Row `r` holds enemies of
    /// level `r + 1`, evenly spaced across the canvas.
    pub fn initialize(&mut self, plan: &LevelPlan) -> Result<()> {
        let rows = plan.ships_per_row.len();
        if plan.row_anchors.len() != rows || plan.patterns.len() != rows {
            return Err(GalagaError::InvalidConfig(format!(
                "level plan has {} rows, {} anchors and {} patterns",
                rows,
                plan.row_anchors.len(),
                plan.patterns.len()
            )));
        }
        if plan.fire_interval.is_empty() {
            return Err(GalagaError::InvalidConfig(
                "empty enemy fire interval".to_string(),
            ));
        }

        self.ships.clear();
        self.origins.clear();
        self.rows.clear();
        self.patterns.clear();

        for (row, (&count, &anchor_y)) in plan
            .ships_per_row
            .iter()
            .zip(plan.row_anchors.iter())
            .enumerate()
        {
            let tag = u8::try_from(row + 1).unwrap_or(u8::MAX);
            let level = EnemyLevel::try_from(tag)?;
            let n = count as f32;
            let spacing = (self.width - n * SHIP_WIDTH) / (n + 1.0);
            for i in 0..count {
                let x = spacing + i as f32 * (SHIP_WIDTH + spacing);
                self.ships
                    .push(EnemyShip::new(self.ids.next_id(), level, row, x, anchor_y));
                self.origins.push(x);
            }
            self.rows.push(RowState {
                moving_right: true,
                flips: 0,
            });
        }
        self.patterns = plan.patterns.iter().map(|p| p.build()).collect();
        self.fire_interval = plan.fire_interval.clone();
        self.fire_counter = 0;
        self.anim_ticks = 0;
        self.next_attack_ms = None;
        self.state = FormationState::Active;
        debug_assert_eq!(self.ships.len(), self.origins.len());

        tracing::debug!(
            tier = plan.tier,
            ships = self.ships.len(),
            rows,
            "formation initialized"
        );
        if self.ships.is_empty() {
            self.mark_cleared();
        }
        Ok(())
    }

    /// One enemy-move tick: bounce and step every row, then roll for fire.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        projectiles: &mut Projectiles,
        can_fire: bool,
    ) {
        if self.state != FormationState::Active {
            return;
        }
        self.anim_ticks = self.anim_ticks.wrapping_add(1);
        let swap_frames = self.anim_ticks % FRAME_TICKS == 0;
        let floor = (self.height - SHIP_HEIGHT).max(0.0);
        let right_wall = (self.width - SHIP_WIDTH).max(0.0);

        let Self {
            ships,
            origins,
            rows,
            patterns,
            width,
            speed,
            max_distance,
            ..
        } = self;

        for (index, (row, pattern)) in rows.iter_mut().zip(patterns.iter_mut()).enumerate() {
            let mut slots: Vec<RowSlot<'_>> = ships
                .iter_mut()
                .zip(origins.iter())
                .filter(|(ship, _)| ship.row == index && !ship.is_attacking())
                .map(|(ship, &origin_x)| RowSlot { ship, origin_x })
                .collect();
            if slots.is_empty() {
                continue;
            }

            let left = slots
                .iter()
                .map(|s| s.ship.body.x)
                .fold(f32::INFINITY, f32::min);
            let right = slots
                .iter()
                .map(|s| s.ship.body.x + s.ship.body.width)
                .fold(f32::NEG_INFINITY, f32::max);
            if row.moving_right && right >= *width - *max_distance {
                row.moving_right = false;
                row.flips += 1;
            } else if !row.moving_right && left <= *max_distance {
                row.moving_right = true;
                row.flips += 1;
            }

            let params = StepParams {
                moving_right: row.moving_right,
                speed: *speed,
                max_distance: *max_distance,
            };
            let mut sync = |ship: &mut EnemyShip| {
                ship.body.x = ship.body.x.clamp(0.0, right_wall);
                ship.body.y = ship.body.y.clamp(0.0, floor);
            };
            let mut toggle = |ship: &mut EnemyShip| {
                if swap_frames && ship.level.has_second_frame() {
                    ship.frame = ship.frame.toggled();
                }
            };
            pattern.apply(&mut slots, params, &mut sync, &mut toggle);
        }

        self.roll_fire(rng, projectiles, can_fire);
    }

    fn roll_fire<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        projectiles: &mut Projectiles,
        can_fire: bool,
    ) {
        self.fire_counter = self.fire_counter.wrapping_add(1);
        if self.ships.is_empty() || self.fire_counter < *self.fire_interval.start() {
            return;
        }
        let interval = rng.gen_range(self.fire_interval.clone()).max(1);
        if self.fire_counter % interval != 0 {
            return;
        }
        let shooter = &self.ships[rng.gen_range(0..self.ships.len())];
        if !can_fire || !shooter.level.is_shooter() {
            return;
        }
        projectiles.fire_enemy(shooter.muzzle());
        emit(&self.events, GameEvent::Cue(Cue::EnemyShoot));
    }

    /// Destroy every ship hit by a player bullet. Walks back to front so
    /// removal never skips a ship.
    pub fn resolve_hits(&mut self, projectiles: &mut Projectiles) -> usize {
        let mut destroyed = 0;
        for index in (0..self.ships.len()).rev() {
            if projectiles.check_collision(self.ships[index].bounds(), ShipKind::Enemy) {
                self.destroy(index);
                destroyed += 1;
            }
        }
        if self.ships.is_empty() && self.state == FormationState::Active {
            self.mark_cleared();
        }
        destroyed
    }

    fn destroy(&mut self, index: usize) -> EnemyShip {
        let ship = self.ships.remove(index);
        self.origins.remove(index);
        debug_assert_eq!(self.ships.len(), self.origins.len());
        emit(
            &self.events,
            GameEvent::Removed {
                sprite: ship.sprite(),
                explode: true,
            },
        );
        emit(&self.events, GameEvent::Cue(Cue::EnemyBlowUp));
        emit(&self.events, GameEvent::Scored(ship.level.points()));
        tracing::debug!(serial = ship.id.serial, level = ship.level.value(), "enemy destroyed");
        ship
    }

    fn mark_cleared(&mut self) {
        self.state = FormationState::Cleared;
        self.next_attack_ms = None;
        emit(&self.events, GameEvent::FormationCleared);
        tracing::info!("formation cleared");
    }

    /// Attack-run driver: schedule and launch breakoffs, move the ships
    /// already attacking, and bring home the ones that left the canvas.
    pub fn attack_tick<R: Rng + ?Sized>(
        &mut self,
        now_ms: u64,
        target: Option<Vec2>,
        projectiles: &mut Projectiles,
        rng: &mut R,
        can_fire: bool,
    ) {
        if self.state != FormationState::Active {
            return;
        }
        match self.next_attack_ms {
            None => self.next_attack_ms = Some(now_ms + rng.gen_range(ATTACK_DELAY_MS)),
            Some(at) if now_ms >= at => {
                if let Some(target) = target {
                    self.launch_attack(target, rng);
                }
                self.next_attack_ms = Some(now_ms + rng.gen_range(ATTACK_DELAY_MS));
            }
            Some(_) => {}
        }

        let (width, height) = (self.width, self.height);
        let mut returning = Vec::new();
        for (index, ship) in self.ships.iter_mut().enumerate() {
            let Mode::Breakoff { velocity } = ship.mode else {
                continue;
            };
            ship.body.velocity = velocity;
            ship.body.advance();
            if ship.body.is_outside(width, height) {
                returning.push(index);
                continue;
            }
            if let Some(target) = target {
                if can_fire && rng.gen_bool(ATTACK_FIRE_CHANCE) {
                    projectiles.fire_aimed(ship.muzzle(), target);
                    emit(&self.events, GameEvent::Cue(Cue::EnemyShoot));
                }
            }
        }
        for index in returning {
            self.return_to_row(index);
        }
    }

    /// Send one of the highest-level ships still in formation toward
    /// `target`. Returns the attacker, if any qualified.
    pub fn launch_attack<R: Rng + ?Sized>(&mut self, target: Vec2, rng: &mut R) -> Option<EntityId> {
        let top = self.ships.iter().map(|s| s.level).max()?;
        let candidates: Vec<usize> = self
            .ships
            .iter()
            .enumerate()
            .filter(|(_, s)| s.level == top && !s.is_attacking())
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let ship = &mut self.ships[candidates[rng.gen_range(0..candidates.len())]];
        let center = ship.body.center();
        let velocity = Vec2::new(target.x - center.x, target.y - center.y)
            .scaled_to(ATTACK_SPEED)
            .unwrap_or(Vec2::new(0.0, ATTACK_SPEED));
        ship.mode = Mode::Breakoff { velocity };
        ship.body.velocity = velocity;
        tracing::debug!(serial = ship.id.serial, "attack run started");
        Some(ship.id)
    }

    fn return_to_row(&mut self, index: usize) {
        let row = self.ships[index].row;
        // Row mates have drifted from their origins; follow the same offset.
        let offset = self
            .ships
            .iter()
            .zip(self.origins.iter())
            .enumerate()
            .find(|(j, (s, _))| *j != index && s.row == row && !s.is_attacking())
            .map(|(_, (s, origin))| s.body.x - origin)
            .unwrap_or(0.0);
        let x = self.free_slot(row, index, self.origins[index] + offset);

        let ship = &mut self.ships[index];
        ship.body.x = x;
        ship.body.y = ship.base_y;
        ship.body.velocity = Vec2::default();
        ship.mode = Mode::InFormation;
        self.origins[index] = x - offset;
        tracing::debug!(serial = ship.id.serial, x, "attack run ended");
    }

    /// Nearest x to `desired` in `row` that keeps clear of the ships there.
    fn free_slot(&self, row: usize, index: usize, desired: f32) -> f32 {
        let lo = self.max_distance;
        let hi = (self.width - self.max_distance - SHIP_WIDTH).max(lo);
        let clear = |x: f32| {
            self.ships.iter().enumerate().all(|(j, s)| {
                j == index
                    || s.row != row
                    || s.is_attacking()
                    || (s.body.x - x).abs() >= SHIP_WIDTH + SLOT_GAP
            })
        };
        let start = desired.clamp(lo, hi);
        if clear(start) {
            return start;
        }
        let step = (SHIP_WIDTH + SLOT_GAP) / 2.0;
        let mut k = 1.0;
        while start - k * step >= lo || start + k * step <= hi {
            for x in [start - k * step, start + k * step] {
                if (lo..=hi).contains(&x) && clear(x) {
                    return x;
                }
            }
            k += 1.0;
        }
        start
    }

    pub fn ships(&self) -> &[EnemyShip] {
        &self.ships
    }

    pub fn origins(&self) -> &[f32] {
        &self.origins
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn state(&self) -> FormationState {
        self.state
    }

    pub fn row_moving_right(&self, row: usize) -> Option<bool> {
        self.rows.get(row).map(|r| r.moving_right)
    }

    /// Direction changes `row` has made since the level started.
    pub fn row_flips(&self, row: usize) -> Option<u32> {
        self.rows.get(row).map(|r| r.flips)
    }

    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        self.ships.iter().map(EnemyShip::sprite)
    }

    /// Freeze the formation: no more movement, fire or attack runs.
    pub fn halt_attacks(&mut self) {
        self.next_attack_ms = None;
        self.state = match self.state {
            FormationState::Active => FormationState::Halted,
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pattern::RowPattern;
    use crate::sim::projectile::{Owner, BULLET_WIDTH, ENEMY_BULLET_SPEED};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::mpsc;

    fn single_row(count: usize, pattern: RowPattern) -> LevelPlan {
        LevelPlan {
            tier: 1,
            ships_per_row: vec![count],
            row_anchors: vec![100.0],
            fire_interval: 4..=23,
            patterns: vec![pattern],
        }
    }

    fn setup(plan: &LevelPlan) -> (Formation, Projectiles, mpsc::Receiver<GameEvent>) {
        let (tx, rx) = mpsc::channel();
        let mut formation = Formation::new(640.0, 480.0, tx.clone());
        formation.initialize(plan).unwrap();
        (formation, Projectiles::new(640.0, 480.0, tx), rx)
    }

    fn shoot_at(projectiles: &mut Projectiles, ship: &EnemyShip) {
        let c = ship.body.center();
        projectiles.fire_player(Vec2::new(c.x, c.y + 6.0));
    }

    #[test]
    fn tier_one_layout_is_evenly_spaced() {
        let plan = LevelPlan::for_tier(1).unwrap();
        let (formation, _, _rx) = setup(&plan);
        assert_eq!(formation.len(), 14);
        assert_eq!(formation.origins().len(), formation.len());
        let bottom: Vec<_> = formation.ships().iter().filter(|s| s.row == 0).collect();
        assert_eq!(bottom.len(), 2);
        let spacing = (640.0 - 2.0 * 32.0) / 3.0;
        assert!((bottom[0].body.x - spacing).abs() < 1e-3);
        assert!((bottom[1].body.x - (2.0 * spacing + 32.0)).abs() < 1e-3);
        assert!(bottom.iter().all(|s| s.level == EnemyLevel::One && s.body.y == 260.0));
    }

    #[test]
    fn five_rows_are_rejected() {
        let plan = LevelPlan {
            ships_per_row: vec![1; 5],
            row_anchors: vec![10.0; 5],
            patterns: vec![RowPattern::Straight; 5],
            ..single_row(1, RowPattern::Straight)
        };
        let (tx, _rx) = mpsc::channel();
        let mut formation = Formation::new(640.0, 480.0, tx);
        assert!(matches!(
            formation.initialize(&plan),
            Err(GalagaError::UnsupportedEnemyLevel(5))
        ));
    }

    #[test]
    fn clearing_one_row_reports_once() {
        let (mut formation, mut projectiles, rx) = setup(&single_row(3, RowPattern::Straight));
        let ships: Vec<_> = formation.ships().to_vec();
        for ship in &ships {
            shoot_at(&mut projectiles, ship);
        }
        assert_eq!(formation.resolve_hits(&mut projectiles), 3);
        assert!(formation.is_empty());
        assert_eq!(formation.origins().len(), 0);
        assert_eq!(formation.state(), FormationState::Cleared);
        // A later pass with nothing left must not report again.
        formation.resolve_hits(&mut projectiles);

        let events: Vec<_> = rx.try_iter().collect();
        let cleared = events
            .iter()
            .filter(|e| matches!(e, GameEvent::FormationCleared))
            .count();
        let points: u32 = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Scored(p) => Some(*p),
                _ => None,
            })
            .sum();
        assert_eq!(cleared, 1);
        assert_eq!(points, 300);
    }

    #[test]
    fn origins_stay_in_lockstep_after_removal() {
        let (mut formation, mut projectiles, _rx) = setup(&single_row(4, RowPattern::Straight));
        let expected: Vec<f32> = formation.origins().to_vec();
        let middle = formation.ships()[1].clone();
        shoot_at(&mut projectiles, &middle);
        formation.resolve_hits(&mut projectiles);
        assert_eq!(formation.len(), 3);
        assert_eq!(formation.origins(), &[expected[0], expected[2], expected[3]]);
        assert!(formation.ships().iter().all(|s| s.id != middle.id));
    }

    #[test]
    fn rows_turn_only_at_the_margins() {
        let (mut formation, mut projectiles, _rx) = setup(&single_row(1, RowPattern::Straight));
        let mut rng = StdRng::seed_from_u64(42);
        let mut last = formation.row_moving_right(0).unwrap();
        let mut turns = 0;
        for _ in 0..1_000 {
            formation.advance(&mut rng, &mut projectiles, false);
            let now = formation.row_moving_right(0).unwrap();
            if now != last {
                turns += 1;
                let ship = &formation.ships()[0];
                if now {
                    assert!(ship.body.x <= MAX_DISTANCE + FORMATION_SPEED);
                } else {
                    assert!(ship.body.x + ship.body.width >= 640.0 - MAX_DISTANCE - FORMATION_SPEED);
                }
                last = now;
            }
        }
        // Travel between turns is 640 - 2*40 - 32 units at 2 per tick.
        let span = (640.0 - 2.0 * MAX_DISTANCE - SHIP_WIDTH) / FORMATION_SPEED;
        assert!(turns >= 1);
        assert!(turns as f32 <= 1_000.0 / span + 1.0);
        assert_eq!(formation.row_flips(0), Some(turns));
    }

    #[test]
    fn passive_rows_never_fire() {
        let plan = LevelPlan {
            fire_interval: 1..=1,
            ..single_row(5, RowPattern::Straight)
        };
        let (mut formation, mut projectiles, _rx) = setup(&plan);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            formation.advance(&mut rng, &mut projectiles, true);
        }
        assert_eq!(projectiles.count(Owner::Enemy), 0);
    }

    #[test]
    fn attack_run_returns_to_a_free_slot() {
        let plan = LevelPlan::for_tier(1).unwrap();
        let (mut formation, mut projectiles, _rx) = setup(&plan);
        let mut rng = StdRng::seed_from_u64(3);
        let target = Vec2::new(320.0, 450.0);
        let attacker = formation.launch_attack(target, &mut rng).unwrap();
        let ship = formation.ships().iter().find(|s| s.id == attacker).unwrap();
        assert_eq!(ship.level, EnemyLevel::Four);
        assert!(ship.is_attacking());

        let mut now = 0;
        for _ in 0..400 {
            now += 16;
            formation.attack_tick(now, Some(target), &mut projectiles, &mut rng, false);
            let ship = formation.ships().iter().find(|s| s.id == attacker).unwrap();
            if !ship.is_attacking() {
                break;
            }
        }
        let ship = formation.ships().iter().find(|s| s.id == attacker).unwrap();
        assert!(!ship.is_attacking());
        assert_eq!(ship.body.y, ship.base_y);
        for other in formation.ships() {
            if other.id != ship.id && other.row == ship.row {
                assert!((other.body.x - ship.body.x).abs() >= SHIP_WIDTH);
            }
        }
    }

    #[test]
    fn attack_run_fires_aimed_shots_and_keeps_lockstep() {
        let plan = LevelPlan::for_tier(1).unwrap();
        let (mut formation, mut projectiles, _rx) = setup(&plan);
        let mut rng = StdRng::seed_from_u64(5);
        let target = Vec2::new(320.0, 450.0);

        let mut now = 0;
        let mut shot = None;
        for _ in 0..5_000 {
            now += 16;
            if !formation.ships().iter().any(|s| s.is_attacking()) {
                formation.launch_attack(target, &mut rng);
            }
            formation.attack_tick(now, Some(target), &mut projectiles, &mut rng, true);
            assert_eq!(formation.origins().len(), formation.len());
            if let Some(p) = projectiles.iter().next() {
                shot = Some(p.clone());
                break;
            }
        }
        let shot = shot.expect("an attacker fired");
        assert_eq!(shot.owner, Owner::Enemy);
        let v = shot.body.velocity;
        assert!((v.length() - ENEMY_BULLET_SPEED).abs() < 1e-4);
        let muzzle = Vec2::new(shot.body.x + BULLET_WIDTH / 2.0, shot.body.y);
        let aim = Vec2::new(target.x - muzzle.x, target.y - muzzle.y);
        assert!((v.x / ENEMY_BULLET_SPEED - aim.x / aim.length()).abs() < 1e-3);
        assert!((v.y / ENEMY_BULLET_SPEED - aim.y / aim.length()).abs() < 1e-3);

        // No target: nothing new launches while the run plays out.
        for _ in 0..400 {
            now += 16;
            formation.attack_tick(now, None, &mut projectiles, &mut rng, false);
            if !formation.ships().iter().any(|s| s.is_attacking()) {
                break;
            }
        }
        assert!(formation.ships().iter().all(|s| !s.is_attacking()));
        assert_eq!(formation.origins().len(), formation.len());
    }

    #[test]
    fn rows_never_leave_the_canvas() {
        let plan = LevelPlan::for_tier(3).unwrap();
        let (mut formation, mut projectiles, _rx) = setup(&plan);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20_000 {
            formation.advance(&mut rng, &mut projectiles, false);
            for ship in formation.ships() {
                let (left, right) = (ship.body.x, ship.body.x + ship.body.width);
                assert!(left >= 0.0 && right <= 640.0, "{left}..{right}");
            }
        }
    }

    #[test]
    fn halted_formation_stays_put() {
        let plan = LevelPlan::for_tier(2).unwrap();
        let (mut formation, mut projectiles, _rx) = setup(&plan);
        let mut rng = StdRng::seed_from_u64(4);
        let target = Vec2::new(320.0, 450.0);
        formation.launch_attack(target, &mut rng).unwrap();
        formation.halt_attacks();
        assert_eq!(formation.state(), FormationState::Halted);

        let positions = |f: &Formation| -> Vec<(f32, f32)> {
            f.ships().iter().map(|s| (s.body.x, s.body.y)).collect()
        };
        let before = positions(&formation);
        for t in 1..200 {
            formation.advance(&mut rng, &mut projectiles, true);
            formation.attack_tick(t * 16, Some(target), &mut projectiles, &mut rng, true);
        }
        assert_eq!(positions(&formation), before);
        assert_eq!(projectiles.count(Owner::Enemy), 0);
        assert_eq!(formation.state(), FormationState::Halted);
    }

    #[test]
    fn only_top_level_ships_attack() {
        let (mut formation, _, _rx) = setup(&single_row(2, RowPattern::Straight));
        let mut rng = StdRng::seed_from_u64(1);
        let target = Vec2::new(0.0, 400.0);
        assert!(formation.launch_attack(target, &mut rng).is_some());
        assert!(formation.launch_attack(target, &mut rng).is_some());
        assert!(formation.launch_attack(target, &mut rng).is_none());
    }
}
