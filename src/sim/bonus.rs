//! The bonus ship: a lone target that occasionally crosses the top of the
//! screen and pays out a reward when shot down.

use rand::Rng;

use super::geometry::{Entity, Vec2};
use super::hooks::{emit, Cue, GameEvent, Outbox, Sprite};
use super::projectile::Projectiles;
use super::ship::{BonusShip, EntityKind, IdSource, ShipKind, BONUS_HEIGHT, BONUS_WIDTH};
use crate::config::Timing;

pub const BONUS_SPEED: f32 = 2.0;
pub const BONUS_TOP: f32 = 10.0;
pub const SPAWN_CHANCE: f64 = 0.05;
pub const FIRE_CHANCE: f64 = 0.01;
pub const FIRE_COOLDOWN_MS: u64 = 500;

/// Life-or-clone half of the bonus payout. A random power-up comes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusReward {
    ExtraLife,
    Clone,
}

/// Clones are only on offer past the first level.
pub fn roll_reward<R: Rng + ?Sized>(level: u32, rng: &mut R) -> BonusReward {
    if level > 1 && rng.gen_bool(0.5) {
        BonusReward::Clone
    } else {
        BonusReward::ExtraLife
    }
}

pub struct BonusManager {
    ship: Option<BonusShip>,
    enabled: bool,
    spawn_chance: f64,
    min_delay_ms: u64,
    last_spawn_ms: Option<u64>,
    last_fire_ms: Option<u64>,
    width: f32,
    height: f32,
    ids: IdSource,
    events: Outbox,
}

impl BonusManager {
    pub fn new(width: f32, height: f32, timing: &Timing, events: Outbox) -> Self {
        Self {
            ship: None,
            enabled: true,
            spawn_chance: SPAWN_CHANCE,
            min_delay_ms: timing.bonus_min_delay_ms,
            last_spawn_ms: None,
            last_fire_ms: None,
            width,
            height,
            ids: IdSource::new(EntityKind::Ship(ShipKind::Bonus)),
            events,
        }
    }

    pub fn with_spawn_chance(mut self, chance: f64) -> Self {
        self.spawn_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// The once-a-second roll. Spawns only when enabled, nothing is on
    /// screen, the minimum delay since the last spawn has passed, and the
    /// dice agree, in that order.
    pub fn try_spawn<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> bool {
        if !self.enabled || self.ship.is_some() {
            return false;
        }
        if let Some(last) = self.last_spawn_ms {
            if now_ms.saturating_sub(last) < self.min_delay_ms {
                return false;
            }
        }
        if !rng.gen_bool(self.spawn_chance) {
            return false;
        }

        let body = Entity::new(self.width, BONUS_TOP, BONUS_WIDTH, BONUS_HEIGHT)
            .with_velocity(Vec2::new(-BONUS_SPEED, 0.0));
        let ship = BonusShip {
            id: self.ids.next_id(),
            body,
        };
        tracing::debug!(serial = ship.id.serial, now_ms, "bonus ship spawned");
        self.ship = Some(ship);
        self.last_spawn_ms = Some(now_ms);
        self.last_fire_ms = None;
        emit(&self.events, GameEvent::Cue(Cue::BonusAppear));
        true
    }

    /// Move one step, retire once off the left edge, maybe fire.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now_ms: u64,
        target: Option<Vec2>,
        projectiles: &mut Projectiles,
        rng: &mut R,
        can_fire: bool,
    ) {
        let Some(ship) = self.ship.as_mut() else {
            return;
        };
        ship.body.advance();
        if ship.body.x + ship.body.width <= 0.0 || ship.body.is_outside(self.width, self.height) {
            self.despawn(false);
            return;
        }

        let cooled = self
            .last_fire_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= FIRE_COOLDOWN_MS);
        if can_fire && cooled && rng.gen_bool(FIRE_CHANCE) {
            let muzzle = ship.muzzle();
            match target {
                Some(target) => projectiles.fire_aimed(muzzle, target),
                None => projectiles.fire_enemy(muzzle),
            };
            self.last_fire_ms = Some(now_ms);
            emit(&self.events, GameEvent::Cue(Cue::EnemyShoot));
        }
    }

    /// True when a player bullet brought the ship down this tick.
    pub fn resolve_hit(&mut self, projectiles: &mut Projectiles) -> bool {
        let Some(ship) = self.ship.as_ref() else {
            return false;
        };
        if !projectiles.check_collision(ship.bounds(), ShipKind::Bonus) {
            return false;
        }
        emit(&self.events, GameEvent::Cue(Cue::EnemyBlowUp));
        self.despawn(true);
        emit(&self.events, GameEvent::BonusDestroyed);
        true
    }

    fn despawn(&mut self, explode: bool) {
        if let Some(ship) = self.ship.take() {
            tracing::debug!(serial = ship.id.serial, explode, "bonus ship gone");
            emit(
                &self.events,
                GameEvent::Removed {
                    sprite: ship.sprite(),
                    explode,
                },
            );
        }
    }

    /// Stop spawning. A ship already on screen is removed.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.despawn(false);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ship(&self) -> Option<&BonusShip> {
        self.ship.as_ref()
    }

    pub fn sprite(&self) -> Option<Sprite> {
        self.ship.as_ref().map(BonusShip::sprite)
    }
}
