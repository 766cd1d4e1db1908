//! The player team: one original ship plus any clones, sharing one pool
//! of lives, one bullet cap and one set of power-ups.

use super::geometry::Vec2;
use super::hooks::{emit, Cue, GameEvent, Outbox, Sprite};
use super::powerup::{EffectStart, PowerUp, TimedEffects};
use super::projectile::{Owner, Projectiles};
use super::ship::{EntityId, EntityKind, IdSource, PlayerShip, ShipKind, SHIP_HEIGHT, SHIP_WIDTH};
use crate::config::Timing;

pub const PLAYER_SPEED: f32 = 3.0;
pub const BOTTOM_OFFSET: f32 = 30.0;
pub const BULLET_CAP: usize = 3;
/// Minimum edge-to-edge gap between teammates.
pub const CLEARANCE: f32 = 30.0;

const SPEED_MULTIPLIER: f32 = 2.0;
const CAP_MULTIPLIER: usize = 3;
/// How long one steer input keeps the team moving.
const STEER_HOLD_MS: u64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

impl Steer {
    fn sign(self) -> f32 {
        match self {
            Steer::Left => -1.0,
            Steer::Right => 1.0,
        }
    }
}

/// What happened when the team was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Miss,
    /// A life was lost; a clone absorbed the hit if `clone_lost`.
    Damaged { clone_lost: bool },
    Defeated,
}

pub struct PlayerTeam {
    ships: Vec<PlayerShip>,
    lives: u32,
    bullet_cap: usize,
    shielded: bool,
    fire_cooldown_ms: u64,
    last_fire_ms: Option<u64>,
    effects: TimedEffects,
    steer: Option<(Steer, u64)>,
    defeated: bool,
    width: f32,
    ids: IdSource,
    events: Outbox,
}

impl PlayerTeam {
    pub fn new(width: f32, height: f32, lives: u32, timing: &Timing, events: Outbox) -> Self {
        let mut ids = IdSource::new(EntityKind::Ship(ShipKind::Player));
        let x = width / 2.0 - SHIP_WIDTH / 2.0;
        let y = height - SHIP_HEIGHT - BOTTOM_OFFSET;
        let original = PlayerShip::new(ids.next_id(), x, y, PLAYER_SPEED);
        Self {
            ships: vec![original],
            lives,
            bullet_cap: BULLET_CAP,
            shielded: false,
            fire_cooldown_ms: timing.fire_cooldown_ms,
            last_fire_ms: None,
            effects: TimedEffects::new(timing.power_up_ms),
            steer: None,
            defeated: false,
            width,
            ids,
            events,
        }
    }

    /// Hold a direction for a short while; repeated key events extend it.
    pub fn steer(&mut self, direction: Steer, now_ms: u64) {
        self.steer = Some((direction, now_ms + STEER_HOLD_MS));
    }

    pub fn stop(&mut self) {
        self.steer = None;
    }

    /// Per-tick upkeep: apply the held steer and revert expired power-ups.
    pub fn tick(&mut self, now_ms: u64) {
        match self.steer {
            Some((direction, until)) if now_ms < until => {
                self.move_ships(direction);
            }
            Some(_) => self.steer = None,
            None => {}
        }
        for kind in self.effects.expire(now_ms) {
            self.revert(kind);
            emit(&self.events, GameEvent::PowerUpExpired(kind));
        }
    }

    /// Move every ship one step. Ships are moved leader-first so a clone
    /// never blocks on a teammate that is about to move out of its way.
    /// Returns how many ships actually moved.
    pub fn move_ships(&mut self, direction: Steer) -> usize {
        if self.defeated {
            return 0;
        }
        let mut order: Vec<usize> = (0..self.ships.len()).collect();
        order.sort_by(|&a, &b| {
            let (xa, xb) = (self.ships[a].body.x, self.ships[b].body.x);
            match direction {
                Steer::Right => xb.total_cmp(&xa),
                Steer::Left => xa.total_cmp(&xb),
            }
        });

        let max_x = (self.width - SHIP_WIDTH).max(0.0);
        let mut moved = 0;
        for index in order {
            let ship = &self.ships[index];
            let from = ship.body.x;
            let to = (from + direction.sign() * ship.speed).clamp(0.0, max_x);
            if to == from || !self.keeps_clearance(index, from, to) {
                continue;
            }
            self.ships[index].body.x = to;
            moved += 1;
        }
        moved
    }

    fn keeps_clearance(&self, index: usize, from: f32, to: f32) -> bool {
        self.ships
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != index)
            .all(|(_, other)| {
                let before = edge_gap(from, other.body.x);
                let after = edge_gap(to, other.body.x);
                after >= CLEARANCE || after >= before
            })
    }

    /// Fire from every ship, subject to the cooldown and the bullet cap.
    /// Returns the number of bullets spawned.
    pub fn fire(&mut self, now_ms: u64, projectiles: &mut Projectiles) -> usize {
        if self.defeated {
            return 0;
        }
        if let Some(last) = self.last_fire_ms {
            if now_ms.saturating_sub(last) < self.fire_cooldown_ms {
                return 0;
            }
        }
        let mut fired = 0;
        for ship in &self.ships {
            if projectiles.count(Owner::Player) >= self.bullet_cap {
                break;
            }
            projectiles.fire_player(ship.muzzle());
            fired += 1;
        }
        if fired > 0 {
            self.last_fire_ms = Some(now_ms);
            emit(&self.events, GameEvent::Cue(Cue::PlayerShoot));
        }
        fired
    }

    /// Hit sweep against enemy fire. Does nothing while shielded: bullets
    /// pass through and stay live.
    pub fn resolve_hits(&mut self, projectiles: &mut Projectiles) -> HitOutcome {
        if self.defeated || self.shielded {
            return HitOutcome::Miss;
        }
        let hit = self
            .ships
            .iter()
            .any(|ship| projectiles.check_collision(ship.bounds(), ShipKind::Player));
        if !hit {
            return HitOutcome::Miss;
        }
        self.take_hit()
    }

    fn take_hit(&mut self) -> HitOutcome {
        self.lives = self.lives.saturating_sub(1);
        emit(&self.events, GameEvent::Cue(Cue::PlayerBlowUp));

        if self.lives == 0 {
            for ship in self.ships.drain(..) {
                emit(
                    &self.events,
                    GameEvent::Removed {
                        sprite: ship.sprite(),
                        explode: true,
                    },
                );
            }
            self.defeated = true;
            self.steer = None;
            emit(&self.events, GameEvent::PlayerDefeated);
            tracing::debug!("player team defeated");
            return HitOutcome::Defeated;
        }

        let clone_lost = self.ships.len() > 1;
        if clone_lost {
            if let Some(ship) = self.ships.pop() {
                emit(
                    &self.events,
                    GameEvent::Removed {
                        sprite: ship.sprite(),
                        explode: true,
                    },
                );
            }
        }
        tracing::debug!(lives = self.lives, roster = self.ships.len(), "player hit");
        HitOutcome::Damaged { clone_lost }
    }

    pub fn add_life(&mut self) {
        self.lives += 1;
        tracing::debug!(lives = self.lives, "extra life");
    }

    /// Add a clone at the nearest free spot to the original. Returns `None`
    /// when no spot on the row keeps clear of every teammate.
    pub fn add_clone(&mut self) -> Option<EntityId> {
        let anchor = self.ships.first()?;
        let (start, y, speed) = (anchor.body.x, anchor.body.y, anchor.speed);
        let max_x = (self.width - SHIP_WIDTH).max(0.0);
        let step = SHIP_WIDTH + CLEARANCE;
        let fits = |x: f32| {
            (0.0..=max_x).contains(&x)
                && self
                    .ships
                    .iter()
                    .all(|s| edge_gap(x, s.body.x) >= CLEARANCE)
        };

        let mut candidates = Vec::new();
        let mut k = 1.0;
        while start - k * step >= 0.0 || start + k * step <= max_x {
            candidates.push(start + k * step);
            candidates.push(start - k * step);
            k += 1.0;
        }
        // Hug the walls too, in case the ladder above overshot a gap.
        candidates.push(0.0);
        candidates.push(max_x);
        candidates.sort_by(|a, b| (a - start).abs().total_cmp(&(b - start).abs()));

        let x = candidates.into_iter().find(|&x| fits(x))?;
        let clone = PlayerShip::new(self.ids.next_id(), x, y, speed);
        let id = clone.id;
        self.ships.push(clone);
        tracing::debug!(serial = id.serial, x, roster = self.ships.len(), "clone added");
        Some(id)
    }

    /// Apply `kind` now. Timed kinds multiply only when they start; a
    /// refresh just moves the deadline.
    pub fn apply_power_up(&mut self, kind: PowerUp, now_ms: u64) {
        emit(&self.events, GameEvent::Cue(Cue::PowerUp));
        if !kind.is_timed() {
            self.add_life();
            return;
        }
        if self.effects.start(kind, now_ms) == EffectStart::Refreshed {
            tracing::debug!(?kind, "power-up refreshed");
            return;
        }
        match kind {
            PowerUp::SpeedBoost => {
                for ship in &mut self.ships {
                    ship.speed *= SPEED_MULTIPLIER;
                }
            }
            PowerUp::Shield => self.shielded = true,
            PowerUp::TripleBulletCap => self.bullet_cap *= CAP_MULTIPLIER,
            PowerUp::ExtraLife => {}
        }
        tracing::debug!(?kind, "power-up applied");
    }

    fn revert(&mut self, kind: PowerUp) {
        match kind {
            PowerUp::SpeedBoost => {
                for ship in &mut self.ships {
                    ship.speed /= SPEED_MULTIPLIER;
                }
            }
            PowerUp::Shield => self.shielded = false,
            PowerUp::TripleBulletCap => self.bullet_cap /= CAP_MULTIPLIER,
            PowerUp::ExtraLife => {}
        }
        tracing::debug!(?kind, "power-up expired");
    }

    /// Where enemies aim: the original ship's centre.
    pub fn target(&self) -> Option<Vec2> {
        self.ships.first().map(|s| s.body.center())
    }

    pub fn ships(&self) -> &[PlayerShip] {
        &self.ships
    }

    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        self.ships.iter().map(PlayerShip::sprite)
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn bullet_cap(&self) -> usize {
        self.bullet_cap
    }

    pub fn is_shielded(&self) -> bool {
        self.shielded
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn effects(&self) -> &TimedEffects {
        &self.effects
    }
}

/// Edge-to-edge horizontal gap between two ships at `a` and `b`.
fn edge_gap(a: f32, b: f32) -> f32 {
    (a - b).abs() - SHIP_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn team(lives: u32) -> (PlayerTeam, Projectiles, mpsc::Receiver<GameEvent>) {
        let (tx, rx) = mpsc::channel();
        let team = PlayerTeam::new(640.0, 480.0, lives, &Timing::default(), tx.clone());
        (team, Projectiles::new(640.0, 480.0, tx), rx)
    }

    fn hit(team: &PlayerTeam, projectiles: &mut Projectiles) {
        let c = team.ships()[0].body.center();
        projectiles.fire_enemy(Vec2::new(c.x, c.y - 4.0));
    }

    #[test]
    fn starts_centred_above_the_bottom() {
        let (team, _, _rx) = team(3);
        let ship = &team.ships()[0];
        assert_eq!(ship.body.x, 304.0);
        assert_eq!(ship.body.y, 480.0 - 24.0 - 30.0);
    }

    #[test]
    fn fire_respects_cooldown_and_cap() {
        let (mut team, mut projectiles, _rx) = team(3);
        assert_eq!(team.fire(0, &mut projectiles), 1);
        assert_eq!(team.fire(100, &mut projectiles), 0);
        let mut now = 0;
        for _ in 0..20 {
            now += 200;
            team.fire(now, &mut projectiles);
            assert!(projectiles.count(Owner::Player) <= BULLET_CAP);
        }
        assert_eq!(projectiles.count(Owner::Player), BULLET_CAP);
    }

    #[test]
    fn last_life_signals_defeat_once() {
        let (mut team, mut projectiles, rx) = team(1);
        hit(&team, &mut projectiles);
        assert_eq!(team.resolve_hits(&mut projectiles), HitOutcome::Defeated);
        assert!(team.ships().is_empty());
        hit_anywhere(&mut projectiles);
        assert_eq!(team.resolve_hits(&mut projectiles), HitOutcome::Miss);
        let defeats = rx
            .try_iter()
            .filter(|e| matches!(e, GameEvent::PlayerDefeated))
            .count();
        assert_eq!(defeats, 1);
        assert_eq!(team.lives(), 0);
    }

    fn hit_anywhere(projectiles: &mut Projectiles) {
        projectiles.fire_enemy(Vec2::new(320.0, 430.0));
    }

    #[test]
    fn clone_absorbs_a_hit() {
        let (mut team, mut projectiles, _rx) = team(3);
        let clone = team.add_clone().unwrap();
        assert_eq!(team.ships().len(), 2);
        hit(&team, &mut projectiles);
        assert_eq!(
            team.resolve_hits(&mut projectiles),
            HitOutcome::Damaged { clone_lost: true }
        );
        assert_eq!(team.lives(), 2);
        assert!(team.ships().iter().all(|s| s.id != clone));
    }

    #[test]
    fn shield_suppresses_the_sweep() {
        let (mut team, mut projectiles, _rx) = team(3);
        team.apply_power_up(PowerUp::Shield, 0);
        hit(&team, &mut projectiles);
        assert_eq!(team.resolve_hits(&mut projectiles), HitOutcome::Miss);
        assert_eq!(team.lives(), 3);
        team.tick(12_000);
        assert!(!team.is_shielded());
        assert!(matches!(
            team.resolve_hits(&mut projectiles),
            HitOutcome::Damaged { .. }
        ));
    }

    #[test]
    fn speed_boost_reverts_exactly() {
        let (mut team, _, _rx) = team(3);
        team.apply_power_up(PowerUp::SpeedBoost, 0);
        assert_eq!(team.ships()[0].speed, 6.0);
        team.apply_power_up(PowerUp::SpeedBoost, 6_000);
        assert_eq!(team.ships()[0].speed, 6.0);
        team.tick(12_000);
        assert_eq!(team.ships()[0].speed, 6.0);
        team.tick(18_000);
        assert_eq!(team.ships()[0].speed, PLAYER_SPEED);
    }

    #[test]
    fn overlapping_power_ups_each_revert() {
        let (mut team, _, rx) = team(3);
        team.apply_power_up(PowerUp::SpeedBoost, 0);
        team.apply_power_up(PowerUp::TripleBulletCap, 5_000);
        assert_eq!(team.bullet_cap(), 9);
        team.tick(12_000);
        assert_eq!(team.ships()[0].speed, PLAYER_SPEED);
        assert_eq!(team.bullet_cap(), 9);
        team.tick(17_000);
        assert_eq!(team.bullet_cap(), BULLET_CAP);
        let expired: Vec<_> = rx
            .try_iter()
            .filter_map(|e| match e {
                GameEvent::PowerUpExpired(kind) => Some(kind),
                _ => None,
            })
            .collect();
        assert_eq!(expired, vec![PowerUp::SpeedBoost, PowerUp::TripleBulletCap]);
    }

    #[test]
    fn clones_keep_clearance_at_the_wall() {
        let (mut team, _, _rx) = team(3);
        team.add_clone().unwrap();
        for _ in 0..400 {
            team.move_ships(Steer::Left);
        }
        let mut xs: Vec<f32> = team.ships().iter().map(|s| s.body.x).collect();
        xs.sort_by(f32::total_cmp);
        assert_eq!(xs[0], 0.0);
        assert!(edge_gap(xs[0], xs[1]) >= CLEARANCE);
    }

    #[test]
    fn steer_expires() {
        let (mut team, _, _rx) = team(3);
        team.steer(Steer::Right, 0);
        team.tick(16);
        team.tick(32);
        assert_eq!(team.ships()[0].body.x, 310.0);
        team.tick(STEER_HOLD_MS + 1);
        team.tick(STEER_HOLD_MS + 20);
        assert_eq!(team.ships()[0].body.x, 310.0);
    }

    #[test]
    fn extra_life_is_immediate() {
        let (mut team, _, _rx) = team(3);
        team.apply_power_up(PowerUp::ExtraLife, 0);
        assert_eq!(team.lives(), 4);
        assert!(team.effects().iter().next().is_none());
    }
}
