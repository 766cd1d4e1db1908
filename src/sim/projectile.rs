//! Player and enemy projectiles: spawn, advance, retire, collide.

use super::geometry::{BoundingBox, Entity, Vec2};
use super::hooks::{emit, GameEvent, Outbox, Sprite, SpriteKind};
use super::ship::{EntityId, EntityKind, IdSource, ShipKind};

pub const BULLET_WIDTH: f32 = 4.0;
pub const BULLET_HEIGHT: f32 = 12.0;
pub const PLAYER_BULLET_SPEED: f32 = 10.0;
pub const ENEMY_BULLET_SPEED: f32 = 5.0;

/// Which side fired. Bonus-ship shots count as enemy fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: EntityId,
    pub body: Entity,
    pub owner: Owner,
}

impl Projectile {
    pub fn sprite(&self) -> Sprite {
        Sprite {
            id: self.id,
            kind: match self.owner {
                Owner::Player => SpriteKind::PlayerBullet,
                Owner::Enemy => SpriteKind::EnemyBullet,
            },
            bounds: self.body.bounds(),
        }
    }
}

pub struct Projectiles {
    player: Vec<Projectile>,
    enemy: Vec<Projectile>,
    width: f32,
    height: f32,
    ids: IdSource,
    events: Outbox,
}

impl Projectiles {
    pub fn new(width: f32, height: f32, events: Outbox) -> Self {
        Self {
            player: Vec::new(),
            enemy: Vec::new(),
            width,
            height,
            ids: IdSource::new(EntityKind::Projectile),
            events,
        }
    }

    /// Spawn a bullet centred on `origin`. Player bullets leave upward from
    /// the muzzle, enemy bullets downward.
    pub fn fire(&mut self, origin: Vec2, velocity: Vec2, owner: Owner) -> Projectile {
        let y = match owner {
            Owner::Player => origin.y - BULLET_HEIGHT,
            Owner::Enemy => origin.y,
        };
        let body = Entity::new(origin.x - BULLET_WIDTH / 2.0, y, BULLET_WIDTH, BULLET_HEIGHT)
            .with_velocity(velocity);
        let projectile = Projectile {
            id: self.ids.next_id(),
            body,
            owner,
        };
        match owner {
            Owner::Player => self.player.push(projectile.clone()),
            Owner::Enemy => self.enemy.push(projectile.clone()),
        }
        projectile
    }

    pub fn fire_player(&mut self, origin: Vec2) -> Projectile {
        self.fire(origin, Vec2::new(0.0, -PLAYER_BULLET_SPEED), Owner::Player)
    }

    pub fn fire_enemy(&mut self, origin: Vec2) -> Projectile {
        self.fire(origin, Vec2::new(0.0, ENEMY_BULLET_SPEED), Owner::Enemy)
    }

    /// Enemy shot toward `target`. Coincident points fall back to straight down.
    pub fn fire_aimed(&mut self, origin: Vec2, target: Vec2) -> Projectile {
        let velocity = aimed_velocity(origin, target, ENEMY_BULLET_SPEED);
        self.fire(origin, velocity, Owner::Enemy)
    }

    /// Advance every live projectile and retire the ones that left the canvas.
    pub fn tick(&mut self) {
        let (width, height) = (self.width, self.height);
        for list in [&mut self.player, &mut self.enemy] {
            for p in list.iter_mut() {
                p.body.advance();
            }
            list.retain(|p| {
                let gone = p.body.is_outside(width, height);
                if gone {
                    emit(
                        &self.events,
                        GameEvent::Removed {
                            sprite: p.sprite(),
                            explode: false,
                        },
                    );
                }
                !gone
            });
        }
    }

    /// Consume the first opposing projectile that overlaps `target`.
    /// At most one projectile is removed per call.
    pub fn check_collision(&mut self, target: BoundingBox, target_kind: ShipKind) -> bool {
        let list = match target_kind {
            ShipKind::Player => &mut self.enemy,
            ShipKind::Enemy | ShipKind::Bonus => &mut self.player,
        };
        let Some(index) = list.iter().position(|p| p.body.bounds().overlaps(&target)) else {
            return false;
        };
        let hit = list.remove(index);
        emit(
            &self.events,
            GameEvent::Removed {
                sprite: hit.sprite(),
                explode: false,
            },
        );
        true
    }

    pub fn count(&self, owner: Owner) -> usize {
        match owner {
            Owner::Player => self.player.len(),
            Owner::Enemy => self.enemy.len(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.player.iter().chain(self.enemy.iter())
    }

    pub fn clear(&mut self, owner: Owner) {
        let list = match owner {
            Owner::Player => &mut self.player,
            Owner::Enemy => &mut self.enemy,
        };
        for p in list.drain(..) {
            emit(
                &self.events,
                GameEvent::Removed {
                    sprite: p.sprite(),
                    explode: false,
                },
            );
        }
    }
}

pub fn aimed_velocity(origin: Vec2, target: Vec2, speed: f32) -> Vec2 {
    Vec2::new(target.x - origin.x, target.y - origin.y)
        .scaled_to(speed)
        .unwrap_or(Vec2::new(0.0, speed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn pool() -> (Projectiles, mpsc::Receiver<GameEvent>) {
        let (tx, rx) = mpsc::channel();
        (Projectiles::new(640.0, 480.0, tx), rx)
    }

    #[test]
    fn aimed_at_own_position_fires_straight_down() {
        let (mut pool, _rx) = pool();
        let shot = pool.fire_aimed(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0));
        assert!(shot.body.velocity.x.is_finite() && shot.body.velocity.y.is_finite());
        assert_eq!(shot.body.velocity, Vec2::new(0.0, ENEMY_BULLET_SPEED));
    }

    #[test]
    fn aimed_shot_has_fixed_speed() {
        let v = aimed_velocity(Vec2::new(0.0, 0.0), Vec2::new(300.0, 400.0), ENEMY_BULLET_SPEED);
        assert!((v.length() - ENEMY_BULLET_SPEED).abs() < 1e-4);
        assert!(v.x > 0.0 && v.y > 0.0);
    }

    #[test]
    fn tick_retires_bullets_that_leave() {
        let (mut pool, rx) = pool();
        pool.fire_player(Vec2::new(100.0, 15.0));
        pool.fire_player(Vec2::new(200.0, 400.0));
        pool.tick();
        pool.tick();
        assert_eq!(pool.count(Owner::Player), 1);
        let removed = rx
            .try_iter()
            .filter(|e| matches!(e, GameEvent::Removed { .. }))
            .count();
        assert_eq!(removed, 1);
    }

    #[test]
    fn collision_consumes_only_the_first_match() {
        let (mut pool, _rx) = pool();
        let target = BoundingBox::new(90.0, 90.0, 32.0, 24.0);
        pool.fire_player(Vec2::new(100.0, 110.0));
        pool.fire_player(Vec2::new(104.0, 110.0));
        assert!(pool.check_collision(target, ShipKind::Enemy));
        assert_eq!(pool.count(Owner::Player), 1);
        assert!(pool.check_collision(target, ShipKind::Enemy));
        assert!(!pool.check_collision(target, ShipKind::Enemy));
    }

    #[test]
    fn player_target_only_sees_enemy_fire() {
        let (mut pool, _rx) = pool();
        let target = BoundingBox::new(90.0, 90.0, 32.0, 24.0);
        pool.fire_player(Vec2::new(100.0, 110.0));
        assert!(!pool.check_collision(target, ShipKind::Player));
        pool.fire_enemy(Vec2::new(100.0, 95.0));
        assert!(pool.check_collision(target, ShipKind::Player));
        assert_eq!(pool.count(Owner::Player), 1);
    }
}
