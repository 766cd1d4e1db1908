use std::convert::TryFrom;

use super::geometry::{BoundingBox, Entity, Vec2};
use super::hooks::{Sprite, SpriteKind};
use crate::error::GalagaError;

pub const SHIP_WIDTH: f32 = 32.0;
pub const SHIP_HEIGHT: f32 = 24.0;
pub const BONUS_WIDTH: f32 = 48.0;
pub const BONUS_HEIGHT: f32 = 20.0;

const POINT_MULTIPLIER: u32 = 100;
const SHOOTING_MIN: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipKind {
    Player,
    Enemy,
    Bonus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Ship(ShipKind),
    Projectile,
}

/// Identity handed to the renderer. Each subsystem numbers its own kind,
/// so the pair is unique for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub kind: EntityKind,
    pub serial: u64,
}

/// Per-subsystem serial counter.
#[derive(Debug, Clone)]
pub struct IdSource {
    kind: EntityKind,
    next: u64,
}

impl IdSource {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind, next: 0 }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId {
            kind: self.kind,
            serial: self.next,
        };
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnemyLevel {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl EnemyLevel {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn points(self) -> u32 {
        self.value() as u32 * POINT_MULTIPLIER
    }

    pub fn is_shooter(self) -> bool {
        self.value() >= SHOOTING_MIN
    }

    pub fn has_second_frame(self) -> bool {
        matches!(self, EnemyLevel::Three | EnemyLevel::Four)
    }
}

impl TryFrom<u8> for EnemyLevel {
    type Error = GalagaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EnemyLevel::One),
            2 => Ok(EnemyLevel::Two),
            3 => Ok(EnemyLevel::Three),
            4 => Ok(EnemyLevel::Four),
            other => Err(GalagaError::UnsupportedEnemyLevel(other)),
        }
    }
}

/// Cosmetic animation frame. No gameplay meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Frame {
    #[default]
    A,
    B,
}

impl Frame {
    pub fn toggled(self) -> Self {
        match self {
            Frame::A => Frame::B,
            Frame::B => Frame::A,
        }
    }
}

/// Which movement authority owns an enemy this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    InFormation,
    Breakoff { velocity: Vec2 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyShip {
    pub id: EntityId,
    pub body: Entity,
    pub level: EnemyLevel,
    pub row: usize,
    /// Row anchor the vertical patterns oscillate around.
    pub base_y: f32,
    pub frame: Frame,
    pub mode: Mode,
}

impl EnemyShip {
    pub fn new(id: EntityId, level: EnemyLevel, row: usize, x: f32, y: f32) -> Self {
        Self {
            id,
            body: Entity::new(x, y, SHIP_WIDTH, SHIP_HEIGHT),
            level,
            row,
            base_y: y,
            frame: Frame::A,
            mode: Mode::InFormation,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.body.bounds()
    }

    pub fn sprite(&self) -> Sprite {
        Sprite {
            id: self.id,
            kind: SpriteKind::Enemy(self.level, self.frame),
            bounds: self.bounds(),
        }
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.mode, Mode::Breakoff { .. })
    }

    /// Where an enemy bullet leaves the hull.
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.body.x + self.body.width / 2.0, self.body.y + self.body.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerShip {
    pub id: EntityId,
    pub body: Entity,
    /// Horizontal step per movement tick.
    pub speed: f32,
}

impl PlayerShip {
    pub fn new(id: EntityId, x: f32, y: f32, speed: f32) -> Self {
        Self {
            id,
            body: Entity::new(x, y, SHIP_WIDTH, SHIP_HEIGHT),
            speed,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.body.bounds()
    }

    pub fn sprite(&self) -> Sprite {
        Sprite {
            id: self.id,
            kind: SpriteKind::Player,
            bounds: self.bounds(),
        }
    }

    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.body.x + self.body.width / 2.0, self.body.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BonusShip {
    pub id: EntityId,
    pub body: Entity,
}

impl BonusShip {
    pub fn bounds(&self) -> BoundingBox {
        self.body.bounds()
    }

    pub fn sprite(&self) -> Sprite {
        Sprite {
            id: self.id,
            kind: SpriteKind::Bonus,
            bounds: self.bounds(),
        }
    }

    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.body.x + self.body.width / 2.0, self.body.y + self.body.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_tags_outside_range_fail() {
        assert!(matches!(
            EnemyLevel::try_from(0),
            Err(GalagaError::UnsupportedEnemyLevel(0))
        ));
        assert!(matches!(
            EnemyLevel::try_from(5),
            Err(GalagaError::UnsupportedEnemyLevel(5))
        ));
    }

    #[test]
    fn points_and_shooters() {
        assert_eq!(EnemyLevel::One.points(), 100);
        assert_eq!(EnemyLevel::Four.points(), 400);
        assert!(!EnemyLevel::Two.is_shooter());
        assert!(EnemyLevel::Three.is_shooter());
        assert!(EnemyLevel::Four.has_second_frame());
        assert!(!EnemyLevel::One.has_second_frame());
    }

    #[test]
    fn id_source_is_sequential() {
        let mut ids = IdSource::new(EntityKind::Projectile);
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(b.serial, a.serial + 1);
    }
}
