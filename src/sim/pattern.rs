//! Per-row movement strategies.
//!
//! A strategy moves every in-formation ship of one row by one step and then
//! hands each ship to two callbacks: `sync` (position bookkeeping) and
//! `toggle` (the cosmetic frame swap). Direction is decided by the
//! formation, never by the strategy.

use std::f32::consts::PI;

use super::ship::EnemyShip;

const ZIGZAG_AMPLITUDE: f32 = 20.0;
const ZIGZAG_FREQUENCY: f32 = 0.05;
const OSCILLATION_STEP: f32 = 0.1;
const OSCILLATION_JITTER: f32 = 5.0;

/// One ship of the row being moved, paired with its spawn x.
pub struct RowSlot<'a> {
    pub ship: &'a mut EnemyShip,
    pub origin_x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    pub moving_right: bool,
    pub speed: f32,
    pub max_distance: f32,
}

impl StepParams {
    fn step(&self) -> f32 {
        if self.moving_right {
            self.speed
        } else {
            -self.speed
        }
    }
}

pub trait MovementPattern {
    fn apply(
        &mut self,
        row: &mut [RowSlot<'_>],
        params: StepParams,
        sync: &mut dyn FnMut(&mut EnemyShip),
        toggle: &mut dyn FnMut(&mut EnemyShip),
    );

    fn kind(&self) -> RowPattern;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowPattern {
    Straight,
    ZigZag,
    OscillatingHorizontal,
    Diagonal,
}

impl RowPattern {
    pub fn build(self) -> Box<dyn MovementPattern> {
        match self {
            RowPattern::Straight => Box::new(Straight),
            RowPattern::ZigZag => Box::new(ZigZag),
            RowPattern::OscillatingHorizontal => Box::new(OscillatingHorizontal::default()),
            RowPattern::Diagonal => Box::new(Diagonal),
        }
    }
}

#[derive(Debug, Default)]
pub struct Straight;

impl MovementPattern for Straight {
    fn apply(
        &mut self,
        row: &mut [RowSlot<'_>],
        params: StepParams,
        sync: &mut dyn FnMut(&mut EnemyShip),
        toggle: &mut dyn FnMut(&mut EnemyShip),
    ) {
        for slot in row.iter_mut() {
            slot.ship.body.x += params.step();
            sync(slot.ship);
            toggle(slot.ship);
        }
    }

    fn kind(&self) -> RowPattern {
        RowPattern::Straight
    }
}

/// Vertical position is a pure function of x, not integrated.
#[derive(Debug, Default)]
pub struct ZigZag;

impl MovementPattern for ZigZag {
    fn apply(
        &mut self,
        row: &mut [RowSlot<'_>],
        params: StepParams,
        sync: &mut dyn FnMut(&mut EnemyShip),
        toggle: &mut dyn FnMut(&mut EnemyShip),
    ) {
        for slot in row.iter_mut() {
            let ship = &mut *slot.ship;
            ship.body.x += params.step();
            ship.body.y = ship.base_y + ZIGZAG_AMPLITUDE * (ZIGZAG_FREQUENCY * ship.body.x).sin();
            sync(ship);
            toggle(ship);
        }
    }

    fn kind(&self) -> RowPattern {
        RowPattern::ZigZag
    }
}

/// Horizontal step plus a sine jitter driven by a phase local to the row.
#[derive(Debug, Default)]
pub struct OscillatingHorizontal {
    phase: f32,
}

impl OscillatingHorizontal {
    pub fn phase(&self) -> f32 {
        self.phase
    }
}

impl MovementPattern for OscillatingHorizontal {
    fn apply(
        &mut self,
        row: &mut [RowSlot<'_>],
        params: StepParams,
        sync: &mut dyn FnMut(&mut EnemyShip),
        toggle: &mut dyn FnMut(&mut EnemyShip),
    ) {
        let jitter = self.phase.sin() * OSCILLATION_JITTER;
        for slot in row.iter_mut() {
            slot.ship.body.x += params.step() + jitter;
            sync(slot.ship);
            toggle(slot.ship);
        }
        self.phase += OSCILLATION_STEP;
        if self.phase > 2.0 * PI {
            self.phase -= 2.0 * PI;
        }
    }

    fn kind(&self) -> RowPattern {
        RowPattern::OscillatingHorizontal
    }
}

/// Half-sine arc over each `max_distance` of horizontal travel.
#[derive(Debug, Default)]
pub struct Diagonal;

impl MovementPattern for Diagonal {
    fn apply(
        &mut self,
        row: &mut [RowSlot<'_>],
        params: StepParams,
        sync: &mut dyn FnMut(&mut EnemyShip),
        toggle: &mut dyn FnMut(&mut EnemyShip),
    ) {
        let amplitude = params.max_distance / 2.0;
        for slot in row.iter_mut() {
            let origin_x = slot.origin_x;
            let ship = &mut *slot.ship;
            ship.body.x += params.step();
            if params.max_distance > 0.0 {
                let phase = PI * (ship.body.x - origin_x) / params.max_distance;
                ship.body.y = ship.base_y + amplitude * phase.sin();
            }
            sync(ship);
            toggle(ship);
        }
    }

    fn kind(&self) -> RowPattern {
        RowPattern::Diagonal
    }
}
