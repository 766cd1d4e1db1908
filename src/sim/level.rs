//! Difficulty tiers.
//!
//! Everything that varies by tier is produced by pure functions of the tier
//! and handed to the formation at setup; nothing here is mutable global state.

use std::ops::RangeInclusive;

use super::pattern::RowPattern;
use crate::error::{GalagaError, Result};

pub const MAX_LEVEL: u32 = 3;

/// Top edge of each row, lowest row (enemy level 1) first.
const ROW_ANCHORS: [f32; 4] = [260.0, 200.0, 120.0, 40.0];

#[derive(Debug, Clone, PartialEq)]
pub struct LevelPlan {
    pub tier: u32,
    pub ships_per_row: Vec<usize>,
    pub row_anchors: Vec<f32>,
    /// Bounds for the random fire roll, in enemy-move ticks.
    pub fire_interval: RangeInclusive<u32>,
    pub patterns: Vec<RowPattern>,
}

impl LevelPlan {
    pub fn for_tier(tier: u32) -> Result<Self> {
        check_tier(tier)?;
        let t = tier as usize;
        let fire_min = 5u32.saturating_sub(tier).max(1);
        let fire_max = 25u32.saturating_sub(tier * 2).max(5);
        Ok(Self {
            tier,
            ships_per_row: vec![1 + t, 2 + t, 3 + t, 4 + t],
            row_anchors: ROW_ANCHORS.to_vec(),
            fire_interval: fire_min..=fire_max,
            patterns: row_patterns(tier)?,
        })
    }

    pub fn ship_count(&self) -> usize {
        self.ships_per_row.iter().sum()
    }
}

/// Movement pattern for each row at `tier`, lowest row first.
pub fn row_patterns(tier: u32) -> Result<Vec<RowPattern>> {
    use RowPattern::*;
    check_tier(tier)?;
    Ok(match tier {
        1 => vec![Straight, Straight, ZigZag, Straight],
        2 => vec![Straight, ZigZag, OscillatingHorizontal, Diagonal],
        _ => vec![ZigZag, Diagonal, OscillatingHorizontal, Diagonal],
    })
}

fn check_tier(tier: u32) -> Result<()> {
    if (1..=MAX_LEVEL).contains(&tier) {
        Ok(())
    } else {
        Err(GalagaError::UnsupportedLevelTier(tier))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Next(u32),
    Won,
}

/// Current tier, `1..=MAX_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelState {
    tier: u32,
}

impl LevelState {
    pub fn new(starting_tier: u32) -> Result<Self> {
        check_tier(starting_tier)?;
        Ok(Self {
            tier: starting_tier,
        })
    }

    pub fn tier(&self) -> u32 {
        self.tier
    }

    pub fn plan(&self) -> Result<LevelPlan> {
        LevelPlan::for_tier(self.tier)
    }

    /// Clearing `MAX_LEVEL` wins; the tier itself never passes it.
    pub fn advance(&mut self) -> Progress {
        if self.tier >= MAX_LEVEL {
            return Progress::Won;
        }
        self.tier += 1;
        Progress::Next(self.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_one_shape() {
        let plan = LevelPlan::for_tier(1).unwrap();
        assert_eq!(plan.ships_per_row, vec![2, 3, 4, 5]);
        assert_eq!(plan.fire_interval, 4..=23);
        assert_eq!(plan.patterns.len(), plan.ships_per_row.len());
        assert_eq!(plan.ship_count(), 14);
    }

    #[test]
    fn fire_bounds_tighten_with_tier() {
        let plan = LevelPlan::for_tier(3).unwrap();
        assert_eq!(plan.fire_interval, 2..=19);
    }

    #[test]
    fn tiers_outside_range_fail() {
        assert!(matches!(
            LevelPlan::for_tier(0),
            Err(GalagaError::UnsupportedLevelTier(0))
        ));
        assert!(row_patterns(MAX_LEVEL + 1).is_err());
        assert!(LevelState::new(4).is_err());
    }

    #[test]
    fn advancing_past_max_wins() {
        let mut level = LevelState::new(2).unwrap();
        assert_eq!(level.advance(), Progress::Next(3));
        assert_eq!(level.advance(), Progress::Won);
        assert_eq!(level.tier(), MAX_LEVEL);
        assert!(level.plan().is_ok());
    }
}
