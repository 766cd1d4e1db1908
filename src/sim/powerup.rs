//! Power-ups and their timed reversal.
//!
//! Each timed kind owns its own expiry, so several effects can be active at
//! once and each reverts independently. Re-applying an active kind only
//! extends its expiry; the multiplier is never applied twice, which keeps the
//! divide-back on expiry exact.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUp {
    ExtraLife,
    SpeedBoost,
    Shield,
    TripleBulletCap,
}

impl PowerUp {
    pub const ALL: [PowerUp; 4] = [
        PowerUp::ExtraLife,
        PowerUp::SpeedBoost,
        PowerUp::Shield,
        PowerUp::TripleBulletCap,
    ];

    pub fn is_timed(self) -> bool {
        !matches!(self, PowerUp::ExtraLife)
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUp::ExtraLife => "1UP",
            PowerUp::SpeedBoost => "SPEED",
            PowerUp::Shield => "SHIELD",
            PowerUp::TripleBulletCap => "3xSHOT",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEffect {
    pub kind: PowerUp,
    pub expires_at_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectStart {
    /// Newly active: the caller applies the multiplier.
    Started,
    /// Already active: expiry pushed out, nothing to apply.
    Refreshed,
}

#[derive(Debug, Clone)]
pub struct TimedEffects {
    active: Vec<ActiveEffect>,
    duration_ms: u64,
}

impl TimedEffects {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            active: Vec::new(),
            duration_ms,
        }
    }

    pub fn start(&mut self, kind: PowerUp, now_ms: u64) -> EffectStart {
        let expires_at_ms = now_ms + self.duration_ms;
        if let Some(effect) = self.active.iter_mut().find(|e| e.kind == kind) {
            effect.expires_at_ms = expires_at_ms;
            return EffectStart::Refreshed;
        }
        self.active.push(ActiveEffect { kind, expires_at_ms });
        EffectStart::Started
    }

    /// Remove and return every effect whose deadline has passed.
    pub fn expire(&mut self, now_ms: u64) -> Vec<PowerUp> {
        let mut expired = Vec::new();
        self.active.retain(|e| {
            if now_ms >= e.expires_at_ms {
                expired.push(e.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn is_active(&self, kind: PowerUp) -> bool {
        self.active.iter().any(|e| e.kind == kind)
    }

    pub fn remaining_ms(&self, kind: PowerUp, now_ms: u64) -> Option<u64> {
        self.active
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.expires_at_ms.saturating_sub(now_ms))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.active.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_extends_without_restarting() {
        let mut effects = TimedEffects::new(12_000);
        assert_eq!(effects.start(PowerUp::Shield, 0), EffectStart::Started);
        assert_eq!(effects.start(PowerUp::Shield, 5_000), EffectStart::Refreshed);
        assert!(effects.expire(12_000).is_empty());
        assert_eq!(effects.expire(17_000), vec![PowerUp::Shield]);
        assert!(!effects.is_active(PowerUp::Shield));
    }

    #[test]
    fn distinct_kinds_expire_independently() {
        let mut effects = TimedEffects::new(12_000);
        effects.start(PowerUp::SpeedBoost, 0);
        effects.start(PowerUp::TripleBulletCap, 4_000);
        assert_eq!(effects.expire(12_000), vec![PowerUp::SpeedBoost]);
        assert_eq!(effects.remaining_ms(PowerUp::TripleBulletCap, 12_000), Some(4_000));
        assert_eq!(effects.expire(16_000), vec![PowerUp::TripleBulletCap]);
    }

    #[test]
    fn extra_life_is_instant() {
        assert!(!PowerUp::ExtraLife.is_timed());
        assert!(PowerUp::ALL.iter().filter(|p| p.is_timed()).count() == 3);
    }
}
