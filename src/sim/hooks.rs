//! Narrow interfaces to the outside world, plus the event type the
//! subsystems use to report back to the session.

use std::sync::mpsc;

use super::geometry::BoundingBox;
use super::powerup::PowerUp;
use super::ship::{EnemyLevel, EntityId, Frame};
use crate::config::GameType;
use crate::scores::ScoreEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    EnemyBlowUp,
    EnemyShoot,
    PlayerBlowUp,
    PlayerShoot,
    GameOver,
    LevelUp,
    PowerUp,
    BonusAppear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Enemy(EnemyLevel, Frame),
    Bonus,
    PlayerBullet,
    EnemyBullet,
}

/// What the renderer needs to draw one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub id: EntityId,
    pub kind: SpriteKind,
    pub bounds: BoundingBox,
}

pub trait Renderer {
    fn place(&mut self, sprite: &Sprite, x: f32, y: f32);
    /// The entity is gone. `sprite` carries its last position; `explode`
    /// is set when it was destroyed rather than retired.
    fn remove(&mut self, sprite: &Sprite, explode: bool);
    fn set_visible(&mut self, id: EntityId, visible: bool);
}

/// Fire-and-forget sound playback.
pub trait AudioCue {
    fn play(&mut self, cue: Cue, variant: GameType);
}

pub trait ScoreRecorder {
    fn add_score(&mut self, points: u32);
    fn top(&self, n: usize) -> Vec<ScoreEntry>;
    fn record(&mut self, name: &str, score: u32, level: u32);
}

pub trait SessionNavigator {
    fn game_over(&mut self, outcome: Outcome, final_score: u32);
    fn level_complete(&mut self, level: u32);
}

/// Collaborators borrowed for the duration of one update.
pub struct Hooks<'a> {
    pub audio: &'a mut dyn AudioCue,
    pub scores: &'a mut dyn ScoreRecorder,
    pub navigator: &'a mut dyn SessionNavigator,
}

/// Audio backend that only logs. The terminal front end has no mixer.
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioCue for LogAudio {
    fn play(&mut self, cue: Cue, variant: GameType) {
        tracing::trace!(?cue, %variant, "audio cue");
    }
}

/// Something a subsystem wants the session to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Cue(Cue),
    Scored(u32),
    Removed { sprite: Sprite, explode: bool },
    FormationCleared,
    PlayerDefeated,
    BonusDestroyed,
    PowerUpExpired(PowerUp),
}

pub type Outbox = mpsc::Sender<GameEvent>;

pub(crate) fn emit(outbox: &Outbox, event: GameEvent) {
    // The session owns the receiver; a closed channel means it is gone.
    if outbox.send(event).is_err() {
        tracing::trace!("event dropped after session teardown");
    }
}
