//! The simulation core: formation, projectiles, player team, bonus ship
//! and the session that drives them on a simulated clock.

pub mod bonus;
pub mod cadence;
pub mod formation;
pub mod geometry;
pub mod hooks;
pub mod level;
pub mod pattern;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod session;
pub mod ship;

pub use hooks::{AudioCue, Cue, GameEvent, Hooks, Outcome, Renderer, ScoreRecorder, SessionNavigator, Sprite, SpriteKind};
pub use player::Steer;
pub use session::{Phase, Session};
