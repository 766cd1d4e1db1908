pub mod config;
pub mod error;
pub mod scores;
pub mod sim;

pub use config::{GameConfig, GameType};
pub use error::{GalagaError, Result};
