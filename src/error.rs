use thiserror::Error;

/// Failures raised while building a session. Gameplay itself never errors:
/// missing targets and empty candidate sets are no-ops.
#[derive(Debug, Error)]
pub enum GalagaError {
    #[error("unsupported enemy level: {0} (expected 1..=4)")]
    UnsupportedEnemyLevel(u8),

    #[error("unsupported level tier: {0}")]
    UnsupportedLevelTier(u32),

    #[error("unsupported game type: {0:?}")]
    UnsupportedGameType(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GalagaError>;
