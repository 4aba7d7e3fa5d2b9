use thiserror::Error;

#[derive(Error, Debug)]
pub enum TycoonError {
    #[error("Corrupted save: {0}")]
    Validation(String),

    #[error("Save could not be parsed: {0}")]
    Parse(String),

    #[error("Save schema version {found} is incompatible with current version {current}")]
    VersionMismatch { found: u32, current: u32 },

    #[error("Storage unavailable: {0}")]
    Storage(String),

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("Unknown upgrade: {0}")]
    UnknownUpgrade(String),

    #[error("Upgrade is still locked: {0}")]
    UpgradeLocked(String),

    #[error("Upgrade already at max level: {0}")]
    UpgradeMaxed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl TycoonError {
    /// Whether the caller can recover by falling back to a backup or a fresh game.
    ///
    /// Only a schema version with no migration path is fatal for a save slot.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, TycoonError::VersionMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, TycoonError>;
