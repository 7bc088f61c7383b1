//! Error types
//!
//! Nothing inside the simulation is fatal. Fire and launch errors are
//! recoverable skips; store and config errors belong to the collaborators.

use thiserror::Error;

/// Why a fire request produced no shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FireError {
    #[error("play is frozen")]
    Frozen,
    #[error("weapon is cooling down")]
    CoolingDown,
    #[error("no idle projectile in the pool")]
    ResourceUnavailable,
}

/// Why a projectile refused to launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("play is frozen")]
    Frozen,
    #[error("projectile is still in use")]
    NotIdle,
}

impl From<LaunchError> for FireError {
    fn from(e: LaunchError) -> Self {
        match e {
            LaunchError::Frozen => FireError::Frozen,
            LaunchError::NotIdle => FireError::ResourceUnavailable,
        }
    }
}

/// Rejected player name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("The name you have entered is too long. ({len} > {max} characters)")]
    TooLong { len: usize, max: usize },
}

/// High score store failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score store is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session configuration failed to load
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
}
