//! Errors surfaced by the agent runtime.
//!
//! Wraps engine administration failures and configuration loading so the
//! binary can bubble them up with consistent context.
use std::path::PathBuf;

use behavior_engine::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("agent {0} is already in the roster")]
    DuplicateAgent(behavior_engine::EntityId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}
