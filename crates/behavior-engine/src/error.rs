//! Errors surfaced by strategy administration and registry loading.
//!
//! Nothing inside an evaluation pass returns these: an unknown name met while
//! deciding is logged and skipped.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),

    #[error("malformed strategy change `{token}`: expected +name, -name, ~name or ?")]
    MalformedStrategyChange { token: String },

    #[error("strategy `{strategy}` references unknown {kind} `{name}`")]
    UnknownReference {
        strategy: String,
        kind: &'static str,
        name: String,
    },

    #[error("failed to parse strategy definitions")]
    Parse(#[from] ron::error::SpannedError),
}
