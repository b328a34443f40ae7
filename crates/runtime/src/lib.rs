//! Agent runtime on top of the behavior engine.
//!
//! This crate turns per-state engines into agents that think on a throttled
//! clock, react to chat-style commands and live together in a roster.
//!
//! Modules are organized by responsibility:
//! - [`agent`] hosts a single agent and its per-state engines
//! - [`roster`] drives every agent of a world
//! - [`scheduler`] implements the think delay
//! - [`command`] parses free-text commands
//! - [`config`] loads timings and default strategy lists
pub mod agent;
pub mod command;
pub mod config;
pub mod error;
pub mod roster;
pub mod scheduler;
pub mod state;

pub use agent::{Agent, TickOutcome};
pub use command::{Command, parse_command};
pub use config::{DefaultStrategies, RuntimeConfig, SchedulingConfig};
pub use error::{ConfigError, Result, RuntimeError};
pub use roster::Roster;
pub use scheduler::ThinkClock;
pub use state::BotState;
