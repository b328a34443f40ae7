//! Runtime configuration structures and loaders.
//!
//! Configuration is layered: defaults, then an optional RON file, then
//! `BOTSIM_*` environment variables. Everything is read once when agents are
//! built.
use std::env;
use std::fs;
use std::path::Path;

use behavior_engine::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::BotState;

/// Timings of the per-agent think loop, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Nominal action cooldown. Actions may request longer delays; those are
    /// honored and logged at debug level.
    pub global_cooldown: u32,
    /// Minimum wait after every decision.
    pub react_delay: u32,
    /// Longest an agent in combat may stay without deciding.
    pub max_wait_for_move: u32,
    /// An agent thinks once its remaining delay drops below this.
    pub think_threshold: u32,
}

impl SchedulingConfig {
    pub const DEFAULT_GLOBAL_COOLDOWN: u32 = 500;
    pub const DEFAULT_REACT_DELAY: u32 = 100;
    pub const DEFAULT_MAX_WAIT_FOR_MOVE: u32 = 3000;
    pub const DEFAULT_THINK_THRESHOLD: u32 = 100;
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            global_cooldown: Self::DEFAULT_GLOBAL_COOLDOWN,
            react_delay: Self::DEFAULT_REACT_DELAY,
            max_wait_for_move: Self::DEFAULT_MAX_WAIT_FOR_MOVE,
            think_threshold: Self::DEFAULT_THINK_THRESHOLD,
        }
    }
}

/// Strategy change lists applied to freshly built agents, per state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultStrategies {
    pub combat: String,
    pub non_combat: String,
    pub dead: String,
}

impl DefaultStrategies {
    pub fn for_state(&self, state: BotState) -> &str {
        match state {
            BotState::Combat => &self.combat,
            BotState::NonCombat => &self.non_combat,
            BotState::Dead => &self.dead,
        }
    }
}

/// Configuration shared by every agent of a runtime.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub scheduling: SchedulingConfig,
    pub engine: EngineConfig,
    pub strategies: DefaultStrategies,
}

impl RuntimeConfig {
    /// Parses a RON document; missing fields keep their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Loads `BOTSIM_CONFIG` if set, then applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("BOTSIM_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_ron_file(path)?,
            _ => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BOTSIM_GLOBAL_COOLDOWN` - Upper bound for requested delays (default: 500)
    /// - `BOTSIM_REACT_DELAY` - Minimum wait after a decision (default: 100)
    /// - `BOTSIM_MAX_WAIT_FOR_MOVE` - Longest wait in combat (default: 3000)
    /// - `BOTSIM_THINK_THRESHOLD` - Remaining delay below which agents think (default: 100)
    /// - `BOTSIM_ITERATIONS_PER_TICK` - Pop attempts per queued candidate (default: 4)
    /// - `BOTSIM_MAX_PREREQUISITE_DEPTH` - Prerequisite rounds per candidate (default: 2)
    /// - `BOTSIM_TEST_MODE` - Suppress side effects and keep journals (default: false)
    /// - `BOTSIM_LOG_VALUES` - Trace every value each think (default: false)
    /// - `BOTSIM_COMBAT_STRATEGIES`, `BOTSIM_NON_COMBAT_STRATEGIES`,
    ///   `BOTSIM_DEAD_STRATEGIES` - Strategy change lists per state
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        let scheduling = &mut self.scheduling;
        if let Some(ms) = read_env::<u32>("BOTSIM_GLOBAL_COOLDOWN") {
            scheduling.global_cooldown = ms;
        }
        if let Some(ms) = read_env::<u32>("BOTSIM_REACT_DELAY") {
            scheduling.react_delay = ms;
        }
        if let Some(ms) = read_env::<u32>("BOTSIM_MAX_WAIT_FOR_MOVE") {
            scheduling.max_wait_for_move = ms;
        }
        if let Some(ms) = read_env::<u32>("BOTSIM_THINK_THRESHOLD") {
            scheduling.think_threshold = ms;
        }

        let engine = &mut self.engine;
        if let Some(iterations) = read_env::<u32>("BOTSIM_ITERATIONS_PER_TICK") {
            engine.iterations_per_tick = iterations.max(1);
        }
        if let Some(depth) = read_env::<u8>("BOTSIM_MAX_PREREQUISITE_DEPTH") {
            engine.resolution.max_prerequisite_depth = depth;
        }
        if let Some(enable) = read_env::<bool>("BOTSIM_TEST_MODE") {
            engine.test_mode = enable;
        }
        if let Some(enable) = read_env::<bool>("BOTSIM_LOG_VALUES") {
            engine.log_values_per_tick = enable;
        }

        let strategies = &mut self.strategies;
        if let Ok(changes) = env::var("BOTSIM_COMBAT_STRATEGIES") {
            strategies.combat = changes;
        }
        if let Ok(changes) = env::var("BOTSIM_NON_COMBAT_STRATEGIES") {
            strategies.non_combat = changes;
        }
        if let Ok(changes) = env::var("BOTSIM_DEAD_STRATEGIES") {
            strategies.dead = changes;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduling.think_threshold == 0 {
            return Err(ConfigError::Invalid {
                key: "scheduling.think_threshold",
                reason: "must be positive or no agent ever thinks".to_owned(),
            });
        }
        if self.scheduling.react_delay > self.scheduling.max_wait_for_move {
            return Err(ConfigError::Invalid {
                key: "scheduling.react_delay",
                reason: format!(
                    "{} exceeds max_wait_for_move {}",
                    self.scheduling.react_delay, self.scheduling.max_wait_for_move
                ),
            });
        }
        if self.engine.iterations_per_tick == 0 {
            return Err(ConfigError::Invalid {
                key: "engine.iterations_per_tick",
                reason: "must be at least 1".to_owned(),
            });
        }
        let policy = &self.engine.resolution;
        if policy.retry_bonus >= policy.prerequisite_bonus {
            return Err(ConfigError::Invalid {
                key: "engine.resolution.retry_bonus",
                reason: "must be below prerequisite_bonus so prerequisites run first".to_owned(),
            });
        }
        Ok(())
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
