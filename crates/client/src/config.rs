//! Demo client configuration.
use std::env;
use std::path::PathBuf;

/// Settings of one simulation run.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// World updates to run before exiting.
    pub ticks: u32,
    /// Simulated time per world update, in milliseconds.
    pub tick_ms: u32,
    /// Agents per team.
    pub team_size: u32,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    /// Chat commands delivered to every agent before the first update.
    pub commands: Vec<String>,
}

impl ClientConfig {
    pub const DEFAULT_TICKS: u32 = 200;
    pub const DEFAULT_TICK_MS: u32 = 100;
    pub const DEFAULT_TEAM_SIZE: u32 = 2;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BOTSIM_TICKS` - World updates to run (default: 200)
    /// - `BOTSIM_TICK_MS` - Milliseconds per update (default: 100)
    /// - `BOTSIM_TEAM_SIZE` - Agents per team (default: 2)
    /// - `BOTSIM_SESSION_ID` - Session identifier for log files (default: auto-generated)
    /// - `BOTSIM_LOG_DIR` - Directory for log files (default: stderr only)
    /// - `BOTSIM_COMMANDS` - `;` separated commands sent to every agent
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u32>("BOTSIM_TICKS") {
            config.ticks = ticks;
        }
        if let Some(ms) = read_env::<u32>("BOTSIM_TICK_MS") {
            config.tick_ms = ms.max(1);
        }
        if let Some(size) = read_env::<u32>("BOTSIM_TEAM_SIZE") {
            config.team_size = size.max(1);
        }

        config.session_id = env::var("BOTSIM_SESSION_ID").ok();
        config.log_dir = env::var("BOTSIM_LOG_DIR").ok().map(PathBuf::from);

        if let Ok(commands) = env::var("BOTSIM_COMMANDS") {
            config.commands = commands
                .split(';')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
                .collect();
        }

        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ticks: Self::DEFAULT_TICKS,
            tick_ms: Self::DEFAULT_TICK_MS,
            team_size: Self::DEFAULT_TEAM_SIZE,
            session_id: None,
            log_dir: None,
            commands: Vec::new(),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
