//! Simulation builder.

use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::{Roster, RuntimeConfig};
use tracing::info;

use crate::Simulation;
use crate::arena::Arena;
use crate::behaviors;
use crate::config::ClientConfig;

/// Builder for constructing a [`Simulation`].
///
/// Every part is optional: the runtime and client configuration fall back to
/// their defaults and the arena to a skirmish sized by
/// [`ClientConfig::team_size`].
#[derive(Default)]
pub struct SimulationBuilder {
    runtime: Option<RuntimeConfig>,
    client: Option<ClientConfig>,
    arena: Option<Arena>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runtime(mut self, config: RuntimeConfig) -> Self {
        self.runtime = Some(config);
        self
    }

    pub fn client(mut self, config: ClientConfig) -> Self {
        self.client = Some(config);
        self
    }

    pub fn arena(mut self, arena: Arena) -> Self {
        self.arena = Some(arena);
        self
    }

    /// Builds the registry and spawns one agent per arena unit.
    ///
    /// Per-state strategy lists left empty in the runtime configuration get
    /// the arena bundles. Configured commands are queued on every agent.
    pub fn build(self) -> Result<Simulation> {
        let mut runtime = self.runtime.unwrap_or_default();
        behaviors::fill_default_strategies(&mut runtime.strategies);
        let client = self.client.unwrap_or_default();
        let arena = self
            .arena
            .unwrap_or_else(|| Arena::skirmish(client.team_size));

        let registry =
            behaviors::registry(&runtime.scheduling).context("failed to build arena behaviors")?;
        let mut roster = Roster::new(Arc::new(registry), runtime);
        for id in arena.ids() {
            roster
                .spawn(id)
                .with_context(|| format!("failed to spawn agent {id}"))?;
        }
        info!(target: "client::simulation", agents = roster.len(), "roster ready");

        let mut simulation = Simulation {
            arena,
            roster,
            tick_ms: client.tick_ms.max(1),
            elapsed_ms: 0,
        };
        for command in &client.commands {
            simulation.broadcast(command, None);
        }
        Ok(simulation)
    }
}
