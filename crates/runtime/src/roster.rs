//! The set of agents sharing one world.
//!
//! The roster owns the registry and configuration every agent is built from
//! and drives all agents once per world update, in ascending id order.

use std::collections::BTreeMap;
use std::sync::Arc;

use behavior_engine::{BehaviorRegistry, EntityId};
use tracing::{debug, info};

use crate::agent::{Agent, TickOutcome};
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};

pub struct Roster<W> {
    registry: Arc<BehaviorRegistry<W>>,
    config: RuntimeConfig,
    agents: BTreeMap<EntityId, Agent<W>>,
}

impl<W: 'static> Roster<W> {
    pub fn new(registry: Arc<BehaviorRegistry<W>>, config: RuntimeConfig) -> Self {
        Self {
            registry,
            config,
            agents: BTreeMap::new(),
        }
    }

    /// Builds an agent from the shared registry and configuration.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateAgent`] if `id` is taken, or any error of
    /// [`Agent::new`].
    pub fn spawn(&mut self, id: EntityId) -> Result<&mut Agent<W>> {
        if self.agents.contains_key(&id) {
            return Err(RuntimeError::DuplicateAgent(id));
        }
        let agent = Agent::new(id, Arc::clone(&self.registry), &self.config)?;
        info!(target: "runtime::roster", agent = %id, "agent spawned");
        Ok(self.agents.entry(id).or_insert(agent))
    }

    /// Adds an agent built elsewhere.
    pub fn add(&mut self, agent: Agent<W>) -> Result<()> {
        let id = agent.id();
        if self.agents.contains_key(&id) {
            return Err(RuntimeError::DuplicateAgent(id));
        }
        self.agents.insert(id, agent);
        Ok(())
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Agent<W>> {
        let agent = self.agents.remove(&id);
        if agent.is_some() {
            info!(target: "runtime::roster", agent = %id, "agent removed");
        }
        agent
    }

    pub fn get(&self, id: EntityId) -> Option<&Agent<W>> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Agent<W>> {
        self.agents.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent<W>> {
        self.agents.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent<W>> {
        self.agents.values_mut()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<BehaviorRegistry<W>> {
        &self.registry
    }

    /// Advances every agent by `elapsed_ms` against the same world.
    pub fn update(&mut self, elapsed_ms: u32, world: &mut W) -> Vec<(EntityId, TickOutcome)> {
        let outcomes: Vec<_> = self
            .agents
            .iter_mut()
            .map(|(id, agent)| (*id, agent.update(elapsed_ms, world)))
            .collect();

        let thought = outcomes
            .iter()
            .filter(|(_, outcome)| outcome.decision().is_some())
            .count();
        debug!(target: "runtime::roster", agents = outcomes.len(), thought, elapsed_ms, "update");
        outcomes
    }
}
