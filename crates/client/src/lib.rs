//! Arena demo driving a roster of agents.
//!
//! # Architecture
//!
//! ```text
//! Simulation (composition root)
//!   ├─→ Arena (world state the agents act on)
//!   └─→ Roster (one Agent per unit, engines per BotState)
//!         └─→ BehaviorRegistry (arena values, triggers, actions, strategies)
//! ```
//!
//! Every world update the simulation regenerates the arena, moves each agent
//! into the state its unit is in, then lets the roster think.

pub mod arena;
pub mod behaviors;
pub mod config;

mod builder;

pub use builder::SimulationBuilder;

use behavior_engine::EntityId;
use runtime::{Roster, TickOutcome};
use tracing::{debug, info};

use crate::arena::{Arena, Team};

/// Totals of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u32,
    pub decisions: usize,
    pub state_changes: usize,
    pub red_alive: usize,
    pub blue_alive: usize,
}

pub struct Simulation {
    arena: Arena,
    roster: Roster<Arena>,
    tick_ms: u32,
    elapsed_ms: u64,
}

impl Simulation {
    /// Create a new SimulationBuilder.
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn roster(&self) -> &Roster<Arena> {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster<Arena> {
        &mut self.roster
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Queues a chat command on every agent; it applies on their next think.
    pub fn broadcast(&mut self, command: &str, owner: Option<EntityId>) {
        for agent in self.roster.iter_mut() {
            agent.queue_command(command, owner);
        }
    }

    /// Runs one world update.
    ///
    /// # Returns
    ///
    /// `(decisions, state_changes)` of this update.
    pub fn step(&mut self) -> (usize, usize) {
        self.arena.regenerate(self.tick_ms);

        let mut state_changes = 0;
        for agent in self.roster.iter_mut() {
            if agent.change_state(self.arena.bot_state(agent.id())) {
                state_changes += 1;
            }
        }

        let outcomes = self.roster.update(self.tick_ms, &mut self.arena);
        self.elapsed_ms += u64::from(self.tick_ms);

        let mut decisions = 0;
        for (id, outcome) in &outcomes {
            let TickOutcome::Thought(decision) = outcome else {
                continue;
            };
            if let Some(action) = &decision.action {
                decisions += 1;
                debug!(
                    target: "client::simulation",
                    at_ms = self.elapsed_ms,
                    agent = %id,
                    action = %action,
                    relevance = decision.relevance,
                    "decision"
                );
            }
        }
        (decisions, state_changes)
    }

    /// Runs `ticks` world updates.
    pub fn run(&mut self, ticks: u32) -> RunSummary {
        let mut summary = RunSummary {
            ticks,
            decisions: 0,
            state_changes: 0,
            red_alive: 0,
            blue_alive: 0,
        };
        for _ in 0..ticks {
            let (decisions, state_changes) = self.step();
            summary.decisions += decisions;
            summary.state_changes += state_changes;
        }
        summary.red_alive = self.arena.alive(Team::Red);
        summary.blue_alive = self.arena.alive(Team::Blue);

        info!(
            target: "client::simulation",
            ticks,
            elapsed_ms = self.elapsed_ms,
            decisions = summary.decisions,
            state_changes = summary.state_changes,
            red_alive = summary.red_alive,
            blue_alive = summary.blue_alive,
            "run finished"
        );
        summary
    }
}
