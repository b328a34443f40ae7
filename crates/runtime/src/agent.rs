//! A single autonomous agent.
//!
//! An agent owns one [`Engine`] per [`BotState`], one value context shared by
//! those engines and a [`ThinkClock`]. Every world update:
//!
//! 1. The clock counts down by the elapsed time (clamped while in combat)
//! 2. If the agent may think, queued commands are applied and the engine of
//!    the current state runs one evaluation pass
//! 3. The delay requested by the executed action is applied, then floored at
//!    the react delay
//!
//! Switching state is the only cancellation point: the old engine's queue
//! and carried work are dropped together with the pending delay.

use std::collections::VecDeque;
use std::sync::Arc;

use behavior_engine::{
    ActionResult, BehaviorRegistry, Decision, Engine, EntityId, Event, ExecutionListener,
    StrategyType, ValueContext,
};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::command::{Command, parse_command};
use crate::config::{DefaultStrategies, RuntimeConfig, SchedulingConfig};
use crate::error::Result;
use crate::scheduler::ThinkClock;
use crate::state::BotState;

/// What one world update did for an agent.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// The agent is still waiting.
    Waiting { remaining_ms: u32 },
    /// The agent ran an evaluation pass.
    Thought(Decision),
}

impl TickOutcome {
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            TickOutcome::Thought(decision) => Some(decision),
            TickOutcome::Waiting { .. } => None,
        }
    }
}

#[derive(Clone, Debug)]
struct PendingCommand {
    text: String,
    owner: Option<EntityId>,
}

pub struct Agent<W> {
    id: EntityId,
    state: BotState,
    engines: Vec<Engine<W>>,
    values: ValueContext<W>,
    clock: ThinkClock,
    scheduling: SchedulingConfig,
    defaults: DefaultStrategies,
    commands: VecDeque<PendingCommand>,
}

impl<W: 'static> Agent<W> {
    /// Builds an agent and applies the configured strategy lists per state.
    ///
    /// # Errors
    ///
    /// Fails if a configured strategy list names an unknown strategy or is
    /// malformed.
    pub fn new(
        id: EntityId,
        registry: Arc<BehaviorRegistry<W>>,
        config: &RuntimeConfig,
    ) -> Result<Self> {
        let engines = BotState::iter()
            .map(|_| Engine::new(Arc::clone(&registry), config.engine.clone()))
            .collect();

        let mut agent = Self {
            id,
            state: BotState::NonCombat,
            engines,
            values: ValueContext::new(id, registry),
            clock: ThinkClock::new(config.scheduling.clone()),
            scheduling: config.scheduling.clone(),
            defaults: config.strategies.clone(),
            commands: VecDeque::new(),
        };
        agent.apply_default_strategies()?;
        Ok(agent)
    }

    fn apply_default_strategies(&mut self) -> Result<()> {
        for state in BotState::iter() {
            let engine = &mut self.engines[state.index()];
            engine.remove_all_strategies();
            let changes = self.defaults.for_state(state);
            if !changes.is_empty() {
                engine.change_strategy(changes)?;
            }
        }
        Ok(())
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    pub fn engine(&self, state: BotState) -> &Engine<W> {
        &self.engines[state.index()]
    }

    pub fn engine_mut(&mut self, state: BotState) -> &mut Engine<W> {
        &mut self.engines[state.index()]
    }

    pub fn values(&self) -> &ValueContext<W> {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ValueContext<W> {
        &mut self.values
    }

    pub fn clock(&self) -> &ThinkClock {
        &self.clock
    }

    /// Advances the agent by `elapsed_ms` of world time.
    pub fn update(&mut self, elapsed_ms: u32, world: &mut W) -> TickOutcome {
        if self.state == BotState::Combat {
            self.clock.clamp(self.scheduling.max_wait_for_move);
        }
        self.clock.advance(elapsed_ms);
        if !self.clock.can_think() {
            return TickOutcome::Waiting {
                remaining_ms: self.clock.next_check_delay(),
            };
        }

        while let Some(command) = self.commands.pop_front() {
            if !self.handle_command(&command.text, command.owner, world) {
                warn!(target: "runtime::agent", agent = %self.id, command = %command.text, "unknown command");
            }
        }

        let decision = self.engines[self.state.index()].do_next_action(world, &mut self.values);
        if let Some(delay) = decision.next_check_delay {
            self.clock.set_next_check_delay(delay);
        }
        self.clock.yield_think();

        debug!(
            target: "runtime::agent",
            agent = %self.id,
            state = %self.state,
            action = decision.action.as_ref().map(|a| a.as_str()).unwrap_or("-"),
            relevance = decision.relevance,
            next_check_delay = self.clock.next_check_delay(),
            "think"
        );
        TickOutcome::Thought(decision)
    }

    /// Switches the current state.
    ///
    /// The old engine's queued work is cancelled, the pending delay dropped
    /// and the new engine re-initialized. Returns `false` if already there.
    pub fn change_state(&mut self, state: BotState) -> bool {
        if self.state == state {
            return false;
        }
        info!(target: "runtime::agent", agent = %self.id, from = %self.state, to = %state, "state change");

        self.engines[self.state.index()].cancel();
        self.state = state;
        self.clock.reset();
        self.engines[state.index()].init();
        true
    }

    /// Resets values, delay and every engine, returning to `NonCombat`.
    pub fn reset(&mut self) {
        info!(target: "runtime::agent", agent = %self.id, "reset");
        self.values.reset();
        self.clock.reset();
        self.commands.clear();
        self.state = BotState::NonCombat;
        for engine in &mut self.engines {
            engine.init();
        }
    }

    /// Restores the configured strategy lists on every engine.
    pub fn reset_strategies(&mut self) -> Result<()> {
        self.apply_default_strategies()
    }

    /// Applies a strategy change list to the engine of `state`.
    pub fn change_strategy(&mut self, changes: &str, state: BotState) -> Result<()> {
        self.engines[state.index()].change_strategy(changes)?;
        Ok(())
    }

    pub fn has_strategy(&self, name: &str, state: BotState) -> bool {
        self.engine(state).has_strategy(name)
    }

    /// Whether any engine runs a strategy tagged with `kind`.
    pub fn contains_strategy(&self, kind: StrategyType) -> bool {
        self.engines.iter().any(|engine| engine.contains_strategy(kind))
    }

    /// Runs an action by name on the first engine that knows it, starting
    /// with the current state.
    pub fn do_specific_action(&mut self, name: &str, world: &mut W) -> ActionResult {
        let current = self.state;
        let order = std::iter::once(current).chain(BotState::iter().filter(|s| *s != current));
        for state in order {
            let outcome =
                self.engines[state.index()].execute_action(name, world, &mut self.values);
            if !outcome.result.is_known() {
                continue;
            }
            if let Some(delay) = outcome.next_check_delay {
                self.clock.set_next_check_delay(delay);
            }
            return outcome.result;
        }
        ActionResult::Unknown
    }

    /// Delivers an external event to every engine with a trigger of that name.
    pub fn handle_external(&mut self, trigger: &str, event: Event) -> bool {
        let mut delivered = false;
        for engine in &mut self.engines {
            delivered |= engine.external_event(trigger, event.clone());
        }
        delivered
    }

    /// Whether any engine has an active trigger named `name`.
    pub fn has_trigger(&self, name: &str) -> bool {
        self.engines.iter().any(|engine| engine.has_trigger(name))
    }

    /// Queues a command for the next think.
    pub fn queue_command(&mut self, text: impl Into<String>, owner: Option<EntityId>) {
        self.commands.push_back(PendingCommand {
            text: text.into(),
            owner,
        });
    }

    /// Applies a chat-style command right away.
    ///
    /// Returns `false` if the command matched nothing.
    pub fn handle_command(&mut self, text: &str, owner: Option<EntityId>, world: &mut W) -> bool {
        match parse_command(text, |name| self.has_trigger(name)) {
            Command::DoAction(action) => {
                let result = self.do_specific_action(&action, world);
                info!(target: "runtime::agent", agent = %self.id, action = %action, %result, "do");
                result.is_known()
            }
            Command::Reset => {
                self.reset();
                true
            }
            Command::Trigger { name, param } => {
                let mut event = Event::empty();
                if let Some(param) = param {
                    event = event.with_param(param);
                }
                if let Some(owner) = owner {
                    event = event.with_owner(owner);
                }
                self.handle_external(&name, event)
            }
            Command::Unknown(_) => false,
        }
    }

    /// Passes work to the scheduler, e.g. after an externally started cast.
    pub fn set_next_check_delay(&mut self, delay_ms: u32) {
        self.clock.set_next_check_delay(delay_ms);
    }

    pub fn increase_check_delay(&mut self, delay_ms: u32) {
        self.clock.increase_check_delay(delay_ms);
    }

    pub fn add_listener(&mut self, state: BotState, listener: Box<dyn ExecutionListener<W>>) {
        self.engines[state.index()].add_listener(listener);
    }

    /// The formatted value context, for diagnostics.
    pub fn format_values(&self) -> Vec<(String, String)> {
        self.values.format_all()
    }
}
