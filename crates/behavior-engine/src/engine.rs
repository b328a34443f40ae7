//! The decision engine.
//!
//! One [`Engine`] per agent and behavioral state. Each call to
//! [`Engine::do_next_action`] runs a full evaluation pass and executes at
//! most one action:
//!
//! 1. Clear the queue, advance the value context, re-queue continuations
//!    carried over from the previous pass
//! 2. Check every due trigger; fired triggers push their actions through the
//!    multipliers
//! 3. Push default actions of strategies none of whose triggers fired
//! 4. Pop and resolve candidates until one executes, the queue runs dry, or
//!    the iteration budget is spent
//!
//! Resolution of a popped candidate follows [`ResolutionPolicy`]:
//! prerequisites are offered before the candidate is retried, a candidate
//! that does not run falls back to its alternatives within the same pass, and
//! continuations of a success are carried to the next pass.

use std::collections::HashMap;
use std::mem;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::action::{Action, ActionNode};
use crate::context::{ActionContext, Observation};
use crate::error::{EngineError, Result};
use crate::event::Event;
use crate::listener::{ExecutionListener, ListenerChain};
use crate::multiplier::Multiplier;
use crate::name::{ActionName, StrategyName};
use crate::queue::{ActionBasket, Queue};
use crate::registry::BehaviorRegistry;
use crate::relevance::{NextAction, RelevanceTiers};
use crate::status::ActionResult;
use crate::strategy::{Strategy, StrategyType};
use crate::trigger::Trigger;
use crate::value::ValueContext;

/// Relevance bonuses and bounds used while resolving a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionPolicy {
    /// Added to the candidate's relevance for its prerequisites.
    pub prerequisite_bonus: f32,
    /// Added to the candidate's relevance when it is queued again after
    /// offering prerequisites. Must stay below `prerequisite_bonus`.
    pub retry_bonus: f32,
    /// Added to the candidate's relevance for its alternatives.
    pub alternative_bonus: f32,
    /// How many times one candidate may offer its prerequisites per pass.
    pub max_prerequisite_depth: u8,
    /// Whether a useless candidate falls back to its alternatives.
    pub alternatives_on_useless: bool,
}

impl ResolutionPolicy {
    pub const DEFAULT_PREREQUISITE_BONUS: f32 = 0.02;
    pub const DEFAULT_RETRY_BONUS: f32 = 0.01;
    pub const DEFAULT_ALTERNATIVE_BONUS: f32 = 0.03;
    pub const DEFAULT_MAX_PREREQUISITE_DEPTH: u8 = 2;

    /// Whether a candidate that ended with `result` offers its alternatives.
    pub fn falls_back(&self, result: ActionResult) -> bool {
        result.wants_alternatives()
            && (self.alternatives_on_useless || result != ActionResult::Useless)
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            prerequisite_bonus: Self::DEFAULT_PREREQUISITE_BONUS,
            retry_bonus: Self::DEFAULT_RETRY_BONUS,
            alternative_bonus: Self::DEFAULT_ALTERNATIVE_BONUS,
            max_prerequisite_depth: Self::DEFAULT_MAX_PREREQUISITE_DEPTH,
            alternatives_on_useless: true,
        }
    }
}

/// Engine tuning, read once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pop attempts per queued candidate before a pass gives up.
    pub iterations_per_tick: u32,
    /// Check every trigger on every pass, skip side effects and keep a journal.
    pub test_mode: bool,
    /// Dump the value context at trace level on every pass.
    pub log_values_per_tick: bool,
    pub tiers: RelevanceTiers,
    pub resolution: ResolutionPolicy,
}

impl EngineConfig {
    pub const DEFAULT_ITERATIONS_PER_TICK: u32 = 4;
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            iterations_per_tick: Self::DEFAULT_ITERATIONS_PER_TICK,
            test_mode: false,
            log_values_per_tick: false,
            tiers: RelevanceTiers::default(),
            resolution: ResolutionPolicy::default(),
        }
    }
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// The executed action, if any.
    pub action: Option<ActionName>,
    pub relevance: f32,
    /// Think delay requested by the executed action.
    pub next_check_delay: Option<u32>,
}

impl Decision {
    fn idle() -> Self {
        Self {
            action: None,
            relevance: 0.0,
            next_check_delay: None,
        }
    }

    pub fn executed(&self) -> bool {
        self.action.is_some()
    }
}

/// Outcome of executing an action by name, outside the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectOutcome {
    pub result: ActionResult,
    pub next_check_delay: Option<u32>,
}

struct ActiveTrigger<W> {
    strategy: usize,
    trigger: Box<dyn Trigger<W>>,
    actions: Vec<NextAction>,
    passes_since_check: u32,
}

struct ActiveStrategy {
    strategy: Strategy,
    defaults: Vec<NextAction>,
}

enum Step {
    Executed(ActionName, f32),
    Continue,
}

/// Decides and executes the next action of one agent in one state.
pub struct Engine<W> {
    registry: Arc<BehaviorRegistry<W>>,
    config: EngineConfig,
    strategies: Vec<ActiveStrategy>,
    triggers: Vec<ActiveTrigger<W>>,
    multipliers: Vec<Box<dyn Multiplier<W>>>,
    actions: HashMap<ActionName, Box<dyn Action<W>>>,
    queue: Queue,
    carried: Vec<(NextAction, Event)>,
    listeners: ListenerChain<W>,
    last_action: Option<ActionName>,
    last_relevance: f32,
    journal: Vec<String>,
}

impl<W: 'static> Engine<W> {
    pub fn new(registry: Arc<BehaviorRegistry<W>>, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            strategies: Vec::new(),
            triggers: Vec::new(),
            multipliers: Vec::new(),
            actions: HashMap::new(),
            queue: Queue::new(),
            carried: Vec::new(),
            listeners: ListenerChain::new(),
            last_action: None,
            last_relevance: 0.0,
            journal: Vec::new(),
        }
    }

    /// Rebuilds every piece of transient state from the active strategies.
    ///
    /// Clears the queue, carried continuations, the journal and every trigger
    /// and multiplier instance, then instantiates the triggers and multipliers
    /// the active strategies name.
    pub fn init(&mut self) {
        self.queue.clear();
        self.carried.clear();
        self.journal.clear();
        self.triggers.clear();
        self.multipliers.clear();
        self.actions.clear();

        for (index, active) in self.strategies.iter().enumerate() {
            for node in &active.strategy.triggers {
                let Some(trigger) = self.registry.create_trigger(node.trigger.as_str()) else {
                    warn!(
                        target: "behavior::engine",
                        strategy = %active.strategy.name,
                        trigger = %node.trigger,
                        "unknown trigger"
                    );
                    continue;
                };
                self.triggers.push(ActiveTrigger {
                    strategy: index,
                    trigger,
                    actions: node
                        .actions
                        .iter()
                        .map(|def| def.resolve(&self.config.tiers))
                        .collect(),
                    passes_since_check: u32::MAX,
                });
            }

            for name in &active.strategy.multipliers {
                if self.multipliers.iter().any(|m| m.name() == name.as_str()) {
                    continue;
                }
                match self.registry.create_multiplier(name.as_str()) {
                    Some(multiplier) => self.multipliers.push(multiplier),
                    None => warn!(
                        target: "behavior::engine",
                        strategy = %active.strategy.name,
                        multiplier = %name,
                        "unknown multiplier"
                    ),
                }
            }
        }

        debug!(
            target: "behavior::engine",
            strategies = self.strategies.len(),
            triggers = self.triggers.len(),
            multipliers = self.multipliers.len(),
            "engine initialized"
        );
    }

    /// Drops queued and carried work without touching strategy membership.
    pub fn cancel(&mut self) {
        self.queue.clear();
        self.carried.clear();
        for slot in &mut self.triggers {
            slot.trigger.reset();
        }
    }

    // ---------------------------------------------------------------------
    // Strategy administration
    // ---------------------------------------------------------------------

    /// Activates a registered strategy. Adding an active strategy moves it to
    /// the end of the evaluation order.
    pub fn add_strategy(&mut self, name: &str) -> Result<()> {
        self.activate(name)?;
        info!(target: "behavior::engine", strategy = name, "strategy added");
        self.init();
        Ok(())
    }

    /// Deactivates a strategy. Returns `false` if it was not active.
    pub fn remove_strategy(&mut self, name: &str) -> bool {
        if !self.deactivate(name) {
            return false;
        }
        info!(target: "behavior::engine", strategy = name, "strategy removed");
        self.init();
        true
    }

    /// Flips membership of a strategy and returns whether it is now active.
    pub fn toggle_strategy(&mut self, name: &str) -> Result<bool> {
        if self.remove_strategy(name) {
            Ok(false)
        } else {
            self.add_strategy(name)?;
            Ok(true)
        }
    }

    pub fn has_strategy(&self, name: &str) -> bool {
        self.strategies.iter().any(|s| s.strategy.name == name)
    }

    pub fn remove_all_strategies(&mut self) {
        self.strategies.clear();
        self.init();
    }

    /// Active strategy names in evaluation order.
    pub fn strategy_names(&self) -> Vec<&StrategyName> {
        self.strategies.iter().map(|s| &s.strategy.name).collect()
    }

    /// Human readable list, e.g. `Strategies: heal, dps`.
    pub fn list_strategies(&self) -> String {
        let names: Vec<&str> = self
            .strategies
            .iter()
            .map(|s| s.strategy.name.as_str())
            .collect();
        format!("Strategies: {}", names.join(", "))
    }

    /// Whether any active strategy carries all of `kind`.
    pub fn contains_strategy(&self, kind: StrategyType) -> bool {
        self.strategies
            .iter()
            .any(|s| !s.strategy.kind.is_empty() && s.strategy.kind.contains(kind))
    }

    /// Applies a comma separated change list such as `+heal,-dps,~flee,?`.
    ///
    /// - `+name` adds, `-name` removes, `~name` toggles
    /// - `?` logs the active list
    ///
    /// Every token is validated before anything changes, so a bad token
    /// leaves the active set untouched.
    pub fn change_strategy(&mut self, changes: &str) -> Result<()> {
        let mut ops: Vec<(char, &str)> = Vec::new();
        for token in changes.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let mut chars = token.chars();
            let op = chars.next().unwrap_or_default();
            let name = chars.as_str().trim();
            match op {
                '?' if name.is_empty() => {}
                '+' | '-' | '~' if !name.is_empty() => {
                    if op != '-' && self.registry.strategy(name).is_none() {
                        return Err(EngineError::UnknownStrategy(name.to_owned()));
                    }
                }
                _ => {
                    return Err(EngineError::MalformedStrategyChange {
                        token: token.to_owned(),
                    });
                }
            }
            ops.push((op, name));
        }

        let mut changed = false;
        for (op, name) in ops {
            match op {
                '+' => {
                    self.activate(name)?;
                    changed = true;
                }
                '-' => changed |= self.deactivate(name),
                '~' => {
                    if !self.deactivate(name) {
                        self.activate(name)?;
                    }
                    changed = true;
                }
                _ => info!(target: "behavior::engine", "{}", self.list_strategies()),
            }
        }

        if changed {
            info!(
                target: "behavior::engine",
                changes,
                active = %self.list_strategies(),
                "strategies changed"
            );
            self.init();
        }
        Ok(())
    }

    fn activate(&mut self, name: &str) -> Result<()> {
        let strategy = self
            .registry
            .strategy(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownStrategy(name.to_owned()))?;
        self.deactivate(name);

        let defaults = strategy
            .defaults
            .iter()
            .map(|def| def.resolve(&self.config.tiers))
            .collect();
        self.strategies.push(ActiveStrategy { strategy, defaults });
        Ok(())
    }

    fn deactivate(&mut self, name: &str) -> bool {
        let before = self.strategies.len();
        self.strategies.retain(|s| s.strategy.name != name);
        before != self.strategies.len()
    }

    // ---------------------------------------------------------------------
    // Listeners
    // ---------------------------------------------------------------------

    pub fn add_listener(&mut self, listener: Box<dyn ExecutionListener<W>>) {
        self.listeners.add(listener);
    }

    pub fn remove_listener(&mut self, name: &str) -> bool {
        self.listeners.remove(name)
    }

    // ---------------------------------------------------------------------
    // Evaluation
    // ---------------------------------------------------------------------

    /// Runs one full evaluation pass and executes at most one action.
    pub fn do_next_action(&mut self, world: &mut W, values: &mut ValueContext<W>) -> Decision {
        self.evaluate(world, values);

        let budget = self
            .queue
            .len()
            .max(1)
            .saturating_mul(self.config.iterations_per_tick as usize);
        let mut next_check_delay = None;
        let mut outcome = None;
        let mut iterations = 0usize;

        while !self.queue.is_empty() {
            if iterations >= budget {
                debug!(
                    target: "behavior::engine",
                    budget,
                    pending = self.queue.len(),
                    "iteration budget spent"
                );
                break;
            }
            iterations += 1;

            let Some(basket) = self.queue.pop() else {
                break;
            };
            if let Step::Executed(name, relevance) =
                self.resolve(basket, world, values, &mut next_check_delay)
            {
                outcome = Some((name, relevance));
                break;
            }
        }

        match outcome {
            Some((name, relevance)) => {
                self.last_action = Some(name.clone());
                self.last_relevance = relevance;
                Decision {
                    action: Some(name),
                    relevance,
                    next_check_delay,
                }
            }
            None => {
                self.last_relevance = 0.0;
                self.note("no action executed".to_owned());
                Decision {
                    next_check_delay,
                    ..Decision::idle()
                }
            }
        }
    }

    /// Builds the candidate queue for this pass without executing anything.
    ///
    /// Advances the value context by one tick. Returns the queue length.
    pub fn evaluate(&mut self, world: &W, values: &mut ValueContext<W>) -> usize {
        self.queue.clear();
        values.update();

        if self.config.log_values_per_tick {
            for (name, value) in values.format_all() {
                trace!(target: "behavior::values", agent = %values.owner(), name = %name, value = %value);
            }
        }

        for (next, event) in mem::take(&mut self.carried) {
            self.push_candidates(&[next], None, &event, world, values);
        }

        let fired = self.process_triggers(world, values);

        for index in 0..self.strategies.len() {
            if fired.get(index).copied().unwrap_or(false) {
                continue;
            }
            let defaults = self.strategies[index].defaults.clone();
            self.push_candidates(&defaults, None, &Event::empty(), world, values);
        }

        self.queue.len()
    }

    // Checks due triggers first, then pushes, so trigger order cannot leak
    // through shared value caches. Returns which strategies fired.
    fn process_triggers(&mut self, world: &W, values: &mut ValueContext<W>) -> Vec<bool> {
        let mut fired_triggers: Vec<(usize, Event)> = Vec::new();

        for (index, slot) in self.triggers.iter_mut().enumerate() {
            slot.passes_since_check = slot.passes_since_check.saturating_add(1);
            let due = self.config.test_mode
                || slot.passes_since_check >= slot.trigger.check_interval().max(1);
            if !due {
                continue;
            }
            slot.passes_since_check = 0;

            let mut obs = Observation::new(world, values);
            if let Some(event) = slot.trigger.check(&mut obs) {
                debug!(target: "behavior::engine", trigger = slot.trigger.name(), %event, "trigger fired");
                if self.config.test_mode {
                    self.journal.push(format!("T:{}", slot.trigger.name()));
                }
                fired_triggers.push((index, event));
            }
        }

        let mut fired = vec![false; self.strategies.len()];
        for (index, event) in fired_triggers {
            let slot = &self.triggers[index];
            let strategy = slot.strategy;
            let actions = slot.actions.clone();
            if let Some(flag) = fired.get_mut(strategy) {
                *flag = true;
            }
            self.push_candidates(&actions, None, &event, world, values);
        }

        for slot in &mut self.triggers {
            slot.trigger.reset();
        }
        fired
    }

    fn resolve(
        &mut self,
        basket: ActionBasket,
        world: &mut W,
        values: &mut ValueContext<W>,
        next_check_delay: &mut Option<u32>,
    ) -> Step {
        let (node, relevance, event, rounds) = basket.into_parts();
        let name = node.name().clone();
        let Some(mut action) = self.take_action(name.as_str()) else {
            warn!(target: "behavior::engine", action = %name, "unknown action");
            self.note(format!("A:{name} - UNKNOWN"));
            return Step::Continue;
        };

        let (useful, possible) = {
            let mut obs = Observation::new(&*world, values);
            let useful = action.is_useful(&mut obs);
            (useful, useful && action.is_possible(&mut obs))
        };

        if !useful {
            self.actions.insert(name.clone(), action);
            self.note(format!("A:{name} - USELESS"));
            self.fall_back(ActionResult::Useless, &node, relevance, &event, &*world, values);
            return Step::Continue;
        }

        let policy = self.config.resolution;
        let offer_prerequisites = !node.prerequisites().is_empty()
            && ((possible && rounds == 0)
                || (!possible && rounds < policy.max_prerequisite_depth));

        if offer_prerequisites {
            self.actions.insert(name.clone(), action);
            let pushed = self.push_candidates(
                node.prerequisites(),
                Some(relevance + policy.prerequisite_bonus),
                &event,
                &*world,
                values,
            );
            if pushed > 0 {
                debug!(target: "behavior::engine", action = %name, pushed, "prerequisites offered");
                self.note(format!("A:{name} - PREREQUISITES"));
                self.queue.push(
                    ActionBasket::new(node, relevance + policy.retry_bonus, event)
                        .with_prerequisite_rounds(rounds.saturating_add(1)),
                );
                return Step::Continue;
            }
            let Some(taken) = self.take_action(name.as_str()) else {
                return Step::Continue;
            };
            action = taken;
        }

        if !possible {
            self.actions.insert(name.clone(), action);
            self.note(format!("A:{name} - IMPOSSIBLE"));
            self.fall_back(ActionResult::Impossible, &node, relevance, &event, &*world, values);
            return Step::Continue;
        }

        let executed = self.execute(&mut action, &event, world, values, next_check_delay);
        self.actions.insert(name.clone(), action);

        if executed {
            debug!(target: "behavior::engine", action = %name, relevance, %event, "action executed");
            self.note(format!("A:{name} - OK"));
            self.carry_continuations(&node, relevance, &event);
            Step::Executed(name, relevance)
        } else {
            debug!(target: "behavior::engine", action = %name, "action failed");
            self.note(format!("A:{name} - FAILED"));
            self.fall_back(ActionResult::Failed, &node, relevance, &event, &*world, values);
            Step::Continue
        }
    }

    /// Executes an action by name, bypassing triggers and the queue.
    ///
    /// Continuations of a successful action are carried to the next pass.
    pub fn execute_action(
        &mut self,
        name: &str,
        world: &mut W,
        values: &mut ValueContext<W>,
    ) -> DirectOutcome {
        let mut next_check_delay = None;
        let Some(mut action) = self.take_action(name) else {
            return DirectOutcome {
                result: ActionResult::Unknown,
                next_check_delay,
            };
        };
        let node = self.node_for(&*action);

        let result = {
            let mut obs = Observation::new(&*world, values);
            if !action.is_possible(&mut obs) {
                Some(ActionResult::Impossible)
            } else if !action.is_useful(&mut obs) {
                Some(ActionResult::Useless)
            } else {
                None
            }
        };
        let result = match result {
            Some(result) => result,
            None => {
                let event = Event::empty();
                let executed =
                    self.execute(&mut action, &event, world, values, &mut next_check_delay);
                if executed {
                    self.carry_continuations(&node, 0.0, &event);
                }
                ActionResult::from_executed(executed)
            }
        };

        info!(target: "behavior::engine", action = name, %result, "direct action");
        self.actions.insert(node.name().clone(), action);
        DirectOutcome {
            result,
            next_check_delay,
        }
    }

    /// Delivers an external event to every active trigger of that name.
    ///
    /// Returns `false` if no active trigger has the name.
    pub fn external_event(&mut self, trigger: &str, event: Event) -> bool {
        let mut delivered = false;
        for slot in &mut self.triggers {
            if slot.trigger.name() == trigger {
                slot.trigger.external_event(event.clone());
                delivered = true;
            }
        }
        delivered
    }

    pub fn has_trigger(&self, name: &str) -> bool {
        self.triggers.iter().any(|slot| slot.trigger.name() == name)
    }

    fn execute(
        &mut self,
        action: &mut Box<dyn Action<W>>,
        event: &Event,
        world: &mut W,
        values: &mut ValueContext<W>,
        next_check_delay: &mut Option<u32>,
    ) -> bool {
        let suppress = self.config.test_mode;
        self.listeners
            .run(&mut **action, event, suppress, |action: &mut dyn Action<W>| {
                let mut ctx = ActionContext::new(world, values, next_check_delay);
                action.execute(&mut ctx, event)
            })
    }

    /// Weighs candidates and pushes the survivors.
    ///
    /// With `forced` every candidate enters at that relevance unless a
    /// multiplier vetoes it; otherwise its own relevance is scaled by the
    /// product of the multipliers. Returns how many candidates were queued.
    fn push_candidates(
        &mut self,
        candidates: &[NextAction],
        forced: Option<f32>,
        event: &Event,
        world: &W,
        values: &mut ValueContext<W>,
    ) -> usize {
        let mut pushed = 0;
        for next in candidates {
            let Some(action) = self.take_action(next.name.as_str()) else {
                warn!(target: "behavior::engine", action = %next.name, "unknown action");
                self.note(format!("A:{} - UNKNOWN", next.name));
                continue;
            };

            let factor: f32 = {
                let mut obs = Observation::new(world, values);
                self.multipliers
                    .iter()
                    .map(|m| m.value(&*action, &mut obs))
                    .product()
            };
            let node = self.node_for(&*action);
            self.actions.insert(next.name.clone(), action);

            let relevance = match forced {
                Some(relevance) if factor > 0.0 => relevance,
                Some(_) => 0.0,
                None => next.relevance * factor,
            };
            if !(relevance.is_finite() && relevance > 0.0) {
                debug!(target: "behavior::engine", action = %next.name, factor, "candidate vetoed");
                continue;
            }

            if self.config.test_mode {
                self.journal.push(format!("P:{} {relevance:.2}", next.name));
            }
            self.queue.push(ActionBasket::new(node, relevance, event.clone()));
            pushed += 1;
        }
        pushed
    }

    fn fall_back(
        &mut self,
        result: ActionResult,
        node: &ActionNode,
        relevance: f32,
        event: &Event,
        world: &W,
        values: &mut ValueContext<W>,
    ) {
        let policy = self.config.resolution;
        if node.alternatives().is_empty() || !policy.falls_back(result) {
            return;
        }
        let bonus = policy.alternative_bonus;
        self.push_candidates(node.alternatives(), Some(relevance + bonus), event, world, values);
    }

    // Zero-relevance continuations inherit the relevance of their parent.
    fn carry_continuations(&mut self, node: &ActionNode, relevance: f32, event: &Event) {
        for next in node.continuations() {
            let carried = if next.relevance > 0.0 {
                next.clone()
            } else {
                NextAction::new(next.name.clone(), relevance)
            };
            self.carried.push((carried, event.clone()));
        }
    }

    fn take_action(&mut self, name: &str) -> Option<Box<dyn Action<W>>> {
        self.actions
            .remove(name)
            .or_else(|| self.registry.create_action(name))
    }

    /// The node of the first active strategy defining `action`, extended
    /// with the lists the implementation declares.
    fn node_for(&self, action: &dyn Action<W>) -> ActionNode {
        let mut node = self
            .strategies
            .iter()
            .find_map(|s| s.strategy.node_def(action.name()))
            .map(|def| def.resolve(&self.config.tiers))
            .unwrap_or_else(|| ActionNode::new(action.name()));
        node.extend_from(action);
        node
    }

    fn note(&mut self, entry: String) {
        trace!(target: "behavior::engine", "{entry}");
        if self.config.test_mode {
            self.journal.push(entry);
        }
    }

    // ---------------------------------------------------------------------
    // Diagnostics
    // ---------------------------------------------------------------------

    pub fn last_action(&self) -> Option<&ActionName> {
        self.last_action.as_ref()
    }

    pub fn last_relevance(&self) -> f32 {
        self.last_relevance
    }

    /// The queue as left by the last pass.
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Decision record of test mode, cleared on [`init`](Self::init).
    pub fn journal(&self) -> &[String] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_test_mode(&mut self, test_mode: bool) {
        self.config.test_mode = test_mode;
    }

    /// Continuations waiting for the next pass.
    pub fn carried(&self) -> impl Iterator<Item = &NextAction> {
        self.carried.iter().map(|(next, _)| next)
    }
}
