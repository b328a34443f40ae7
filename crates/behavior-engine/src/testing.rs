//! Scripted building blocks for exercising engines without a real world.
//!
//! Every type here works with any world type, so harnesses can drive an
//! engine over `()` and steer it through shared [`Switch`]es.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::action::Action;
use crate::context::{ActionContext, Observation};
use crate::event::Event;
use crate::listener::ExecutionListener;
use crate::relevance::NextAction;
use crate::trigger::Trigger;

/// Shared on/off flag.
#[derive(Debug, Clone, Default)]
pub struct Switch(Arc<AtomicBool>);

impl Switch {
    pub fn new(on: bool) -> Self {
        Self(Arc::new(AtomicBool::new(on)))
    }

    pub fn set(&self, on: bool) {
        self.0.store(on, Ordering::SeqCst);
    }

    pub fn is_on(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Shared counter.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Action whose guards and outcome are fixed up front.
#[derive(Debug, Clone)]
pub struct ScriptedAction {
    name: String,
    possible: Switch,
    useful: Switch,
    succeeds: bool,
    delay: Option<u32>,
    prerequisites: Vec<NextAction>,
    alternatives: Vec<NextAction>,
    continuations: Vec<NextAction>,
    executions: Counter,
}

impl ScriptedAction {
    /// Possible, useful and successful.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            possible: Switch::new(true),
            useful: Switch::new(true),
            succeeds: true,
            delay: None,
            prerequisites: Vec::new(),
            alternatives: Vec::new(),
            continuations: Vec::new(),
            executions: Counter::default(),
        }
    }

    pub fn impossible(self) -> Self {
        self.possible.set(false);
        self
    }

    pub fn useless(self) -> Self {
        self.useful.set(false);
        self
    }

    pub fn failing(mut self) -> Self {
        self.succeeds = false;
        self
    }

    /// Ties possibility to a shared switch.
    pub fn possible_when(mut self, switch: Switch) -> Self {
        self.possible = switch;
        self
    }

    /// Ties usefulness to a shared switch.
    pub fn useful_when(mut self, switch: Switch) -> Self {
        self.useful = switch;
        self
    }

    /// Requests a think delay on every execution.
    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay = Some(delay_ms);
        self
    }

    pub fn with_prerequisites(mut self, prerequisites: Vec<NextAction>) -> Self {
        self.prerequisites = prerequisites;
        self
    }

    pub fn with_alternatives(mut self, alternatives: Vec<NextAction>) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn with_continuations(mut self, continuations: Vec<NextAction>) -> Self {
        self.continuations = continuations;
        self
    }

    /// Counts executions across every clone of this action.
    pub fn counting(mut self, counter: Counter) -> Self {
        self.executions = counter;
        self
    }
}

impl<W: 'static> Action<W> for ScriptedAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_useful(&self, _obs: &mut Observation<'_, W>) -> bool {
        self.useful.is_on()
    }

    fn is_possible(&self, _obs: &mut Observation<'_, W>) -> bool {
        self.possible.is_on()
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, W>, _event: &Event) -> bool {
        self.executions.bump();
        if let Some(delay) = self.delay {
            ctx.set_next_check_delay(delay);
        }
        self.succeeds
    }

    fn prerequisites(&self) -> Vec<NextAction> {
        self.prerequisites.clone()
    }

    fn alternatives(&self) -> Vec<NextAction> {
        self.alternatives.clone()
    }

    fn continuations(&self) -> Vec<NextAction> {
        self.continuations.clone()
    }
}

/// Trigger that is active while its switch is on.
#[derive(Debug, Clone)]
pub struct FlagTrigger {
    name: String,
    switch: Switch,
    check_interval: u32,
}

impl FlagTrigger {
    pub fn new(name: impl Into<String>, switch: Switch) -> Self {
        Self {
            name: name.into(),
            switch,
            check_interval: 1,
        }
    }

    pub fn every(mut self, check_interval: u32) -> Self {
        self.check_interval = check_interval.max(1);
        self
    }
}

impl<W> Trigger<W> for FlagTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&mut self, _obs: &mut Observation<'_, W>) -> bool {
        self.switch.is_on()
    }

    fn check_interval(&self) -> u32 {
        self.check_interval
    }
}

/// Shared view of what a [`RecordingListener`] saw.
#[derive(Debug, Clone, Default)]
pub struct ListenerLog(Arc<Mutex<Vec<String>>>);

impl ListenerLog {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.0.lock() {
            log.clear();
        }
    }

    fn push(&self, entry: String) {
        if let Ok(mut log) = self.0.lock() {
            log.push(entry);
        }
    }
}

/// Listener recording `before`, `allow` and `after` calls.
///
/// Can also veto execution by name.
#[derive(Debug, Clone)]
pub struct RecordingListener {
    name: String,
    log: ListenerLog,
    veto: Vec<String>,
}

impl RecordingListener {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: ListenerLog::default(),
            veto: Vec::new(),
        }
    }

    /// Refuses to let `action` run.
    pub fn vetoing(mut self, action: impl Into<String>) -> Self {
        self.veto.push(action.into());
        self
    }

    pub fn log(&self) -> ListenerLog {
        self.log.clone()
    }
}

impl<W> ExecutionListener<W> for RecordingListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn before(&mut self, action: &dyn Action<W>, _event: &Event) -> bool {
        self.log.push(format!("before {}", action.name()));
        !self.veto.iter().any(|name| name == action.name())
    }

    fn allow_execution(&mut self, action: &dyn Action<W>, _event: &Event) -> bool {
        self.log.push(format!("allow {}", action.name()));
        true
    }

    fn after(&mut self, action: &dyn Action<W>, executed: bool, _event: &Event) {
        self.log.push(format!("after {} {executed}", action.name()));
    }
}
