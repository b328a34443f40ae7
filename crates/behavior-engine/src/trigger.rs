//! Triggers: conditions that propose actions when they fire.

use std::fmt;

use crate::context::Observation;
use crate::event::Event;

/// A predicate over the world and the value cache.
///
/// A strategy binds each trigger name to the actions it proposes. The engine
/// only evaluates a trigger once its check interval (in evaluation passes) has
/// elapsed. `is_active` must not change the world; a failed value lookup is
/// an inactive trigger, never a panic.
pub trait Trigger<W>: Send {
    fn name(&self) -> &str;

    fn is_active(&mut self, obs: &mut Observation<'_, W>) -> bool;

    /// Evaluation passes between two checks.
    fn check_interval(&self) -> u32 {
        1
    }

    /// Evaluates the trigger and produces the event handed to its actions.
    fn check(&mut self, obs: &mut Observation<'_, W>) -> Option<Event> {
        if self.is_active(obs) {
            Some(Event::new(self.name()))
        } else {
            None
        }
    }

    /// Delivers an event raised outside the evaluation pass.
    ///
    /// Ignored unless the trigger is event driven.
    fn external_event(&mut self, _event: Event) {}

    /// Clears per-pass state. Called after every trigger pass.
    fn reset(&mut self) {}
}

/// Fires once for every external event delivered to it.
///
/// Used for chat commands and network notifications: the pending event keeps
/// its parameter, payload and owner and is handed to the bound actions on the
/// next evaluation pass.
#[derive(Debug, Clone)]
pub struct EventTrigger {
    name: String,
    pending: Option<Event>,
}

impl EventTrigger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pending: None,
        }
    }
}

impl<W> Trigger<W> for EventTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&mut self, _obs: &mut Observation<'_, W>) -> bool {
        self.pending.is_some()
    }

    fn check(&mut self, _obs: &mut Observation<'_, W>) -> Option<Event> {
        self.pending.take()
    }

    fn external_event(&mut self, event: Event) {
        self.pending = Some(event.with_source(self.name.clone()));
    }
}

/// Trigger backed by a closure.
pub struct FnTrigger<W, F> {
    name: String,
    check_interval: u32,
    condition: F,
    world: std::marker::PhantomData<fn(&W)>,
}

impl<W, F> FnTrigger<W, F>
where
    F: FnMut(&mut Observation<'_, W>) -> bool + Send,
{
    pub fn new(name: impl Into<String>, condition: F) -> Self {
        Self {
            name: name.into(),
            check_interval: 1,
            condition,
            world: std::marker::PhantomData,
        }
    }

    pub fn every(mut self, check_interval: u32) -> Self {
        self.check_interval = check_interval.max(1);
        self
    }
}

impl<W, F> Trigger<W> for FnTrigger<W, F>
where
    F: FnMut(&mut Observation<'_, W>) -> bool + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&mut self, obs: &mut Observation<'_, W>) -> bool {
        (self.condition)(obs)
    }

    fn check_interval(&self) -> u32 {
        self.check_interval
    }
}

impl<W, F> fmt::Debug for FnTrigger<W, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTrigger")
            .field("name", &self.name)
            .field("check_interval", &self.check_interval)
            .finish_non_exhaustive()
    }
}
