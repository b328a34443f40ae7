//! Execution listeners.
//!
//! Listeners wrap every concrete execution an engine performs. They are the
//! hook for test harnesses, chat echo and permission checks:
//!
//! 1. `before` runs on every listener; any `false` skips execution
//! 2. `allow_execution` runs on every listener; any `false` suppresses the
//!    side effect while the action still counts as executed
//! 3. `override_result` is chained, each listener sees the previous verdict
//! 4. `after` observes the final verdict

use tracing::debug;

use crate::action::Action;
use crate::event::Event;

/// Observer of action execution.
pub trait ExecutionListener<W>: Send {
    /// Unique name, used for removal.
    fn name(&self) -> &str;

    /// Returns `false` to veto execution.
    fn before(&mut self, _action: &dyn Action<W>, _event: &Event) -> bool {
        true
    }

    /// Returns `false` to skip the side effect but report success.
    fn allow_execution(&mut self, _action: &dyn Action<W>, _event: &Event) -> bool {
        true
    }

    /// Rewrites the execution verdict.
    fn override_result(&mut self, _action: &dyn Action<W>, executed: bool, _event: &Event) -> bool {
        executed
    }

    fn after(&mut self, _action: &dyn Action<W>, _executed: bool, _event: &Event) {}
}

/// Ordered set of listeners, unique by name.
pub struct ListenerChain<W> {
    listeners: Vec<Box<dyn ExecutionListener<W>>>,
}

impl<W> ListenerChain<W> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Adds a listener, replacing any listener with the same name.
    pub fn add(&mut self, listener: Box<dyn ExecutionListener<W>>) {
        self.remove(listener.name());
        debug!(target: "behavior::listeners", listener = listener.name(), "listener added");
        self.listeners.push(listener);
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.name() != name);
        before != self.listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Runs `execute` wrapped in every listener.
    ///
    /// # Arguments
    ///
    /// * `action` - The action about to run
    /// * `event` - The event that proposed it
    /// * `suppress` - Treat the side effect as suppressed regardless of listeners
    /// * `execute` - Performs the side effect and reports whether it took effect
    ///
    /// # Returns
    ///
    /// The final verdict after overrides.
    pub fn run(
        &mut self,
        action: &mut dyn Action<W>,
        event: &Event,
        suppress: bool,
        execute: impl FnOnce(&mut dyn Action<W>) -> bool,
    ) -> bool {
        let mut executed = false;

        let proceed = self
            .listeners
            .iter_mut()
            .fold(true, |ok, listener| listener.before(action, event) && ok);
        if proceed {
            let allowed = self
                .listeners
                .iter_mut()
                .fold(true, |ok, listener| listener.allow_execution(action, event) && ok);
            executed = if allowed && !suppress {
                execute(&mut *action)
            } else {
                true
            };
        }

        for listener in &mut self.listeners {
            executed = listener.override_result(action, executed, event);
        }
        for listener in &mut self.listeners {
            listener.after(action, executed, event);
        }
        executed
    }
}

impl<W> Default for ListenerChain<W> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingListener, ScriptedAction};

    struct Veto;

    impl ExecutionListener<()> for Veto {
        fn name(&self) -> &str {
            "veto"
        }

        fn before(&mut self, _action: &dyn Action<()>, _event: &Event) -> bool {
            false
        }
    }

    struct Dry;

    impl ExecutionListener<()> for Dry {
        fn name(&self) -> &str {
            "dry"
        }

        fn allow_execution(&mut self, _action: &dyn Action<()>, _event: &Event) -> bool {
            false
        }
    }

    #[test]
    fn before_veto_still_notifies_every_listener() {
        let recorder = RecordingListener::new("rec");
        let log = recorder.log();
        let mut chain: ListenerChain<()> = ListenerChain::new();
        chain.add(Box::new(Veto));
        chain.add(Box::new(recorder));

        let mut action = ScriptedAction::new("melee");
        let mut ran = false;
        let executed = chain.run(&mut action, &Event::empty(), false, |_| {
            ran = true;
            true
        });

        assert!(!executed);
        assert!(!ran);
        assert_eq!(log.entries(), ["before melee", "after melee false"]);
    }

    #[test]
    fn disallowed_execution_counts_as_executed() {
        let mut chain: ListenerChain<()> = ListenerChain::new();
        chain.add(Box::new(Dry));

        let mut action = ScriptedAction::new("melee");
        let mut ran = false;
        let executed = chain.run(&mut action, &Event::empty(), false, |_| {
            ran = true;
            false
        });

        assert!(executed);
        assert!(!ran);
    }

    #[test]
    fn listeners_are_unique_by_name() {
        let mut chain: ListenerChain<()> = ListenerChain::new();
        chain.add(Box::new(RecordingListener::new("rec")));
        chain.add(Box::new(RecordingListener::new("rec")));
        assert_eq!(chain.len(), 1);

        assert!(chain.remove("rec"));
        assert!(!chain.remove("rec"));
        assert!(chain.is_empty());
    }
}
