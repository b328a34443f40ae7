//! Name-indexed factories shared by every engine of a process.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use tracing::debug;

use crate::action::Action;
use crate::error::{EngineError, Result};
use crate::multiplier::Multiplier;
use crate::name::{ActionName, MultiplierName, StrategyName, TriggerName, ValueName};
use crate::strategy::Strategy;
use crate::trigger::{EventTrigger, Trigger};
use crate::value::{AnyValue, CalculatedValue, ManualValue, ValueScope};

type ActionFactory<W> = Arc<dyn Fn() -> Box<dyn Action<W>> + Send + Sync>;
type TriggerFactory<W> = Arc<dyn Fn() -> Box<dyn Trigger<W>> + Send + Sync>;
type MultiplierFactory<W> = Arc<dyn Fn() -> Box<dyn Multiplier<W>> + Send + Sync>;
type ValueFactory<W> = Arc<dyn Fn() -> Box<dyn AnyValue<W>> + Send + Sync>;

/// Catalog of everything a strategy can refer to by name.
///
/// Built once at startup, then shared behind an [`Arc`] by all engines and
/// value contexts. Engines instantiate their own actions, triggers and
/// multipliers from the factories, so no state is shared between agents.
pub struct BehaviorRegistry<W> {
    actions: HashMap<ActionName, ActionFactory<W>>,
    triggers: HashMap<TriggerName, TriggerFactory<W>>,
    multipliers: HashMap<MultiplierName, MultiplierFactory<W>>,
    values: HashMap<ValueName, ValueFactory<W>>,
    strategies: HashMap<StrategyName, Strategy>,
}

impl<W: 'static> BehaviorRegistry<W> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            triggers: HashMap::new(),
            multipliers: HashMap::new(),
            values: HashMap::new(),
            strategies: HashMap::new(),
        }
    }

    pub fn register_action<A, F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        A: Action<W> + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.actions.insert(
            ActionName::from(name),
            Arc::new(move || Box::new(factory()) as Box<dyn Action<W>>),
        );
        self
    }

    pub fn register_trigger<T, F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        T: Trigger<W> + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.triggers.insert(
            TriggerName::from(name),
            Arc::new(move || Box::new(factory()) as Box<dyn Trigger<W>>),
        );
        self
    }

    /// Registers an [`EventTrigger`] fed by external events.
    pub fn register_event_trigger(&mut self, name: &str) -> &mut Self {
        let owned = name.to_owned();
        self.register_trigger(name, move || EventTrigger::new(owned.clone()))
    }

    pub fn register_multiplier<M, F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        M: Multiplier<W> + 'static,
        F: Fn() -> M + Send + Sync + 'static,
    {
        self.multipliers.insert(
            MultiplierName::from(name),
            Arc::new(move || Box::new(factory()) as Box<dyn Multiplier<W>>),
        );
        self
    }

    /// Registers a value recomputed at most every `check_interval` passes.
    pub fn register_calculated<T, F>(
        &mut self,
        name: &str,
        check_interval: u32,
        calculate: F,
    ) -> &mut Self
    where
        T: Clone + Debug + Send + 'static,
        F: Fn(&W, &ValueScope<'_>) -> T + Send + Sync + 'static,
    {
        let calculate: Arc<dyn Fn(&W, &ValueScope<'_>) -> T + Send + Sync> = Arc::new(calculate);
        self.values.insert(
            ValueName::from(name),
            Arc::new(move || {
                Box::new(CalculatedValue::new(check_interval, Arc::clone(&calculate)))
                    as Box<dyn AnyValue<W>>
            }),
        );
        self
    }

    /// Registers a settable value starting at `default`.
    pub fn register_manual<T>(&mut self, name: &str, default: T) -> &mut Self
    where
        T: Clone + Debug + Send + Sync + 'static,
    {
        self.values.insert(
            ValueName::from(name),
            Arc::new(move || Box::new(ManualValue::new(default.clone())) as Box<dyn AnyValue<W>>),
        );
        self
    }

    /// Adds or replaces a strategy definition without validating it.
    pub fn register_strategy(&mut self, strategy: Strategy) -> &mut Self {
        debug!(target: "behavior::registry", strategy = %strategy.name, "registered strategy");
        self.strategies.insert(strategy.name.clone(), strategy);
        self
    }

    /// Parses a RON list of strategies and registers each one.
    ///
    /// # Returns
    ///
    /// The number of strategies registered.
    ///
    /// # Errors
    ///
    /// [`EngineError::Parse`] if the text is not a valid strategy list, or
    /// [`EngineError::UnknownReference`] if a strategy names something that
    /// is not registered. Nothing is registered on error.
    pub fn load_strategies(&mut self, ron_text: &str) -> Result<usize> {
        let strategies: Vec<Strategy> = ron::from_str(ron_text)?;
        for strategy in &strategies {
            self.check_strategy(strategy)?;
        }

        let count = strategies.len();
        for strategy in strategies {
            self.register_strategy(strategy);
        }
        Ok(count)
    }

    /// Checks that every registered strategy only names known parts.
    pub fn validate(&self) -> Result<()> {
        let mut names: Vec<&StrategyName> = self.strategies.keys().collect();
        names.sort();
        for name in names {
            self.check_strategy(&self.strategies[name])?;
        }
        Ok(())
    }

    fn check_strategy(&self, strategy: &Strategy) -> Result<()> {
        let unknown = |kind: &'static str, name: &str| EngineError::UnknownReference {
            strategy: strategy.name.to_string(),
            kind,
            name: name.to_owned(),
        };

        if let Some(node) = strategy
            .triggers
            .iter()
            .find(|node| !self.triggers.contains_key(&node.trigger))
        {
            return Err(unknown("trigger", node.trigger.as_str()));
        }
        if let Some(name) = strategy
            .multipliers
            .iter()
            .find(|name| !self.multipliers.contains_key(*name))
        {
            return Err(unknown("multiplier", name.as_str()));
        }
        if let Some(name) = strategy
            .referenced_actions()
            .find(|name| !self.actions.contains_key(*name))
        {
            return Err(unknown("action", name.as_str()));
        }
        Ok(())
    }

    pub fn create_action(&self, name: &str) -> Option<Box<dyn Action<W>>> {
        self.actions.get(name).map(|factory| factory())
    }

    pub fn create_trigger(&self, name: &str) -> Option<Box<dyn Trigger<W>>> {
        self.triggers.get(name).map(|factory| factory())
    }

    pub fn create_multiplier(&self, name: &str) -> Option<Box<dyn Multiplier<W>>> {
        self.multipliers.get(name).map(|factory| factory())
    }

    pub fn create_value(&self, name: &str) -> Option<Box<dyn AnyValue<W>>> {
        self.values.get(name).map(|factory| factory())
    }

    pub fn strategy(&self, name: &str) -> Option<&Strategy> {
        self.strategies.get(name)
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn has_trigger(&self, name: &str) -> bool {
        self.triggers.contains_key(name)
    }

    /// Registered strategy names, sorted.
    pub fn strategy_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(|n| n.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl<W: 'static> Default for BehaviorRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relevance::Tier;
    use crate::testing::ScriptedAction;

    fn registry() -> BehaviorRegistry<()> {
        let mut registry = BehaviorRegistry::new();
        registry
            .register_action("melee", || ScriptedAction::new("melee"))
            .register_event_trigger("attack");
        registry
    }

    #[test]
    fn factories_create_fresh_instances() {
        let registry = registry();

        let action = registry.create_action("melee").expect("melee");
        assert_eq!(action.name(), "melee");
        assert!(registry.create_action("fireball").is_none());
        assert_eq!(registry.create_trigger("attack").map(|t| t.name().to_owned()), Some("attack".to_owned()));
    }

    #[test]
    fn validation_names_the_unknown_part() {
        let mut registry = registry();
        registry.register_strategy(
            Strategy::new("dps")
                .on("attack", [("melee", Tier::High)])
                .default_action("shoot", Tier::Normal),
        );

        match registry.validate() {
            Err(EngineError::UnknownReference { strategy, kind, name }) => {
                assert_eq!((strategy.as_str(), kind, name.as_str()), ("dps", "action", "shoot"));
            }
            other => panic!("unexpected validation result: {other:?}"),
        }
    }

    #[test]
    fn load_strategies_is_all_or_nothing() {
        let mut registry = registry();
        let text = r#"[
            (name: "attack on command", triggers: [(trigger: "attack", actions: [(action: "melee", priority: Some(tier(high)))])]),
            (name: "broken", multipliers: ["missing"]),
        ]"#;

        assert!(matches!(
            registry.load_strategies(text),
            Err(EngineError::UnknownReference { kind: "multiplier", .. })
        ));
        assert!(registry.strategy_names().is_empty());

        let text = r#"[(name: "idle", defaults: [(action: "melee", priority: Some(exact(1.0)))])]"#;
        assert_eq!(registry.load_strategies(text).ok(), Some(1));
        assert_eq!(registry.strategy_names(), ["idle"]);
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let mut registry = registry();
        assert!(matches!(
            registry.load_strategies("[(name: )]"),
            Err(EngineError::Parse(_))
        ));
    }
}
