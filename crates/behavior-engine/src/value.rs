//! Per-agent cache of named, lazily recomputed values.
//!
//! Triggers and multipliers read the world through values instead of
//! recomputing expensive queries on every evaluation. A value is identified by
//! its name plus an optional qualifier (for example a spell or target name).
//!
//! - **Calculated** values recompute at most once per check interval
//!   (in ticks); reads in between return the cached result
//! - **Manual** values hold whatever was last set and fall back to a default
//!   on [`ValueContext::reset`]
//!
//! The context is advanced exactly once per evaluation pass by the engine.
//! There is no way to force a recomputation from outside.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use tracing::warn;

use crate::event::EntityId;
use crate::name::ValueName;
use crate::registry::BehaviorRegistry;

/// Who a value is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueScope<'a> {
    /// The agent owning the value context.
    pub agent: EntityId,
    /// Optional qualifier the value was requested with.
    pub qualifier: Option<&'a str>,
}

pub(crate) type Calculation<W, T> = Arc<dyn Fn(&W, &ValueScope<'_>) -> T + Send + Sync>;

/// Type-erased value slot stored in a [`ValueContext`].
pub trait AnyValue<W>: Send {
    /// Advances the value by one tick.
    fn update(&mut self);

    /// Drops cached state and restores defaults.
    fn reset(&mut self);

    /// Diagnostic rendering of the current value.
    fn format(&self) -> String;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Value recomputed from the world every `check_interval` ticks.
pub struct CalculatedValue<W, T> {
    calculate: Calculation<W, T>,
    check_interval: u32,
    ticks_elapsed: u32,
    cached: Option<T>,
}

impl<W, T: Clone> CalculatedValue<W, T> {
    pub(crate) fn new(check_interval: u32, calculate: Calculation<W, T>) -> Self {
        let check_interval = check_interval.max(1);
        Self {
            calculate,
            check_interval,
            ticks_elapsed: check_interval,
            cached: None,
        }
    }

    fn get(&mut self, world: &W, scope: &ValueScope<'_>) -> T {
        match &self.cached {
            Some(value) if self.ticks_elapsed < self.check_interval => value.clone(),
            _ => {
                let value = (self.calculate)(world, scope);
                self.ticks_elapsed = 0;
                self.cached = Some(value.clone());
                value
            }
        }
    }

    fn set(&mut self, value: T) {
        self.cached = Some(value);
        self.ticks_elapsed = 0;
    }
}

impl<W: 'static, T> AnyValue<W> for CalculatedValue<W, T>
where
    T: Clone + Debug + Send + 'static,
{
    fn update(&mut self) {
        if self.ticks_elapsed < self.check_interval {
            self.ticks_elapsed += 1;
        }
    }

    fn reset(&mut self) {
        self.cached = None;
        self.ticks_elapsed = self.check_interval;
    }

    fn format(&self) -> String {
        match &self.cached {
            Some(value) => format!("{value:?}"),
            None => "?".to_owned(),
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Value that only changes when set explicitly.
pub struct ManualValue<T> {
    value: T,
    default: T,
}

impl<T: Clone> ManualValue<T> {
    pub(crate) fn new(default: T) -> Self {
        Self {
            value: default.clone(),
            default,
        }
    }
}

impl<W, T> AnyValue<W> for ManualValue<T>
where
    T: Clone + Debug + Send + 'static,
{
    fn update(&mut self) {}

    fn reset(&mut self) {
        self.value = self.default.clone();
    }

    fn format(&self) -> String {
        format!("{:?}", self.value)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ValueKey {
    name: ValueName,
    qualifier: Option<String>,
}

impl ValueKey {
    fn new(name: &str, qualifier: Option<&str>) -> Self {
        Self {
            name: ValueName::from(name),
            qualifier: qualifier.map(str::to_owned),
        }
    }
}

/// The per-agent value cache.
///
/// Slots are created on first access from the factories registered in the
/// [`BehaviorRegistry`]. Lookups of unknown names or with the wrong type log a
/// warning and yield `None`; they never panic.
pub struct ValueContext<W> {
    owner: EntityId,
    registry: Arc<BehaviorRegistry<W>>,
    slots: HashMap<ValueKey, Box<dyn AnyValue<W>>>,
}

impl<W: 'static> ValueContext<W> {
    pub fn new(owner: EntityId, registry: Arc<BehaviorRegistry<W>>) -> Self {
        Self {
            owner,
            registry,
            slots: HashMap::new(),
        }
    }

    /// The agent this context belongs to.
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Reads a value, recomputing it if its interval elapsed.
    ///
    /// # Returns
    ///
    /// `None` if no value of that name is registered or it holds another type.
    pub fn get<T>(&mut self, world: &W, name: &str, qualifier: Option<&str>) -> Option<T>
    where
        T: Clone + Debug + Send + 'static,
    {
        let scope = ValueScope {
            agent: self.owner,
            qualifier,
        };
        let slot = self.slot(name, qualifier)?.as_any_mut();

        if let Some(value) = slot.downcast_mut::<CalculatedValue<W, T>>() {
            return Some(value.get(world, &scope));
        }
        if let Some(value) = slot.downcast_mut::<ManualValue<T>>() {
            return Some(value.value.clone());
        }

        warn!(
            target: "behavior::values",
            value = name,
            expected = std::any::type_name::<T>(),
            "value has a different type"
        );
        None
    }

    /// Overwrites a value.
    ///
    /// Setting a calculated value replaces its cache until the next
    /// recomputation.
    ///
    /// # Returns
    ///
    /// `false` if the name is unknown or the type does not match.
    pub fn set<T>(&mut self, name: &str, qualifier: Option<&str>, value: T) -> bool
    where
        T: Clone + Debug + Send + 'static,
    {
        let Some(slot) = self.slot(name, qualifier) else {
            return false;
        };
        let slot = slot.as_any_mut();

        if let Some(manual) = slot.downcast_mut::<ManualValue<T>>() {
            manual.value = value;
            return true;
        }
        if let Some(calculated) = slot.downcast_mut::<CalculatedValue<W, T>>() {
            calculated.set(value);
            return true;
        }

        warn!(
            target: "behavior::values",
            value = name,
            expected = std::any::type_name::<T>(),
            "cannot set value of a different type"
        );
        false
    }

    /// Advances every materialized value by one tick.
    pub fn update(&mut self) {
        for slot in self.slots.values_mut() {
            slot.update();
        }
    }

    /// Drops every cache and restores manual defaults.
    pub fn reset(&mut self) {
        for slot in self.slots.values_mut() {
            slot.reset();
        }
    }

    /// Renders every materialized value as `(name, value)`, sorted by name.
    pub fn format_all(&self) -> Vec<(String, String)> {
        let mut rows: Vec<(String, String)> = self
            .slots
            .iter()
            .map(|(key, slot)| {
                let label = match &key.qualifier {
                    Some(q) => format!("{}::{q}", key.name),
                    None => key.name.to_string(),
                };
                (label, slot.format())
            })
            .collect();
        rows.sort();
        rows
    }

    /// Number of materialized slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&mut self, name: &str, qualifier: Option<&str>) -> Option<&mut Box<dyn AnyValue<W>>> {
        let key = ValueKey::new(name, qualifier);
        if !self.slots.contains_key(&key) {
            let Some(slot) = self.registry.create_value(name) else {
                warn!(target: "behavior::values", value = name, "unknown value");
                return None;
            };
            self.slots.insert(key.clone(), slot);
        }
        self.slots.get_mut(&key)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct World {
        health: u32,
    }

    fn context(calls: Arc<AtomicU32>) -> ValueContext<World> {
        let mut registry = BehaviorRegistry::new();
        registry.register_calculated("health", 2, move |world: &World, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            world.health
        });
        registry.register_manual("last target", None::<EntityId>);
        registry.register_calculated("echo", 1, |_: &World, scope| {
            scope.qualifier.unwrap_or("self").to_owned()
        });
        ValueContext::new(EntityId(1), Arc::new(registry))
    }

    #[test]
    fn calculated_values_are_cached_within_interval() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut values = context(Arc::clone(&calls));
        let mut world = World { health: 80 };

        assert_eq!(values.get::<u32>(&world, "health", None), Some(80));
        world.health = 10;
        values.update();
        assert_eq!(values.get::<u32>(&world, "health", None), Some(80));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        values.update();
        assert_eq!(values.get::<u32>(&world, "health", None), Some(10));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn qualifiers_create_independent_slots() {
        let mut values = context(Arc::new(AtomicU32::new(0)));
        let world = World { health: 1 };

        assert_eq!(values.get::<String>(&world, "echo", Some("target")).as_deref(), Some("target"));
        assert_eq!(values.get::<String>(&world, "echo", None).as_deref(), Some("self"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn manual_values_reset_to_default() {
        let mut values = context(Arc::new(AtomicU32::new(0)));
        let world = World { health: 1 };

        assert!(values.set("last target", None, Some(EntityId(7))));
        assert_eq!(
            values.get::<Option<EntityId>>(&world, "last target", None),
            Some(Some(EntityId(7)))
        );

        values.reset();
        assert_eq!(values.get::<Option<EntityId>>(&world, "last target", None), Some(None));
    }

    #[test]
    fn unknown_names_and_type_mismatches_yield_none() {
        let mut values = context(Arc::new(AtomicU32::new(0)));
        let world = World { health: 1 };

        assert_eq!(values.get::<u32>(&world, "mana", None), None);
        assert_eq!(values.get::<String>(&world, "health", None), None);
        assert!(!values.set("health", None, "full"));
    }

    #[test]
    fn format_all_lists_materialized_values() {
        let mut values = context(Arc::new(AtomicU32::new(0)));
        let world = World { health: 42 };
        values.get::<u32>(&world, "health", None);
        values.get::<String>(&world, "echo", Some("focus"));

        let rows = values.format_all();
        assert_eq!(
            rows,
            vec![
                ("echo::focus".to_owned(), "\"focus\"".to_owned()),
                ("health".to_owned(), "42".to_owned()),
            ]
        );
    }
}
