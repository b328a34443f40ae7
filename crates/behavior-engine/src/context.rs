//! Views handed to actions, triggers and multipliers.

use std::fmt::Debug;

use crate::event::EntityId;
use crate::value::ValueContext;

/// Read-only view of the world plus the agent's value cache.
///
/// Reading a value may refresh its cache, hence the mutable borrow of the
/// value context.
pub struct Observation<'a, W> {
    world: &'a W,
    values: &'a mut ValueContext<W>,
}

impl<'a, W: 'static> Observation<'a, W> {
    pub fn new(world: &'a W, values: &'a mut ValueContext<W>) -> Self {
        Self { world, values }
    }

    #[inline]
    pub fn world(&self) -> &'a W {
        self.world
    }

    /// The agent being evaluated.
    #[inline]
    pub fn agent(&self) -> EntityId {
        self.values.owner()
    }

    pub fn value<T>(&mut self, name: &str) -> Option<T>
    where
        T: Clone + Debug + Send + 'static,
    {
        self.values.get(self.world, name, None)
    }

    pub fn qualified<T>(&mut self, name: &str, qualifier: &str) -> Option<T>
    where
        T: Clone + Debug + Send + 'static,
    {
        self.values.get(self.world, name, Some(qualifier))
    }
}

/// Mutable view handed to [`Action::execute`](crate::Action::execute).
pub struct ActionContext<'a, W> {
    world: &'a mut W,
    values: &'a mut ValueContext<W>,
    next_check_delay: &'a mut Option<u32>,
}

impl<'a, W: 'static> ActionContext<'a, W> {
    pub(crate) fn new(
        world: &'a mut W,
        values: &'a mut ValueContext<W>,
        next_check_delay: &'a mut Option<u32>,
    ) -> Self {
        Self {
            world,
            values,
            next_check_delay,
        }
    }

    pub fn world(&self) -> &W {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut *self.world
    }

    pub fn agent(&self) -> EntityId {
        self.values.owner()
    }

    pub fn values(&mut self) -> &mut ValueContext<W> {
        &mut *self.values
    }

    pub fn value<T>(&mut self, name: &str, qualifier: Option<&str>) -> Option<T>
    where
        T: Clone + Debug + Send + 'static,
    {
        self.values.get(&*self.world, name, qualifier)
    }

    pub fn set_value<T>(&mut self, name: &str, qualifier: Option<&str>, value: T) -> bool
    where
        T: Clone + Debug + Send + 'static,
    {
        self.values.set(name, qualifier, value)
    }

    /// Asks the scheduler to wait `delay_ms` before the next decision
    /// (e.g. a cast time or a travel estimate).
    pub fn set_next_check_delay(&mut self, delay_ms: u32) {
        *self.next_check_delay = Some(delay_ms);
    }

    /// Read-only view for consulting triggers or values mid-execution.
    pub fn observe(&mut self) -> Observation<'_, W> {
        Observation::new(&*self.world, &mut *self.values)
    }
}
