//! Multipliers rescale a candidate's relevance before it is queued.

use std::fmt;
use std::marker::PhantomData;

use crate::action::Action;
use crate::context::Observation;

/// Contextual weight applied to every candidate pushed by an engine.
///
/// Effective relevance is `base * product(multipliers)`. Each multiplier sees
/// only the candidate and the world, never another multiplier's partial
/// result, so the order multipliers run in does not matter. Returning `0.0`
/// vetoes the candidate.
pub trait Multiplier<W>: Send {
    fn name(&self) -> &str;

    fn value(&self, action: &dyn Action<W>, obs: &mut Observation<'_, W>) -> f32;
}

/// Multiplier backed by a closure.
pub struct FnMultiplier<W, F> {
    name: String,
    weigh: F,
    world: PhantomData<fn(&W)>,
}

impl<W, F> FnMultiplier<W, F>
where
    F: Fn(&dyn Action<W>, &mut Observation<'_, W>) -> f32 + Send,
{
    pub fn new(name: impl Into<String>, weigh: F) -> Self {
        Self {
            name: name.into(),
            weigh,
            world: PhantomData,
        }
    }
}

impl<W, F> Multiplier<W> for FnMultiplier<W, F>
where
    F: Fn(&dyn Action<W>, &mut Observation<'_, W>) -> f32 + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, action: &dyn Action<W>, obs: &mut Observation<'_, W>) -> f32 {
        (self.weigh)(action, obs)
    }
}

impl<W, F> fmt::Debug for FnMultiplier<W, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMultiplier")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
