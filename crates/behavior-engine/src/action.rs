//! Actions and the nodes that describe how they chain.

use crate::context::{ActionContext, Observation};
use crate::event::Event;
use crate::name::ActionName;
use crate::relevance::NextAction;

/// Executable unit of behavior.
///
/// Guards take an [`Observation`] and must not change the world. Only
/// [`execute`](Action::execute) has side effects. Implementations may list
/// their own prerequisites, alternatives and continuations; these are appended
/// to whatever the active strategies declare for the action.
///
/// # Example
///
/// ```
/// use behavior_engine::{Action, ActionContext, Event, Observation};
///
/// struct Wave;
///
/// impl Action<u32> for Wave {
///     fn name(&self) -> &str {
///         "wave"
///     }
///
///     fn is_useful(&self, obs: &mut Observation<'_, u32>) -> bool {
///         *obs.world() > 0
///     }
///
///     fn execute(&mut self, ctx: &mut ActionContext<'_, u32>, _event: &Event) -> bool {
///         *ctx.world_mut() -= 1;
///         true
///     }
/// }
/// ```
pub trait Action<W>: Send {
    fn name(&self) -> &str;

    /// Whether executing would change anything.
    fn is_useful(&self, _obs: &mut Observation<'_, W>) -> bool {
        true
    }

    /// Whether the action can run right now.
    fn is_possible(&self, _obs: &mut Observation<'_, W>) -> bool {
        true
    }

    /// Performs the action.
    ///
    /// # Returns
    ///
    /// `true` if the action took effect.
    fn execute(&mut self, ctx: &mut ActionContext<'_, W>, event: &Event) -> bool;

    fn prerequisites(&self) -> Vec<NextAction> {
        Vec::new()
    }

    fn alternatives(&self) -> Vec<NextAction> {
        Vec::new()
    }

    fn continuations(&self) -> Vec<NextAction> {
        Vec::new()
    }
}

impl<W> Action<W> for Box<dyn Action<W>> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_useful(&self, obs: &mut Observation<'_, W>) -> bool {
        (**self).is_useful(obs)
    }

    fn is_possible(&self, obs: &mut Observation<'_, W>) -> bool {
        (**self).is_possible(obs)
    }

    fn execute(&mut self, ctx: &mut ActionContext<'_, W>, event: &Event) -> bool {
        (**self).execute(ctx, event)
    }

    fn prerequisites(&self) -> Vec<NextAction> {
        (**self).prerequisites()
    }

    fn alternatives(&self) -> Vec<NextAction> {
        (**self).alternatives()
    }

    fn continuations(&self) -> Vec<NextAction> {
        (**self).continuations()
    }
}

/// An action name with its ordered chaining lists, resolved to relevances.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionNode {
    name: ActionName,
    prerequisites: Vec<NextAction>,
    alternatives: Vec<NextAction>,
    continuations: Vec<NextAction>,
}

impl ActionNode {
    pub fn new(name: impl Into<ActionName>) -> Self {
        Self {
            name: name.into(),
            prerequisites: Vec::new(),
            alternatives: Vec::new(),
            continuations: Vec::new(),
        }
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

    /// Appends the lists the action implementation declares itself.
    pub fn extend_from<W>(&mut self, action: &dyn Action<W>) {
        self.prerequisites.extend(action.prerequisites());
        self.alternatives.extend(action.alternatives());
        self.continuations.extend(action.continuations());
    }

    pub fn name(&self) -> &ActionName {
        &self.name
    }

    pub fn prerequisites(&self) -> &[NextAction] {
        &self.prerequisites
    }

    pub fn alternatives(&self) -> &[NextAction] {
        &self.alternatives
    }

    pub fn continuations(&self) -> &[NextAction] {
        &self.continuations
    }
}
