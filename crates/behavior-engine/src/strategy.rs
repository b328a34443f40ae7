//! Strategies: named, composable bundles of behavior described as data.
//!
//! A strategy never runs code itself. It binds trigger names to the actions
//! they propose, names the multipliers to apply, lists default actions for
//! quiet passes, and may override the chaining lists of individual actions.
//! Strategies are deserializable so bundles can live in RON files.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::action::ActionNode;
use crate::name::{ActionName, MultiplierName, StrategyName, TriggerName};
use crate::relevance::{NextAction, Priority, RelevanceTiers};

bitflags! {
    /// Role tags of a strategy, queried with `contains_strategy`.
    ///
    /// An empty set marks a generic strategy. In RON the set is written as
    /// a flag string such as `"COMBAT | HEAL"`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct StrategyType: u8 {
        const COMBAT    = 1 << 0;
        const NONCOMBAT = 1 << 1;
        const TANK      = 1 << 2;
        const DPS       = 1 << 3;
        const HEAL      = 1 << 4;
        const RANGED    = 1 << 5;
        const MELEE     = 1 << 6;
    }
}

impl Serialize for StrategyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for StrategyType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

/// An action reference in a strategy definition.
///
/// Without a priority the relevance is inherited from whatever owns the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextActionDef {
    pub action: ActionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl NextActionDef {
    pub fn new(action: impl Into<ActionName>, priority: impl Into<Priority>) -> Self {
        Self {
            action: action.into(),
            priority: Some(priority.into()),
        }
    }

    pub fn inherit(action: impl Into<ActionName>) -> Self {
        Self {
            action: action.into(),
            priority: None,
        }
    }

    pub fn resolve(&self, tiers: &RelevanceTiers) -> NextAction {
        let relevance = self.priority.map_or(0.0, |p| p.resolve(tiers));
        NextAction::new(self.action.clone(), relevance)
    }
}

fn resolve_all(defs: &[NextActionDef], tiers: &RelevanceTiers) -> Vec<NextAction> {
    defs.iter().map(|def| def.resolve(tiers)).collect()
}

/// Binds a trigger to the actions it proposes when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerNode {
    pub trigger: TriggerName,
    pub actions: Vec<NextActionDef>,
}

/// Chaining lists a strategy declares for one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionNodeDef {
    pub action: ActionName,
    #[serde(default)]
    pub prerequisites: Vec<NextActionDef>,
    #[serde(default)]
    pub alternatives: Vec<NextActionDef>,
    #[serde(default)]
    pub continuations: Vec<NextActionDef>,
}

impl ActionNodeDef {
    pub fn new(action: impl Into<ActionName>) -> Self {
        Self {
            action: action.into(),
            prerequisites: Vec::new(),
            alternatives: Vec::new(),
            continuations: Vec::new(),
        }
    }

    pub fn prerequisite(mut self, action: impl Into<ActionName>) -> Self {
        self.prerequisites.push(NextActionDef::inherit(action));
        self
    }

    pub fn alternative(mut self, action: impl Into<ActionName>) -> Self {
        self.alternatives.push(NextActionDef::inherit(action));
        self
    }

    /// Continuation at its own priority; `None` inherits the parent's relevance.
    pub fn continuation(
        mut self,
        action: impl Into<ActionName>,
        priority: Option<Priority>,
    ) -> Self {
        self.continuations.push(NextActionDef {
            action: action.into(),
            priority,
        });
        self
    }

    pub fn resolve(&self, tiers: &RelevanceTiers) -> ActionNode {
        ActionNode::new(self.action.clone())
            .with_prerequisites(resolve_all(&self.prerequisites, tiers))
            .with_alternatives(resolve_all(&self.alternatives, tiers))
            .with_continuations(resolve_all(&self.continuations, tiers))
    }
}

/// A named behavior bundle.
///
/// # Example
///
/// ```
/// use behavior_engine::{ActionNodeDef, Strategy, StrategyType, Tier};
///
/// let heal = Strategy::new("heal")
///     .kind(StrategyType::COMBAT | StrategyType::HEAL)
///     .on("critical health", [("emergency heal", Tier::Emergency)])
///     .multiplier("conserve mana")
///     .node(ActionNodeDef::new("emergency heal").alternative("healing potion"));
///
/// assert_eq!(heal.triggers.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: StrategyName,
    #[serde(default)]
    pub kind: StrategyType,
    #[serde(default)]
    pub triggers: Vec<TriggerNode>,
    #[serde(default)]
    pub multipliers: Vec<MultiplierName>,
    #[serde(default)]
    pub defaults: Vec<NextActionDef>,
    #[serde(default)]
    pub nodes: Vec<ActionNodeDef>,
}

impl Strategy {
    pub fn new(name: impl Into<StrategyName>) -> Self {
        Self {
            name: name.into(),
            kind: StrategyType::empty(),
            triggers: Vec::new(),
            multipliers: Vec::new(),
            defaults: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: StrategyType) -> Self {
        self.kind = kind;
        self
    }

    /// Binds `trigger` to the given actions.
    pub fn on<A, P>(
        mut self,
        trigger: impl Into<TriggerName>,
        actions: impl IntoIterator<Item = (A, P)>,
    ) -> Self
    where
        A: Into<ActionName>,
        P: Into<Priority>,
    {
        self.triggers.push(TriggerNode {
            trigger: trigger.into(),
            actions: actions
                .into_iter()
                .map(|(action, priority)| NextActionDef::new(action, priority))
                .collect(),
        });
        self
    }

    pub fn multiplier(mut self, name: impl Into<MultiplierName>) -> Self {
        self.multipliers.push(name.into());
        self
    }

    /// Action proposed whenever none of this strategy's triggers fired.
    pub fn default_action(
        mut self,
        action: impl Into<ActionName>,
        priority: impl Into<Priority>,
    ) -> Self {
        self.defaults.push(NextActionDef::new(action, priority));
        self
    }

    pub fn node(mut self, node: ActionNodeDef) -> Self {
        self.nodes.push(node);
        self
    }

    /// The node definition this strategy declares for `action`, if any.
    pub fn node_def(&self, action: &str) -> Option<&ActionNodeDef> {
        self.nodes.iter().find(|node| node.action == action)
    }

    /// Every action name this strategy refers to, in declaration order.
    pub fn referenced_actions(&self) -> impl Iterator<Item = &ActionName> {
        let bound = self.triggers.iter().flat_map(|t| t.actions.iter());
        let nodes = self.nodes.iter().flat_map(|n| {
            std::iter::once(&n.action).chain(
                n.prerequisites
                    .iter()
                    .chain(&n.alternatives)
                    .chain(&n.continuations)
                    .map(|def| &def.action),
            )
        });
        bound
            .chain(&self.defaults)
            .map(|def| &def.action)
            .chain(nodes)
    }
}
