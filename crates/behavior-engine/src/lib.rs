//! Trigger-driven, priority-queued action selection for autonomous agents.
//!
//! An [`Engine`] turns observations into at most one executed action per
//! evaluation pass. Behavior is assembled from named, data-described
//! strategies instead of being hard-coded per agent.
//!
//! - **Observe**: [`Trigger`]s read the world through a per-agent
//!   [`ValueContext`] and fire [`Event`]s
//! - **Weigh**: every proposed action is scaled by the active [`Multiplier`]s
//!   before it enters the [`Queue`]
//! - **Resolve**: the most relevant candidate is popped and resolved through
//!   prerequisites, alternatives and continuations
//!
//! # Architecture
//!
//! - [`BehaviorRegistry`]: name-indexed factories for actions, triggers,
//!   multipliers and values, plus strategy definitions
//! - [`Strategy`]: pure data bundle of trigger bindings, multipliers, default
//!   actions and action-node overrides
//! - [`Engine`]: owns the active strategies and runs the selection pass
//! - [`ExecutionListener`]: observers that can veto or override execution
//!
//! The world type `W` is chosen by the embedding application. The engine never
//! inspects it; only actions, triggers, multipliers and value calculations do.

pub mod action;
pub mod context;
pub mod engine;
pub mod error;
pub mod event;
pub mod listener;
pub mod multiplier;
pub mod name;
pub mod queue;
pub mod registry;
pub mod relevance;
pub mod status;
pub mod strategy;
pub mod testing;
pub mod trigger;
pub mod value;

pub use action::{Action, ActionNode};
pub use context::{ActionContext, Observation};
pub use engine::{Decision, DirectOutcome, Engine, EngineConfig, ResolutionPolicy};
pub use error::{EngineError, Result};
pub use event::{EntityId, Event};
pub use listener::{ExecutionListener, ListenerChain};
pub use multiplier::{FnMultiplier, Multiplier};
pub use name::{ActionName, MultiplierName, Name, StrategyName, TriggerName, ValueName};
pub use queue::{ActionBasket, Queue};
pub use registry::BehaviorRegistry;
pub use relevance::{NextAction, Priority, RelevanceTiers, Tier};
pub use status::ActionResult;
pub use strategy::{ActionNodeDef, NextActionDef, Strategy, StrategyType, TriggerNode};
pub use trigger::{EventTrigger, FnTrigger, Trigger};
pub use value::{ValueContext, ValueScope};
