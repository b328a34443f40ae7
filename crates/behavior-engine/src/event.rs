//! Events raised by triggers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a world entity (an agent, its owner, a target).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a trigger hands to the actions it proposes.
///
/// The empty event (no source) accompanies default actions and direct
/// invocations. Parameters and payloads come from external sources such as
/// chat commands or network packets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    source: Option<String>,
    param: Option<String>,
    payload: Option<Vec<u8>>,
    owner: Option<EntityId>,
}

impl Event {
    /// Event with no source, used for defaults and direct execution.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Event attributed to the named source (usually a trigger).
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// `true` when no trigger produced this event.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, &self.param) {
            (Some(source), Some(param)) => write!(f, "{source}({param})"),
            (Some(source), None) => f.write_str(source),
            (None, _) => f.write_str("<none>"),
        }
    }
}
