//! Typed names.
//!
//! Everything in the engine is addressed by a human-readable name. The kind
//! marker keeps an action name from being passed where a trigger name is
//! expected, while the text stays cheap to clone and usable as a `&str` map key.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marker for the namespace a [`Name`] belongs to.
pub trait NameKind: 'static {
    /// Short label used in diagnostics ("action", "trigger", ...).
    const LABEL: &'static str;
}

macro_rules! name_kind {
    ($(#[$meta:meta])* $kind:ident => $label:literal) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub enum $kind {}

        impl NameKind for $kind {
            const LABEL: &'static str = $label;
        }
    };
}

name_kind!(
    /// Namespace of actions.
    ActionKind => "action"
);
name_kind!(
    /// Namespace of triggers.
    TriggerKind => "trigger"
);
name_kind!(
    /// Namespace of multipliers.
    MultiplierKind => "multiplier"
);
name_kind!(
    /// Namespace of strategies.
    StrategyKind => "strategy"
);
name_kind!(
    /// Namespace of named values.
    ValueKind => "value"
);

pub type ActionName = Name<ActionKind>;
pub type TriggerName = Name<TriggerKind>;
pub type MultiplierName = Name<MultiplierKind>;
pub type StrategyName = Name<StrategyKind>;
pub type ValueName = Name<ValueKind>;

/// Immutable, shared name tagged with its namespace.
pub struct Name<K> {
    text: Arc<str>,
    kind: PhantomData<fn() -> K>,
}

impl<K: NameKind> Name<K> {
    pub fn new(text: &str) -> Self {
        Self {
            text: Arc::from(text),
            kind: PhantomData,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Namespace label of this name.
    #[inline]
    pub fn kind(&self) -> &'static str {
        K::LABEL
    }
}

impl<K> Clone for Name<K> {
    fn clone(&self) -> Self {
        Self {
            text: Arc::clone(&self.text),
            kind: PhantomData,
        }
    }
}

impl<K> PartialEq for Name<K> {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl<K> Eq for Name<K> {}

impl<K> PartialEq<str> for Name<K> {
    fn eq(&self, other: &str) -> bool {
        &*self.text == other
    }
}

impl<K> PartialEq<&str> for Name<K> {
    fn eq(&self, other: &&str) -> bool {
        &*self.text == *other
    }
}

impl<K> PartialOrd for Name<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Name<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

// Must agree with `str`'s hash for `Borrow<str>` lookups.
impl<K> Hash for Name<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl<K> Borrow<str> for Name<K> {
    fn borrow(&self) -> &str {
        &self.text
    }
}

impl<K> AsRef<str> for Name<K> {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl<K> fmt::Debug for Name<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.text, f)
    }
}

impl<K> fmt::Display for Name<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl<K: NameKind> From<&str> for Name<K> {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl<K: NameKind> From<String> for Name<K> {
    fn from(text: String) -> Self {
        Self {
            text: Arc::from(text),
            kind: PhantomData,
        }
    }
}

impl<K: NameKind> From<&String> for Name<K> {
    fn from(text: &String) -> Self {
        Self::new(text)
    }
}

impl<K> Serialize for Name<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de, K: NameKind> Deserialize<'de> for Name<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}
