//! Relevance tiers and next-action candidates.
//!
//! Relevance is a plain `f32` where higher wins. Named tiers are
//! non-overlapping numeric bands, so comparing tiers is comparing relevance,
//! and a small bonus (`TierPlus`) never crosses into the next band.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::name::ActionName;

/// Named relevance band.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Idle,
    Normal,
    High,
    Move,
    Interrupt,
    Dispel,
    LightHeal,
    MediumHeal,
    CriticalHeal,
    Emergency,
}

/// Numeric value of every [`Tier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceTiers {
    pub idle: f32,
    pub normal: f32,
    pub high: f32,
    pub moving: f32,
    pub interrupt: f32,
    pub dispel: f32,
    pub light_heal: f32,
    pub medium_heal: f32,
    pub critical_heal: f32,
    pub emergency: f32,
}

impl RelevanceTiers {
    pub const DEFAULT_IDLE: f32 = 0.0;
    pub const DEFAULT_NORMAL: f32 = 10.0;
    pub const DEFAULT_HIGH: f32 = 20.0;
    pub const DEFAULT_MOVE: f32 = 30.0;
    pub const DEFAULT_INTERRUPT: f32 = 40.0;
    pub const DEFAULT_DISPEL: f32 = 50.0;
    pub const DEFAULT_LIGHT_HEAL: f32 = 60.0;
    pub const DEFAULT_MEDIUM_HEAL: f32 = 70.0;
    pub const DEFAULT_CRITICAL_HEAL: f32 = 80.0;
    pub const DEFAULT_EMERGENCY: f32 = 90.0;

    /// Returns the configured relevance of `tier`.
    pub fn value(&self, tier: Tier) -> f32 {
        match tier {
            Tier::Idle => self.idle,
            Tier::Normal => self.normal,
            Tier::High => self.high,
            Tier::Move => self.moving,
            Tier::Interrupt => self.interrupt,
            Tier::Dispel => self.dispel,
            Tier::LightHeal => self.light_heal,
            Tier::MediumHeal => self.medium_heal,
            Tier::CriticalHeal => self.critical_heal,
            Tier::Emergency => self.emergency,
        }
    }
}

impl Default for RelevanceTiers {
    fn default() -> Self {
        Self {
            idle: Self::DEFAULT_IDLE,
            normal: Self::DEFAULT_NORMAL,
            high: Self::DEFAULT_HIGH,
            moving: Self::DEFAULT_MOVE,
            interrupt: Self::DEFAULT_INTERRUPT,
            dispel: Self::DEFAULT_DISPEL,
            light_heal: Self::DEFAULT_LIGHT_HEAL,
            medium_heal: Self::DEFAULT_MEDIUM_HEAL,
            critical_heal: Self::DEFAULT_CRITICAL_HEAL,
            emergency: Self::DEFAULT_EMERGENCY,
        }
    }
}

/// Relevance as written in a strategy definition.
///
/// Resolved against [`RelevanceTiers`] once, when the strategy is activated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Tier(Tier),
    /// A tier plus a small bonus to order actions inside one band.
    TierPlus(Tier, f32),
    Exact(f32),
}

impl Priority {
    pub fn resolve(self, tiers: &RelevanceTiers) -> f32 {
        match self {
            Priority::Tier(tier) => tiers.value(tier),
            Priority::TierPlus(tier, bonus) => tiers.value(tier) + bonus,
            Priority::Exact(value) => value,
        }
    }
}

impl From<Tier> for Priority {
    fn from(tier: Tier) -> Self {
        Priority::Tier(tier)
    }
}

impl From<f32> for Priority {
    fn from(value: f32) -> Self {
        Priority::Exact(value)
    }
}

/// A candidate action with its relevance.
///
/// Inside prerequisite, alternative and continuation lists a relevance of
/// zero means "inherit": the engine substitutes a relevance derived from the
/// action that owns the list.
#[derive(Debug, Clone, PartialEq)]
pub struct NextAction {
    pub name: ActionName,
    pub relevance: f32,
}

impl NextAction {
    pub fn new(name: impl Into<ActionName>, relevance: f32) -> Self {
        Self {
            name: name.into(),
            relevance,
        }
    }

    /// Candidate whose relevance is supplied by the owner of the list.
    pub fn inherit(name: impl Into<ActionName>) -> Self {
        Self::new(name, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn default_tiers_are_strictly_increasing() {
        let tiers = RelevanceTiers::default();
        let values: Vec<f32> = Tier::iter().map(|t| tiers.value(t)).collect();

        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn tier_names_parse_case_insensitively() {
        assert_eq!(Tier::from_str("critical_heal"), Ok(Tier::CriticalHeal));
        assert_eq!(Tier::from_str("EMERGENCY"), Ok(Tier::Emergency));
        assert_eq!(Tier::LightHeal.to_string(), "light_heal");
    }

    #[test]
    fn priorities_resolve_against_tiers() {
        let tiers = RelevanceTiers {
            normal: 5.0,
            ..RelevanceTiers::default()
        };

        assert_eq!(Priority::Tier(Tier::Normal).resolve(&tiers), 5.0);
        assert_eq!(Priority::TierPlus(Tier::Normal, 0.5).resolve(&tiers), 5.5);
        assert_eq!(Priority::Exact(71.0).resolve(&tiers), 71.0);
    }
}
