//! Behavioral states of an agent.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Each state owns its own engine and strategy set.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum BotState {
    Combat,
    NonCombat,
    Dead,
}

impl BotState {
    pub const COUNT: usize = 3;

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            BotState::Combat => 0,
            BotState::NonCombat => 1,
            BotState::Dead => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn indices_are_dense() {
        let indices: Vec<usize> = BotState::iter().map(BotState::index).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert_eq!(BotState::iter().count(), BotState::COUNT);
    }

    #[test]
    fn parses_snake_case() {
        assert_eq!(BotState::from_str("non_combat"), Ok(BotState::NonCombat));
        assert_eq!(BotState::Dead.to_string(), "dead");
    }
}
