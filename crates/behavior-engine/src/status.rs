//! Outcome of resolving a single action.

use strum::{AsRefStr, Display};

/// The result of trying to run one action.
///
/// # Tick Semantics
///
/// Every attempt completes within the pass that selected it:
/// - Guards evaluate immediately (e.g., "Is the target in range?")
/// - Execution either happens now or not at all; long-running work is
///   expressed by requesting a longer think delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ActionResult {
    /// No action with that name exists.
    Unknown,

    /// The action executed.
    Ok,

    /// The action cannot run right now (missing resources, out of range).
    Impossible,

    /// Running the action would not change anything.
    Useless,

    /// The action ran and reported failure.
    Failed,
}

impl ActionResult {
    /// Returns `true` if this result is `Ok`.
    #[inline]
    pub fn is_ok(self) -> bool {
        matches!(self, ActionResult::Ok)
    }

    /// Returns `true` if the name resolved to an action at all.
    #[inline]
    pub fn is_known(self) -> bool {
        !matches!(self, ActionResult::Unknown)
    }

    /// Returns `true` if the action did not run and its alternatives may
    /// stand in for it.
    #[inline]
    pub fn wants_alternatives(self) -> bool {
        matches!(
            self,
            ActionResult::Impossible | ActionResult::Useless | ActionResult::Failed
        )
    }

    /// Folds an execution report into a result.
    #[inline]
    pub fn from_executed(executed: bool) -> Self {
        if executed {
            ActionResult::Ok
        } else {
            ActionResult::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_that_did_not_run_want_alternatives() {
        assert!(ActionResult::Impossible.wants_alternatives());
        assert!(ActionResult::Failed.wants_alternatives());
        assert!(ActionResult::Useless.wants_alternatives());
        assert!(!ActionResult::Ok.wants_alternatives());
        assert!(!ActionResult::Unknown.wants_alternatives());
    }

    #[test]
    fn renders_in_snake_case() {
        assert_eq!(ActionResult::Impossible.to_string(), "impossible");
        assert_eq!(ActionResult::from_executed(true), ActionResult::Ok);
    }
}
