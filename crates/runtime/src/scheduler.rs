//! Per-agent think throttle.
//!
//! Each agent carries a remaining delay in milliseconds. World updates count
//! it down; once it drops below the think threshold the agent may decide
//! again. After every decision the delay is floored at the react delay so an
//! agent never thinks twice in the same instant.

use tracing::debug;

use crate::config::SchedulingConfig;

#[derive(Clone, Debug)]
pub struct ThinkClock {
    next_check_delay: u32,
    timings: SchedulingConfig,
}

impl ThinkClock {
    /// A clock ready to think on the first update.
    pub fn new(timings: SchedulingConfig) -> Self {
        Self {
            next_check_delay: 0,
            timings,
        }
    }

    /// Counts the delay down by `elapsed_ms`, saturating at zero.
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.next_check_delay = self.next_check_delay.saturating_sub(elapsed_ms);
    }

    pub fn can_think(&self) -> bool {
        self.next_check_delay < self.timings.think_threshold
    }

    pub fn next_check_delay(&self) -> u32 {
        self.next_check_delay
    }

    /// Replaces the remaining delay.
    pub fn set_next_check_delay(&mut self, delay_ms: u32) {
        if delay_ms < self.next_check_delay {
            debug!(
                target: "runtime::scheduler",
                from = self.next_check_delay,
                to = delay_ms,
                "setting lesser delay"
            );
        }
        if delay_ms > self.timings.global_cooldown {
            debug!(target: "runtime::scheduler", delay_ms, "delay above global cooldown");
        }
        self.next_check_delay = delay_ms;
    }

    /// Pushes the next decision further out.
    pub fn increase_check_delay(&mut self, delay_ms: u32) {
        self.next_check_delay = self.next_check_delay.saturating_add(delay_ms);
    }

    /// Floors the delay at the react delay; applied after every think.
    pub fn yield_think(&mut self) {
        self.next_check_delay = self.next_check_delay.max(self.timings.react_delay);
    }

    /// Caps a pending delay, e.g. to keep an agent in combat responsive.
    pub fn clamp(&mut self, max_ms: u32) {
        self.next_check_delay = self.next_check_delay.min(max_ms);
    }

    /// Drops any pending delay.
    pub fn reset(&mut self) {
        self.next_check_delay = 0;
    }

    pub fn timings(&self) -> &SchedulingConfig {
        &self.timings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> ThinkClock {
        ThinkClock::new(SchedulingConfig::default())
    }

    #[test]
    fn thinks_immediately_then_waits_for_the_floor() {
        let mut clock = clock();
        assert!(clock.can_think());

        clock.yield_think();
        assert_eq!(clock.next_check_delay(), 100);
        assert!(!clock.can_think());

        clock.advance(1);
        assert!(clock.can_think());
    }

    #[test]
    fn countdown_saturates() {
        let mut clock = clock();
        clock.set_next_check_delay(1500);
        clock.advance(1000);
        assert_eq!(clock.next_check_delay(), 500);
        assert!(!clock.can_think());

        clock.advance(u32::MAX);
        assert_eq!(clock.next_check_delay(), 0);
    }

    #[test]
    fn delays_above_global_cooldown_are_kept() {
        let mut clock = clock();
        let long = clock.timings().global_cooldown * 4;
        clock.set_next_check_delay(long);
        clock.yield_think();
        assert_eq!(clock.next_check_delay(), long);
    }

    #[test]
    fn floor_never_lowers_a_longer_delay() {
        let mut clock = clock();
        clock.set_next_check_delay(2500);
        clock.yield_think();
        assert_eq!(clock.next_check_delay(), 2500);

        clock.increase_check_delay(500);
        clock.clamp(2800);
        assert_eq!(clock.next_check_delay(), 2800);
    }
}
