// src/scoring/timer.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Running,
    Finalized,
}

/// What moved the timer into `Finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FinalizeTrigger {
    Expired,
    Submitted,
}

/// Countdown for one attempt.
///
/// `Finalized` is terminal. Each of `tick` and `submit` reports the transition
/// only when it is the call that caused it, so whichever trigger fires first
/// wins and every later trigger is a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTimer {
    time_limit: u32,
    remaining: u32,
    state: TimerState,
    trigger: Option<FinalizeTrigger>,
}

impl SessionTimer {
    pub fn start(time_limit: u32) -> Self {
        Self {
            time_limit,
            remaining: time_limit,
            state: TimerState::Running,
            trigger: None,
        }
    }

    /// One second elapsed. Returns `Some(Expired)` on the tick that reaches zero.
    pub fn tick(&mut self) -> Option<FinalizeTrigger> {
        if self.state == TimerState::Finalized {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return self.finalize(FinalizeTrigger::Expired);
        }
        None
    }

    /// Manual submit. Returns `Some(Submitted)` if the timer was still running.
    pub fn submit(&mut self) -> Option<FinalizeTrigger> {
        self.finalize(FinalizeTrigger::Submitted)
    }

    fn finalize(&mut self, trigger: FinalizeTrigger) -> Option<FinalizeTrigger> {
        if self.state == TimerState::Finalized {
            return None;
        }
        self.state = TimerState::Finalized;
        self.trigger = Some(trigger);
        Some(trigger)
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn elapsed(&self) -> u32 {
        self.time_limit - self.remaining
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == TimerState::Finalized
    }

    pub fn trigger(&self) -> Option<FinalizeTrigger> {
        self.trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_then_expires_once() {
        let mut timer = SessionTimer::start(3);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining(), 1);
        assert_eq!(timer.tick(), Some(FinalizeTrigger::Expired));
        assert_eq!(timer.remaining(), 0);
        assert!(timer.is_finalized());

        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.trigger(), Some(FinalizeTrigger::Expired));
    }

    #[test]
    fn submit_wins_over_later_expiry() {
        let mut timer = SessionTimer::start(2);
        timer.tick();
        assert_eq!(timer.submit(), Some(FinalizeTrigger::Submitted));
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.submit(), None);
        assert_eq!(timer.remaining(), 1);
        assert_eq!(timer.elapsed(), 1);
        assert_eq!(timer.trigger(), Some(FinalizeTrigger::Submitted));
    }

    #[test]
    fn submit_after_expiry_is_a_no_op() {
        let mut timer = SessionTimer::start(1);
        assert_eq!(timer.tick(), Some(FinalizeTrigger::Expired));
        assert_eq!(timer.submit(), None);
        assert_eq!(timer.trigger(), Some(FinalizeTrigger::Expired));
    }

    #[test]
    fn zero_limit_expires_on_first_tick() {
        let mut timer = SessionTimer::start(0);
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.tick(), Some(FinalizeTrigger::Expired));
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn finalizes_exactly_once_under_interleaved_triggers() {
        let mut timer = SessionTimer::start(5);
        let mut transitions = 0;
        for step in 0..20 {
            let fired = if step % 3 == 0 {
                timer.submit()
            } else {
                timer.tick()
            };
            if fired.is_some() {
                transitions += 1;
            }
        }
        assert_eq!(transitions, 1);
    }
}
