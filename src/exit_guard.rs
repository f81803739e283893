// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Double-press exit guard.
//!
//! A single back press at a root surface only arms the guard and prompts;
//! a second press inside the window performs the real exit. The re-arm
//! "timer" is the periodic tick event, so every transition happens on the
//! UI thread. Time is passed in by the caller to keep the state machine
//! deterministic under test.

use std::time::{Duration, Instant};

pub(crate) const DOUBLE_BACK_DELAY: Duration = Duration::from_millis(2000);

/// Outcome of a back press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BackPress {
    /// First press: show the "press again to exit" prompt.
    Prompt,
    /// Second press inside the window, or the guard is disabled: really exit.
    Exit,
}

#[derive(Debug, Clone, Copy)]
enum GuardState {
    Armed,
    PendingExit { deadline: Instant },
}

pub(crate) struct ExitGuard {
    enabled: bool,
    state: GuardState,
}

impl ExitGuard {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            state: GuardState::Armed,
        }
    }

    /// Registers a back press at `now` and reports what the caller should do.
    ///
    /// A press at or after the pending deadline counts as a fresh first
    /// press, whether or not a tick re-armed the guard in between.
    pub(crate) fn press(&mut self, now: Instant) -> BackPress {
        if !self.enabled {
            return BackPress::Exit;
        }
        match self.state {
            GuardState::PendingExit { deadline } if now < deadline => {
                self.state = GuardState::Armed;
                BackPress::Exit
            }
            _ => {
                self.state = GuardState::PendingExit {
                    deadline: now + DOUBLE_BACK_DELAY,
                };
                BackPress::Prompt
            }
        }
    }

    /// Re-arms the guard once the pending window has elapsed.
    ///
    /// Driven by the periodic tick event; the expiry itself is also checked
    /// in [`ExitGuard::press`], so tick granularity never extends the window.
    pub(crate) fn tick(&mut self, now: Instant) {
        if let GuardState::PendingExit { deadline } = self.state {
            if now >= deadline {
                self.state = GuardState::Armed;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> bool {
        matches!(self.state, GuardState::PendingExit { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_guard_always_exits() {
        let mut guard = ExitGuard::new(false);
        let now = Instant::now();
        assert_eq!(guard.press(now), BackPress::Exit);
        assert_eq!(guard.press(now + Duration::from_secs(10)), BackPress::Exit);
    }

    #[test]
    fn first_press_prompts_second_press_exits() {
        let mut guard = ExitGuard::new(true);
        let now = Instant::now();
        assert_eq!(guard.press(now), BackPress::Prompt);
        assert!(guard.pending());
        assert_eq!(guard.press(now + Duration::from_millis(500)), BackPress::Exit);
    }

    #[test]
    fn press_after_window_is_a_fresh_first_press() {
        let mut guard = ExitGuard::new(true);
        let now = Instant::now();
        assert_eq!(guard.press(now), BackPress::Prompt);
        assert_eq!(
            guard.press(now + DOUBLE_BACK_DELAY + Duration::from_millis(1)),
            BackPress::Prompt
        );
    }

    #[test]
    fn press_at_exact_deadline_is_a_fresh_first_press() {
        let mut guard = ExitGuard::new(true);
        let now = Instant::now();
        guard.press(now);
        assert_eq!(guard.press(now + DOUBLE_BACK_DELAY), BackPress::Prompt);
    }

    #[test]
    fn tick_past_deadline_re_arms() {
        let mut guard = ExitGuard::new(true);
        let now = Instant::now();
        guard.press(now);
        guard.tick(now + Duration::from_millis(2500));
        assert!(!guard.pending());
        assert_eq!(
            guard.press(now + Duration::from_millis(2600)),
            BackPress::Prompt
        );
    }

    #[test]
    fn tick_inside_window_leaves_guard_pending() {
        let mut guard = ExitGuard::new(true);
        let now = Instant::now();
        guard.press(now);
        guard.tick(now + Duration::from_millis(500));
        assert!(guard.pending());
        assert_eq!(guard.press(now + Duration::from_millis(600)), BackPress::Exit);
    }
}
