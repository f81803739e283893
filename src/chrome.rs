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

//! Shared UI chrome state.
//!
//! The chrome is everything drawn on top of whichever surface is active:
//! the modal progress indicator, a modal notice dismissed by the next key
//! press, a transient alert banner and the status line. Commands mutate this
//! state during dispatch; rendering reads it every frame.

use std::time::{Duration, Instant};

const ALERT_TTL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone)]
pub(crate) struct Alert {
    pub(crate) message: String,
    deadline: Instant,
}

pub(crate) struct Chrome {
    progress_visible: bool,
    busy: bool,
    notice: Option<String>,
    alert: Option<Alert>,
    status: Option<String>,
}

impl Chrome {
    pub(crate) fn new() -> Self {
        Self {
            progress_visible: false,
            busy: false,
            notice: None,
            alert: None,
            status: None,
        }
    }

    /// Shows the modal progress indicator. Showing twice is a no-op.
    pub(crate) fn show_progress(&mut self) {
        if !self.progress_visible {
            self.progress_visible = true;
        }
    }

    /// Hides the progress indicator. Safe to call when nothing is showing.
    pub(crate) fn hide_progress(&mut self) {
        self.progress_visible = false;
    }

    pub(crate) fn progress_visible(&self) -> bool {
        self.progress_visible
    }

    /// Inline busy spinner in the header, for operations that should not
    /// block input behind the modal indicator.
    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub(crate) fn busy(&self) -> bool {
        self.busy
    }

    /// Shows a modal notice; the next key press dismisses it.
    pub(crate) fn show_notice(&mut self, message: String) {
        self.notice = Some(message);
    }

    pub(crate) fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    pub(crate) fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Shows a transient banner; it expires on a tick after [`ALERT_TTL`].
    pub(crate) fn show_alert(&mut self, message: impl Into<String>, now: Instant) {
        self.alert = Some(Alert {
            message: message.into(),
            deadline: now + ALERT_TTL,
        });
    }

    pub(crate) fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub(crate) fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Expires timed chrome elements. Driven by the periodic tick event.
    pub(crate) fn tick(&mut self, now: Instant) {
        if let Some(alert) = &self.alert {
            if now >= alert.deadline {
                self.alert = None;
            }
        }
    }
}
