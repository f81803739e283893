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

//! Sign-in surface.
//!
//! Two managed text inputs for the account name and password. Submission
//! raises [`AppEvent::SubmitLogin`]; the outcome comes back through the
//! action registry and lands in the surface hooks below.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    actions::events::{AppEvent, AppEventProcessor},
    model::Credentials,
    service::{ServiceHandle, broadcast},
    surface::SurfaceHooks,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum LoginField {
    Login,
    Password,
}

pub(crate) struct LoginView {
    pub(crate) login: Input,
    pub(crate) password: Input,
    pub(crate) focus: LoginField,
    pub(crate) error: Option<String>,
    pub(crate) connected: bool,
    event_tx: Sender<AppEvent>,
}

impl LoginView {
    pub(crate) fn new(event_tx: Sender<AppEvent>, default_login: &str) -> Self {
        Self {
            login: Input::new(default_login.to_string()),
            password: Input::default(),
            focus: LoginField::Login,
            error: None,
            connected: false,
            event_tx,
        }
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials {
            login: self.login.value().trim().to_string(),
            password: self.password.value().to_string(),
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Login => LoginField::Password,
            LoginField::Password => LoginField::Login,
        };
    }

    fn focused_input(&mut self) -> &mut Input {
        match self.focus {
            LoginField::Login => &mut self.login,
            LoginField::Password => &mut self.password,
        }
    }
}

impl AppEventProcessor for LoginView {
    fn process_event(&mut self, event: Event, event_tx: &Sender<AppEvent>) -> Result<()> {
        if let Event::Key(key) = &event {
            match key.code {
                KeyCode::Enter => {
                    event_tx.send(AppEvent::SubmitLogin)?;
                }
                KeyCode::Tab | KeyCode::Up | KeyCode::Down => self.toggle_focus(),
                _ => {
                    self.focused_input().handle_event(&event);
                }
            }
        }
        Ok(())
    }
}

impl SurfaceHooks for LoginView {
    fn on_fail_action(&mut self, action: &str) {
        if action == broadcast::LOGIN_FAIL_ACTION {
            self.error = Some("Sign-in failed, check your account details".to_string());
        }
    }

    fn on_success_action(&mut self, action: &str) {
        if action == broadcast::LOGIN_SUCCESS_ACTION {
            self.error = None;
            self.password.reset();
            let _ = self.event_tx.send(AppEvent::LoginComplete);
        }
    }

    fn on_connected_to_service(&mut self, _service: &ServiceHandle) {
        self.connected = true;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn login_success_hook_completes_the_surface() {
        let (tx, rx) = mpsc::channel();
        let mut view = LoginView::new(tx, "alice");
        view.error = Some("old failure".into());

        view.on_success_action(broadcast::LOGIN_SUCCESS_ACTION);

        assert!(view.error.is_none());
        assert!(matches!(rx.try_recv(), Ok(AppEvent::LoginComplete)));
    }

    #[test]
    fn unrelated_success_actions_are_ignored() {
        let (tx, rx) = mpsc::channel();
        let mut view = LoginView::new(tx, "alice");

        view.on_success_action(broadcast::LOAD_DIALOGS_SUCCESS_ACTION);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn login_failure_hook_sets_the_error_line() {
        let (tx, _rx) = mpsc::channel();
        let mut view = LoginView::new(tx, "alice");

        view.on_fail_action(broadcast::LOGIN_FAIL_ACTION);

        assert!(view.error.is_some());
    }

    #[test]
    fn credentials_trim_the_account_name() {
        let (tx, _rx) = mpsc::channel();
        let view = LoginView::new(tx, " alice ");
        assert_eq!(view.credentials().login, "alice");
    }
}
