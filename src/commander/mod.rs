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

//! Command-line input logic and state management.
//!
//! This module implements the logic for the command-line processing
//! component, handling a text input component, and dispatching a
//! corresponding application event when typing is finished and a command is
//! submitted.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::actions::events::AppEvent;

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {

    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    pub(crate) fn handle_event(&mut self, event: Event, events: &Sender<AppEvent>) -> bool {
        if self.active {
            match event {
                Event::Key(key_event) => {
                    match key_event.code {
                        KeyCode::Esc => {
                            self.active = false;
                            self.input.reset();
                            true
                        }

                        KeyCode::Enter => {
                            let buffer = self.input.value().trim().to_string();
                            if !buffer.is_empty() {
                                let _ = self.run_command(&buffer, events);
                            }
                            self.input.reset();
                            self.active = false;

                            true
                        }

                        _ => {
                            // Delegate all key events to the managed input component.
                            self.input.handle_event(&event);

                            true
                        }
                    }
                }

                _ => false,
            }
        } else {
            match event {
                Event::Key(key_event) => {
                    match key_event.code {
                        KeyCode::Char(':') => {
                            self.active = true;
                            true
                        }

                        _ => false
                    }
                }

                _ => false
            }
        }
    }

    fn run_command(&self, buffer: &str, events: &Sender<AppEvent>) -> Result<()> {
        let parts: Vec<&str> = buffer.split_whitespace().collect();

        match parts.as_slice() {
            ["q"] => events.send(AppEvent::ExitApplication)?,

            ["login"] => events.send(AppEvent::SubmitLogin)?,
            ["logout"] => events.send(AppEvent::Logout)?,
            ["refresh"] => events.send(AppEvent::RefreshSession)?,

            ["back"] => events.send(AppEvent::NavigateBack)?,

            ["open", name_parts @ ..] => {
                if !name_parts.is_empty() {
                    let name = name_parts.join(" ");
                    events.send(AppEvent::OpenDialogByName(name))?
                }
            }

            ["msg", text_parts @ ..] => {
                if !text_parts.is_empty() {
                    let text = text_parts.join(" ");
                    events.send(AppEvent::SendMessage(text))?
                }
            }

            [] => {},            // empty (no command)

            [_cmd, ..] => {},    // unknown command (and params)
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn colon_activates_and_escape_deactivates() {
        let (tx, _rx) = mpsc::channel();
        let mut commander = Commander::new();
        assert!(!commander.active());

        assert!(commander.handle_event(key(KeyCode::Char(':')), &tx));
        assert!(commander.active());

        assert!(commander.handle_event(key(KeyCode::Esc), &tx));
        assert!(!commander.active());
    }

    #[test]
    fn other_keys_are_ignored_while_inactive() {
        let (tx, _rx) = mpsc::channel();
        let mut commander = Commander::new();
        assert!(!commander.handle_event(key(KeyCode::Char('x')), &tx));
    }

    #[test]
    fn submitting_a_quit_command_raises_the_exit_event() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();
        commander.handle_event(key(KeyCode::Char(':')), &tx);
        commander.handle_event(key(KeyCode::Char('q')), &tx);
        commander.handle_event(key(KeyCode::Enter), &tx);

        assert!(matches!(rx.try_recv(), Ok(AppEvent::ExitApplication)));
        assert!(!commander.active());
        assert!(commander.input.value().is_empty());
    }

    #[test]
    fn message_command_joins_the_remaining_words() {
        let (tx, rx) = mpsc::channel();
        let commander = Commander::new();
        commander.run_command("msg hello out there", &tx).unwrap();

        assert!(matches!(rx.try_recv(), Ok(AppEvent::SendMessage(text)) if text == "hello out there"));
    }

    #[test]
    fn open_without_a_name_does_nothing() {
        let (tx, rx) = mpsc::channel();
        let commander = Commander::new();
        commander.run_command("open", &tx).unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unknown_commands_are_ignored() {
        let (tx, rx) = mpsc::channel();
        let commander = Commander::new();
        commander.run_command("frobnicate now", &tx).unwrap();

        assert!(rx.try_recv().is_err());
    }
}
