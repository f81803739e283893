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

//! Conversation surface.
//!
//! Shows one dialog's history and a managed compose input. History arrives
//! through the action registry; stray deliveries for a different dialog
//! (possible when the user navigates while a load is in flight) are
//! discarded instead of being spliced into the open conversation.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    actions::{
        builtin::SuccessAction,
        events::{AppEvent, AppEventProcessor},
        registry::{ActionContext, Command, Payload, PayloadValue},
    },
    model::{ChatMessage, Dialog},
    service::broadcast,
    surface::SurfaceHooks,
};

pub(crate) struct ChatView {
    pub(crate) dialog_id: Option<i64>,
    pub(crate) title: String,
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) compose: Input,
}

impl ChatView {
    pub(crate) fn new() -> Self {
        Self {
            dialog_id: None,
            title: String::new(),
            messages: vec![],
            compose: Input::default(),
        }
    }

    pub(crate) fn open(&mut self, dialog: &Dialog) {
        self.dialog_id = Some(dialog.id);
        self.title = dialog.name.clone();
        self.messages.clear();
        self.compose.reset();
    }

    pub(crate) fn close(&mut self) {
        self.dialog_id = None;
        self.messages.clear();
    }

    pub(crate) fn is_open(&self, dialog_id: i64) -> bool {
        self.dialog_id == Some(dialog_id)
    }

    pub(crate) fn set_history(&mut self, dialog_id: i64, messages: Vec<ChatMessage>) {
        if self.is_open(dialog_id) {
            self.messages = messages;
        }
    }

    pub(crate) fn append(&mut self, message: &ChatMessage) {
        if self.is_open(message.dialog_id) {
            self.messages.push(message.clone());
        }
    }
}

impl AppEventProcessor for ChatView {
    fn process_event(&mut self, event: Event, event_tx: &Sender<AppEvent>) -> Result<()> {
        if let Event::Key(key) = &event {
            match key.code {
                KeyCode::Enter => {
                    let body = self.compose.value().trim().to_string();
                    if !body.is_empty() {
                        event_tx.send(AppEvent::SendMessage(body))?;
                        self.compose.reset();
                    }
                }
                _ => {
                    self.compose.handle_event(&event);
                }
            }
        }
        Ok(())
    }
}

impl SurfaceHooks for ChatView {}

/// Completion command for a history load: generic success handling, then
/// hand the page to the event loop.
pub(crate) struct HistoryLoaded;

impl Command for HistoryLoaded {
    fn execute(&self, cx: &mut ActionContext<'_>, payload: &Payload) {
        SuccessAction.execute(cx, payload);
        let Some(dialog_id) = payload.int_value(broadcast::EXTRA_DIALOG_ID) else {
            return;
        };
        if let Some(PayloadValue::Messages(messages)) = payload.get(broadcast::EXTRA_MESSAGES) {
            let _ = cx.events.send(AppEvent::SetHistory {
                dialog_id,
                messages: messages.clone(),
            });
        }
    }
}

/// Completion command for an outgoing message: the sent copy comes back in
/// the payload and is appended to the open conversation.
pub(crate) struct MessageSent;

impl Command for MessageSent {
    fn execute(&self, cx: &mut ActionContext<'_>, payload: &Payload) {
        SuccessAction.execute(cx, payload);
        if let Some(PayloadValue::Message(message)) = payload.get(broadcast::EXTRA_MESSAGE) {
            let _ = cx.events.send(AppEvent::MessageSent(message.clone()));
        }
    }
}
