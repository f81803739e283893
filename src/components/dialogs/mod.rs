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

//! Dialog roster surface.
//!
//! Lists every known conversation with its latest message and unread count.
//! Selection wraps around the list; activating a row opens the conversation
//! surface.

use ratatui::widgets::ListState;

use crate::{
    actions::{
        builtin::SuccessAction,
        events::AppEvent,
        registry::{ActionContext, Command, Payload, PayloadValue},
    },
    model::{ChatMessage, Dialog},
    service::broadcast,
    surface::SurfaceHooks,
};

pub(crate) struct DialogListView {
    pub(crate) dialogs: Vec<Dialog>,
    pub(crate) list_state: ListState,
}

impl DialogListView {
    pub(crate) fn new() -> Self {
        Self {
            dialogs: vec![],
            list_state: ListState::default(),
        }
    }

    pub(crate) fn set_dialogs(&mut self, dialogs: Vec<Dialog>) {
        self.dialogs = dialogs;
        if self.list_state.selected().is_none() && !self.dialogs.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub(crate) fn goto_next(&mut self) {
        let len = self.dialogs.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub(crate) fn goto_previous(&mut self) {
        let len = self.dialogs.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub(crate) fn selected(&self) -> Option<&Dialog> {
        self.list_state.selected().and_then(|i| self.dialogs.get(i))
    }

    /// Rolls a dialog's preview forward for a message already on screen.
    pub(crate) fn note_outgoing(&mut self, message: &ChatMessage) {
        if let Some(dialog) = self.dialogs.iter_mut().find(|d| d.id == message.dialog_id) {
            dialog.last_message = Some(message.body.clone());
            dialog.last_activity = message.sent_at;
        }
    }

    /// Rolls a dialog's preview and unread count forward for a message that
    /// arrived while its conversation was not on screen.
    pub(crate) fn note_incoming(&mut self, message: &ChatMessage) {
        self.note_outgoing(message);
        if let Some(dialog) = self.dialogs.iter_mut().find(|d| d.id == message.dialog_id) {
            dialog.unread_count += 1;
        }
    }

    /// Clears the unread counter when a conversation is opened.
    pub(crate) fn mark_read(&mut self, dialog_id: i64) {
        if let Some(dialog) = self.dialogs.iter_mut().find(|d| d.id == dialog_id) {
            dialog.unread_count = 0;
        }
    }
}

impl SurfaceHooks for DialogListView {}

/// Completion command for a dialog list load: generic success handling,
/// then hand the roster to the event loop.
pub(crate) struct DialogsLoaded;

impl Command for DialogsLoaded {
    fn execute(&self, cx: &mut ActionContext<'_>, payload: &Payload) {
        SuccessAction.execute(cx, payload);
        if let Some(PayloadValue::Dialogs(dialogs)) = payload.get(broadcast::EXTRA_DIALOGS) {
            let _ = cx.events.send(AppEvent::SetDialogs(dialogs.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog(id: i64, name: &str) -> Dialog {
        Dialog {
            id,
            name: name.into(),
            occupants: vec![],
            last_message: None,
            last_activity: 0,
            unread_count: 0,
        }
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut view = DialogListView::new();
        view.set_dialogs(vec![dialog(1, "a"), dialog(2, "b")]);
        assert_eq!(view.selected().unwrap().id, 1);

        view.goto_next();
        assert_eq!(view.selected().unwrap().id, 2);
        view.goto_next();
        assert_eq!(view.selected().unwrap().id, 1);
        view.goto_previous();
        assert_eq!(view.selected().unwrap().id, 2);
    }

    #[test]
    fn incoming_note_bumps_unread_and_preview() {
        let mut view = DialogListView::new();
        view.set_dialogs(vec![dialog(7, "bob")]);

        view.note_incoming(&ChatMessage {
            id: 0,
            dialog_id: 7,
            sender: "bob".into(),
            body: "hello".into(),
            sent_at: 100,
            incoming: true,
        });

        let d = &view.dialogs[0];
        assert_eq!(d.unread_count, 1);
        assert_eq!(d.last_message.as_deref(), Some("hello"));

        view.mark_read(7);
        assert_eq!(view.dialogs[0].unread_count, 0);
    }
}
