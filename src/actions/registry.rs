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

//! Action dispatch registry.
//!
//! The background service completes its work by emitting *broadcast actions*:
//! a string key plus a payload of heterogeneous values. UI surfaces register
//! a [`Command`] per action key they care about while they are active; the
//! registry dispatches each broadcast synchronously on the UI thread to the
//! registered command, and silently drops broadcasts nothing registered for.
//! Many broadcasts are delivered to whichever surface happens to be active,
//! so an unmatched key is routine, not an error.
//!
//! The registry is plain single-threaded state owned by the surface helper;
//! commands are shared via [`Rc`] so dispatch can run a command while the
//! registry itself stays borrowed immutably.

use std::{collections::HashMap, rc::Rc, sync::mpsc::Sender};

use crate::{
    actions::events::AppEvent,
    chrome::Chrome,
    model::{ChatMessage, Dialog},
    service::error::ServiceError,
    surface::SurfaceHooks,
};

pub(crate) type EventKey = String;

/// A single heterogeneous payload value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PayloadValue {
    Str(String),
    Int(i64),
    Flag(bool),
    Error(ServiceError),
    Message(ChatMessage),
    Messages(Vec<ChatMessage>),
    Dialogs(Vec<Dialog>),
}

/// An insertion-ordered mapping from field key to [`PayloadValue`].
///
/// Inserting an existing key replaces the value in place, keeping the
/// original position, so iteration order is deterministic for a given
/// construction sequence.
#[derive(Debug, Clone, Default)]
pub(crate) struct Payload {
    entries: Vec<(String, PayloadValue)>,
}

impl Payload {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for assembling payloads in the service worker.
    pub(crate) fn with(mut self, key: impl Into<String>, value: PayloadValue) -> Self {
        self.insert(key, value);
        self
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: PayloadValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub(crate) fn str_value(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(PayloadValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn int_value(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(PayloadValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub(crate) fn error_value(&self, key: &str) -> Option<&ServiceError> {
        match self.get(key) {
            Some(PayloadValue::Error(e)) => Some(e),
            _ => None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Collaborators a command may touch while it executes.
///
/// Dispatch happens on the UI thread, so a command gets direct mutable
/// access to the shared chrome and to the active surface's hooks, plus the
/// application event sender for follow-up work that must go back through
/// the event loop.
pub(crate) struct ActionContext<'a> {
    pub(crate) chrome: &'a mut Chrome,
    pub(crate) hooks: &'a mut dyn SurfaceHooks,
    pub(crate) events: &'a Sender<AppEvent>,
}

/// A one-shot unit of work bound to an action key.
pub(crate) trait Command {
    fn execute(&self, cx: &mut ActionContext<'_>, payload: &Payload);
}

/// Mapping from action key to registered command.
///
/// At most one command is registered per key; registering again replaces the
/// previous command. Entries are added when a surface becomes active and
/// drained when it goes inactive, so a broadcast can never reach a handler
/// belonging to a surface that is no longer on screen.
#[derive(Default)]
pub(crate) struct ActionRegistry {
    actions: HashMap<EventKey, Rc<dyn Command>>,
}

impl ActionRegistry {
    pub(crate) fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Inserts or replaces the command for `key`. Last registration wins.
    pub(crate) fn register(&mut self, key: impl Into<EventKey>, command: Rc<dyn Command>) {
        self.actions.insert(key.into(), command);
    }

    /// Removes the mapping for `key`, if any.
    pub(crate) fn unregister(&mut self, key: &str) {
        self.actions.remove(key);
    }

    pub(crate) fn has(&self, key: &str) -> bool {
        self.actions.contains_key(key)
    }

    /// Drains every registration.
    pub(crate) fn clear(&mut self) {
        self.actions.clear();
    }

    /// Invokes the command registered for `key` synchronously with `payload`.
    ///
    /// A missing registration is a no-op; dispatch never fails.
    pub(crate) fn dispatch(&self, key: &str, cx: &mut ActionContext<'_>, payload: &Payload) {
        if let Some(command) = self.actions.get(key) {
            Rc::clone(command).execute(cx, payload);
        }
    }
}
