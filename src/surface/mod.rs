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

//! Surface lifecycle and broadcast routing.
//!
//! A *surface* is one full-screen view (login, dialog roster, conversation).
//! Surfaces implement [`SurfaceHooks`] to be told about completed actions
//! and the service attaching; the [`SurfaceHelper`] owns the action registry
//! and the service handle on their behalf and routes every incoming
//! broadcast — global broadcasts to the injected [`GlobalActionsListener`],
//! everything else through the registry of the active surface.
//!
//! Registrations follow the surface lifecycle: populated on activation,
//! drained on deactivation, so a broadcast can never run a handler of a
//! surface that has left the screen.

use std::rc::Rc;

use crate::{
    actions::{
        builtin::{FailAction, SuccessAction},
        events::AppEvent,
        registry::{ActionContext, ActionRegistry, Command, Payload, PayloadValue},
    },
    service::{ServiceHandle, broadcast},
};

/// Override points a surface may implement; all default to no-ops.
pub(crate) trait SurfaceHooks {
    fn on_fail_action(&mut self, _action: &str) {}

    fn on_success_action(&mut self, _action: &str) {}

    fn on_connected_to_service(&mut self, _service: &ServiceHandle) {}
}

/// Receiver for broadcasts that are not tied to a requested operation.
pub(crate) trait GlobalActionsListener {
    fn on_chat_message(&mut self, cx: &mut ActionContext<'_>, payload: &Payload);

    fn on_force_relogin(&mut self, cx: &mut ActionContext<'_>, payload: &Payload);

    fn on_refresh_session(&mut self, cx: &mut ActionContext<'_>, payload: &Payload);

    fn on_friend_alert(&mut self, cx: &mut ActionContext<'_>, payload: &Payload);
}

/// Production listener: translates global broadcasts into application
/// events and chrome effects.
pub(crate) struct GlobalActions;

impl GlobalActionsListener for GlobalActions {
    fn on_chat_message(&mut self, cx: &mut ActionContext<'_>, payload: &Payload) {
        if let Some(PayloadValue::Message(message)) = payload.get(broadcast::EXTRA_MESSAGE) {
            let _ = cx.events.send(AppEvent::MessageReceived(message.clone()));
        }
    }

    fn on_force_relogin(&mut self, cx: &mut ActionContext<'_>, _payload: &Payload) {
        let _ = cx.events.send(AppEvent::ForceRelogin);
    }

    fn on_refresh_session(&mut self, cx: &mut ActionContext<'_>, _payload: &Payload) {
        cx.chrome.show_notice("Session expired, refreshing".into());
        cx.chrome.show_progress();
        let _ = cx.events.send(AppEvent::RefreshSession);
    }

    fn on_friend_alert(&mut self, cx: &mut ActionContext<'_>, payload: &Payload) {
        if let Some(message) = payload.str_value(broadcast::EXTRA_ALERT_MESSAGE) {
            let _ = cx.events.send(AppEvent::FriendAlert(message.to_string()));
        }
    }
}

/// Per-application helper composing the registry, the bound-service state
/// and the global listener. One instance serves whichever surface is active.
pub(crate) struct SurfaceHelper {
    registry: ActionRegistry,
    listener: Box<dyn GlobalActionsListener>,
    service: Option<ServiceHandle>,
    bound: bool,
    fail_action: Rc<FailAction>,
    success_action: Rc<SuccessAction>,
}

impl SurfaceHelper {
    pub(crate) fn new(listener: Box<dyn GlobalActionsListener>) -> Self {
        Self {
            registry: ActionRegistry::new(),
            listener,
            service: None,
            bound: false,
            fail_action: Rc::new(FailAction),
            success_action: Rc::new(SuccessAction),
        }
    }

    /// The shared failure command, for surfaces registering fail keys.
    pub(crate) fn fail_action(&self) -> Rc<FailAction> {
        Rc::clone(&self.fail_action)
    }

    /// The shared success command, for surfaces registering success keys.
    pub(crate) fn success_action(&self) -> Rc<SuccessAction> {
        Rc::clone(&self.success_action)
    }

    pub(crate) fn add_action(&mut self, key: impl Into<String>, command: Rc<dyn Command>) {
        self.registry.register(key, command);
    }

    pub(crate) fn has_action(&self, key: &str) -> bool {
        self.registry.has(key)
    }

    pub(crate) fn remove_action(&mut self, key: &str) {
        self.registry.unregister(key);
    }

    /// Surface activation: every surface listens for a completed sign-in.
    pub(crate) fn on_resume(&mut self) {
        self.add_action(broadcast::LOGIN_SUCCESS_ACTION, self.success_action());
    }

    /// Surface deactivation: drain all registrations.
    pub(crate) fn on_pause(&mut self) {
        self.registry.clear();
    }

    /// Completes the bind handshake by attaching the worker's handle.
    pub(crate) fn attach_service(&mut self, handle: ServiceHandle) {
        self.service = Some(handle);
        self.bound = true;
    }

    pub(crate) fn service(&self) -> Option<&ServiceHandle> {
        self.service.as_ref()
    }

    pub(crate) fn bound(&self) -> bool {
        self.bound
    }

    /// Fire-and-forget unbind; repeated calls are no-ops.
    pub(crate) fn unbind(&mut self) {
        if self.bound {
            if let Some(service) = self.service.take() {
                service.shutdown();
            }
            self.bound = false;
        }
    }

    /// Routes one incoming broadcast.
    ///
    /// Global broadcasts go to the listener; chat messages are dropped while
    /// the login surface is active, since nothing on screen can show them
    /// yet. Everything else is dispatched through the registry, where an
    /// unmatched key is silently ignored.
    pub(crate) fn route(
        &mut self,
        action: &str,
        cx: &mut ActionContext<'_>,
        payload: &Payload,
        on_login_surface: bool,
    ) {
        match action {
            broadcast::GOT_CHAT_MESSAGE_ACTION => {
                if !on_login_surface {
                    self.listener.on_chat_message(cx, payload);
                }
            }
            broadcast::FORCE_RELOGIN_ACTION => self.listener.on_force_relogin(cx, payload),
            broadcast::REFRESH_SESSION_ACTION => self.listener.on_refresh_session(cx, payload),
            broadcast::FRIEND_ALERT_ACTION => self.listener.on_friend_alert(cx, payload),
            _ => self.registry.dispatch(action, cx, payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver, Sender};

    use super::*;
    use crate::{chrome::Chrome, model::ChatMessage, service::ServiceCommand};

    #[derive(Default)]
    struct TestHooks;

    impl SurfaceHooks for TestHooks {}

    fn helper() -> SurfaceHelper {
        SurfaceHelper::new(Box::new(GlobalActions))
    }

    fn message() -> ChatMessage {
        ChatMessage {
            id: 1,
            dialog_id: 42,
            sender: "bob".into(),
            body: "hi".into(),
            sent_at: 1_700_000_000,
            incoming: true,
        }
    }

    fn route(
        helper: &mut SurfaceHelper,
        chrome: &mut Chrome,
        tx: &Sender<AppEvent>,
        action: &str,
        payload: &Payload,
        on_login_surface: bool,
    ) {
        let mut hooks = TestHooks;
        let mut cx = ActionContext {
            chrome,
            hooks: &mut hooks,
            events: tx,
        };
        helper.route(action, &mut cx, payload, on_login_surface);
    }

    fn drain(rx: &Receiver<AppEvent>) -> Vec<AppEvent> {
        let mut events = vec![];
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn resume_registers_the_login_success_action() {
        let mut helper = helper();
        assert!(!helper.has_action(broadcast::LOGIN_SUCCESS_ACTION));
        helper.on_resume();
        assert!(helper.has_action(broadcast::LOGIN_SUCCESS_ACTION));
    }

    #[test]
    fn remove_action_unregisters_a_single_key() {
        let mut helper = helper();
        helper.on_resume();
        helper.add_action(broadcast::LOAD_DIALOGS_FAIL_ACTION, helper.fail_action());

        helper.remove_action(broadcast::LOAD_DIALOGS_FAIL_ACTION);

        assert!(!helper.has_action(broadcast::LOAD_DIALOGS_FAIL_ACTION));
        assert!(helper.has_action(broadcast::LOGIN_SUCCESS_ACTION));
    }

    #[test]
    fn pause_drains_the_registry() {
        let mut helper = helper();
        helper.on_resume();
        helper.add_action(broadcast::LOAD_DIALOGS_FAIL_ACTION, helper.fail_action());
        helper.on_pause();
        assert!(!helper.has_action(broadcast::LOGIN_SUCCESS_ACTION));
        assert!(!helper.has_action(broadcast::LOAD_DIALOGS_FAIL_ACTION));
    }

    #[test]
    fn chat_message_broadcast_reaches_the_listener() {
        let mut helper = helper();
        let mut chrome = Chrome::new();
        let (tx, rx) = mpsc::channel();
        let payload = Payload::new().with(
            broadcast::EXTRA_MESSAGE,
            PayloadValue::Message(message()),
        );

        route(
            &mut helper,
            &mut chrome,
            &tx,
            broadcast::GOT_CHAT_MESSAGE_ACTION,
            &payload,
            false,
        );

        let events = drain(&rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], AppEvent::MessageReceived(m) if m.body == "hi"));
    }

    #[test]
    fn chat_message_broadcast_is_dropped_on_the_login_surface() {
        let mut helper = helper();
        let mut chrome = Chrome::new();
        let (tx, rx) = mpsc::channel();
        let payload = Payload::new().with(
            broadcast::EXTRA_MESSAGE,
            PayloadValue::Message(message()),
        );

        route(
            &mut helper,
            &mut chrome,
            &tx,
            broadcast::GOT_CHAT_MESSAGE_ACTION,
            &payload,
            true,
        );

        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn refresh_session_broadcast_prompts_and_requests_a_refresh() {
        let mut helper = helper();
        let mut chrome = Chrome::new();
        let (tx, rx) = mpsc::channel();

        route(
            &mut helper,
            &mut chrome,
            &tx,
            broadcast::REFRESH_SESSION_ACTION,
            &Payload::new(),
            false,
        );

        assert!(chrome.progress_visible());
        assert!(chrome.notice().is_some());
        let events = drain(&rx);
        assert!(matches!(events.as_slice(), [AppEvent::RefreshSession]));
    }

    #[test]
    fn friend_alert_broadcast_carries_the_alert_message() {
        let mut helper = helper();
        let mut chrome = Chrome::new();
        let (tx, rx) = mpsc::channel();
        let payload = Payload::new().with(
            broadcast::EXTRA_ALERT_MESSAGE,
            PayloadValue::Str("carol accepted your request".into()),
        );

        route(
            &mut helper,
            &mut chrome,
            &tx,
            broadcast::FRIEND_ALERT_ACTION,
            &payload,
            false,
        );

        let events = drain(&rx);
        assert!(
            matches!(&events[..], [AppEvent::FriendAlert(m)] if m == "carol accepted your request")
        );
    }

    #[test]
    fn unmatched_broadcast_is_silently_ignored() {
        let mut helper = helper();
        let mut chrome = Chrome::new();
        let (tx, rx) = mpsc::channel();

        route(
            &mut helper,
            &mut chrome,
            &tx,
            "no.one.listens",
            &Payload::new(),
            false,
        );

        assert!(drain(&rx).is_empty());
        assert!(!chrome.progress_visible());
    }

    #[test]
    fn unbind_is_idempotent() {
        let mut helper = helper();
        let (command_tx, command_rx) = mpsc::channel();
        helper.attach_service(ServiceHandle::new(command_tx));
        assert!(helper.bound());

        helper.unbind();
        helper.unbind();

        assert!(!helper.bound());
        assert!(helper.service().is_none());
        assert!(matches!(command_rx.try_recv(), Ok(ServiceCommand::Shutdown)));
        assert!(command_rx.try_recv().is_err());
    }
}
