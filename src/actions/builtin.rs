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

//! Built-in completion commands.
//!
//! Most service operations only need the generic completion behaviour:
//! clear the progress indicator and tell the active surface which action
//! finished. Surfaces register these two shared commands for any action key
//! whose outcome they do not handle specially; commands that also carry data
//! delegate to them first and then unpack their payload.

use crate::{
    actions::registry::{ActionContext, Command, Payload},
    service::broadcast,
};

/// Generic failure handler: surface the error, clear progress, forward the
/// originating action to the surface hook.
pub(crate) struct FailAction;

impl Command for FailAction {
    fn execute(&self, cx: &mut ActionContext<'_>, payload: &Payload) {
        if let Some(error) = payload.error_value(broadcast::EXTRA_ERROR) {
            cx.chrome.show_notice(format!("Error: {error}"));
        }
        cx.chrome.hide_progress();
        cx.chrome.set_busy(false);
        if let Some(action) = payload.str_value(broadcast::EXTRA_ACTION) {
            cx.hooks.on_fail_action(action);
        }
    }
}

/// Generic success handler: clear progress, forward the originating action
/// to the surface hook.
pub(crate) struct SuccessAction;

impl Command for SuccessAction {
    fn execute(&self, cx: &mut ActionContext<'_>, payload: &Payload) {
        cx.chrome.hide_progress();
        cx.chrome.set_busy(false);
        if let Some(action) = payload.str_value(broadcast::EXTRA_ACTION) {
            cx.hooks.on_success_action(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::{
        actions::registry::PayloadValue, chrome::Chrome, service::error::ServiceError,
        surface::SurfaceHooks,
    };

    #[derive(Default)]
    struct TestHooks {
        failed: Vec<String>,
        succeeded: Vec<String>,
    }

    impl SurfaceHooks for TestHooks {
        fn on_fail_action(&mut self, action: &str) {
            self.failed.push(action.to_string());
        }

        fn on_success_action(&mut self, action: &str) {
            self.succeeded.push(action.to_string());
        }
    }

    #[test]
    fn fail_action_surfaces_error_clears_progress_and_forwards() {
        let mut chrome = Chrome::new();
        chrome.show_progress();
        let mut hooks = TestHooks::default();
        let (tx, _rx) = mpsc::channel();

        let payload = Payload::new()
            .with(
                broadcast::EXTRA_ERROR,
                PayloadValue::Error(ServiceError::SessionExpired),
            )
            .with(
                broadcast::EXTRA_ACTION,
                PayloadValue::Str(broadcast::LOGIN_FAIL_ACTION.into()),
            );

        let mut cx = ActionContext {
            chrome: &mut chrome,
            hooks: &mut hooks,
            events: &tx,
        };
        FailAction.execute(&mut cx, &payload);

        assert!(!chrome.progress_visible());
        assert!(chrome.notice().unwrap().contains("session expired"));
        assert_eq!(hooks.failed, vec![broadcast::LOGIN_FAIL_ACTION.to_string()]);
        assert!(hooks.succeeded.is_empty());
    }

    #[test]
    fn fail_action_without_error_object_still_completes() {
        let mut chrome = Chrome::new();
        chrome.show_progress();
        let mut hooks = TestHooks::default();
        let (tx, _rx) = mpsc::channel();

        let payload = Payload::new().with(
            broadcast::EXTRA_ACTION,
            PayloadValue::Str("some.action".into()),
        );

        let mut cx = ActionContext {
            chrome: &mut chrome,
            hooks: &mut hooks,
            events: &tx,
        };
        FailAction.execute(&mut cx, &payload);

        assert!(!chrome.progress_visible());
        assert!(chrome.notice().is_none());
        assert_eq!(hooks.failed, vec!["some.action".to_string()]);
    }

    #[test]
    fn success_action_clears_progress_and_forwards() {
        let mut chrome = Chrome::new();
        chrome.show_progress();
        let mut hooks = TestHooks::default();
        let (tx, _rx) = mpsc::channel();

        let payload = Payload::new().with(
            broadcast::EXTRA_ACTION,
            PayloadValue::Str(broadcast::LOGIN_SUCCESS_ACTION.into()),
        );

        let mut cx = ActionContext {
            chrome: &mut chrome,
            hooks: &mut hooks,
            events: &tx,
        };
        SuccessAction.execute(&mut cx, &payload);

        assert!(!chrome.progress_visible());
        assert_eq!(
            hooks.succeeded,
            vec![broadcast::LOGIN_SUCCESS_ACTION.to_string()]
        );
        assert!(hooks.failed.is_empty());
    }
}
