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

//! Broadcast action vocabulary.
//!
//! Every operation the background service performs completes with exactly
//! one success or fail broadcast, keyed by the constants below. A handful of
//! *global* broadcasts are not tied to a requested operation at all; they
//! are pushed by the service when the server side raises them and are routed
//! to the global listener rather than the per-surface registry.
//!
//! The `EXTRA_*` constants name the payload fields each broadcast carries.

// Per-operation completion actions.
pub(crate) const LOGIN_SUCCESS_ACTION: &str = "session.login.success";
pub(crate) const LOGIN_FAIL_ACTION: &str = "session.login.fail";

pub(crate) const LOGOUT_SUCCESS_ACTION: &str = "session.logout.success";
pub(crate) const LOGOUT_FAIL_ACTION: &str = "session.logout.fail";

pub(crate) const REFRESH_SESSION_SUCCESS_ACTION: &str = "session.refresh.success";
pub(crate) const REFRESH_SESSION_FAIL_ACTION: &str = "session.refresh.fail";

pub(crate) const LOAD_DIALOGS_SUCCESS_ACTION: &str = "dialogs.load.success";
pub(crate) const LOAD_DIALOGS_FAIL_ACTION: &str = "dialogs.load.fail";

pub(crate) const LOAD_HISTORY_SUCCESS_ACTION: &str = "history.load.success";
pub(crate) const LOAD_HISTORY_FAIL_ACTION: &str = "history.load.fail";

pub(crate) const SEND_MESSAGE_SUCCESS_ACTION: &str = "message.send.success";
pub(crate) const SEND_MESSAGE_FAIL_ACTION: &str = "message.send.fail";

// Global broadcasts, routed to the global actions listener.
pub(crate) const GOT_CHAT_MESSAGE_ACTION: &str = "global.chat.message";
pub(crate) const FORCE_RELOGIN_ACTION: &str = "global.session.force-relogin";
pub(crate) const REFRESH_SESSION_ACTION: &str = "global.session.refresh";
pub(crate) const FRIEND_ALERT_ACTION: &str = "global.friend.alert";

// Payload field keys.
pub(crate) const EXTRA_ACTION: &str = "action";
pub(crate) const EXTRA_ERROR: &str = "error";
pub(crate) const EXTRA_ALERT_MESSAGE: &str = "alert_message";
pub(crate) const EXTRA_DIALOG_ID: &str = "dialog_id";
pub(crate) const EXTRA_MESSAGE: &str = "message";
pub(crate) const EXTRA_MESSAGES: &str = "messages";
pub(crate) const EXTRA_DIALOGS: &str = "dialogs";
pub(crate) const EXTRA_LOGIN: &str = "login";
