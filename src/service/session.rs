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

//! Chat session and transport seam.
//!
//! [`ChatSession`] owns the authenticated state of the service worker: the
//! user profile, a session token with a fixed time-to-live, and the
//! [`ChatTransport`] it talks through. Every data operation checks the token
//! first; an expired token surfaces as [`ServiceError::SessionExpired`] so
//! the worker can raise the global refresh-session broadcast instead of the
//! operation's own result.
//!
//! [`ChatTransport`] is the seam where a real chat backend would sit. The
//! shipped [`LoopbackTransport`] is an in-process stand-in: it echoes every
//! sent message back as an incoming one on the next poll, and can be
//! scripted to raise friend alerts or revoke authentication.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use rand::{RngExt, distr::Alphanumeric, rng};
use xxhash_rust::xxh3::xxh3_64;

use crate::{
    model::{ChatMessage, Credentials, Dialog, UserProfile},
    service::error::ServiceError,
};

const TOKEN_LEN: usize = 24;

/// Events the server side pushes without the client asking.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ServerPush {
    Message(ChatMessage),
    FriendAlert(String),
    AuthRevoked,
}

#[derive(Debug, Clone)]
pub(crate) struct SessionToken {
    pub(crate) token: String,
    expires_at: Instant,
}

impl SessionToken {
    fn issue(now: Instant, ttl: Duration) -> Self {
        let token = rng()
            .sample_iter(Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        Self {
            token,
            expires_at: now + ttl,
        }
    }

    pub(crate) fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

pub(crate) trait ChatTransport: Send {
    fn authenticate(&mut self, credentials: &Credentials) -> Result<UserProfile, ServiceError>;

    /// Exchanges the current session token for a fresh one.
    fn refresh(&mut self, token: &str) -> Result<(), ServiceError>;

    fn fetch_dialogs(&mut self) -> Result<Vec<Dialog>, ServiceError>;

    fn fetch_history(&mut self, dialog_id: i64) -> Result<Vec<ChatMessage>, ServiceError>;

    fn send_message(&mut self, message: &ChatMessage) -> Result<(), ServiceError>;

    /// Drains pending server-side pushes.
    fn poll(&mut self) -> Vec<ServerPush>;
}

/// In-process transport used when no real backend is configured.
pub(crate) struct LoopbackTransport {
    user: Option<UserProfile>,
    dialogs: Vec<Dialog>,
    pending: VecDeque<ServerPush>,
    fail_next_auth: bool,
}

const ECHO_PEER: &str = "echo";

impl LoopbackTransport {
    pub(crate) fn new() -> Self {
        Self {
            user: None,
            dialogs: vec![],
            pending: VecDeque::new(),
            fail_next_auth: false,
        }
    }

    /// Queues a friend alert for the next poll.
    pub(crate) fn push_friend_alert(&mut self, message: impl Into<String>) {
        self.pending.push_back(ServerPush::FriendAlert(message.into()));
    }

    /// Queues an authentication revocation for the next poll.
    pub(crate) fn revoke_auth(&mut self) {
        self.user = None;
        self.pending.push_back(ServerPush::AuthRevoked);
    }

    /// Makes the next authenticate call fail.
    pub(crate) fn fail_next_auth(&mut self) {
        self.fail_next_auth = true;
    }

    fn dialog(&self, dialog_id: i64) -> Result<&Dialog, ServiceError> {
        self.dialogs
            .iter()
            .find(|d| d.id == dialog_id)
            .ok_or(ServiceError::UnknownDialog(dialog_id))
    }
}

impl ChatTransport for LoopbackTransport {
    fn authenticate(&mut self, credentials: &Credentials) -> Result<UserProfile, ServiceError> {
        if self.fail_next_auth {
            self.fail_next_auth = false;
            return Err(ServiceError::AuthFailed {
                login: credentials.login.clone(),
            });
        }
        if credentials.login.trim().is_empty() {
            return Err(ServiceError::AuthFailed {
                login: credentials.login.clone(),
            });
        }

        let login = credentials.login.trim().to_string();
        let profile = UserProfile {
            id: xxh3_64(login.as_bytes()) as i64,
            full_name: login.clone(),
            login,
        };

        // One seeded conversation so a fresh account has someone to talk to.
        let occupants = vec![profile.login.clone(), ECHO_PEER.to_string()];
        self.dialogs = vec![Dialog {
            id: Dialog::durable_id(&occupants),
            name: ECHO_PEER.to_string(),
            occupants,
            last_message: None,
            last_activity: 0,
            unread_count: 0,
        }];
        self.user = Some(profile.clone());
        Ok(profile)
    }

    fn refresh(&mut self, _token: &str) -> Result<(), ServiceError> {
        match self.user {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotLoggedIn),
        }
    }

    fn fetch_dialogs(&mut self) -> Result<Vec<Dialog>, ServiceError> {
        Ok(self.dialogs.clone())
    }

    fn fetch_history(&mut self, dialog_id: i64) -> Result<Vec<ChatMessage>, ServiceError> {
        // The loopback keeps no server-side history; the local store is the
        // only record.
        self.dialog(dialog_id).map(|_| vec![])
    }

    fn send_message(&mut self, message: &ChatMessage) -> Result<(), ServiceError> {
        self.dialog(message.dialog_id)?;
        self.pending.push_back(ServerPush::Message(ChatMessage {
            id: 0,
            dialog_id: message.dialog_id,
            sender: ECHO_PEER.to_string(),
            body: message.body.clone(),
            sent_at: message.sent_at,
            incoming: true,
        }));
        Ok(())
    }

    fn poll(&mut self) -> Vec<ServerPush> {
        self.pending.drain(..).collect()
    }
}

/// Authenticated session state owned by the service worker.
pub(crate) struct ChatSession {
    transport: Box<dyn ChatTransport>,
    profile: Option<UserProfile>,
    token: Option<SessionToken>,
    ttl: Duration,
}

impl ChatSession {
    pub(crate) fn new(transport: Box<dyn ChatTransport>, ttl: Duration) -> Self {
        Self {
            transport,
            profile: None,
            token: None,
            ttl,
        }
    }

    pub(crate) fn login(
        &mut self,
        credentials: &Credentials,
        now: Instant,
    ) -> Result<UserProfile, ServiceError> {
        let profile = self.transport.authenticate(credentials)?;
        self.token = Some(SessionToken::issue(now, self.ttl));
        self.profile = Some(profile.clone());
        Ok(profile)
    }

    pub(crate) fn logout(&mut self) {
        self.profile = None;
        self.token = None;
    }

    /// Re-issues the session token without touching the profile.
    ///
    /// The stale token is presented to the transport; expiry does not matter
    /// here, only revocation does.
    pub(crate) fn refresh(&mut self, now: Instant) -> Result<(), ServiceError> {
        let token = self.token.as_ref().ok_or(ServiceError::NotLoggedIn)?;
        self.transport.refresh(&token.token)?;
        self.token = Some(SessionToken::issue(now, self.ttl));
        Ok(())
    }

    pub(crate) fn ensure_active(&self, now: Instant) -> Result<(), ServiceError> {
        match &self.token {
            None => Err(ServiceError::NotLoggedIn),
            Some(token) if token.expired(now) => Err(ServiceError::SessionExpired),
            Some(_) => Ok(()),
        }
    }

    pub(crate) fn dialogs(&mut self, now: Instant) -> Result<Vec<Dialog>, ServiceError> {
        self.ensure_active(now)?;
        self.transport.fetch_dialogs()
    }

    pub(crate) fn history(
        &mut self,
        dialog_id: i64,
        now: Instant,
    ) -> Result<Vec<ChatMessage>, ServiceError> {
        self.ensure_active(now)?;
        self.transport.fetch_history(dialog_id)
    }

    /// Builds and sends an outgoing message, returning the sent copy.
    pub(crate) fn send(
        &mut self,
        dialog_id: i64,
        body: String,
        sent_at: i64,
        now: Instant,
    ) -> Result<ChatMessage, ServiceError> {
        self.ensure_active(now)?;
        let sender = self
            .profile
            .as_ref()
            .map(|p| p.login.clone())
            .ok_or(ServiceError::NotLoggedIn)?;
        let message = ChatMessage {
            id: 0,
            dialog_id,
            sender,
            body,
            sent_at,
            incoming: false,
        };
        self.transport.send_message(&message)?;
        Ok(message)
    }

    pub(crate) fn poll(&mut self) -> Vec<ServerPush> {
        self.transport.poll()
    }

    pub(crate) fn logged_in(&self) -> bool {
        self.profile.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn credentials() -> Credentials {
        Credentials {
            login: "alice".into(),
            password: "secret".into(),
        }
    }

    fn session() -> ChatSession {
        ChatSession::new(Box::new(LoopbackTransport::new()), TTL)
    }

    #[test]
    fn login_issues_a_token_and_a_profile() {
        let mut session = session();
        let now = Instant::now();
        let profile = session.login(&credentials(), now).unwrap();

        assert_eq!(profile.login, "alice");
        assert!(session.logged_in());
        assert!(session.ensure_active(now).is_ok());
    }

    #[test]
    fn blank_login_is_rejected() {
        let mut session = session();
        let err = session
            .login(
                &Credentials {
                    login: "  ".into(),
                    password: "x".into(),
                },
                Instant::now(),
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::AuthFailed { .. }));
        assert!(!session.logged_in());
    }

    #[test]
    fn data_operations_require_a_session() {
        let mut session = session();
        let err = session.dialogs(Instant::now()).unwrap_err();
        assert_eq!(err, ServiceError::NotLoggedIn);
    }

    #[test]
    fn expired_token_reports_session_expired() {
        let mut session = session();
        let now = Instant::now();
        session.login(&credentials(), now).unwrap();

        let later = now + TTL + Duration::from_secs(1);
        assert_eq!(
            session.dialogs(later).unwrap_err(),
            ServiceError::SessionExpired
        );
    }

    #[test]
    fn refresh_reissues_the_token() {
        let mut session = session();
        let now = Instant::now();
        session.login(&credentials(), now).unwrap();

        let later = now + TTL + Duration::from_secs(1);
        session.refresh(later).unwrap();
        assert!(session.dialogs(later).is_ok());
    }

    #[test]
    fn sent_messages_echo_back_on_the_next_poll() {
        let mut session = session();
        let now = Instant::now();
        session.login(&credentials(), now).unwrap();

        let dialog = session.dialogs(now).unwrap().remove(0);
        let sent = session
            .send(dialog.id, "hello there".into(), 1_700_000_000, now)
            .unwrap();
        assert_eq!(sent.sender, "alice");
        assert!(!sent.incoming);

        let pushes = session.poll();
        assert_eq!(pushes.len(), 1);
        match &pushes[0] {
            ServerPush::Message(echo) => {
                assert_eq!(echo.body, "hello there");
                assert_eq!(echo.sender, ECHO_PEER);
                assert!(echo.incoming);
            }
            other => panic!("unexpected push: {other:?}"),
        }
    }

    #[test]
    fn sending_to_an_unknown_dialog_fails() {
        let mut session = session();
        let now = Instant::now();
        session.login(&credentials(), now).unwrap();

        let err = session.send(999, "hi".into(), 0, now).unwrap_err();
        assert_eq!(err, ServiceError::UnknownDialog(999));
    }

    #[test]
    fn revoked_auth_is_surfaced_as_a_push() {
        let mut transport = LoopbackTransport::new();
        transport.revoke_auth();
        let mut session = ChatSession::new(Box::new(transport), TTL);
        assert_eq!(session.poll(), vec![ServerPush::AuthRevoked]);
    }

    #[test]
    fn scripted_auth_failure_fails_once() {
        let mut transport = LoopbackTransport::new();
        transport.fail_next_auth();
        let mut session = ChatSession::new(Box::new(transport), TTL);
        let now = Instant::now();

        assert!(session.login(&credentials(), now).is_err());
        assert!(session.login(&credentials(), now).is_ok());
    }
}
