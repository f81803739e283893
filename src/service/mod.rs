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

//! Background chat service worker.
//!
//! The worker is the application's bound service: it owns the chat session
//! and the message store on a dedicated thread, consumes [`ServiceCommand`]s
//! and completes every one with a success or fail broadcast. Binding is a
//! one-shot asynchronous handshake — [`bind`] spawns the thread, and once
//! the worker has its store open it delivers a [`ServiceHandle`] back
//! through the event channel. Unbinding is fire-and-forget from the UI side;
//! the handle's owner tracks a bound flag so a double unbind is a no-op.
//!
//! Commands attempted against an expired session do not produce their own
//! result; the worker raises the global refresh-session broadcast instead
//! and the UI re-drives the operation after refreshing.

pub(crate) mod broadcast;
pub(crate) mod error;
pub(crate) mod session;

use std::{
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::{
    actions::{
        events::AppEvent,
        registry::{Payload, PayloadValue},
    },
    config::AppConfig,
    db,
    model::Credentials,
    service::{
        error::ServiceError,
        session::{ChatSession, ChatTransport, ServerPush},
    },
};

const PUSH_POLL_INTERVAL: Duration = Duration::from_millis(250);

const HISTORY_PAGE: usize = 200;

#[derive(Debug)]
pub(crate) enum ServiceCommand {
    Login(Credentials),
    Logout,
    RefreshSession,
    LoadDialogs,
    LoadHistory { dialog_id: i64 },
    SendMessage { dialog_id: i64, body: String },
    Shutdown,
}

/// Long-lived handle delivered by the bind handshake.
#[derive(Debug, Clone)]
pub(crate) struct ServiceHandle {
    command_tx: Sender<ServiceCommand>,
}

impl ServiceHandle {
    pub(crate) fn new(command_tx: Sender<ServiceCommand>) -> Self {
        Self { command_tx }
    }

    /// Queues a command for the worker.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has already shut down.
    pub(crate) fn send(&self, command: ServiceCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| anyhow!("chat service is not running"))
    }

    /// Fire-and-forget shutdown request.
    pub(crate) fn shutdown(&self) {
        let _ = self.command_tx.send(ServiceCommand::Shutdown);
    }
}

/// Spawns the service worker and starts the bind handshake.
///
/// The worker opens its own message store connection; on success it emits
/// [`AppEvent::ServiceConnected`] with the command handle, on failure a
/// fatal event. Either way this function returns immediately.
pub(crate) fn bind(
    config: &AppConfig,
    transport: Box<dyn ChatTransport>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        let conn = match db::init_db(&config.history_db) {
            Ok(conn) => conn,
            Err(e) => {
                let _ = event_tx.send(AppEvent::FatalError(format!(
                    "Failed to open message store: {e:#}"
                )));
                return;
            }
        };

        let mut session = ChatSession::new(
            transport,
            Duration::from_secs(config.session_ttl_secs),
        );

        let (command_tx, command_rx) = mpsc::channel();
        let _ = event_tx.send(AppEvent::ServiceConnected(ServiceHandle::new(command_tx)));

        loop {
            match command_rx.recv_timeout(PUSH_POLL_INTERVAL) {
                Ok(ServiceCommand::Shutdown) => break,
                Ok(command) => {
                    if let Err(e) = handle_command(&mut session, &conn, command, &event_tx) {
                        let _ = event_tx.send(AppEvent::Error(e.to_string()));
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if let Err(e) = deliver_pushes(&mut session, &conn, &event_tx) {
                let _ = event_tx.send(AppEvent::Error(e.to_string()));
            }
        }
    });
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Emits one broadcast, stamping the originating action into the payload.
fn emit(event_tx: &Sender<AppEvent>, action: &str, payload: Payload) {
    let payload = payload.with(
        broadcast::EXTRA_ACTION,
        PayloadValue::Str(action.to_string()),
    );
    let _ = event_tx.send(AppEvent::Broadcast {
        action: action.to_string(),
        payload,
    });
}

fn fail_payload(error: ServiceError) -> Payload {
    Payload::new().with(broadcast::EXTRA_ERROR, PayloadValue::Error(error))
}

/// Executes a single command and broadcasts its outcome.
///
/// Only storage failures escape as hard errors; everything the session or
/// transport reports is folded into a fail broadcast, and an expired
/// session turns into the global refresh-session broadcast.
fn handle_command(
    session: &mut ChatSession,
    conn: &Connection,
    command: ServiceCommand,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    let now = Instant::now();

    match command {
        ServiceCommand::Login(credentials) => match session.login(&credentials, now) {
            Ok(profile) => emit(
                event_tx,
                broadcast::LOGIN_SUCCESS_ACTION,
                Payload::new().with(broadcast::EXTRA_LOGIN, PayloadValue::Str(profile.login)),
            ),
            Err(e) => emit(event_tx, broadcast::LOGIN_FAIL_ACTION, fail_payload(e)),
        },

        ServiceCommand::Logout => {
            session.logout();
            emit(event_tx, broadcast::LOGOUT_SUCCESS_ACTION, Payload::new());
        }

        ServiceCommand::RefreshSession => match session.refresh(now) {
            Ok(()) => emit(
                event_tx,
                broadcast::REFRESH_SESSION_SUCCESS_ACTION,
                Payload::new(),
            ),
            Err(e) => emit(
                event_tx,
                broadcast::REFRESH_SESSION_FAIL_ACTION,
                fail_payload(e),
            ),
        },

        ServiceCommand::LoadDialogs => match session.dialogs(now) {
            Ok(dialogs) => {
                for dialog in &dialogs {
                    db::upsert_dialog(conn, dialog)?;
                }
                // Local rows carry activity and last-message state the
                // transport does not know about.
                let dialogs = db::fetch_dialogs(conn)?;
                emit(
                    event_tx,
                    broadcast::LOAD_DIALOGS_SUCCESS_ACTION,
                    Payload::new().with(broadcast::EXTRA_DIALOGS, PayloadValue::Dialogs(dialogs)),
                );
            }
            Err(ServiceError::SessionExpired) => {
                emit(event_tx, broadcast::REFRESH_SESSION_ACTION, Payload::new());
            }
            Err(e) => emit(
                event_tx,
                broadcast::LOAD_DIALOGS_FAIL_ACTION,
                fail_payload(e),
            ),
        },

        ServiceCommand::LoadHistory { dialog_id } => match session.history(dialog_id, now) {
            Ok(remote) => {
                for message in &remote {
                    db::append_message(conn, message)?;
                }
                let messages = db::fetch_history(conn, dialog_id, HISTORY_PAGE)?;
                emit(
                    event_tx,
                    broadcast::LOAD_HISTORY_SUCCESS_ACTION,
                    Payload::new()
                        .with(broadcast::EXTRA_DIALOG_ID, PayloadValue::Int(dialog_id))
                        .with(broadcast::EXTRA_MESSAGES, PayloadValue::Messages(messages)),
                );
            }
            Err(ServiceError::SessionExpired) => {
                emit(event_tx, broadcast::REFRESH_SESSION_ACTION, Payload::new());
            }
            Err(e) => emit(
                event_tx,
                broadcast::LOAD_HISTORY_FAIL_ACTION,
                fail_payload(e),
            ),
        },

        ServiceCommand::SendMessage { dialog_id, body } => {
            match session.send(dialog_id, body, now_unix(), now) {
                Ok(message) => {
                    db::append_message(conn, &message)?;
                    emit(
                        event_tx,
                        broadcast::SEND_MESSAGE_SUCCESS_ACTION,
                        Payload::new()
                            .with(broadcast::EXTRA_DIALOG_ID, PayloadValue::Int(dialog_id))
                            .with(broadcast::EXTRA_MESSAGE, PayloadValue::Message(message)),
                    );
                }
                Err(ServiceError::SessionExpired) => {
                    emit(event_tx, broadcast::REFRESH_SESSION_ACTION, Payload::new());
                }
                Err(e) => emit(
                    event_tx,
                    broadcast::SEND_MESSAGE_FAIL_ACTION,
                    fail_payload(e),
                ),
            }
        }

        // Handled by the worker loop before dispatch.
        ServiceCommand::Shutdown => {}
    }

    Ok(())
}

/// Persists and broadcasts server-side pushes.
fn deliver_pushes(
    session: &mut ChatSession,
    conn: &Connection,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    for push in session.poll() {
        match push {
            ServerPush::Message(message) => {
                db::append_message(conn, &message)?;
                emit(
                    event_tx,
                    broadcast::GOT_CHAT_MESSAGE_ACTION,
                    Payload::new()
                        .with(
                            broadcast::EXTRA_DIALOG_ID,
                            PayloadValue::Int(message.dialog_id),
                        )
                        .with(broadcast::EXTRA_MESSAGE, PayloadValue::Message(message)),
                );
            }
            ServerPush::FriendAlert(message) => emit(
                event_tx,
                broadcast::FRIEND_ALERT_ACTION,
                Payload::new().with(
                    broadcast::EXTRA_ALERT_MESSAGE,
                    PayloadValue::Str(message),
                ),
            ),
            ServerPush::AuthRevoked => {
                session.logout();
                emit(event_tx, broadcast::FORCE_RELOGIN_ACTION, Payload::new());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Receiver;

    use super::*;
    use crate::{model::Dialog, service::session::LoopbackTransport};

    const TTL: Duration = Duration::from_secs(60);

    fn setup(ttl: Duration) -> (ChatSession, Connection, Sender<AppEvent>, Receiver<AppEvent>) {
        let conn = Connection::open_in_memory().unwrap();
        db::create_schema(&conn).unwrap();
        let session = ChatSession::new(Box::new(LoopbackTransport::new()), ttl);
        let (tx, rx) = mpsc::channel();
        (session, conn, tx, rx)
    }

    fn credentials() -> Credentials {
        Credentials {
            login: "alice".into(),
            password: "pw".into(),
        }
    }

    fn broadcasts(rx: &Receiver<AppEvent>) -> Vec<(String, Payload)> {
        let mut out = vec![];
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Broadcast { action, payload } = event {
                out.push((action, payload));
            }
        }
        out
    }

    fn login(session: &mut ChatSession, conn: &Connection, tx: &Sender<AppEvent>) {
        handle_command(session, conn, ServiceCommand::Login(credentials()), tx).unwrap();
    }

    fn loaded_dialogs(
        session: &mut ChatSession,
        conn: &Connection,
        tx: &Sender<AppEvent>,
        rx: &Receiver<AppEvent>,
    ) -> Vec<Dialog> {
        handle_command(session, conn, ServiceCommand::LoadDialogs, tx).unwrap();
        let (action, payload) = broadcasts(rx).pop().unwrap();
        assert_eq!(action, broadcast::LOAD_DIALOGS_SUCCESS_ACTION);
        match payload.get(broadcast::EXTRA_DIALOGS) {
            Some(PayloadValue::Dialogs(dialogs)) => dialogs.clone(),
            other => panic!("missing dialogs payload: {other:?}"),
        }
    }

    #[test]
    fn login_broadcasts_success_with_the_action_stamped() {
        let (mut session, conn, tx, rx) = setup(TTL);
        login(&mut session, &conn, &tx);

        let all = broadcasts(&rx);
        assert_eq!(all.len(), 1);
        let (action, payload) = &all[0];
        assert_eq!(action, broadcast::LOGIN_SUCCESS_ACTION);
        assert_eq!(
            payload.str_value(broadcast::EXTRA_ACTION),
            Some(broadcast::LOGIN_SUCCESS_ACTION)
        );
        assert_eq!(payload.str_value(broadcast::EXTRA_LOGIN), Some("alice"));
    }

    #[test]
    fn failed_login_broadcasts_the_error_object() {
        let (mut session, conn, tx, rx) = setup(TTL);
        handle_command(
            &mut session,
            &conn,
            ServiceCommand::Login(Credentials {
                login: "".into(),
                password: "".into(),
            }),
            &tx,
        )
        .unwrap();

        let (action, payload) = broadcasts(&rx).pop().unwrap();
        assert_eq!(action, broadcast::LOGIN_FAIL_ACTION);
        assert!(matches!(
            payload.error_value(broadcast::EXTRA_ERROR),
            Some(ServiceError::AuthFailed { .. })
        ));
    }

    #[test]
    fn expired_session_raises_refresh_instead_of_the_result() {
        let (mut session, conn, tx, rx) = setup(Duration::ZERO);
        login(&mut session, &conn, &tx);
        let _ = broadcasts(&rx);

        handle_command(&mut session, &conn, ServiceCommand::LoadDialogs, &tx).unwrap();

        let (action, _) = broadcasts(&rx).pop().unwrap();
        assert_eq!(action, broadcast::REFRESH_SESSION_ACTION);
    }

    #[test]
    fn refresh_succeeds_even_with_an_expired_token() {
        let (mut session, conn, tx, rx) = setup(Duration::ZERO);
        login(&mut session, &conn, &tx);
        handle_command(&mut session, &conn, ServiceCommand::RefreshSession, &tx).unwrap();

        let all = broadcasts(&rx);
        assert_eq!(all.last().unwrap().0, broadcast::REFRESH_SESSION_SUCCESS_ACTION);
    }

    #[test]
    fn send_message_persists_and_broadcasts() {
        let (mut session, conn, tx, rx) = setup(TTL);
        login(&mut session, &conn, &tx);
        let _ = broadcasts(&rx);
        let dialogs = loaded_dialogs(&mut session, &conn, &tx, &rx);
        let dialog_id = dialogs[0].id;

        handle_command(
            &mut session,
            &conn,
            ServiceCommand::SendMessage {
                dialog_id,
                body: "hello".into(),
            },
            &tx,
        )
        .unwrap();

        let (action, payload) = broadcasts(&rx).pop().unwrap();
        assert_eq!(action, broadcast::SEND_MESSAGE_SUCCESS_ACTION);
        assert!(matches!(
            payload.get(broadcast::EXTRA_MESSAGE),
            Some(PayloadValue::Message(m)) if m.body == "hello" && !m.incoming
        ));

        let history = db::fetch_history(&conn, dialog_id, 10).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn echoed_push_is_persisted_and_broadcast_as_a_chat_message() {
        let (mut session, conn, tx, rx) = setup(TTL);
        login(&mut session, &conn, &tx);
        let _ = broadcasts(&rx);
        let dialogs = loaded_dialogs(&mut session, &conn, &tx, &rx);
        let dialog_id = dialogs[0].id;

        handle_command(
            &mut session,
            &conn,
            ServiceCommand::SendMessage {
                dialog_id,
                body: "ping".into(),
            },
            &tx,
        )
        .unwrap();
        let _ = broadcasts(&rx);

        deliver_pushes(&mut session, &conn, &tx).unwrap();

        let (action, payload) = broadcasts(&rx).pop().unwrap();
        assert_eq!(action, broadcast::GOT_CHAT_MESSAGE_ACTION);
        assert!(matches!(
            payload.get(broadcast::EXTRA_MESSAGE),
            Some(PayloadValue::Message(m)) if m.incoming && m.body == "ping"
        ));

        let history = db::fetch_history(&conn, dialog_id, 10).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn friend_alert_push_is_broadcast_with_its_message() {
        let mut transport = LoopbackTransport::new();
        transport.push_friend_alert("carol accepted your request");
        let mut session = ChatSession::new(Box::new(transport), TTL);
        let conn = Connection::open_in_memory().unwrap();
        db::create_schema(&conn).unwrap();
        let (tx, rx) = mpsc::channel();

        deliver_pushes(&mut session, &conn, &tx).unwrap();

        let (action, payload) = broadcasts(&rx).pop().unwrap();
        assert_eq!(action, broadcast::FRIEND_ALERT_ACTION);
        assert_eq!(
            payload.str_value(broadcast::EXTRA_ALERT_MESSAGE),
            Some("carol accepted your request")
        );
    }

    #[test]
    fn revoked_auth_logs_out_and_forces_relogin() {
        let mut transport = LoopbackTransport::new();
        transport.revoke_auth();
        let mut session = ChatSession::new(Box::new(transport), TTL);
        let conn = Connection::open_in_memory().unwrap();
        db::create_schema(&conn).unwrap();
        let (tx, rx) = mpsc::channel();

        deliver_pushes(&mut session, &conn, &tx).unwrap();

        let (action, _) = broadcasts(&rx).pop().unwrap();
        assert_eq!(action, broadcast::FORCE_RELOGIN_ACTION);
        assert!(!session.logged_in());
    }
}
