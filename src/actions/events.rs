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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the application,
//! bridging the gap between user input (keyboard), the background chat
//! service (broadcast actions, service handshake) and the UI rendering
//! pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through an
//!    asynchronous channel.
//! 2. **Process**: The [`process_events`] function updates the [`App`]
//!    state, routes broadcasts through the surface helper and issues
//!    commands to the background service.
//! 3. **Render**: After each event is processed, the UI is re-drawn.

use std::{io::Stdout, rc::Rc, sync::mpsc::Sender, time::Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App, Screen,
    actions::registry::{ActionContext, EventKey, Payload},
    components::{
        chat::{HistoryLoaded, MessageSent},
        dialogs::DialogsLoaded,
    },
    exit_guard::BackPress,
    model::{ChatMessage, Dialog},
    render::draw,
    service::{ServiceCommand, ServiceHandle, broadcast},
    surface::SurfaceHooks,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    ServiceConnected(ServiceHandle),
    Broadcast { action: EventKey, payload: Payload },

    SubmitLogin,
    LoginComplete,
    Logout,
    ForceRelogin,
    RefreshSession,

    SetDialogs(Vec<Dialog>),
    OpenDialog(i64),
    OpenDialogByName(String),
    SetHistory {
        dialog_id: i64,
        messages: Vec<ChatMessage>,
    },
    SendMessage(String),
    MessageSent(ChatMessage),
    MessageReceived(ChatMessage),
    FriendAlert(String),

    NavigateBack,
    Tick,

    ExitApplication,

    Error(String),
    FatalError(String),
}

pub(crate) trait AppEventProcessor {
    fn process_event(&mut self, event: Event, event_tx: &Sender<AppEvent>) -> Result<()>;
}

/// Runs the main application loop, handling events and rendering the UI in
/// the terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed, then releases the service binding.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    activate_surface(app);

    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,

            AppEvent::Tick => {
                let now = Instant::now();
                app.chrome.tick(now);
                app.exit_guard.tick(now);
            }

            AppEvent::ServiceConnected(handle) => {
                app.helper.attach_service(handle.clone());
                active_hooks(app).on_connected_to_service(&handle);
            }

            AppEvent::Broadcast { action, payload } => deliver_broadcast(app, &action, &payload),

            AppEvent::SubmitLogin => submit_login(app),

            AppEvent::LoginComplete => {
                app.screen_stack = vec![Screen::Dialogs];
                activate_surface(app);
                app.chrome.clear_status();
                app.chrome.show_progress();
                send_service(app, ServiceCommand::LoadDialogs);
            }

            AppEvent::Logout => {
                send_service(app, ServiceCommand::Logout);
                app.chat_view.close();
                app.screen_stack = vec![Screen::Login];
                activate_surface(app);
                app.chrome.hide_progress();
                app.chrome.set_status("Signed out");
            }

            AppEvent::ForceRelogin => force_relogin(app),

            AppEvent::RefreshSession => send_service(app, ServiceCommand::RefreshSession),

            AppEvent::SetDialogs(dialogs) => {
                app.chrome.set_busy(false);
                app.dialogs_view.set_dialogs(dialogs);
            }

            AppEvent::OpenDialog(dialog_id) => open_dialog(app, dialog_id),

            AppEvent::OpenDialogByName(name) => {
                let found = app
                    .dialogs_view
                    .dialogs
                    .iter()
                    .find(|d| d.name.eq_ignore_ascii_case(&name))
                    .map(|d| d.id);
                match found {
                    Some(id) => app.event_tx.send(AppEvent::OpenDialog(id))?,
                    None => app.chrome.set_status(format!("No dialog named '{name}'")),
                }
            }

            AppEvent::SetHistory {
                dialog_id,
                messages,
            } => app.chat_view.set_history(dialog_id, messages),

            AppEvent::SendMessage(body) => match app.chat_view.dialog_id {
                Some(dialog_id) => send_service(app, ServiceCommand::SendMessage { dialog_id, body }),
                None => app.chrome.set_status("No open conversation"),
            },

            AppEvent::MessageSent(message) => {
                app.chat_view.append(&message);
                app.dialogs_view.note_outgoing(&message);
            }

            AppEvent::MessageReceived(message) => {
                if app.current_screen() == Screen::Chat && app.chat_view.is_open(message.dialog_id)
                {
                    app.chat_view.append(&message);
                    app.dialogs_view.note_outgoing(&message);
                } else {
                    app.dialogs_view.note_incoming(&message);
                    app.chrome.show_alert(
                        format!("{}: {}", message.sender, message.body),
                        Instant::now(),
                    );
                }
            }

            AppEvent::FriendAlert(message) => app.chrome.show_alert(message, Instant::now()),

            AppEvent::NavigateBack => navigate_back(app),

            AppEvent::Error(message) => app.chrome.set_status(message),

            AppEvent::FatalError(message) => anyhow::bail!(message),

            AppEvent::ExitApplication => unreachable!("handled before dispatch"),
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    app.helper.unbind();

    Ok(())
}

/// Re-populates the action registry for the surface now on top.
///
/// The previous surface's registrations are drained first, so a broadcast
/// arriving late can never reach a handler that left the screen.
pub(crate) fn activate_surface(app: &mut App) {
    app.helper.on_pause();
    app.helper.on_resume();

    match app.current_screen() {
        Screen::Login => {
            app.helper
                .add_action(broadcast::LOGIN_FAIL_ACTION, app.helper.fail_action());
        }
        Screen::Dialogs => {
            app.helper
                .add_action(broadcast::LOAD_DIALOGS_SUCCESS_ACTION, Rc::new(DialogsLoaded));
            app.helper
                .add_action(broadcast::LOAD_DIALOGS_FAIL_ACTION, app.helper.fail_action());
            app.helper.add_action(
                broadcast::LOGOUT_SUCCESS_ACTION,
                app.helper.success_action(),
            );
            app.helper.add_action(
                broadcast::REFRESH_SESSION_SUCCESS_ACTION,
                app.helper.success_action(),
            );
            app.helper.add_action(
                broadcast::REFRESH_SESSION_FAIL_ACTION,
                app.helper.fail_action(),
            );
        }
        Screen::Chat => {
            app.helper
                .add_action(broadcast::LOAD_HISTORY_SUCCESS_ACTION, Rc::new(HistoryLoaded));
            app.helper
                .add_action(broadcast::LOAD_HISTORY_FAIL_ACTION, app.helper.fail_action());
            app.helper
                .add_action(broadcast::SEND_MESSAGE_SUCCESS_ACTION, Rc::new(MessageSent));
            app.helper
                .add_action(broadcast::SEND_MESSAGE_FAIL_ACTION, app.helper.fail_action());
            app.helper.add_action(
                broadcast::REFRESH_SESSION_SUCCESS_ACTION,
                app.helper.success_action(),
            );
            app.helper.add_action(
                broadcast::REFRESH_SESSION_FAIL_ACTION,
                app.helper.fail_action(),
            );
        }
    }
}

fn active_hooks(app: &mut App) -> &mut dyn SurfaceHooks {
    match app.current_screen() {
        Screen::Login => &mut app.login_view,
        Screen::Dialogs => &mut app.dialogs_view,
        Screen::Chat => &mut app.chat_view,
    }
}

/// Routes one broadcast through the surface helper with a dispatch context
/// built around the active surface.
fn deliver_broadcast(app: &mut App, action: &str, payload: &Payload) {
    let screen = app.current_screen();
    let hooks: &mut dyn SurfaceHooks = match screen {
        Screen::Login => &mut app.login_view,
        Screen::Dialogs => &mut app.dialogs_view,
        Screen::Chat => &mut app.chat_view,
    };
    let mut cx = ActionContext {
        chrome: &mut app.chrome,
        hooks,
        events: &app.event_tx,
    };
    app.helper
        .route(action, &mut cx, payload, screen == Screen::Login);
}

/// Queues a command for the background service, surfacing the unbound case
/// on the status line rather than failing.
fn send_service(app: &mut App, command: ServiceCommand) {
    match app.helper.service() {
        Some(service) => {
            if let Err(e) = service.send(command) {
                app.chrome.hide_progress();
                app.chrome.set_status(e.to_string());
            }
        }
        None => {
            app.chrome.hide_progress();
            app.chrome.set_status("Chat service is not connected yet");
        }
    }
}

fn submit_login(app: &mut App) {
    let credentials = app.login_view.credentials();
    if credentials.login.is_empty() {
        app.login_view.error = Some("Enter an account name".to_string());
        return;
    }
    app.last_credentials = Some(credentials.clone());
    app.chrome.show_progress();
    send_service(app, ServiceCommand::Login(credentials));
}

/// The service revoked the session: drop to the login surface and, when the
/// last credentials are still known, sign straight back in.
fn force_relogin(app: &mut App) {
    app.chrome.hide_progress();
    app.chat_view.close();
    app.screen_stack = vec![Screen::Login];
    activate_surface(app);
    app.chrome.set_status("Session ended, signing in again");

    if let Some(credentials) = app.last_credentials.clone() {
        app.chrome.show_progress();
        send_service(app, ServiceCommand::Login(credentials));
    }
}

fn open_dialog(app: &mut App, dialog_id: i64) {
    let dialog = app
        .dialogs_view
        .dialogs
        .iter()
        .find(|d| d.id == dialog_id)
        .cloned();
    let Some(dialog) = dialog else {
        return;
    };

    app.chat_view.open(&dialog);
    app.dialogs_view.mark_read(dialog_id);
    app.screen_stack.push(Screen::Chat);
    activate_surface(app);
    app.chrome.show_progress();
    send_service(app, ServiceCommand::LoadHistory { dialog_id });
}

/// Pops to the parent surface; the root is guarded by the exit gesture and
/// never popped here.
fn navigate_back(app: &mut App) {
    if app.screen_stack.len() > 1 {
        if app.screen_stack.pop() == Some(Screen::Chat) {
            app.chat_view.close();
        }
        activate_surface(app);
    }
}

/// Maps keyboard input to surface updates and service commands.
///
/// The commander takes priority when it is active (or may activate);
/// a modal notice swallows the next key; everything else goes to the
/// active surface.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let event = Event::Key(key);

    // Free-text surfaces own ':'; the commander only activates from the
    // roster, but keeps every key while it is open.
    let commander_may_grab = app.commander.active() || app.current_screen() == Screen::Dialogs;
    if commander_may_grab && app.commander.handle_event(event.clone(), &app.event_tx) {
        return Ok(());
    }

    if app.chrome.dismiss_notice() {
        return Ok(());
    }

    match app.current_screen() {
        Screen::Login => process_login_keys(app, key),
        Screen::Dialogs => process_dialogs_keys(app, key),
        Screen::Chat => process_chat_keys(app, key),
    }
}

fn process_login_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => back_press(app),
        _ => app
            .login_view
            .process_event(Event::Key(key), &app.event_tx)?,
    }
    Ok(())
}

fn process_dialogs_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => back_press(app),

        KeyCode::Char('j') | KeyCode::Down => app.dialogs_view.goto_next(),
        KeyCode::Char('k') | KeyCode::Up => app.dialogs_view.goto_previous(),

        KeyCode::Enter => {
            let selected = app.dialogs_view.selected().map(|d| d.id);
            if let Some(dialog_id) = selected {
                app.event_tx.send(AppEvent::OpenDialog(dialog_id))?;
            }
        }

        // Background refresh, header spinner only.
        KeyCode::Char('r') => {
            app.chrome.set_busy(true);
            send_service(app, ServiceCommand::LoadDialogs);
        }

        _ => {}
    }
    Ok(())
}

fn process_chat_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.event_tx.send(AppEvent::NavigateBack)?,
        _ => app.chat_view.process_event(Event::Key(key), &app.event_tx)?,
    }
    Ok(())
}

/// Applies the double-press exit gesture at a root surface.
fn back_press(app: &mut App) {
    let now = Instant::now();
    match app.exit_guard.press(now) {
        BackPress::Prompt => app.chrome.show_alert("Press Esc again to exit", now),
        BackPress::Exit => {
            let _ = app.event_tx.send(AppEvent::ExitApplication);
        }
    }
}
