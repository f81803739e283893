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

//! # Chat Client TUI.
//!
//! A terminal-based instant messaging client shell.
//!
//! This application coordinates a TUI frontend built with `ratatui` and a
//! background chat service.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, UI rendering and
//!   broadcast dispatch.
//! * The **Service Worker** owns the chat session and the message store,
//!   processing commands asynchronously and completing each one with a
//!   broadcast action.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state and its timers.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and the service worker is handled via `std::sync::mpsc`
//! channels; the worker is attached through a one-shot bind handshake and
//! released with an idempotent unbind when the event loop ends.

mod actions;
mod chrome;
mod commander;
mod components;
mod config;
mod db;
mod exit_guard;
mod model;
mod render;
mod service;
mod surface;
mod theme;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use crate::{
    actions::events::{AppEvent, process_events},
    chrome::Chrome,
    commander::Commander,
    components::{ChatView, DialogListView, LoginView},
    config::AppConfig,
    exit_guard::ExitGuard,
    model::Credentials,
    service::session::LoopbackTransport,
    surface::{GlobalActions, SurfaceHelper},
    theme::Theme,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Screen {
    Login,
    Dialogs,
    Chat,
}

/// Application state.
struct App {
    pub config: AppConfig,

    pub theme: Theme,
    pub screen_stack: Vec<Screen>,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub helper: SurfaceHelper,
    pub chrome: Chrome,
    pub exit_guard: ExitGuard,

    pub commander: Commander,

    pub login_view: LoginView,
    pub dialogs_view: DialogListView,
    pub chat_view: ChatView,

    pub last_credentials: Option<Credentials>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let login_view = LoginView::new(event_tx.clone(), &config.login);
        let exit_guard = ExitGuard::new(config.double_back_to_exit);

        Self {
            config,
            theme: Theme::default(),
            screen_stack: vec![Screen::Login],
            event_tx,
            event_rx,
            helper: SurfaceHelper::new(Box::new(GlobalActions)),
            chrome: Chrome::new(),
            exit_guard,
            commander: Commander::new(),
            login_view,
            dialogs_view: DialogListView::new(),
            chat_view: ChatView::new(),
            last_credentials: None,
        }
    }

    pub fn current_screen(&self) -> Screen {
        *self.screen_stack.last().unwrap_or(&Screen::Login)
    }
}

/// The entry point of the application.
///
/// Sets up the communication channels, initializes the application state,
/// manages the terminal lifecycle, and returns an error if any part of the
/// execution fails.
fn main() -> Result<()> {
    let config = config::load_config();

    let mut app = App::new(config);

    // Request the service binding; the handle arrives later as an event.
    service::bind(
        &app.config,
        Box::new(LoopbackTransport::new()),
        app.event_tx.clone(),
    );

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    util::term::set_terminal_bg(&Theme::to_hex(app.theme.background_colour));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background color.
/// It also ensures the cursor is made visible again.
///
/// This function is designed to be "best-effort" and does not return a result,
/// as it is typically called during cleanup or panic handling.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Starts the application's input threads and enters the main event loop.
///
/// This function spawns two long-running background threads:
/// * An input thread to poll for system keyboard events.
/// * A tick thread to trigger periodic UI refreshes and drive the chrome
///   and exit-guard timers.
///
/// The service worker itself is already binding by the time this runs; its
/// handle is delivered through the event channel. After spawning the
/// threads, control is handed to [`process_events`] to manage the UI and
/// state updates.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                tx_keys.send(AppEvent::Key(key)).ok();
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application
    // and the resolution of the UI-side timers.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            let _ = tx_tick.send(AppEvent::Tick);
            thread::sleep(Duration::from_millis(250));
        }
    });

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
