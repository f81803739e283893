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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every processed event. The active surface is drawn first, then the
//! status and commander lines, then the chrome overlays (alert banner,
//! modal notice, progress indicator) on top.

mod chat;
mod chrome;
mod commander;
mod dialogs;
mod login;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Paragraph},
};

use crate::{App, Screen};

/// Renders the user interface to the terminal frame.
///
/// This function calculates the layout constraints and populates the frame
/// with widgets based on the current state of the [`App`].
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_colour)),
        area,
    );

    // Outer layout: header, main, status, commander
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, outer[0], app);

    match app.current_screen() {
        Screen::Login => login::draw_login(f, outer[1], app),
        Screen::Dialogs => dialogs::draw_dialogs(f, outer[1], app),
        Screen::Chat => chat::draw_chat(f, outer[1], app),
    }

    draw_status(f, outer[2], app);

    commander::draw_commander(f, outer[3], app);

    chrome::draw_overlays(f, outer[1], app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    f.render_widget(
        Paragraph::new(" chooim").style(Style::default().fg(app.theme.accent_colour)),
        area,
    );

    let state = if app.chrome.busy() {
        "working… "
    } else if app.helper.bound() {
        "connected "
    } else {
        "connecting… "
    };
    f.render_widget(
        Paragraph::new(state)
            .alignment(Alignment::Right)
            .style(Style::default().fg(app.theme.status_fg)),
        area,
    );
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    if let Some(status) = app.chrome.status() {
        f.render_widget(
            Paragraph::new(format!(" {status}"))
                .style(Style::default().fg(app.theme.status_fg)),
            area,
        );
    }
}

/// A rectangle of the given size centered within `area`, clamped to fit.
pub(super) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
