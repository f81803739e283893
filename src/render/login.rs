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

//! Render the sign-in surface.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
};

use crate::{App, components::login::LoginField, render::centered_rect};

const ACCOUNT_LABEL: &str = "account  ";
const PASSWORD_LABEL: &str = "password ";

pub(super) fn draw_login(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.login_view;
    let theme = &app.theme;

    let container = centered_rect(area, 46, 8);

    let block = Block::default()
        .title(" sign in ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour));
    let inner = block.inner(container);
    f.render_widget(block, container);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(format!("{}{}", ACCOUNT_LABEL, view.login.value())),
        rows[0],
    );

    let masked = "*".repeat(view.password.value().chars().count());
    f.render_widget(
        Paragraph::new(format!("{}{}", PASSWORD_LABEL, masked)),
        rows[1],
    );

    if let Some(error) = &view.error {
        f.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(theme.unread_fg)),
            rows[3],
        );
    }

    let hint = if view.connected {
        "enter: sign in   tab: switch field"
    } else {
        "connecting to service…"
    };
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(theme.status_fg)),
        rows[4],
    );

    // Place the cursor in the focused field.
    let (row, label, input) = match view.focus {
        LoginField::Login => (rows[0], ACCOUNT_LABEL, &view.login),
        LoginField::Password => (rows[1], PASSWORD_LABEL, &view.password),
    };
    let cursor_x = row.x + label.len() as u16 + input.cursor() as u16;
    f.set_cursor_position((cursor_x, row.y));
}
