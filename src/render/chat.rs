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

//! Render the conversation surface.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{App, util::format::format_clock};

pub(super) fn draw_chat(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let view = &app.chat_view;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let lines: Vec<Line> = view
        .messages
        .iter()
        .map(|message| {
            let sender_fg = if message.incoming {
                theme.incoming_fg
            } else {
                theme.outgoing_fg
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", format_clock(message.sent_at)),
                    Style::default().fg(theme.timestamp_fg),
                ),
                Span::styled(
                    format!("{}: ", message.sender),
                    Style::default().fg(sender_fg),
                ),
                Span::raw(message.body.clone()),
            ])
        })
        .collect();

    // Keep the tail of the conversation in view.
    let visible = rows[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let history = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", view.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_colour)),
        )
        .scroll((scroll, 0));
    f.render_widget(history, rows[0]);

    let compose = Paragraph::new(view.compose.value()).block(
        Block::default()
            .title(" message ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent_colour)),
    );
    f.render_widget(compose, rows[1]);

    let cursor_x = rows[1].x + 1 + view.compose.cursor() as u16;
    let cursor_y = rows[1].y + 1;
    f.set_cursor_position((cursor_x, cursor_y));
}
