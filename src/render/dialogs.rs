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

//! Render the dialog roster surface.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::App;

pub(super) fn draw_dialogs(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme;
    let view = &mut app.dialogs_view;

    let items: Vec<ListItem> = view
        .dialogs
        .iter()
        .map(|dialog| {
            let mut spans = vec![Span::raw(dialog.name.clone())];
            if dialog.unread_count > 0 {
                spans.push(Span::styled(
                    format!(" ({})", dialog.unread_count),
                    Style::default().fg(theme.unread_fg),
                ));
            }
            if let Some(last) = &dialog.last_message {
                spans.push(Span::styled(
                    format!("  {last}"),
                    Style::default().fg(theme.status_fg),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" conversations ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_colour)),
        )
        .highlight_style(
            Style::default()
                .fg(theme.accent_colour)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut view.list_state);
}
