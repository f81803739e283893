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

//! Render the shared chrome overlays.
//!
//! Drawn last so they sit on top of whatever surface is active: the
//! transient alert banner, the modal notice, and the modal progress
//! indicator.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{App, render::centered_rect};

pub(super) fn draw_overlays(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let chrome = &app.chrome;

    if let Some(alert) = chrome.alert() {
        let width = (alert.message.chars().count() as u16 + 2).min(area.width);
        let banner = Rect {
            x: area.x + area.width - width,
            y: area.y,
            width,
            height: 1,
        };
        f.render_widget(Clear, banner);
        f.render_widget(
            Paragraph::new(format!(" {} ", alert.message))
                .style(Style::default().fg(theme.banner_fg).bg(theme.banner_bg)),
            banner,
        );
    }

    if let Some(notice) = chrome.notice() {
        let container = centered_rect(area, 52, 5);
        f.render_widget(Clear, container);
        let block = Block::default()
            .title(" notice ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent_colour))
            .style(Style::default().bg(theme.background_colour));
        let inner = block.inner(container);
        f.render_widget(block, container);
        f.render_widget(
            Paragraph::new(notice).wrap(ratatui::widgets::Wrap { trim: true }),
            inner,
        );
    }

    if chrome.progress_visible() {
        let container = centered_rect(area, 28, 3);
        f.render_widget(Clear, container);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent_colour))
            .style(Style::default().bg(theme.background_colour));
        let inner = block.inner(container);
        f.render_widget(block, container);
        f.render_widget(
            Paragraph::new("Please wait…").alignment(Alignment::Center),
            inner,
        );
    }
}
