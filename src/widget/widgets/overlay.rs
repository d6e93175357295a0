//! Disconnect overlay
//!
//! Covers the open panel after a connection that had succeeded drops.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::widget::theme::Theme;

pub struct DisconnectOverlay<'a> {
    theme: &'a Theme,
    /// Reconnection gave up; only closing is left
    permanent: bool,
}

impl<'a> DisconnectOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            permanent: false,
        }
    }

    pub fn permanent(mut self, permanent: bool) -> Self {
        self.permanent = permanent;
        self
    }

    fn centered(area: Rect) -> Rect {
        let width = area.width.min(36);
        let height = area.height.min(5);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }
}

impl Widget for DisconnectOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = Self::centered(area);
        if area.height < 3 || area.width < 4 {
            return;
        }

        let (title, body) = if self.permanent {
            (" Connection lost ", "Press Esc to close")
        } else {
            (" Disconnected ", "Reconnecting…")
        };

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(self.theme.error))
            .title(Line::styled(
                title,
                Style::default()
                    .fg(self.theme.error)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(self.theme.bg_main));

        Paragraph::new(body)
            .style(Style::default().fg(self.theme.text_primary))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
