//! Header Widget
//!
//! Title bar of the open panel: logo marker, title and, when the status
//! indicator is enabled, the connection state.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::config::WidgetSettings;
use crate::widget::theme::Theme;

/// Header widget showing the configured title
pub struct Header<'a> {
    settings: &'a WidgetSettings,
    theme: &'a Theme,
    connected: bool,
}

impl<'a> Header<'a> {
    pub fn new(settings: &'a WidgetSettings, theme: &'a Theme) -> Self {
        Self {
            settings,
            theme,
            connected: false,
        }
    }

    /// Set the connection state shown on the right
    pub fn connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let base = Style::default().bg(self.theme.bg_header);
        buf.set_style(area, base);

        let (title_area, status_area) = if self.settings.enable_connection_status_indicator {
            let [title, status] =
                Layout::horizontal([Constraint::Min(0), Constraint::Length(10)]).areas(area);
            (title, Some(status))
        } else {
            (area, None)
        };

        let mut spans = Vec::new();
        if self.settings.header_logo_url.is_some() {
            spans.push(Span::styled("▣ ", base.fg(self.theme.accent)));
        }
        spans.push(Span::styled(
            self.settings.header_title(),
            base.fg(self.theme.accent).add_modifier(Modifier::BOLD),
        ));
        Paragraph::new(Line::from(spans)).render(title_area, buf);

        if let Some(status_area) = status_area {
            let (dot, label, color) = if self.connected {
                ("●", "online", self.theme.bot_bubble)
            } else {
                ("○", "offline", self.theme.text_muted)
            };
            let status = Line::from(vec![
                Span::styled(dot, base.fg(color)),
                Span::styled(format!(" {label}"), base.fg(self.theme.text_muted)),
            ])
            .right_aligned();
            Paragraph::new(status).render(status_area, buf);
        }
    }
}
