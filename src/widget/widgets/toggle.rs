//! Toggle button with the unseen badge

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::widget::theme::Theme;

/// Right-aligned open/close affordance
pub struct ToggleButton<'a> {
    theme: &'a Theme,
    open: bool,
    badge: Option<usize>,
}

impl<'a> ToggleButton<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            open: false,
            badge: None,
        }
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Unseen count to show; `None` or zero hides the badge
    pub fn badge(mut self, badge: Option<usize>) -> Self {
        self.badge = badge.filter(|count| *count > 0);
        self
    }
}

impl Widget for ToggleButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let label = if self.open { " Close chat " } else { " Open chat " };
        let mut spans = vec![Span::styled(
            label,
            Style::default()
                .fg(self.theme.accent_contrast)
                .bg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        )];

        if let Some(count) = self.badge {
            spans.push(Span::styled(
                format!(" {count} "),
                Style::default()
                    .fg(self.theme.text_primary)
                    .bg(self.theme.error)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans).right_aligned()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn row(button: ToggleButton<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(30, 1)).unwrap();
        terminal.draw(|f| f.render_widget(button, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        (0..30)
            .map(|x| buffer.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_badge_shows_count() {
        let theme = Theme::default();
        let content = row(ToggleButton::new(&theme).badge(Some(3)));
        assert!(content.contains("Open chat"));
        assert!(content.trim_end().ends_with('3'));
    }

    #[test]
    fn test_zero_badge_hidden() {
        let theme = Theme::default();
        let content = row(ToggleButton::new(&theme).open(true).badge(Some(0)));
        assert!(content.contains("Close chat"));
        assert!(!content.contains('0'));
    }
}
