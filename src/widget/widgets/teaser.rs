//! Teaser bubble previewing the latest unseen message

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols::border,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::widget::theme::Theme;
use crate::widget::utils::truncate;

const MAX_WIDTH: u16 = 40;

pub struct Teaser<'a> {
    text: &'a str,
    theme: &'a Theme,
}

impl<'a> Teaser<'a> {
    pub fn new(text: &'a str, theme: &'a Theme) -> Self {
        Self { text, theme }
    }

    /// Bottom-right corner of `area` the bubble occupies
    pub fn area(area: Rect) -> Rect {
        let width = area.width.min(MAX_WIDTH);
        let height = area.height.min(3);
        Rect {
            x: area.right() - width,
            y: area.bottom() - height,
            width,
            height,
        }
    }
}

impl Widget for Teaser<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = Self::area(area);
        if area.height < 3 || area.width < 4 {
            return;
        }

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(self.theme.accent));
        let inner = block.inner(area);
        block.render(area, buf);

        // only the first line of the message
        let first_line = self.text.lines().next().unwrap_or_default();
        Paragraph::new(truncate(first_line, usize::from(inner.width)))
            .style(Style::default().fg(self.theme.text_primary))
            .render(inner, buf);
    }
}
