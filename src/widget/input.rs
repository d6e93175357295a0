//! Input area
//!
//! [`InputState`] is the draft the user is editing. [`InputView`] resolves
//! the input plugin for the active mode and draws whatever it renders.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::context::RenderContext;
use super::plugins::InputPluginRegistry;

/// Draft text with a byte cursor kept on a char boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    text: String,
    cursor: usize,
}

impl InputState {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in bytes
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_before(&mut self) {
        if let Some(prev) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.text.remove(self.cursor);
        }
    }

    pub fn delete_after(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.text[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Take the draft, leaving the input empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

/// Draws the input plugin serving the active mode
pub struct InputView<'a> {
    registry: &'a InputPluginRegistry,
    mode: &'a str,
    input: &'a InputState,
    ctx: RenderContext<'a>,
}

impl<'a> InputView<'a> {
    pub fn new(
        registry: &'a InputPluginRegistry,
        mode: &'a str,
        input: &'a InputState,
        ctx: RenderContext<'a>,
    ) -> Self {
        Self {
            registry,
            mode,
            input,
            ctx,
        }
    }

    /// Total rows this view wants, borders included
    pub fn height(registry: &InputPluginRegistry, mode: &str) -> u16 {
        registry
            .resolve(mode)
            .map(|plugin| plugin.height())
            .unwrap_or(1)
            .saturating_add(2)
    }
}

impl Widget for InputView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.ctx.theme.border_focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let Some(plugin) = self.registry.resolve(self.mode) else {
            tracing::warn!(mode = self.mode, "No input plugin for mode");
            return;
        };

        let ctx = RenderContext {
            width: inner.width,
            ..self.ctx
        };
        match plugin.render(self.input, &ctx) {
            Ok(view) => Paragraph::new(view).render(inner, buf),
            Err(err) => {
                tracing::warn!(mode = plugin.mode(), error = %err, "Input plugin failed to render");
                Paragraph::new(Line::styled(
                    "Input unavailable",
                    Style::default().fg(ctx.theme.error),
                ))
                .render(inner, buf);
            }
        }
    }
}
