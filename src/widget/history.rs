//! History view
//!
//! Renders the transcript message by message through the plugin registry,
//! followed by a typing indicator row. A message whose plugin fails (or that
//! no plugin claims) is skipped; the rest of the transcript still renders.

use std::cell::Cell;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget},
};

use super::context::{MessageView, RenderContext};
use super::message::Message;
use super::plugins::MessagePluginRegistry;

/// Resolve the plugin for `message` and render it
///
/// Returns `None` on a dispatch miss or a plugin failure, after logging.
pub fn render_message(
    registry: &MessagePluginRegistry,
    message: &Message,
    ctx: &RenderContext<'_>,
) -> Option<MessageView> {
    let Some(plugin) = registry.resolve(message) else {
        tracing::warn!(message_id = %message.id, "No plugin matched message");
        return None;
    };

    match plugin.render(message, ctx) {
        Ok(view) => Some(view),
        Err(err) => {
            tracing::warn!(
                plugin = plugin.name(),
                message_id = %message.id,
                error = %err,
                "Message plugin failed to render"
            );
            None
        }
    }
}

/// Scroll position, counted in lines up from the bottom
///
/// Interior mutability lets the send interceptor reset it while the
/// controller is borrowed for rendering.
#[derive(Debug, Default)]
pub struct HistoryState {
    offset_from_bottom: Cell<usize>,
    /// Largest offset seen by the last render; `None` before the first one
    max_offset: Cell<Option<usize>>,
}

impl HistoryState {
    pub fn offset(&self) -> usize {
        self.offset_from_bottom.get()
    }

    pub fn scroll_up(&self, lines: usize) {
        let offset = self.offset_from_bottom.get().saturating_add(lines);
        let offset = match self.max_offset.get() {
            Some(max) => offset.min(max),
            None => offset,
        };
        self.offset_from_bottom.set(offset);
    }

    pub fn scroll_down(&self, lines: usize) {
        self.offset_from_bottom
            .set(self.offset_from_bottom.get().saturating_sub(lines));
    }

    pub fn scroll_to_bottom(&self) {
        self.offset_from_bottom.set(0);
    }
}

/// Transcript widget
pub struct HistoryView<'a> {
    messages: &'a [Message],
    registry: &'a MessagePluginRegistry,
    state: &'a HistoryState,
    ctx: RenderContext<'a>,
    typing: bool,
}

impl<'a> HistoryView<'a> {
    pub fn new(
        messages: &'a [Message],
        registry: &'a MessagePluginRegistry,
        state: &'a HistoryState,
        ctx: RenderContext<'a>,
    ) -> Self {
        Self {
            messages,
            registry,
            state,
            ctx,
            typing: false,
        }
    }

    /// Show the typing indicator row
    pub fn typing(mut self, typing: bool) -> Self {
        self.typing = typing;
        self
    }

    fn build_lines(&self, width: u16) -> Vec<Line<'static>> {
        let ctx = RenderContext {
            width,
            ..self.ctx
        };
        let mut lines = Vec::new();

        for message in self.messages {
            if let Some(view) = render_message(self.registry, message, &ctx) {
                lines.extend(view.lines);
                lines.push(Line::default());
            }
        }

        if self.typing {
            lines.push(Line::from(vec![
                Span::styled("● ● ●", Style::default().fg(ctx.theme.accent)),
                Span::styled(
                    "  typing",
                    Style::default()
                        .fg(ctx.theme.text_muted)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
        }

        lines
    }
}

impl Widget for HistoryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 2 {
            return;
        }

        // one column reserved for the scrollbar
        let text_width = area.width - 1;
        let lines = self.build_lines(text_width);
        let height = usize::from(area.height);

        let max_offset = lines.len().saturating_sub(height);
        let offset = self.state.offset().min(max_offset);
        self.state.max_offset.set(Some(max_offset));
        self.state.offset_from_bottom.set(offset);
        let start = max_offset - offset;
        let visible: Vec<Line> = lines.iter().skip(start).take(height).cloned().collect();

        Paragraph::new(visible).render(
            Rect {
                width: text_width,
                ..area
            },
            buf,
        );

        if lines.len() > height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(self.ctx.theme.border));
            let mut scrollbar_state = ScrollbarState::new(max_offset).position(start);
            scrollbar.render(area, buf, &mut scrollbar_state);
        }
    }
}
