//! Built-in fallback plugins
//!
//! [`RegularMessagePlugin`] claims every message and [`TextInputPlugin`]
//! serves the `text` input mode. Both are appended after host plugins.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use serde_json::Value;
use unicode_width::UnicodeWidthChar;

use super::context::{MessageView, RenderContext};
use super::errors::PluginError;
use super::input::InputState;
use super::message::{Message, MessageSource};
use super::plugins::{InputPlugin, MessagePlugin};
use super::theme::Theme;
use super::utils::{tail_to_width, wrap_text};

pub const REGULAR_MESSAGE_PLUGIN: &str = "regular-message";
pub const TEXT_INPUT_MODE: &str = "text";

const INDENT: &str = "  ";

/// Renders any message as a labelled block of wrapped text
#[derive(Debug, Default, Clone, Copy)]
pub struct RegularMessagePlugin;

impl RegularMessagePlugin {
    fn label(source: MessageSource) -> &'static str {
        match source {
            MessageSource::User => "You",
            MessageSource::Bot => "Bot",
            MessageSource::Agent => "Agent",
            MessageSource::System => "●",
        }
    }

    fn color(source: MessageSource, theme: &Theme) -> Color {
        match source {
            MessageSource::User => theme.user_bubble,
            MessageSource::Bot => theme.bot_bubble,
            MessageSource::Agent => theme.agent_bubble,
            MessageSource::System => theme.system_fg,
        }
    }

    /// Text to show for messages that only carry structured data
    fn body(message: &Message) -> String {
        match (&message.text, &message.data) {
            (Some(text), _) => text.clone(),
            (None, Value::Null) => String::new(),
            (None, _) => match message.plugin_type() {
                Some(kind) => format!("[{kind}]"),
                None => "[structured message]".to_string(),
            },
        }
    }
}

impl MessagePlugin for RegularMessagePlugin {
    fn name(&self) -> &str {
        REGULAR_MESSAGE_PLUGIN
    }

    fn matches(&self, _message: &Message) -> bool {
        true
    }

    fn render(
        &self,
        message: &Message,
        ctx: &RenderContext<'_>,
    ) -> Result<MessageView, PluginError> {
        let color = Self::color(message.source, ctx.theme);
        let text_style = if message.source == MessageSource::System {
            Style::default().fg(ctx.theme.text_muted)
        } else {
            Style::default().fg(ctx.theme.text_primary)
        };

        let mut lines = Vec::new();
        if !ctx.fullscreen {
            lines.push(Line::from(vec![
                Span::styled(
                    Self::label(message.source),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", message.timestamp.format("%H:%M")),
                    Style::default().fg(ctx.theme.text_muted),
                ),
            ]));
        }

        let body = Self::body(message);
        let wrap_width = usize::from(ctx.width).saturating_sub(INDENT.len());
        for row in wrap_text(&body, wrap_width) {
            lines.push(Line::from(vec![
                Span::raw(INDENT),
                Span::styled(row, text_style),
            ]));
        }

        Ok(Text::from(lines))
    }
}

/// Single-line free text input
#[derive(Debug, Default, Clone, Copy)]
pub struct TextInputPlugin;

impl TextInputPlugin {
    const PLACEHOLDER: &'static str = "Type a message...";
}

impl InputPlugin for TextInputPlugin {
    fn mode(&self) -> &str {
        TEXT_INPUT_MODE
    }

    fn render(
        &self,
        input: &InputState,
        ctx: &RenderContext<'_>,
    ) -> Result<MessageView, PluginError> {
        let theme = ctx.theme;

        if input.text().is_empty() {
            return Ok(Text::from(Line::from(vec![
                Span::styled(
                    " ",
                    Style::default().fg(theme.bg_main).bg(theme.text_primary),
                ),
                Span::styled(Self::PLACEHOLDER, Style::default().fg(theme.text_muted)),
            ])));
        }

        let (before, after) = input.text().split_at(input.cursor());
        let cursor_char = after.chars().next().unwrap_or(' ');
        let after_cursor = after.get(cursor_char.len_utf8()..).unwrap_or("");

        // keep the cursor on screen by scrolling the start of the draft away
        let before = match usize::from(ctx.width) {
            0 => before,
            width => {
                let cursor_width = cursor_char.width().unwrap_or(1).max(1);
                tail_to_width(before, width.saturating_sub(cursor_width))
            }
        };

        Ok(Text::from(Line::from(vec![
            Span::styled(before.to_string(), Style::default().fg(theme.text_primary)),
            Span::styled(
                cursor_char.to_string(),
                Style::default()
                    .fg(theme.bg_main)
                    .bg(theme.text_primary)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                after_cursor.to_string(),
                Style::default().fg(theme.text_primary),
            ),
        ])))
    }

    fn handle_key(
        &self,
        key: KeyEvent,
        input: &mut InputState,
        ctx: &RenderContext<'_>,
    ) -> Result<(), PluginError> {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::NONE) => {
                let text = input.take();
                if text.trim().is_empty() {
                    return Ok(());
                }
                ctx.actions.send_message(Some(text), Value::Null);
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => input.insert(c),
            (KeyCode::Backspace, _) => input.delete_before(),
            (KeyCode::Delete, _) => input.delete_after(),
            (KeyCode::Left, _) => input.move_left(),
            (KeyCode::Right, _) => input.move_right(),
            (KeyCode::Home, _) => input.move_home(),
            (KeyCode::End, _) => input.move_end(),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => input.clear(),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::widget::context::{NoopActions, WidgetActions};
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct SentLog(RefCell<Vec<String>>);

    impl WidgetActions for SentLog {
        fn send_message(&self, text: Option<String>, _data: Value) {
            self.0.borrow_mut().push(text.unwrap_or_default());
        }
        fn set_input_mode(&self, _mode: &str) {}
        fn set_fullscreen_message(&self, _message: &Message) {}
        fn dismiss_fullscreen_message(&self) {}
        fn close(&self) {}
        fn toggle(&self) {}
        fn emit_analytics(&self, _event: &str, _payload: Value) {}
    }

    fn plain(view: &MessageView) -> Vec<String> {
        view.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_regular_plugin_renders_label_and_wrapped_text() {
        let theme = Theme::default();
        let config = WidgetConfig::default();
        let ctx = RenderContext::new(&theme, &config, &NoopActions, 14);

        let view = RegularMessagePlugin
            .render(&Message::bot("hello there friend"), &ctx)
            .unwrap();
        let lines = plain(&view);
        assert!(lines[0].starts_with("Bot"));
        assert_eq!(&lines[1..], ["  hello there", "  friend"]);
    }

    #[test]
    fn test_regular_plugin_fullscreen_drops_header() {
        let theme = Theme::default();
        let config = WidgetConfig::default();
        let ctx = RenderContext::new(&theme, &config, &NoopActions, 40).fullscreen(true);

        let view = RegularMessagePlugin
            .render(&Message::bot("big view"), &ctx)
            .unwrap();
        assert_eq!(plain(&view), vec!["  big view"]);
    }

    #[test]
    fn test_regular_plugin_summarises_structured_content() {
        let theme = Theme::default();
        let config = WidgetConfig::default();
        let ctx = RenderContext::new(&theme, &config, &NoopActions, 40).fullscreen(true);
        let message = Message::new(
            MessageSource::Bot,
            None,
            json!({ "_plugin": { "type": "gallery" } }),
        );

        let view = RegularMessagePlugin.render(&message, &ctx).unwrap();
        assert_eq!(plain(&view), vec!["  [gallery]"]);
    }

    #[test]
    fn test_text_input_typing_and_send() {
        let theme = Theme::default();
        let config = WidgetConfig::default();
        let log = SentLog::default();
        let ctx = RenderContext::new(&theme, &config, &log, 40);
        let mut input = InputState::default();

        for c in "hi!".chars() {
            TextInputPlugin
                .handle_key(key(KeyCode::Char(c)), &mut input, &ctx)
                .unwrap();
        }
        TextInputPlugin
            .handle_key(key(KeyCode::Backspace), &mut input, &ctx)
            .unwrap();
        assert_eq!(input.text(), "hi");

        TextInputPlugin
            .handle_key(key(KeyCode::Enter), &mut input, &ctx)
            .unwrap();
        assert_eq!(*log.0.borrow(), vec!["hi".to_string()]);
        assert!(input.text().is_empty());
    }

    #[test]
    fn test_text_input_ignores_blank_send() {
        let theme = Theme::default();
        let config = WidgetConfig::default();
        let log = SentLog::default();
        let ctx = RenderContext::new(&theme, &config, &log, 40);
        let mut input = InputState::default();
        input.insert(' ');

        TextInputPlugin
            .handle_key(key(KeyCode::Enter), &mut input, &ctx)
            .unwrap();
        assert!(log.0.borrow().is_empty());
    }

    #[test]
    fn test_text_input_renders_placeholder() {
        let theme = Theme::default();
        let config = WidgetConfig::default();
        let ctx = RenderContext::new(&theme, &config, &NoopActions, 40);

        let view = TextInputPlugin
            .render(&InputState::default(), &ctx)
            .unwrap();
        assert!(plain(&view)[0].contains("Type a message"));
    }

    #[test]
    fn test_text_input_keeps_cursor_visible_in_long_draft() {
        let theme = Theme::default();
        let config = WidgetConfig::default();
        let ctx = RenderContext::new(&theme, &config, &NoopActions, 10);
        let mut input = InputState::default();
        for c in "abcdefghijklmnopqrstuvwxyz".chars() {
            input.insert(c);
        }

        let view = TextInputPlugin.render(&input, &ctx).unwrap();
        let line = &view.lines[0];
        assert_eq!(line.width(), 10);
        assert_eq!(line.spans[0].content, "rstuvwxyz");
        assert_eq!(line.spans[1].content, " ");

        input.move_home();
        let view = TextInputPlugin.render(&input, &ctx).unwrap();
        assert_eq!(view.lines[0].spans[0].content, "");
        assert_eq!(view.lines[0].spans[1].content, "a");
    }
}
