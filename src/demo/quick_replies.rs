//! Quick replies plugin pair
//!
//! Bots attach `{"_plugin": {"type": "quick-replies", "options": [...]}}` to
//! a message. The message plugin lists the options; while the host has the
//! `quick-replies` input mode active, digit keys pick one.

use std::sync::{Arc, Mutex};

use chatdock::widget::{
    InputPlugin, InputState, Message, MessagePlugin, MessageView, PluginError, RenderContext,
    TEXT_INPUT_MODE,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};
use serde_json::{json, Value};

pub const QUICK_REPLIES: &str = "quick-replies";

/// Options offered by the most recent quick-replies message
#[derive(Debug, Clone, Default)]
pub struct QuickReplyOptions(Arc<Mutex<Vec<String>>>);

impl QuickReplyOptions {
    pub fn replace(&self, options: Vec<String>) {
        if let Ok(mut current) = self.0.lock() {
            *current = options;
        }
    }

    pub fn get(&self) -> Vec<String> {
        self.0.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

/// Build a bot message carrying quick reply options
pub fn message(text: &str, options: &[&str]) -> Message {
    Message::bot(text).with_data(json!({
        "_plugin": { "type": QUICK_REPLIES, "options": options }
    }))
}

/// Read the option labels out of a quick-replies payload
pub fn options_of(message: &Message) -> Result<Vec<String>, PluginError> {
    let options = message
        .data
        .pointer("/_plugin/options")
        .and_then(Value::as_array)
        .ok_or_else(|| PluginError::MalformedPayload("quick replies need an options list".into()))?;

    options
        .iter()
        .map(|option| {
            option.as_str().map(str::to_string).ok_or_else(|| {
                PluginError::MalformedPayload(format!("quick reply option {option} is not text"))
            })
        })
        .collect()
}

pub struct QuickRepliesMessage;

impl MessagePlugin for QuickRepliesMessage {
    fn name(&self) -> &str {
        QUICK_REPLIES
    }

    fn matches(&self, message: &Message) -> bool {
        message.plugin_type() == Some(QUICK_REPLIES)
    }

    fn render(
        &self,
        message: &Message,
        ctx: &RenderContext<'_>,
    ) -> Result<MessageView, PluginError> {
        let options = options_of(message)?;
        let theme = ctx.theme;

        let mut lines = Vec::new();
        if !ctx.fullscreen {
            lines.push(Line::styled(
                "Bot",
                Style::default()
                    .fg(theme.bot_bubble)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::styled(
            format!("  {}", message.text()),
            Style::default().fg(theme.text_primary),
        ));

        let mut chips = vec![Span::raw("  ")];
        for (i, option) in options.iter().enumerate() {
            chips.push(Span::styled(
                format!(" {} {} ", i + 1, option),
                Style::default().fg(theme.accent_contrast).bg(theme.accent),
            ));
            chips.push(Span::raw(" "));
        }
        lines.push(Line::from(chips));

        Ok(Text::from(lines))
    }
}

/// Input mode that answers the pending quick replies with a digit
pub struct QuickRepliesInput {
    options: QuickReplyOptions,
}

impl QuickRepliesInput {
    pub fn new(options: QuickReplyOptions) -> Self {
        Self { options }
    }
}

impl InputPlugin for QuickRepliesInput {
    fn mode(&self) -> &str {
        QUICK_REPLIES
    }

    fn render(&self, _input: &InputState, ctx: &RenderContext<'_>) -> Result<MessageView, PluginError> {
        let count = self.options.get().len();
        if count == 0 {
            return Err(PluginError::Unsupported {
                plugin: QUICK_REPLIES.to_string(),
                what: "an empty option list".to_string(),
            });
        }
        Ok(Text::from(Line::styled(
            format!("Press 1-{count} to reply, Esc to type"),
            Style::default().fg(ctx.theme.text_muted),
        )))
    }

    fn handle_key(
        &self,
        key: KeyEvent,
        _input: &mut InputState,
        ctx: &RenderContext<'_>,
    ) -> Result<(), PluginError> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => ctx.actions.set_input_mode(TEXT_INPUT_MODE),
            (KeyCode::Char(c), KeyModifiers::NONE) => {
                let Some(index) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) else {
                    return Ok(());
                };
                let options = self.options.get();
                let Some(choice) = options.get(index) else {
                    return Ok(());
                };
                ctx.actions
                    .emit_analytics("quick_reply_selected", json!({ "index": index }));
                ctx.actions
                    .send_message(Some(choice.clone()), json!({ "quickReply": index }));
                ctx.actions.set_input_mode(TEXT_INPUT_MODE);
            }
            _ => {}
        }
        Ok(())
    }
}
