//! Demo host state
//!
//! Plays the part of an embedding application: it owns the transcript, the
//! unseen list and the open/fullscreen flags, and hands the widget a fresh
//! [`WidgetProps`] snapshot after every change.

use std::sync::Arc;
use std::time::Duration;

use chatdock::widget::{Message, MessageSource, WidgetActions, WidgetProps, TEXT_INPUT_MODE};
use chatdock::WidgetConfig;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use super::bot;
use super::quick_replies::{self, QuickReplyOptions, QUICK_REPLIES};

const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Everything that can change the host's state
#[derive(Debug)]
pub enum HostEvent {
    Send { text: Option<String>, data: Value },
    SetInputMode(String),
    Fullscreen(Message),
    DismissFullscreen,
    Close,
    Toggle,
    Analytics { event: String, payload: Value },
    BotTyping(bool),
    BotReply(Message),
    Connected,
}

/// Widget callbacks forwarded into the host loop
pub struct ChannelActions {
    tx: UnboundedSender<HostEvent>,
}

impl ChannelActions {
    pub fn new(tx: UnboundedSender<HostEvent>) -> Self {
        Self { tx }
    }

    fn forward(&self, event: HostEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Host loop gone, dropping widget action");
        }
    }
}

impl WidgetActions for ChannelActions {
    fn send_message(&self, text: Option<String>, data: Value) {
        self.forward(HostEvent::Send { text, data });
    }

    fn set_input_mode(&self, mode: &str) {
        self.forward(HostEvent::SetInputMode(mode.to_string()));
    }

    fn set_fullscreen_message(&self, message: &Message) {
        self.forward(HostEvent::Fullscreen(message.clone()));
    }

    fn dismiss_fullscreen_message(&self) {
        self.forward(HostEvent::DismissFullscreen);
    }

    fn close(&self) {
        self.forward(HostEvent::Close);
    }

    fn toggle(&self) {
        self.forward(HostEvent::Toggle);
    }

    fn emit_analytics(&self, event: &str, payload: Value) {
        self.forward(HostEvent::Analytics {
            event: event.to_string(),
            payload,
        });
    }
}

pub struct DemoHost {
    config: WidgetConfig,
    messages: Arc<Vec<Message>>,
    unseen: Arc<Vec<Message>>,
    connected: bool,
    welcomed: bool,
    reconnection_limit: bool,
    open: bool,
    typing: bool,
    input_mode: String,
    fullscreen_message: Option<Message>,
    disconnects: u32,
    max_reconnects: u32,
    quick_replies: QuickReplyOptions,
    tx: UnboundedSender<HostEvent>,
    quit: bool,
}

impl DemoHost {
    pub fn new(
        config: WidgetConfig,
        max_reconnects: u32,
        quick_replies: QuickReplyOptions,
        tx: UnboundedSender<HostEvent>,
    ) -> Self {
        Self {
            config,
            messages: Arc::new(Vec::new()),
            unseen: Arc::new(Vec::new()),
            connected: false,
            welcomed: false,
            reconnection_limit: false,
            open: false,
            typing: false,
            input_mode: TEXT_INPUT_MODE.to_string(),
            fullscreen_message: None,
            disconnects: 0,
            max_reconnects,
            quick_replies,
            tx,
            quit: false,
        }
    }

    pub fn actions(&self) -> ChannelActions {
        ChannelActions::new(self.tx.clone())
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Snapshot handed to the widget
    pub fn props(&self) -> WidgetProps {
        WidgetProps {
            messages: Arc::clone(&self.messages),
            unseen_messages: Arc::clone(&self.unseen),
            config: self.config.clone(),
            connected: self.connected,
            reconnection_limit: self.reconnection_limit,
            open: self.open,
            typing: self.typing,
            input_mode: self.input_mode.clone(),
            fullscreen_message: self.fullscreen_message.clone(),
        }
    }

    /// Host-level shortcuts, checked before the widget sees the key
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers != KeyModifiers::CONTROL {
            return false;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => self.quit = true,
            KeyCode::Char('f') => {
                if self.open {
                    self.fullscreen_message = self.messages.last().cloned();
                }
            }
            KeyCode::Char('d') => self.disconnect(),
            _ => return false,
        }
        true
    }

    pub fn apply(&mut self, event: HostEvent) {
        tracing::debug!(?event, "Host event");
        match event {
            HostEvent::Send { text, data } => {
                let message = Message::new(MessageSource::User, text, data);
                bot::reply(&self.tx, message.text.as_deref());
                self.push(message);
            }
            HostEvent::SetInputMode(mode) => self.input_mode = mode,
            HostEvent::Fullscreen(message) => self.fullscreen_message = Some(message),
            HostEvent::DismissFullscreen => self.fullscreen_message = None,
            HostEvent::Close => self.set_open(false),
            HostEvent::Toggle => self.set_open(!self.open),
            HostEvent::Analytics { event, payload } => {
                tracing::info!(event = %event, payload = %payload, "Analytics event");
            }
            HostEvent::BotTyping(typing) => self.typing = typing,
            HostEvent::BotReply(message) => {
                self.typing = false;
                if message.plugin_type() == Some(QUICK_REPLIES) {
                    match quick_replies::options_of(&message) {
                        Ok(options) => {
                            self.quick_replies.replace(options);
                            self.input_mode = QUICK_REPLIES.to_string();
                        }
                        Err(err) => tracing::warn!(error = %err, "Ignoring quick replies"),
                    }
                }
                self.push(message);
            }
            HostEvent::Connected => {
                if self.reconnection_limit {
                    return;
                }
                self.connected = true;
                if !self.welcomed {
                    self.welcomed = true;
                    bot::deliver(&self.tx, bot::welcome(), bot::REPLY_DELAY);
                }
            }
        }
    }

    fn push(&mut self, message: Message) {
        let unseen = !self.open && message.source != MessageSource::User;

        let mut messages = Vec::clone(&self.messages);
        messages.push(message.clone());
        self.messages = Arc::new(messages);

        if unseen {
            let mut list = Vec::clone(&self.unseen);
            list.push(message);
            self.unseen = Arc::new(list);
        }
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
        if open && !self.unseen.is_empty() {
            self.unseen = Arc::new(Vec::new());
        }
        if !open {
            self.fullscreen_message = None;
        }
    }

    fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        self.disconnects += 1;

        if self.disconnects > self.max_reconnects {
            tracing::info!(disconnects = self.disconnects, "Reconnection limit reached");
            self.reconnection_limit = true;
        } else {
            tracing::info!(disconnects = self.disconnects, "Connection dropped, reconnecting");
            bot::connect(&self.tx, RECONNECT_DELAY);
        }
    }
}
