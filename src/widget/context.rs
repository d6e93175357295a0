//! Render context and outbound callbacks
//!
//! Plugins never reach into the controller. Everything they may read or
//! call is handed to them in a [`RenderContext`].

use ratatui::text::Text;
use serde_json::Value;

use crate::config::WidgetConfig;

use super::message::Message;
use super::theme::Theme;

/// What a plugin renders to
pub type MessageView = Text<'static>;

/// Callbacks the widget invokes on its host
///
/// Methods take `&self`; hosts that need to mutate keep their own interior
/// mutability or forward into a channel.
pub trait WidgetActions {
    /// Send a message with optional text and structured data
    fn send_message(&self, text: Option<String>, data: Value);

    /// Switch the active input mode
    fn set_input_mode(&self, mode: &str);

    /// Show one message full-bleed
    fn set_fullscreen_message(&self, message: &Message);

    /// Leave the fullscreen view
    fn dismiss_fullscreen_message(&self);

    /// Close the widget panel
    fn close(&self);

    /// Open or close the widget panel
    fn toggle(&self);

    /// Report an analytics event
    fn emit_analytics(&self, event: &str, payload: Value);
}

/// Everything a plugin may use while rendering or handling input
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub config: &'a WidgetConfig,
    pub actions: &'a dyn WidgetActions,
    /// Columns available to the plugin
    pub width: u16,
    /// Whether the plugin is drawing the fullscreen view
    pub fullscreen: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        theme: &'a Theme,
        config: &'a WidgetConfig,
        actions: &'a dyn WidgetActions,
        width: u16,
    ) -> Self {
        Self {
            theme,
            config,
            actions,
            width,
            fullscreen: false,
        }
    }

    /// Same context, flagged for the fullscreen view
    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }
}

/// Actions that do nothing, for previews and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopActions;

impl WidgetActions for NoopActions {
    fn send_message(&self, _text: Option<String>, _data: Value) {}
    fn set_input_mode(&self, _mode: &str) {}
    fn set_fullscreen_message(&self, _message: &Message) {}
    fn dismiss_fullscreen_message(&self) {}
    fn close(&self) {}
    fn toggle(&self) {}
    fn emit_analytics(&self, _event: &str, _payload: Value) {}
}
