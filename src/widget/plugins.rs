//! Plugin registry and dispatch
//!
//! Message plugins claim messages by predicate, input plugins claim an input
//! mode by exact name. Both registries are ordered lists where the first
//! claimant wins, and both end with a built-in fallback so dispatch always
//! finds a renderer.

use crossterm::event::KeyEvent;

use super::builtins::{RegularMessagePlugin, TextInputPlugin};
use super::context::{MessageView, RenderContext};
use super::errors::PluginError;
use super::input::InputState;
use super::message::Message;

/// Renders one kind of message
pub trait MessagePlugin {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Whether this plugin wants to render `message`
    fn matches(&self, message: &Message) -> bool;

    /// Render `message` into styled lines
    fn render(&self, message: &Message, ctx: &RenderContext<'_>)
        -> Result<MessageView, PluginError>;
}

/// Handles one input mode
pub trait InputPlugin {
    /// The input mode this plugin serves
    fn mode(&self) -> &str;

    /// Render the input area
    fn render(&self, input: &InputState, ctx: &RenderContext<'_>)
        -> Result<MessageView, PluginError>;

    /// React to a key press while this mode is active
    fn handle_key(
        &self,
        key: KeyEvent,
        input: &mut InputState,
        ctx: &RenderContext<'_>,
    ) -> Result<(), PluginError>;

    /// Rows the input area needs, borders excluded
    fn height(&self) -> u16 {
        1
    }
}

/// First candidate whose predicate accepts `subject`
pub fn resolve_plugin<'p, P, S, F>(candidates: &'p [P], subject: &S, matches: F) -> Option<&'p P>
where
    S: ?Sized,
    F: Fn(&P, &S) -> bool,
{
    candidates
        .iter()
        .find(|candidate| matches(candidate, subject))
}

/// Plugins supplied by the host, in priority order
#[derive(Default)]
pub struct HostPlugins {
    pub message_plugins: Vec<Box<dyn MessagePlugin>>,
    pub input_plugins: Vec<Box<dyn InputPlugin>>,
}

impl HostPlugins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a message plugin after those already added
    pub fn with_message_plugin(mut self, plugin: impl MessagePlugin + 'static) -> Self {
        self.message_plugins.push(Box::new(plugin));
        self
    }

    /// Register an input plugin after those already added
    pub fn with_input_plugin(mut self, plugin: impl InputPlugin + 'static) -> Self {
        self.input_plugins.push(Box::new(plugin));
        self
    }
}

/// Ordered message plugins ending in the regular message fallback
pub struct MessagePluginRegistry {
    plugins: Vec<Box<dyn MessagePlugin>>,
}

impl MessagePluginRegistry {
    /// Append the built-in fallback to the host's plugins
    pub fn with_fallback(host: Vec<Box<dyn MessagePlugin>>) -> Self {
        let mut plugins = host;
        plugins.push(Box::new(RegularMessagePlugin));
        Self { plugins }
    }

    /// The plugin that renders `message`
    pub fn resolve(&self, message: &Message) -> Option<&dyn MessagePlugin> {
        resolve_plugin(&self.plugins, message, |plugin, message| {
            plugin.matches(message)
        })
        .map(|plugin| plugin.as_ref())
    }

    /// Plugin names in dispatch order
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Ordered input plugins ending in the text input fallback
pub struct InputPluginRegistry {
    plugins: Vec<Box<dyn InputPlugin>>,
}

impl InputPluginRegistry {
    /// Append the built-in fallback to the host's plugins
    pub fn with_fallback(host: Vec<Box<dyn InputPlugin>>) -> Self {
        let mut plugins = host;
        plugins.push(Box::new(TextInputPlugin));
        Self { plugins }
    }

    /// The plugin serving `mode`, or the text input for unknown modes
    pub fn resolve(&self, mode: &str) -> Option<&dyn InputPlugin> {
        resolve_plugin(&self.plugins, mode, |plugin, mode| plugin.mode() == mode)
            .or_else(|| self.plugins.last())
            .map(|plugin| plugin.as_ref())
    }

    /// Modes in dispatch order
    pub fn modes(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.mode()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Both registries, merged once when the widget mounts
pub struct ResolvedPlugins {
    pub messages: MessagePluginRegistry,
    pub inputs: InputPluginRegistry,
}

impl ResolvedPlugins {
    pub fn merge(host: HostPlugins) -> Self {
        let resolved = Self {
            messages: MessagePluginRegistry::with_fallback(host.message_plugins),
            inputs: InputPluginRegistry::with_fallback(host.input_plugins),
        };
        tracing::debug!(
            message_plugins = ?resolved.messages.names(),
            input_modes = ?resolved.inputs.modes(),
            "Resolved widget plugins"
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::builtins::{REGULAR_MESSAGE_PLUGIN, TEXT_INPUT_MODE};
    use crate::widget::message::MessageSource;
    use proptest::prelude::*;
    use ratatui::text::Text;
    use serde_json::json;

    struct TypedPlugin(&'static str);

    impl MessagePlugin for TypedPlugin {
        fn name(&self) -> &str {
            self.0
        }

        fn matches(&self, message: &Message) -> bool {
            message.plugin_type() == Some(self.0)
        }

        fn render(
            &self,
            _message: &Message,
            _ctx: &RenderContext<'_>,
        ) -> Result<MessageView, PluginError> {
            Ok(Text::raw(self.0))
        }
    }

    struct ModePlugin(&'static str);

    impl InputPlugin for ModePlugin {
        fn mode(&self) -> &str {
            self.0
        }

        fn render(
            &self,
            _input: &InputState,
            _ctx: &RenderContext<'_>,
        ) -> Result<MessageView, PluginError> {
            Ok(Text::raw(self.0))
        }

        fn handle_key(
            &self,
            _key: KeyEvent,
            _input: &mut InputState,
            _ctx: &RenderContext<'_>,
        ) -> Result<(), PluginError> {
            Ok(())
        }

        fn height(&self) -> u16 {
            5
        }
    }

    fn typed(kind: &str) -> Message {
        Message::bot("x").with_data(json!({ "_plugin": { "type": kind } }))
    }

    #[test]
    fn test_resolve_plugin_first_match_wins() {
        let candidates = [1, 2, 3, 4];
        let found = resolve_plugin(&candidates, &2, |c, s| c % s == 0);
        assert_eq!(found, Some(&2));
        assert_eq!(resolve_plugin(&candidates, &5, |c, s| c == s), None);
    }

    #[test]
    fn test_fallback_is_appended_exactly_once() {
        let registry = MessagePluginRegistry::with_fallback(vec![
            Box::new(TypedPlugin("date-picker")),
            Box::new(TypedPlugin("gallery")),
        ]);
        assert_eq!(
            registry.names(),
            vec!["date-picker", "gallery", REGULAR_MESSAGE_PLUGIN]
        );

        let inputs = InputPluginRegistry::with_fallback(vec![Box::new(ModePlugin("menu"))]);
        assert_eq!(inputs.modes(), vec!["menu", TEXT_INPUT_MODE]);
    }

    #[test]
    fn test_host_plugin_intercepts_before_fallback() {
        let registry =
            MessagePluginRegistry::with_fallback(vec![Box::new(TypedPlugin("gallery"))]);
        let plugin = registry.resolve(&typed("gallery")).unwrap();
        assert_eq!(plugin.name(), "gallery");

        let plugin = registry.resolve(&Message::user("plain")).unwrap();
        assert_eq!(plugin.name(), REGULAR_MESSAGE_PLUGIN);
    }

    #[test]
    fn test_input_resolution_by_exact_mode() {
        let registry = InputPluginRegistry::with_fallback(vec![
            Box::new(ModePlugin("menu")),
            Box::new(ModePlugin("menu-extended")),
        ]);
        assert_eq!(registry.resolve("menu").unwrap().mode(), "menu");
        assert_eq!(
            registry.resolve("menu-extended").unwrap().mode(),
            "menu-extended"
        );
        assert_eq!(registry.resolve("text").unwrap().mode(), TEXT_INPUT_MODE);
        assert_eq!(registry.resolve("voice").unwrap().mode(), TEXT_INPUT_MODE);
    }

    #[test]
    fn test_host_text_mode_plugin_shadows_builtin() {
        let registry = InputPluginRegistry::with_fallback(vec![Box::new(ModePlugin("text"))]);
        assert_eq!(registry.len(), 2);
        // only the host stand-in asks for five rows
        assert_eq!(registry.resolve("text").unwrap().height(), 5);
    }

    fn arb_message() -> impl Strategy<Value = Message> {
        let source = prop_oneof![
            Just(MessageSource::User),
            Just(MessageSource::Bot),
            Just(MessageSource::Agent),
            Just(MessageSource::System),
        ];
        let kind = proptest::option::of(prop_oneof![
            Just("gallery".to_string()),
            Just("date-picker".to_string()),
            Just("video".to_string()),
            "[a-z]{1,8}",
        ]);
        (source, proptest::option::of(".{0,20}"), kind).prop_map(|(source, text, kind)| {
            let data = match kind {
                Some(kind) => json!({ "_plugin": { "type": kind } }),
                None => serde_json::Value::Null,
            };
            Message::new(source, text, data)
        })
    }

    proptest! {
        #[test]
        fn prop_every_message_resolves(messages in proptest::collection::vec(arb_message(), 0..32)) {
            let registry = MessagePluginRegistry::with_fallback(vec![
                Box::new(TypedPlugin("gallery")),
                Box::new(TypedPlugin("video")),
            ]);
            for message in &messages {
                prop_assert!(registry.resolve(message).is_some());
            }
        }

        #[test]
        fn prop_host_plugins_take_precedence(messages in proptest::collection::vec(arb_message(), 0..32)) {
            let registry = MessagePluginRegistry::with_fallback(vec![
                Box::new(TypedPlugin("gallery")),
                Box::new(TypedPlugin("date-picker")),
            ]);
            for message in &messages {
                let chosen = registry.resolve(message).unwrap().name().to_string();
                match message.plugin_type() {
                    Some(kind @ ("gallery" | "date-picker")) => prop_assert_eq!(chosen, kind),
                    _ => prop_assert_eq!(chosen, REGULAR_MESSAGE_PLUGIN),
                }
            }
        }
    }
}
