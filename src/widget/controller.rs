//! Widget controller
//!
//! Owns the widget's derived state and its side effects. The host hands in
//! a fresh [`WidgetProps`] snapshot whenever anything changes; the
//! controller diffs it against the previous snapshot, folds the resulting
//! [`WidgetEvent`]s through [`WidgetState::reduce`] and runs the returned
//! [`Effect`]s.
//!
//! Lifecycle: [`WidgetController::mount`] → [`WidgetController::update`]* →
//! [`WidgetController::unmount`] (or drop).

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::Value;

use crate::config::{WidgetConfig, WidgetSettings};

use super::context::{RenderContext, WidgetActions};
use super::history::HistoryState;
use super::input::InputState;
use super::layout::{show_disconnect_overlay, WidgetView};
use super::message::Message;
use super::plugins::{HostPlugins, ResolvedPlugins};
use super::sound::NotificationSound;
use super::theme::Theme;
use super::title::{IndicatorFeed, IndicatorTimer, TitleIndicator, TitleSink, TITLE_BLINK_PERIOD};

/// Lines moved per PageUp/PageDown
const SCROLL_STEP: usize = 5;

/// Everything the host supplies, as one snapshot
#[derive(Debug, Clone)]
pub struct WidgetProps {
    pub messages: Arc<Vec<Message>>,
    /// Compared by identity: a new `Arc` means the list changed
    pub unseen_messages: Arc<Vec<Message>>,
    pub config: WidgetConfig,
    pub connected: bool,
    /// Reconnection attempts are exhausted
    pub reconnection_limit: bool,
    pub open: bool,
    pub typing: bool,
    pub input_mode: String,
    pub fullscreen_message: Option<Message>,
}

impl Default for WidgetProps {
    fn default() -> Self {
        Self {
            messages: Arc::new(Vec::new()),
            unseen_messages: Arc::new(Vec::new()),
            config: WidgetConfig::default(),
            connected: false,
            reconnection_limit: false,
            open: false,
            typing: false,
            input_mode: super::builtins::TEXT_INPUT_MODE.to_string(),
            fullscreen_message: None,
        }
    }
}

impl WidgetProps {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn settings(&self) -> &WidgetSettings {
        &self.config.settings
    }

    fn last_unseen_text(&self) -> String {
        self.unseen_messages
            .last()
            .map(|message| message.text().to_string())
            .unwrap_or_default()
    }
}

/// Host collaborators the controller calls into
pub struct WidgetEnv {
    pub actions: Box<dyn WidgetActions>,
    pub title_sink: Arc<dyn TitleSink>,
    pub sound: Box<dyn NotificationSound>,
}

/// Derived state owned by the controller
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    pub theme: Theme,
    /// One-way latch: set on the first successful connection
    pub had_connection: bool,
    /// Text of the last unseen message; empty when disabled or none
    pub last_unseen_message_preview_text: String,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            had_connection: false,
            last_unseen_message_preview_text: String::new(),
        }
    }
}

/// A change between two props snapshots
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    ColorSchemeChanged(Option<String>),
    ConnectionChanged(bool),
    UnseenMessagesChanged { last_text: String, count: usize },
    PreviewToggled { enabled: bool, last_text: String },
    TitleIndicatorToggled(bool),
}

/// Side effect requested by the reducer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    PlayNotificationSound,
    StartTitleIndicator,
    StopTitleIndicator,
}

impl WidgetState {
    /// State for a freshly mounted widget
    pub fn initial(props: &WidgetProps) -> Self {
        let preview = if props.settings().enable_unread_message_preview {
            props.last_unseen_text()
        } else {
            String::new()
        };

        Self {
            theme: Theme::from_color_scheme(props.settings().color_scheme.as_deref()),
            had_connection: props.connected,
            last_unseen_message_preview_text: preview,
        }
    }

    /// Apply one event under the new settings
    pub fn reduce(mut self, event: &WidgetEvent, settings: &WidgetSettings) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();

        match event {
            WidgetEvent::ColorSchemeChanged(scheme) => {
                self.theme = Theme::from_color_scheme(scheme.as_deref());
            }
            WidgetEvent::ConnectionChanged(connected) => {
                if *connected && !self.had_connection {
                    self.had_connection = true;
                }
            }
            WidgetEvent::UnseenMessagesChanged { last_text, count } => {
                if settings.enable_unread_message_preview {
                    self.last_unseen_message_preview_text = last_text.clone();
                }
                if settings.enable_unread_message_sound && *count > 0 {
                    effects.push(Effect::PlayNotificationSound);
                }
            }
            WidgetEvent::PreviewToggled { enabled, last_text } => {
                self.last_unseen_message_preview_text = if *enabled {
                    last_text.clone()
                } else {
                    String::new()
                };
            }
            WidgetEvent::TitleIndicatorToggled(enabled) => {
                effects.push(if *enabled {
                    Effect::StartTitleIndicator
                } else {
                    Effect::StopTitleIndicator
                });
            }
        }

        (self, effects)
    }
}

/// Events describing what changed from `prev` to `next`
pub fn diff_props(prev: &WidgetProps, next: &WidgetProps) -> Vec<WidgetEvent> {
    let (before, after) = (prev.settings(), next.settings());
    let mut events = Vec::new();

    if before.color_scheme != after.color_scheme {
        events.push(WidgetEvent::ColorSchemeChanged(after.color_scheme.clone()));
    }

    if prev.connected != next.connected {
        events.push(WidgetEvent::ConnectionChanged(next.connected));
    }

    if before.enable_unread_message_preview != after.enable_unread_message_preview {
        events.push(WidgetEvent::PreviewToggled {
            enabled: after.enable_unread_message_preview,
            last_text: next.last_unseen_text(),
        });
    }

    if !Arc::ptr_eq(&prev.unseen_messages, &next.unseen_messages) {
        events.push(WidgetEvent::UnseenMessagesChanged {
            last_text: next.last_unseen_text(),
            count: next.unseen_messages.len(),
        });
    }

    if before.enable_unread_message_title_indicator != after.enable_unread_message_title_indicator
    {
        events.push(WidgetEvent::TitleIndicatorToggled(
            after.enable_unread_message_title_indicator,
        ));
    }

    events
}

/// Host actions with send intercepted to pin the history to the bottom
pub(crate) struct ScrollOnSend<'a> {
    host: &'a dyn WidgetActions,
    history: &'a HistoryState,
}

impl<'a> ScrollOnSend<'a> {
    pub(crate) fn new(host: &'a dyn WidgetActions, history: &'a HistoryState) -> Self {
        Self { host, history }
    }
}

impl WidgetActions for ScrollOnSend<'_> {
    fn send_message(&self, text: Option<String>, data: Value) {
        self.history.scroll_to_bottom();
        self.host.send_message(text, data);
    }

    fn set_input_mode(&self, mode: &str) {
        self.host.set_input_mode(mode);
    }

    fn set_fullscreen_message(&self, message: &Message) {
        self.host.set_fullscreen_message(message);
    }

    fn dismiss_fullscreen_message(&self) {
        self.host.dismiss_fullscreen_message();
    }

    fn close(&self) {
        self.host.close();
    }

    fn toggle(&self) {
        self.host.toggle();
    }

    fn emit_analytics(&self, event: &str, payload: Value) {
        self.host.emit_analytics(event, payload);
    }
}

/// The orchestrating widget component
pub struct WidgetController {
    props: WidgetProps,
    state: WidgetState,
    plugins: ResolvedPlugins,
    env: WidgetEnv,
    history: HistoryState,
    input: InputState,
    feed: Arc<IndicatorFeed>,
    original_title: String,
    indicator: Option<IndicatorTimer>,
}

impl WidgetController {
    /// Mount the widget: merge plugins once, derive state, start the title
    /// indicator if enabled
    pub fn mount(props: WidgetProps, plugins: HostPlugins, env: WidgetEnv) -> Self {
        let original_title = env.title_sink.get();
        let feed = Arc::new(IndicatorFeed::new(
            props.unseen_messages.len(),
            props.settings().unread_title_text(),
        ));

        let mut controller = Self {
            state: WidgetState::initial(&props),
            plugins: ResolvedPlugins::merge(plugins),
            env,
            history: HistoryState::default(),
            input: InputState::default(),
            feed,
            original_title,
            indicator: None,
            props,
        };

        tracing::debug!(
            open = controller.props.open,
            connected = controller.props.connected,
            "Widget mounted"
        );

        if controller.props.settings().enable_unread_message_title_indicator {
            controller.apply(Effect::StartTitleIndicator);
        }

        controller
    }

    /// Take a new props snapshot from the host
    pub fn update(&mut self, next: WidgetProps) {
        let events = diff_props(&self.props, &next);

        self.feed.set_unseen(next.unseen_messages.len());
        self.feed.set_label(next.settings().unread_title_text());

        let mut state = std::mem::take(&mut self.state);
        let mut effects = Vec::new();
        for event in &events {
            tracing::debug!(?event, "Widget state event");
            let (reduced, requested) = state.reduce(event, next.settings());
            state = reduced;
            effects.extend(requested);
        }

        self.state = state;
        self.props = next;

        for effect in effects {
            self.apply(effect);
        }
    }

    /// Tear the widget down, stopping the title indicator
    pub fn unmount(self) {
        tracing::debug!("Widget unmounting");
    }

    fn apply(&mut self, effect: Effect) {
        tracing::debug!(?effect, "Applying widget effect");
        match effect {
            Effect::PlayNotificationSound => {
                if let Err(err) = self.env.sound.play() {
                    tracing::warn!(error = %err, "Notification sound failed");
                }
            }
            Effect::StartTitleIndicator => {
                if self.indicator.is_some() {
                    return;
                }
                let indicator = TitleIndicator::new(
                    Arc::clone(&self.env.title_sink),
                    Arc::clone(&self.feed),
                    self.original_title.clone(),
                );
                self.indicator = IndicatorTimer::start(indicator, TITLE_BLINK_PERIOD);
            }
            Effect::StopTitleIndicator => {
                if let Some(timer) = self.indicator.take() {
                    timer.stop();
                }
            }
        }
    }

    pub fn props(&self) -> &WidgetProps {
        &self.props
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn plugins(&self) -> &ResolvedPlugins {
        &self.plugins
    }

    pub fn history(&self) -> &HistoryState {
        &self.history
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Title captured when the widget mounted
    pub fn original_title(&self) -> &str {
        &self.original_title
    }

    pub fn title_indicator_running(&self) -> bool {
        self.indicator.is_some()
    }

    /// Route a key press; returns whether the widget consumed it
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press || !self.props.config.active {
            return false;
        }

        let actions = ScrollOnSend::new(self.env.actions.as_ref(), &self.history);

        if key.code == KeyCode::Char('o') && key.modifiers == KeyModifiers::CONTROL {
            actions.toggle();
            return true;
        }

        if !self.props.open {
            return false;
        }

        if show_disconnect_overlay(&self.props, &self.state) {
            if key.code == KeyCode::Esc && self.props.reconnection_limit {
                actions.close();
            }
            return true;
        }

        if self.props.fullscreen_message.is_some() {
            if key.code == KeyCode::Esc {
                actions.dismiss_fullscreen_message();
            }
            return true;
        }

        match key.code {
            KeyCode::PageUp => {
                self.history.scroll_up(SCROLL_STEP);
                return true;
            }
            KeyCode::PageDown => {
                self.history.scroll_down(SCROLL_STEP);
                return true;
            }
            _ => {}
        }

        let Some(plugin) = self.plugins.inputs.resolve(&self.props.input_mode) else {
            tracing::warn!(mode = %self.props.input_mode, "No input plugin for mode");
            return false;
        };

        // key handling happens outside a render pass, so there is no width
        let ctx = RenderContext::new(&self.state.theme, &self.props.config, &actions, 0);
        if let Err(err) = plugin.handle_key(key, &mut self.input, &ctx) {
            tracing::warn!(mode = plugin.mode(), error = %err, "Input plugin failed to handle key");
        }
        true
    }

    /// The widget's render tree for this frame
    pub fn view(&self) -> WidgetView<'_> {
        WidgetView::new(
            &self.props,
            &self.state,
            &self.plugins,
            &self.history,
            &self.input,
            ScrollOnSend::new(self.env.actions.as_ref(), &self.history),
        )
    }
}

impl Drop for WidgetController {
    fn drop(&mut self) {
        if let Some(timer) = self.indicator.take() {
            timer.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::context::NoopActions;
    use crate::widget::errors::SoundError;
    use crate::widget::sound::Silent;
    use crate::widget::title::MemoryTitle;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    struct CountingSound(Rc<Cell<usize>>);

    impl NotificationSound for CountingSound {
        fn play(&self) -> Result<(), SoundError> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    struct BrokenSound;

    impl NotificationSound for BrokenSound {
        fn play(&self) -> Result<(), SoundError> {
            Err(SoundError::Rejected("autoplay blocked".into()))
        }
    }

    fn settings(f: impl FnOnce(&mut WidgetSettings)) -> WidgetConfig {
        let mut config = WidgetConfig::default();
        f(&mut config.settings);
        config
    }

    fn env(sound: impl NotificationSound + 'static) -> WidgetEnv {
        WidgetEnv {
            actions: Box::new(NoopActions),
            title_sink: Arc::new(MemoryTitle::new("Page")),
            sound: Box::new(sound),
        }
    }

    #[test]
    fn test_color_scheme_change_recomputes_theme() {
        let props = WidgetProps::default();
        let mut controller = WidgetController::mount(props.clone(), HostPlugins::new(), env(Silent));
        assert_eq!(controller.state().theme, Theme::default());

        controller.update(WidgetProps {
            config: settings(|s| s.color_scheme = Some("nord".into())),
            ..props
        });
        assert_eq!(controller.state().theme, Theme::nord());
    }

    #[test]
    fn test_unrelated_change_keeps_theme_event_free() {
        let prev = WidgetProps::new(settings(|s| s.color_scheme = Some("#ff0000".into())));
        let next = WidgetProps {
            typing: true,
            open: true,
            ..prev.clone()
        };
        assert!(diff_props(&prev, &next).is_empty());
    }

    #[test]
    fn test_had_connection_latches() {
        let mut state = WidgetState::default();
        let settings = WidgetSettings::default();

        for connected in [false, true, false, false, true, false] {
            let (next, _) = state.reduce(&WidgetEvent::ConnectionChanged(connected), &settings);
            state = next;
            if connected {
                assert!(state.had_connection);
            }
        }
        assert!(state.had_connection);
    }

    #[test]
    fn test_initially_connected_counts_as_had_connection() {
        let props = WidgetProps {
            connected: true,
            ..WidgetProps::default()
        };
        assert!(WidgetState::initial(&props).had_connection);
        assert!(!WidgetState::initial(&WidgetProps::default()).had_connection);
    }

    #[test]
    fn test_preview_disabled_stays_empty() {
        let settings = WidgetSettings::default();
        let event = WidgetEvent::UnseenMessagesChanged {
            last_text: "Hello".into(),
            count: 1,
        };
        let (state, effects) = WidgetState::default().reduce(&event, &settings);
        assert_eq!(state.last_unseen_message_preview_text, "");
        assert!(effects.is_empty());
    }

    #[test]
    fn test_preview_and_sound_on_unseen_change() {
        let settings = settings(|s| {
            s.enable_unread_message_preview = true;
            s.enable_unread_message_sound = true;
        })
        .settings;
        let event = WidgetEvent::UnseenMessagesChanged {
            last_text: "Hello".into(),
            count: 1,
        };
        let (state, effects) = WidgetState::default().reduce(&event, &settings);
        assert_eq!(state.last_unseen_message_preview_text, "Hello");
        assert_eq!(effects, vec![Effect::PlayNotificationSound]);

        let cleared = WidgetEvent::UnseenMessagesChanged {
            last_text: String::new(),
            count: 0,
        };
        let (state, effects) = state.reduce(&cleared, &settings);
        assert_eq!(state.last_unseen_message_preview_text, "");
        assert!(effects.is_empty());
    }

    #[test]
    fn test_disabling_preview_clears_text() {
        let on = WidgetProps {
            config: settings(|s| s.enable_unread_message_preview = true),
            unseen_messages: Arc::new(vec![Message::bot("Psst")]),
            ..WidgetProps::default()
        };
        let mut controller = WidgetController::mount(on.clone(), HostPlugins::new(), env(Silent));
        assert_eq!(controller.state().last_unseen_message_preview_text, "Psst");

        controller.update(WidgetProps {
            config: WidgetConfig::default(),
            ..on
        });
        assert_eq!(controller.state().last_unseen_message_preview_text, "");
    }

    #[test]
    fn test_sound_plays_once_per_unseen_change() {
        let plays = Rc::new(Cell::new(0));
        let props = WidgetProps::new(settings(|s| s.enable_unread_message_sound = true));
        let mut controller = WidgetController::mount(
            props.clone(),
            HostPlugins::new(),
            env(CountingSound(plays.clone())),
        );

        let unseen = Arc::new(vec![Message::bot("a"), Message::bot("b"), Message::bot("c")]);
        controller.update(WidgetProps {
            unseen_messages: unseen.clone(),
            ..props.clone()
        });
        assert_eq!(plays.get(), 1);

        // same list identity again: no new transition
        controller.update(WidgetProps {
            unseen_messages: unseen,
            typing: true,
            ..props
        });
        assert_eq!(plays.get(), 1);
    }

    #[test]
    fn test_sound_failure_is_swallowed() {
        let props = WidgetProps::new(settings(|s| s.enable_unread_message_sound = true));
        let mut controller = WidgetController::mount(props.clone(), HostPlugins::new(), env(BrokenSound));
        controller.update(WidgetProps {
            unseen_messages: Arc::new(vec![Message::bot("hi")]),
            ..props
        });
        assert_eq!(controller.props().unseen_messages.len(), 1);
    }

    #[test]
    fn test_plugins_merged_once_on_mount() {
        let mut controller =
            WidgetController::mount(WidgetProps::default(), HostPlugins::new(), env(Silent));
        assert_eq!(controller.plugins().messages.len(), 1);
        assert_eq!(controller.plugins().inputs.len(), 1);

        for _ in 0..3 {
            controller.update(WidgetProps {
                unseen_messages: Arc::new(vec![Message::bot("x")]),
                ..WidgetProps::default()
            });
        }
        assert_eq!(controller.plugins().messages.len(), 1);
        assert_eq!(controller.plugins().inputs.len(), 1);
    }

    #[test]
    fn test_title_indicator_toggle_events() {
        let off = WidgetProps::default();
        let on = WidgetProps::new(settings(|s| s.enable_unread_message_title_indicator = true));
        assert_eq!(
            diff_props(&off, &on),
            vec![WidgetEvent::TitleIndicatorToggled(true)]
        );
        assert_eq!(
            diff_props(&on, &off),
            vec![WidgetEvent::TitleIndicatorToggled(false)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_start_keeps_a_single_timer() {
        let title = Arc::new(MemoryTitle::new("Page"));
        let props = WidgetProps {
            unseen_messages: Arc::new(vec![Message::bot("a")]),
            ..WidgetProps::default()
        };
        let env = WidgetEnv {
            actions: Box::new(NoopActions),
            title_sink: title.clone(),
            sound: Box::new(Silent),
        };
        let mut controller = WidgetController::mount(props, HostPlugins::new(), env);
        assert!(!controller.title_indicator_running());

        controller.apply(Effect::StartTitleIndicator);
        controller.apply(Effect::StartTitleIndicator);
        assert!(controller.title_indicator_running());

        // a second timer would double the writes per period
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(title.writes(), 1);
        assert_eq!(title.get(), "(1) New messages");

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(title.writes(), 2);
        assert_eq!(title.get(), "Page");

        controller.apply(Effect::StopTitleIndicator);
        tokio::time::sleep(Duration::from_millis(3_000)).await;
        assert_eq!(title.writes(), 2);
    }
}
