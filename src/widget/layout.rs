//! Widget layout
//!
//! The open panel is either the regular layout (header, history, input) or
//! a single fullscreen message; which one is purely a function of the
//! `fullscreen_message` prop. The closed widget shows only the teaser and
//! the toggle button.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    symbols::border,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::context::RenderContext;
use super::controller::{ScrollOnSend, WidgetProps, WidgetState};
use super::history::{render_message, HistoryState, HistoryView};
use super::input::{InputState, InputView};
use super::message::{Message, MessageSource};
use super::plugins::ResolvedPlugins;
use super::widgets::{DisconnectOverlay, Header, Teaser, ToggleButton};

/// Which layout the open panel uses
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutMode<'a> {
    Regular,
    Fullscreen(&'a Message),
}

impl<'a> LayoutMode<'a> {
    pub fn of(props: &'a WidgetProps) -> Self {
        match &props.fullscreen_message {
            Some(message) => Self::Fullscreen(message),
            None => Self::Regular,
        }
    }
}

/// Whether the disconnect overlay covers the panel
///
/// Never before the first successful connection.
pub fn show_disconnect_overlay(props: &WidgetProps, state: &WidgetState) -> bool {
    props.config.settings.enable_connection_status_indicator
        && state.had_connection
        && !props.connected
}

/// Preview text for the teaser, when it should be shown
pub fn teaser_text<'a>(props: &WidgetProps, state: &'a WidgetState) -> Option<&'a str> {
    let preview = state.last_unseen_message_preview_text.as_str();
    (!props.open && props.config.settings.enable_unread_message_preview && !preview.is_empty())
        .then_some(preview)
}

/// Count for the toggle badge, when badges are enabled
pub fn badge_count(props: &WidgetProps) -> Option<usize> {
    props
        .config
        .settings
        .enable_unread_message_badge
        .then(|| props.unseen_messages.len())
}

/// Full widget render tree for one frame
pub struct WidgetView<'a> {
    props: &'a WidgetProps,
    state: &'a WidgetState,
    plugins: &'a ResolvedPlugins,
    history: &'a HistoryState,
    input: &'a InputState,
    actions: ScrollOnSend<'a>,
}

impl<'a> WidgetView<'a> {
    pub(crate) fn new(
        props: &'a WidgetProps,
        state: &'a WidgetState,
        plugins: &'a ResolvedPlugins,
        history: &'a HistoryState,
        input: &'a InputState,
        actions: ScrollOnSend<'a>,
    ) -> Self {
        Self {
            props,
            state,
            plugins,
            history,
            input,
            actions,
        }
    }

    fn context(&self, width: u16) -> RenderContext<'_> {
        RenderContext::new(&self.state.theme, &self.props.config, &self.actions, width)
    }

    fn render_panel(&self, area: Rect, buf: &mut Buffer) {
        let theme = &self.state.theme;
        buf.set_style(area, Style::default().bg(theme.bg_main));

        match LayoutMode::of(self.props) {
            LayoutMode::Fullscreen(message) => self.render_fullscreen(message, area, buf),
            LayoutMode::Regular => self.render_regular(area, buf),
        }

        if show_disconnect_overlay(self.props, self.state) {
            DisconnectOverlay::new(theme)
                .permanent(self.props.reconnection_limit)
                .render(area, buf);
        }
    }

    fn render_regular(&self, area: Rect, buf: &mut Buffer) {
        let settings = &self.props.config.settings;
        let input_height = InputView::height(&self.plugins.inputs, &self.props.input_mode);
        let branding_height = u16::from(!settings.disable_branding);

        let [header, history, input, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(input_height),
            Constraint::Length(branding_height),
        ])
        .areas(area);

        Header::new(settings, &self.state.theme)
            .connected(self.props.connected)
            .render(header, buf);

        HistoryView::new(
            &self.props.messages,
            &self.plugins.messages,
            self.history,
            self.context(history.width),
        )
        .typing(self.props.typing)
        .render(history, buf);

        InputView::new(
            &self.plugins.inputs,
            &self.props.input_mode,
            self.input,
            self.context(input.width),
        )
        .render(input, buf);

        if branding_height > 0 {
            Paragraph::new(Line::styled(
                "Powered by chatdock",
                Style::default().fg(self.state.theme.text_muted),
            ))
            .alignment(Alignment::Center)
            .render(footer, buf);
        }
    }

    fn render_fullscreen(&self, message: &Message, area: Rect, buf: &mut Buffer) {
        let theme = &self.state.theme;
        let title = match message.source {
            MessageSource::User => " You ",
            MessageSource::Bot => " Bot ",
            MessageSource::Agent => " Agent ",
            MessageSource::System => " Notice ",
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(theme.accent))
            .title(title)
            .title_bottom(Line::styled(
                " Esc to close ",
                Style::default().fg(theme.text_muted),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let ctx = self.context(inner.width).fullscreen(true);
        if let Some(view) = render_message(&self.plugins.messages, message, &ctx) {
            Paragraph::new(view).render(inner, buf);
        }
    }
}

impl Widget for WidgetView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.props.config.active || area.height < 1 {
            return;
        }

        let settings = &self.props.config.settings;
        let theme = &self.state.theme;

        let (body, toggle_row) = if settings.disable_toggle_button {
            (area, None)
        } else {
            let [body, toggle] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
            (body, Some(toggle))
        };

        if self.props.open {
            if body.height > 0 {
                self.render_panel(body, buf);
            }
        } else if let Some(text) = teaser_text(self.props, self.state) {
            Teaser::new(text, theme).render(body, buf);
        }

        if let Some(toggle_row) = toggle_row {
            ToggleButton::new(theme)
                .open(self.props.open)
                .badge(badge_count(self.props))
                .render(toggle_row, buf);
        }
    }
}
