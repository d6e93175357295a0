//! Typed errors for the widget core
//!
//! None of these ever escape a render pass; callers log and degrade.

use thiserror::Error;

/// Errors raised by message and input plugins
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Plugin {plugin} failed to render: {reason}")]
    RenderFailed { plugin: String, reason: String },

    #[error("Plugin {plugin} cannot handle {what}")]
    Unsupported { plugin: String, what: String },

    #[error("Malformed message payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PluginError {
    /// Shorthand for a render failure attributed to a named plugin
    pub fn render_failed(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RenderFailed {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from the notification sound device
#[derive(Debug, Error)]
pub enum SoundError {
    #[error("Sound playback rejected: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
