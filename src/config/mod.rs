//! Widget configuration
//!
//! Mirrors the host-facing `config` object: an `active` switch and an
//! optional `settings` block. Every setting defaults to "off", so a missing
//! block or key never fails to load.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default label shown by the unread title indicator
pub const DEFAULT_UNREAD_TITLE_TEXT: &str = "New messages";

/// Top-level widget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub active: bool,
    pub settings: WidgetSettings,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            active: true,
            settings: WidgetSettings::default(),
        }
    }
}

/// Optional widget settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetSettings {
    /// Preset name (`nord`) or `#rrggbb` accent colour
    pub color_scheme: Option<String>,
    pub title: Option<String>,
    pub header_logo_url: Option<String>,
    pub disable_branding: bool,
    pub disable_toggle_button: bool,
    pub enable_connection_status_indicator: bool,
    pub enable_unread_message_title_indicator: bool,
    pub enable_unread_message_preview: bool,
    pub enable_unread_message_sound: bool,
    pub enable_unread_message_badge: bool,
    pub unread_message_title_text: Option<String>,
}

impl WidgetSettings {
    /// Label for the blinking unread title
    pub fn unread_title_text(&self) -> &str {
        self.unread_message_title_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(DEFAULT_UNREAD_TITLE_TEXT)
    }

    /// Header title, falling back to a generic label
    pub fn header_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Chat")
    }
}

impl WidgetConfig {
    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: WidgetConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "chatdock") {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            Ok(PathBuf::from("config.toml"))
        }
    }
}
