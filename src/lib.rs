//! chatdock: embeddable terminal chat widget
//!
//! This library provides:
//! - Ordered plugin dispatch for message renderers and input modes
//! - A scrollable message history with typing indicator
//! - A widget controller deriving theme, connection and unseen-message state
//! - Title blinking and notification sound side effects
//! - Fullscreen-message and regular layouts rendered with ratatui

pub mod config;
pub mod widget;

pub use config::{WidgetConfig, WidgetSettings};
pub use widget::{WidgetController, WidgetEnv, WidgetProps};
