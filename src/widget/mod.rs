//! Embeddable chat widget
//!
//! Plugin dispatch for messages and input modes, the history and input
//! views, and the controller that owns the widget's derived state and its
//! notification side effects.

pub mod builtins;
pub mod context;
pub mod controller;
pub mod errors;
pub mod events;
pub mod history;
pub mod input;
pub mod layout;
pub mod message;
pub mod plugins;
pub mod sound;
pub mod theme;
pub mod title;
pub mod utils;
pub mod widgets;

pub use builtins::{RegularMessagePlugin, TextInputPlugin, REGULAR_MESSAGE_PLUGIN, TEXT_INPUT_MODE};
pub use context::{MessageView, NoopActions, RenderContext, WidgetActions};
pub use controller::{Effect, WidgetController, WidgetEnv, WidgetEvent, WidgetProps, WidgetState};
pub use errors::{PluginError, SoundError};
pub use events::{Event, EventHandler};
pub use history::{HistoryState, HistoryView};
pub use input::{InputState, InputView};
pub use layout::{LayoutMode, WidgetView};
pub use message::{Message, MessageSource};
pub use plugins::{HostPlugins, InputPlugin, MessagePlugin, ResolvedPlugins};
pub use sound::{NotificationSound, Silent, TerminalBell};
pub use theme::{Theme, ThemePreset};
pub use title::{MemoryTitle, TitleSink};
