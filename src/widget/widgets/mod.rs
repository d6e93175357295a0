//! Leaf widgets composed by the widget view

mod header;
mod overlay;
mod teaser;
mod toggle;

pub use header::Header;
pub use overlay::DisconnectOverlay;
pub use teaser::Teaser;
pub use toggle::ToggleButton;
