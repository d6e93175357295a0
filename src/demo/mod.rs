//! Demo host for the chatdock widget
//!
//! An echo bot behind a fake transport, driven from a crossterm event loop.

pub mod bot;
pub mod host;
pub mod quick_replies;
pub mod terminal;
