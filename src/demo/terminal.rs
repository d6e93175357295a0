//! Terminal plumbing for the demo host

use std::io::{self, Stdout};
use std::panic;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chatdock::widget::TitleSink;
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Window title, written out by the render loop
///
/// The indicator task only records the title; the loop owns stdout and
/// applies pending titles between frames.
#[derive(Debug)]
pub struct TerminalTitle {
    inner: Mutex<TitleSlot>,
}

#[derive(Debug)]
struct TitleSlot {
    current: String,
    pending: bool,
}

impl TerminalTitle {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(TitleSlot {
                current: initial.into(),
                pending: true,
            }),
        }
    }

    /// Title set since the last call, if any
    pub fn take_pending(&self) -> Option<String> {
        let mut slot = self.inner.lock().ok()?;
        if !slot.pending {
            return None;
        }
        slot.pending = false;
        Some(slot.current.clone())
    }
}

impl TitleSink for TerminalTitle {
    fn get(&self) -> String {
        self.inner
            .lock()
            .map(|slot| slot.current.clone())
            .unwrap_or_default()
    }

    fn set(&self, title: &str) {
        if let Ok(mut slot) = self.inner.lock() {
            slot.current = title.to_string();
            slot.pending = true;
        }
    }
}

pub fn apply_title(terminal: &mut Tui, title: &str) -> Result<()> {
    execute!(terminal.backend_mut(), SetTitle(title)).context("Failed to set terminal title")
}

/// Install a panic hook that restores the terminal before panicking
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

pub fn setup() -> Result<Tui> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        anyhow::bail!("chatdock demo requires a real terminal (TTY).");
    }

    enable_raw_mode().context("Failed to enable terminal raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Failed to create terminal backend")
}

pub fn restore(terminal: &mut Tui) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}
