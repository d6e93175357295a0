//! Notification sound
//!
//! Playback failures are reported to the caller, which logs and moves on.

use std::io::Write;

use super::errors::SoundError;

/// Plays the unread notification
pub trait NotificationSound {
    fn play(&self) -> Result<(), SoundError>;
}

/// Rings the terminal bell on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl NotificationSound for TerminalBell {
    fn play(&self) -> Result<(), SoundError> {
        let mut stdout = std::io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Never makes a sound
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl NotificationSound for Silent {
    fn play(&self) -> Result<(), SoundError> {
        Ok(())
    }
}
