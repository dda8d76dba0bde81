//! Held-key tracking for terminals that may not report key releases.
//!
//! A movement key stays held until one of:
//! - its release event arrives
//! - the opposite direction is pressed
//! - no press or repeat for it arrives within the release timeout

use std::time::{Duration, Instant};

use crate::types::Command;

/// Longer than a typical terminal auto-repeat delay.
pub const DEFAULT_RELEASE_TIMEOUT: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Horizontal {
    Left,
    Right,
}

impl Horizontal {
    fn from_command(cmd: Command) -> Option<Self> {
        match cmd {
            Command::MoveLeft => Some(Self::Left),
            Command::MoveRight => Some(Self::Right),
            _ => None,
        }
    }

    fn command(self) -> Command {
        match self {
            Self::Left => Command::MoveLeft,
            Self::Right => Command::MoveRight,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeldKeys {
    horizontal: Option<(Horizontal, Instant)>,
    release_timeout: Duration,
}

impl Default for HeldKeys {
    fn default() -> Self {
        Self::new(DEFAULT_RELEASE_TIMEOUT)
    }
}

impl HeldKeys {
    pub fn new(release_timeout: Duration) -> Self {
        Self {
            horizontal: None,
            release_timeout,
        }
    }

    /// Press or auto-repeat of a movement command. Other commands are ignored.
    pub fn press(&mut self, cmd: Command, now: Instant) {
        if let Some(dir) = Horizontal::from_command(cmd) {
            self.horizontal = Some((dir, now));
        }
    }

    pub fn release(&mut self, cmd: Command) {
        if let (Some(dir), Some((held, _))) = (Horizontal::from_command(cmd), self.horizontal) {
            if dir == held {
                self.horizontal = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.horizontal = None;
    }

    /// The movement command still held at `now`, if any.
    pub fn current(&mut self, now: Instant) -> Option<Command> {
        let (dir, last) = self.horizontal?;
        if now.saturating_duration_since(last) > self.release_timeout {
            self.horizontal = None;
            return None;
        }
        Some(dir.command())
    }
}
