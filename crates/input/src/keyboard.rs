//! Non-blocking keyboard source backed by the terminal event queue.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::warn;

use crate::held::HeldKeys;
use crate::map::{command_for_key, is_movement};
use crate::types::{Command, CommandBatch, CommandSource};

/// Drains pending terminal events on every poll without waiting.
///
/// One-shot commands (jump, attack, pause, quit) are emitted once per press;
/// terminal auto-repeat of them is ignored. Movement is emitted on every poll
/// while the key is held.
#[derive(Debug, Default)]
pub struct KeyboardInput {
    held: HeldKeys,
}

impl KeyboardInput {
    pub fn new(held: HeldKeys) -> Self {
        Self { held }
    }

    /// Feed one key event. Public so callers with their own event loop can
    /// drive it.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant, out: &mut CommandBatch) {
        let Some(cmd) = command_for_key(key) else {
            return;
        };
        match key.kind {
            KeyEventKind::Press => {
                if is_movement(cmd) {
                    self.held.press(cmd, now);
                } else {
                    push_unique(out, cmd);
                }
            }
            KeyEventKind::Repeat => self.held.press(cmd, now),
            KeyEventKind::Release => self.held.release(cmd),
        }
    }

    /// Append held movement for this tick.
    pub fn finish_tick(&mut self, now: Instant, out: &mut CommandBatch) {
        if out.contains(&Command::Pause) || out.contains(&Command::Quit) {
            self.held.clear();
        }
        if let Some(cmd) = self.held.current(now) {
            push_unique(out, cmd);
        }
    }
}

fn push_unique(out: &mut CommandBatch, cmd: Command) {
    if !out.contains(&cmd) {
        let _ = out.try_push(cmd);
    }
}

impl CommandSource for KeyboardInput {
    fn poll_commands(&mut self, out: &mut CommandBatch) {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!(error = %e, "terminal input poll failed");
                    break;
                }
            }
            match event::read() {
                Ok(Event::Key(key)) => self.handle_key(key, Instant::now(), out),
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "terminal input read failed");
                    break;
                }
            }
        }
        self.finish_tick(Instant::now(), out);
    }
}
