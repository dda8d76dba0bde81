//! Scripted command source for headless runs and tests.

use std::collections::VecDeque;

use crate::types::{Command, CommandBatch, CommandSource};

/// Replays one batch of commands per poll, then goes quiet.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    ticks: VecDeque<Vec<Command>>,
}

impl ScriptedInput {
    pub fn new(ticks: impl IntoIterator<Item = Vec<Command>>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
        }
    }

    /// Hold `cmds` for `ticks` consecutive polls.
    pub fn hold(mut self, cmds: &[Command], ticks: usize) -> Self {
        self.ticks
            .extend(std::iter::repeat_with(|| cmds.to_vec()).take(ticks));
        self
    }

    /// Append a poll that yields `Quit`.
    pub fn then_quit(mut self) -> Self {
        self.ticks.push_back(vec![Command::Quit]);
        self
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl CommandSource for ScriptedInput {
    fn poll_commands(&mut self, out: &mut CommandBatch) {
        let Some(cmds) = self.ticks.pop_front() else {
            return;
        };
        for cmd in cmds {
            if out.try_push(cmd).is_err() {
                break;
            }
        }
    }
}
