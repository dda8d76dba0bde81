use serde::Serialize;

use crate::types::{Outcome, PlayerState};

/// Read-only summary of a world, consumed by the debug collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    pub score: u32,
    pub lives: u32,
    pub player_state: PlayerState,
    pub outcome: Outcome,
    pub player_x: f32,
    pub player_y: f32,
    pub camera_x: f32,
    pub invincible: bool,
    pub entities: usize,
}

impl WorldSummary {
    /// Whether the world still accepts gameplay input.
    pub fn playable(&self) -> bool {
        self.outcome == Outcome::Playing && self.player_state.is_alive()
    }
}
