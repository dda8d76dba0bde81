//! One-line status summary shown under the preview.

use crate::engine::{DebugSnapshot, RunState};
use crate::types::Outcome;

pub fn status_line(snap: &DebugSnapshot) -> String {
    let state = match (snap.run_state, snap.world.outcome) {
        (RunState::Paused, _) => "PAUSED",
        (RunState::Stopped, _) => "STOPPED",
        (RunState::Idle, _) => "IDLE",
        (RunState::Running, Outcome::Won) => "CLEAR",
        (RunState::Running, Outcome::Lost) => "GAME OVER",
        (RunState::Running, Outcome::Playing) => "RUN",
    };
    let tx = &snap.transport;
    format!(
        "{state:<9} score {:>5} lives {} {:<5} | {} {:.1}Hz sent {} drop {} err {}{}",
        snap.world.score,
        snap.world.lives,
        snap.world.player_state.as_str(),
        snap.channel,
        tx.transmit_rate_hz,
        tx.frames_sent,
        tx.frames_dropped,
        tx.write_errors,
        if tx.connected { "" } else { " [offline]" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::World;
    use crate::engine::core::PhysicsConfig;
    use crate::engine::transport::TransportStats;

    fn snapshot(run_state: RunState) -> DebugSnapshot {
        DebugSnapshot {
            run_state,
            stop_reason: None,
            frames_rendered: 10,
            escalations: 0,
            channel: "mock".to_string(),
            world: World::with_default_level(PhysicsConfig::default()).summary(),
            transport: TransportStats {
                frames_sent: 9,
                frames_dropped: 1,
                connected: true,
                ..TransportStats::default()
            },
        }
    }

    #[test]
    fn shows_state_and_counters() {
        let line = status_line(&snapshot(RunState::Running));
        assert!(line.starts_with("RUN"));
        assert!(line.contains("lives 3"));
        assert!(line.contains("sent 9 drop 1 err 0"));
        assert!(!line.contains("offline"));

        let mut snap = snapshot(RunState::Paused);
        snap.transport.connected = false;
        let line = status_line(&snap);
        assert!(line.starts_with("PAUSED"));
        assert!(line.ends_with("[offline]"));
    }
}
