//! Delivery statistics.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Successful writes per second over a sliding window.
#[derive(Debug, Clone)]
pub struct RateMeter {
    window: Duration,
    stamps: VecDeque<Instant>,
}

impl RateMeter {
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.max(Duration::from_millis(1)),
            stamps: VecDeque::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window.max(Duration::from_millis(1));
    }

    pub fn record(&mut self, now: Instant) {
        self.prune(now);
        self.stamps.push_back(now);
    }

    pub fn rate_hz(&mut self, now: Instant) -> f64 {
        self.prune(now);
        self.stamps.len() as f64 / self.window.as_secs_f64()
    }

    fn prune(&mut self, now: Instant) {
        let Some(cutoff) = now.checked_sub(self.window) else {
            return;
        };
        while self.stamps.front().is_some_and(|&t| t <= cutoff) {
            self.stamps.pop_front();
        }
    }
}

/// Point-in-time transport statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TransportStats {
    pub frames_sent: u64,
    /// Frames not delivered: dropped while a write was in flight, or lost to
    /// a failed write
    pub frames_dropped: u64,
    pub write_errors: u64,
    pub consecutive_errors: u32,
    /// Channel-failure escalations so far
    pub escalations: u32,
    pub transmit_rate_hz: f64,
    pub connected: bool,
    pub in_flight: bool,
}

/// Mutable counters behind the transport's lock.
#[derive(Debug)]
pub(crate) struct StatsState {
    pub frames_sent: u64,
    pub frames_dropped: u64,
    pub write_errors: u64,
    pub consecutive_errors: u32,
    pub escalations: u32,
    /// Set once the current failure streak has been escalated
    pub escalated: bool,
    pub meter: RateMeter,
}

impl StatsState {
    pub fn new(window: Duration) -> Self {
        Self {
            frames_sent: 0,
            frames_dropped: 0,
            write_errors: 0,
            consecutive_errors: 0,
            escalations: 0,
            escalated: false,
            meter: RateMeter::new(window),
        }
    }
}
