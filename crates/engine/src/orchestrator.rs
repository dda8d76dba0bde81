//! Tick orchestrator: simulate, render, transmit, sleep.
//!
//! ```text
//! Idle --start--> Running <--pause/resume--> Paused
//!                    \                         /
//!                     +--quit / escalation----+--> Stopped
//! ```
//!
//! While paused the simulation, renderer and transport stay idle. Transport
//! events are drained at the start of every tick, paused or not, so a
//! channel failure is acted on before the next frame is sent.

use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{Config, ConfigError, FailurePolicy};
use crate::core::{PhysicsConfig, World, WorldEvent, WorldSummary};
use crate::render::{PaletteOverrides, Renderer};
use crate::transport::{
    open_channel, ChannelConfig, SendOutcome, Transport, TransportError, TransportEvent,
    TransportStats,
};
use crate::types::{Command, CommandBatch, CommandSource, FrameBuffer};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Quit,
    ChannelFailure,
}

/// Changes applied between ticks by [`Orchestrator::apply_reconfigure`].
/// `None` leaves a setting as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconfigure {
    pub frame_rate_hz: Option<u32>,
    pub physics: Option<PhysicsConfig>,
    pub palette: Option<PaletteOverrides>,
    pub channel: Option<ChannelConfig>,
    pub failure_threshold: Option<u32>,
    pub failure_policy: Option<FailurePolicy>,
    pub show_hud: Option<bool>,
    pub debug_overlay: Option<bool>,
}

/// Everything the debug collaborator may read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSnapshot {
    pub run_state: RunState,
    pub stop_reason: Option<StopReason>,
    pub frames_rendered: u64,
    pub escalations: u32,
    pub channel: String,
    pub world: WorldSummary,
    pub transport: TransportStats,
}

pub struct Orchestrator {
    cfg: Config,
    world: World,
    renderer: Renderer,
    transport: Option<Transport>,
    state: RunState,
    stop_reason: Option<StopReason>,
    pending: CommandBatch,
    frame: FrameBuffer,
    frames_rendered: u64,
    escalations: u32,
    last_tick: Option<Instant>,
}

impl Orchestrator {
    /// Validate `cfg` and assemble an idle orchestrator.
    pub fn new(cfg: Config, world: World, transport: Transport) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut world = world;
        world.set_config(cfg.physics);
        let renderer = Renderer::new(cfg.palette(), cfg.render_options());
        let frame = renderer.new_frame();
        Ok(Self {
            cfg,
            world,
            renderer,
            transport: Some(transport),
            state: RunState::Idle,
            stop_reason: None,
            pending: CommandBatch::new(),
            frame,
            frames_rendered: 0,
            escalations: 0,
            last_tick: None,
        })
    }

    /// Load the level, open the channel and start the transport.
    pub fn from_config(cfg: Config) -> Result<Self, EngineError> {
        cfg.validate()?;
        let world = World::new(cfg.load_level()?, cfg.physics);
        let channel = open_channel(&cfg.channel)?;
        let transport = Transport::start(channel, cfg.transport_config())?;
        Ok(Self::new(cfg, world, transport)?)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn transport(&self) -> Option<&Transport> {
        self.transport.as_ref()
    }

    /// The frame most recently rendered (and handed to the transport).
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn start(&mut self) {
        if self.state == RunState::Idle {
            self.state = RunState::Running;
            self.last_tick = None;
            info!(fps = self.cfg.frame_rate_hz, "loop started");
        }
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Paused;
            self.pending.clear();
            info!("paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state == RunState::Paused {
            self.state = RunState::Running;
            self.last_tick = None;
            info!("resumed");
        }
    }

    pub fn stop(&mut self, reason: StopReason) {
        if self.state != RunState::Stopped {
            self.state = RunState::Stopped;
            self.stop_reason = Some(reason);
            info!(?reason, "stopped");
        }
    }

    /// Restart the level from scratch. The loop state is unchanged.
    pub fn restart(&mut self) {
        self.world.restart();
        self.pending.clear();
    }

    /// Queue a command for the next tick. `Pause` toggles pause and `Quit`
    /// stops immediately; gameplay commands are discarded unless running.
    pub fn submit(&mut self, cmd: Command) {
        match cmd {
            Command::Pause => match self.state {
                RunState::Running => self.pause(),
                RunState::Paused => self.resume(),
                RunState::Idle | RunState::Stopped => {}
            },
            Command::Quit => self.stop(StopReason::Quit),
            Command::None => {}
            _ => {
                if self.state == RunState::Running && self.pending.try_push(cmd).is_err() {
                    debug!(?cmd, "command batch full; dropped");
                }
            }
        }
    }

    /// One deterministic tick with an explicit `dt`. Returns whether a frame
    /// was produced.
    pub fn step(&mut self, dt: f32) -> bool {
        self.poll_transport();
        if self.state != RunState::Running {
            self.pending.clear();
            return false;
        }

        self.world.advance(dt, &self.pending);
        self.pending.clear();
        for event in self.world.drain_events() {
            debug!(?event, "world event");
            if matches!(event, WorldEvent::Won | WorldEvent::Lost) {
                info!(?event, "level finished");
            }
        }

        self.renderer.render_into(&self.world, &mut self.frame);
        self.frames_rendered += 1;

        if let Some(transport) = &self.transport {
            match transport.send(&self.frame) {
                Ok(SendOutcome::Queued) => {}
                Ok(SendOutcome::Dropped) => debug!("frame dropped; write in flight"),
                Err(TransportError::NotConnected) => debug!("channel not open; frame dropped"),
                Err(e) => warn!(error = %e, "frame not sent"),
            }
        }
        true
    }

    /// Tick using wall-clock time since the previous tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        let dt = match self.last_tick {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f32(),
            None => self.cfg.frame_interval().as_secs_f32(),
        };
        self.last_tick = Some(now);
        self.step(dt)
    }

    fn poll_transport(&mut self) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        let mut failed = false;
        while let Some(event) = transport.try_event() {
            match event {
                TransportEvent::FrameFailed { consecutive, error } => {
                    debug!(consecutive, %error, "frame failed");
                }
                TransportEvent::ChannelFailed { consecutive } => {
                    error!(consecutive, channel = %transport.channel_name(), "channel failed");
                    failed = true;
                }
                TransportEvent::Recovered { after } => {
                    info!(after, "channel recovered");
                }
            }
        }
        if failed {
            self.escalations += 1;
            match self.cfg.failure_policy {
                FailurePolicy::Pause => self.pause(),
                FailurePolicy::Abort => self.stop(StopReason::ChannelFailure),
            }
        }
    }

    /// Run until stopped, polling `input` once per tick and calling
    /// `on_frame` after every tick.
    pub fn run_with<S, E>(
        &mut self,
        input: &mut S,
        mut on_frame: impl FnMut(&Orchestrator) -> Result<(), E>,
    ) -> Result<(), E>
    where
        S: CommandSource,
    {
        self.start();
        let mut batch = CommandBatch::new();
        let mut deadline = Instant::now();

        while self.state != RunState::Stopped {
            batch.clear();
            input.poll_commands(&mut batch);
            for &cmd in &batch {
                self.submit(cmd);
            }

            let now = Instant::now();
            if self.state == RunState::Running {
                self.tick(now);
            } else {
                self.step(0.0);
                self.last_tick = None;
            }
            on_frame(self)?;

            deadline += self.cfg.frame_interval();
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            } else {
                // Overran the frame; do not try to catch up.
                deadline = now;
            }
        }
        Ok(())
    }

    /// Apply a validated configuration change between ticks. Nothing changes
    /// when any part is invalid.
    pub fn apply_reconfigure(&mut self, change: Reconfigure) -> Result<(), EngineError> {
        let mut next = self.cfg.clone();
        if let Some(fps) = change.frame_rate_hz {
            next.frame_rate_hz = fps;
        }
        if let Some(physics) = change.physics {
            next.physics = physics;
        }
        if let Some(palette) = change.palette {
            next.palette = palette;
        }
        if let Some(channel) = change.channel.clone() {
            next.channel = channel;
        }
        if let Some(n) = change.failure_threshold {
            next.failure_threshold = n;
        }
        if let Some(policy) = change.failure_policy {
            next.failure_policy = policy;
        }
        if let Some(on) = change.show_hud {
            next.show_hud = on;
        }
        if let Some(on) = change.debug_overlay {
            next.debug_overlay = on;
        }
        next.validate()?;

        let channel = match &change.channel {
            Some(cfg) => Some(open_channel(cfg)?),
            None => None,
        };

        if let Some(transport) = self.transport.as_mut() {
            if let Some(channel) = channel {
                transport.reconnect(channel)?;
            }
            transport.set_failure_threshold(next.failure_threshold);
            transport.set_rate_window(next.transport_config().rate_window);
        }
        self.world.set_config(next.physics);
        self.renderer.set_palette(next.palette());
        self.renderer.set_hud(next.show_hud);
        self.renderer.set_debug_overlay(next.debug_overlay);
        info!(fps = next.frame_rate_hz, channel = %next.channel.describe(), "reconfigured");
        self.cfg = next;
        Ok(())
    }

    pub fn snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            run_state: self.state,
            stop_reason: self.stop_reason,
            frames_rendered: self.frames_rendered,
            escalations: self.escalations,
            channel: self
                .transport
                .as_ref()
                .map(|t| t.channel_name().to_string())
                .unwrap_or_default(),
            world: self.world.summary(),
            transport: self.transport_stats(),
        }
    }

    pub fn transport_stats(&self) -> TransportStats {
        self.transport
            .as_ref()
            .map(Transport::stats)
            .unwrap_or_default()
    }

    /// Stop the loop and the transport. Waits for an in-flight write only up
    /// to the configured shutdown timeout.
    pub fn shutdown(mut self) -> TransportStats {
        self.stop(StopReason::Quit);
        let timeout: Duration = self.cfg.shutdown_timeout();
        match self.transport.take() {
            Some(transport) => transport.shutdown(timeout),
            None => TransportStats::default(),
        }
    }
}
