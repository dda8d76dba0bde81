//! Transport runtime.
//!
//! Bridges the sync tick thread with an async worker that owns the channel.
//!
//! - The tick thread encodes a frame and hands it over through a one-slot
//!   mailbox. While a write is in flight new frames are dropped, never queued.
//! - The worker runs each blocking write on tokio's blocking pool, moving the
//!   channel in and back out, so exactly one write can be active.
//! - Every failed write is counted. The `failure_threshold`-th consecutive
//!   failure raises one [`TransportEvent::ChannelFailed`]; the flag re-arms
//!   after the next successful write or when the channel is replaced.
//! - Each channel carries a generation. A write that finishes on a replaced
//!   channel still counts as sent or failed, but cannot touch the connection
//!   flag or the failure streak of its successor.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::channel::FrameChannel;
use crate::codec;
use crate::error::TransportError;
use crate::stats::{StatsState, TransportStats};
use crate::types::{FrameBuffer, DEFAULT_FAILURE_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Consecutive failures that escalate to a channel failure
    pub failure_threshold: u32,
    /// Sliding window for the transmit rate
    pub rate_window: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            rate_window: Duration::from_secs(1),
        }
    }
}

/// Notifications from the worker to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// One write failed; the frame was dropped
    FrameFailed { consecutive: u32, error: String },
    /// The failure streak reached the threshold (raised once per streak)
    ChannelFailed { consecutive: u32 },
    /// A write succeeded after `after` consecutive failures
    Recovered { after: u32 },
}

/// Result of handing a frame to [`Transport::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Accepted for transmission
    Queued,
    /// A write was already in flight; this frame was discarded
    Dropped,
}

enum Control {
    Replace {
        channel: Box<dyn FrameChannel>,
        generation: u64,
    },
}

struct Shared {
    in_flight: AtomicBool,
    connected: AtomicBool,
    /// Bumped under the stats lock each time the channel is replaced
    generation: AtomicU64,
    threshold: AtomicU32,
    stats: Mutex<StatsState>,
    events: mpsc::UnboundedSender<TransportEvent>,
}

impl Shared {
    fn stats(&self) -> MutexGuard<'_, StatsState> {
        self.stats.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Account for one write attempt made on channel `generation`. Clears
    /// `in_flight` last so a caller that sees the transport idle also sees
    /// the updated counters.
    fn record(&self, result: io::Result<()>, open: bool, generation: u64) {
        let mut st = self.stats();
        if generation != self.generation.load(Ordering::Acquire) {
            match result {
                Ok(()) => {
                    st.frames_sent += 1;
                    st.meter.record(Instant::now());
                }
                Err(e) => {
                    st.write_errors += 1;
                    st.frames_dropped += 1;
                    debug!(error = %e, "write on replaced channel failed");
                }
            }
            drop(st);
            self.in_flight.store(false, Ordering::Release);
            return;
        }
        match result {
            Ok(()) => {
                st.frames_sent += 1;
                st.meter.record(Instant::now());
                if st.consecutive_errors > 0 {
                    info!(after = st.consecutive_errors, "channel recovered");
                    let _ = self.events.send(TransportEvent::Recovered {
                        after: st.consecutive_errors,
                    });
                }
                st.consecutive_errors = 0;
                st.escalated = false;
            }
            Err(e) => self.count_failure(&mut st, e.to_string()),
        }
        self.connected.store(open, Ordering::Release);
        drop(st);
        self.in_flight.store(false, Ordering::Release);
    }

    fn count_failure(&self, st: &mut StatsState, error: String) {
        st.write_errors += 1;
        st.frames_dropped += 1;
        st.consecutive_errors = st.consecutive_errors.saturating_add(1);
        let consecutive = st.consecutive_errors;
        warn!(consecutive, %error, "frame write failed");
        let _ = self
            .events
            .send(TransportEvent::FrameFailed { consecutive, error });

        let threshold = self.threshold.load(Ordering::Acquire).max(1);
        if consecutive >= threshold && !st.escalated {
            st.escalated = true;
            st.escalations += 1;
            error!(consecutive, threshold, "channel failure escalated");
            let _ = self.events.send(TransportEvent::ChannelFailed { consecutive });
        }
    }
}

/// Running transport instance.
pub struct Transport {
    rt: Option<Runtime>,
    frame_tx: Option<mpsc::Sender<Vec<u8>>>,
    control_tx: Option<mpsc::UnboundedSender<Control>>,
    events_rx: mpsc::UnboundedReceiver<TransportEvent>,
    worker: Option<JoinHandle<()>>,
    shared: Arc<Shared>,
    channel_name: String,
}

impl Transport {
    /// Start the worker with `channel` as its initial channel.
    pub fn start(
        channel: Box<dyn FrameChannel>,
        cfg: TransportConfig,
    ) -> Result<Self, TransportError> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("matrix-transport")
            .enable_all()
            .build()
            .map_err(TransportError::Runtime)?;

        let (frame_tx, frame_rx) = mpsc::channel::<Vec<u8>>(1);
        let (control_tx, control_rx) = mpsc::unbounded_channel::<Control>();
        let (events_tx, events_rx) = mpsc::unbounded_channel::<TransportEvent>();

        let channel_name = channel.describe();
        let shared = Arc::new(Shared {
            in_flight: AtomicBool::new(false),
            connected: AtomicBool::new(channel.is_open()),
            generation: AtomicU64::new(0),
            threshold: AtomicU32::new(cfg.failure_threshold.max(1)),
            stats: Mutex::new(StatsState::new(cfg.rate_window)),
            events: events_tx,
        });

        let worker = rt.spawn(run_worker(channel, frame_rx, control_rx, Arc::clone(&shared)));
        info!(channel = %channel_name, "transport started");

        Ok(Self {
            rt: Some(rt),
            frame_tx: Some(frame_tx),
            control_tx: Some(control_tx),
            events_rx,
            worker: Some(worker),
            shared,
            channel_name,
        })
    }

    /// Encode and hand off one frame without waiting for the write.
    ///
    /// Returns `Dropped` while a previous write is still in flight. A closed
    /// channel fails with `NotConnected`, and that failure counts toward
    /// escalation like a failed write.
    pub fn send(&self, fb: &FrameBuffer) -> Result<SendOutcome, TransportError> {
        let tx = self.frame_tx.as_ref().ok_or(TransportError::Shutdown)?;

        if !self.shared.connected.load(Ordering::Acquire) {
            let mut st = self.shared.stats();
            self.shared
                .count_failure(&mut st, "channel is not open".to_string());
            return Err(TransportError::NotConnected);
        }

        if self
            .shared
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.shared.stats().frames_dropped += 1;
            return Ok(SendOutcome::Dropped);
        }

        match tx.try_send(codec::encode(fb)) {
            Ok(()) => Ok(SendOutcome::Queued),
            Err(TrySendError::Full(_)) => {
                self.shared.in_flight.store(false, Ordering::Release);
                self.shared.stats().frames_dropped += 1;
                Ok(SendOutcome::Dropped)
            }
            Err(TrySendError::Closed(_)) => {
                self.shared.in_flight.store(false, Ordering::Release);
                Err(TransportError::Shutdown)
            }
        }
    }

    /// Replace the channel and start a fresh failure streak. Any write in
    /// flight finishes on the old channel without affecting the new one.
    pub fn reconnect(&mut self, channel: Box<dyn FrameChannel>) -> Result<(), TransportError> {
        let tx = self.control_tx.as_ref().ok_or(TransportError::Shutdown)?;
        if tx.is_closed() {
            return Err(TransportError::Shutdown);
        }
        let name = channel.describe();
        let open = channel.is_open();

        let generation = {
            let mut st = self.shared.stats();
            let generation = self.shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
            st.consecutive_errors = 0;
            st.escalated = false;
            self.shared.connected.store(open, Ordering::Release);
            generation
        };
        tx.send(Control::Replace {
            channel,
            generation,
        })
        .map_err(|_| TransportError::Shutdown)?;
        info!(channel = %name, generation, "transport channel replaced");
        self.channel_name = name;
        Ok(())
    }

    pub fn set_failure_threshold(&self, threshold: u32) {
        self.shared
            .threshold
            .store(threshold.max(1), Ordering::Release);
    }

    pub fn set_rate_window(&self, window: Duration) {
        self.shared.stats().meter.set_window(window);
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    pub fn is_busy(&self) -> bool {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    pub fn try_event(&mut self) -> Option<TransportEvent> {
        self.events_rx.try_recv().ok()
    }

    pub fn stats(&self) -> TransportStats {
        let mut st = self.shared.stats();
        let transmit_rate_hz = st.meter.rate_hz(Instant::now());
        TransportStats {
            frames_sent: st.frames_sent,
            frames_dropped: st.frames_dropped,
            write_errors: st.write_errors,
            consecutive_errors: st.consecutive_errors,
            escalations: st.escalations,
            transmit_rate_hz,
            connected: self.is_connected(),
            in_flight: self.is_busy(),
        }
    }

    /// Block until no write is in flight. Returns `false` on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_busy() {
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        true
    }

    /// Stop the worker, waiting at most `timeout` for a write in flight.
    pub fn shutdown(mut self, timeout: Duration) -> TransportStats {
        self.stop(timeout);
        self.stats()
    }

    fn stop(&mut self, timeout: Duration) {
        self.frame_tx.take();
        self.control_tx.take();
        let Some(rt) = self.rt.take() else {
            return;
        };
        if let Some(worker) = self.worker.take() {
            let joined = rt.block_on(async { tokio::time::timeout(timeout, worker).await });
            if joined.is_err() {
                warn!(?timeout, "transport worker did not stop in time");
            }
        }
        rt.shutdown_timeout(timeout);
        info!(channel = %self.channel_name, "transport stopped");
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.stop(Duration::from_millis(100));
    }
}

/// Stands in for a channel lost to a panicking write.
struct ClosedChannel;

impl FrameChannel for ClosedChannel {
    fn write_frame(&mut self, _frame: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::NotConnected, "channel lost"))
    }

    fn is_open(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        "closed".to_string()
    }
}

async fn run_worker(
    mut channel: Box<dyn FrameChannel>,
    mut frames: mpsc::Receiver<Vec<u8>>,
    mut control: mpsc::UnboundedReceiver<Control>,
    shared: Arc<Shared>,
) {
    let mut current = 0u64;
    loop {
        tokio::select! {
            biased;
            Some(ctl) = control.recv() => match ctl {
                Control::Replace { channel: next, generation } => {
                    debug!(
                        old = %channel.describe(),
                        new = %next.describe(),
                        generation,
                        "swapping channel"
                    );
                    channel = next;
                    current = generation;
                }
            },
            Some(frame) = frames.recv() => {
                channel = write_one(channel, current, frame, &shared).await;
            }
            else => break,
        }
    }
    debug!("transport worker exiting");
}

async fn write_one(
    mut channel: Box<dyn FrameChannel>,
    generation: u64,
    frame: Vec<u8>,
    shared: &Shared,
) -> Box<dyn FrameChannel> {
    let joined = tokio::task::spawn_blocking(move || {
        let result = channel.write_frame(&frame);
        (channel, result)
    })
    .await;

    match joined {
        Ok((channel, result)) => {
            let open = channel.is_open();
            shared.record(result, open, generation);
            channel
        }
        Err(e) => {
            error!(error = %e, "frame write panicked; channel lost");
            let lost = io::Error::new(io::ErrorKind::Other, e.to_string());
            shared.record(Err(lost), false, generation);
            Box::new(ClosedChannel)
        }
    }
}
