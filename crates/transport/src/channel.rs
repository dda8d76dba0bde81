//! Byte channels a transport can write frames to.
//!
//! - [`SerialChannel`]: a real serial device, 8N1, no flow control
//! - [`MockChannel`]: in-memory channel with scripted faults, for tests and
//!   running without hardware

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{info, warn};

use crate::error::TransportError;
use crate::types::{DEFAULT_BAUD_RATE, DEFAULT_SERIAL_PORT};

/// Destination for encoded frames. Owned exclusively by the transport worker.
pub trait FrameChannel: Send {
    /// Write one complete frame. A partial write is reported as an error.
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Whether the channel can currently accept writes.
    fn is_open(&self) -> bool {
        true
    }

    /// Human-readable name for logs and status lines.
    fn describe(&self) -> String;
}

/// Error kinds after which a serial port is treated as gone.
fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::BrokenPipe
            | ErrorKind::NotConnected
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::UnexpectedEof
    )
}

pub struct SerialChannel {
    port_name: String,
    baud_rate: u32,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialChannel {
    pub fn open(
        port_name: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(timeout)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open()
            .map_err(|source| TransportError::Open {
                port: port_name.to_string(),
                source,
            })?;
        info!(port = port_name, baud_rate, "serial port opened");
        Ok(Self {
            port_name: port_name.to_string(),
            baud_rate,
            port: Some(port),
        })
    }
}

impl FrameChannel for SerialChannel {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        let Some(port) = self.port.as_mut() else {
            return Err(io::Error::new(ErrorKind::NotConnected, "serial port closed"));
        };
        let result = port.write_all(frame).and_then(|()| port.flush());
        if let Err(e) = &result {
            if is_disconnect(e.kind()) {
                warn!(port = %self.port_name, error = %e, "serial port disconnected");
                self.port = None;
            }
        }
        result
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn describe(&self) -> String {
        format!("serial:{}@{}", self.port_name, self.baud_rate)
    }
}

/// Names of the serial ports present on this machine.
pub fn list_ports() -> Result<Vec<String>, TransportError> {
    let ports = serialport::available_ports().map_err(TransportError::List)?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

/// Scripted faults for [`MockChannel`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultPlan {
    /// Fail every n-th write (1 = every write)
    pub fail_every: Option<u32>,
    /// Disconnect permanently on the write after this many
    pub disconnect_after: Option<u64>,
    /// Time each write takes
    pub delay_ms: u64,
}

impl FaultPlan {
    pub fn always_fail() -> Self {
        Self {
            fail_every: Some(1),
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay_ms: delay.as_millis() as u64,
            ..Self::default()
        }
    }
}

/// Frames kept by [`MockLog`].
pub const MOCK_HISTORY: usize = 64;

/// Instrumentation shared between a [`MockChannel`] and the test observing it.
#[derive(Debug, Default)]
pub struct MockLog {
    frames: VecDeque<Vec<u8>>,
    frames_written: u64,
    calls: u64,
    failures: u64,
    active: u32,
    max_concurrent: u32,
}

#[derive(Debug, Clone, Default)]
pub struct MockHandle(Arc<Mutex<MockLog>>);

impl MockHandle {
    fn lock(&self) -> MutexGuard<'_, MockLog> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Most recent successfully written frames, oldest first.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.lock().frames.iter().cloned().collect()
    }

    pub fn frames_written(&self) -> u64 {
        self.lock().frames_written
    }

    /// Write attempts, successful or not.
    pub fn calls(&self) -> u64 {
        self.lock().calls
    }

    pub fn failures(&self) -> u64 {
        self.lock().failures
    }

    /// Highest number of writes ever observed running at the same time.
    pub fn max_concurrent(&self) -> u32 {
        self.lock().max_concurrent
    }
}

pub struct MockChannel {
    plan: FaultPlan,
    log: MockHandle,
    calls: u64,
    connected: bool,
}

impl MockChannel {
    pub fn new(plan: FaultPlan) -> Self {
        Self {
            plan,
            log: MockHandle::default(),
            calls: 0,
            connected: true,
        }
    }

    pub fn handle(&self) -> MockHandle {
        self.log.clone()
    }
}

impl FrameChannel for MockChannel {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.calls += 1;
        {
            let mut log = self.log.lock();
            log.calls += 1;
            log.active += 1;
            log.max_concurrent = log.max_concurrent.max(log.active);
        }

        if self.plan.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.plan.delay_ms));
        }

        let result = if !self.connected {
            Err(io::Error::new(ErrorKind::NotConnected, "mock channel disconnected"))
        } else if self.plan.disconnect_after.is_some_and(|n| self.calls > n) {
            self.connected = false;
            Err(io::Error::new(ErrorKind::BrokenPipe, "mock channel disconnected"))
        } else if self
            .plan
            .fail_every
            .is_some_and(|n| n > 0 && self.calls % n as u64 == 0)
        {
            Err(io::Error::new(ErrorKind::TimedOut, "injected write failure"))
        } else {
            Ok(())
        };

        let mut log = self.log.lock();
        log.active -= 1;
        match &result {
            Ok(()) => {
                log.frames_written += 1;
                if log.frames.len() == MOCK_HISTORY {
                    log.frames.pop_front();
                }
                log.frames.push_back(frame.to_vec());
            }
            Err(_) => log.failures += 1,
        }
        result
    }

    fn is_open(&self) -> bool {
        self.connected
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// Serial device settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    pub port: String,
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERIAL_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: 1000,
        }
    }
}

/// Which channel to open, as written in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelConfig {
    Serial(SerialSettings),
    Mock(FaultPlan),
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig::Serial(SerialSettings::default())
    }
}

impl ChannelConfig {
    pub fn describe(&self) -> String {
        match self {
            ChannelConfig::Serial(s) => format!("serial:{}@{}", s.port, s.baud_rate),
            ChannelConfig::Mock(_) => "mock".to_string(),
        }
    }
}

pub fn open_channel(cfg: &ChannelConfig) -> Result<Box<dyn FrameChannel>, TransportError> {
    match cfg {
        ChannelConfig::Serial(s) => Ok(Box::new(SerialChannel::open(
            &s.port,
            s.baud_rate,
            Duration::from_millis(s.timeout_ms),
        )?)),
        ChannelConfig::Mock(plan) => Ok(Box::new(MockChannel::new(plan.clone()))),
    }
}
