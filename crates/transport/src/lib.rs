//! Serial frame transport.
//!
//! Serializes [`FrameBuffer`]s into the LED matrix wire format and streams them
//! to a serial device from a background worker.
//!
//! # Wire format
//!
//! | Field | Size | Value |
//! |-------|------|-------|
//! | Header | 2 bytes | `0xFF 0xFE` |
//! | Payload | `3·H·W` bytes | row-major RGB, top to bottom, left to right |
//! | Footer | 2 bytes | `0xFD 0xFC` |
//!
//! At 36×28 a frame is 3028 bytes. The default link is 115200 baud, 8N1.
//!
//! # Delivery
//!
//! - At most one write in flight; frames arriving meanwhile are dropped
//! - Single write failures are counted and the frame is dropped
//! - `failure_threshold` consecutive failures escalate once per streak
//!
//! [`FrameBuffer`]: crate::types::FrameBuffer

pub mod channel;
pub mod codec;
pub mod error;
pub mod stats;
pub mod worker;

pub use matrix_platformer_types as types;

pub use channel::{
    list_ports, open_channel, ChannelConfig, FaultPlan, FrameChannel, MockChannel, MockHandle,
    SerialChannel, SerialSettings,
};
pub use codec::{decode, encode, encode_into, FrameDecoder, FrameError};
pub use error::TransportError;
pub use stats::{RateMeter, TransportStats};
pub use worker::{SendOutcome, Transport, TransportConfig, TransportEvent};
