//! Serial frame codec.
//!
//! ```text
//! FF FE | r g b r g b ... (row-major, top-left first) | FD FC
//! ```
//!
//! There is no escaping. A receiver finds frame boundaries from the fixed
//! length alone, so the payload may contain header or footer bytes.

use thiserror::Error;

use crate::types::{frame_len, FrameBuffer, Rgb, FRAME_FOOTER, FRAME_HEADER};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame is {actual} bytes, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
    #[error("bad frame header {0:02X?}")]
    BadHeader([u8; 2]),
    #[error("bad frame footer {0:02X?}")]
    BadFooter([u8; 2]),
}

/// Encode `fb` into `out`, replacing its contents.
pub fn encode_into(fb: &FrameBuffer, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(frame_len(fb.width(), fb.height()));
    out.extend_from_slice(&FRAME_HEADER);
    for px in fb.pixels() {
        out.extend_from_slice(&px.to_array());
    }
    out.extend_from_slice(&FRAME_FOOTER);
}

pub fn encode(fb: &FrameBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(frame_len(fb.width(), fb.height()));
    encode_into(fb, &mut out);
    out
}

/// Decode one complete frame of the given dimensions.
pub fn decode(bytes: &[u8], width: u16, height: u16) -> Result<FrameBuffer, FrameError> {
    let expected = frame_len(width, height);
    if bytes.len() != expected {
        return Err(FrameError::WrongLength {
            expected,
            actual: bytes.len(),
        });
    }
    let header = [bytes[0], bytes[1]];
    if header != FRAME_HEADER {
        return Err(FrameError::BadHeader(header));
    }
    let footer = [bytes[expected - 2], bytes[expected - 1]];
    if footer != FRAME_FOOTER {
        return Err(FrameError::BadFooter(footer));
    }

    let mut fb = FrameBuffer::new(width, height);
    let payload = &bytes[FRAME_HEADER.len()..expected - FRAME_FOOTER.len()];
    for (i, px) in payload.chunks_exact(3).enumerate() {
        let x = (i % width as usize) as i32;
        let y = (i / width as usize) as i32;
        fb.set(x, y, Rgb::new(px[0], px[1], px[2]));
    }
    Ok(fb)
}

/// Recovers frames from a byte stream fed in arbitrary chunks.
///
/// A candidate frame starts at a header and is accepted when the footer sits
/// exactly `frame_len - 2` bytes later. Anything else is skipped one byte at a
/// time until the stream realigns.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    width: u16,
    height: u16,
    buf: Vec<u8>,
    skipped: u64,
}

impl FrameDecoder {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buf: Vec::with_capacity(2 * frame_len(width, height)),
            skipped: 0,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Bytes discarded while searching for frame boundaries.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Bytes buffered but not yet part of a decoded frame.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    pub fn next_frame(&mut self) -> Option<FrameBuffer> {
        let len = frame_len(self.width, self.height);
        loop {
            let Some(start) = self.buf.windows(2).position(|w| w == FRAME_HEADER) else {
                // Keep a trailing 0xFF: it may be the first half of a header.
                let keep = usize::from(self.buf.last() == Some(&FRAME_HEADER[0]));
                let drop = self.buf.len() - keep;
                self.skipped += drop as u64;
                self.buf.drain(..drop);
                return None;
            };
            if start > 0 {
                self.skipped += start as u64;
                self.buf.drain(..start);
            }
            if self.buf.len() < len {
                return None;
            }
            match decode(&self.buf[..len], self.width, self.height) {
                Ok(fb) => {
                    self.buf.drain(..len);
                    return Some(fb);
                }
                Err(_) => {
                    self.skipped += 1;
                    self.buf.drain(..1);
                }
            }
        }
    }
}
