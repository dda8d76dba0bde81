//! Hardware test patterns.

use crate::types::{FrameBuffer, Rgb};

/// Red, orange, yellow, green, cyan, blue, purple.
pub const RAINBOW: [Rgb; 7] = [
    Rgb::new(255, 0, 0),
    Rgb::new(255, 165, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 255, 255),
    Rgb::new(0, 0, 255),
    Rgb::new(128, 0, 128),
];

/// Diagonal rainbow: pixel `(x, y)` takes color `(x + y) % 7`.
pub fn rainbow(width: u16, height: u16) -> FrameBuffer {
    let mut fb = FrameBuffer::new(width, height);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            fb.set(x, y, RAINBOW[((x + y) % RAINBOW.len() as i32) as usize]);
        }
    }
    fb
}
