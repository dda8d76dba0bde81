//! Fixed-size RGB framebuffer shared by the renderer and the transport.

use serde::{Deserialize, Serialize};

/// 24-bit RGB color.
///
/// Serialized as a `[r, g, b]` array so palette overrides read naturally in
/// JSON config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(value: Rgb) -> Self {
        value.to_array()
    }
}

/// 2D grid of RGB pixels, row-major.
///
/// Dimensions are fixed at construction; there is no resize. Writes outside
/// the grid are clipped silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    pixels: Vec<Rgb>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Rgb::BLACK)
    }

    pub fn filled(width: u16, height: u16, color: Rgb) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![color; len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, Rgb> {
        self.pixels.chunks_exact(self.width.max(1) as usize)
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    /// Set one pixel. Returns `false` when the write was clipped.
    pub fn set(&mut self, x: i32, y: i32, color: Rgb) -> bool {
        match self.idx(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Fill a rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width as i32);
        let y1 = y.saturating_add(h).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set(px, py, color);
            }
        }
    }

    /// Draw a 1-pixel rectangle outline, clipped to the buffer.
    pub fn outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);
        for px in x..=right {
            self.set(px, y, color);
            self.set(px, bottom, color);
        }
        for py in y..=bottom {
            self.set(x, py, color);
            self.set(right, py, color);
        }
    }

    /// Copy pixels from a buffer of identical dimensions.
    ///
    /// Returns `false` (and copies nothing) on a size mismatch.
    pub fn copy_from(&mut self, other: &FrameBuffer) -> bool {
        if self.width != other.width || self.height != other.height {
            return false;
        }
        self.pixels.copy_from_slice(&other.pixels);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_writes_are_clipped() {
        let mut fb = FrameBuffer::new(4, 3);
        assert!(!fb.set(-1, 0, Rgb::WHITE));
        assert!(!fb.set(4, 0, Rgb::WHITE));
        assert!(!fb.set(0, 3, Rgb::WHITE));
        assert!(fb.set(3, 2, Rgb::WHITE));
        assert_eq!(fb.pixels().iter().filter(|&&p| p == Rgb::WHITE).count(), 1);
    }

    #[test]
    fn fill_rect_clips_partially_visible_rects() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill_rect(-2, -2, 4, 4, Rgb::WHITE);
        assert_eq!(fb.get(0, 0), Some(Rgb::WHITE));
        assert_eq!(fb.get(1, 1), Some(Rgb::WHITE));
        assert_eq!(fb.get(2, 2), Some(Rgb::BLACK));
        assert_eq!(fb.width(), 4);
        assert_eq!(fb.height(), 4);
    }

    #[test]
    fn outline_leaves_interior_untouched() {
        let mut fb = FrameBuffer::new(5, 5);
        fb.outline_rect(0, 0, 5, 5, Rgb::WHITE);
        assert_eq!(fb.get(0, 0), Some(Rgb::WHITE));
        assert_eq!(fb.get(4, 4), Some(Rgb::WHITE));
        assert_eq!(fb.get(2, 2), Some(Rgb::BLACK));
    }

    #[test]
    fn rows_are_row_major() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.set(2, 1, Rgb::new(1, 2, 3));
        let rows: Vec<_> = fb.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][2], Rgb::new(1, 2, 3));
    }

    #[test]
    fn copy_from_rejects_mismatched_sizes() {
        let mut a = FrameBuffer::new(2, 2);
        let b = FrameBuffer::filled(3, 2, Rgb::WHITE);
        assert!(!a.copy_from(&b));
        let c = FrameBuffer::filled(2, 2, Rgb::WHITE);
        assert!(a.copy_from(&c));
        assert_eq!(a, c);
    }
}
