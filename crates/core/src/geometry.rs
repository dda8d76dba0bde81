//! Points and axis-aligned bounding boxes in grid units.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box. `y` grows downwards, matching matrix rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w * 0.5
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h * 0.5
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Shrink each side by `dx` horizontally and `dy` vertically.
    pub fn inset(&self, dx: f32, dy: f32) -> Aabb {
        Aabb {
            x: self.x + dx,
            y: self.y + dy,
            w: (self.w - 2.0 * dx).max(0.0),
            h: (self.h - 2.0 * dy).max(0.0),
        }
    }

    /// Inclusive tile range `(x0, y0, x1, y1)` this box overlaps.
    ///
    /// Empty when `x1 < x0` or `y1 < y0`.
    pub fn tile_span(&self) -> (i32, i32, i32, i32) {
        let x0 = self.x.floor() as i32;
        let y0 = self.y.floor() as i32;
        let x1 = self.right().ceil() as i32 - 1;
        let y1 = self.bottom().ceil() as i32 - 1;
        (x0, y0, x1, y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 1.0, 1.0);
        let b = Aabb::new(1.0, 0.0, 1.0, 1.0);
        assert!(!a.overlaps(&b));
        let c = Aabb::new(0.5, 0.5, 1.0, 1.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn tile_span_excludes_touching_tiles() {
        let a = Aabb::new(2.0, 3.0, 2.0, 2.0);
        assert_eq!(a.tile_span(), (2, 3, 3, 4));
        let b = Aabb::new(2.5, 3.0, 2.0, 2.0);
        assert_eq!(b.tile_span(), (2, 3, 4, 4));
    }

    #[test]
    fn inset_never_goes_negative() {
        let a = Aabb::new(0.0, 0.0, 0.1, 1.0).inset(0.2, 0.0);
        assert_eq!(a.w, 0.0);
    }
}
