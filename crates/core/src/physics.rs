//! Kinematics and tile collision.
//!
//! Movement is resolved one axis at a time, vertical first, then horizontal.
//! Each axis is swept in sub-steps of at most [`MAX_SUBSTEP`] units so a slow
//! tick cannot tunnel through one-tile geometry.

use crate::config::PhysicsConfig;
use crate::geometry::{Aabb, Vec2};
use crate::level::Level;

/// Longest distance moved along one axis before re-testing collisions.
pub const MAX_SUBSTEP: f32 = 0.5;

/// Edge tolerance so boxes resting flush against a tile do not register
/// contact on the perpendicular axis.
pub const SKIN: f32 = 1e-3;

/// Position, size and velocity of anything that moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            vel: Vec2::ZERO,
            on_ground: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

/// What a body touched during one [`move_and_collide`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contacts {
    /// Landed on solid geometry
    pub ground: bool,
    /// Hit geometry above
    pub ceiling: bool,
    /// Hit geometry left or right
    pub wall: bool,
    /// Tile struck from below, if any
    pub bumped: Option<(i32, i32)>,
}

pub fn apply_gravity(body: &mut Body, cfg: &PhysicsConfig, dt: f32) {
    body.vel.y = (body.vel.y + cfg.gravity * dt).min(cfg.max_fall_speed);
}

/// Move by `vel * dt`, resolving vertical penetration first, then horizontal.
///
/// Non-solid bodies integrate freely.
pub fn move_and_collide(body: &mut Body, level: &Level, dt: f32, solid: bool) -> Contacts {
    let mut contacts = Contacts::default();
    let dy = body.vel.y * dt;
    let dx = body.vel.x * dt;

    if !solid {
        body.pos.y += dy;
        body.pos.x += dx;
        return contacts;
    }

    sweep_vertical(body, level, dy, &mut contacts);
    sweep_horizontal(body, level, dx, &mut contacts);
    contacts
}

/// Whether solid geometry sits directly beneath the body.
pub fn probe_ground(body: &Body, level: &Level) -> bool {
    let aabb = body.aabb();
    let feet = Aabb::new(aabb.x, aabb.bottom(), aabb.w, 2.0 * SKIN).inset(SKIN, 0.0);
    overlaps_solid(level, &feet)
}

/// Whether any tile touched by `aabb` is solid.
pub fn overlaps_solid(level: &Level, aabb: &Aabb) -> bool {
    let (x0, y0, x1, y1) = aabb.tile_span();
    (y0..=y1).any(|ty| (x0..=x1).any(|tx| level.is_solid(tx, ty)))
}

fn substeps(delta: f32) -> (u32, f32) {
    let steps = (delta.abs() / MAX_SUBSTEP).ceil().max(1.0) as u32;
    (steps, delta / steps as f32)
}

fn sweep_vertical(body: &mut Body, level: &Level, dy: f32, contacts: &mut Contacts) {
    if dy == 0.0 {
        return;
    }
    let (steps, inc) = substeps(dy);

    for _ in 0..steps {
        let before = body.aabb();
        body.pos.y += inc;
        let probe = body.aabb().inset(SKIN, 0.0);
        let (x0, y0, x1, y1) = probe.tile_span();
        let center = before.center_x();

        // Only tiles entered during this sub-step count; tiles already
        // overlapped beforehand are ignored.
        let mut hit: Option<(i32, i32)> = None;
        for ty in y0..=y1 {
            let entered = if inc > 0.0 {
                ty as f32 >= before.bottom() - SKIN
            } else {
                (ty + 1) as f32 <= before.y + SKIN
            };
            if !entered {
                continue;
            }
            for tx in x0..=x1 {
                if !level.is_solid(tx, ty) {
                    continue;
                }
                hit = match hit {
                    None => Some((tx, ty)),
                    Some((hx, hy)) => {
                        let closer_row = if inc > 0.0 { ty < hy } else { ty > hy };
                        let same_row_closer = ty == hy
                            && (tx as f32 + 0.5 - center).abs() < (hx as f32 + 0.5 - center).abs();
                        if closer_row || same_row_closer {
                            Some((tx, ty))
                        } else {
                            Some((hx, hy))
                        }
                    }
                };
            }
        }

        if let Some((tx, ty)) = hit {
            if inc > 0.0 {
                body.pos.y = ty as f32 - body.size.y;
                contacts.ground = true;
            } else {
                body.pos.y = (ty + 1) as f32;
                contacts.ceiling = true;
                contacts.bumped = Some((tx, ty));
            }
            body.vel.y = 0.0;
            return;
        }
    }
}

fn sweep_horizontal(body: &mut Body, level: &Level, dx: f32, contacts: &mut Contacts) {
    if dx == 0.0 {
        return;
    }
    let (steps, inc) = substeps(dx);

    for _ in 0..steps {
        let before = body.aabb();
        body.pos.x += inc;
        let probe = body.aabb().inset(0.0, SKIN);
        let (x0, y0, x1, y1) = probe.tile_span();

        let mut hit: Option<i32> = None;
        for tx in x0..=x1 {
            let entered = if inc > 0.0 {
                tx as f32 >= before.right() - SKIN
            } else {
                (tx + 1) as f32 <= before.x + SKIN
            };
            if !entered || !(y0..=y1).any(|ty| level.is_solid(tx, ty)) {
                continue;
            }
            hit = match hit {
                Some(h) if (inc > 0.0 && h <= tx) || (inc < 0.0 && h >= tx) => Some(h),
                _ => Some(tx),
            };
        }

        if let Some(tx) = hit {
            body.pos.x = if inc > 0.0 {
                tx as f32 - body.size.x
            } else {
                (tx + 1) as f32
            };
            body.vel.x = 0.0;
            contacts.wall = true;
            return;
        }
    }
}
