//! Non-player dynamic entities and their per-kind behavior hooks.
//!
//! Every entity carries an [`EntityKind`] tag and a [`Behavior`]. The two hooks
//! are [`Entity::think`] (pick a velocity for this tick) and
//! [`Entity::step`] (integrate, collide with tiles, react to walls/bounds).

use serde::Serialize;

use crate::config::PhysicsConfig;
use crate::geometry::Aabb;
use crate::level::Level;
use crate::physics::{apply_gravity, move_and_collide, Body};
use crate::types::{EntityKind, Facing};

/// Horizontal half-range of a walker's patrol around its spawn point.
pub const PATROL_HALF_RANGE: f32 = 6.0;

/// Stable identifier, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsFlags {
    /// Pulled down while airborne
    pub gravity: bool,
    /// Collides with level tiles
    pub solid: bool,
}

/// Deterministic movement rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Walk between `min_x` and `max_x`, turning at either end or at a wall.
    Patrol { min_x: f32, max_x: f32 },
    /// Move toward the player while within `radius`, otherwise stand still.
    Chase { radius: f32 },
    /// Walk forward, turning at walls.
    Wander,
    /// Never moves.
    Static,
    /// Fly straight until `ttl` runs out or something is hit.
    Projectile { ttl: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub body: Body,
    pub flags: PhysicsFlags,
    pub behavior: Behavior,
    pub facing: Facing,
    pub active: bool,
}

impl Entity {
    /// Build an entity of `kind` with its stock size, flags and behavior.
    pub fn spawn(id: EntityId, kind: EntityKind, x: f32, y: f32, cfg: &PhysicsConfig) -> Self {
        let (flags, behavior) = match kind {
            EntityKind::Walker => (
                PhysicsFlags {
                    gravity: true,
                    solid: true,
                },
                Behavior::Patrol {
                    min_x: x - PATROL_HALF_RANGE,
                    max_x: x + PATROL_HALF_RANGE,
                },
            ),
            EntityKind::Chaser => (
                PhysicsFlags {
                    gravity: true,
                    solid: true,
                },
                Behavior::Chase {
                    radius: cfg.chase_radius,
                },
            ),
            EntityKind::Mushroom => (
                PhysicsFlags {
                    gravity: true,
                    solid: true,
                },
                Behavior::Wander,
            ),
            EntityKind::Coin | EntityKind::FireFlower => (
                PhysicsFlags {
                    gravity: false,
                    solid: false,
                },
                Behavior::Static,
            ),
            EntityKind::Fireball => (
                PhysicsFlags {
                    gravity: false,
                    solid: true,
                },
                Behavior::Projectile {
                    ttl: cfg.fireball_ttl,
                },
            ),
        };
        let facing = match kind {
            EntityKind::Mushroom | EntityKind::Fireball => Facing::Right,
            _ => Facing::Left,
        };

        Self {
            id,
            kind,
            body: Body::new(x, y, 1.0, 1.0),
            flags,
            behavior,
            facing,
            active: true,
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    /// Behavior hook: choose this tick's horizontal velocity.
    pub fn think(&mut self, player_center_x: f32, cfg: &PhysicsConfig, dt: f32) {
        match &mut self.behavior {
            Behavior::Patrol { min_x, max_x } => {
                if self.body.pos.x <= *min_x {
                    self.facing = Facing::Right;
                } else if self.body.pos.x >= *max_x {
                    self.facing = Facing::Left;
                }
                self.body.vel.x = self.facing.sign() * cfg.enemy_speed;
            }
            Behavior::Chase { radius } => {
                let dx = player_center_x - self.body.aabb().center_x();
                if dx.abs() <= *radius && dx.abs() > 0.25 {
                    self.facing = if dx < 0.0 { Facing::Left } else { Facing::Right };
                    self.body.vel.x = self.facing.sign() * cfg.chase_speed;
                } else {
                    self.body.vel.x = 0.0;
                }
            }
            Behavior::Wander => {
                self.body.vel.x = self.facing.sign() * cfg.enemy_speed;
            }
            Behavior::Static => {
                self.body.vel.x = 0.0;
            }
            Behavior::Projectile { ttl } => {
                *ttl -= dt;
                if *ttl <= 0.0 {
                    self.active = false;
                }
                self.body.vel.x = self.facing.sign() * cfg.fireball_speed;
            }
        }
    }

    /// Physics hook: integrate, collide with tiles, then apply wall and
    /// level-bound reactions.
    pub fn step(&mut self, level: &Level, cfg: &PhysicsConfig, dt: f32) {
        if !self.active {
            return;
        }
        if self.flags.gravity {
            apply_gravity(&mut self.body, cfg, dt);
        }
        let contacts = move_and_collide(&mut self.body, level, dt, self.flags.solid);
        self.body.on_ground = contacts.ground;

        if contacts.wall {
            self.on_wall();
        }

        let max_x = level.width() as f32 - self.body.size.x;
        if self.body.pos.x < 0.0 || self.body.pos.x > max_x {
            if self.kind == EntityKind::Fireball {
                self.active = false;
            } else {
                self.body.pos.x = self.body.pos.x.clamp(0.0, max_x.max(0.0));
                self.on_wall();
            }
        }

        if self.body.pos.y > level.height() as f32 {
            self.active = false;
        }
    }

    /// Collision hook: touched a wall or the level edge.
    fn on_wall(&mut self) {
        match self.kind {
            EntityKind::Fireball => self.active = false,
            EntityKind::Walker | EntityKind::Chaser | EntityKind::Mushroom => {
                self.facing = self.facing.flip();
                self.body.vel.x = 0.0;
            }
            EntityKind::Coin | EntityKind::FireFlower => {}
        }
    }

    /// Collision hook: two enemies bumped into each other. `left_of_other`
    /// says which side this one is on; both turn away.
    pub fn on_enemy_contact(&mut self, left_of_other: bool) {
        if self.kind.is_enemy() {
            self.facing = if left_of_other {
                Facing::Left
            } else {
                Facing::Right
            };
        }
    }
}
