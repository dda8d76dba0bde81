//! Core simulation - pure, deterministic, and testable
//!
//! This crate owns the game world and every rule that changes it. It has
//! **no dependencies** on rendering, transport or I/O:
//!
//! - **Deterministic**: the same level, config and command sequence always
//!   produce the same world
//! - **Testable**: every rule is reachable through [`World::advance`]
//! - **Bounded**: `dt` is clamped to `max_step`, and movement is sub-stepped
//!   so nothing tunnels through one-tile geometry
//!
//! # Module Structure
//!
//! - [`geometry`]: `Vec2` and axis-aligned boxes
//! - [`config`]: physics tunables and their validation
//! - [`level`]: tile grid, spawn list, the default level and the ASCII loader
//! - [`physics`]: gravity and axis-by-axis tile collision
//! - [`entity`]: enemies, pickups and fireballs with per-kind hooks
//! - [`player`]: the player state machine
//! - [`world`]: the per-tick update, interactions, camera and restart
//! - [`snapshot`]: serializable world summary
//!
//! # Rules
//!
//! - **Coins** are worth 100, power-ups 1000, stomps and fireball kills 200,
//!   broken bricks 50
//! - **Stomp**: landing on an enemy while falling removes it and bounces the
//!   player
//! - **Damage**: a powered player shrinks and becomes invincible; a small one
//!   loses a life
//! - **Pits** cost a life whatever the power state
//! - **Goal**: touching the goal column wins and freezes the world
//!
//! # Example
//!
//! ```
//! use matrix_platformer_core::{PhysicsConfig, World};
//! use matrix_platformer_types::{Command, PlayerState};
//!
//! let mut world = World::with_default_level(PhysicsConfig::default());
//! world.advance(1.0 / 30.0, &[Command::MoveRight]);
//!
//! assert_eq!(world.tick(), 1);
//! assert_eq!(world.player().state(), PlayerState::Small);
//! ```

pub mod config;
pub mod entity;
pub mod geometry;
pub mod level;
pub mod physics;
pub mod player;
pub mod snapshot;
pub mod world;

pub use matrix_platformer_types as types;

// Re-export commonly used types for convenience
pub use config::{PhysicsConfig, PhysicsError};
pub use entity::{Behavior, Entity, EntityId};
pub use geometry::{Aabb, Vec2};
pub use level::{Goal, Level, LevelError, Tile};
pub use physics::Body;
pub use player::{HitOutcome, Player};
pub use snapshot::WorldSummary;
pub use world::{World, WorldEvent};
