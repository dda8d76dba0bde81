//! Keyboard command source.
//!
//! Maps `crossterm` key events to [`Command`](crate::types::Command)s and
//! keeps movement keys "held" between ticks. Terminals that never report key
//! releases are handled by treating a key as released once its auto-repeat
//! stops arriving.

pub mod held;
pub mod keyboard;
pub mod map;

pub use matrix_platformer_types as types;

pub use held::{HeldKeys, DEFAULT_RELEASE_TIMEOUT};
pub use keyboard::KeyboardInput;
pub use map::{command_for_key, is_movement, should_quit};
