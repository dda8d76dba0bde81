//! LED matrix platformer (workspace facade crate).
//!
//! Re-exports the member crates under short names so binaries, tests and
//! benches can use `matrix_platformer::{core, render, transport, engine, ...}`
//! while the implementation lives in dedicated crates under `crates/`.

pub mod logging;

pub use matrix_platformer_core as core;
pub use matrix_platformer_engine as engine;
pub use matrix_platformer_input as input;
pub use matrix_platformer_render as render;
pub use matrix_platformer_term as term;
pub use matrix_platformer_transport as transport;
pub use matrix_platformer_types as types;
