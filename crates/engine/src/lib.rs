//! Tick orchestration for the matrix platformer.
//!
//! Each tick drains input, advances the [`World`](crate::core::World),
//! renders a frame and hands it to the serial [`Transport`](crate::transport::Transport)
//! without waiting for the write. Configuration comes from the environment
//! or a JSON file and can be changed between ticks.

pub mod config;
pub mod orchestrator;
pub mod script;

pub use matrix_platformer_core as core;
pub use matrix_platformer_render as render;
pub use matrix_platformer_transport as transport;
pub use matrix_platformer_types as types;

pub use config::{Config, ConfigError, FailurePolicy};
pub use orchestrator::{
    DebugSnapshot, EngineError, Orchestrator, Reconfigure, RunState, StopReason,
};
pub use script::ScriptedInput;
