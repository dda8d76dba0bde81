//! Frame renderer.
//!
//! Turns simulation state into the fixed-size RGB [`FrameBuffer`] that both
//! the serial transport and the terminal preview consume. Rendering is a pure
//! function of the world plus two toggles (HUD and debug overlay).
//!
//! [`FrameBuffer`]: crate::types::FrameBuffer

pub mod hud;
pub mod palette;
pub mod pattern;
pub mod renderer;

pub use matrix_platformer_core as core;
pub use matrix_platformer_types as types;

pub use palette::{Palette, PaletteOverrides, PaletteSlot};
pub use pattern::rainbow;
pub use renderer::{RenderOptions, Renderer};
