//! Terminal preview of the LED matrix.
//!
//! Draws each pair of matrix rows as one line of `▀` cells: the foreground
//! color is the upper pixel and the background the lower one, so a 36×28
//! matrix fits in 36 columns by 14 lines. A status line sits underneath.
//!
//! The preview is a local mirror only. The frame shown is exactly the frame
//! handed to the transport.

pub mod preview;
pub mod status;

pub use matrix_platformer_engine as engine;
pub use matrix_platformer_types as types;

pub use preview::{cell_rows, encode_diff_into, encode_full_into, MatrixPreview, HALF_BLOCK};
pub use status::status_line;
