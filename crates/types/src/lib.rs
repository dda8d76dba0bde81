//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types shared by the simulation, the
//! renderer, the serial transport and the tick orchestrator. Everything here is
//! plain data, usable from any layer without pulling in I/O.
//!
//! # Matrix Dimensions
//!
//! The reference LED panel is 36 columns by 28 rows:
//!
//! - **Width**: 36 columns (indexed 0-35)
//! - **Height**: 28 rows (indexed 0-27)
//!
//! # Wire Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_HEADER` | `FF FE` | First two bytes of every serial frame |
//! | `FRAME_FOOTER` | `FD FC` | Last two bytes of every serial frame |
//! | `FRAME_LEN` | 3028 | `4 + 3 * 36 * 28` |
//! | `DEFAULT_BAUD_RATE` | 115200 | 8N1 serial link |
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_FRAME_RATE_HZ` | 30 | Tick/transmit cadence |
//! | `MIN_FRAME_RATE_HZ` | 1 | Lowest accepted cadence |
//! | `MAX_FRAME_RATE_HZ` | 60 | Highest accepted cadence |
//! | `MAX_STEP_SECS` | 1/15 | Largest simulation step before clamping |
//!
//! # Examples
//!
//! ```
//! use matrix_platformer_types::{Command, frame_len, FRAME_LEN, MATRIX_HEIGHT, MATRIX_WIDTH};
//!
//! assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
//! assert_eq!(Command::from_code(99), None);
//!
//! assert_eq!(frame_len(MATRIX_WIDTH, MATRIX_HEIGHT), FRAME_LEN);
//! assert_eq!(FRAME_LEN, 3028);
//! ```

pub mod fb;

pub use fb::{FrameBuffer, Rgb};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Matrix width in pixels (36 columns)
pub const MATRIX_WIDTH: u16 = 36;

/// Matrix height in pixels (28 rows)
pub const MATRIX_HEIGHT: u16 = 28;

/// Serial frame header bytes.
pub const FRAME_HEADER: [u8; 2] = [0xFF, 0xFE];

/// Serial frame footer bytes.
pub const FRAME_FOOTER: [u8; 2] = [0xFD, 0xFC];

/// Header plus footer length in bytes.
pub const FRAME_OVERHEAD: usize = FRAME_HEADER.len() + FRAME_FOOTER.len();

/// Total serial frame length for a `width` x `height` buffer.
pub const fn frame_len(width: u16, height: u16) -> usize {
    FRAME_OVERHEAD + 3 * (width as usize) * (height as usize)
}

/// Serial frame length for the reference matrix (3028 bytes).
pub const FRAME_LEN: usize = frame_len(MATRIX_WIDTH, MATRIX_HEIGHT);

/// Default serial baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default serial device.
pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyUSB0";

/// Default tick cadence.
pub const DEFAULT_FRAME_RATE_HZ: u32 = 30;

/// Lowest accepted tick cadence.
pub const MIN_FRAME_RATE_HZ: u32 = 1;

/// Highest accepted tick cadence.
pub const MAX_FRAME_RATE_HZ: u32 = 60;

/// Largest simulation step; longer ticks are clamped to this.
pub const MAX_STEP_SECS: f32 = 1.0 / 15.0;

/// Consecutive transport failures before escalation.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// Starting lives for the player character.
pub const STARTING_LIVES: u32 = 3;

/// Maximum number of commands accepted per tick; extras are dropped.
pub const MAX_COMMANDS_PER_TICK: usize = 16;

/// Fixed-capacity batch of commands for a single tick.
pub type CommandBatch = ArrayVec<Command, MAX_COMMANDS_PER_TICK>;


/// Discrete commands delivered by the input collaborator.
///
/// `Pause` and `Quit` are consumed by the orchestrator; the simulation only
/// ever sees the remaining variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// Run left
    MoveLeft,
    /// Run right
    MoveRight,
    /// Jump (only when grounded)
    Jump,
    /// Throw a fireball (only in `Fire` state)
    Attack,
    /// Toggle pause
    Pause,
    /// Stop the loop
    Quit,
    /// No input this tick
    None,
}

impl Command {
    /// Parse command from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use matrix_platformer_types::Command;
    ///
    /// assert_eq!(Command::from_str("jump"), Some(Command::Jump));
    /// assert_eq!(Command::from_str("MOVERIGHT"), Some(Command::MoveRight));
    /// assert_eq!(Command::from_str("fly"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "jump" => Some(Command::Jump),
            "attack" => Some(Command::Attack),
            "pause" => Some(Command::Pause),
            "quit" => Some(Command::Quit),
            "none" => Some(Command::None),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::Jump => "jump",
            Command::Attack => "attack",
            Command::Pause => "pause",
            Command::Quit => "quit",
            Command::None => "none",
        }
    }

    /// Decode a raw command byte. Unknown codes yield `None` and are ignored
    /// by callers.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Command::None),
            1 => Some(Command::MoveLeft),
            2 => Some(Command::MoveRight),
            3 => Some(Command::Jump),
            4 => Some(Command::Attack),
            5 => Some(Command::Pause),
            6 => Some(Command::Quit),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Command::None => 0,
            Command::MoveLeft => 1,
            Command::MoveRight => 2,
            Command::Jump => 3,
            Command::Attack => 4,
            Command::Pause => 5,
            Command::Quit => 6,
        }
    }

    /// Orchestrator-level commands (never forwarded to the simulation).
    pub fn is_control(&self) -> bool {
        matches!(self, Command::Pause | Command::Quit)
    }
}

/// Decode a slice of raw command bytes, skipping unknown codes.
pub fn decode_commands(codes: &[u8]) -> CommandBatch {
    let mut out = CommandBatch::new();
    for cmd in codes.iter().filter_map(|&c| Command::from_code(c)) {
        if out.try_push(cmd).is_err() {
            break;
        }
    }
    out
}

/// Source of per-tick commands (keyboard, gamepad, script).
pub trait CommandSource {
    /// Append the commands that arrived since the last poll.
    fn poll_commands(&mut self, out: &mut CommandBatch);
}

/// Player character power/life state.
///
/// - **Small**: base form, one hit from dying
/// - **Super**: grown form after a mushroom
/// - **Fire**: can throw fireballs
/// - **Dying**: life lost, waiting to respawn
/// - **Dead**: out of lives (terminal until restart)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Small,
    Super,
    Fire,
    Dying,
    Dead,
}

impl PlayerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Small => "small",
            PlayerState::Super => "super",
            PlayerState::Fire => "fire",
            PlayerState::Dying => "dying",
            PlayerState::Dead => "dead",
        }
    }

    /// `Super` and `Fire` are the grown, damage-absorbing forms.
    pub fn is_powered(&self) -> bool {
        matches!(self, PlayerState::Super | PlayerState::Fire)
    }

    /// Whether the player is still taking part in the simulation.
    pub fn is_alive(&self) -> bool {
        matches!(
            self,
            PlayerState::Small | PlayerState::Super | PlayerState::Fire
        )
    }
}

/// Kinds of non-player dynamic entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Enemy walking back and forth between two x bounds
    Walker,
    /// Enemy that chases the player inside a detection radius
    Chaser,
    /// Collectible worth score
    Coin,
    /// Power-up: Small -> Super
    Mushroom,
    /// Power-up: Super -> Fire
    FireFlower,
    /// Player projectile
    Fireball,
}

impl EntityKind {
    pub fn is_enemy(&self) -> bool {
        matches!(self, EntityKind::Walker | EntityKind::Chaser)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Walker => "walker",
            EntityKind::Chaser => "chaser",
            EntityKind::Coin => "coin",
            EntityKind::Mushroom => "mushroom",
            EntityKind::FireFlower => "fire_flower",
            EntityKind::Fireball => "fireball",
        }
    }
}

/// Horizontal facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right.
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flip(&self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Win/lose status of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Playing,
    Won,
    Lost,
}
