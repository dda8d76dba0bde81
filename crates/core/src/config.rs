//! Physics tunables for the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MAX_STEP_SECS;

/// Upper bound accepted for `max_step`.
pub const MAX_STEP_LIMIT: f32 = 0.25;

/// Physics and gameplay tunables, in grid units and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Horizontal run speed (units/s)
    pub run_speed: f32,
    /// Initial upward velocity of a jump (units/s)
    pub jump_power: f32,
    /// Downward acceleration while airborne (units/s²)
    pub gravity: f32,
    /// Horizontal deceleration with no move command (units/s²)
    pub friction: f32,
    /// Terminal fall velocity (units/s)
    pub max_fall_speed: f32,
    /// Largest simulated step; longer ticks are clamped (s)
    pub max_step: f32,
    /// Walker and mushroom speed (units/s)
    pub enemy_speed: f32,
    /// Chaser speed while the player is in range (units/s)
    pub chase_speed: f32,
    /// Chaser detection radius (units)
    pub chase_radius: f32,
    /// Fireball horizontal speed (units/s)
    pub fireball_speed: f32,
    /// Fireball lifetime (s)
    pub fireball_ttl: f32,
    /// Minimum time between two fireballs (s)
    pub attack_cooldown: f32,
    /// Invincibility after damage or respawn (s)
    pub invincibility_secs: f32,
    /// Time spent in `Dying` before respawn (s)
    pub dying_secs: f32,
    /// Upward velocity after stomping an enemy (units/s)
    pub stomp_bounce: f32,
    /// Camera smoothing rate (1/s)
    pub camera_follow: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            run_speed: 12.0,
            jump_power: 22.0,
            gravity: 55.0,
            friction: 60.0,
            max_fall_speed: 30.0,
            max_step: MAX_STEP_SECS,
            enemy_speed: 3.0,
            chase_speed: 5.0,
            chase_radius: 10.0,
            fireball_speed: 20.0,
            fireball_ttl: 1.5,
            attack_cooldown: 0.3,
            invincibility_secs: 2.0,
            dying_secs: 1.0,
            stomp_bounce: 11.0,
            camera_follow: 6.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PhysicsError {
    #[error("physics value `{0}` must be positive and finite")]
    NonPositive(&'static str),
    #[error("max_step {0} must be in (0, 0.25]")]
    MaxStepOutOfRange(f32),
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let positive = [
            ("run_speed", self.run_speed),
            ("jump_power", self.jump_power),
            ("gravity", self.gravity),
            ("friction", self.friction),
            ("max_fall_speed", self.max_fall_speed),
            ("enemy_speed", self.enemy_speed),
            ("chase_speed", self.chase_speed),
            ("chase_radius", self.chase_radius),
            ("fireball_speed", self.fireball_speed),
            ("fireball_ttl", self.fireball_ttl),
            ("attack_cooldown", self.attack_cooldown),
            ("invincibility_secs", self.invincibility_secs),
            ("dying_secs", self.dying_secs),
            ("stomp_bounce", self.stomp_bounce),
            ("camera_follow", self.camera_follow),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhysicsError::NonPositive(name));
            }
        }
        if !(self.max_step > 0.0 && self.max_step <= MAX_STEP_LIMIT) {
            return Err(PhysicsError::MaxStepOutOfRange(self.max_step));
        }
        Ok(())
    }
}
