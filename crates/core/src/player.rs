//! The player character and its power/life state machine.
//!
//! ```text
//! Small --mushroom--> Super --flower--> Fire
//! Super|Fire --hit--> Small              (invincibility set)
//! Small --hit--> Dying --timer--> Small  (life lost, respawn)
//!                      \--------> Dead   (last life)
//! ```
//!
//! A flower picked up while `Small` only grows the player to `Super`; there is
//! no direct `Small -> Fire` edge. `Dead` is only left through a world restart.

use crate::config::PhysicsConfig;
use crate::physics::Body;
use crate::types::{Facing, PlayerState, STARTING_LIVES};

pub const PLAYER_WIDTH: f32 = 2.0;
pub const PLAYER_HEIGHT: f32 = 2.0;

/// Result of an enemy touching the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invincible, dying or dead: nothing happened
    Ignored,
    /// Powered form lost, back to `Small`
    Demoted,
    /// `Small` player lost a life
    Dying,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    state: PlayerState,
    lives: u32,
    score: u32,
    invincible_timer: f32,
    dying_timer: f32,
    attack_cooldown: f32,
    facing: Facing,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            state: PlayerState::Small,
            lives: STARTING_LIVES,
            score: 0,
            invincible_timer: 0.0,
            dying_timer: 0.0,
            attack_cooldown: 0.0,
            facing: Facing::Right,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }

    /// Seconds of invincibility left.
    pub fn invincible_timer(&self) -> f32 {
        self.invincible_timer
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Force a powered state. Test and debug helper; gameplay goes through
    /// [`Player::power_up`] and [`Player::fire_flower`].
    pub fn set_power(&mut self, state: PlayerState) {
        if state.is_alive() {
            self.state = state;
        }
    }

    pub fn set_invincible(&mut self, secs: f32) {
        self.invincible_timer = secs.max(0.0);
    }

    /// Mushroom pickup. Returns `true` when the state changed.
    pub fn power_up(&mut self) -> bool {
        if self.state == PlayerState::Small {
            self.state = PlayerState::Super;
            return true;
        }
        false
    }

    /// Flower pickup. `Small` only reaches `Super`; `Super` becomes `Fire`.
    pub fn fire_flower(&mut self) -> bool {
        match self.state {
            PlayerState::Small => {
                self.state = PlayerState::Super;
                true
            }
            PlayerState::Super => {
                self.state = PlayerState::Fire;
                true
            }
            _ => false,
        }
    }

    /// Enemy contact.
    pub fn take_hit(&mut self, cfg: &PhysicsConfig) -> HitOutcome {
        if self.is_invincible() || !self.state.is_alive() {
            return HitOutcome::Ignored;
        }
        if self.state.is_powered() {
            self.state = PlayerState::Small;
            self.invincible_timer = cfg.invincibility_secs;
            return HitOutcome::Demoted;
        }
        self.start_dying(cfg);
        HitOutcome::Dying
    }

    /// Unconditional life loss (falling into a pit). Ignores invincibility
    /// and power state.
    pub fn kill(&mut self, cfg: &PhysicsConfig) {
        if self.state.is_alive() {
            self.start_dying(cfg);
        }
    }

    fn start_dying(&mut self, cfg: &PhysicsConfig) {
        self.state = PlayerState::Dying;
        self.dying_timer = cfg.dying_secs;
        self.invincible_timer = 0.0;
        self.body.vel.x = 0.0;
        self.body.vel.y = 0.0;
    }

    /// Count down invincibility and the attack cooldown.
    pub fn tick_timers(&mut self, dt: f32) {
        self.invincible_timer = (self.invincible_timer - dt).max(0.0);
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
    }

    /// Advance the dying animation. Returns `true` once it has finished.
    pub fn tick_dying(&mut self, dt: f32) -> bool {
        if self.state != PlayerState::Dying {
            return false;
        }
        self.dying_timer -= dt;
        self.dying_timer <= 0.0
    }

    /// Spend a life. Respawns at `at` as `Small` with invincibility, or ends
    /// in `Dead` when no lives remain.
    pub fn finish_dying(&mut self, at: (f32, f32), cfg: &PhysicsConfig) -> PlayerState {
        if self.state != PlayerState::Dying {
            return self.state;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.state = PlayerState::Dead;
            return self.state;
        }
        self.state = PlayerState::Small;
        self.body = Body::new(at.0, at.1, PLAYER_WIDTH, PLAYER_HEIGHT);
        self.invincible_timer = cfg.invincibility_secs;
        self.facing = Facing::Right;
        self.state
    }

    pub fn can_attack(&self) -> bool {
        self.state == PlayerState::Fire && self.attack_cooldown <= 0.0
    }

    pub fn start_attack_cooldown(&mut self, cfg: &PhysicsConfig) {
        self.attack_cooldown = cfg.attack_cooldown;
    }
}
