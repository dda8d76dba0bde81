//! The world: level, player, entities, camera and the per-tick update.
//!
//! One call to [`World::advance`] runs, in order:
//!
//! 1. player intent (run, friction, jump, attack), gravity and tile collision
//! 2. entity behavior and tile collision
//! 3. enemy/enemy contacts
//! 4. player/entity contacts, in entity creation order
//! 5. fireball/enemy contacts
//! 6. checkpoint, goal and pit checks
//! 7. removal of inactive entities and the camera update
//!
//! While the player is `Dying` only the dying timer and the camera run. A world
//! whose outcome is `Won` or `Lost` is frozen until [`World::restart`].

use tracing::{debug, info};

use crate::config::PhysicsConfig;
use crate::entity::{Entity, EntityId};
use crate::geometry::Aabb;
use crate::level::{Level, Tile};
use crate::physics::{apply_gravity, move_and_collide, overlaps_solid, probe_ground};
use crate::player::{HitOutcome, Player};
use crate::snapshot::WorldSummary;
use crate::types::{Command, EntityKind, Facing, Outcome, PlayerState, MATRIX_WIDTH};

pub const COIN_SCORE: u32 = 100;
pub const POWER_UP_SCORE: u32 = 1000;
pub const STOMP_SCORE: u32 = 200;
pub const FIREBALL_SCORE: u32 = 200;
pub const BRICK_SCORE: u32 = 50;

/// Live fireballs allowed at once.
pub const MAX_FIREBALLS: usize = 2;

/// How far below an enemy's top edge the player's feet may have been at the
/// start of the tick and still count as landing on it.
pub const STOMP_SLACK: f32 = 0.5;

/// Something that happened during a tick. Drained by the orchestrator for
/// logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    CoinCollected,
    PoweredUp(PlayerState),
    EnemyStomped(EntityId),
    EnemyBurned(EntityId),
    BrickBroken { x: i32, y: i32 },
    PlayerHit(HitOutcome),
    FellIntoPit,
    CheckpointReached { x: f32 },
    Respawned { lives: u32 },
    Won,
    Lost,
}

#[derive(Debug, Clone)]
pub struct World {
    /// Pristine copy used by [`World::restart`]
    initial: Level,
    level: Level,
    cfg: PhysicsConfig,
    player: Player,
    entities: Vec<Entity>,
    next_id: u32,
    camera_x: f32,
    viewport_width: u16,
    respawn: (f32, f32),
    tick: u64,
    outcome: Outcome,
    events: Vec<WorldEvent>,
}

impl World {
    pub fn new(level: Level, cfg: PhysicsConfig) -> Self {
        let (px, py) = level.player_spawn();
        let mut world = Self {
            initial: level.clone(),
            level,
            cfg,
            player: Player::new(px, py),
            entities: Vec::new(),
            next_id: 0,
            camera_x: 0.0,
            viewport_width: MATRIX_WIDTH,
            respawn: (px, py),
            tick: 0,
            outcome: Outcome::Playing,
            events: Vec::new(),
        };
        world.populate();
        world
    }

    pub fn with_default_level(cfg: PhysicsConfig) -> Self {
        Self::new(Level::default_level(), cfg)
    }

    /// Use a viewport other than the matrix width for camera clamping.
    pub fn with_viewport(mut self, width: u16) -> Self {
        self.viewport_width = width.max(1);
        self.snap_camera();
        self
    }

    fn populate(&mut self) {
        let spawns = self.level.spawns().to_vec();
        for s in spawns {
            self.spawn(s.kind, s.x, s.y);
        }
        self.player.body.on_ground = probe_ground(&self.player.body, &self.level);
        self.snap_camera();
    }

    /// Reload the level from scratch. This is the only way out of `Dead`.
    pub fn restart(&mut self) {
        let viewport = self.viewport_width;
        *self = Self::new(self.initial.clone(), self.cfg);
        self.viewport_width = viewport;
        self.snap_camera();
        info!("world restarted");
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.cfg
    }

    /// Swap physics tunables between ticks. The caller validates them.
    pub fn set_config(&mut self, cfg: PhysicsConfig) {
        self.cfg = cfg;
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Active entities in creation order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }

    /// Place the camera directly, clamped to the level.
    pub fn set_camera_x(&mut self, x: f32) {
        self.camera_x = x.clamp(0.0, self.max_camera_x());
    }

    pub fn viewport_width(&self) -> u16 {
        self.viewport_width
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn respawn_point(&self) -> (f32, f32) {
        self.respawn
    }

    /// Add an entity. Ids are handed out in creation order.
    pub fn spawn(&mut self, kind: EntityKind, x: f32, y: f32) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity::spawn(id, kind, x, y, &self.cfg));
        id
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, WorldEvent> {
        self.events.drain(..)
    }

    pub fn summary(&self) -> WorldSummary {
        WorldSummary {
            tick: self.tick,
            score: self.player.score(),
            lives: self.player.lives(),
            player_state: self.player.state(),
            outcome: self.outcome,
            player_x: self.player.body.pos.x,
            player_y: self.player.body.pos.y,
            camera_x: self.camera_x,
            invincible: self.player.is_invincible(),
            entities: self.entities.len(),
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Non-positive or non-finite `dt` is ignored; anything above
    /// `max_step` is clamped. `Pause`, `Quit` and `None` are ignored here.
    pub fn advance(&mut self, dt: f32, commands: &[Command]) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if self.outcome != Outcome::Playing {
            return;
        }
        let dt = dt.min(self.cfg.max_step);
        self.tick += 1;

        match self.player.state() {
            PlayerState::Dead => return,
            PlayerState::Dying => {
                if self.player.tick_dying(dt) {
                    self.finish_dying();
                }
                self.update_camera(dt);
                return;
            }
            _ => {}
        }

        self.player.tick_timers(dt);
        let (falling, prev_bottom) = self.step_player(dt, commands);
        self.step_entities(dt);
        self.resolve_enemy_contacts();
        self.resolve_player_contacts(falling, prev_bottom);
        self.resolve_fireballs();
        self.check_progress();

        self.entities.retain(|e| e.active);
        self.update_camera(dt);
    }

    /// Returns whether the player was moving downward and where its feet were
    /// before moving.
    fn step_player(&mut self, dt: f32, commands: &[Command]) -> (bool, f32) {
        let (mut left, mut right, mut jump, mut attack) = (false, false, false, false);
        for cmd in commands {
            match cmd {
                Command::MoveLeft => left = true,
                Command::MoveRight => right = true,
                Command::Jump => jump = true,
                Command::Attack => attack = true,
                Command::Pause | Command::Quit | Command::None => {}
            }
        }

        let cfg = self.cfg;
        let body = &mut self.player.body;
        match (left, right) {
            (true, false) => {
                body.vel.x = -cfg.run_speed;
                self.player.set_facing(Facing::Left);
            }
            (false, true) => {
                body.vel.x = cfg.run_speed;
                self.player.set_facing(Facing::Right);
            }
            _ => {
                let decel = cfg.friction * dt;
                body.vel.x = if body.vel.x.abs() <= decel {
                    0.0
                } else {
                    body.vel.x - decel * body.vel.x.signum()
                };
            }
        }

        let body = &mut self.player.body;
        if jump && body.on_ground {
            body.vel.y = -cfg.jump_power;
            body.on_ground = false;
        }

        if attack {
            self.throw_fireball();
        }

        let body = &mut self.player.body;
        apply_gravity(body, &cfg, dt);
        let falling = body.vel.y > 0.0;
        let prev_bottom = body.aabb().bottom();

        let contacts = move_and_collide(body, &self.level, dt, true);
        body.on_ground = contacts.ground;

        let max_x = (self.level.width() as f32 - body.size.x).max(0.0);
        if body.pos.x < 0.0 || body.pos.x > max_x {
            body.pos.x = body.pos.x.clamp(0.0, max_x);
            body.vel.x = 0.0;
        }
        if body.pos.y < 0.0 {
            body.pos.y = 0.0;
            body.vel.y = body.vel.y.max(0.0);
        }

        if let Some((tx, ty)) = contacts.bumped {
            if self.player.state().is_powered() && self.level.tile(tx, ty) == Tile::Brick {
                self.level.set_tile(tx, ty, Tile::Empty);
                self.player.add_score(BRICK_SCORE);
                self.events.push(WorldEvent::BrickBroken { x: tx, y: ty });
            }
        }

        (falling, prev_bottom)
    }

    fn throw_fireball(&mut self) {
        if !self.player.can_attack() {
            return;
        }
        let live = self
            .entities
            .iter()
            .filter(|e| e.active && e.kind == EntityKind::Fireball)
            .count();
        if live >= MAX_FIREBALLS {
            return;
        }

        let pb = self.player.body.aabb();
        let facing = self.player.facing();
        let x = match facing {
            Facing::Right => pb.right(),
            Facing::Left => pb.x - 1.0,
        };
        let y = pb.y + 0.5;
        if overlaps_solid(&self.level, &Aabb::new(x, y, 1.0, 1.0)) {
            return;
        }

        let id = self.spawn(EntityKind::Fireball, x, y);
        if let Some(fireball) = self.entities.last_mut() {
            fireball.facing = facing;
        }
        self.player.start_attack_cooldown(&self.cfg);
        debug!(id = id.0, "fireball thrown");
    }

    fn step_entities(&mut self, dt: f32) {
        let player_x = self.player.body.aabb().center_x();
        for e in self.entities.iter_mut().filter(|e| e.active) {
            e.think(player_x, &self.cfg, dt);
            e.step(&self.level, &self.cfg, dt);
        }
    }

    fn resolve_enemy_contacts(&mut self) {
        for i in 0..self.entities.len() {
            let (head, tail) = self.entities.split_at_mut(i + 1);
            let a = &mut head[i];
            if !a.active || !a.kind.is_enemy() {
                continue;
            }
            for b in tail.iter_mut() {
                if !b.active || !b.kind.is_enemy() || !a.aabb().overlaps(&b.aabb()) {
                    continue;
                }
                let a_left = a.aabb().center_x() <= b.aabb().center_x();
                a.on_enemy_contact(a_left);
                b.on_enemy_contact(!a_left);
            }
        }
    }

    /// Contacts are handled in creation order. The first damaging contact
    /// either grants invincibility or starts `Dying`, so later ones in the same
    /// tick are ignored.
    fn resolve_player_contacts(&mut self, falling: bool, prev_bottom: f32) {
        let player_box = self.player.body.aabb();
        for i in 0..self.entities.len() {
            if !self.player.state().is_alive() {
                break;
            }
            let e = &mut self.entities[i];
            if !e.active || !e.aabb().overlaps(&player_box) {
                continue;
            }
            match e.kind {
                EntityKind::Coin => {
                    e.active = false;
                    self.player.add_score(COIN_SCORE);
                    self.events.push(WorldEvent::CoinCollected);
                }
                EntityKind::Mushroom | EntityKind::FireFlower => {
                    e.active = false;
                    let changed = if e.kind == EntityKind::Mushroom {
                        self.player.power_up()
                    } else {
                        self.player.fire_flower()
                    };
                    self.player.add_score(POWER_UP_SCORE);
                    if changed {
                        self.events.push(WorldEvent::PoweredUp(self.player.state()));
                    }
                }
                EntityKind::Walker | EntityKind::Chaser => {
                    if falling && prev_bottom <= e.body.pos.y + STOMP_SLACK {
                        e.active = false;
                        self.player.add_score(STOMP_SCORE);
                        self.player.body.vel.y = -self.cfg.stomp_bounce;
                        self.events.push(WorldEvent::EnemyStomped(e.id));
                    } else {
                        let hit = self.player.take_hit(&self.cfg);
                        if hit != HitOutcome::Ignored {
                            debug!(?hit, enemy = e.id.0, "player hit");
                            self.events.push(WorldEvent::PlayerHit(hit));
                        }
                    }
                }
                EntityKind::Fireball => {}
            }
        }
    }

    fn resolve_fireballs(&mut self) {
        for i in 0..self.entities.len() {
            let fb = &self.entities[i];
            if !fb.active || fb.kind != EntityKind::Fireball {
                continue;
            }
            let fb_box = fb.aabb();
            let target = self
                .entities
                .iter()
                .position(|e| e.active && e.kind.is_enemy() && e.aabb().overlaps(&fb_box));
            if let Some(j) = target {
                self.entities[j].active = false;
                self.entities[i].active = false;
                self.player.add_score(FIREBALL_SCORE);
                self.events
                    .push(WorldEvent::EnemyBurned(self.entities[j].id));
            }
        }
    }

    fn check_progress(&mut self) {
        let pb = self.player.body.aabb();

        for &(cx, cy) in self.level.checkpoints() {
            if pb.x >= cx && cx > self.respawn.0 {
                self.respawn = (cx, cy);
                info!(x = cx, "checkpoint reached");
                self.events.push(WorldEvent::CheckpointReached { x: cx });
            }
        }

        if let Some(goal) = self.level.goal() {
            if self.player.state().is_alive() && pb.right() >= goal.x as f32 {
                self.outcome = Outcome::Won;
                info!(score = self.player.score(), "level complete");
                self.events.push(WorldEvent::Won);
                return;
            }
        }

        let height = self.level.height() as f32;
        if pb.bottom() > height {
            self.player.body.pos.y = height - pb.h;
            if self.player.state().is_alive() {
                self.player.kill(&self.cfg);
                self.events.push(WorldEvent::FellIntoPit);
            }
        }
    }

    fn finish_dying(&mut self) {
        match self.player.finish_dying(self.respawn, &self.cfg) {
            PlayerState::Dead => {
                self.outcome = Outcome::Lost;
                info!(score = self.player.score(), "game over");
                self.events.push(WorldEvent::Lost);
            }
            _ => {
                self.player.body.on_ground = probe_ground(&self.player.body, &self.level);
                let lives = self.player.lives();
                info!(lives, "player respawned");
                self.events.push(WorldEvent::Respawned { lives });
                self.snap_camera();
            }
        }
    }

    fn max_camera_x(&self) -> f32 {
        (self.level.width() as f32 - self.viewport_width as f32).max(0.0)
    }

    fn camera_target(&self) -> f32 {
        let target = self.player.body.pos.x - self.viewport_width as f32 / 3.0;
        target.clamp(0.0, self.max_camera_x())
    }

    fn snap_camera(&mut self) {
        self.camera_x = self.camera_target();
    }

    fn update_camera(&mut self, dt: f32) {
        let target = self.camera_target();
        let alpha = (self.cfg.camera_follow * dt).min(1.0);
        self.camera_x += (target - self.camera_x) * alpha;
        self.camera_x = self.camera_x.clamp(0.0, self.max_camera_x());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Goal;

    const DT: f32 = 1.0 / 30.0;

    /// 40x12 level with a 2-row floor and the player standing at x = 2.
    fn arena() -> Level {
        let mut level = Level::empty(40, 12);
        level.fill(0, 10, 40, 12, Tile::Ground);
        level.set_player_spawn(2.0, 8.0);
        level
    }

    fn world() -> World {
        World::new(arena(), PhysicsConfig::default())
    }

    #[test]
    fn jump_from_ground_goes_airborne() {
        let mut w = world();
        assert!(w.player().body.on_ground);
        w.advance(DT, &[Command::Jump]);
        assert!(!w.player().body.on_ground);
        assert!(w.player().body.vel.y < 0.0);
        assert!(w.player().body.pos.y < 8.0);
    }

    #[test]
    fn jump_needs_ground() {
        let mut w = world();
        w.advance(DT, &[Command::Jump]);
        let vy = w.player().body.vel.y;
        w.advance(DT, &[Command::Jump]);
        assert!(w.player().body.vel.y > vy);
    }

    #[test]
    fn super_player_touching_enemy_shrinks() {
        let mut w = world();
        w.player_mut().set_power(PlayerState::Super);
        let enemy = w.spawn(EntityKind::Walker, 2.5, 9.0);
        w.advance(DT, &[]);
        assert_eq!(w.player().state(), PlayerState::Small);
        assert!(w.player().invincible_timer() > 0.0);
        assert!(w.entity(enemy).is_some_and(|e| e.active));
    }

    #[test]
    fn only_first_contact_in_a_tick_hurts() {
        let mut w = world();
        w.player_mut().set_power(PlayerState::Super);
        w.spawn(EntityKind::Walker, 2.5, 9.0);
        w.spawn(EntityKind::Walker, 3.0, 9.0);
        w.advance(DT, &[]);
        assert_eq!(w.player().state(), PlayerState::Small);

        let mut w = world();
        w.spawn(EntityKind::Walker, 2.5, 9.0);
        w.spawn(EntityKind::Chaser, 3.0, 9.0);
        w.advance(DT, &[]);
        assert_eq!(w.player().state(), PlayerState::Dying);
        assert_eq!(w.player().lives(), 3);
    }

    #[test]
    fn falling_onto_enemy_stomps_it() {
        let mut w = world();
        w.player_mut().body.pos.y = 5.0;
        w.player_mut().body.on_ground = false;
        let enemy = w.spawn(EntityKind::Walker, 2.5, 9.0);
        for _ in 0..30 {
            w.advance(DT, &[]);
        }
        assert!(w.entity(enemy).is_none());
        assert_eq!(w.player().score(), STOMP_SCORE);
        assert_eq!(w.player().state(), PlayerState::Small);
        assert_eq!(w.player().lives(), 3);
    }

    #[test]
    fn pickups_score_and_power_up() {
        let mut w = world();
        w.spawn(EntityKind::Coin, 2.5, 8.5);
        w.advance(DT, &[]);
        assert_eq!(w.player().score(), COIN_SCORE);
        assert!(w.entities().is_empty());

        // A flower taken while small only grows the player.
        w.spawn(EntityKind::FireFlower, 2.5, 8.5);
        w.advance(DT, &[]);
        assert_eq!(w.player().state(), PlayerState::Super);
        w.spawn(EntityKind::FireFlower, 2.5, 8.5);
        w.advance(DT, &[]);
        assert_eq!(w.player().state(), PlayerState::Fire);
    }

    #[test]
    fn powered_player_breaks_bricks_small_player_bumps() {
        for (state, broken) in [(PlayerState::Super, true), (PlayerState::Small, false)] {
            let mut level = arena();
            level.set_tile(3, 5, Tile::Brick);
            let mut w = World::new(level, PhysicsConfig::default());
            w.player_mut().set_power(state);
            w.advance(DT, &[Command::Jump]);
            for _ in 0..15 {
                w.advance(DT, &[]);
            }
            assert_eq!(w.level().tile(3, 5) == Tile::Empty, broken, "{state:?}");
            let expected = if broken { BRICK_SCORE } else { 0 };
            assert_eq!(w.player().score(), expected);
        }
    }

    #[test]
    fn fire_player_burns_enemy() {
        let mut w = world();
        w.player_mut().set_power(PlayerState::Fire);
        let enemy = w.spawn(EntityKind::Walker, 8.0, 9.0);
        w.advance(DT, &[Command::Attack]);
        assert!(w
            .entities()
            .iter()
            .any(|e| e.kind == EntityKind::Fireball));
        for _ in 0..10 {
            w.advance(DT, &[]);
        }
        assert!(w.entity(enemy).is_none());
        assert_eq!(w.player().score(), FIREBALL_SCORE);
        assert_eq!(w.player().state(), PlayerState::Fire);
    }

    #[test]
    fn small_player_cannot_attack() {
        let mut w = world();
        w.advance(DT, &[Command::Attack]);
        assert!(w.entities().is_empty());
    }

    #[test]
    fn pit_costs_a_life_and_respawns() {
        let mut level = arena();
        level.fill(10, 10, 14, 12, Tile::Empty);
        let mut w = World::new(level, PhysicsConfig::default());
        w.player_mut().set_power(PlayerState::Fire);
        w.player_mut().body.pos.x = 11.0;

        let mut ticks = 0;
        while w.player().state() != PlayerState::Dying && ticks < 120 {
            w.advance(DT, &[]);
            ticks += 1;
        }
        assert_eq!(w.player().state(), PlayerState::Dying);
        assert!(w.player().body.aabb().bottom() <= 12.0);

        for _ in 0..40 {
            w.advance(1.0 / 15.0, &[]);
        }
        assert_eq!(w.player().state(), PlayerState::Small);
        assert_eq!(w.player().lives(), 2);
        assert_eq!(w.player().body.pos.x, 2.0);
    }

    #[test]
    fn last_life_loses_and_restart_recovers() {
        let mut w = world();
        let cfg = *w.config();
        for _ in 0..3 {
            w.player_mut().kill(&cfg);
            for _ in 0..20 {
                w.advance(1.0 / 15.0, &[]);
            }
        }
        assert_eq!(w.player().state(), PlayerState::Dead);
        assert_eq!(w.outcome(), Outcome::Lost);

        let tick = w.tick();
        w.advance(DT, &[Command::MoveRight]);
        assert_eq!(w.tick(), tick);
        assert_eq!(w.player().state(), PlayerState::Dead);

        w.restart();
        assert_eq!(w.outcome(), Outcome::Playing);
        assert_eq!(w.player().state(), PlayerState::Small);
        assert_eq!(w.player().lives(), 3);
        assert_eq!(w.tick(), 0);
    }

    #[test]
    fn reaching_goal_wins_and_freezes() {
        let mut level = arena();
        level.set_goal(Goal {
            x: 8,
            top: 2,
            bottom: 9,
        });
        let mut w = World::new(level, PhysicsConfig::default());
        for _ in 0..60 {
            w.advance(DT, &[Command::MoveRight]);
        }
        assert_eq!(w.outcome(), Outcome::Won);
        let x = w.player().body.pos.x;
        w.advance(DT, &[Command::MoveRight]);
        assert_eq!(w.player().body.pos.x, x);
    }

    #[test]
    fn checkpoint_moves_respawn_point() {
        let mut level = arena();
        level.add_checkpoint(6.0, 8.0);
        let mut w = World::new(level, PhysicsConfig::default());
        for _ in 0..30 {
            w.advance(DT, &[Command::MoveRight]);
        }
        assert_eq!(w.respawn_point(), (6.0, 8.0));
    }

    #[test]
    fn bad_dt_is_ignored_and_large_dt_is_clamped() {
        let mut w = world();
        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            w.advance(dt, &[Command::MoveRight]);
        }
        assert_eq!(w.tick(), 0);
        assert_eq!(w.player().body.pos.x, 2.0);

        let max_step = w.config().max_step;
        let run = w.config().run_speed;
        w.advance(10.0, &[Command::MoveRight]);
        assert_eq!(w.tick(), 1);
        assert!(w.player().body.pos.x <= 2.0 + run * max_step + 1e-4);
    }

    #[test]
    fn player_stays_inside_horizontal_bounds() {
        let mut w = world();
        for _ in 0..60 {
            w.advance(DT, &[Command::MoveLeft]);
        }
        assert_eq!(w.player().body.pos.x, 0.0);
        for _ in 0..200 {
            w.advance(DT, &[Command::MoveRight]);
        }
        assert_eq!(w.player().body.pos.x, 38.0);
    }

    #[test]
    fn friction_stops_the_player() {
        let mut w = world();
        w.advance(DT, &[Command::MoveRight]);
        for _ in 0..15 {
            w.advance(DT, &[]);
        }
        assert_eq!(w.player().body.vel.x, 0.0);
    }

    #[test]
    fn camera_follows_and_clamps() {
        let mut w = World::with_default_level(PhysicsConfig::default());
        assert_eq!(w.camera_x(), 0.0);
        w.player_mut().body.pos.x = 180.0;
        for _ in 0..120 {
            w.advance(DT, &[]);
        }
        let max = (w.level().width() - w.viewport_width()) as f32;
        assert!(w.camera_x() <= max);
        assert!(w.camera_x() > max - 1.0);
    }

    #[test]
    fn summary_reflects_state() {
        let mut w = world();
        w.spawn(EntityKind::Coin, 20.0, 5.0);
        w.advance(DT, &[]);
        let s = w.summary();
        assert_eq!(s.tick, 1);
        assert_eq!(s.lives, 3);
        assert_eq!(s.entities, 1);
        assert!(s.playable());
    }

    #[test]
    fn events_are_drained() {
        let mut w = world();
        w.spawn(EntityKind::Coin, 2.5, 8.5);
        w.advance(DT, &[]);
        let events: Vec<_> = w.drain_events().collect();
        assert_eq!(events, vec![WorldEvent::CoinCollected]);
        assert_eq!(w.drain_events().count(), 0);
    }
}
