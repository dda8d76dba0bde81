//! End-to-end acceptance scenarios across simulation, rendering and transport.

use std::time::Duration;

use matrix_platformer::core::{Level, PhysicsConfig, Tile, World};
use matrix_platformer::engine::{Config, Orchestrator, RunState};
use matrix_platformer::render::{Palette, PaletteSlot, RenderOptions, Renderer};
use matrix_platformer::transport::{
    FaultPlan, MockChannel, Transport, TransportConfig, TransportEvent,
};
use matrix_platformer::types::{Command, EntityKind, FrameBuffer, PlayerState};

const DT: f32 = 1.0 / 30.0;
const IDLE: Duration = Duration::from_secs(2);

/// 60×28 level with a 4-row floor and the player standing on it.
fn grounded_world() -> World {
    let mut level = Level::empty(60, 28);
    level.fill(0, 24, 60, 28, Tile::Ground);
    level.set_player_spawn(4.0, 22.0);
    World::new(level, PhysicsConfig::default())
}

#[test]
fn scenario_a_jump_from_rest_goes_airborne() {
    let mut world = grounded_world();
    assert!(world.player().body.on_ground);

    world.advance(DT, &[Command::Jump]);

    let body = &world.player().body;
    assert!(body.vel.y < 0.0, "vy = {}", body.vel.y);
    assert!(!body.on_ground);
    assert!(body.pos.y < 22.0);
}

#[test]
fn scenario_b_super_player_hit_shrinks_with_invincibility() {
    let mut world = grounded_world();
    world.player_mut().set_power(PlayerState::Super);
    assert_eq!(world.player().invincible_timer(), 0.0);
    let enemy = world.spawn(EntityKind::Walker, 4.5, 23.0);

    world.advance(DT, &[]);

    assert_eq!(world.player().state(), PlayerState::Small);
    assert!(world.player().invincible_timer() > 0.0);
    assert!(world.entity(enemy).is_some_and(|e| e.active));
    assert_eq!(world.player().lives(), 3);
}

#[test]
fn scenario_c_transport_escalates_once() {
    let mock = MockChannel::new(FaultPlan::always_fail());
    let log = mock.handle();
    let mut transport = Transport::start(Box::new(mock), TransportConfig::default()).unwrap();
    let frame = FrameBuffer::new(36, 28);

    for _ in 0..12 {
        transport.send(&frame).unwrap();
        assert!(transport.wait_idle(IDLE));
    }

    let mut escalations = Vec::new();
    while let Some(event) = transport.try_event() {
        if let TransportEvent::ChannelFailed { consecutive } = event {
            escalations.push(consecutive);
        }
    }
    assert_eq!(escalations, vec![5]);
    assert_eq!(log.failures(), 12);

    let stats = transport.shutdown(IDLE);
    assert_eq!(stats.escalations, 1);
    assert_eq!(stats.consecutive_errors, 12);
    assert_eq!(stats.frames_sent, 0);
}

#[test]
fn scenario_c_orchestrator_pauses_once() {
    let cfg = Config::default();
    let mock = MockChannel::new(FaultPlan::always_fail());
    let log = mock.handle();
    let transport = Transport::start(Box::new(mock), cfg.transport_config()).unwrap();
    let mut orchestrator = Orchestrator::new(cfg, grounded_world(), transport).unwrap();
    orchestrator.start();

    for _ in 0..10 {
        orchestrator.step(DT);
        assert!(orchestrator.transport().unwrap().wait_idle(IDLE));
    }
    assert_eq!(orchestrator.state(), RunState::Paused);
    assert_eq!(orchestrator.snapshot().escalations, 1);
    assert_eq!(log.calls(), 5);

    // Still the same failure streak, so it does not escalate again.
    orchestrator.resume();
    for _ in 0..4 {
        orchestrator.step(DT);
        assert!(orchestrator.transport().unwrap().wait_idle(IDLE));
    }
    assert_eq!(orchestrator.state(), RunState::Running);
    assert_eq!(orchestrator.snapshot().escalations, 1);
}

#[test]
fn scenario_d_offscreen_player_draws_background_only() {
    let renderer = Renderer::new(
        Palette::default(),
        RenderOptions {
            hud: false,
            debug_overlay: false,
        },
    );
    let mut world = grounded_world();
    world.set_camera_x(20.0);
    assert!(world.player().body.pos.x + 2.0 < world.camera_x());

    let fb = renderer.render(&world);

    let sky = renderer.palette().get(PaletteSlot::Sky);
    let ground = renderer.palette().get(PaletteSlot::Ground);
    let mut expected = FrameBuffer::filled(36, 28, sky);
    expected.fill_rect(0, 24, 36, 4, ground);
    assert_eq!(fb, expected);
}
