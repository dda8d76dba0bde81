//! Simulation bounds under arbitrary input.

use proptest::prelude::*;

use matrix_platformer::core::{PhysicsConfig, World};
use matrix_platformer::render::Renderer;
use matrix_platformer::types::{Command, MATRIX_HEIGHT, MATRIX_WIDTH, STARTING_LIVES};

fn command() -> impl Strategy<Value = Command> {
    prop::sample::select(vec![
        Command::MoveLeft,
        Command::MoveRight,
        Command::Jump,
        Command::Attack,
        Command::None,
    ])
}

fn ticks() -> impl Strategy<Value = Vec<(f32, Vec<Command>)>> {
    prop::collection::vec(
        (0.0f32..0.3, prop::collection::vec(command(), 0..3)),
        1..300,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn player_and_camera_stay_in_bounds(script in ticks()) {
        let mut world = World::with_default_level(PhysicsConfig::default());
        let width = world.level().width() as f32;
        let max_camera = width - MATRIX_WIDTH as f32;
        let mut last_tick = 0;
        let mut last_lives = STARTING_LIVES;

        for (dt, cmds) in &script {
            world.advance(*dt, cmds);

            let body = &world.player().body;
            prop_assert!(body.pos.x >= 0.0 && body.pos.x + body.size.x <= width);
            prop_assert!(body.pos.y >= 0.0);
            prop_assert!(body.vel.y <= world.config().max_fall_speed);
            prop_assert!((0.0..=max_camera).contains(&world.camera_x()));

            prop_assert!(world.tick() >= last_tick);
            last_tick = world.tick();
            prop_assert!(world.player().lives() <= last_lives);
            last_lives = world.player().lives();
        }
    }

    #[test]
    fn rendering_any_reachable_world_fills_the_matrix(script in ticks()) {
        let mut world = World::with_default_level(PhysicsConfig::default());
        let renderer = Renderer::default();
        for (dt, cmds) in &script {
            world.advance(*dt, cmds);
        }
        let fb = renderer.render(&world);
        prop_assert_eq!(fb.width(), MATRIX_WIDTH);
        prop_assert_eq!(fb.height(), MATRIX_HEIGHT);
    }
}

#[test]
fn same_input_same_world() {
    let script: Vec<Vec<Command>> = (0..240)
        .map(|i| match i % 40 {
            0 => vec![Command::Jump, Command::MoveRight],
            1..=25 => vec![Command::MoveRight],
            _ => vec![],
        })
        .collect();

    let run = || {
        let mut world = World::with_default_level(PhysicsConfig::default());
        for cmds in &script {
            world.advance(1.0 / 30.0, cmds);
        }
        world.summary()
    };
    assert_eq!(run(), run());
}
