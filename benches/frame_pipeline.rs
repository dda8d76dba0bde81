use criterion::{black_box, criterion_group, criterion_main, Criterion};
use matrix_platformer::core::{PhysicsConfig, World};
use matrix_platformer::render::Renderer;
use matrix_platformer::transport::{encode_into, FrameDecoder};
use matrix_platformer::types::{Command, Outcome, MATRIX_HEIGHT, MATRIX_WIDTH};

fn bench_advance(c: &mut Criterion) {
    let mut world = World::with_default_level(PhysicsConfig::default());
    let mut tick = 0u32;

    c.bench_function("world_advance_33ms", |b| {
        b.iter(|| {
            tick = tick.wrapping_add(1);
            let cmds: &[Command] = if tick % 20 == 0 {
                &[Command::Jump, Command::MoveRight]
            } else {
                &[Command::MoveRight]
            };
            world.advance(black_box(1.0 / 30.0), cmds);
            if world.outcome() != Outcome::Playing {
                world.restart();
            }
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let world = World::with_default_level(PhysicsConfig::default());
    let renderer = Renderer::default();
    let mut fb = renderer.new_frame();

    c.bench_function("render_into", |b| {
        b.iter(|| {
            renderer.render_into(black_box(&world), &mut fb);
        })
    });
}

fn bench_encode(c: &mut Criterion) {
    let world = World::with_default_level(PhysicsConfig::default());
    let fb = Renderer::default().render(&world);
    let mut out = Vec::new();

    c.bench_function("encode_frame", |b| {
        b.iter(|| {
            encode_into(black_box(&fb), &mut out);
        })
    });

    let mut stream = Vec::new();
    encode_into(&fb, &mut stream);
    c.bench_function("decode_stream_frame", |b| {
        let mut decoder = FrameDecoder::new(MATRIX_WIDTH, MATRIX_HEIGHT);
        b.iter(|| {
            decoder.push(black_box(&stream));
            decoder.next_frame()
        })
    });
}

criterion_group!(benches, bench_advance, bench_render, bench_encode);
criterion_main!(benches);
