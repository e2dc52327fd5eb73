use criterion::{black_box, criterion_group, criterion_main, Criterion};
use emberfall_core::world::{Gem, Pickup, PickupKind};
use emberfall_core::{SimConfig, Simulation, StatTable};
use glam::Vec2;

fn populated(enemies: usize) -> Simulation {
    let mut sim = Simulation::new(SimConfig::default(), StatTable::builtin()).unwrap();
    for i in 0..enemies {
        let angle = i as f32 * 0.37;
        let distance = 150.0 + (i % 7) as f32 * 30.0;
        let kind = if i % 3 == 0 { "chaser" } else { "bomber" };
        sim.spawn_enemy(kind, Vec2::from_angle(angle) * distance, 1.0).unwrap();
    }
    let world = sim.world_mut();
    for i in 0..64 {
        let pos = Vec2::from_angle(i as f32 * 0.9) * (i as f32 * 4.0);
        world.gems.push(Gem::new(pos, 1));
        world.pickups.push(Pickup::new(pos * 1.5, PickupKind::Heal));
    }
    sim
}

fn bench_step_small(c: &mut Criterion) {
    let mut sim = populated(16);
    c.bench_function("step_16_enemies", |b| {
        b.iter(|| {
            sim.step(black_box(1.0 / 60.0));
        })
    });
}

fn bench_step_crowd(c: &mut Criterion) {
    // Separation is quadratic in the crowd size
    let mut sim = populated(200);
    c.bench_function("step_200_enemies", |b| {
        b.iter(|| {
            sim.step(black_box(1.0 / 60.0));
        })
    });
}

fn bench_explosion(c: &mut Criterion) {
    let sim = populated(0);
    c.bench_function("explode_in_populated_world", |b| {
        b.iter_batched(
            || sim.clone(),
            |mut sim| {
                sim.spawn_projectile("bomb", Vec2::ZERO, Vec2::ZERO).unwrap();
                for _ in 0..200 {
                    sim.step(1.0 / 60.0);
                }
                black_box(sim.world().gems.len())
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_step_small, bench_step_crowd, bench_explosion);
criterion_main!(benches);
