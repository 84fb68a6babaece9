//! # Frame Benchmark
//!
//! Full compositor frames against a recording surface.
//!
//! Tests:
//! 1. Crowded arena (tanks, food, projectiles) at each quality preset
//! 2. Tank compositor alone, one run per catalog weapon
//! 3. Particle-heavy frame after an explosion burst

#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ironclad_rendering::{
    draw_tank, FrameInput, RecordingSurface, SceneCompositor, StaticFetcher, TankDraw, TextureCache, Color,
};
use ironclad_shared::{
    Camera, ColorToken, Entity, EntityKind, PointerState, QualityPreset, Settings, Vec2, Viewport, VisualEvent,
    WeaponCatalog, WorldSnapshot,
};

/// Deterministic arena: a ring of tanks, a field of food, and projectiles.
fn arena(entities: usize, catalog: &WeaponCatalog) -> WorldSnapshot {
    let ids: Vec<String> = catalog.iter().map(|w| w.id.clone()).collect();
    let mut snapshot = WorldSnapshot::default();
    for i in 0..entities {
        let t = i as f32 * 0.618;
        let position = Vec2::new((t * 37.0).sin() * 700.0, (t * 23.0).cos() * 500.0);
        let kind = match i % 6 {
            0 | 1 => EntityKind::Enemy,
            2 => EntityKind::Projectile,
            _ => EntityKind::Food,
        };
        let mut e = Entity::new(i as u64, kind, position, 10.0 + (i % 5) as f32 * 6.0);
        e.depth = (i % 3) as i32;
        e.velocity = Vec2::from_angle(t) * 2.0;
        if kind.is_tank() && !ids.is_empty() {
            e.weapon_id = Some(ids[i % ids.len()].clone());
            e.health = 60.0;
            e.max_health = 100.0;
        }
        snapshot.entities.push(e);
    }
    snapshot
}

// =============================================================================
// BENCHMARK 1: Full frame per quality preset
// =============================================================================

fn bench_full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_frame");
    let catalog = WeaponCatalog::builtin();
    let snapshot = arena(300, &catalog);

    for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High, QualityPreset::Ultra] {
        let settings = Settings::preset(preset);
        let input = FrameInput {
            snapshot: &snapshot,
            settings: &settings,
            catalog: &catalog,
            camera: Camera::new(Vec2::ZERO),
            viewport: Viewport::new(1280.0, 720.0),
            pointer: PointerState::default(),
        };
        let mut scene = SceneCompositor::with_seed(TextureCache::new(Arc::new(StaticFetcher::new())), 42);
        let mut surface = RecordingSurface::new(1280, 720);

        group.bench_with_input(BenchmarkId::from_parameter(format!("{preset:?}")), &input, |b, input| {
            b.iter(|| {
                surface.clear_commands();
                black_box(scene.render_frame(Some(&mut surface), input))
            });
        });
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 2: Tank compositor per weapon
// =============================================================================

fn bench_tank_compositor(c: &mut Criterion) {
    let mut group = c.benchmark_group("tank_compositor");
    let catalog = WeaponCatalog::builtin();
    let entity = Entity::new(1, EntityKind::Player, Vec2::ZERO, 30.0);
    let mut surface = RecordingSurface::new(256, 256);

    for schema in catalog.iter() {
        group.bench_function(&schema.id, |b| {
            let mut tick = 0u64;
            b.iter(|| {
                surface.clear_commands();
                tick += 1;
                black_box(draw_tank(
                    &mut surface,
                    &TankDraw {
                        entity: &entity,
                        schema,
                        at: Vec2::new(128.0, 128.0),
                        color: Color::hex(0x4F_C3_F7_FF),
                        tick,
                        recoil: &[],
                        flag: None,
                    },
                ))
            });
        });
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 3: Particle-heavy frame
// =============================================================================

fn bench_particle_storm(c: &mut Criterion) {
    let catalog = WeaponCatalog::builtin();
    let snapshot = WorldSnapshot::default();
    let settings = Settings::default();
    let input = FrameInput {
        snapshot: &snapshot,
        settings: &settings,
        catalog: &catalog,
        camera: Camera::new(Vec2::ZERO),
        viewport: Viewport::new(1280.0, 720.0),
        pointer: PointerState::default(),
    };
    let mut scene = SceneCompositor::with_seed(TextureCache::new(Arc::new(StaticFetcher::new())), 7);
    let sender = scene.event_sender();
    let mut surface = RecordingSurface::new(1280, 720);

    c.bench_function("particle_storm", |b| {
        b.iter(|| {
            for k in 0..8 {
                let _ = sender.send(VisualEvent::Explosion {
                    position: Vec2::new(k as f32 * 60.0 - 240.0, 0.0),
                    radius: 60.0,
                    color: ColorToken::Orange,
                });
            }
            surface.clear_commands();
            black_box(scene.render_frame(Some(&mut surface), &input))
        });
    });
}

criterion_group!(benches, bench_full_frame, bench_tank_compositor, bench_particle_storm);
criterion_main!(benches);
