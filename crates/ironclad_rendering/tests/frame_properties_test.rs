//! # Frame Properties Integration Test
//!
//! Drives the compositor end to end through a recording surface and checks
//! the guarantees the host relies on: bad geometry draws nothing, expired
//! effects never draw, caches fetch once, and sizing is stable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use ironclad_rendering::color;
use ironclad_rendering::particles::{Particle, ParticleKind};
use ironclad_rendering::texture_cache::FetchCallback;
use ironclad_rendering::{
    Color, FrameInput, MinimapProjector, RecordingSurface, SceneCompositor, Shockwave, StaticFetcher, Surface,
    Texture, TextureCache, TextureFetcher,
};
use ironclad_shared::{
    Camera, ColorToken, ColorblindMode, Entity, EntityKind, PointerState, RawSettings, Settings, Vec2, Viewport,
    WeaponCatalog, WorldSnapshot, DEFAULT_WEAPON_ID,
};
use parking_lot::Mutex;

fn compositor(seed: u64) -> SceneCompositor {
    SceneCompositor::with_seed(TextureCache::new(Arc::new(StaticFetcher::new())), seed)
}

fn frame<'a>(
    snapshot: &'a WorldSnapshot,
    settings: &'a Settings,
    catalog: &'a WeaponCatalog,
    viewport: Viewport,
) -> FrameInput<'a> {
    FrameInput {
        snapshot,
        settings,
        catalog,
        camera: Camera::new(Vec2::ZERO),
        viewport,
        pointer: PointerState::default(),
    }
}

/// Test: entities with zero or negative radius never produce a body.
#[test]
fn test_non_positive_radius_draws_no_body() {
    let mut snapshot = WorldSnapshot::default();
    let kinds = [EntityKind::Player, EntityKind::Enemy, EntityKind::Boss, EntityKind::Food];
    for (i, kind) in kinds.into_iter().enumerate() {
        snapshot.entities.push(Entity::new(i as u64, kind, Vec2::new(i as f32 * 40.0, 0.0), 0.0));
        snapshot.entities.push(Entity::new(100 + i as u64, kind, Vec2::new(i as f32 * 40.0, 50.0), -12.0));
    }
    let (settings, catalog) = (Settings::default(), WeaponCatalog::builtin());
    let mut scene = compositor(1);
    let mut s = RecordingSurface::new(0, 0);
    let stats = scene
        .render_frame(Some(&mut s), &frame(&snapshot, &settings, &catalog, Viewport::new(800.0, 600.0)))
        .expect("frame rendered");
    assert_eq!(stats.entities_drawn, 0);
    assert_eq!(s.save_depth(), 0);
}

/// Test: particle life only decreases and expired particles never draw.
#[test]
fn test_particle_life_monotonic_and_expired_removed() {
    let (snapshot, settings, catalog) = (WorldSnapshot::default(), Settings::default(), WeaponCatalog::builtin());
    let input = frame(&snapshot, &settings, &catalog, Viewport::new(640.0, 480.0));
    let mut scene = compositor(2);
    scene
        .particles_mut()
        .push(Particle::new(ParticleKind::Generic, Vec2::ZERO, Vec2::new(1.0, 0.0), 0.1, 3.0, Color::WHITE));
    let mut s = RecordingSurface::new(0, 0);

    let mut last = f32::INFINITY;
    for _ in 0..20 {
        let stats = scene.render_frame(Some(&mut s), &input).expect("frame rendered");
        for p in scene.particles().iter() {
            assert!(p.life <= last);
            assert!(p.life > 0.0, "expired particle survived the update");
            last = p.life;
        }
        assert_eq!(stats.particles_drawn, scene.particles().len());
    }
    // 0.1 s at 60 ticks per second is six frames.
    assert!(scene.particles().is_empty());
}

/// Parks every fetch so the test controls completion.
#[derive(Default)]
struct ParkedFetcher {
    calls: AtomicUsize,
    parked: Mutex<Vec<FetchCallback>>,
}

impl TextureFetcher for ParkedFetcher {
    fn fetch(&self, _key: &str, _url: &str, done: FetchCallback) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.parked.lock().push(done);
    }
}

/// Test: concurrent requests for one key start exactly one fetch and both
/// callers see the same texture afterwards.
#[test]
fn test_texture_cache_single_fetch_under_contention() {
    let fetcher = Arc::new(ParkedFetcher::default());
    let cache = TextureCache::new(fetcher.clone());
    let barrier = Barrier::new(2);

    thread::scope(|scope| {
        for _ in 0..2 {
            let cache = cache.clone();
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                assert!(cache.get_or_start_fetch("se").is_none());
            });
        }
    });
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

    let done = fetcher.parked.lock().pop().expect("one parked fetch");
    done(Ok(Texture::solid(4, 3, [0, 0, 255, 255])));

    let a = cache.get_or_start_fetch("se").expect("loaded");
    let b = cache.clone().get_or_start_fetch("SE").expect("loaded");
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

/// Test: color resolution is a pure function of token and mode.
#[test]
fn test_color_resolution_is_pure() {
    let tokens = [ColorToken::Friendly, ColorToken::Hostile, ColorToken::Gold, ColorToken::Rgb([12, 200, 99])];
    let modes = [
        ColorblindMode::Off,
        ColorblindMode::Protanopia,
        ColorblindMode::Deuteranopia,
        ColorblindMode::Tritanopia,
        ColorblindMode::HighContrast,
    ];
    for token in tokens {
        for mode in modes {
            assert_eq!(color::resolve(token, mode), color::resolve(token, mode), "{token:?} {mode:?}");
        }
    }
}

/// Test: an unknown weapon id falls back to the default schema and renders.
#[test]
fn test_missing_weapon_id_renders_with_default_schema() {
    let catalog = WeaponCatalog::builtin();
    assert_eq!(catalog.resolve(Some("missing_id")).id, DEFAULT_WEAPON_ID);

    let mut enemy = Entity::new(9, EntityKind::Enemy, Vec2::new(100.0, 100.0), 24.0);
    enemy.weapon_id = Some("missing_id".into());
    let snapshot = WorldSnapshot {
        entities: vec![enemy],
        ..WorldSnapshot::default()
    };
    let settings = Settings::default();
    let mut scene = compositor(3);
    let mut s = RecordingSurface::new(0, 0);
    let stats = scene
        .render_frame(Some(&mut s), &frame(&snapshot, &settings, &catalog, Viewport::new(800.0, 600.0)))
        .expect("frame rendered");
    assert_eq!(stats.entities_drawn, 1);
    assert_eq!(s.save_depth(), 0);
}

/// Test: 50% resolution on a 1000×800 viewport backs onto 500×400 pixels,
/// and a second identical frame does not resize again.
#[test]
fn test_resolution_scale_and_resize_hysteresis() {
    let mut raw = RawSettings::default();
    raw.graphics.resolution = Some(50.0);
    let settings = Settings::normalize(&raw);
    let (snapshot, catalog) = (WorldSnapshot::default(), WeaponCatalog::builtin());
    let input = frame(&snapshot, &settings, &catalog, Viewport::new(1000.0, 800.0));

    let mut scene = compositor(4);
    let mut s = RecordingSurface::new(0, 0);
    let first = scene.render_frame(Some(&mut s), &input).expect("frame rendered");
    assert!(first.resized);
    assert_eq!(s.size(), (500, 400));

    let second = scene.render_frame(Some(&mut s), &input).expect("frame rendered");
    assert!(!second.resized);
    assert_eq!(s.resize_count(), 1);
}

/// Test: a ring at zero life is not drawn and leaves on the same frame.
#[test]
fn test_dead_shockwave_is_dropped() {
    let mut wave = Shockwave::new(Vec2::ZERO, 80.0, Color::WHITE);
    wave.radius = 50.0;
    wave.life = 0.0;
    let mut s = RecordingSurface::new(100, 100);
    assert!(!wave.draw(&mut s, Vec2::new(50.0, 50.0), true));
    assert!(s.commands().is_empty());

    let (snapshot, settings, catalog) = (WorldSnapshot::default(), Settings::default(), WeaponCatalog::builtin());
    let mut scene = compositor(5);
    scene.push_shockwave(wave);
    let stats = scene
        .render_frame(Some(&mut s), &frame(&snapshot, &settings, &catalog, Viewport::new(640.0, 480.0)))
        .expect("frame rendered");
    assert_eq!(stats.shockwaves, 0);
    assert!(scene.shockwaves().is_empty());
}

/// Test: a 4000 world on a 200 px minimap scales by 0.05 and the map
/// edge lands 100 px right of center.
#[test]
fn test_minimap_projection() {
    let scale = MinimapProjector::scale(200.0, 4000.0);
    assert!((scale - 0.05).abs() < 1e-6);
    let p = MinimapProjector::project(Vec2::new(2000.0, 0.0), Vec2::new(200.0, 200.0), 4000.0);
    assert!((p.x - 200.0).abs() < 1e-4);
    assert!((p.y - 100.0).abs() < 1e-4);
}

/// Test: the same seed and inputs replay the same commands.
#[test]
fn test_seeded_frames_replay() {
    let mut snapshot = WorldSnapshot::default();
    snapshot.entities.push(Entity::new(1, EntityKind::Player, Vec2::ZERO, 22.0));
    snapshot.entities.push(Entity::new(2, EntityKind::Enemy, Vec2::new(120.0, 40.0), 30.0));
    let (settings, catalog) = (Settings::default(), WeaponCatalog::builtin());
    let mut input = frame(&snapshot, &settings, &catalog, Viewport::new(640.0, 480.0));
    input.camera.shake = 6.0;

    let record = || {
        let mut scene = compositor(77);
        let mut s = RecordingSurface::new(0, 0);
        for _ in 0..3 {
            scene.render_frame(Some(&mut s), &input);
        }
        s.take_commands()
    };
    assert_eq!(record(), record());
}
