//! # Replay Integration Test
//!
//! Runs the shipped data files and a short seeded replay through the whole
//! stack: settings + catalog loading, the synthetic arena, the compositor
//! and the frame loop.

use std::path::PathBuf;
use std::sync::Arc;

use ironclad::rendering::{RecordingSurface, SceneCompositor, StaticFetcher, Surface, TextureCache};
use ironclad::shared::{BarrelSubType, QualityPreset, Settings, WeaponCatalog, WeaponType};
use ironclad::{FrameLoop, FrameLoopConfig, ReplayArena, ReplayConfig};

fn data(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data").join(file)
}

/// Test: the shipped settings file normalizes without error.
#[test]
fn test_shipped_settings_load() {
    let settings = Settings::load(data("settings.toml")).expect("settings parse");
    assert_eq!(settings.graphics.quality, QualityPreset::Medium);
    assert!((settings.graphics.grid_opacity - 0.35).abs() < 1e-6);
    assert!((settings.interface.minimap_opacity - 0.8).abs() < 1e-6);
}

/// Test: the shipped catalog loads and keeps unknown tags as `Unknown`.
#[test]
fn test_shipped_catalog_load() {
    let catalog = WeaponCatalog::load(data("weapons.toml")).expect("catalog parse");
    assert_eq!(catalog.resolve(Some("twin")).barrels.len(), 2);
    let prototype = catalog.get("prototype").expect("prototype entry");
    assert_eq!(prototype.weapon_type, WeaponType::Unknown);
    assert_eq!(prototype.barrels[0].sub_type, Some(BarrelSubType::Unknown));
}

/// Test: a seeded replay renders every frame and replays identically.
#[test]
fn test_short_replay_is_deterministic() {
    let run = || {
        let config = ReplayConfig {
            frames: 30,
            entities: 60,
            seed: 11,
            ..ReplayConfig::default()
        };
        let mut arena = ReplayArena::new(&config, WeaponCatalog::builtin(), Settings::default());
        let mut scene = SceneCompositor::with_seed(TextureCache::new(Arc::new(StaticFetcher::new())), config.seed);
        let events = scene.event_sender();
        let mut surface = RecordingSurface::new(0, 0);
        let mut frame_loop = FrameLoop::new(FrameLoopConfig::headless(config.frames));
        let mut drawn = Vec::new();
        let ran = frame_loop.run(|frame| {
            arena.step(frame, &events);
            let stats = scene.render_frame(Some(&mut surface), &arena.input());
            drawn.push(stats.map(|s| (s.entities_drawn, s.particles_alive)));
            stats
        });
        assert_eq!(ran, 30);
        assert_eq!(frame_loop.stats().frames_skipped, 0);
        assert_eq!(surface.size(), (1280, 720));
        assert_eq!(surface.save_depth(), 0);
        drawn
    };
    assert_eq!(run(), run());
}
