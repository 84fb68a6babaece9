//! # Arena Replay
//!
//! Headless replay of a seeded synthetic match through the full render
//! core. Draws into command-recording surfaces and reports frame stats.
//!
//! ```bash
//! arena_replay --frames 600 --entities 200 --seed 42
//! arena_replay --settings data/settings.toml --catalog data/weapons.toml
//! RUST_LOG=ironclad_rendering=trace arena_replay --frames 10
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use ironclad::rendering::{RecordingSurface, SceneCompositor, Surface, TextureCache, TextureFetcher};
use ironclad::shared::{Settings, WeaponCatalog};
use ironclad::{FrameLoop, FrameLoopConfig, ReplayArena, ReplayConfig};
use tracing::{error, info};

/// Minimap surface edge in pixels.
const MINIMAP_SIZE: u32 = 200;

const USAGE: &str =
    "usage: arena_replay [--settings FILE] [--catalog FILE] [--frames N] [--entities N] [--seed S]";

struct Args {
    settings: Option<String>,
    catalog: Option<String>,
    replay: ReplayConfig,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        settings: None,
        catalog: None,
        replay: ReplayConfig::default(),
    };
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--settings" => args.settings = Some(value()?),
            "--catalog" => args.catalog = Some(value()?),
            "--frames" => args.replay.frames = number(&flag, &value()?)?,
            "--entities" => args.replay.entities = number(&flag, &value()?)?,
            "--seed" => args.replay.seed = number(&flag, &value()?)?,
            "-h" | "--help" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown argument {other}\n{USAGE}")),
        }
    }
    Ok(args)
}

fn number<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T, String> {
    raw.parse().map_err(|_| format!("{flag}: not a number: {raw}"))
}

#[cfg(feature = "http")]
fn fetcher() -> Arc<dyn TextureFetcher> {
    match ironclad::rendering::HttpTextureFetcher::new() {
        Ok(http) => Arc::new(http),
        Err(err) => {
            error!(error = %err, "http fetcher unavailable, flags disabled");
            Arc::new(ironclad::rendering::StaticFetcher::new())
        }
    }
}

#[cfg(not(feature = "http"))]
fn fetcher() -> Arc<dyn TextureFetcher> {
    use ironclad::rendering::{StaticFetcher, Texture};
    // Offline stand-ins: one flat color per flag key the replay hands out.
    let source = [
        ("de", [221, 0, 0, 255]),
        ("fr", [0, 85, 164, 255]),
        ("jp", [240, 240, 240, 255]),
        ("br", [0, 155, 58, 255]),
        ("se", [0, 106, 167, 255]),
        ("ca", [216, 6, 33, 255]),
    ]
    .into_iter()
    .fold(StaticFetcher::new(), |source, (key, rgba)| source.with(key, Texture::solid(8, 6, rgba)));
    Arc::new(source)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    let settings = match args.settings.as_deref().map(Settings::load).transpose() {
        Ok(settings) => settings.unwrap_or_default(),
        Err(err) => {
            error!(error = %err, "failed to load settings");
            return ExitCode::FAILURE;
        }
    };
    let catalog = match args.catalog.as_deref().map(WeaponCatalog::load).transpose() {
        Ok(catalog) => catalog.unwrap_or_else(WeaponCatalog::builtin),
        Err(err) => {
            error!(error = %err, "failed to load weapon catalog");
            return ExitCode::FAILURE;
        }
    };

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    IRONCLAD ARENA REPLAY");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();
    println!("  Frames:    {}", args.replay.frames);
    println!("  Entities:  {}", args.replay.entities);
    println!("  Seed:      {}", args.replay.seed);
    println!("  Weapons:   {}", catalog.len());
    println!("  Quality:   {:?}", settings.graphics.quality);
    println!();

    let mut arena = ReplayArena::new(&args.replay, catalog, settings);
    let mut scene = SceneCompositor::with_seed(TextureCache::new(fetcher()), args.replay.seed);
    let events = scene.event_sender();
    let mut surface = RecordingSurface::new(0, 0);
    let mut minimap = RecordingSurface::new(MINIMAP_SIZE, MINIMAP_SIZE);
    let mut commands = 0usize;

    let mut frame_loop = FrameLoop::new(FrameLoopConfig::headless(args.replay.frames));
    frame_loop.run(|frame| {
        arena.step(frame, &events);
        surface.clear_commands();
        minimap.clear_commands();

        let input = arena.input();
        let stats = scene.render_frame(Some(&mut surface), &input);
        let mini = scene.render_minimap(Some(&mut minimap), &input);
        commands += surface.commands().len() + minimap.commands().len();

        if frame % 60 == 0 {
            if let Some(s) = &stats {
                info!(
                    frame,
                    drawn = s.entities_drawn,
                    culled = s.entities_culled,
                    particles = s.particles_alive,
                    events = s.events,
                    minimap = mini.map_or(0, |m| m.drawn),
                    render_ms = s.render_ms(),
                    "frame"
                );
            }
        }
        stats
    });

    frame_loop.stats().print_summary();
    println!();
    println!("  Surface:        {:?}", surface.size());
    println!("  Commands:       {commands}");
    println!("  Flags cached:   {}", scene.textures().stats().loaded);
    ExitCode::SUCCESS
}
