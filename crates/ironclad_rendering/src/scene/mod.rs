//! # Scene Compositor
//!
//! Produces one complete frame from the latest snapshot. The step order
//! is fixed; each step depends on the previous one.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          FRAME ORDER                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ 1. size      backing = logical × resolution × pixel ratio       │
//! │              resize only past the hysteresis                    │
//! │ 2. camera    offset = center − half viewport + shake jitter     │
//! │ 3. clear     background + parallax starfield                    │
//! │ 4. grid      palette grid, offset by camera mod cell            │
//! │ 5. aim line  optional, viewport center → pointer                │
//! │ 6. effects   drain events; lightning beams, shockwave rings     │
//! │ 7. entities  stable depth sort → cull → dispatch → overlays     │
//! │ 8. particles update, drop expired, draw on-screen               │
//! │ 9. HUD       crosshair / touch controls / vignette              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The compositor owns the only mutable render state: particles,
//! shockwaves, queued beams, barrel recoil and the random stream. It
//! never writes to the snapshot.

pub mod background;
pub mod entities;
pub mod hud;
pub mod viewport;

use std::collections::HashMap;
use std::time::Instant;

use ironclad_shared::{
    Camera, EntityId, ParticleBudget, PointerState, Rect, Settings, Vec2, Viewport, VisualEvent, WeaponCatalog,
    WorldSnapshot,
};
use tracing::trace;

use crate::color::Color;
use crate::context::{FrameContext, FrameRng};
use crate::effects::{draw_lightning, LightningBeam, Shockwave, Starfield};
use crate::events::{VisualEventQueue, VisualEventSender, DEFAULT_EVENT_CAPACITY};
use crate::minimap::{MinimapProjector, MinimapStats};
use crate::particles::ParticleSystem;
use crate::stats::FrameStats;
use crate::surface::Surface;
use crate::texture_cache::TextureCache;

use entities::EntityDraw;

/// Stars generated for the parallax field.
pub const STAR_COUNT: usize = 180;

/// Per-frame recoil decay factor.
const RECOIL_DECAY: f32 = 0.82;
/// Recoil below this is dropped.
const RECOIL_EPSILON: f32 = 0.01;
/// Extra world margin for particle culling.
const PARTICLE_MARGIN: f32 = 32.0;
/// Explosions at least this large also emit a shockwave.
const EXPLOSION_SHOCKWAVE_RADIUS: f32 = 40.0;

/// Read-only inputs of one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Latest world snapshot.
    pub snapshot: &'a WorldSnapshot,
    /// Normalized settings.
    pub settings: &'a Settings,
    /// Weapon catalog.
    pub catalog: &'a WeaponCatalog,
    /// Camera state.
    pub camera: Camera,
    /// Logical viewport.
    pub viewport: Viewport,
    /// Pointer and touch state.
    pub pointer: PointerState,
}

/// Frame renderer owning all cross-frame render state.
pub struct SceneCompositor {
    rng: FrameRng,
    tick: u64,
    particles: ParticleSystem,
    shockwaves: Vec<Shockwave>,
    beams: Vec<LightningBeam>,
    starfield: Starfield,
    recoil: HashMap<EntityId, Vec<f32>>,
    events: VisualEventQueue,
    drained: Vec<VisualEvent>,
    order: Vec<usize>,
    textures: TextureCache,
    minimap: MinimapProjector,
}

impl SceneCompositor {
    /// Creates a compositor with seed 0.
    #[must_use]
    pub fn new(textures: TextureCache) -> Self {
        Self::with_seed(textures, 0)
    }

    /// Creates a compositor whose jitter, lightning and particles replay
    /// identically for the same `seed`.
    #[must_use]
    pub fn with_seed(textures: TextureCache, seed: u64) -> Self {
        let mut rng = FrameRng::seeded(seed);
        let starfield = Starfield::generate(STAR_COUNT, &mut rng);
        Self {
            rng,
            tick: 0,
            particles: ParticleSystem::new(ParticleBudget::default()),
            shockwaves: Vec::new(),
            beams: Vec::new(),
            starfield,
            recoil: HashMap::new(),
            events: VisualEventQueue::new(DEFAULT_EVENT_CAPACITY),
            drained: Vec::with_capacity(64),
            order: Vec::new(),
            textures,
            minimap: MinimapProjector::new(),
        }
    }

    /// Handle for the simulation to queue visual events.
    #[must_use]
    pub fn event_sender(&self) -> VisualEventSender {
        self.events.sender()
    }

    /// Frames rendered so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Live particles.
    #[must_use]
    pub const fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Mutable access to the particle buffer.
    pub fn particles_mut(&mut self) -> &mut ParticleSystem {
        &mut self.particles
    }

    /// Live shockwave rings.
    #[must_use]
    pub fn shockwaves(&self) -> &[Shockwave] {
        &self.shockwaves
    }

    /// Adds a shockwave ring directly.
    pub fn push_shockwave(&mut self, wave: Shockwave) {
        self.shockwaves.push(wave);
    }

    /// Queues a beam for the next frame.
    pub fn push_beam(&mut self, beam: LightningBeam) {
        self.beams.push(beam);
    }

    /// Beams waiting for the next frame.
    #[must_use]
    pub fn pending_beams(&self) -> usize {
        self.beams.len()
    }

    /// Current recoil of an entity's barrels.
    #[must_use]
    pub fn recoil(&self, entity: EntityId) -> &[f32] {
        self.recoil.get(&entity).map_or(&[], Vec::as_slice)
    }

    /// The shared texture cache.
    #[must_use]
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    /// Renders one frame. Returns `None` without drawing when the surface
    /// is missing or the viewport resolves to zero pixels.
    pub fn render_frame(&mut self, surface: Option<&mut dyn Surface>, input: &FrameInput<'_>) -> Option<FrameStats> {
        let Some(s) = surface else {
            trace!("no surface, frame skipped");
            return None;
        };
        let started = Instant::now();
        let settings = input.settings;
        let logical = Vec2::new(input.viewport.width, input.viewport.height);

        // 1. Surface size.
        let target = viewport::backing_size(&input.viewport, settings);
        if target.0 == 0 || target.1 == 0 {
            trace!("zero-sized viewport, frame skipped");
            return None;
        }
        let resized = viewport::apply_size(s, target);
        let (bw, bh) = s.size();
        if bw == 0 || bh == 0 {
            return None;
        }
        if self.particles.budget() != settings.graphics.particles {
            self.particles.set_budget(settings.graphics.particles);
        }

        // 2. Camera.
        let offset = viewport::camera_offset(&input.camera, &input.viewport, settings, &mut self.rng);
        let tick = self.tick;
        self.tick += 1;

        let mut stats = FrameStats {
            frame: tick,
            entities_considered: input.snapshot.entities.len(),
            resized,
            surface_size: (bw, bh),
            ..FrameStats::default()
        };

        let Self {
            rng,
            particles,
            shockwaves,
            beams,
            starfield,
            recoil,
            events,
            drained,
            order,
            textures,
            ..
        } = self;
        let mut ctx = FrameContext {
            settings,
            tick,
            camera_offset: offset,
            rng,
        };

        // 3. Clear + starfield.
        s.clear(Color::BACKGROUND);
        s.save();
        s.scale(bw as f32 / logical.x, bh as f32 / logical.y);
        if !background::skip_starfield(&input.viewport, settings) {
            stats.stars = starfield.draw(s, &ctx, logical);
        }

        // 4. Grid.
        background::draw_grid(s, &ctx, input.snapshot.map.palette, logical);

        // 5. Aim line.
        if settings.interface.aim_line {
            background::draw_aim_line(s, &input.viewport, &input.pointer);
        }

        // 6. Transient effects.
        drained.clear();
        events.receiver().drain_into(drained);
        stats.events = drained.len();
        for event in drained.drain(..) {
            apply_event(event, &mut ctx, particles, shockwaves, beams, recoil);
        }
        for beam in beams.drain(..) {
            let (from, to) = (ctx.to_screen(beam.from), ctx.to_screen(beam.to));
            draw_lightning(s, ctx.rng, from, to, beam.color);
            stats.beams += 1;
        }
        let glow = settings.graphics.bloom;
        for wave in shockwaves.iter_mut() {
            if wave.draw(s, ctx.to_screen(wave.origin), glow) {
                stats.shockwaves += 1;
            }
            wave.step();
        }
        shockwaves.retain(Shockwave::is_alive);

        // 7. Entities.
        let snapshot = input.snapshot;
        entities::depth_order(&snapshot.entities, order);
        for &index in order.iter() {
            let entity = &snapshot.entities[index];
            if !entities::is_on_screen(entity, offset, logical) {
                stats.entities_culled += 1;
                continue;
            }
            let flag = if entity.kind.is_tank() {
                entity.flag.as_deref().and_then(|key| textures.get_or_start_fetch(key))
            } else {
                None
            };
            let d = EntityDraw {
                entity,
                at: ctx.to_screen(entity.position),
                schema: input.catalog.resolve(entity.weapon_id.as_deref()),
                palette: snapshot.map.palette,
                recoil: recoil.get(&entity.id).map_or(&[], Vec::as_slice),
                flag: flag.as_deref(),
                is_local: snapshot.local_player == Some(entity.id),
            };
            if entities::draw_body(s, &mut ctx, &d) {
                stats.entities_drawn += 1;
            }
            entities::draw_overlays(s, &mut ctx, &d);

            if let Some(style) = entity.trail.filter(|_| entity.velocity.length_squared() > 0.25) {
                let color = ctx.color(entity.color);
                particles.spawn_trail(ctx.rng, style, entity.position, color);
            }
        }
        decay_recoil(recoil);

        // 8. Particles.
        particles.update();
        stats.particles_alive = particles.len();
        let view = Rect::new(offset.x, offset.y, logical.x, logical.y).inflate(PARTICLE_MARGIN);
        stats.particles_drawn = particles.draw(s, &ctx, view);

        // 9. HUD.
        hud::draw_hud(s, &ctx, &input.viewport, &input.pointer);
        s.restore();

        stats.render_us = started.elapsed().as_micros() as u64;
        trace!(
            frame = stats.frame,
            drawn = stats.entities_drawn,
            culled = stats.entities_culled,
            particles = stats.particles_alive,
            render_us = stats.render_us,
            "frame rendered"
        );
        Some(stats)
    }

    /// Renders the minimap for the same inputs onto its own surface.
    pub fn render_minimap(&mut self, surface: Option<&mut dyn Surface>, input: &FrameInput<'_>) -> Option<MinimapStats> {
        let s = surface?;
        let half = input.viewport.half_size();
        let view = Rect::new(
            input.camera.center.x - half.x,
            input.camera.center.y - half.y,
            input.viewport.width,
            input.viewport.height,
        );
        Some(self.minimap.render(s, input.snapshot, input.settings, view))
    }
}

/// Turns a drained event into particles, rings, beams or recoil.
fn apply_event(
    event: VisualEvent,
    ctx: &mut FrameContext<'_>,
    particles: &mut ParticleSystem,
    shockwaves: &mut Vec<Shockwave>,
    beams: &mut Vec<LightningBeam>,
    recoil: &mut HashMap<EntityId, Vec<f32>>,
) {
    match event {
        VisualEvent::Explosion { position, radius, color } => {
            let color = ctx.color(color);
            particles.spawn_explosion(ctx.rng, position, radius, color);
            if radius >= EXPLOSION_SHOCKWAVE_RADIUS {
                shockwaves.push(Shockwave::new(position, radius * 1.5, color));
            }
        }
        VisualEvent::Impact { position, direction, color } => {
            let color = ctx.color(color);
            particles.spawn_impact(ctx.rng, position, direction, color);
        }
        VisualEvent::Damage { position, amount, critical } => {
            if ctx.settings.graphics.damage_numbers {
                particles.spawn_damage_number(ctx.rng, position, amount, critical);
            }
        }
        VisualEvent::MuzzleFlash { entity, barrel, position, direction } => {
            particles.spawn_muzzle_flash(ctx.rng, position, direction, Color::hex(0xFF_D1_80_FF));
            particles.spawn_casing(ctx.rng, position, direction);
            if barrel < 64 {
                let slots = recoil.entry(entity).or_default();
                if slots.len() <= barrel {
                    slots.resize(barrel + 1, 0.0);
                }
                slots[barrel] = 1.0;
            }
        }
        VisualEvent::Lightning { from, to, color } => {
            beams.push(LightningBeam { from, to, color: ctx.color(color) });
        }
        VisualEvent::Shockwave { origin, max_radius, color } => {
            shockwaves.push(Shockwave::new(origin, max_radius, ctx.color(color)));
        }
        VisualEvent::Debris { position, count, color } => {
            let color = ctx.color(color);
            particles.spawn_debris(ctx.rng, position, count, color);
        }
        VisualEvent::CodeBurst { position, count } => {
            particles.spawn_code_burst(ctx.rng, position, count);
        }
    }
}

fn decay_recoil(recoil: &mut HashMap<EntityId, Vec<f32>>) {
    recoil.retain(|_, slots| {
        let mut any = false;
        for v in slots.iter_mut() {
            *v *= RECOIL_DECAY;
            if *v < RECOIL_EPSILON {
                *v = 0.0;
            } else {
                any = true;
            }
        }
        any
    });
}
