//! # Synthetic Arena Replay
//!
//! A seeded stand-in for the simulation: spawns tanks, food, walls and
//! zones, moves them each tick and emits the visual events a real match
//! would. Feeds the `arena_replay` binary and the host tests.
//!
//! ```text
//! step(frame):
//!   move entities, bounce at the map edge
//!   advance skills and reload
//!   camera follows the local tank, shake decays
//!   every few frames: muzzle flashes, impacts, damage, explosions
//! ```

use ironclad_rendering::{FrameInput, FrameRng, VisualEventSender};
use ironclad_shared::{
    BodyShape, Camera, ColorToken, Entity, EntityId, EntityKind, PointerState, Settings, SkillState, StatusEffect,
    TrailStyle, Vec2, Viewport, VisualEvent, WeaponCatalog, WorldSnapshot,
};
use tracing::debug;

/// Flag keys handed to tanks.
const FLAGS: [&str; 6] = ["de", "fr", "jp", "br", "se", "ca"];
/// Names handed to tanks.
const NAMES: [&str; 8] = ["Bastion", "Nova", "Rook", "Vesper", "Kite", "Anvil", "Echo", "Lark"];
/// Walls along the map edge per side.
const WALLS_PER_SIDE: usize = 4;
/// Camera shake added per explosion.
const SHAKE_PER_EXPLOSION: f32 = 6.0;
/// Camera shake retained per frame.
const SHAKE_DECAY: f32 = 0.9;

/// Replay parameters.
#[derive(Clone, Debug)]
pub struct ReplayConfig {
    /// Frames to render.
    pub frames: u64,
    /// Dynamic entities to spawn (tanks and food).
    pub entities: usize,
    /// Seed for the arena and the compositor.
    pub seed: u64,
    /// Logical viewport.
    pub viewport: Viewport,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            entities: 120,
            seed: 7,
            viewport: Viewport::new(1280.0, 720.0),
        }
    }
}

/// Seeded arena state advanced once per frame.
pub struct ReplayArena {
    snapshot: WorldSnapshot,
    catalog: WeaponCatalog,
    settings: Settings,
    camera: Camera,
    viewport: Viewport,
    pointer: PointerState,
    rng: FrameRng,
}

impl ReplayArena {
    /// Builds the arena for `config`. Local player is entity 0.
    #[must_use]
    pub fn new(config: &ReplayConfig, catalog: WeaponCatalog, settings: Settings) -> Self {
        let mut rng = FrameRng::seeded(config.seed ^ 0xA5A5_5A5A);
        let snapshot = populate(config.entities, &catalog, &mut rng);
        let center = snapshot.entity(0).map_or(Vec2::ZERO, |e| e.position);
        debug!(entities = snapshot.entities.len(), weapons = catalog.len(), "replay arena built");
        Self {
            snapshot,
            catalog,
            settings,
            camera: Camera::new(center),
            viewport: config.viewport,
            pointer: PointerState {
                position: config.viewport.half_size() + Vec2::new(120.0, -40.0),
                ..PointerState::default()
            },
            rng,
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &WorldSnapshot {
        &self.snapshot
    }

    /// Current camera.
    #[must_use]
    pub const fn camera(&self) -> Camera {
        self.camera
    }

    /// Inputs for the compositor.
    #[must_use]
    pub fn input(&self) -> FrameInput<'_> {
        FrameInput {
            snapshot: &self.snapshot,
            settings: &self.settings,
            catalog: &self.catalog,
            camera: self.camera,
            viewport: self.viewport,
            pointer: self.pointer,
        }
    }

    /// Advances one tick and queues this tick's visual events.
    pub fn step(&mut self, frame: u64, events: &VisualEventSender) {
        let half = self.snapshot.map.size * 0.5;
        self.snapshot.tick = frame;

        for e in &mut self.snapshot.entities {
            match e.kind {
                EntityKind::Wall | EntityKind::Zone => continue,
                EntityKind::Food => e.rotation += 0.01,
                _ => {}
            }
            e.position += e.velocity;
            let r = e.safe_radius();
            if e.position.x.abs() > half - r {
                e.velocity.x = -e.velocity.x;
                e.position.x = e.position.x.clamp(-half + r, half - r);
            }
            if e.position.y.abs() > half - r {
                e.velocity.y = -e.velocity.y;
                e.position.y = e.position.y.clamp(-half + r, half - r);
            }
            if e.kind.is_tank() {
                e.rotation = e.velocity.angle();
                e.reload = (e.reload + 1.0 / 45.0).min(1.0);
                if let Some(skill) = e.skill.as_mut() {
                    advance_skill(skill, frame);
                }
            }
        }

        self.emit_events(frame, events);
        self.follow_local();
    }

    fn emit_events(&mut self, frame: u64, events: &VisualEventSender) {
        let rng = &mut self.rng;
        let mut dropped = 0usize;
        let mut send = |event: VisualEvent| {
            if !events.send(event) {
                dropped += 1;
            }
        };

        for e in self.snapshot.entities.iter_mut().filter(|e| e.kind.is_tank()) {
            // Tanks fire on a staggered eight-frame cadence.
            if (frame + e.id) % 8 != 0 {
                continue;
            }
            let barrels = self.catalog.resolve(e.weapon_id.as_deref()).barrels.len();
            let muzzle = e.position + Vec2::from_angle(e.rotation) * (e.safe_radius() * 1.8);
            for barrel in 0..barrels {
                send(VisualEvent::MuzzleFlash {
                    entity: e.id,
                    barrel,
                    position: muzzle,
                    direction: e.rotation,
                });
            }
            e.reload = 0.0;
            if rng.chance(0.3) {
                let hit = muzzle + Vec2::from_angle(e.rotation) * rng.range(80.0, 240.0);
                send(VisualEvent::Impact {
                    position: hit,
                    direction: e.rotation,
                    color: ColorToken::Warning,
                });
                send(VisualEvent::Damage {
                    position: hit,
                    amount: rng.range(5.0, 60.0).round(),
                    critical: rng.chance(0.1),
                });
            }
        }

        if frame % 45 == 20 {
            let at = self.camera.center + Vec2::new(rng.signed() * 300.0, rng.signed() * 200.0);
            send(VisualEvent::Explosion {
                position: at,
                radius: rng.range(30.0, 70.0),
                color: ColorToken::Orange,
            });
            send(VisualEvent::Debris {
                position: at,
                count: 6,
                color: ColorToken::Gray,
            });
            self.camera.shake += SHAKE_PER_EXPLOSION;
        }
        if frame % 60 == 30 {
            let from = self.camera.center + Vec2::new(-150.0, rng.signed() * 80.0);
            send(VisualEvent::Lightning {
                from,
                to: from + Vec2::new(300.0, rng.signed() * 60.0),
                color: ColorToken::Cyan,
            });
            send(VisualEvent::CodeBurst {
                position: from,
                count: 12,
            });
        }
        if frame % 90 == 0 {
            send(VisualEvent::Shockwave {
                origin: self.camera.center,
                max_radius: 160.0,
                color: ColorToken::Accent,
            });
        }

        if dropped > 0 {
            debug!(dropped, "visual events dropped, queue full");
        }
    }

    fn follow_local(&mut self) {
        if let Some(local) = self.snapshot.local_player.and_then(|id| self.snapshot.entity(id)) {
            self.camera.center = self.camera.center.lerp(local.position, 0.2);
        }
        self.camera.shake *= SHAKE_DECAY;
        if self.camera.shake < 0.1 {
            self.camera.shake = 0.0;
        }
    }
}

fn advance_skill(skill: &mut SkillState, frame: u64) {
    if skill.active {
        skill.elapsed += 1.0 / 60.0;
        if skill.elapsed >= skill.duration {
            skill.active = false;
            skill.elapsed = 0.0;
        }
    } else if frame % 240 == 0 {
        skill.active = true;
    }
}

/// Seeded arena: tanks and food in the map, walls along the edges, two zones.
fn populate(count: usize, catalog: &WeaponCatalog, rng: &mut FrameRng) -> WorldSnapshot {
    let mut snapshot = WorldSnapshot::default();
    let half = snapshot.map.size * 0.5;
    let mut weapons: Vec<&str> = catalog.iter().map(|w| w.id.as_str()).collect();
    // Catalog iteration order is unspecified.
    weapons.sort_unstable();
    weapons.push(catalog.default_schema().id.as_str());
    let mut next_id: EntityId = 0;
    let mut id = || {
        let current = next_id;
        next_id += 1;
        current
    };

    let tanks = (count / 4).max(1);
    for i in 0..count {
        let position = Vec2::new(rng.signed() * half * 0.8, rng.signed() * half * 0.8);
        let e = if i < tanks {
            let mut e = Entity::new(id(), if i == 0 { EntityKind::Player } else { EntityKind::Enemy }, position, 22.0);
            e.velocity = Vec2::from_angle(rng.range(0.0, std::f32::consts::TAU)) * rng.range(1.0, 3.0);
            e.color = if i == 0 { ColorToken::Friendly } else { ColorToken::Hostile };
            e.weapon_id = Some(weapons[rng.index(weapons.len())].to_owned());
            e.max_health = 100.0;
            e.health = rng.range(20.0, 100.0);
            e.depth = 2;
            e.name = Some(NAMES[i % NAMES.len()].to_owned());
            e.flag = Some(FLAGS[rng.index(FLAGS.len())].to_owned());
            e.trail = Some([TrailStyle::Sparks, TrailStyle::Pixels, TrailStyle::Code, TrailStyle::Smoke][i % 4]);
            e.skill = catalog.resolve(e.weapon_id.as_deref()).skill.as_ref().map(|desc| SkillState {
                active: false,
                elapsed: 0.0,
                duration: desc.duration,
            });
            if rng.chance(0.2) {
                e.status_effects.push(StatusEffect::Burning);
            }
            if i % 5 == 1 {
                e.chat = Some("gg".to_owned());
            }
            e
        } else {
            let shapes = [BodyShape::Square, BodyShape::Triangle, BodyShape::Pentagon, BodyShape::Diamond];
            let shape = shapes[rng.index(shapes.len())];
            let mut e = Entity::new(id(), EntityKind::Food, position, rng.range(8.0, 18.0));
            e.shape = Some(shape);
            e.color = ColorToken::Yellow;
            e.max_health = if shape == BodyShape::Pentagon { 250.0 } else { 50.0 };
            e.health = e.max_health;
            e
        };
        snapshot.entities.push(e);
    }

    for k in 0..WALLS_PER_SIDE {
        let t = (k as f32 + 0.5) / WALLS_PER_SIDE as f32 * 2.0 - 1.0;
        for position in [Vec2::new(t * half, -half + 40.0), Vec2::new(t * half, half - 40.0)] {
            let mut wall = Entity::new(id(), EntityKind::Wall, position, 0.0);
            wall.size = Some(Vec2::new(half / WALLS_PER_SIDE as f32, 40.0));
            wall.depth = -1;
            snapshot.entities.push(wall);
        }
    }
    for (position, color) in [
        (Vec2::new(-half * 0.4, 0.0), ColorToken::Green),
        (Vec2::new(half * 0.4, 0.0), ColorToken::Red),
    ] {
        let mut zone = Entity::new(id(), EntityKind::Zone, position, 0.0);
        zone.size = Some(Vec2::new(300.0, 300.0));
        zone.color = color;
        zone.depth = -2;
        snapshot.entities.push(zone);
    }

    snapshot.local_player = Some(0);
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironclad_rendering::VisualEventQueue;

    fn arena(seed: u64) -> ReplayArena {
        let config = ReplayConfig {
            entities: 40,
            seed,
            ..ReplayConfig::default()
        };
        ReplayArena::new(&config, WeaponCatalog::builtin(), Settings::default())
    }

    #[test]
    fn test_arena_is_seeded() {
        assert_eq!(arena(3).snapshot(), arena(3).snapshot());
        assert_ne!(arena(3).snapshot(), arena(4).snapshot());
    }

    #[test]
    fn test_arena_layout() {
        let a = arena(1);
        let s = a.snapshot();
        assert_eq!(s.local_player, Some(0));
        assert_eq!(s.entity(0).map(|e| e.kind), Some(EntityKind::Player));
        assert_eq!(s.entities.iter().filter(|e| e.kind == EntityKind::Wall).count(), WALLS_PER_SIDE * 2);
        assert_eq!(s.entities.iter().filter(|e| e.kind.is_tank()).count(), 10);
    }

    #[test]
    fn test_step_stays_in_map_and_emits_events() {
        let mut a = arena(2);
        let queue = VisualEventQueue::new(4096);
        let sender = queue.sender();
        for frame in 0..120 {
            a.step(frame, &sender);
        }
        let half = a.snapshot().map.size * 0.5;
        for e in &a.snapshot().entities {
            assert!(e.position.x.abs() <= half && e.position.y.abs() <= half, "{:?}", e.position);
        }
        assert!(queue.receiver().pending_count() > 0);
    }
}
