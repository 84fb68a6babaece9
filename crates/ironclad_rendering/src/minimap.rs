//! # Minimap Projector
//!
//! Draws a filtered overview of the world on its own small surface.
//!
//! The world is a square of edge `map.size` centered on the origin, so a
//! world point projects as:
//!
//! ```text
//!   scale = surface_width / map.size
//!   x = surface_width  / 2 + world.x * scale
//!   y = surface_height / 2 + world.y * scale
//! ```
//!
//! Bullets, drones, missiles, traps, lasers and simulation particles are
//! filtered out before any projection work.

use ironclad_shared::{ColorblindMode, Entity, EntityId, EntityKind, Rect, Settings, Vec2, WorldSnapshot};

use crate::color::{self, Color};
use crate::shapes;
use crate::surface::{Paint, Surface};

/// Enemies at or above this max health are shown.
pub const NOTABLE_ENEMY_HEALTH: f32 = 500.0;
/// Food at or above this max health counts as high value.
pub const HIGH_VALUE_FOOD_HEALTH: f32 = 200.0;

/// Smallest marker radius in minimap pixels.
const MIN_MARKER: f32 = 1.5;

/// Per-call minimap counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimapStats {
    /// Markers drawn.
    pub drawn: usize,
    /// Entities rejected by the category filter.
    pub filtered: usize,
}

/// Minimap renderer. Remembers the last opacity written to its surface.
#[derive(Debug, Default)]
pub struct MinimapProjector {
    applied_opacity: Option<f32>,
}

impl MinimapProjector {
    /// Creates a projector that has not written any opacity yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// World-to-minimap scale factor.
    #[must_use]
    pub fn scale(surface_width: f32, map_size: f32) -> f32 {
        if surface_width > 0.0 && map_size > 0.0 && map_size.is_finite() {
            surface_width / map_size
        } else {
            0.0
        }
    }

    /// Projects a world point onto a `surface` sized minimap.
    #[must_use]
    pub fn project(world: Vec2, surface: Vec2, map_size: f32) -> Vec2 {
        let scale = Self::scale(surface.x, map_size);
        Vec2::new(surface.x * 0.5 + world.x * scale, surface.y * 0.5 + world.y * scale)
    }

    /// Category filter. `local` is the locally controlled entity id.
    #[must_use]
    pub fn includes(entity: &Entity, local: Option<EntityId>) -> bool {
        match entity.kind {
            EntityKind::Wall | EntityKind::Zone | EntityKind::Player | EntityKind::Boss => true,
            EntityKind::Enemy => {
                entity.max_health >= NOTABLE_ENEMY_HEALTH
                    || entity.name.is_some()
                    || Some(entity.id) == local
            }
            EntityKind::Food => entity.max_health >= HIGH_VALUE_FOOD_HEALTH,
            EntityKind::Projectile
            | EntityKind::Laser
            | EntityKind::Missile
            | EntityKind::Trap
            | EntityKind::Drone
            | EntityKind::Particle => false,
        }
    }

    /// Renders the minimap. `view` is the local player's visible world
    /// rectangle, outlined on top of the markers.
    pub fn render(
        &mut self,
        s: &mut dyn Surface,
        snapshot: &WorldSnapshot,
        settings: &Settings,
        view: Rect,
    ) -> MinimapStats {
        let opacity = settings.interface.minimap_opacity;
        if self.applied_opacity != Some(opacity) {
            s.set_element_opacity(opacity);
            self.applied_opacity = Some(opacity);
        }

        let mut stats = MinimapStats::default();
        let (w, h) = s.size();
        let size = Vec2::new(w as f32, h as f32);
        let map_size = snapshot.map.size;
        let scale = Self::scale(size.x, map_size);
        if scale <= 0.0 || size.y <= 0.0 {
            return stats;
        }

        s.clear(Color::BLACK.with_alpha(0.55));
        if shapes::rect(s, Rect::new(0.5, 0.5, size.x - 1.0, size.y - 1.0)) {
            s.stroke(&Paint::Solid(Color::WHITE.with_alpha(0.35)), 1.0);
        }

        let mode = settings.accessibility.colorblind;
        let local = snapshot.local_player;
        for entity in &snapshot.entities {
            if !Self::includes(entity, local) {
                stats.filtered += 1;
                continue;
            }
            let at = Self::project(entity.position, size, map_size);
            if !at.is_finite() {
                continue;
            }
            if draw_marker(s, entity, at, scale, mode, Some(entity.id) == local) {
                stats.drawn += 1;
            }
        }

        let corner = Self::project(Vec2::new(view.x, view.y), size, map_size);
        let outline = Rect::new(corner.x, corner.y, view.width * scale, view.height * scale);
        if shapes::rect(s, outline) {
            s.stroke(&Paint::Solid(Color::WHITE.with_alpha(0.8)), 1.0);
        }
        stats
    }
}

fn draw_marker(
    s: &mut dyn Surface,
    entity: &Entity,
    at: Vec2,
    scale: f32,
    mode: ColorblindMode,
    is_local: bool,
) -> bool {
    let tint = color::resolve(entity.color, mode);
    match entity.kind {
        EntityKind::Wall | EntityKind::Zone => {
            let bounds = entity.bounds();
            let rect = Rect::new(
                at.x - bounds.width * scale * 0.5,
                at.y - bounds.height * scale * 0.5,
                (bounds.width * scale).max(1.0),
                (bounds.height * scale).max(1.0),
            );
            let fill = if entity.kind == EntityKind::Wall {
                Color::GUNMETAL.with_alpha(0.9)
            } else {
                tint.with_alpha(0.3)
            };
            if !shapes::rect(s, rect) {
                return false;
            }
            s.fill(&Paint::Solid(fill));
            true
        }
        EntityKind::Boss => {
            let r = (entity.safe_radius() * scale).max(MIN_MARKER * 2.5);
            if !shapes::polygon(s, at.x, at.y, r, 6, 0.0) {
                return false;
            }
            s.fill(&Paint::Solid(tint));
            s.stroke(&Paint::Solid(Color::WHITE), 1.0);
            true
        }
        _ => {
            let r = if is_local { MIN_MARKER * 2.0 } else { (entity.safe_radius() * scale).max(MIN_MARKER) };
            if !shapes::circle(s, at.x, at.y, r) {
                return false;
            }
            s.fill(&Paint::Solid(if is_local { Color::WHITE } else { tint }));
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn test_scale_and_edge_projection() {
        let scale = MinimapProjector::scale(200.0, 4000.0);
        assert!((scale - 0.05).abs() < 1e-6);
        let at = MinimapProjector::project(Vec2::new(2000.0, 0.0), Vec2::new(200.0, 200.0), 4000.0);
        assert!((at.x - (100.0 + 100.0)).abs() < 1e-4);
        assert!((at.y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_filter_skips_transient_kinds() {
        for kind in [
            EntityKind::Projectile,
            EntityKind::Drone,
            EntityKind::Missile,
            EntityKind::Trap,
            EntityKind::Particle,
            EntityKind::Laser,
        ] {
            assert!(!MinimapProjector::includes(&Entity::new(1, kind, Vec2::ZERO, 5.0), None));
        }
        let mut food = Entity::new(2, EntityKind::Food, Vec2::ZERO, 10.0);
        assert!(!MinimapProjector::includes(&food, None));
        food.max_health = 400.0;
        assert!(MinimapProjector::includes(&food, None));
        assert!(MinimapProjector::includes(&Entity::new(3, EntityKind::Player, Vec2::ZERO, 5.0), None));
    }

    #[test]
    fn test_opacity_written_only_on_change() {
        let mut projector = MinimapProjector::new();
        let mut s = RecordingSurface::new(200, 200);
        let snapshot = WorldSnapshot::default();
        let mut settings = Settings::default();
        let view = Rect::new(-640.0, -360.0, 1280.0, 720.0);
        projector.render(&mut s, &snapshot, &settings, view);
        projector.render(&mut s, &snapshot, &settings, view);
        assert_eq!(s.opacity_writes(), 1);
        settings.interface.minimap_opacity = 0.4;
        projector.render(&mut s, &snapshot, &settings, view);
        assert_eq!(s.opacity_writes(), 2);
        assert_eq!(s.element_opacity(), 0.4);
    }

    #[test]
    fn test_viewport_outline_is_scaled() {
        let mut s = RecordingSurface::new(200, 200);
        let snapshot = WorldSnapshot::default();
        MinimapProjector::new().render(&mut s, &snapshot, &Settings::default(), Rect::new(0.0, 0.0, 1000.0, 800.0));
        let outline = s.commands().iter().rev().find_map(|c| match c {
            DrawCommand::Rect { bounds } => Some(*bounds),
            _ => None,
        });
        assert_eq!(outline, Some(Rect::new(100.0, 100.0, 50.0, 40.0)));
    }
}
