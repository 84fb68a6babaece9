//! # Tank Compositor
//!
//! Draws one weapon-bearing entity: barrels first, chassis on top.
//!
//! ```text
//!   translate(screen) ─► rotate(facing)
//!        │
//!        ├─ for each barrel: rotate(angle) ─► offset ─► recoil shift ─► decorator
//!        └─ chassis
//! ```
//!
//! Barrel dimensions are authored for [`BASE_RADIUS`] and scaled by the
//! entity's radius. The output is a pure function of the inputs: the
//! same entity, schema, color and tick always yield the same commands.

mod barrels;
mod chassis;

pub use barrels::{BarrelArchetype, BarrelDecorator, BarrelFrame};
pub use chassis::{draw_chassis, ChassisFrame};

use ironclad_shared::{Entity, Vec2, WeaponSchema, BASE_RADIUS};

use crate::color::Color;
use crate::shapes;
use crate::surface::Surface;
use crate::texture_cache::Texture;

/// Recoil shift at full kick, as a fraction of barrel length.
const RECOIL_TRAVEL: f32 = 0.25;

/// Everything needed to draw one tank.
#[derive(Debug, Clone, Copy)]
pub struct TankDraw<'a> {
    /// The entity being drawn.
    pub entity: &'a Entity,
    /// Resolved weapon schema.
    pub schema: &'a WeaponSchema,
    /// Screen position.
    pub at: Vec2,
    /// Resolved body color.
    pub color: Color,
    /// Frame tick.
    pub tick: u64,
    /// Per-barrel recoil in `[0, 1]`; missing entries count as zero.
    pub recoil: &'a [f32],
    /// Loaded flag texture, if any.
    pub flag: Option<&'a Texture>,
}

/// Draws a tank. Returns false and draws nothing for a non-positive radius.
pub fn draw_tank(s: &mut dyn Surface, tank: &TankDraw<'_>) -> bool {
    let radius = tank.entity.safe_radius();
    if radius <= 0.0 || !tank.at.is_finite() {
        return false;
    }
    let scale = radius / BASE_RADIUS;
    let rotation = if tank.entity.rotation.is_finite() { tank.entity.rotation } else { 0.0 };

    s.save();
    s.translate(tank.at.x, tank.at.y);
    s.rotate(rotation);

    for (index, barrel) in tank.schema.barrels.iter().enumerate() {
        let length = shapes::clamp_extent(barrel.length * scale);
        let width = shapes::clamp_extent(barrel.width * scale);
        if length <= 0.0 || width <= 0.0 {
            continue;
        }
        let kick = tank.recoil.get(index).copied().unwrap_or(0.0).clamp(0.0, 1.0);
        let frame = BarrelFrame {
            length,
            width,
            accent: tank.color,
            tick: tank.tick,
            reload: tank.entity.reload,
            index,
        };
        let decorate = BarrelArchetype::select(tank.schema, barrel).decorator();

        s.save();
        s.rotate(barrel.angle);
        s.translate(-kick * RECOIL_TRAVEL * length, barrel.offset * scale);
        decorate(s, &frame);
        s.restore();
    }

    draw_chassis(
        s,
        &ChassisFrame {
            shape: tank.schema.body_shape(),
            radius,
            color: tank.color,
            tick: tank.tick,
            facing: rotation,
            flag: tank.flag,
        },
    );
    s.restore();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use ironclad_shared::{EntityKind, WeaponCatalog};

    fn tank(radius: f32) -> Entity {
        let mut e = Entity::new(1, EntityKind::Player, Vec2::new(50.0, 50.0), radius);
        e.rotation = 0.4;
        e
    }

    fn draw(entity: &Entity, schema: &WeaponSchema, recoil: &[f32]) -> RecordingSurface {
        let mut s = RecordingSurface::new(200, 200);
        draw_tank(
            &mut s,
            &TankDraw {
                entity,
                schema,
                at: Vec2::new(100.0, 100.0),
                color: Color::hex(0x00_B2_E1_FF),
                tick: 30,
                recoil,
                flag: None,
            },
        );
        s
    }

    #[test]
    fn test_every_archetype_draws_balanced() {
        let catalog = WeaponCatalog::builtin();
        let entity = tank(22.0);
        for schema in catalog.iter().chain(std::iter::once(catalog.default_schema())) {
            let s = draw(&entity, schema, &[]);
            assert!(s.fill_count() > 0, "{}", schema.id);
            assert_eq!(s.save_depth(), 0, "{}", schema.id);
            assert_eq!(s.unbalanced_restores(), 0, "{}", schema.id);
            assert_eq!(s.invalid_geometry(), 0, "{}", schema.id);
        }
    }

    #[test]
    fn test_zero_radius_draws_nothing() {
        let catalog = WeaponCatalog::builtin();
        let s = draw(&tank(0.0), catalog.resolve(Some("twin")), &[]);
        assert!(s.commands().is_empty());
    }

    #[test]
    fn test_same_inputs_same_commands() {
        let catalog = WeaponCatalog::builtin();
        let schema = catalog.resolve(Some("tesla"));
        let a = draw(&tank(20.0), schema, &[0.5]);
        let b = draw(&tank(20.0), schema, &[0.5]);
        assert_eq!(a.commands(), b.commands());
    }

    #[test]
    fn test_recoil_shifts_barrel_back() {
        let catalog = WeaponCatalog::builtin();
        let schema = catalog.default_schema();
        let shifts = |recoil: &[f32]| -> Vec<f32> {
            draw(&tank(20.0), schema, recoil)
                .commands()
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Translate { x, .. } => Some(*x),
                    _ => None,
                })
                .collect()
        };
        let rest = shifts(&[]);
        let kicked = shifts(&[1.0]);
        assert_eq!(rest[1], 0.0);
        assert!((kicked[1] + 38.0 * RECOIL_TRAVEL).abs() < 1e-4);
    }

    #[test]
    fn test_barrels_scale_with_radius() {
        let catalog = WeaponCatalog::builtin();
        let schema = catalog.default_schema();
        let widest = |radius: f32| {
            draw(&tank(radius), schema, &[])
                .commands()
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Rect { bounds } => Some(bounds.width),
                    _ => None,
                })
                .fold(0.0_f32, f32::max)
        };
        assert!((widest(40.0) / widest(20.0) - 2.0).abs() < 1e-3);
    }
}
