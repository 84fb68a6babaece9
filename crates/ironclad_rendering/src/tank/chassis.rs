//! Tank chassis.
//!
//! Layer order, bottom to top:
//!
//! ```text
//!   body fill (radial, light from top-left)
//!   flag overlay + vignette        (clipped to the body path)
//!   rim light / dark contour
//!   technical details              (hatch, rivets; not on starbursts or dozers)
//!   shape finish                   (starburst core, dozer plow)
//! ```

use ironclad_shared::{BodyShape, Rect, Vec2};

use crate::color::Color;
use crate::shapes;
use crate::surface::{ColorStop, CompositeMode, Paint, Surface};
use crate::texture_cache::Texture;

/// Radians per tick of the starburst spin.
const STARBURST_SPIN: f32 = 0.01;

/// Inputs of the chassis layer.
#[derive(Debug, Clone, Copy)]
pub struct ChassisFrame<'a> {
    /// Silhouette.
    pub shape: BodyShape,
    /// Body radius in pixels.
    pub radius: f32,
    /// Resolved body color.
    pub color: Color,
    /// Frame tick.
    pub tick: u64,
    /// Facing already applied by the caller's transform. Starbursts undo
    /// it so their spin only follows the tick.
    pub facing: f32,
    /// Loaded flag texture, if any.
    pub flag: Option<&'a Texture>,
}

const fn is_starburst(shape: BodyShape) -> bool {
    matches!(shape, BodyShape::Spike | BodyShape::Obsidian)
}

/// Builds the chassis outline at the origin.
fn chassis_path(s: &mut dyn Surface, frame: &ChassisFrame<'_>, radius: f32) -> bool {
    match frame.shape {
        BodyShape::Dozer => shapes::rounded_rect(
            s,
            Rect::new(-radius, -radius * 0.85, radius * 2.0, radius * 1.7),
            radius * 0.3,
        ),
        shape => {
            let spin = if is_starburst(shape) {
                frame.tick as f32 * STARBURST_SPIN - frame.facing
            } else {
                0.0
            };
            shapes::body_path(s, shape, radius, spin)
        }
    }
}

/// Draws the chassis centered on the origin. Returns false and draws
/// nothing for a non-positive radius.
pub fn draw_chassis(s: &mut dyn Surface, frame: &ChassisFrame<'_>) -> bool {
    let r = shapes::clamp_extent(frame.radius);
    if r <= 0.0 {
        return false;
    }
    let base = if frame.shape == BodyShape::Obsidian {
        frame.color.lerp(Color::hex(0x12_0A_1F_FF), 0.7)
    } else {
        frame.color
    };

    if frame.shape == BodyShape::Dozer {
        draw_plow(s, r);
    }

    // Body fill.
    let stops = [
        ColorStop::new(0.0, base.lighten(0.45)),
        ColorStop::new(0.55, base),
        ColorStop::new(1.0, base.darken(0.45)),
    ];
    if !chassis_path(s, frame, r) {
        return false;
    }
    s.fill(&Paint::Radial {
        inner_center: Vec2::new(-r * 0.35, -r * 0.35),
        inner_radius: 0.0,
        outer_center: Vec2::ZERO,
        outer_radius: r * 1.3,
        stops: &stops,
    });

    if let Some(flag) = frame.flag {
        draw_flag(s, frame, flag, r);
    }

    // Rim light then contour.
    s.save();
    s.set_alpha(0.45);
    if chassis_path(s, frame, r * 0.9) {
        s.stroke(&Paint::Solid(base.lighten(0.6)), 1.5);
    }
    s.restore();
    if chassis_path(s, frame, r) {
        s.stroke(&Paint::Solid(Color::STEEL_DARK), 3.0);
    }

    match frame.shape {
        BodyShape::Spike | BodyShape::Obsidian => draw_starburst_core(s, frame, r),
        BodyShape::Dozer => draw_exhaust(s, r),
        _ => draw_details(s, base, r),
    }
    true
}

fn draw_flag(s: &mut dyn Surface, frame: &ChassisFrame<'_>, flag: &Texture, r: f32) {
    // Letterbox to the flag's aspect inside the body.
    let aspect = flag.aspect().max(0.1);
    let width = r * 2.0;
    let height = width / aspect;
    let dest = Rect::new(-width * 0.5, -height * 0.5, width, height);
    s.save();
    s.set_alpha(0.85);
    shapes::clipped_image(s, flag, dest, |s| chassis_path(s, frame, r));
    s.restore();

    let vignette = [
        ColorStop::new(0.0, Color::TRANSPARENT),
        ColorStop::new(0.7, Color::BLACK.with_alpha(0.15)),
        ColorStop::new(1.0, Color::BLACK.with_alpha(0.55)),
    ];
    let shading = [
        ColorStop::new(0.0, Color::WHITE.with_alpha(0.25)),
        ColorStop::new(0.5, Color::TRANSPARENT),
        ColorStop::new(1.0, Color::BLACK.with_alpha(0.35)),
    ];
    s.save();
    if chassis_path(s, frame, r) {
        s.clip();
        if shapes::rect(s, Rect::new(-r * 1.5, -r * 1.5, r * 3.0, r * 3.0)) {
            s.fill(&Paint::Radial {
                inner_center: Vec2::ZERO,
                inner_radius: 0.0,
                outer_center: Vec2::ZERO,
                outer_radius: r,
                stops: &vignette,
            });
            s.fill(&Paint::Linear {
                from: Vec2::new(-r, -r),
                to: Vec2::new(r, r),
                stops: &shading,
            });
        }
    }
    s.restore();
}

fn draw_details(s: &mut dyn Surface, base: Color, r: f32) {
    let dark = base.darken(0.5).with_alpha(0.6);
    // Hatch ring.
    if shapes::circle(s, 0.0, 0.0, r * 0.38) {
        s.stroke(&Paint::Solid(dark), 1.5);
    }
    // Cross hatch.
    s.begin_path();
    s.move_to(-r * 0.2, 0.0);
    s.line_to(r * 0.2, 0.0);
    s.move_to(0.0, -r * 0.2);
    s.line_to(0.0, r * 0.2);
    s.stroke(&Paint::Solid(dark), 1.0);
    // Rivets.
    let bolt = (r * 0.06).max(1.0);
    for (dx, dy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        if shapes::circle(s, dx * r * 0.55, dy * r * 0.55, bolt) {
            s.fill(&Paint::Solid(Color::GUNMETAL.lighten(0.35)));
            s.stroke(&Paint::Solid(Color::STEEL_DARK), 0.6);
        }
    }
}

fn draw_starburst_core(s: &mut dyn Surface, frame: &ChassisFrame<'_>, r: f32) {
    let glow = if frame.shape == BodyShape::Obsidian {
        Color::hex(0xB3_88_FF_FF)
    } else {
        Color::hex(0xFF_6D_00_FF)
    };
    let pulse = ((frame.tick as f32 * 0.08).sin() * 0.5 + 0.5) * 0.3 + 0.7;
    let stops = [
        ColorStop::new(0.0, Color::WHITE),
        ColorStop::new(0.4, glow),
        ColorStop::new(1.0, glow.with_alpha(0.0)),
    ];
    s.save();
    s.set_composite(CompositeMode::Lighter);
    s.set_alpha(pulse);
    if shapes::circle(s, 0.0, 0.0, r * 0.5) {
        s.fill(&Paint::Radial {
            inner_center: Vec2::ZERO,
            inner_radius: 0.0,
            outer_center: Vec2::ZERO,
            outer_radius: r * 0.5,
            stops: &stops,
        });
    }
    s.restore();
}

fn draw_plow(s: &mut dyn Surface, r: f32) {
    s.begin_path();
    s.move_to(r * 0.9, -r * 1.2);
    s.quad_to(r * 1.45, 0.0, r * 0.9, r * 1.2);
    s.line_to(r * 1.15, r * 1.2);
    s.quad_to(r * 1.75, 0.0, r * 1.15, -r * 1.2);
    s.close_path();
    s.fill(&Paint::Solid(Color::HAZARD.darken(0.15)));
    s.stroke(&Paint::Solid(Color::STEEL_DARK), 2.0);
}

fn draw_exhaust(s: &mut dyn Surface, r: f32) {
    for dy in [-0.45, 0.45] {
        if shapes::rounded_rect(s, Rect::new(-r * 0.75, r * dy - r * 0.12, r * 0.3, r * 0.24), r * 0.05) {
            s.fill(&Paint::Solid(Color::STEEL_DARK));
            s.stroke(&Paint::Solid(Color::GUNMETAL.lighten(0.2)), 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn frame(shape: BodyShape) -> ChassisFrame<'static> {
        ChassisFrame {
            shape,
            radius: 20.0,
            color: Color::hex(0x00_B2_E1_FF),
            tick: 12,
            facing: 0.0,
            flag: None,
        }
    }

    #[test]
    fn test_every_shape_draws_balanced() {
        for &shape in BodyShape::ALL.iter().chain([BodyShape::Unknown].iter()) {
            let mut s = RecordingSurface::new(100, 100);
            assert!(draw_chassis(&mut s, &frame(shape)), "{shape:?}");
            assert_eq!(s.save_depth(), 0);
            assert_eq!(s.invalid_geometry(), 0);
        }
    }

    #[test]
    fn test_zero_radius_draws_nothing() {
        for radius in [0.0, -3.0, f32::NAN] {
            let mut s = RecordingSurface::new(100, 100);
            assert!(!draw_chassis(&mut s, &ChassisFrame { radius, ..frame(BodyShape::Circle) }));
            assert!(s.commands().is_empty());
        }
    }

    #[test]
    fn test_starburst_skips_rivets() {
        let count_arcs = |shape| {
            let mut s = RecordingSurface::new(100, 100);
            draw_chassis(&mut s, &frame(shape));
            s.count(|c| matches!(c, DrawCommand::Arc { .. }))
        };
        // Hatch ring plus four rivets on the plain hull.
        assert!(count_arcs(BodyShape::Hexagon) >= 5);
        assert_eq!(count_arcs(BodyShape::Spike), 1);
    }

    #[test]
    fn test_starburst_spin_ignores_facing() {
        let first_vertex = |facing: f32| {
            let mut s = RecordingSurface::new(100, 100);
            draw_chassis(&mut s, &ChassisFrame { facing, ..frame(BodyShape::Spike) });
            s.commands()
                .iter()
                .find_map(|c| match c {
                    DrawCommand::MoveTo { x, y } => Some(Vec2::new(*x, *y)),
                    _ => None,
                })
                .unwrap()
        };
        let unturned = first_vertex(0.0);
        let facing = 0.7;
        // Re-apply the caller's rotation: the world-space vertex must not move.
        let local = first_vertex(facing);
        let world = Vec2::new(
            local.x * facing.cos() - local.y * facing.sin(),
            local.x * facing.sin() + local.y * facing.cos(),
        );
        assert!(world.distance(unturned) < 1e-3, "{world:?} vs {unturned:?}");
    }

    #[test]
    fn test_flag_is_clipped() {
        let tex = Texture::solid(80, 40, [200, 10, 10, 255]);
        let mut s = RecordingSurface::new(100, 100);
        draw_chassis(&mut s, &ChassisFrame { flag: Some(&tex), ..frame(BodyShape::Circle) });
        let cmds = s.commands();
        let image = cmds.iter().position(|c| matches!(c, DrawCommand::Image { .. }));
        let clip = cmds.iter().position(|c| matches!(c, DrawCommand::Clip));
        assert!(matches!((clip, image), (Some(c), Some(i)) if c < i));
        assert_eq!(s.save_depth(), 0);
    }
}
