//! Lightning beams.

use ironclad_shared::Vec2;

use crate::color::Color;
use crate::context::FrameRng;
use crate::surface::{CompositeMode, Paint, Surface};

/// Perpendicular jitter of each joint, in pixels.
const JITTER: f32 = 12.0;
/// Probability of a side branch.
const BRANCH_CHANCE: f32 = 0.3;

/// A queued beam between two world points, drawn for exactly one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightningBeam {
    /// World start.
    pub from: Vec2,
    /// World end.
    pub to: Vec2,
    /// Tint.
    pub color: Color,
}

/// Draws a jittered polyline from `from` to `to` (screen space), with at
/// most one branch. Returns whether a branch was drawn.
pub fn draw_lightning(s: &mut dyn Surface, rng: &mut FrameRng, from: Vec2, to: Vec2, color: Color) -> bool {
    if !from.is_finite() || !to.is_finite() {
        return false;
    }
    let span = to - from;
    let length = span.length();
    if length <= f32::EPSILON {
        return false;
    }
    let segments = ((length / 20.0) as u32).clamp(4, 24);
    let normal = span.normalized().perp();

    s.save();
    s.set_composite(CompositeMode::Lighter);

    // Joints are regenerated per pass from a saved stream so glow and core
    // follow the same path.
    let seed_rng = rng.clone();
    for (width, alpha, paint) in [(8.0, 0.3, color), (2.0, 1.0, Color::WHITE)] {
        let mut joints = seed_rng.clone();
        s.set_alpha(alpha);
        s.begin_path();
        s.move_to(from.x, from.y);
        for i in 1..segments {
            let t = i as f32 / segments as f32;
            let p = from.lerp(to, t) + normal * (joints.signed() * JITTER);
            s.line_to(p.x, p.y);
        }
        s.line_to(to.x, to.y);
        s.stroke(&Paint::Solid(paint), width);
    }

    // Advance the caller's stream past the joints.
    for _ in 1..segments {
        rng.signed();
    }

    let branched = rng.chance(BRANCH_CHANCE);
    if branched {
        let t = rng.range(0.3, 0.7);
        let start = from.lerp(to, t);
        let dir = Vec2::from_angle(span.angle() + rng.signed() * 0.8);
        let reach = length * rng.range(0.2, 0.35);
        s.set_alpha(0.7);
        s.begin_path();
        s.move_to(start.x, start.y);
        let steps = 4;
        for i in 1..=steps {
            let p = start + dir * (reach * i as f32 / steps as f32) + normal * (rng.signed() * JITTER * 0.5);
            s.line_to(p.x, p.y);
        }
        s.stroke(&Paint::Solid(color.lighten(0.4)), 1.5);
    }

    s.restore();
    branched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn test_endpoints_are_exact() {
        let mut s = RecordingSurface::new(500, 500);
        let mut rng = FrameRng::seeded(2);
        draw_lightning(&mut s, &mut rng, Vec2::new(10.0, 10.0), Vec2::new(300.0, 40.0), Color::WHITE);
        assert!(s.commands().contains(&DrawCommand::MoveTo { x: 10.0, y: 10.0 }));
        assert!(s.commands().contains(&DrawCommand::LineTo { x: 300.0, y: 40.0 }));
        assert_eq!(s.save_depth(), 0);
    }

    #[test]
    fn test_zero_length_draws_nothing() {
        let mut s = RecordingSurface::new(500, 500);
        let mut rng = FrameRng::seeded(2);
        assert!(!draw_lightning(&mut s, &mut rng, Vec2::ZERO, Vec2::ZERO, Color::WHITE));
        assert!(s.commands().is_empty());
    }

    #[test]
    fn test_branch_is_probabilistic_but_seeded() {
        let mut branches = 0;
        let mut rng = FrameRng::seeded(99);
        for _ in 0..200 {
            let mut s = RecordingSurface::new(500, 500);
            if draw_lightning(&mut s, &mut rng, Vec2::ZERO, Vec2::new(200.0, 0.0), Color::WHITE) {
                branches += 1;
            }
        }
        assert!(branches > 20 && branches < 120, "branches = {branches}");
    }
}
