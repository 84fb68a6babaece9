//! Path builders shared by every drawer.
//!
//! Each builder starts a fresh path and returns `false` without touching
//! the surface when the geometry is degenerate (radius or size not a
//! positive finite number). Callers fill or stroke only on `true`, so a
//! zero-radius entity draws nothing.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use ironclad_shared::{BodyShape, Rect};

use crate::surface::Surface;
use crate::texture_cache::Texture;

/// Clamps a radius or size to a drawable value: non-finite or negative → 0.
#[inline]
#[must_use]
pub fn clamp_extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Full circle.
pub fn circle(s: &mut dyn Surface, x: f32, y: f32, radius: f32) -> bool {
    let r = clamp_extent(radius);
    if r <= 0.0 {
        return false;
    }
    s.begin_path();
    s.arc(x, y, r, 0.0, TAU);
    s.close_path();
    true
}

/// Regular polygon with `sides` vertices, first vertex at `rotation`.
pub fn polygon(s: &mut dyn Surface, x: f32, y: f32, radius: f32, sides: u32, rotation: f32) -> bool {
    let r = clamp_extent(radius);
    if r <= 0.0 || sides < 3 {
        return false;
    }
    s.begin_path();
    let step = TAU / sides as f32;
    for i in 0..sides {
        let a = rotation + step * i as f32;
        let (px, py) = (x + r * a.cos(), y + r * a.sin());
        if i == 0 {
            s.move_to(px, py);
        } else {
            s.line_to(px, py);
        }
    }
    s.close_path();
    true
}

/// Star polygon alternating between `outer` and `inner` radius.
pub fn star(
    s: &mut dyn Surface,
    x: f32,
    y: f32,
    outer: f32,
    inner: f32,
    points: u32,
    rotation: f32,
) -> bool {
    let outer = clamp_extent(outer);
    let inner = clamp_extent(inner).min(outer);
    if outer <= 0.0 || points < 2 {
        return false;
    }
    s.begin_path();
    let step = TAU / (points * 2) as f32;
    for i in 0..points * 2 {
        let r = if i % 2 == 0 { outer } else { inner };
        let a = rotation + step * i as f32;
        let (px, py) = (x + r * a.cos(), y + r * a.sin());
        if i == 0 {
            s.move_to(px, py);
        } else {
            s.line_to(px, py);
        }
    }
    s.close_path();
    true
}

/// Rectangle with rounded corners; `corner` is clamped to half the short side.
pub fn rounded_rect(s: &mut dyn Surface, rect: Rect, corner: f32) -> bool {
    let w = clamp_extent(rect.width);
    let h = clamp_extent(rect.height);
    if w <= 0.0 || h <= 0.0 {
        return false;
    }
    let c = clamp_extent(corner).min(w.min(h) * 0.5);
    let (x, y) = (rect.x, rect.y);
    s.begin_path();
    s.move_to(x + c, y);
    s.line_to(x + w - c, y);
    s.quad_to(x + w, y, x + w, y + c);
    s.line_to(x + w, y + h - c);
    s.quad_to(x + w, y + h, x + w - c, y + h);
    s.line_to(x + c, y + h);
    s.quad_to(x, y + h, x, y + h - c);
    s.line_to(x, y + c);
    s.quad_to(x, y, x + c, y);
    s.close_path();
    true
}

/// Axis-aligned rectangle.
pub fn rect(s: &mut dyn Surface, rect: Rect) -> bool {
    let w = clamp_extent(rect.width);
    let h = clamp_extent(rect.height);
    if w <= 0.0 || h <= 0.0 {
        return false;
    }
    s.begin_path();
    s.rect(rect.x, rect.y, w, h);
    true
}

/// Vertex count and base rotation of polygonal body shapes.
#[must_use]
pub const fn polygon_spec(shape: BodyShape) -> Option<(u32, f32)> {
    match shape {
        BodyShape::Triangle => Some((3, 0.0)),
        BodyShape::Square => Some((4, FRAC_PI_4)),
        BodyShape::Diamond => Some((4, 0.0)),
        BodyShape::Pentagon => Some((5, -FRAC_PI_2)),
        BodyShape::Hexagon => Some((6, 0.0)),
        BodyShape::Octagon => Some((8, std::f32::consts::PI / 8.0)),
        BodyShape::Circle
        | BodyShape::Star
        | BodyShape::Spike
        | BodyShape::Obsidian
        | BodyShape::Dozer
        | BodyShape::Unknown => None,
    }
}

/// Builds the path for a body shape at the origin.
///
/// Polygons use [`polygon_spec`]; star shapes use a five-point star; the
/// remaining shapes fall back to a circle.
pub fn body_path(s: &mut dyn Surface, shape: BodyShape, radius: f32, spin: f32) -> bool {
    if let Some((sides, rotation)) = polygon_spec(shape) {
        // Square sides span the full diameter.
        let r = if sides == 4 { radius * std::f32::consts::SQRT_2 } else { radius };
        return polygon(s, 0.0, 0.0, r, sides, rotation);
    }
    match shape {
        BodyShape::Star => star(s, 0.0, 0.0, radius * 1.25, radius * 0.6, 5, -FRAC_PI_2),
        BodyShape::Spike => star(s, 0.0, 0.0, radius * 1.35, radius * 0.75, 10, spin),
        BodyShape::Obsidian => star(s, 0.0, 0.0, radius * 1.2, radius * 0.85, 8, spin),
        _ => circle(s, 0.0, 0.0, radius),
    }
}

/// Draws `texture` into `dest`, clipped to the path built by `path`.
///
/// Nothing is drawn when `path` reports degenerate geometry.
pub fn clipped_image(
    s: &mut dyn Surface,
    texture: &Texture,
    dest: Rect,
    path: impl FnOnce(&mut dyn Surface) -> bool,
) -> bool {
    if texture.width == 0 || texture.height == 0 {
        return false;
    }
    s.save();
    let drawn = path(&mut *s);
    if drawn {
        s.clip();
        s.draw_image(texture, dest);
    }
    s.restore();
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn test_degenerate_radius_builds_nothing() {
        let mut s = RecordingSurface::new(100, 100);
        assert!(!circle(&mut s, 0.0, 0.0, 0.0));
        assert!(!circle(&mut s, 0.0, 0.0, -5.0));
        assert!(!polygon(&mut s, 0.0, 0.0, f32::NAN, 6, 0.0));
        assert!(!rounded_rect(&mut s, Rect::new(0.0, 0.0, -1.0, 10.0), 3.0));
        assert!(s.commands().is_empty());
    }

    #[test]
    fn test_polygon_vertex_count() {
        let mut s = RecordingSurface::new(100, 100);
        assert!(polygon(&mut s, 0.0, 0.0, 10.0, 6, 0.0));
        let lines = s.count(|c| matches!(c, DrawCommand::LineTo { .. }));
        assert_eq!(lines, 5);
        assert_eq!(s.count(|c| matches!(c, DrawCommand::MoveTo { .. })), 1);
    }

    #[test]
    fn test_star_alternates_radii() {
        let mut s = RecordingSurface::new(100, 100);
        assert!(star(&mut s, 0.0, 0.0, 10.0, 4.0, 5, 0.0));
        assert_eq!(s.count(|c| matches!(c, DrawCommand::LineTo { .. })), 9);
    }

    #[test]
    fn test_clipped_image_restores_state() {
        let mut s = RecordingSurface::new(100, 100);
        let tex = Texture::solid(4, 2, [255, 255, 255, 255]);
        assert!(clipped_image(&mut s, &tex, Rect::new(-5.0, -5.0, 10.0, 10.0), |s| {
            circle(s, 0.0, 0.0, 5.0)
        }));
        assert_eq!(s.save_depth(), 0);
        assert_eq!(s.count(|c| matches!(c, DrawCommand::Clip)), 1);
    }
}
