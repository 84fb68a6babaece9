//! Shockwave rings.

use ironclad_shared::Vec2;

use crate::color::Color;
use crate::context::TICKS_PER_SECOND;
use crate::shapes;
use crate::surface::{CompositeMode, Paint, Surface};

/// Seconds from spawn to full radius.
const SHOCKWAVE_SECONDS: f32 = 0.6;

/// Transient distortion ring owned by the scene compositor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shockwave {
    /// World center.
    pub origin: Vec2,
    /// Current radius.
    pub radius: f32,
    /// Final radius.
    pub max_radius: f32,
    /// Remaining life, 1.0 → 0.0.
    pub life: f32,
    /// Tint.
    pub color: Color,
}

impl Shockwave {
    /// New ring at full life and zero radius.
    #[must_use]
    pub fn new(origin: Vec2, max_radius: f32, color: Color) -> Self {
        Self {
            origin,
            radius: 0.0,
            max_radius: shapes::clamp_extent(max_radius),
            life: 1.0,
            color,
        }
    }

    /// Still drawable.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Ages one frame; the radius eases out towards `max_radius`.
    pub fn step(&mut self) {
        self.life -= 1.0 / (SHOCKWAVE_SECONDS * TICKS_PER_SECOND);
        let t = (1.0 - self.life).clamp(0.0, 1.0);
        self.radius = self.max_radius * (1.0 - (1.0 - t) * (1.0 - t));
    }

    /// Draws the ring additively at `at` (screen space). Expired rings are
    /// not drawn. Returns whether anything was drawn.
    pub fn draw(&self, s: &mut dyn Surface, at: Vec2, glow: bool) -> bool {
        if !self.is_alive() {
            return false;
        }
        let radius = shapes::clamp_extent(self.radius);
        if radius <= 0.0 {
            return false;
        }
        let alpha = self.life.clamp(0.0, 1.0);
        s.save();
        s.set_composite(CompositeMode::Lighter);
        if glow {
            s.set_alpha(alpha * 0.3);
            if shapes::circle(s, at.x, at.y, radius) {
                s.stroke(&Paint::Solid(self.color), 14.0 * alpha + 2.0);
            }
        }
        s.set_alpha(alpha);
        if shapes::circle(s, at.x, at.y, radius) {
            s.stroke(&Paint::Solid(self.color.lighten(0.3)), 5.0 * alpha + 1.0);
        }
        s.restore();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn test_expired_ring_not_drawn() {
        let wave = Shockwave {
            origin: Vec2::ZERO,
            radius: 50.0,
            max_radius: 80.0,
            life: 0.0,
            color: Color::WHITE,
        };
        let mut s = RecordingSurface::new(100, 100);
        assert!(!wave.draw(&mut s, Vec2::new(50.0, 50.0), true));
        assert!(s.commands().is_empty());
        assert!(!wave.is_alive());
    }

    #[test]
    fn test_radius_grows_while_life_falls() {
        let mut wave = Shockwave::new(Vec2::ZERO, 100.0, Color::WHITE);
        let mut last = (wave.radius, wave.life);
        while wave.is_alive() {
            wave.step();
            assert!(wave.radius >= last.0);
            assert!(wave.life < last.1);
            last = (wave.radius, wave.life);
        }
        assert!(wave.radius > 95.0);
    }
}
