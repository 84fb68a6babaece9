//! Skill visuals.
//!
//! [`skill_routine`] is the dispatch table: every [`SkillType`] maps to
//! exactly one routine. The match has no wildcard arm, so adding a skill
//! without a routine fails to compile; `Unknown` maps to a no-op.

use std::f32::consts::{FRAC_PI_2, TAU};

use ironclad_shared::{Rect, SkillType, Vec2};

use crate::color::Color;
use crate::context::FrameRng;
use crate::shapes;
use crate::surface::{ColorStop, CompositeMode, Paint, Surface};

/// Inputs of a skill routine.
#[derive(Debug, Clone, Copy)]
pub struct SkillFrame {
    /// Screen position of the entity.
    pub at: Vec2,
    /// Entity radius (already clamped).
    pub radius: f32,
    /// Entity facing.
    pub rotation: f32,
    /// Frame tick.
    pub tick: u64,
    /// Progress through the skill, `[0, 1]`.
    pub progress: f32,
    /// Resolved entity color.
    pub color: Color,
}

impl SkillFrame {
    fn t(&self) -> f32 {
        self.tick as f32
    }

    /// Slow 0..1 pulse with a period of `period` frames.
    fn pulse(&self, period: f32) -> f32 {
        (self.t() / period * TAU).sin() * 0.5 + 0.5
    }
}

/// Draw routine of one skill type.
pub type SkillRoutine = fn(&mut dyn Surface, &SkillFrame, &mut FrameRng);

/// The skill → routine table.
#[must_use]
pub fn skill_routine(kind: SkillType) -> SkillRoutine {
    match kind {
        SkillType::Shield => shield_ward,
        SkillType::NanoArmor => nano_ward,
        SkillType::MirrorPrism => prism_ward,
        SkillType::Emp => emp_pulse,
        SkillType::GravityWell => gravity_pulse,
        SkillType::ChronoField => chrono_pulse,
        SkillType::TimeWarp => time_warp_arcs,
        SkillType::Berserk => berserk_aura,
        SkillType::OrbitalBeam => orbital_beam,
        SkillType::ThunderStorm => thunder_storm,
        SkillType::Unknown => nothing,
    }
}

/// Draws `kind` for one entity. Leaves alpha and composite reset.
pub fn draw_skill(s: &mut dyn Surface, kind: SkillType, frame: &SkillFrame, rng: &mut FrameRng) {
    if frame.radius <= 0.0 {
        return;
    }
    s.save();
    skill_routine(kind)(s, frame, rng);
    s.restore();
}

fn nothing(_: &mut dyn Surface, _: &SkillFrame, _: &mut FrameRng) {}

// =============================================================================
// Wards: rotating hexagon with a pulse ring
// =============================================================================

fn ward(s: &mut dyn Surface, f: &SkillFrame, tint: Color, spin: f32) {
    let r = f.radius * 1.55;
    s.set_composite(CompositeMode::Lighter);
    s.set_alpha(0.25 + f.pulse(90.0) * 0.15);
    if shapes::polygon(s, f.at.x, f.at.y, r, 6, f.t() * spin) {
        s.fill(&Paint::Solid(tint));
    }
    s.set_alpha(0.85);
    if shapes::polygon(s, f.at.x, f.at.y, r, 6, f.t() * spin) {
        s.stroke(&Paint::Solid(tint.lighten(0.3)), 2.5);
    }
    let ring = r + 4.0 + f.pulse(45.0) * 6.0;
    s.set_alpha(0.4 * (1.0 - f.pulse(45.0)));
    if shapes::circle(s, f.at.x, f.at.y, ring) {
        s.stroke(&Paint::Solid(tint), 2.0);
    }
}

fn shield_ward(s: &mut dyn Surface, f: &SkillFrame, _: &mut FrameRng) {
    ward(s, f, Color::hex(0x4F_C3_F7_FF), 0.02);
}

fn nano_ward(s: &mut dyn Surface, f: &SkillFrame, _: &mut FrameRng) {
    ward(s, f, Color::hex(0x69_F0_AE_FF), -0.015);
    // Plating seams.
    s.set_alpha(0.5);
    for i in 0..6 {
        let a = f.t() * -0.015 + i as f32 * TAU / 6.0;
        let d = Vec2::from_angle(a);
        s.begin_path();
        s.move_to(f.at.x + d.x * f.radius * 0.8, f.at.y + d.y * f.radius * 0.8);
        s.line_to(f.at.x + d.x * f.radius * 1.55, f.at.y + d.y * f.radius * 1.55);
        s.stroke(&Paint::Solid(Color::hex(0x69_F0_AE_FF)), 1.0);
    }
}

fn prism_ward(s: &mut dyn Surface, f: &SkillFrame, _: &mut FrameRng) {
    let hue = f.pulse(120.0);
    let tint = Color::hex(0xE1_BE_E7_FF).lerp(Color::hex(0x80_DE_EA_FF), hue);
    ward(s, f, tint, 0.03);
}

// =============================================================================
// Pulses
// =============================================================================

fn expanding_ring(s: &mut dyn Surface, f: &SkillFrame, tint: Color, phase: f32, reach: f32, width: f32) {
    let r = f.radius * (1.0 + phase * reach);
    s.set_alpha((1.0 - phase).clamp(0.0, 1.0) * 0.8);
    if shapes::circle(s, f.at.x, f.at.y, r) {
        s.stroke(&Paint::Solid(tint), width);
    }
}

fn emp_pulse(s: &mut dyn Surface, f: &SkillFrame, _: &mut FrameRng) {
    s.set_composite(CompositeMode::Lighter);
    let phase = (f.t() % 40.0) / 40.0;
    expanding_ring(s, f, Color::hex(0x40_C4_FF_FF), phase, 3.0, 4.0);
    expanding_ring(s, f, Color::hex(0x40_C4_FF_FF), (phase + 0.5) % 1.0, 3.0, 2.0);
}

fn gravity_pulse(s: &mut dyn Surface, f: &SkillFrame, _: &mut FrameRng) {
    // Rings collapse inwards.
    let phase = 1.0 - (f.t() % 60.0) / 60.0;
    let tint = Color::hex(0x7C_4D_FF_FF);
    for k in 0..3 {
        let p = (phase + k as f32 / 3.0) % 1.0;
        expanding_ring(s, f, tint, 1.0 - p, 2.5, 2.0 + p * 2.0);
    }
    s.set_alpha(0.6);
    let stops = [
        ColorStop::new(0.0, Color::BLACK),
        ColorStop::new(1.0, tint.with_alpha(0.0)),
    ];
    if shapes::circle(s, f.at.x, f.at.y, f.radius * 1.4) {
        s.fill(&Paint::Radial {
            inner_center: f.at,
            inner_radius: 0.0,
            outer_center: f.at,
            outer_radius: f.radius * 1.4,
            stops: &stops,
        });
    }
}

fn chrono_pulse(s: &mut dyn Surface, f: &SkillFrame, _: &mut FrameRng) {
    s.set_line_dash(&[8.0, 6.0]);
    let phase = (f.t() % 90.0) / 90.0;
    expanding_ring(s, f, Color::hex(0xFF_D5_4F_FF), phase, 2.0, 3.0);
    s.set_line_dash(&[]);
    // Clock hand.
    let hand = Vec2::from_angle(f.t() * 0.05 - FRAC_PI_2) * (f.radius * 1.8);
    s.set_alpha(0.7);
    s.begin_path();
    s.move_to(f.at.x, f.at.y);
    s.line_to(f.at.x + hand.x, f.at.y + hand.y);
    s.stroke(&Paint::Solid(Color::hex(0xFF_D5_4F_FF)), 2.0);
}

fn time_warp_arcs(s: &mut dyn Surface, f: &SkillFrame, _: &mut FrameRng) {
    s.set_composite(CompositeMode::Lighter);
    s.set_line_dash(&[12.0, 8.0]);
    let tint = Color::hex(0xB3_88_FF_FF).lerp(f.color, 0.25);
    for k in 1..=3 {
        let kf = k as f32;
        let r = f.radius * (1.2 + kf * 0.35);
        let dir = if k % 2 == 0 { -1.0 } else { 1.0 };
        let start = f.t() * 0.03 * dir * kf;
        s.set_alpha(0.7 / kf);
        s.begin_path();
        s.arc(f.at.x, f.at.y, r, start, start + TAU * 0.75);
        s.stroke(&Paint::Solid(tint), 2.0);
    }
    s.set_line_dash(&[]);
}

fn berserk_aura(s: &mut dyn Surface, f: &SkillFrame, _: &mut FrameRng) {
    s.set_composite(CompositeMode::Lighter);
    let beat = f.pulse(20.0);
    let outer = f.radius * (1.5 + beat * 0.3);
    s.set_alpha(0.35 + beat * 0.3);
    if shapes::star(s, f.at.x, f.at.y, outer, f.radius * 1.1, 12, f.t() * 0.04) {
        s.fill(&Paint::Solid(Color::hex(0xFF_17_44_FF)));
    }
}

fn orbital_beam(s: &mut dyn Surface, f: &SkillFrame, rng: &mut FrameRng) {
    let target = f.at + Vec2::from_angle(f.rotation) * (f.radius * 5.0);
    let flicker = 0.8 + rng.unit() * 0.4;
    let width = 18.0 * flicker * (1.0 - f.progress * 0.5);
    s.set_composite(CompositeMode::Lighter);
    s.set_alpha(0.8);
    let stops = [
        ColorStop::new(0.0, Color::hex(0xFF_F5_9D_00)),
        ColorStop::new(1.0, Color::hex(0xFF_F5_9D_FF)),
    ];
    if shapes::rect(s, Rect::new(target.x - width * 0.5, target.y - 1200.0, width, 1200.0)) {
        s.fill(&Paint::Linear {
            from: Vec2::new(target.x, target.y - 1200.0),
            to: target,
            stops: &stops,
        });
    }
    s.set_alpha(0.9);
    if shapes::circle(s, target.x, target.y, width * 1.4 * flicker) {
        s.fill(&Paint::Solid(Color::WHITE));
    }
}

fn thunder_storm(s: &mut dyn Surface, f: &SkillFrame, rng: &mut FrameRng) {
    let reach = f.radius * 3.0;
    let tint = Color::hex(0x82_B1_FF_FF);
    s.set_alpha(0.35);
    if shapes::circle(s, f.at.x, f.at.y, reach) {
        s.stroke(&Paint::Solid(tint), 1.5);
    }
    if !rng.chance(0.35) {
        return;
    }
    s.set_composite(CompositeMode::Lighter);
    s.set_alpha(0.9);
    let end = f.at + Vec2::from_angle(rng.range(0.0, TAU)) * reach;
    let segments = 6;
    s.begin_path();
    s.move_to(f.at.x, f.at.y);
    let normal = (end - f.at).normalized().perp();
    for i in 1..segments {
        let p = f.at.lerp(end, i as f32 / segments as f32) + normal * (rng.signed() * 8.0);
        s.line_to(p.x, p.y);
    }
    s.line_to(end.x, end.y);
    s.stroke(&Paint::Solid(Color::WHITE), 2.0);
}

/// Fading ghost copies trailing a dashing entity.
pub fn draw_afterimages(s: &mut dyn Surface, at: Vec2, velocity: Vec2, radius: f32, color: Color) {
    let radius = shapes::clamp_extent(radius);
    if radius <= 0.0 || velocity.length_squared() <= f32::EPSILON {
        return;
    }
    s.save();
    for k in 1..=3 {
        let kf = k as f32;
        let ghost = at - velocity * (kf * 2.5);
        s.set_alpha(0.3 / kf);
        if shapes::circle(s, ghost.x, ghost.y, radius * (1.0 - kf * 0.08)) {
            s.fill(&Paint::Solid(color));
        }
    }
    s.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn frame() -> SkillFrame {
        SkillFrame {
            at: Vec2::new(200.0, 200.0),
            radius: 24.0,
            rotation: 0.3,
            tick: 42,
            progress: 0.5,
            color: Color::WHITE,
        }
    }

    #[test]
    fn test_every_skill_draws_balanced() {
        for &kind in SkillType::ALL {
            let mut s = RecordingSurface::new(400, 400);
            let mut rng = FrameRng::seeded(9);
            draw_skill(&mut s, kind, &frame(), &mut rng);
            assert!(!s.commands().is_empty(), "{kind:?} drew nothing");
            assert_eq!(s.save_depth(), 0);
            assert_eq!(s.invalid_geometry(), 0);
        }
    }

    #[test]
    fn test_unknown_skill_is_noop() {
        let mut s = RecordingSurface::new(400, 400);
        let mut rng = FrameRng::seeded(9);
        draw_skill(&mut s, SkillType::Unknown, &frame(), &mut rng);
        assert_eq!(s.fill_count(), 0);
    }

    #[test]
    fn test_zero_radius_skips_skill() {
        let mut s = RecordingSurface::new(400, 400);
        let mut rng = FrameRng::seeded(9);
        let f = SkillFrame { radius: 0.0, ..frame() };
        draw_skill(&mut s, SkillType::Shield, &f, &mut rng);
        assert!(s.commands().is_empty());
    }

    #[test]
    fn test_same_tick_same_commands() {
        let mut a = RecordingSurface::new(400, 400);
        let mut b = RecordingSurface::new(400, 400);
        draw_skill(&mut a, SkillType::ThunderStorm, &frame(), &mut FrameRng::seeded(5));
        draw_skill(&mut b, SkillType::ThunderStorm, &frame(), &mut FrameRng::seeded(5));
        assert_eq!(a.commands(), b.commands());
    }
}
