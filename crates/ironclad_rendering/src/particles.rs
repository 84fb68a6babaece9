//! CPU Particle System
//!
//! Short-lived, visual-only particles owned by the scene compositor.
//!
//! Lifecycle per frame:
//! 1. Spawners push particles (events, muzzle flashes, trails)
//! 2. [`ParticleSystem::update`] advances physics and ages every particle
//! 3. Expired particles (`life <= 0`) are removed before drawing
//! 4. [`ParticleSystem::draw`] culls and dispatches by [`ParticleKind`]
//!
//! Particles carry no game state. When the budget is exceeded the oldest
//! particles are evicted first.

use std::collections::VecDeque;
use std::f32::consts::{PI, TAU};

use ironclad_shared::{ParticleBudget, Rect, TrailStyle, Vec2};

use crate::color::Color;
use crate::context::{FrameContext, FrameRng, TICKS_PER_SECOND};
use crate::shapes;
use crate::surface::{ColorStop, CompositeMode, Paint, Surface, TextStyle};

/// Glyphs used by code particles.
const CODE_GLYPHS: &[char] = &['0', '1', '{', '}', '<', '>', '/', ';', '=', '#'];

/// Selects the draw routine of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Radial-gradient explosion puff.
    Burst,
    /// Stretched flash at a muzzle.
    MuzzleFlash,
    /// Rotating shell casing.
    Casing,
    /// Floating text (damage numbers).
    Text,
    /// Falling code glyph.
    Code,
    /// Solid square pixel.
    Pixel,
    /// Tumbling debris chunk.
    Debris,
    /// Fading disk.
    Generic,
}

impl ParticleKind {
    /// Velocity retained per frame.
    #[must_use]
    pub const fn drag(self) -> f32 {
        match self {
            Self::Burst => 0.92,
            Self::MuzzleFlash => 0.80,
            Self::Casing => 0.94,
            Self::Text => 0.96,
            Self::Code => 0.97,
            Self::Pixel => 0.90,
            Self::Debris => 0.93,
            Self::Generic => 0.95,
        }
    }
}

/// A single particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// World position.
    pub position: Vec2,
    /// World velocity per frame.
    pub velocity: Vec2,
    /// Remaining life, 1.0 → 0.0.
    pub life: f32,
    /// Total lifetime in seconds.
    pub max_life: f32,
    /// Size in world units.
    pub size: f32,
    /// Base color.
    pub color: Color,
    /// Draw routine.
    pub kind: ParticleKind,
    /// Text payload for [`ParticleKind::Text`].
    pub text: Option<String>,
    /// Glyph for [`ParticleKind::Code`].
    pub glyph: char,
    /// Rotation in radians.
    pub rotation: f32,
    /// Rotation per frame.
    pub spin: f32,
}

impl Particle {
    /// Creates a particle at full life.
    #[must_use]
    pub fn new(kind: ParticleKind, position: Vec2, velocity: Vec2, max_life: f32, size: f32, color: Color) -> Self {
        Self {
            position,
            velocity,
            life: 1.0,
            max_life,
            size,
            color,
            kind,
            text: None,
            glyph: '0',
            rotation: 0.0,
            spin: 0.0,
        }
    }

    /// Life lost per frame.
    #[must_use]
    pub fn life_step(&self) -> f32 {
        if self.max_life > 0.0 && self.max_life.is_finite() {
            1.0 / (self.max_life * TICKS_PER_SECOND)
        } else {
            1.0
        }
    }

    /// Ages the particle by one frame.
    pub fn step(&mut self) {
        self.position += self.velocity;
        self.velocity = self.velocity * self.kind.drag();
        self.rotation += self.spin;
        self.life -= self.life_step();
    }

    /// Still drawable.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Owns all live particles.
#[derive(Debug)]
pub struct ParticleSystem {
    particles: VecDeque<Particle>,
    budget: ParticleBudget,
    evicted: u64,
}

impl ParticleSystem {
    /// Creates an empty system with the given budget.
    #[must_use]
    pub fn new(budget: ParticleBudget) -> Self {
        Self {
            particles: VecDeque::with_capacity(budget.capacity()),
            budget,
            evicted: 0,
        }
    }

    /// Changes the budget, evicting the oldest overflow immediately.
    pub fn set_budget(&mut self, budget: ParticleBudget) {
        self.budget = budget;
        self.shed();
    }

    /// Active budget.
    #[must_use]
    pub const fn budget(&self) -> ParticleBudget {
        self.budget
    }

    /// Live particle count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True when no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles evicted by the budget over the system lifetime.
    #[must_use]
    pub const fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Iterates over live particles, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Drops every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Adds a particle, evicting the oldest when over budget.
    pub fn push(&mut self, particle: Particle) {
        if self.budget.capacity() == 0 {
            return;
        }
        self.particles.push_back(particle);
        self.shed();
    }

    fn shed(&mut self) {
        let cap = self.budget.capacity();
        while self.particles.len() > cap {
            self.particles.pop_front();
            self.evicted += 1;
        }
    }

    /// Advances every particle one frame and removes the expired ones.
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.step();
        }
        self.particles.retain(Particle::is_alive);
    }

    /// Draws live particles inside `view` (world space). Returns the number drawn.
    pub fn draw(&self, s: &mut dyn Surface, ctx: &FrameContext<'_>, view: Rect) -> usize {
        let mut drawn = 0;
        for p in &self.particles {
            if !p.is_alive() || !view.contains(p.position) {
                continue;
            }
            let at = ctx.to_screen(p.position);
            draw_particle(s, p, at);
            drawn += 1;
        }
        s.set_alpha(1.0);
        s.set_composite(CompositeMode::SourceOver);
        drawn
    }

    // =========================================================================
    // Spawners
    // =========================================================================

    /// Explosion: bursts plus a few debris chunks.
    pub fn spawn_explosion(&mut self, rng: &mut FrameRng, at: Vec2, radius: f32, color: Color) {
        let radius = shapes::clamp_extent(radius).max(8.0);
        let count = (radius / 3.0).clamp(8.0, 40.0) as usize;
        for _ in 0..count {
            let dir = Vec2::from_angle(rng.range(0.0, TAU));
            let speed = rng.range(0.5, 1.0) * radius * 0.12;
            let size = rng.range(0.2, 0.45) * radius;
            self.push(Particle::new(
                ParticleKind::Burst,
                at + dir * rng.range(0.0, radius * 0.3),
                dir * speed,
                rng.range(0.35, 0.7),
                size,
                color,
            ));
        }
        self.spawn_debris(rng, at, (count / 4) as u32, color.darken(0.3));
    }

    /// Impact sparks thrown back against `direction`.
    pub fn spawn_impact(&mut self, rng: &mut FrameRng, at: Vec2, direction: f32, color: Color) {
        for _ in 0..6 {
            let a = direction + PI + rng.range(-0.9, 0.9);
            let v = Vec2::from_angle(a) * rng.range(2.0, 5.0);
            self.push(Particle::new(ParticleKind::Generic, at, v, rng.range(0.15, 0.3), rng.range(1.5, 3.0), color));
        }
    }

    /// Muzzle flash plus a couple of forward sparks.
    pub fn spawn_muzzle_flash(&mut self, rng: &mut FrameRng, at: Vec2, direction: f32, color: Color) {
        let mut flash = Particle::new(ParticleKind::MuzzleFlash, at, Vec2::ZERO, 0.08, 14.0, color.lighten(0.4));
        flash.rotation = direction;
        self.push(flash);
        for _ in 0..2 {
            let v = Vec2::from_angle(direction + rng.range(-0.3, 0.3)) * rng.range(4.0, 7.0);
            self.push(Particle::new(ParticleKind::Generic, at, v, 0.12, 1.5, color.lighten(0.6)));
        }
    }

    /// Shell casing ejected to the right of `direction`.
    pub fn spawn_casing(&mut self, rng: &mut FrameRng, at: Vec2, direction: f32) {
        let side = Vec2::from_angle(direction).perp();
        let mut casing = Particle::new(
            ParticleKind::Casing,
            at,
            side * rng.range(1.5, 3.0) + Vec2::from_angle(direction) * -0.5,
            rng.range(0.5, 0.9),
            3.0,
            Color::hex(0xD4_A0_3A_FF),
        );
        casing.spin = rng.range(-0.4, 0.4);
        casing.rotation = direction;
        self.push(casing);
    }

    /// Floating damage number.
    pub fn spawn_damage_number(&mut self, rng: &mut FrameRng, at: Vec2, amount: f32, critical: bool) {
        let shown = amount.max(0.0).round();
        let (color, size) = if critical {
            (Color::hex(0xFF_D7_00_FF), 22.0)
        } else {
            (Color::WHITE, 15.0)
        };
        let mut p = Particle::new(
            ParticleKind::Text,
            at + Vec2::new(rng.range(-8.0, 8.0), -10.0),
            Vec2::new(rng.range(-0.4, 0.4), -1.6),
            0.9,
            size,
            color,
        );
        p.text = Some(format!("{shown:.0}"));
        self.push(p);
    }

    /// Burst of falling code glyphs.
    pub fn spawn_code_burst(&mut self, rng: &mut FrameRng, at: Vec2, count: u32) {
        for _ in 0..count.min(64) {
            let mut p = Particle::new(
                ParticleKind::Code,
                at + Vec2::new(rng.range(-20.0, 20.0), rng.range(-20.0, 20.0)),
                Vec2::new(rng.range(-0.5, 0.5), rng.range(0.5, 2.0)),
                rng.range(0.6, 1.2),
                rng.range(10.0, 16.0),
                Color::hex(0x39_FF_14_FF),
            );
            p.glyph = CODE_GLYPHS[rng.index(CODE_GLYPHS.len())];
            self.push(p);
        }
    }

    /// Tumbling debris chunks.
    pub fn spawn_debris(&mut self, rng: &mut FrameRng, at: Vec2, count: u32, color: Color) {
        for _ in 0..count.min(64) {
            let v = Vec2::from_angle(rng.range(0.0, TAU)) * rng.range(1.0, 4.0);
            let mut p = Particle::new(ParticleKind::Debris, at, v, rng.range(0.6, 1.1), rng.range(3.0, 7.0), color);
            p.spin = rng.range(-0.25, 0.25);
            p.rotation = rng.range(0.0, TAU);
            self.push(p);
        }
    }

    /// One square pixel left behind a moving entity.
    pub fn spawn_pixel_trail(&mut self, rng: &mut FrameRng, at: Vec2, color: Color) {
        let jitter = Vec2::new(rng.range(-4.0, 4.0), rng.range(-4.0, 4.0));
        self.push(Particle::new(ParticleKind::Pixel, at + jitter, Vec2::ZERO, 0.5, rng.range(2.0, 4.0), color));
    }

    /// Cosmetic trail particle for `style`.
    pub fn spawn_trail(&mut self, rng: &mut FrameRng, style: TrailStyle, at: Vec2, color: Color) {
        match style {
            TrailStyle::Pixels => self.spawn_pixel_trail(rng, at, color),
            TrailStyle::Code => self.spawn_code_burst(rng, at, 1),
            TrailStyle::Sparks => {
                let v = Vec2::from_angle(rng.range(0.0, TAU)) * rng.range(0.3, 1.0);
                self.push(Particle::new(ParticleKind::Generic, at, v, 0.3, 2.0, color.lighten(0.5)));
            }
            TrailStyle::Smoke => {
                let v = Vec2::new(rng.range(-0.2, 0.2), rng.range(-0.6, -0.2));
                let gray = Color::rgba(0.5, 0.5, 0.55, 0.5);
                self.push(Particle::new(ParticleKind::Burst, at, v, 0.8, rng.range(6.0, 10.0), gray));
            }
        }
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(ParticleBudget::default())
    }
}

fn draw_particle(s: &mut dyn Surface, p: &Particle, at: Vec2) {
    let alpha = p.life.clamp(0.0, 1.0);
    let size = shapes::clamp_extent(p.size);
    match p.kind {
        ParticleKind::Burst => {
            s.set_composite(CompositeMode::Lighter);
            s.set_alpha(alpha);
            let r = size * (1.5 - alpha * 0.5);
            let stops = [
                ColorStop::new(0.0, p.color.lighten(0.5)),
                ColorStop::new(0.4, p.color),
                ColorStop::new(1.0, p.color.with_alpha(0.0)),
            ];
            if shapes::circle(s, at.x, at.y, r) {
                s.fill(&Paint::Radial {
                    inner_center: at,
                    inner_radius: 0.0,
                    outer_center: at,
                    outer_radius: r,
                    stops: &stops,
                });
            }
        }
        ParticleKind::MuzzleFlash => {
            s.set_composite(CompositeMode::Lighter);
            s.set_alpha(alpha);
            s.save();
            s.translate(at.x, at.y);
            s.rotate(p.rotation);
            s.scale(1.8, 0.7);
            let stops = [
                ColorStop::new(0.0, Color::WHITE),
                ColorStop::new(0.5, p.color),
                ColorStop::new(1.0, p.color.with_alpha(0.0)),
            ];
            if shapes::circle(s, size * 0.5, 0.0, size) {
                s.fill(&Paint::Radial {
                    inner_center: Vec2::new(size * 0.5, 0.0),
                    inner_radius: 0.0,
                    outer_center: Vec2::new(size * 0.5, 0.0),
                    outer_radius: size,
                    stops: &stops,
                });
            }
            s.restore();
        }
        ParticleKind::Casing | ParticleKind::Debris => {
            s.set_composite(CompositeMode::SourceOver);
            s.set_alpha(alpha);
            s.save();
            s.translate(at.x, at.y);
            s.rotate(p.rotation);
            let (w, h) = if p.kind == ParticleKind::Casing { (size * 2.0, size) } else { (size, size) };
            if shapes::rect(s, Rect::new(-w * 0.5, -h * 0.5, w, h)) {
                s.fill(&Paint::Solid(p.color));
            }
            s.restore();
        }
        ParticleKind::Text => {
            s.set_composite(CompositeMode::SourceOver);
            s.set_alpha(alpha);
            if let Some(text) = &p.text {
                let style = TextStyle::new(size).bold();
                s.stroke_text(text, at.x, at.y, &style, Color::BLACK, 3.0);
                s.fill_text(text, at.x, at.y, &style, p.color);
            }
        }
        ParticleKind::Code => {
            s.set_composite(CompositeMode::SourceOver);
            s.set_alpha(alpha);
            let mut buf = [0u8; 4];
            let glyph = p.glyph.encode_utf8(&mut buf);
            s.fill_text(glyph, at.x, at.y, &TextStyle::new(size).monospace(), p.color);
        }
        ParticleKind::Pixel => {
            s.set_composite(CompositeMode::SourceOver);
            s.set_alpha(alpha);
            if shapes::rect(s, Rect::new(at.x - size * 0.5, at.y - size * 0.5, size, size)) {
                s.fill(&Paint::Solid(p.color));
            }
        }
        ParticleKind::Generic => {
            s.set_composite(CompositeMode::SourceOver);
            s.set_alpha(alpha);
            if shapes::circle(s, at.x, at.y, size * (0.5 + alpha * 0.5)) {
                s.fill(&Paint::Solid(p.color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic(max_life: f32) -> Particle {
        Particle::new(ParticleKind::Generic, Vec2::ZERO, Vec2::new(1.0, 0.0), max_life, 2.0, Color::WHITE)
    }

    #[test]
    fn test_life_step_matches_lifetime() {
        let mut system = ParticleSystem::new(ParticleBudget::High);
        system.push(generic(0.5));
        // 0.5 s at 60 fps = 30 frames.
        for _ in 0..29 {
            system.update();
        }
        assert_eq!(system.len(), 1);
        system.update();
        system.update();
        assert!(system.is_empty());
    }

    #[test]
    fn test_budget_evicts_oldest() {
        let mut system = ParticleSystem::new(ParticleBudget::Low);
        for i in 0..200 {
            let mut p = generic(1.0);
            p.size = i as f32;
            system.push(p);
        }
        assert_eq!(system.len(), 150);
        assert_eq!(system.evicted(), 50);
        assert_eq!(system.iter().next().map(|p| p.size), Some(50.0));
    }

    #[test]
    fn test_off_budget_spawns_nothing() {
        let mut system = ParticleSystem::new(ParticleBudget::Off);
        let mut rng = FrameRng::seeded(3);
        system.spawn_explosion(&mut rng, Vec2::ZERO, 40.0, Color::WHITE);
        assert!(system.is_empty());
    }

    #[test]
    fn test_drag_slows_particles() {
        let mut p = generic(1.0);
        p.step();
        assert!(p.velocity.x < 1.0);
        assert_eq!(p.position.x, 1.0);
    }

    #[test]
    fn test_zero_lifetime_dies_in_one_frame() {
        let mut system = ParticleSystem::new(ParticleBudget::High);
        system.push(generic(0.0));
        system.update();
        assert!(system.is_empty());
    }
}
