//! Parallax starfield.
//!
//! Stars are generated once from a seed. Each frame a star's screen
//! position is `(world - camera_offset * layer_factor * 0.1)` wrapped into
//! `viewport + margin`, which tiles the field endlessly in every
//! direction.

use std::f32::consts::TAU;

use ironclad_shared::{Rect, Vec2};

use crate::color::Color;
use crate::context::{FrameContext, FrameRng};
use crate::shapes;
use crate::surface::{Paint, Surface};

/// Parallax factor per layer, far to near.
pub const STAR_LAYER_FACTORS: [f32; 3] = [1.0, 2.5, 5.0];

/// Extent of the generated field in world units.
const FIELD_SIZE: f32 = 2048.0;
/// Extra wrap room so stars don't pop at the edges.
const WRAP_MARGIN: f32 = 100.0;

/// One star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Base position inside the field.
    pub position: Vec2,
    /// Index into [`STAR_LAYER_FACTORS`].
    pub layer: usize,
    /// Edge length in pixels.
    pub size: f32,
    /// Twinkle phase.
    pub phase: f32,
    /// Peak alpha.
    pub brightness: f32,
}

/// Pre-generated star layers.
#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    /// Generates `count` stars spread over the layers.
    #[must_use]
    pub fn generate(count: usize, rng: &mut FrameRng) -> Self {
        let stars = (0..count)
            .map(|i| {
                let layer = i % STAR_LAYER_FACTORS.len();
                Star {
                    position: Vec2::new(rng.range(0.0, FIELD_SIZE), rng.range(0.0, FIELD_SIZE)),
                    layer,
                    size: 1.0 + layer as f32 * 0.6 + rng.unit() * 0.5,
                    phase: rng.range(0.0, TAU),
                    brightness: 0.35 + layer as f32 * 0.2 + rng.unit() * 0.15,
                }
            })
            .collect();
        Self { stars }
    }

    /// Stars in generation order.
    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Screen position of `star` for a camera offset and logical viewport size.
    #[must_use]
    pub fn screen_position(star: &Star, camera_offset: Vec2, viewport: Vec2) -> Vec2 {
        let factor = STAR_LAYER_FACTORS[star.layer.min(STAR_LAYER_FACTORS.len() - 1)];
        let p = star.position - camera_offset * (factor * 0.1);
        let wrap = Vec2::new(viewport.x + WRAP_MARGIN, viewport.y + WRAP_MARGIN);
        Vec2::new(
            p.x.rem_euclid(wrap.x) - WRAP_MARGIN * 0.5,
            p.y.rem_euclid(wrap.y) - WRAP_MARGIN * 0.5,
        )
    }

    /// Draws every star. Returns the number drawn.
    pub fn draw(&self, s: &mut dyn Surface, ctx: &FrameContext<'_>, viewport: Vec2) -> usize {
        if viewport.x <= 0.0 || viewport.y <= 0.0 || !ctx.camera_offset.is_finite() {
            return 0;
        }
        let time = ctx.time();
        let mut drawn = 0;
        for star in &self.stars {
            let at = Self::screen_position(star, ctx.camera_offset, viewport);
            let twinkle = 0.6 + 0.4 * (time * 2.0 + star.phase).sin();
            s.set_alpha((star.brightness * twinkle).clamp(0.0, 1.0));
            let half = star.size * 0.5;
            if shapes::rect(s, Rect::new(at.x - half, at.y - half, star.size, star.size)) {
                s.fill(&Paint::Solid(Color::WHITE));
                drawn += 1;
            }
        }
        s.set_alpha(1.0);
        drawn
    }
}
