//! Per-frame render context.
//!
//! Everything a draw routine may read besides the entity it draws:
//! normalized settings, the frame tick, the camera offset and the seeded
//! random source. Built once per frame by the scene compositor.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ironclad_shared::{ColorToken, Settings, Vec2};

use crate::color::{self, Color};

/// Nominal frame rate the tick counter is expressed in.
pub const TICKS_PER_SECOND: f32 = 60.0;

/// Seedable random source for jitter, lightning branches and spawns.
#[derive(Debug, Clone)]
pub struct FrameRng {
    rng: ChaCha8Rng,
}

impl FrameRng {
    /// Deterministic stream for `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform in `[-1, 1)`.
    #[inline]
    pub fn signed(&mut self) -> f32 {
        self.unit() * 2.0 - 1.0
    }

    /// Uniform in `[lo, hi)`; returns `lo` for an empty range.
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo {
            lo + (hi - lo) * self.unit()
        } else {
            lo
        }
    }

    /// True with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Uniform index in `0..len`; 0 for an empty range.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.rng.gen_range(0..len)
        }
    }
}

impl Default for FrameRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}

/// Read-mostly inputs of one frame.
pub struct FrameContext<'a> {
    /// Normalized settings.
    pub settings: &'a Settings,
    /// Frame counter, drives periodic animation.
    pub tick: u64,
    /// World position of the screen's top-left corner.
    pub camera_offset: Vec2,
    /// Seeded randomness.
    pub rng: &'a mut FrameRng,
}

impl FrameContext<'_> {
    /// Resolves a color token under the active colorblind mode.
    #[inline]
    #[must_use]
    pub fn color(&self, token: ColorToken) -> Color {
        color::resolve(token, self.settings.accessibility.colorblind)
    }

    /// Seconds since the first frame at the nominal rate.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.tick as f32 / TICKS_PER_SECOND
    }

    /// Projects a world point to logical screen space.
    #[inline]
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.camera_offset
    }
}
