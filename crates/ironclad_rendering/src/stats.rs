//! Per-frame render counters.

/// What one call to `render_frame` did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame counter at the time of the render.
    pub frame: u64,
    /// Entities in the snapshot.
    pub entities_considered: usize,
    /// Entities whose body was drawn.
    pub entities_drawn: usize,
    /// Entities rejected by the screen-space cull.
    pub entities_culled: usize,
    /// Particles alive after the update pass.
    pub particles_alive: usize,
    /// Particles inside the view and drawn.
    pub particles_drawn: usize,
    /// Shockwave rings drawn.
    pub shockwaves: usize,
    /// Lightning beams drawn.
    pub beams: usize,
    /// Stars drawn (0 when the starfield is skipped).
    pub stars: usize,
    /// Visual events drained this frame.
    pub events: usize,
    /// Whether the backing surface was resized this frame.
    pub resized: bool,
    /// Backing surface size after step 1.
    pub surface_size: (u32, u32),
    /// Wall-clock render time in microseconds.
    pub render_us: u64,
}

impl FrameStats {
    /// Render time in milliseconds.
    #[inline]
    #[must_use]
    pub fn render_ms(&self) -> f64 {
        self.render_us as f64 / 1000.0
    }

    /// Share of considered entities that were culled.
    #[must_use]
    pub fn cull_ratio(&self) -> f32 {
        if self.entities_considered == 0 {
            return 0.0;
        }
        self.entities_culled as f32 / self.entities_considered as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cull_ratio() {
        let stats = FrameStats {
            entities_considered: 8,
            entities_culled: 2,
            ..FrameStats::default()
        };
        assert!((stats.cull_ratio() - 0.25).abs() < 1e-6);
        assert_eq!(FrameStats::default().cull_ratio(), 0.0);
    }
}
