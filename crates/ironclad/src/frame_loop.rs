//! # IRONCLAD Frame Loop
//!
//! Drives the renderer once per refresh interval:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. CHECK HANDLE                                                     │
//! │    └─ Stop if cancelled or the frame limit is reached               │
//! │                                                                     │
//! │ 2. RUN FRAME                                                        │
//! │    └─ Call the frame closure (simulation step + render_frame)       │
//! │                                                                     │
//! │ 3. RECORD                                                           │
//! │    ├─ Accumulate frame time and render stats                        │
//! │    └─ warn! when the frame overran MAX_FRAME_TIME                   │
//! │                                                                     │
//! │ 4. PACE                                                             │
//! │    └─ Sleep out the rest of the interval, never queue a frame       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Frame N+1 is only requested after frame N returned, so a slow frame
//! delays the next one instead of piling frames up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ironclad_rendering::FrameStats;
use tracing::{debug, warn};

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Maximum allowed frame time before warning.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(33);

/// Configuration for the frame loop.
#[derive(Clone, Debug)]
pub struct FrameLoopConfig {
    /// Target frames per second. Zero runs frames back to back.
    pub target_fps: u32,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
    /// Log frames that exceed [`MAX_FRAME_TIME`].
    pub log_overruns: bool,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_frames: None,
            log_overruns: true,
        }
    }
}

impl FrameLoopConfig {
    /// Unpaced loop for headless replays and tests.
    #[must_use]
    pub fn headless(max_frames: u64) -> Self {
        Self {
            target_fps: 0,
            max_frames: Some(max_frames),
            log_overruns: true,
        }
    }

    /// Interval between frame starts, `None` when unpaced.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        (self.target_fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(self.target_fps)))
    }
}

/// Cancels a running [`FrameLoop`] from any thread.
#[derive(Clone, Debug)]
pub struct FrameLoopHandle {
    running: Arc<AtomicBool>,
}

impl FrameLoopHandle {
    /// Requests the loop to stop before its next frame.
    pub fn cancel(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// True until cancelled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Cooperative frame loop.
pub struct FrameLoop {
    config: FrameLoopConfig,
    running: Arc<AtomicBool>,
    frame_count: u64,
    stats: FrameStatsAccumulator,
}

impl FrameLoop {
    /// Creates a loop; it starts in the running state.
    #[must_use]
    pub fn new(config: FrameLoopConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(true)),
            frame_count: 0,
            stats: FrameStatsAccumulator::new(),
        }
    }

    /// Handle that cancels this loop.
    #[must_use]
    pub fn handle(&self) -> FrameLoopHandle {
        FrameLoopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Runs `frame` once per interval until cancelled or the frame limit
    /// is hit. The closure receives the frame number and returns the
    /// renderer's stats, `None` for a skipped frame. Returns the number of
    /// frames run.
    pub fn run<F>(&mut self, mut frame: F) -> u64
    where
        F: FnMut(u64) -> Option<FrameStats>,
    {
        let interval = self.config.interval();
        let started_at = self.frame_count;
        debug!(target_fps = self.config.target_fps, max_frames = ?self.config.max_frames, "frame loop started");

        while self.running.load(Ordering::Acquire) {
            if self.config.max_frames.is_some_and(|max| self.frame_count >= max) {
                break;
            }
            let start = Instant::now();
            let stats = frame(self.frame_count);
            let elapsed = start.elapsed();
            self.end_frame(elapsed, stats.as_ref());

            if let Some(interval) = interval {
                if let Some(rest) = interval.checked_sub(elapsed) {
                    thread::sleep(rest);
                }
            }
        }

        let ran = self.frame_count - started_at;
        debug!(frames = ran, "frame loop stopped");
        ran
    }

    fn end_frame(&mut self, elapsed: Duration, stats: Option<&FrameStats>) {
        self.frame_count += 1;
        let total_us = elapsed.as_micros() as u64;
        self.stats.record(total_us, stats);

        if self.config.log_overruns && elapsed > MAX_FRAME_TIME {
            warn!(
                frame = self.frame_count,
                frame_ms = total_us as f64 / 1000.0,
                target_ms = TARGET_FRAME_TIME.as_micros() as f64 / 1000.0,
                "frame exceeded budget"
            );
        }
    }

    /// Frames run so far.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Frames the renderer skipped (no surface or zero size).
    pub frames_skipped: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of render times.
    pub render_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Sum of entities drawn.
    pub entities_drawn_sum: u64,
    /// Sum of entities culled.
    pub entities_culled_sum: u64,
    /// Highest live particle count seen.
    pub peak_particles: usize,
    /// Surface resizes.
    pub resizes: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            frames_skipped: 0,
            total_us_sum: 0,
            render_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            entities_drawn_sum: 0,
            entities_culled_sum: 0,
            peak_particles: 0,
            resizes: 0,
        }
    }

    /// Records one frame's wall time and, if it rendered, its stats.
    pub fn record(&mut self, total_us: u64, stats: Option<&FrameStats>) {
        self.frames_recorded += 1;
        self.total_us_sum += total_us;
        self.min_frame_us = self.min_frame_us.min(total_us);
        self.max_frame_us = self.max_frame_us.max(total_us);

        if total_us > TARGET_FRAME_TIME.as_micros() as u64 {
            self.frames_over_budget += 1;
        }

        match stats {
            Some(s) => {
                self.render_us_sum += s.render_us;
                self.entities_drawn_sum += s.entities_drawn as u64;
                self.entities_culled_sum += s.entities_culled as u64;
                self.peak_particles = self.peak_particles.max(s.particles_alive);
                self.resizes += u64::from(s.resized);
            }
            None => self.frames_skipped += 1,
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns average render time in milliseconds over rendered frames.
    #[must_use]
    pub fn avg_render_ms(&self) -> f64 {
        let rendered = self.frames_recorded - self.frames_skipped;
        if rendered == 0 {
            return 0.0;
        }
        (self.render_us_sum as f64 / rendered as f64) / 1000.0
    }

    /// Returns average FPS.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Prints a summary of the statistics.
    pub fn print_summary(&self) {
        let min_ms = if self.frames_recorded == 0 { 0.0 } else { self.min_frame_us as f64 / 1000.0 };
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                    FRAME STATISTICS SUMMARY                      ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();
        println!("┌─ TIMING ─────────────────────────────────────────────────────────┐");
        println!("│ Frames Recorded:    {}", self.frames_recorded);
        println!("│ Frames Skipped:     {}", self.frames_skipped);
        println!("│ Average Frame:      {:.3} ms ({:.1} FPS)", self.avg_frame_ms(), self.avg_fps());
        println!("│ Average Render:     {:.3} ms", self.avg_render_ms());
        println!("│ Min Frame:          {min_ms:.3} ms");
        println!("│ Max Frame:          {:.3} ms", self.max_frame_us as f64 / 1000.0);
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
        println!("┌─ BUDGET ─────────────────────────────────────────────────────────┐");
        println!("│ Target:             {:.3} ms (60 FPS)", TARGET_FRAME_TIME.as_micros() as f64 / 1000.0);
        println!(
            "│ Over Budget:        {} frames ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        );
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
        println!("┌─ SCENE ──────────────────────────────────────────────────────────┐");
        println!("│ Entities Drawn:     {}", self.entities_drawn_sum);
        println!("│ Entities Culled:    {}", self.entities_culled_sum);
        println!("│ Peak Particles:     {}", self.peak_particles);
        println!("│ Surface Resizes:    {}", self.resizes);
        println!("└──────────────────────────────────────────────────────────────────┘");
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(render_us: u64) -> FrameStats {
        FrameStats {
            render_us,
            entities_drawn: 3,
            particles_alive: 40,
            ..FrameStats::default()
        }
    }

    #[test]
    fn test_headless_loop_stops_at_limit() {
        let mut frame_loop = FrameLoop::new(FrameLoopConfig::headless(5));
        let mut seen = Vec::new();
        let ran = frame_loop.run(|n| {
            seen.push(n);
            Some(rendered(100))
        });
        assert_eq!(ran, 5);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(frame_loop.stats().entities_drawn_sum, 15);
    }

    #[test]
    fn test_handle_cancels_from_inside_frame() {
        let mut frame_loop = FrameLoop::new(FrameLoopConfig::headless(1000));
        let handle = frame_loop.handle();
        let ran = frame_loop.run(|n| {
            if n == 2 {
                handle.cancel();
            }
            None
        });
        assert_eq!(ran, 3);
        assert!(!frame_loop.handle().is_running());
        assert_eq!(frame_loop.stats().frames_skipped, 3);
    }

    #[test]
    fn test_paced_loop_waits_between_frames() {
        let mut frame_loop = FrameLoop::new(FrameLoopConfig {
            target_fps: 200,
            max_frames: Some(4),
            log_overruns: false,
        });
        let start = Instant::now();
        frame_loop.run(|_| None);
        // Four 5 ms intervals.
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new();

        for i in 0..100 {
            acc.record(10_000 + (i * 100), Some(&rendered(2_000)));
        }
        acc.record(40_000, None);

        assert_eq!(acc.frames_recorded, 101);
        assert_eq!(acc.frames_skipped, 1);
        assert_eq!(acc.peak_particles, 40);
        assert!((acc.avg_render_ms() - 2.0).abs() < 1e-9);
        assert!(acc.avg_fps() > 50.0);
        assert!(acc.avg_fps() < 100.0);
        // 67 and up exceed the 16.666 ms target, plus the skipped 40 ms frame.
        assert_eq!(acc.frames_over_budget, 34);
    }
}
