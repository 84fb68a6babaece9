//! # IRONCLAD
//!
//! Host side of the arena renderer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          HOST                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  FrameLoop ──(one frame at a time)──► closure               │
//! │     │                                    │                  │
//! │  FrameLoopHandle (cancel)        ReplayArena.step()         │
//! │                                          │                  │
//! │                                SceneCompositor.render_frame │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `frame_loop`: Frame pacing, cancellation and timing statistics
//! - `replay`: Seeded synthetic arena used by the `arena_replay` binary

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod frame_loop;
pub mod replay;

pub use frame_loop::{
    FrameLoop, FrameLoopConfig, FrameLoopHandle, FrameStatsAccumulator, MAX_FRAME_TIME, TARGET_FRAME_TIME,
};
pub use replay::{ReplayArena, ReplayConfig};

/// Re-export of the input contract.
pub use ironclad_shared as shared;
/// Re-export of the render core.
pub use ironclad_rendering as rendering;
