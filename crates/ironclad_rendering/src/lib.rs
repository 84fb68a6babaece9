//! # IRONCLAD Rendering
//!
//! Per-frame procedural renderer for a top-down tank arena. Everything on
//! screen is built from vector primitives each frame; the only bitmaps
//! are optional country flags.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      FRAME PIPELINE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  WorldSnapshot + Settings + Camera  ──►  SceneCompositor     │
//! │       │                                      │               │
//! │  VisualEvent queue ──► particles / rings / beams             │
//! │       │                                      │               │
//! │  Tank compositor (barrels → chassis)   Minimap projector     │
//! │       │                                      │               │
//! │       └──────────────►  dyn Surface  ◄───────┘               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## RENDER CORE MANDATE
//!
//! - The snapshot is read-only; the renderer owns only transient state
//! - Bad input draws less, it never panics or returns an error
//! - Same seed + same inputs = same commands
//! - No allocation per entity in the frame loop

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod color;
pub mod context;
pub mod effects;
pub mod error;
pub mod events;
pub mod minimap;
pub mod particles;
pub mod scene;
pub mod shapes;
pub mod stats;
pub mod surface;
pub mod tank;
pub mod texture_cache;
#[cfg(feature = "http")]
pub mod texture_fetch;

pub use color::Color;
pub use context::{FrameContext, FrameRng, TICKS_PER_SECOND};
pub use effects::{LightningBeam, Shockwave, Starfield};
pub use error::{TextureError, TextureResult};
pub use events::{VisualEventQueue, VisualEventReceiver, VisualEventSender, DEFAULT_EVENT_CAPACITY};
pub use minimap::{MinimapProjector, MinimapStats};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use scene::{FrameInput, SceneCompositor};
pub use stats::FrameStats;
pub use surface::{ColorStop, CompositeMode, DrawCommand, Paint, RecordingSurface, Surface, TextAlign, TextStyle};
pub use tank::{draw_tank, BarrelArchetype, TankDraw};
pub use texture_cache::{StaticFetcher, Texture, TextureCache, TextureCacheStats, TextureFetcher};

// === FLAG FETCH (feature = "http") ===
#[cfg(feature = "http")]
pub use texture_fetch::HttpTextureFetcher;
