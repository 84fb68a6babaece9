//! # Effect Layer
//!
//! Time-driven ambient and skill-triggered visuals, independent of the
//! tank compositor.
//!
//! This module provides:
//! - `skills` - one draw routine per [`ironclad_shared::SkillType`], plus dash afterimages
//! - `Starfield` - layered parallax stars with toroidal wraparound
//! - `draw_lightning` - jittered beam with an optional branch
//! - `Shockwave` - fading additive distortion ring
//!
//! Skill routines hold no state of their own: the frame tick and the
//! entity's rotation and radius drive all motion.

mod lightning;
mod shockwave;
pub mod skills;
mod starfield;

pub use lightning::{draw_lightning, LightningBeam};
pub use shockwave::Shockwave;
pub use skills::{draw_afterimages, draw_skill, skill_routine, SkillFrame, SkillRoutine};
pub use starfield::{Star, Starfield, STAR_LAYER_FACTORS};
