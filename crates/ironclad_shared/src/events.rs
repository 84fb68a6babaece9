//! Transient visual events signaled by the simulation.
//!
//! The simulation emits these when something happens that deserves a
//! visual flourish (a hit, a kill, a shot). They carry no authoritative
//! state: the renderer may drop any of them under load without affecting
//! the game.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::math::Vec2;
use crate::tokens::ColorToken;

/// One-shot visual cue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VisualEvent {
    // =========================================================================
    // Combat
    // =========================================================================
    /// Something blew up.
    Explosion {
        /// World position.
        position: Vec2,
        /// Blast radius in world units.
        radius: f32,
        /// Tint.
        color: ColorToken,
    },

    /// A projectile hit a surface or a target.
    Impact {
        /// World position.
        position: Vec2,
        /// Direction the projectile travelled, radians.
        direction: f32,
        /// Tint.
        color: ColorToken,
    },

    /// Damage was dealt; spawns a floating number.
    Damage {
        /// World position of the victim.
        position: Vec2,
        /// Damage amount.
        amount: f32,
        /// Critical hit (larger, gold number).
        critical: bool,
    },

    /// A barrel fired.
    MuzzleFlash {
        /// Firing entity.
        entity: EntityId,
        /// Index of the barrel in the weapon schema.
        barrel: usize,
        /// World position of the muzzle.
        position: Vec2,
        /// Facing of the barrel, radians.
        direction: f32,
    },

    // =========================================================================
    // Full-screen effects
    // =========================================================================
    /// Chain lightning between two world points, drawn for one frame.
    Lightning {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Tint.
        color: ColorToken,
    },

    /// Expanding distortion ring.
    Shockwave {
        /// Ring center.
        origin: Vec2,
        /// Final radius.
        max_radius: f32,
        /// Tint.
        color: ColorToken,
    },

    // =========================================================================
    // Cosmetic
    // =========================================================================
    /// A wall or shape broke apart.
    Debris {
        /// World position.
        position: Vec2,
        /// Number of chunks.
        count: u32,
        /// Tint.
        color: ColorToken,
    },

    /// Glitchy code glyph burst (void element hits).
    CodeBurst {
        /// World position.
        position: Vec2,
        /// Number of glyphs.
        count: u32,
    },
}

impl VisualEvent {
    /// World position the event is anchored at.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        match self {
            Self::Explosion { position, .. }
            | Self::Impact { position, .. }
            | Self::Damage { position, .. }
            | Self::MuzzleFlash { position, .. }
            | Self::Debris { position, .. }
            | Self::CodeBurst { position, .. } => *position,
            Self::Lightning { from, .. } => *from,
            Self::Shockwave { origin, .. } => *origin,
        }
    }
}
