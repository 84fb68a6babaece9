//! Semantic color tokens and accessibility modes.
//!
//! The simulation never deals in pixels. It tags entities with a token
//! and the renderer resolves the token against the active
//! [`ColorblindMode`].

use serde::{Deserialize, Serialize};

/// Semantic color carried by entities and settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    /// Local player and teammates.
    #[default]
    Friendly,
    /// Opposing players and hostile units.
    Hostile,
    /// Unaligned objects.
    Neutral,
    /// Boss units.
    Boss,
    /// UI accent.
    Accent,
    /// Warnings, hazard stripes.
    Warning,
    /// Palette blue.
    Blue,
    /// Palette red.
    Red,
    /// Palette green.
    Green,
    /// Palette purple.
    Purple,
    /// Palette yellow.
    Yellow,
    /// Palette orange.
    Orange,
    /// Palette pink.
    Pink,
    /// Palette cyan.
    Cyan,
    /// Palette gray.
    Gray,
    /// Palette white.
    White,
    /// Palette gold.
    Gold,
    /// Explicit sRGB triple.
    Rgb([u8; 3]),
}

/// Colorblind remapping applied during color resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorblindMode {
    /// No remapping.
    #[default]
    Off,
    /// Red-weak.
    Protanopia,
    /// Green-weak.
    Deuteranopia,
    /// Blue-weak.
    Tritanopia,
    /// Saturated extremes for low vision.
    HighContrast,
}
