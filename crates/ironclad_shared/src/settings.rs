//! # Render Settings
//!
//! Two layers:
//!
//! - [`RawSettings`]: what the settings UI persists. Every field is
//!   optional and may be out of range.
//! - [`Settings`]: the normalized, fully-populated value the renderer
//!   reads. Produced once per change by [`Settings::normalize`], so no
//!   draw routine ever deals with a missing toggle.
//!
//! ## Baseline
//!
//! Absent fields take the value of the active [`QualityPreset`]
//! (default [`QualityPreset::High`]):
//!
//! | field | baseline |
//! |---|---|
//! | bloom | on |
//! | shadows | on |
//! | motion blur | off |
//! | screen shake | on |
//! | chromatic aberration | off |
//! | damage numbers | on |
//! | grid | on, 40 % |
//! | particles | high |
//! | resolution | 100 % |
//! | colorblind | off |
//! | UI scale | 1.0 |
//! | crosshair | default, white |
//! | minimap opacity | 0.8 |
//! | streamer mode | off |
//! | aim line | off |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::tokens::{ColorToken, ColorblindMode};

/// Quality preset that seeds every toggle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreset {
    /// Mobile / integrated GPUs.
    Low,
    /// Balanced.
    Medium,
    /// Full effects.
    #[default]
    High,
    /// Everything, including post effects.
    Ultra,
}

/// Particle budget tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleBudget {
    /// No particles at all.
    Off,
    /// Sparse.
    Low,
    /// Moderate.
    Medium,
    /// Dense.
    #[default]
    High,
}

impl ParticleBudget {
    /// Maximum live particles for this tier.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Off => 0,
            Self::Low => 150,
            Self::Medium => 400,
            Self::High => 1000,
        }
    }
}

/// Crosshair shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrosshairStyle {
    /// Bracketed cross with a center dot.
    #[default]
    Default,
    /// Single dot.
    Dot,
    /// Plain cross.
    Cross,
    /// Ring.
    Circle,
}

/// Persisted graphics section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGraphics {
    /// Preset.
    pub quality: Option<QualityPreset>,
    /// Additive glow.
    pub bloom: Option<bool>,
    /// Drop shadows.
    pub shadows: Option<bool>,
    /// Motion blur.
    pub motion_blur: Option<bool>,
    /// Camera shake.
    pub screen_shake: Option<bool>,
    /// Chromatic aberration.
    pub chromatic_aberration: Option<bool>,
    /// Floating damage numbers.
    pub damage_numbers: Option<bool>,
    /// Background grid.
    pub show_grid: Option<bool>,
    /// Grid opacity in percent.
    pub grid_opacity: Option<f32>,
    /// Particle budget.
    pub particles: Option<ParticleBudget>,
    /// Resolution in percent of the viewport.
    pub resolution: Option<f32>,
}

/// Persisted accessibility section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAccessibility {
    /// Colorblind remap.
    pub colorblind: Option<ColorblindMode>,
    /// HUD scale factor.
    pub ui_scale: Option<f32>,
}

/// Persisted interface section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInterface {
    /// Crosshair shape.
    pub crosshair: Option<CrosshairStyle>,
    /// Crosshair color.
    pub crosshair_color: Option<ColorToken>,
    /// Minimap opacity in `[0, 1]`.
    pub minimap_opacity: Option<f32>,
    /// Hide names and chat of other players.
    pub streamer_mode: Option<bool>,
    /// Debug aim line.
    pub aim_line: Option<bool>,
}

/// Settings as persisted; every field optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Graphics section.
    pub graphics: RawGraphics,
    /// Accessibility section.
    pub accessibility: RawAccessibility,
    /// Interface section.
    pub interface: RawInterface,
}

/// Normalized graphics settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphicsSettings {
    /// Preset the baseline came from.
    pub quality: QualityPreset,
    /// Additive glow.
    pub bloom: bool,
    /// Drop shadows.
    pub shadows: bool,
    /// Motion blur.
    pub motion_blur: bool,
    /// Camera shake.
    pub screen_shake: bool,
    /// Chromatic aberration.
    pub chromatic_aberration: bool,
    /// Floating damage numbers.
    pub damage_numbers: bool,
    /// Background grid.
    pub show_grid: bool,
    /// Grid opacity in `[0, 1]`.
    pub grid_opacity: f32,
    /// Particle budget.
    pub particles: ParticleBudget,
    /// Backing-surface scale in `[0.25, 2.0]`.
    pub resolution_scale: f32,
}

/// Normalized accessibility settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccessibilitySettings {
    /// Colorblind remap.
    pub colorblind: ColorblindMode,
    /// HUD scale in `[0.5, 2.0]`.
    pub ui_scale: f32,
}

/// Normalized interface settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterfaceSettings {
    /// Crosshair shape.
    pub crosshair: CrosshairStyle,
    /// Crosshair color.
    pub crosshair_color: ColorToken,
    /// Minimap opacity in `[0, 1]`.
    pub minimap_opacity: f32,
    /// Streamer mode.
    pub streamer_mode: bool,
    /// Debug aim line.
    pub aim_line: bool,
}

/// Fully-populated settings read by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Graphics.
    pub graphics: GraphicsSettings,
    /// Accessibility.
    pub accessibility: AccessibilitySettings,
    /// Interface.
    pub interface: InterfaceSettings,
}

impl GraphicsSettings {
    /// Baseline values of a preset.
    #[must_use]
    pub const fn preset(quality: QualityPreset) -> Self {
        let (bloom, shadows, post, particles, resolution_scale) = match quality {
            QualityPreset::Low => (false, false, false, ParticleBudget::Low, 0.75),
            QualityPreset::Medium => (false, true, false, ParticleBudget::Medium, 1.0),
            QualityPreset::High => (true, true, false, ParticleBudget::High, 1.0),
            QualityPreset::Ultra => (true, true, true, ParticleBudget::High, 1.0),
        };
        Self {
            quality,
            bloom,
            shadows,
            motion_blur: post,
            screen_shake: true,
            chromatic_aberration: post,
            damage_numbers: true,
            show_grid: true,
            grid_opacity: 0.4,
            particles,
            resolution_scale,
        }
    }
}

/// Clamps `value` into `[lo, hi]`, replacing non-finite input with `fallback`.
fn clamp_or(value: Option<f32>, lo: f32, hi: f32, fallback: f32) -> f32 {
    match value {
        Some(v) if v.is_finite() => v.clamp(lo, hi),
        _ => fallback,
    }
}

impl Settings {
    /// Builds the normalized settings from a persisted value.
    #[must_use]
    pub fn normalize(raw: &RawSettings) -> Self {
        let g = &raw.graphics;
        let base = GraphicsSettings::preset(g.quality.unwrap_or_default());
        let graphics = GraphicsSettings {
            quality: base.quality,
            bloom: g.bloom.unwrap_or(base.bloom),
            shadows: g.shadows.unwrap_or(base.shadows),
            motion_blur: g.motion_blur.unwrap_or(base.motion_blur),
            screen_shake: g.screen_shake.unwrap_or(base.screen_shake),
            chromatic_aberration: g.chromatic_aberration.unwrap_or(base.chromatic_aberration),
            damage_numbers: g.damage_numbers.unwrap_or(base.damage_numbers),
            show_grid: g.show_grid.unwrap_or(base.show_grid),
            grid_opacity: clamp_or(g.grid_opacity.map(|p| p / 100.0), 0.0, 1.0, base.grid_opacity),
            particles: g.particles.unwrap_or(base.particles),
            resolution_scale: clamp_or(
                g.resolution.map(|p| p / 100.0),
                0.25,
                2.0,
                base.resolution_scale,
            ),
        };

        let a = &raw.accessibility;
        let accessibility = AccessibilitySettings {
            colorblind: a.colorblind.unwrap_or_default(),
            ui_scale: clamp_or(a.ui_scale, 0.5, 2.0, 1.0),
        };

        let i = &raw.interface;
        let interface = InterfaceSettings {
            crosshair: i.crosshair.unwrap_or_default(),
            crosshair_color: i.crosshair_color.unwrap_or(ColorToken::White),
            minimap_opacity: clamp_or(i.minimap_opacity, 0.0, 1.0, 0.8),
            streamer_mode: i.streamer_mode.unwrap_or(false),
            aim_line: i.aim_line.unwrap_or(false),
        };

        Self {
            graphics,
            accessibility,
            interface,
        }
    }

    /// Parses and normalizes settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Parse`] for malformed TOML.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let raw: RawSettings = toml::from_str(text)?;
        Ok(Self::normalize(&raw))
    }

    /// Loads and normalizes settings from a TOML file.
    ///
    /// # Errors
    ///
    /// I/O and parse failures.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::normalize(&RawSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_take_high_baseline() {
        let s = Settings::default();
        assert_eq!(s.graphics.quality, QualityPreset::High);
        assert!(s.graphics.bloom);
        assert!(!s.graphics.motion_blur);
        assert!((s.graphics.resolution_scale - 1.0).abs() < f32::EPSILON);
        assert_eq!(s.interface.crosshair, CrosshairStyle::Default);
        assert!((s.interface.minimap_opacity - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_explicit_fields_override_preset() {
        let s = Settings::from_toml_str(
            r#"
            [graphics]
            quality = "low"
            bloom = true
            resolution = 50

            [accessibility]
            colorblind = "deuteranopia"
            "#,
        )
        .unwrap();
        assert!(s.graphics.bloom);
        assert!(!s.graphics.shadows);
        assert_eq!(s.graphics.particles, ParticleBudget::Low);
        assert!((s.graphics.resolution_scale - 0.5).abs() < f32::EPSILON);
        assert_eq!(s.accessibility.colorblind, ColorblindMode::Deuteranopia);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let raw = RawSettings {
            graphics: RawGraphics {
                grid_opacity: Some(-30.0),
                resolution: Some(f32::NAN),
                ..RawGraphics::default()
            },
            interface: RawInterface {
                minimap_opacity: Some(7.0),
                ..RawInterface::default()
            },
            accessibility: RawAccessibility {
                ui_scale: Some(0.0),
                ..RawAccessibility::default()
            },
        };
        let s = Settings::normalize(&raw);
        assert_eq!(s.graphics.grid_opacity, 0.0);
        assert!((s.graphics.resolution_scale - 1.0).abs() < f32::EPSILON);
        assert_eq!(s.interface.minimap_opacity, 1.0);
        assert_eq!(s.accessibility.ui_scale, 0.5);
    }
}
