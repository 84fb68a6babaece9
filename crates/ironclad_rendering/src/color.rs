//! Color resolution.
//!
//! Maps a semantic [`ColorToken`] plus the active [`ColorblindMode`] to a
//! display [`Color`]. Pure and total: the same pair always resolves to the
//! same color, and every drawer goes through [`resolve`].

use ironclad_shared::{ColorToken, ColorblindMode};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Arena floor.
    pub const BACKGROUND: Self = Self::hex(0x0B_0E_14_FF);
    /// Gunmetal used for barrels.
    pub const GUNMETAL: Self = Self::hex(0x5A_61_6B_FF);
    /// Dark steel used for contours.
    pub const STEEL_DARK: Self = Self::hex(0x2A_2E_35_FF);
    /// Hazard-stripe yellow.
    pub const HAZARD: Self = Self::hex(0xF5_C2_18_FF);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from hex value (0xRRGGBBAA).
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, a)
    }

    /// Creates an opaque color from 8-bit channels.
    #[must_use]
    pub const fn rgb8(rgb: [u8; 3]) -> Self {
        Self::rgb(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        )
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Linearly interpolates between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Moves towards white by `amount` in `[0, 1]`.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        self.lerp(Self::WHITE.with_alpha(self.a), amount.clamp(0.0, 1.0))
    }

    /// Moves towards black by `amount` in `[0, 1]`.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        self.lerp(Self::BLACK.with_alpha(self.a), amount.clamp(0.0, 1.0))
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Quantizes to 8-bit channels.
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

// =============================================================================
// Palettes
// =============================================================================

const BLUE: u32 = 0x00_B2_E1_FF;
const RED: u32 = 0xF1_4E_54_FF;
const GREEN: u32 = 0x00_E1_6E_FF;
const PURPLE: u32 = 0xBF_7F_F5_FF;
const YELLOW: u32 = 0xFF_E8_69_FF;
const ORANGE: u32 = 0xFF_9F_1C_FF;
const PINK: u32 = 0xF1_77_DD_FF;
const CYAN: u32 = 0x3C_F2_FF_FF;
const GRAY: u32 = 0x99_99_99_FF;
const WHITE: u32 = 0xFF_FF_FF_FF;
const GOLD: u32 = 0xFF_D7_00_FF;

/// Red/green-safe substitutes (blue stays, red becomes vermillion-orange,
/// green becomes sky blue).
const CB_RED: u32 = 0xE6_9F_00_FF;
const CB_GREEN: u32 = 0x56_B4_E9_FF;
const CB_BLUE: u32 = 0x00_72_B2_FF;
const CB_PINK: u32 = 0xCC_79_A7_FF;

/// Blue/yellow-safe substitutes.
const TRI_BLUE: u32 = 0x00_9E_73_FF;
const TRI_YELLOW: u32 = 0xF0_5A_9E_FF;
const TRI_CYAN: u32 = 0x2E_C4_B6_FF;

fn base_hex(token: ColorToken) -> u32 {
    match token {
        ColorToken::Friendly | ColorToken::Blue => BLUE,
        ColorToken::Hostile | ColorToken::Red => RED,
        ColorToken::Neutral | ColorToken::Gray => GRAY,
        ColorToken::Boss | ColorToken::Purple => PURPLE,
        ColorToken::Accent | ColorToken::Cyan => CYAN,
        ColorToken::Warning | ColorToken::Orange => ORANGE,
        ColorToken::Green => GREEN,
        ColorToken::Yellow => YELLOW,
        ColorToken::Pink => PINK,
        ColorToken::White => WHITE,
        ColorToken::Gold => GOLD,
        ColorToken::Rgb(rgb) => {
            (u32::from(rgb[0]) << 24) | (u32::from(rgb[1]) << 16) | (u32::from(rgb[2]) << 8) | 0xFF
        }
    }
}

fn red_green_safe(token: ColorToken) -> Option<u32> {
    match token {
        ColorToken::Friendly | ColorToken::Blue => Some(CB_BLUE),
        ColorToken::Hostile | ColorToken::Red => Some(CB_RED),
        ColorToken::Green => Some(CB_GREEN),
        ColorToken::Pink => Some(CB_PINK),
        _ => None,
    }
}

fn blue_yellow_safe(token: ColorToken) -> Option<u32> {
    match token {
        ColorToken::Friendly | ColorToken::Blue => Some(TRI_BLUE),
        ColorToken::Yellow | ColorToken::Gold => Some(TRI_YELLOW),
        ColorToken::Accent | ColorToken::Cyan => Some(TRI_CYAN),
        _ => None,
    }
}

fn saturate(color: Color) -> Color {
    let push = |c: f32| if c >= 0.5 { 1.0 } else { 0.0 };
    let out = Color::rgba(push(color.r), push(color.g), push(color.b), color.a);
    // Never pure black: the floor is near-black.
    if out.r + out.g + out.b == 0.0 {
        Color::WHITE.with_alpha(color.a)
    } else {
        out
    }
}

/// Resolves a semantic token under an accessibility mode.
#[must_use]
pub fn resolve(token: ColorToken, mode: ColorblindMode) -> Color {
    let remapped = match (mode, token) {
        (_, ColorToken::Rgb(_)) | (ColorblindMode::Off | ColorblindMode::HighContrast, _) => None,
        (ColorblindMode::Protanopia | ColorblindMode::Deuteranopia, t) => red_green_safe(t),
        (ColorblindMode::Tritanopia, t) => blue_yellow_safe(t),
    };
    let color = Color::hex(remapped.unwrap_or_else(|| base_hex(token)));
    if mode == ColorblindMode::HighContrast {
        saturate(color)
    } else {
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_pure() {
        for mode in [
            ColorblindMode::Off,
            ColorblindMode::Protanopia,
            ColorblindMode::Deuteranopia,
            ColorblindMode::Tritanopia,
            ColorblindMode::HighContrast,
        ] {
            for token in [ColorToken::Friendly, ColorToken::Hostile, ColorToken::Rgb([1, 2, 3])] {
                assert_eq!(resolve(token, mode), resolve(token, mode));
            }
        }
    }

    #[test]
    fn test_protan_separates_red_and_green() {
        let red = resolve(ColorToken::Red, ColorblindMode::Protanopia);
        let green = resolve(ColorToken::Green, ColorblindMode::Protanopia);
        assert_ne!(red, resolve(ColorToken::Red, ColorblindMode::Off));
        assert_ne!(red, green);
    }

    #[test]
    fn test_rgb_only_altered_by_high_contrast() {
        let token = ColorToken::Rgb([200, 20, 20]);
        let plain = resolve(token, ColorblindMode::Off);
        assert_eq!(resolve(token, ColorblindMode::Deuteranopia), plain);
        assert_eq!(resolve(token, ColorblindMode::Tritanopia), plain);
        assert_eq!(resolve(token, ColorblindMode::HighContrast), Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_hex_channels() {
        assert_eq!(Color::hex(0xFF00_00FF).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Color::rgb8([0, 255, 0]).to_rgba8(), [0, 255, 0, 255]);
    }
}
