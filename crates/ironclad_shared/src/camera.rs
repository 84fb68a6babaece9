//! Camera, viewport and pointer state handed to the renderer each frame.

use serde::{Deserialize, Serialize};

use crate::math::{Rect, Vec2};

/// Camera state owned by the host.
///
/// `shake` is an accumulator the host bumps on impacts and decays on its
/// own; the renderer only samples it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World position at the center of the screen.
    pub center: Vec2,
    /// Shake magnitude in pixels.
    pub shake: f32,
}

impl Camera {
    /// Camera centered on `center` with no shake.
    #[must_use]
    pub const fn new(center: Vec2) -> Self {
        Self { center, shake: 0.0 }
    }
}

/// Device class, drives HUD overlays and effect budgets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Mouse and keyboard.
    #[default]
    Desktop,
    /// Touch device; draws virtual controls and skips the vignette.
    Mobile,
}

/// Logical viewport in CSS-style pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Logical width.
    pub width: f32,
    /// Logical height.
    pub height: f32,
    /// Physical pixels per logical pixel.
    pub device_pixel_ratio: f32,
    /// Battery saver or weak GPU.
    pub low_power: bool,
    /// Device class.
    pub device: DeviceClass,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
            low_power: false,
            device: DeviceClass::Desktop,
        }
    }
}

impl Viewport {
    /// Desktop viewport of the given logical size at ratio 1.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Half of the logical size.
    #[must_use]
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// True on touch devices.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.device == DeviceClass::Mobile
    }

    /// Logical screen rectangle anchored at the origin.
    #[must_use]
    pub fn screen_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width.max(0.0), self.height.max(0.0))
    }
}

/// Virtual joystick as seen by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JoystickState {
    /// Screen position of the joystick base.
    pub origin: Vec2,
    /// Knob displacement from the base.
    pub knob: Vec2,
    /// Finger down.
    pub active: bool,
}

/// Pointer and touch-control state, used for HUD drawing only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    /// Screen position of the mouse or aim touch.
    pub position: Vec2,
    /// Movement joystick.
    pub joystick: JoystickState,
    /// Fire button held.
    pub firing: bool,
}
