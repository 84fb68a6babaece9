//! Steps 1 and 2: backing surface size and camera offset.

use ironclad_shared::{Camera, Settings, Vec2, Viewport};
use tracing::debug;

use crate::context::FrameRng;
use crate::surface::Surface;

/// Resize only when either dimension moves by more than this many pixels.
pub const RESIZE_HYSTERESIS: u32 = 4;

/// Upper bound of the device pixel ratio honored by the renderer.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Device pixel ratio after clamping; low-power devices render at 1.
#[must_use]
pub fn effective_pixel_ratio(viewport: &Viewport) -> f32 {
    if viewport.low_power {
        return 1.0;
    }
    let ratio = viewport.device_pixel_ratio;
    if ratio.is_finite() && ratio > 0.0 {
        ratio.clamp(0.5, MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Backing surface size for the logical viewport under the resolution
/// scale and pixel ratio.
#[must_use]
pub fn backing_size(viewport: &Viewport, settings: &Settings) -> (u32, u32) {
    let factor = settings.graphics.resolution_scale * effective_pixel_ratio(viewport);
    let side = |logical: f32| -> u32 {
        let px = logical * factor;
        if px.is_finite() && px > 0.0 {
            px.round() as u32
        } else {
            0
        }
    };
    (side(viewport.width), side(viewport.height))
}

/// True when `target` differs from `current` by more than the hysteresis.
/// An empty surface always takes the first non-equal target.
#[must_use]
pub fn needs_resize(current: (u32, u32), target: (u32, u32)) -> bool {
    if current.0 == 0 || current.1 == 0 {
        return current != target;
    }
    current.0.abs_diff(target.0) > RESIZE_HYSTERESIS || current.1.abs_diff(target.1) > RESIZE_HYSTERESIS
}

/// Resizes `s` towards `target` when the hysteresis allows. Returns
/// whether a resize happened.
pub fn apply_size(s: &mut dyn Surface, target: (u32, u32)) -> bool {
    let current = s.size();
    if !needs_resize(current, target) {
        return false;
    }
    debug!(from = ?current, to = ?target, "resizing backing surface");
    s.resize(target.0, target.1);
    true
}

/// World position of the screen's top-left corner, plus shake jitter
/// when screen shake is enabled.
pub fn camera_offset(camera: &Camera, viewport: &Viewport, settings: &Settings, rng: &mut FrameRng) -> Vec2 {
    let center = if camera.center.is_finite() { camera.center } else { Vec2::ZERO };
    let mut offset = center - viewport.half_size();
    if settings.graphics.screen_shake && camera.shake.is_finite() && camera.shake > 0.0 {
        offset += Vec2::new(rng.signed() * camera.shake, rng.signed() * camera.shake);
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use ironclad_shared::RawSettings;

    fn settings_with_resolution(percent: f32) -> Settings {
        let mut raw = RawSettings::default();
        raw.graphics.resolution = Some(percent);
        Settings::normalize(&raw)
    }

    #[test]
    fn test_half_resolution_halves_backing_size() {
        let viewport = Viewport::new(1000.0, 800.0);
        assert_eq!(backing_size(&viewport, &settings_with_resolution(50.0)), (500, 400));
    }

    #[test]
    fn test_pixel_ratio_clamped_and_low_power() {
        let mut viewport = Viewport::new(100.0, 100.0);
        viewport.device_pixel_ratio = 3.0;
        assert_eq!(backing_size(&viewport, &Settings::default()), (200, 200));
        viewport.low_power = true;
        assert_eq!(backing_size(&viewport, &Settings::default()), (100, 100));
        viewport.low_power = false;
        viewport.device_pixel_ratio = f32::NAN;
        assert_eq!(backing_size(&viewport, &Settings::default()), (100, 100));
    }

    #[test]
    fn test_hysteresis() {
        let mut s = RecordingSurface::new(500, 400);
        assert!(!apply_size(&mut s, (503, 397)));
        assert!(apply_size(&mut s, (510, 400)));
        assert_eq!(s.size(), (510, 400));
        assert_eq!(s.resize_count(), 1);
    }

    #[test]
    fn test_empty_surface_takes_small_target() {
        let mut s = RecordingSurface::new(0, 0);
        assert!(apply_size(&mut s, (3, 2)));
        assert_eq!(s.size(), (3, 2));
        assert!(!apply_size(&mut s, (3, 2)));
        assert_eq!(s.resize_count(), 1);
    }

    #[test]
    fn test_shake_only_when_enabled() {
        let camera = Camera { center: Vec2::new(500.0, 500.0), shake: 10.0 };
        let viewport = Viewport::new(200.0, 100.0);
        let mut settings = Settings::default();
        settings.graphics.screen_shake = false;
        let mut rng = FrameRng::seeded(1);
        assert_eq!(camera_offset(&camera, &viewport, &settings, &mut rng), Vec2::new(400.0, 450.0));

        settings.graphics.screen_shake = true;
        let shaken = camera_offset(&camera, &viewport, &settings, &mut rng);
        assert!((shaken.x - 400.0).abs() <= 10.0 && (shaken.y - 450.0).abs() <= 10.0);
    }
}
