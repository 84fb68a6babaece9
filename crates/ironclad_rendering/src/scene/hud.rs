//! Step 9: HUD overlays.
//!
//! Desktop gets the crosshair and an edge vignette; touch devices get the
//! virtual joystick and fire button instead of the vignette.

use std::f32::consts::TAU;

use ironclad_shared::{ColorToken, CrosshairStyle, PointerState, Rect, Vec2, Viewport};

use crate::color::Color;
use crate::context::FrameContext;
use crate::shapes;
use crate::surface::{ColorStop, CompositeMode, Paint, Surface};

/// Joystick base radius before UI scaling.
const JOYSTICK_RADIUS: f32 = 60.0;
/// Fire button radius before UI scaling.
const FIRE_RADIUS: f32 = 42.0;

/// Draws every HUD overlay for the device class.
pub fn draw_hud(s: &mut dyn Surface, ctx: &FrameContext<'_>, viewport: &Viewport, pointer: &PointerState) {
    if viewport.is_mobile() {
        draw_touch_controls(s, ctx, viewport, pointer);
    } else {
        draw_crosshair(s, ctx, pointer.position);
        draw_vignette(s, Vec2::new(viewport.width, viewport.height));
    }
}

/// Crosshair at `at` in the configured style and color.
pub fn draw_crosshair(s: &mut dyn Surface, ctx: &FrameContext<'_>, at: Vec2) {
    if !at.is_finite() {
        return;
    }
    let ui = &ctx.settings.interface;
    let scale = ctx.settings.accessibility.ui_scale;
    let color = ctx.color(ui.crosshair_color);
    let paint = Paint::Solid(color);
    s.save();
    match ui.crosshair {
        CrosshairStyle::Dot => {
            if shapes::circle(s, at.x, at.y, 3.0 * scale) {
                s.fill(&paint);
            }
        }
        CrosshairStyle::Cross => {
            let arm = 10.0 * scale;
            s.begin_path();
            s.move_to(at.x - arm, at.y);
            s.line_to(at.x + arm, at.y);
            s.move_to(at.x, at.y - arm);
            s.line_to(at.x, at.y + arm);
            s.stroke(&paint, 2.0);
        }
        CrosshairStyle::Circle => {
            if shapes::circle(s, at.x, at.y, 12.0 * scale) {
                s.stroke(&paint, 2.0);
            }
        }
        CrosshairStyle::Default => {
            // Ring with a center gap and four ticks.
            let r = 10.0 * scale;
            if shapes::circle(s, at.x, at.y, r) {
                s.stroke(&paint, 1.5);
            }
            s.begin_path();
            for k in 0..4 {
                let dir = Vec2::from_angle(k as f32 * TAU / 4.0);
                let inner = at + dir * (r * 0.5);
                let outer = at + dir * (r * 1.6);
                s.move_to(inner.x, inner.y);
                s.line_to(outer.x, outer.y);
            }
            s.stroke(&paint, 1.5);
            if shapes::circle(s, at.x, at.y, 1.5 * scale) {
                s.fill(&paint);
            }
        }
    }
    s.restore();
}

/// Virtual joystick (bottom left) and fire button (bottom right).
pub fn draw_touch_controls(s: &mut dyn Surface, ctx: &FrameContext<'_>, viewport: &Viewport, pointer: &PointerState) {
    let scale = ctx.settings.accessibility.ui_scale;
    let base_r = JOYSTICK_RADIUS * scale;
    let joystick = &pointer.joystick;
    let origin = if joystick.active && joystick.origin.is_finite() {
        joystick.origin
    } else {
        Vec2::new(base_r + 30.0, viewport.height - base_r - 30.0)
    };

    s.save();
    s.set_alpha(if joystick.active { 0.5 } else { 0.25 });
    if shapes::circle(s, origin.x, origin.y, base_r) {
        s.fill(&Paint::Solid(Color::BLACK.with_alpha(0.5)));
        s.stroke(&Paint::Solid(Color::WHITE), 2.0);
    }
    let knob = if joystick.knob.is_finite() {
        let len = joystick.knob.length();
        if len > base_r { joystick.knob * (base_r / len) } else { joystick.knob }
    } else {
        Vec2::ZERO
    };
    s.set_alpha(0.7);
    if shapes::circle(s, origin.x + knob.x, origin.y + knob.y, base_r * 0.4) {
        s.fill(&Paint::Solid(Color::WHITE));
    }

    let fire_r = FIRE_RADIUS * scale;
    let fire = Vec2::new(viewport.width - fire_r - 40.0, viewport.height - fire_r - 40.0);
    let accent = ctx.color(ColorToken::Hostile);
    s.set_alpha(if pointer.firing { 0.85 } else { 0.45 });
    if pointer.firing {
        s.set_composite(CompositeMode::Lighter);
    }
    if shapes::circle(s, fire.x, fire.y, fire_r) {
        s.fill(&Paint::Solid(accent));
        s.stroke(&Paint::Solid(Color::WHITE), 2.0);
    }
    s.restore();
}

/// Radial darkening of the frame edges.
pub fn draw_vignette(s: &mut dyn Surface, size: Vec2) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let center = size * 0.5;
    let stops = [
        ColorStop::new(0.0, Color::TRANSPARENT),
        ColorStop::new(0.65, Color::TRANSPARENT),
        ColorStop::new(1.0, Color::BLACK.with_alpha(0.5)),
    ];
    if shapes::rect(s, Rect::new(0.0, 0.0, size.x, size.y)) {
        s.fill(&Paint::Radial {
            inner_center: center,
            inner_radius: 0.0,
            outer_center: center,
            outer_radius: center.length(),
            stops: &stops,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FrameRng;
    use crate::surface::{DrawCommand, PaintKind, RecordingSurface};
    use ironclad_shared::{DeviceClass, Settings};

    fn hud(settings: &Settings, viewport: &Viewport) -> RecordingSurface {
        let mut rng = FrameRng::seeded(0);
        let ctx = FrameContext {
            settings,
            tick: 0,
            camera_offset: Vec2::ZERO,
            rng: &mut rng,
        };
        let pointer = PointerState {
            position: Vec2::new(300.0, 200.0),
            ..PointerState::default()
        };
        let mut s = RecordingSurface::new(640, 480);
        draw_hud(&mut s, &ctx, viewport, &pointer);
        s
    }

    fn radial_fills(s: &RecordingSurface) -> usize {
        s.count(|c| matches!(c, DrawCommand::Fill { kind: PaintKind::Radial, .. }))
    }

    #[test]
    fn test_vignette_only_on_desktop() {
        let settings = Settings::default();
        let mut viewport = Viewport::new(640.0, 480.0);
        assert_eq!(radial_fills(&hud(&settings, &viewport)), 1);
        viewport.device = DeviceClass::Mobile;
        assert_eq!(radial_fills(&hud(&settings, &viewport)), 0);
    }

    #[test]
    fn test_every_crosshair_style_draws() {
        let viewport = Viewport::new(640.0, 480.0);
        for style in [CrosshairStyle::Default, CrosshairStyle::Dot, CrosshairStyle::Cross, CrosshairStyle::Circle] {
            let mut settings = Settings::default();
            settings.interface.crosshair = style;
            let s = hud(&settings, &viewport);
            assert!(s.commands().len() > 2, "{style:?}");
            assert_eq!(s.save_depth(), 0);
        }
    }

    #[test]
    fn test_touch_controls_on_mobile() {
        let settings = Settings::default();
        let mut viewport = Viewport::new(640.0, 480.0);
        viewport.device = DeviceClass::Mobile;
        let s = hud(&settings, &viewport);
        assert!(s.count(|c| matches!(c, DrawCommand::Arc { .. })) >= 3);
        assert_eq!(s.save_depth(), 0);
    }
}
