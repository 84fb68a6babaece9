//! Steps 3 to 5: starfield gate, grid and aim line, plus the per-palette
//! colors shared with the wall drawer.

use ironclad_shared::{ParticleBudget, PointerState, Settings, Vec2, Viewport, WallPalette};

use crate::color::Color;
use crate::context::FrameContext;
use crate::surface::{Paint, Surface};

/// Colors and grid cell of one wall palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteStyle {
    /// Wall body.
    pub wall_fill: Color,
    /// Wall border.
    pub wall_border: Color,
    /// Accent stripe or seam.
    pub stripe: Color,
    /// Grid lines.
    pub grid: Color,
    /// Grid cell size in pixels.
    pub cell: f32,
}

/// Style table per palette.
#[must_use]
pub const fn palette_style(palette: WallPalette) -> PaletteStyle {
    match palette {
        WallPalette::Standard => PaletteStyle {
            wall_fill: Color::hex(0x3A_40_4A_FF),
            wall_border: Color::hex(0x1E_22_28_FF),
            stripe: Color::hex(0x55_5D_69_FF),
            grid: Color::hex(0x2C_33_40_FF),
            cell: 40.0,
        },
        WallPalette::Desert => PaletteStyle {
            wall_fill: Color::hex(0xB0_8D_57_FF),
            wall_border: Color::hex(0x6E_54_2E_FF),
            stripe: Color::hex(0xD9_B9_7C_FF),
            grid: Color::hex(0x4A_3F_2C_FF),
            cell: 50.0,
        },
        WallPalette::Frost => PaletteStyle {
            wall_fill: Color::hex(0x9F_C6_DB_FF),
            wall_border: Color::hex(0x4E_7A_92_FF),
            stripe: Color::hex(0xE6_F7_FF_FF),
            grid: Color::hex(0x2B_3F_52_FF),
            cell: 40.0,
        },
        WallPalette::Neon => PaletteStyle {
            wall_fill: Color::hex(0x1A_10_2E_FF),
            wall_border: Color::hex(0xFF_2E_D1_FF),
            stripe: Color::hex(0x00_F0_FF_FF),
            grid: Color::hex(0x3A_1F_5C_FF),
            cell: 60.0,
        },
        WallPalette::Lava => PaletteStyle {
            wall_fill: Color::hex(0x2B_22_22_FF),
            wall_border: Color::hex(0x12_0C_0C_FF),
            stripe: Color::hex(0xFF_57_22_FF),
            grid: Color::hex(0x3D_21_1A_FF),
            cell: 50.0,
        },
    }
}

/// Stars are skipped on mobile devices with a low or disabled particle budget.
#[must_use]
pub fn skip_starfield(viewport: &Viewport, settings: &Settings) -> bool {
    viewport.is_mobile() && matches!(settings.graphics.particles, ParticleBudget::Off | ParticleBudget::Low)
}

/// Draws the background grid over the logical `size`. Returns the number
/// of lines drawn.
pub fn draw_grid(s: &mut dyn Surface, ctx: &FrameContext<'_>, palette: WallPalette, size: Vec2) -> usize {
    let graphics = &ctx.settings.graphics;
    if !graphics.show_grid || graphics.grid_opacity <= 0.0 || !ctx.camera_offset.is_finite() {
        return 0;
    }
    let style = palette_style(palette);
    let cell = style.cell;
    let start_x = -ctx.camera_offset.x.rem_euclid(cell);
    let start_y = -ctx.camera_offset.y.rem_euclid(cell);

    let mut lines = 0;
    s.begin_path();
    let mut x = start_x;
    while x <= size.x {
        s.move_to(x, 0.0);
        s.line_to(x, size.y);
        x += cell;
        lines += 1;
    }
    let mut y = start_y;
    while y <= size.y {
        s.move_to(0.0, y);
        s.line_to(size.x, y);
        y += cell;
        lines += 1;
    }
    s.set_alpha(graphics.grid_opacity);
    s.stroke(&Paint::Solid(style.grid), 1.0);
    s.set_alpha(1.0);
    lines
}

/// Dashed debug line from the viewport center to the pointer.
pub fn draw_aim_line(s: &mut dyn Surface, viewport: &Viewport, pointer: &PointerState) {
    if !pointer.position.is_finite() {
        return;
    }
    let center = viewport.half_size();
    s.save();
    s.set_line_dash(&[6.0, 6.0]);
    s.set_alpha(0.5);
    s.begin_path();
    s.move_to(center.x, center.y);
    s.line_to(pointer.position.x, pointer.position.y);
    s.stroke(&Paint::Solid(Color::WHITE), 1.0);
    s.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FrameRng;
    use crate::surface::{DrawCommand, RecordingSurface};
    use ironclad_shared::DeviceClass;

    #[test]
    fn test_grid_follows_camera_modulo_cell() {
        let settings = Settings::default();
        let mut rng = FrameRng::seeded(0);
        let ctx = FrameContext {
            settings: &settings,
            tick: 0,
            camera_offset: Vec2::new(410.0, 0.0),
            rng: &mut rng,
        };
        let mut s = RecordingSurface::new(200, 100);
        let lines = draw_grid(&mut s, &ctx, WallPalette::Standard, Vec2::new(200.0, 100.0));
        assert!(lines > 0);
        let first = s.commands().iter().find_map(|c| match c {
            DrawCommand::MoveTo { x, .. } => Some(*x),
            _ => None,
        });
        assert_eq!(first, Some(-10.0));
    }

    #[test]
    fn test_grid_hidden_at_zero_opacity() {
        let mut settings = Settings::default();
        settings.graphics.grid_opacity = 0.0;
        let mut rng = FrameRng::seeded(0);
        let ctx = FrameContext {
            settings: &settings,
            tick: 0,
            camera_offset: Vec2::ZERO,
            rng: &mut rng,
        };
        let mut s = RecordingSurface::new(200, 100);
        assert_eq!(draw_grid(&mut s, &ctx, WallPalette::Neon, Vec2::new(200.0, 100.0)), 0);
        assert!(s.commands().is_empty());
    }

    #[test]
    fn test_starfield_gate() {
        let mut settings = Settings::default();
        let mut viewport = Viewport::new(400.0, 300.0);
        assert!(!skip_starfield(&viewport, &settings));
        viewport.device = DeviceClass::Mobile;
        assert!(!skip_starfield(&viewport, &settings));
        settings.graphics.particles = ParticleBudget::Low;
        assert!(skip_starfield(&viewport, &settings));
    }
}
