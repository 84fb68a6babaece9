//! Barrel archetypes and their decorators.
//!
//! Every decorator paints one barrel in a local frame where the barrel
//! points along +x from the (recoil-shifted) root at `x = 0` to
//! `x = length`, centered on `y = 0`. Dimensions arrive pre-scaled.

use ironclad_shared::{Barrel, BarrelSubType, Rect, Vec2, WeaponSchema, WeaponType};

use crate::color::Color;
use crate::shapes;
use crate::surface::{ColorStop, CompositeMode, Paint, Surface};

/// Decorator family of a barrel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarrelArchetype {
    /// Boxed multi-tube launcher pod.
    ClusterPod,
    /// Twin-rail accelerator.
    Rail,
    /// Rocket tube with warhead.
    Rocket,
    /// Industrial claw.
    Claw,
    /// Drone hangar deck.
    Hangar,
    /// Energy/tesla core.
    TeslaCore,
    /// Heavy artillery piston barrel.
    Piston,
    /// Sniper shroud and scope.
    Sniper,
    /// Plain rifled barrel.
    Rifled,
}

impl BarrelArchetype {
    /// Every archetype.
    pub const ALL: [Self; 9] = [
        Self::ClusterPod,
        Self::Rail,
        Self::Rocket,
        Self::Claw,
        Self::Hangar,
        Self::TeslaCore,
        Self::Piston,
        Self::Sniper,
        Self::Rifled,
    ];

    /// Picks the archetype: barrel sub-type first, then weapon id, then
    /// weapon type, defaulting to [`BarrelArchetype::Rifled`].
    #[must_use]
    pub fn select(schema: &WeaponSchema, barrel: &Barrel) -> Self {
        if let Some(arch) = barrel.sub_type.and_then(Self::from_sub_type) {
            return arch;
        }
        if let Some(arch) = Self::from_weapon_id(&schema.id) {
            return arch;
        }
        Self::from_weapon_type(schema.weapon_type)
    }

    const fn from_sub_type(sub: BarrelSubType) -> Option<Self> {
        match sub {
            BarrelSubType::Pod => Some(Self::ClusterPod),
            BarrelSubType::Rail => Some(Self::Rail),
            BarrelSubType::Rocket => Some(Self::Rocket),
            BarrelSubType::Claw => Some(Self::Claw),
            BarrelSubType::Hangar => Some(Self::Hangar),
            BarrelSubType::Core => Some(Self::TeslaCore),
            BarrelSubType::Piston => Some(Self::Piston),
            BarrelSubType::Shroud => Some(Self::Sniper),
            BarrelSubType::Standard => Some(Self::Rifled),
            BarrelSubType::Unknown => None,
        }
    }

    fn from_weapon_id(id: &str) -> Option<Self> {
        match id {
            "cluster" | "cluster_pod" => Some(Self::ClusterPod),
            "hangar" | "overseer" | "carrier" => Some(Self::Hangar),
            "sniper" | "assassin" => Some(Self::Sniper),
            _ => None,
        }
    }

    const fn from_weapon_type(kind: WeaponType) -> Self {
        match kind {
            WeaponType::Launcher => Self::Rocket,
            WeaponType::Railgun => Self::Rail,
            WeaponType::Tesla => Self::TeslaCore,
            WeaponType::Drone => Self::Hangar,
            WeaponType::Builder => Self::Claw,
            WeaponType::Artillery => Self::Piston,
            WeaponType::Sniper => Self::Sniper,
            WeaponType::Bullet
            | WeaponType::Laser
            | WeaponType::Trap
            | WeaponType::Flame
            | WeaponType::Unknown => Self::Rifled,
        }
    }

    /// The archetype → decorator table.
    #[must_use]
    pub fn decorator(self) -> BarrelDecorator {
        match self {
            Self::ClusterPod => cluster_pod,
            Self::Rail => rail,
            Self::Rocket => rocket,
            Self::Claw => claw,
            Self::Hangar => hangar,
            Self::TeslaCore => tesla_core,
            Self::Piston => piston,
            Self::Sniper => sniper,
            Self::Rifled => rifled,
        }
    }
}

/// Inputs of a barrel decorator.
#[derive(Debug, Clone, Copy)]
pub struct BarrelFrame {
    /// Scaled barrel length.
    pub length: f32,
    /// Scaled barrel width.
    pub width: f32,
    /// Resolved accent color.
    pub accent: Color,
    /// Frame tick for blinking and pulsing.
    pub tick: u64,
    /// Entity reload progress, 1.0 = loaded.
    pub reload: f32,
    /// Index of this barrel in the schema.
    pub index: usize,
}

impl BarrelFrame {
    fn blink(&self, period: u64) -> bool {
        period > 0 && (self.tick + self.index as u64 * 7) % period < period / 2
    }

    fn pulse(&self, period: f32) -> f32 {
        ((self.tick as f32 / period) * std::f32::consts::TAU).sin() * 0.5 + 0.5
    }
}

/// Paints one barrel.
pub type BarrelDecorator = fn(&mut dyn Surface, &BarrelFrame);

// =============================================================================
// Sub-layers
// =============================================================================

/// Metal body with a cross-barrel shading gradient and a dark outline.
fn metal(s: &mut dyn Surface, rect: Rect, base: Color) {
    let stops = [
        ColorStop::new(0.0, base.darken(0.35)),
        ColorStop::new(0.45, base.lighten(0.25)),
        ColorStop::new(1.0, base.darken(0.45)),
    ];
    if shapes::rect(s, rect) {
        s.fill(&Paint::Linear {
            from: Vec2::new(rect.x, rect.y),
            to: Vec2::new(rect.x, rect.bottom()),
            stops: &stops,
        });
        s.stroke(&Paint::Solid(Color::STEEL_DARK), 1.5);
    }
}

fn glass(s: &mut dyn Surface, x: f32, y: f32, r: f32, tint: Color) {
    let stops = [
        ColorStop::new(0.0, Color::WHITE.with_alpha(0.9)),
        ColorStop::new(0.35, tint.lighten(0.2)),
        ColorStop::new(1.0, tint.darken(0.6)),
    ];
    if shapes::circle(s, x, y, r) {
        s.fill(&Paint::Radial {
            inner_center: Vec2::new(x - r * 0.3, y - r * 0.3),
            inner_radius: 0.0,
            outer_center: Vec2::new(x, y),
            outer_radius: r,
            stops: &stops,
        });
    }
}

fn hazard_stripes(s: &mut dyn Surface, rect: Rect) {
    if !shapes::rect(s, rect) {
        return;
    }
    s.save();
    s.fill(&Paint::Solid(Color::HAZARD));
    s.clip();
    let step = (rect.height.max(2.0)) * 0.8;
    let mut x = rect.x - rect.height;
    s.begin_path();
    while x < rect.right() {
        s.move_to(x, rect.bottom());
        s.line_to(x + rect.height, rect.y);
        x += step * 2.0;
    }
    s.stroke(&Paint::Solid(Color::BLACK.with_alpha(0.85)), step * 0.7);
    s.restore();
}

fn rivet(s: &mut dyn Surface, x: f32, y: f32, r: f32) {
    if shapes::circle(s, x, y, r) {
        s.fill(&Paint::Solid(Color::GUNMETAL.lighten(0.4)));
        s.stroke(&Paint::Solid(Color::STEEL_DARK), 0.8);
    }
}

fn status_light(s: &mut dyn Surface, x: f32, y: f32, r: f32, on: bool, color: Color) {
    let c = if on { color } else { color.darken(0.7) };
    if shapes::circle(s, x, y, r) {
        s.fill(&Paint::Solid(c));
    }
    if on {
        s.save();
        s.set_composite(CompositeMode::Lighter);
        s.set_alpha(0.5);
        if shapes::circle(s, x, y, r * 2.2) {
            s.fill(&Paint::Solid(c));
        }
        s.restore();
    }
}

// =============================================================================
// Decorators
// =============================================================================

fn rifled(s: &mut dyn Surface, f: &BarrelFrame) {
    let (l, w) = (f.length, f.width);
    metal(s, Rect::new(0.0, -w * 0.5, l, w), Color::GUNMETAL);
    // Rifling grooves.
    s.set_alpha(0.35);
    for k in [-0.2, 0.2] {
        s.begin_path();
        s.move_to(l * 0.35, w * k);
        s.line_to(l * 0.95, w * k);
        s.stroke(&Paint::Solid(Color::STEEL_DARK), 1.0);
    }
    s.set_alpha(1.0);
    // Muzzle collar.
    metal(s, Rect::new(l * 0.88, -w * 0.6, l * 0.12, w * 1.2), Color::GUNMETAL.darken(0.2));
}

fn cluster_pod(s: &mut dyn Surface, f: &BarrelFrame) {
    let (l, w) = (f.length, f.width * 1.5);
    metal(s, Rect::new(l * 0.2, -w * 0.5, l * 0.8, w), Color::GUNMETAL.lerp(f.accent, 0.2));
    hazard_stripes(s, Rect::new(l * 0.25, -w * 0.5, l * 0.15, w));
    // 2x2 tube mouths.
    let tube = w * 0.18;
    for (dx, dy) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
        let x = l * 0.85 + dx * tube * 1.1;
        let y = dy * w * 0.22;
        if shapes::circle(s, x, y, tube) {
            s.fill(&Paint::Solid(Color::BLACK));
            s.stroke(&Paint::Solid(Color::GUNMETAL.lighten(0.3)), 1.0);
        }
    }
    status_light(s, l * 0.5, 0.0, w * 0.07, f.blink(30), f.accent);
}

fn rail(s: &mut dyn Surface, f: &BarrelFrame) {
    let (l, w) = (f.length, f.width);
    let rail_w = w * 0.28;
    metal(s, Rect::new(0.0, -w * 0.5, l, rail_w), Color::GUNMETAL);
    metal(s, Rect::new(0.0, w * 0.5 - rail_w, l, rail_w), Color::GUNMETAL);
    // Energy channel between the rails.
    s.save();
    s.set_composite(CompositeMode::Lighter);
    s.set_alpha(0.4 + f.pulse(30.0) * 0.5);
    let channel = w - rail_w * 2.0;
    if shapes::rect(s, Rect::new(l * 0.1, -channel * 0.5, l * 0.9, channel)) {
        s.fill(&Paint::Solid(f.accent.lighten(0.3)));
    }
    s.restore();
    // Coils.
    for k in 0..4 {
        let x = l * (0.2 + k as f32 * 0.18);
        metal(s, Rect::new(x, -w * 0.62, l * 0.05, w * 1.24), Color::hex(0xB8_73_33_FF));
    }
}

fn rocket(s: &mut dyn Surface, f: &BarrelFrame) {
    let (l, w) = (f.length, f.width);
    metal(s, Rect::new(0.0, -w * 0.5, l * 0.85, w), Color::hex(0x55_6B_2F_FF));
    hazard_stripes(s, Rect::new(l * 0.6, -w * 0.5, l * 0.1, w));
    // Warhead shows only while loaded.
    if f.reload >= 1.0 {
        s.begin_path();
        s.move_to(l * 0.85, -w * 0.4);
        s.quad_to(l * 1.05, -w * 0.3, l * 1.1, 0.0);
        s.quad_to(l * 1.05, w * 0.3, l * 0.85, w * 0.4);
        s.close_path();
        s.fill(&Paint::Solid(f.accent));
        // Glint.
        s.save();
        s.set_composite(CompositeMode::Lighter);
        s.set_alpha(0.3 + f.pulse(50.0) * 0.6);
        if shapes::circle(s, l * 0.95, -w * 0.15, w * 0.1) {
            s.fill(&Paint::Solid(Color::WHITE));
        }
        s.restore();
    } else if shapes::circle(s, l * 0.85, 0.0, w * 0.35) {
        s.fill(&Paint::Solid(Color::BLACK));
    }
    // Exhaust vents.
    for k in [-0.3, 0.3] {
        if shapes::rect(s, Rect::new(l * 0.05, w * k - w * 0.05, l * 0.12, w * 0.1)) {
            s.fill(&Paint::Solid(Color::STEEL_DARK));
        }
    }
}

fn claw(s: &mut dyn Surface, f: &BarrelFrame) {
    let (l, w) = (f.length, f.width);
    metal(s, Rect::new(0.0, -w * 0.3, l * 0.7, w * 0.6), Color::GUNMETAL);
    hazard_stripes(s, Rect::new(l * 0.15, -w * 0.3, l * 0.2, w * 0.6));
    let open = 0.15 + f.pulse(80.0) * 0.2;
    for side in [-1.0_f32, 1.0] {
        s.begin_path();
        s.move_to(l * 0.65, side * w * 0.25);
        s.quad_to(l * 0.9, side * w * (0.5 + open), l * 1.05, side * w * open);
        s.line_to(l * 0.9, side * w * open * 0.5);
        s.quad_to(l * 0.8, side * w * 0.3, l * 0.65, side * w * 0.1);
        s.close_path();
        s.fill(&Paint::Solid(Color::HAZARD.darken(0.2)));
        s.stroke(&Paint::Solid(Color::STEEL_DARK), 1.2);
    }
    rivet(s, l * 0.65, 0.0, w * 0.12);
    status_light(s, l * 0.4, 0.0, w * 0.08, f.reload >= 1.0, Color::hex(0x76_FF_03_FF));
}

fn hangar(s: &mut dyn Surface, f: &BarrelFrame) {
    let (l, w) = (f.length, f.width);
    // Trapezoid deck flaring towards the mouth.
    s.begin_path();
    s.move_to(0.0, -w * 0.35);
    s.line_to(l, -w * 0.6);
    s.line_to(l, w * 0.6);
    s.line_to(0.0, w * 0.35);
    s.close_path();
    s.fill(&Paint::Solid(Color::GUNMETAL.darken(0.15)));
    s.stroke(&Paint::Solid(Color::STEEL_DARK), 1.5);
    // Launch lights chase towards the mouth.
    let lit = (f.tick / 8 % 4) as usize;
    for k in 0..4 {
        let x = l * (0.25 + k as f32 * 0.2);
        status_light(s, x, 0.0, w * 0.06, k == lit, f.accent);
    }
    hazard_stripes(s, Rect::new(l * 0.92, -w * 0.6, l * 0.08, w * 1.2));
}

fn tesla_core(s: &mut dyn Surface, f: &BarrelFrame) {
    let (l, w) = (f.length, f.width);
    metal(s, Rect::new(0.0, -w * 0.35, l * 0.7, w * 0.7), Color::GUNMETAL);
    let core = w * (0.45 + f.pulse(24.0) * 0.1);
    s.save();
    s.set_composite(CompositeMode::Lighter);
    let stops = [
        ColorStop::new(0.0, Color::WHITE),
        ColorStop::new(0.5, f.accent),
        ColorStop::new(1.0, f.accent.with_alpha(0.0)),
    ];
    if shapes::circle(s, l * 0.8, 0.0, core * 1.6) {
        s.fill(&Paint::Radial {
            inner_center: Vec2::new(l * 0.8, 0.0),
            inner_radius: 0.0,
            outer_center: Vec2::new(l * 0.8, 0.0),
            outer_radius: core * 1.6,
            stops: &stops,
        });
    }
    s.restore();
    glass(s, l * 0.8, 0.0, core, f.accent);
    // Containment prongs.
    for side in [-1.0_f32, 1.0] {
        metal(s, Rect::new(l * 0.6, side * w * 0.55 - w * 0.08, l * 0.4, w * 0.16), Color::GUNMETAL.lighten(0.1));
    }
}

fn piston(s: &mut dyn Surface, f: &BarrelFrame) {
    let (l, w) = (f.length, f.width);
    metal(s, Rect::new(0.0, -w * 0.5, l, w), Color::GUNMETAL.darken(0.1));
    // Recoil piston rings.
    for k in 0..3 {
        let x = l * (0.15 + k as f32 * 0.12);
        metal(s, Rect::new(x, -w * 0.62, l * 0.06, w * 1.24), Color::GUNMETAL.lighten(0.15));
    }
    // Muzzle brake with side ports.
    metal(s, Rect::new(l * 0.85, -w * 0.7, l * 0.15, w * 1.4), Color::GUNMETAL);
    for k in [-0.35, 0.35] {
        if shapes::rect(s, Rect::new(l * 0.88, w * k - w * 0.08, l * 0.09, w * 0.16)) {
            s.fill(&Paint::Solid(Color::BLACK));
        }
    }
    rivet(s, l * 0.08, -w * 0.3, w * 0.07);
    rivet(s, l * 0.08, w * 0.3, w * 0.07);
}

fn sniper(s: &mut dyn Surface, f: &BarrelFrame) {
    let (l, w) = (f.length, f.width);
    metal(s, Rect::new(0.0, -w * 0.35, l, w * 0.7), Color::GUNMETAL);
    // Shroud over the root.
    metal(s, Rect::new(0.0, -w * 0.55, l * 0.45, w * 1.1), Color::hex(0x3E_44_4C_FF));
    // Scope on top.
    metal(s, Rect::new(l * 0.15, -w * 1.15, l * 0.35, w * 0.4), Color::STEEL_DARK.lighten(0.1));
    glass(s, l * 0.5, -w * 0.95, w * 0.2, f.accent);
    // Laser-sight dot when loaded.
    status_light(s, l * 0.97, 0.0, w * 0.1, f.reload >= 1.0 && f.blink(40), Color::hex(0xFF_17_44_FF));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use ironclad_shared::WeaponCatalog;

    fn frame() -> BarrelFrame {
        BarrelFrame {
            length: 38.0,
            width: 16.0,
            accent: Color::WHITE,
            tick: 5,
            reload: 1.0,
            index: 0,
        }
    }

    #[test]
    fn test_every_decorator_draws_balanced() {
        for arch in BarrelArchetype::ALL {
            let mut s = RecordingSurface::new(200, 200);
            (arch.decorator())(&mut s, &frame());
            assert!(s.fill_count() > 0, "{arch:?} drew nothing");
            assert_eq!(s.save_depth(), 0, "{arch:?} left state pushed");
            assert_eq!(s.invalid_geometry(), 0, "{arch:?} invalid geometry");
        }
    }

    #[test]
    fn test_selection_prefers_sub_type() {
        let catalog = WeaponCatalog::builtin();
        let cases = [
            ("railgun", BarrelArchetype::Rail),
            ("rocket", BarrelArchetype::Rocket),
            ("cluster", BarrelArchetype::ClusterPod),
            ("builder", BarrelArchetype::Claw),
            ("hangar", BarrelArchetype::Hangar),
            ("tesla", BarrelArchetype::TeslaCore),
            ("artillery", BarrelArchetype::Piston),
            ("sniper", BarrelArchetype::Sniper),
            ("twin", BarrelArchetype::Rifled),
        ];
        for (id, expected) in cases {
            let schema = catalog.resolve(Some(id));
            assert_eq!(BarrelArchetype::select(schema, &schema.barrels[0]), expected, "{id}");
        }
    }

    #[test]
    fn test_unknown_sub_type_falls_back_to_weapon_type() {
        let schema = WeaponSchema::new("x", "X", WeaponType::Launcher);
        let barrel = Barrel::default().with_sub_type(BarrelSubType::Unknown);
        assert_eq!(BarrelArchetype::select(&schema, &barrel), BarrelArchetype::Rocket);
        let plain = WeaponSchema::new("y", "Y", WeaponType::Unknown);
        assert_eq!(BarrelArchetype::select(&plain, &Barrel::default()), BarrelArchetype::Rifled);
    }

    #[test]
    fn test_rocket_warhead_only_when_loaded() {
        let mut loaded = RecordingSurface::new(200, 200);
        rocket(&mut loaded, &frame());
        let mut empty = RecordingSurface::new(200, 200);
        rocket(&mut empty, &BarrelFrame { reload: 0.3, ..frame() });
        assert!(loaded.fill_count() > empty.fill_count());
    }
}
