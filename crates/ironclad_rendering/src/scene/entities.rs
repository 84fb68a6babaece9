//! Step 7: depth sort, screen-space cull, per-kind dispatch and the
//! overlays anchored to each entity.
//!
//! ```text
//!   depth_order ─► for each index:
//!                     is_on_screen? ── no ──► culled
//!                        │ yes
//!                     draw_body (match EntityKind)
//!                        │
//!                     draw_overlays (status, health, name, chat)
//! ```

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use ironclad_shared::{
    BodyShape, ElementTag, Entity, EntityKind, Rect, SkillType, StatusEffect, Vec2, WallPalette, WeaponSchema,
    WeaponType,
};

use crate::color::Color;
use crate::context::FrameContext;
use crate::effects::{draw_afterimages, draw_skill, SkillFrame};
use crate::scene::background::palette_style;
use crate::shapes;
use crate::surface::{ColorStop, CompositeMode, Paint, Surface, TextStyle};
use crate::tank::{draw_tank, TankDraw};
use crate::texture_cache::Texture;

/// Extra room around the screen before an entity counts as off-screen.
pub const CULL_MARGIN: f32 = 100.0;

/// Fills `order` with entity indices sorted by depth. The sort is stable,
/// so equal depths keep their snapshot order.
pub fn depth_order(entities: &[Entity], order: &mut Vec<usize>) {
    order.clear();
    order.extend(0..entities.len());
    order.sort_by_key(|&i| entities[i].depth);
}

/// Screen-space cull against the viewport inflated by [`CULL_MARGIN`].
#[must_use]
pub fn is_on_screen(entity: &Entity, camera_offset: Vec2, size: Vec2) -> bool {
    let b = entity.bounds();
    if !(b.x.is_finite() && b.y.is_finite() && b.width.is_finite() && b.height.is_finite()) {
        return false;
    }
    let screen = Rect::new(b.x - camera_offset.x, b.y - camera_offset.y, b.width, b.height);
    screen.intersects(&Rect::new(0.0, 0.0, size.x, size.y).inflate(CULL_MARGIN))
}

/// Per-entity inputs beyond the frame context.
#[derive(Debug, Clone, Copy)]
pub struct EntityDraw<'a> {
    /// The entity.
    pub entity: &'a Entity,
    /// Screen position of its center.
    pub at: Vec2,
    /// Resolved weapon schema (default schema when unresolved).
    pub schema: &'a WeaponSchema,
    /// Map palette.
    pub palette: WallPalette,
    /// Renderer-private per-barrel recoil.
    pub recoil: &'a [f32],
    /// Loaded flag texture.
    pub flag: Option<&'a Texture>,
    /// Locally controlled entity.
    pub is_local: bool,
}

/// Draws the entity body. Returns whether anything was drawn.
pub fn draw_body(s: &mut dyn Surface, ctx: &mut FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    match d.entity.kind {
        EntityKind::Wall => draw_wall(s, d),
        EntityKind::Zone => draw_zone(s, ctx, d),
        EntityKind::Boss => draw_boss(s, ctx, d),
        EntityKind::Player | EntityKind::Enemy => draw_combatant(s, ctx, d),
        EntityKind::Projectile => draw_projectile(s, ctx, d),
        EntityKind::Laser => draw_laser(s, ctx, d),
        EntityKind::Missile => draw_missile(s, ctx, d),
        EntityKind::Trap => draw_trap(s, ctx, d),
        EntityKind::Drone => draw_drone(s, ctx, d),
        EntityKind::Food => draw_food(s, ctx, d),
        EntityKind::Particle => draw_sim_particle(s, ctx, d),
    }
}

/// Facing from velocity, falling back to the entity rotation.
fn heading(entity: &Entity) -> f32 {
    if entity.velocity.is_finite() && entity.velocity.length_squared() > 1e-4 {
        entity.velocity.angle()
    } else if entity.rotation.is_finite() {
        entity.rotation
    } else {
        0.0
    }
}

fn screen_box(d: &EntityDraw<'_>) -> Rect {
    let b = d.entity.bounds();
    Rect::new(d.at.x - b.width * 0.5, d.at.y - b.height * 0.5, b.width, b.height)
}

// =============================================================================
// Static geometry
// =============================================================================

fn draw_wall(s: &mut dyn Surface, d: &EntityDraw<'_>) -> bool {
    let rect = screen_box(d);
    let style = palette_style(d.palette);
    if !shapes::rect(s, rect) {
        return false;
    }
    s.fill(&Paint::Solid(style.wall_fill));
    s.stroke(&Paint::Solid(style.wall_border), 3.0);

    let inset = rect.inflate(-4.0);
    let glowing = matches!(d.palette, WallPalette::Lava | WallPalette::Neon);
    s.save();
    if glowing {
        s.set_composite(CompositeMode::Lighter);
        s.set_alpha(0.6);
    } else {
        s.set_alpha(0.35);
    }
    if shapes::rect(s, inset) {
        s.stroke(&Paint::Solid(style.stripe), if glowing { 2.0 } else { 1.0 });
    }
    s.restore();
    true
}

fn draw_zone(s: &mut dyn Surface, ctx: &FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    let rect = screen_box(d);
    let tint = ctx.color(d.entity.color);
    if !shapes::rect(s, rect) {
        return false;
    }
    s.save();
    s.fill(&Paint::Solid(tint.with_alpha(0.12)));
    s.clip();
    // Diagonal stripes crawl with the tick.
    let step = 24.0;
    let shift = (ctx.tick as f32 * 0.5) % step;
    s.begin_path();
    let mut x = rect.x - rect.height + shift;
    while x < rect.right() {
        s.move_to(x, rect.bottom());
        s.line_to(x + rect.height, rect.y);
        x += step;
    }
    s.set_alpha(0.12);
    s.stroke(&Paint::Solid(tint), 6.0);
    s.restore();

    s.save();
    s.set_line_dash(&[10.0, 6.0]);
    if shapes::rect(s, rect) {
        s.stroke(&Paint::Solid(tint.with_alpha(0.7)), 2.0);
    }
    s.restore();
    true
}

// =============================================================================
// Units
// =============================================================================

fn draw_boss(s: &mut dyn Surface, ctx: &FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    let r = d.entity.safe_radius();
    if r <= 0.0 {
        return false;
    }
    let tint = ctx.color(d.entity.color);
    let spin = ctx.tick as f32 * 0.005;
    s.save();
    s.translate(d.at.x, d.at.y);

    if shapes::star(s, 0.0, 0.0, r * 1.2, r, 12, spin) {
        s.fill(&Paint::Solid(tint.darken(0.4)));
        s.stroke(&Paint::Solid(Color::STEEL_DARK), 3.0);
    }
    let stops = [
        ColorStop::new(0.0, tint.lighten(0.4)),
        ColorStop::new(0.6, tint),
        ColorStop::new(1.0, tint.darken(0.5)),
    ];
    if shapes::polygon(s, 0.0, 0.0, r * 0.75, 6, -spin * 2.0) {
        s.fill(&Paint::Radial {
            inner_center: Vec2::new(-r * 0.25, -r * 0.25),
            inner_radius: 0.0,
            outer_center: Vec2::ZERO,
            outer_radius: r * 0.75,
            stops: &stops,
        });
        s.stroke(&Paint::Solid(Color::STEEL_DARK), 2.0);
    }
    // Eye.
    let pulse = ((ctx.tick as f32 * 0.1).sin() * 0.5 + 0.5) * 0.5 + 0.5;
    let eye = Color::hex(0xFF_17_44_FF);
    s.set_composite(CompositeMode::Lighter);
    s.set_alpha(pulse * 0.5);
    if shapes::circle(s, 0.0, 0.0, r * 0.45) {
        s.fill(&Paint::Solid(eye));
    }
    s.set_alpha(1.0);
    s.set_composite(CompositeMode::SourceOver);
    if shapes::circle(s, 0.0, 0.0, r * 0.22) {
        s.fill(&Paint::Solid(eye));
    }
    s.restore();
    true
}

fn draw_combatant(s: &mut dyn Surface, ctx: &mut FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    let e = d.entity;
    let radius = e.safe_radius();
    if radius <= 0.0 {
        return false;
    }
    let color = ctx.color(e.color);
    if e.dashing {
        draw_afterimages(s, d.at, e.velocity, radius, color);
    }
    let drawn = draw_tank(
        s,
        &TankDraw {
            entity: e,
            schema: d.schema,
            at: d.at,
            color,
            tick: ctx.tick,
            recoil: d.recoil,
            flag: d.flag,
        },
    );
    if let Some(skill) = e.skill.filter(|skill| skill.active) {
        let kind = d.schema.skill.map_or(SkillType::Unknown, |desc| desc.kind);
        let frame = SkillFrame {
            at: d.at,
            radius,
            rotation: e.rotation,
            tick: ctx.tick,
            progress: skill.progress(),
            color,
        };
        draw_skill(s, kind, &frame, ctx.rng);
    }
    drawn
}

// =============================================================================
// Ordnance
// =============================================================================

fn glow_orb(s: &mut dyn Surface, at: Vec2, r: f32, color: Color, bloom: bool) {
    if bloom {
        let stops = [
            ColorStop::new(0.0, color.with_alpha(0.6)),
            ColorStop::new(1.0, color.with_alpha(0.0)),
        ];
        s.save();
        s.set_composite(CompositeMode::Lighter);
        if shapes::circle(s, at.x, at.y, r * 2.2) {
            s.fill(&Paint::Radial {
                inner_center: at,
                inner_radius: 0.0,
                outer_center: at,
                outer_radius: r * 2.2,
                stops: &stops,
            });
        }
        s.restore();
    }
    if shapes::circle(s, at.x, at.y, r) {
        s.fill(&Paint::Solid(color));
        s.stroke(&Paint::Solid(color.darken(0.4)), 1.5);
    }
    if shapes::circle(s, at.x - r * 0.3, at.y - r * 0.3, r * 0.3) {
        s.fill(&Paint::Solid(Color::WHITE.with_alpha(0.6)));
    }
}

fn draw_projectile(s: &mut dyn Surface, ctx: &mut FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    let r = d.entity.safe_radius();
    if r <= 0.0 {
        return false;
    }
    let color = ctx.color(d.entity.color);
    let dir = Vec2::from_angle(heading(d.entity));
    let bloom = ctx.settings.graphics.bloom;
    match d.schema.weapon_type {
        WeaponType::Railgun | WeaponType::Sniper => {
            let length = if d.schema.weapon_type == WeaponType::Railgun { 5.0 } else { 7.0 };
            let tail = d.at - dir * (r * length);
            s.save();
            s.set_composite(CompositeMode::Lighter);
            s.begin_path();
            s.move_to(tail.x, tail.y);
            s.line_to(d.at.x, d.at.y);
            s.stroke(&Paint::Linear {
                from: tail,
                to: d.at,
                stops: &[ColorStop::new(0.0, color.with_alpha(0.0)), ColorStop::new(1.0, color)],
            }, r * 1.2);
            s.restore();
            glow_orb(s, d.at, r * 0.7, Color::WHITE, bloom);
        }
        WeaponType::Flame => {
            let flicker = r * ctx.rng.range(0.8, 1.2);
            let stops = [
                ColorStop::new(0.0, Color::hex(0xFF_F1_76_FF)),
                ColorStop::new(0.5, Color::hex(0xFF_6D_00_CC)),
                ColorStop::new(1.0, Color::hex(0xB7_1C_1C_00)),
            ];
            s.save();
            s.set_composite(CompositeMode::Lighter);
            if shapes::circle(s, d.at.x, d.at.y, flicker) {
                s.fill(&Paint::Radial {
                    inner_center: d.at,
                    inner_radius: 0.0,
                    outer_center: d.at,
                    outer_radius: flicker,
                    stops: &stops,
                });
            }
            s.restore();
        }
        WeaponType::Tesla => {
            glow_orb(s, d.at, r, color.lighten(0.3), bloom);
            s.save();
            s.set_composite(CompositeMode::Lighter);
            s.begin_path();
            for _ in 0..3 {
                let a = ctx.rng.range(0.0, TAU);
                let reach = r * ctx.rng.range(1.4, 2.2);
                let mid = d.at + Vec2::from_angle(a + ctx.rng.signed() * 0.5) * (reach * 0.5);
                let end = d.at + Vec2::from_angle(a) * reach;
                s.move_to(d.at.x, d.at.y);
                s.line_to(mid.x, mid.y);
                s.line_to(end.x, end.y);
            }
            s.stroke(&Paint::Solid(Color::WHITE.with_alpha(0.8)), 1.0);
            s.restore();
        }
        WeaponType::Laser => return draw_laser(s, ctx, d),
        WeaponType::Bullet
        | WeaponType::Drone
        | WeaponType::Trap
        | WeaponType::Launcher
        | WeaponType::Artillery
        | WeaponType::Builder
        | WeaponType::Unknown => glow_orb(s, d.at, r, color, bloom),
    }
    if let Some(element) = d.schema.element {
        draw_element_halo(s, ctx, d.at, r, element);
    }
    true
}

/// Elemental tint ring around a projectile, additive.
fn draw_element_halo(s: &mut dyn Surface, ctx: &mut FrameContext<'_>, at: Vec2, r: f32, element: ElementTag) {
    let pulse = 1.0 + 0.15 * (ctx.time() * 12.0).sin();
    let ring = r * 1.6 * pulse;
    let tint = match element {
        ElementTag::Fire => Color::hex(0xFF_7A_1A_FF),
        ElementTag::Ice => Color::hex(0x9F_E8_FF_FF),
        ElementTag::Poison => Color::hex(0x7C_E0_3A_FF),
        ElementTag::Electric => Color::hex(0xFF_F5_9D_FF),
        ElementTag::Void => Color::hex(0x9C_4D_FF_FF),
        ElementTag::Unknown => return,
    };
    s.save();
    s.set_composite(CompositeMode::Lighter);
    if shapes::circle(s, at.x, at.y, ring) {
        s.stroke(&Paint::Solid(tint.with_alpha(0.7)), (r * 0.3).max(1.0));
    }
    match element {
        ElementTag::Electric => {
            s.begin_path();
            for _ in 0..2 {
                let a = ctx.rng.range(0.0, TAU);
                let from = at + Vec2::from_angle(a) * ring;
                let to = at + Vec2::from_angle(a + ctx.rng.signed() * 0.6) * (ring * 1.5);
                s.move_to(from.x, from.y);
                s.line_to(to.x, to.y);
            }
            s.stroke(&Paint::Solid(tint), 1.0);
        }
        ElementTag::Ice => {
            s.begin_path();
            for i in 0..6 {
                let a = i as f32 * TAU / 6.0;
                let tip = at + Vec2::from_angle(a) * (ring * 1.3);
                let base = at + Vec2::from_angle(a) * ring;
                s.move_to(base.x, base.y);
                s.line_to(tip.x, tip.y);
            }
            s.stroke(&Paint::Solid(tint), 1.0);
        }
        ElementTag::Void => {
            s.set_composite(CompositeMode::SourceOver);
            if shapes::circle(s, at.x, at.y, r * 0.45) {
                s.fill(&Paint::Solid(Color::BLACK.with_alpha(0.85)));
            }
        }
        ElementTag::Fire | ElementTag::Poison | ElementTag::Unknown => {}
    }
    s.restore();
}

fn draw_laser(s: &mut dyn Surface, ctx: &FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    let r = d.entity.safe_radius();
    if r <= 0.0 {
        return false;
    }
    let color = ctx.color(d.entity.color);
    let length = r * 5.0;
    s.save();
    s.translate(d.at.x, d.at.y);
    s.rotate(heading(d.entity));
    s.set_composite(CompositeMode::Lighter);
    s.set_alpha(0.45);
    if shapes::rounded_rect(s, Rect::new(-length, -r, length * 1.2, r * 2.0), r) {
        s.fill(&Paint::Solid(color));
    }
    s.set_alpha(1.0);
    if shapes::rounded_rect(s, Rect::new(-length * 0.9, -r * 0.35, length, r * 0.7), r * 0.35) {
        s.fill(&Paint::Solid(Color::WHITE));
    }
    s.restore();
    true
}

fn draw_missile(s: &mut dyn Surface, ctx: &mut FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    let r = d.entity.safe_radius();
    if r <= 0.0 {
        return false;
    }
    let color = ctx.color(d.entity.color);
    let flame = r * ctx.rng.range(1.0, 2.0);
    s.save();
    s.translate(d.at.x, d.at.y);
    s.rotate(heading(d.entity));

    // Exhaust.
    s.save();
    s.set_composite(CompositeMode::Lighter);
    s.begin_path();
    s.move_to(-r * 1.4, -r * 0.35);
    s.line_to(-r * 1.4 - flame, 0.0);
    s.line_to(-r * 1.4, r * 0.35);
    s.close_path();
    s.fill(&Paint::Solid(Color::hex(0xFF_9E_22_DD)));
    s.restore();

    // Fins.
    for side in [-1.0_f32, 1.0] {
        s.begin_path();
        s.move_to(-r * 1.4, side * r * 0.4);
        s.line_to(-r * 1.8, side * r * 1.0);
        s.line_to(-r * 0.8, side * r * 0.4);
        s.close_path();
        s.fill(&Paint::Solid(color.darken(0.3)));
    }
    if shapes::rounded_rect(s, Rect::new(-r * 1.5, -r * 0.45, r * 2.4, r * 0.9), r * 0.3) {
        s.fill(&Paint::Solid(Color::GUNMETAL.lighten(0.2)));
        s.stroke(&Paint::Solid(Color::STEEL_DARK), 1.0);
    }
    // Warhead.
    s.begin_path();
    s.move_to(r * 0.9, -r * 0.45);
    s.quad_to(r * 1.6, 0.0, r * 0.9, r * 0.45);
    s.close_path();
    s.fill(&Paint::Solid(color));
    s.restore();
    true
}

fn draw_trap(s: &mut dyn Surface, ctx: &FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    let r = d.entity.safe_radius();
    let color = ctx.color(d.entity.color);
    let rotation = if d.entity.rotation.is_finite() { d.entity.rotation } else { 0.0 };
    if !shapes::star(s, d.at.x, d.at.y, r, r * 0.45, 3, rotation - FRAC_PI_2) {
        return false;
    }
    s.fill(&Paint::Solid(color));
    s.stroke(&Paint::Solid(color.darken(0.5)), 2.0);
    true
}

fn draw_drone(s: &mut dyn Surface, ctx: &FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    let r = d.entity.safe_radius();
    let color = ctx.color(d.entity.color);
    let facing = heading(d.entity);
    let built = match d.entity.shape {
        Some(BodyShape::Square) => shapes::polygon(s, d.at.x, d.at.y, r * std::f32::consts::SQRT_2, 4, facing + PI / 4.0),
        Some(BodyShape::Circle) => shapes::circle(s, d.at.x, d.at.y, r),
        _ => shapes::polygon(s, d.at.x, d.at.y, r * 1.2, 3, facing),
    };
    if !built {
        return false;
    }
    s.fill(&Paint::Solid(color));
    s.stroke(&Paint::Solid(color.darken(0.5)), 2.0);
    true
}

fn draw_food(s: &mut dyn Surface, ctx: &FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    let r = d.entity.safe_radius();
    if r <= 0.0 {
        return false;
    }
    let color = ctx.color(d.entity.color);
    let shape = d.entity.shape.unwrap_or(BodyShape::Square);
    let phase = (d.entity.id % 628) as f32 * 0.01;
    let spin = ctx.tick as f32 * 0.01 + phase;
    s.save();
    s.translate(d.at.x, d.at.y);
    s.rotate(spin);
    let built = shapes::body_path(s, shape, r, 0.0);
    if built {
        s.fill(&Paint::Solid(color));
        s.stroke(&Paint::Solid(color.darken(0.45)), 2.5);
    }
    s.restore();
    built
}

fn draw_sim_particle(s: &mut dyn Surface, ctx: &FrameContext<'_>, d: &EntityDraw<'_>) -> bool {
    let r = d.entity.safe_radius();
    s.set_alpha(0.6);
    let built = shapes::circle(s, d.at.x, d.at.y, r);
    if built {
        s.fill(&Paint::Solid(ctx.color(d.entity.color)));
    }
    s.set_alpha(1.0);
    built
}

// =============================================================================
// Overlays
// =============================================================================

/// Kinds that show a health bar when damaged.
const fn has_health_bar(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::Player | EntityKind::Enemy | EntityKind::Boss | EntityKind::Food | EntityKind::Drone | EntityKind::Trap
    )
}

/// Draws status effects, health bar, name label and chat bubble.
pub fn draw_overlays(s: &mut dyn Surface, ctx: &mut FrameContext<'_>, d: &EntityDraw<'_>) {
    let e = d.entity;
    let r = e.safe_radius();
    if !e.status_effects.is_empty() && r > 0.0 {
        draw_status(s, ctx, d.at, r, &e.status_effects);
    }
    if has_health_bar(e.kind) && e.health_fraction() < 1.0 && r > 0.0 {
        draw_health_bar(s, d.at, r, e.health_fraction());
    }
    let hidden = ctx.settings.interface.streamer_mode && !d.is_local;
    if hidden || !(e.kind.is_tank() || e.kind == EntityKind::Boss) {
        return;
    }
    let scale = ctx.settings.accessibility.ui_scale;
    let mut top = d.at.y - r - 10.0 * scale;
    if let Some(name) = e.name.as_deref().filter(|n| !n.is_empty()) {
        let style = TextStyle::new(14.0 * scale).bold();
        s.stroke_text(name, d.at.x, top, &style, Color::BLACK, 3.0);
        s.fill_text(name, d.at.x, top, &style, Color::WHITE);
        top -= 18.0 * scale;
    }
    if let Some(chat) = e.chat.as_deref().filter(|c| !c.is_empty()) {
        draw_chat_bubble(s, d.at.x, top, chat, scale);
    }
}

fn draw_status(s: &mut dyn Surface, ctx: &mut FrameContext<'_>, at: Vec2, r: f32, effects: &[StatusEffect]) {
    s.save();
    for (k, effect) in effects.iter().enumerate() {
        let ring = r + 4.0 + k as f32 * 3.0;
        match effect {
            StatusEffect::Burning => {
                s.set_composite(CompositeMode::Lighter);
                s.set_alpha(ctx.rng.range(0.4, 0.8));
                if shapes::circle(s, at.x, at.y, ring) {
                    s.stroke(&Paint::Solid(Color::hex(0xFF_6D_00_FF)), 3.0);
                }
                s.set_composite(CompositeMode::SourceOver);
            }
            StatusEffect::Frozen => {
                s.set_alpha(0.35);
                if shapes::polygon(s, at.x, at.y, ring, 6, 0.0) {
                    s.fill(&Paint::Solid(Color::hex(0xB3_E5_FC_FF)));
                    s.stroke(&Paint::Solid(Color::WHITE), 1.5);
                }
            }
            StatusEffect::Poisoned => {
                s.set_alpha(0.6);
                if shapes::circle(s, at.x, at.y, ring) {
                    s.stroke(&Paint::Solid(Color::hex(0x76_FF_03_FF)), 2.0);
                }
            }
            StatusEffect::Stunned => {
                s.set_alpha(0.9);
                let base = ctx.tick as f32 * 0.08;
                for i in 0..3 {
                    let a = base + i as f32 * TAU / 3.0;
                    let p = at + Vec2::new(a.cos() * r * 0.6, -r - 8.0 + a.sin() * 4.0);
                    if shapes::star(s, p.x, p.y, 4.0, 1.8, 5, a) {
                        s.fill(&Paint::Solid(Color::hex(0xFF_EB_3B_FF)));
                    }
                }
            }
            StatusEffect::Shocked => {
                s.set_composite(CompositeMode::Lighter);
                s.set_alpha(0.8);
                s.begin_path();
                for _ in 0..2 {
                    let a = ctx.rng.range(0.0, TAU);
                    let from = at + Vec2::from_angle(a) * (r * 0.6);
                    let to = at + Vec2::from_angle(a + ctx.rng.signed() * 0.6) * ring;
                    s.move_to(from.x, from.y);
                    s.line_to(to.x, to.y);
                }
                s.stroke(&Paint::Solid(Color::hex(0x80_D8_FF_FF)), 1.5);
                s.set_composite(CompositeMode::SourceOver);
            }
            StatusEffect::Slowed => {
                s.set_alpha(0.5);
                s.set_line_dash(&[4.0, 4.0]);
                if shapes::circle(s, at.x, at.y, ring) {
                    s.stroke(&Paint::Solid(Color::hex(0x90_A4_AE_FF)), 2.0);
                }
                s.set_line_dash(&[]);
            }
        }
    }
    s.restore();
}

fn draw_health_bar(s: &mut dyn Surface, at: Vec2, r: f32, fraction: f32) {
    let width = (r * 2.0).max(24.0);
    let bar = Rect::new(at.x - width * 0.5, at.y + r + 8.0, width, 5.0);
    if shapes::rounded_rect(s, bar.inflate(1.0), 3.0) {
        s.fill(&Paint::Solid(Color::BLACK.with_alpha(0.6)));
    }
    let fill = Color::hex(0xE5_39_35_FF).lerp(Color::hex(0x66_BB_6A_FF), fraction);
    let filled = Rect::new(bar.x, bar.y, bar.width * fraction, bar.height);
    if shapes::rounded_rect(s, filled, 2.5) {
        s.fill(&Paint::Solid(fill));
    }
}

fn draw_chat_bubble(s: &mut dyn Surface, x: f32, bottom: f32, text: &str, scale: f32) {
    let size = 12.0 * scale;
    let width = (text.chars().count() as f32 * size * 0.55 + 12.0).min(320.0);
    let height = size + 10.0;
    let bubble = Rect::new(x - width * 0.5, bottom - height, width, height);
    if shapes::rounded_rect(s, bubble, 6.0) {
        s.fill(&Paint::Solid(Color::WHITE.with_alpha(0.9)));
        s.stroke(&Paint::Solid(Color::STEEL_DARK), 1.0);
    }
    s.fill_text(text, x, bottom - height * 0.5, &TextStyle::new(size), Color::BLACK);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FrameRng;
    use crate::surface::{DrawCommand, RecordingSurface};
    use ironclad_shared::{Settings, WeaponCatalog};

    fn draw_one(entity: &Entity, settings: &Settings) -> RecordingSurface {
        let catalog = WeaponCatalog::builtin();
        let mut rng = FrameRng::seeded(3);
        let mut ctx = FrameContext {
            settings,
            tick: 10,
            camera_offset: Vec2::ZERO,
            rng: &mut rng,
        };
        let d = EntityDraw {
            entity,
            at: entity.position,
            schema: catalog.resolve(entity.weapon_id.as_deref()),
            palette: WallPalette::Lava,
            recoil: &[],
            flag: None,
            is_local: false,
        };
        let mut s = RecordingSurface::new(400, 400);
        draw_body(&mut s, &mut ctx, &d);
        draw_overlays(&mut s, &mut ctx, &d);
        s
    }

    #[test]
    fn test_depth_sort_is_stable() {
        let depths = [2, 0, 1, 0, 2, 1, 0];
        let entities: Vec<Entity> = depths
            .iter()
            .enumerate()
            .map(|(i, &depth)| Entity { id: i as u64, depth, ..Entity::default() })
            .collect();
        let mut order = Vec::new();
        depth_order(&entities, &mut order);
        assert_eq!(order, vec![1, 3, 6, 2, 5, 0, 4]);
        let first = order.clone();
        depth_order(&entities, &mut order);
        assert_eq!(order, first);
    }

    #[test]
    fn test_cull_uses_inflated_view() {
        let size = Vec2::new(800.0, 600.0);
        let near = Entity::new(1, EntityKind::Food, Vec2::new(-80.0, 300.0), 10.0);
        let far = Entity::new(2, EntityKind::Food, Vec2::new(-200.0, 300.0), 10.0);
        assert!(is_on_screen(&near, Vec2::ZERO, size));
        assert!(!is_on_screen(&far, Vec2::ZERO, size));
        assert!(is_on_screen(&far, Vec2::new(-300.0, 0.0), size));
    }

    #[test]
    fn test_every_kind_draws_balanced() {
        let kinds = [
            EntityKind::Player,
            EntityKind::Enemy,
            EntityKind::Boss,
            EntityKind::Projectile,
            EntityKind::Laser,
            EntityKind::Missile,
            EntityKind::Trap,
            EntityKind::Drone,
            EntityKind::Food,
            EntityKind::Wall,
            EntityKind::Zone,
            EntityKind::Particle,
        ];
        let settings = Settings::default();
        for kind in kinds {
            let mut e = Entity::new(1, kind, Vec2::new(200.0, 200.0), 16.0);
            e.size = Some(Vec2::new(120.0, 60.0));
            e.health = 40.0;
            e.status_effects = vec![StatusEffect::Burning, StatusEffect::Stunned, StatusEffect::Slowed];
            let s = draw_one(&e, &settings);
            assert!(s.fill_count() > 0, "{kind:?}");
            assert_eq!(s.save_depth(), 0, "{kind:?}");
            assert_eq!(s.invalid_geometry(), 0, "{kind:?}");
        }
    }

    #[test]
    fn test_zero_radius_body_draws_nothing() {
        let settings = Settings::default();
        for kind in [EntityKind::Player, EntityKind::Boss, EntityKind::Food, EntityKind::Projectile, EntityKind::Wall] {
            let e = Entity::new(1, kind, Vec2::new(50.0, 50.0), 0.0);
            let s = draw_one(&e, &settings);
            assert_eq!(s.fill_count(), 0, "{kind:?}");
            assert_eq!(s.invalid_geometry(), 0);
        }
    }

    #[test]
    fn test_streamer_mode_hides_names() {
        let mut e = Entity::new(1, EntityKind::Enemy, Vec2::new(200.0, 200.0), 20.0);
        e.name = Some("rival".into());
        e.chat = Some("gg".into());
        let texts = |s: &RecordingSurface| s.count(|c| matches!(c, DrawCommand::FillText { .. }));
        assert_eq!(texts(&draw_one(&e, &Settings::default())), 2);
        let mut streamer = Settings::default();
        streamer.interface.streamer_mode = true;
        assert_eq!(texts(&draw_one(&e, &streamer)), 0);
    }

    #[test]
    fn test_element_tints_projectile() {
        let settings = Settings::default();
        let entity = Entity::new(1, EntityKind::Projectile, Vec2::new(200.0, 200.0), 6.0);
        let draw = |schema: &WeaponSchema| {
            let mut rng = FrameRng::seeded(3);
            let mut ctx = FrameContext {
                settings: &settings,
                tick: 10,
                camera_offset: Vec2::ZERO,
                rng: &mut rng,
            };
            let d = EntityDraw {
                entity: &entity,
                at: entity.position,
                schema,
                palette: WallPalette::Lava,
                recoil: &[],
                flag: None,
                is_local: false,
            };
            let mut s = RecordingSurface::new(400, 400);
            draw_body(&mut s, &mut ctx, &d);
            s
        };
        let strokes = |s: &RecordingSurface| s.count(|c| matches!(c, DrawCommand::Stroke { .. }));

        let plain = draw(&WeaponSchema::new("p", "Plain", WeaponType::Bullet));
        for element in ElementTag::ALL {
            let tinted = draw(&WeaponSchema::new("e", "Elemental", WeaponType::Bullet).element(*element));
            assert!(strokes(&tinted) > strokes(&plain), "{element:?}");
            assert_eq!(tinted.save_depth(), 0, "{element:?}");
            assert_eq!(tinted.invalid_geometry(), 0, "{element:?}");
        }
        let unknown = draw(&WeaponSchema::new("u", "Unknown", WeaponType::Bullet).element(ElementTag::Unknown));
        assert_eq!(strokes(&unknown), strokes(&plain));
    }

    #[test]
    fn test_missing_weapon_uses_default_schema() {
        let mut e = Entity::new(1, EntityKind::Enemy, Vec2::new(100.0, 100.0), 24.0);
        e.weapon_id = Some("missing_id".into());
        let s = draw_one(&e, &Settings::default());
        assert!(s.fill_count() > 0);
        assert_eq!(s.save_depth(), 0);
    }
}
