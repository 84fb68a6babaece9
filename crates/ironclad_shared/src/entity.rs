//! World entities as seen by the renderer.
//!
//! Entities are produced and owned by the simulation. The renderer gets a
//! read-only [`WorldSnapshot`] each frame and never writes back.

use serde::{Deserialize, Serialize};

use crate::math::{Rect, Vec2};
use crate::tokens::ColorToken;
use crate::weapon::BodyShape;

/// Simulation-assigned entity identity.
pub type EntityId = u64;

/// Category tag that selects the draw routine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Human-controlled tank.
    #[default]
    Player,
    /// AI-controlled tank.
    Enemy,
    /// Boss unit with a bespoke silhouette.
    Boss,
    /// Bullet-like projectile.
    Projectile,
    /// Beam/laser bolt.
    Laser,
    /// Guided missile.
    Missile,
    /// Stationary trap.
    Trap,
    /// Drone owned by a tank.
    Drone,
    /// Decorative/collectible food shape.
    Food,
    /// Axis-aligned wall block.
    Wall,
    /// Axis-aligned zone (hazard, capture area).
    Zone,
    /// Simulation-side particle-like object.
    Particle,
}

impl EntityKind {
    /// True for weapon-bearing entities rendered by the tank compositor.
    #[must_use]
    pub const fn is_tank(self) -> bool {
        matches!(self, Self::Player | Self::Enemy)
    }

    /// True for kinds that are described by a width/height box.
    #[must_use]
    pub const fn is_box(self) -> bool {
        matches!(self, Self::Wall | Self::Zone)
    }
}

/// Status effects that get an overlay on top of the entity body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    /// On fire.
    Burning,
    /// Frozen in place.
    Frozen,
    /// Poisoned.
    Poisoned,
    /// Stunned.
    Stunned,
    /// Electrified.
    Shocked,
    /// Slowed.
    Slowed,
}

/// Cosmetic trail left behind a moving tank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailStyle {
    /// Fading sparks.
    Sparks,
    /// Square pixels.
    Pixels,
    /// Falling code glyphs.
    Code,
    /// Soft smoke puffs.
    Smoke,
}

/// Active special ability timers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillState {
    /// Whether the skill is currently running.
    pub active: bool,
    /// Seconds since activation.
    pub elapsed: f32,
    /// Total skill duration in seconds.
    pub duration: f32,
}

impl SkillState {
    /// Progress through the skill in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A renderable world object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    /// Identity.
    pub id: EntityId,
    /// Category tag.
    pub kind: EntityKind,
    /// World position (center).
    pub position: Vec2,
    /// World velocity in units per tick.
    pub velocity: Vec2,
    /// Radius for round entities.
    pub radius: f32,
    /// Width/height for walls and zones.
    pub size: Option<Vec2>,
    /// Facing in radians.
    pub rotation: f32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Semantic color.
    pub color: ColorToken,
    /// Draw-order key, higher draws later.
    pub depth: i32,
    /// Weapon catalog id.
    pub weapon_id: Option<String>,
    /// Team id.
    pub team_id: Option<u32>,
    /// Skill timers.
    pub skill: Option<SkillState>,
    /// Active status effects.
    pub status_effects: Vec<StatusEffect>,
    /// Cosmetic flag identifier (ISO country code).
    pub flag: Option<String>,
    /// Cosmetic trail.
    pub trail: Option<TrailStyle>,
    /// Display name.
    pub name: Option<String>,
    /// Floating chat message.
    pub chat: Option<String>,
    /// Silhouette override for food and bosses.
    pub shape: Option<BodyShape>,
    /// Reload progress in `[0, 1]`, 1 means ready to fire.
    pub reload: f32,
    /// Dash in progress (draws afterimages).
    pub dashing: bool,
}

impl Entity {
    /// Convenience constructor for a round entity.
    #[must_use]
    pub fn new(id: EntityId, kind: EntityKind, position: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind,
            position,
            radius,
            health: 100.0,
            max_health: 100.0,
            reload: 1.0,
            ..Self::default()
        }
    }

    /// Health in `[0, 1]`; entities without max health count as full.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Radius clamped to a drawable value (non-finite or negative → 0).
    #[must_use]
    pub fn safe_radius(&self) -> f32 {
        if self.radius.is_finite() {
            self.radius.max(0.0)
        } else {
            0.0
        }
    }

    /// World-space bounds used for culling.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self.size {
            Some(size) if self.kind.is_box() => {
                Rect::centered(self.position, Vec2::new(size.x.max(0.0), size.y.max(0.0)))
            }
            _ => {
                let r = self.safe_radius();
                Rect::centered(self.position, Vec2::new(r * 2.0, r * 2.0))
            }
        }
    }

    /// True when `effect` is active on this entity.
    #[must_use]
    pub fn has_status(&self, effect: StatusEffect) -> bool {
        self.status_effects.contains(&effect)
    }
}

/// Background palette of the current map; drives grid and wall colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallPalette {
    /// Slate gray walls on a dark floor.
    #[default]
    Standard,
    /// Sandstone.
    Desert,
    /// Pale blue ice.
    Frost,
    /// Magenta/cyan neon.
    Neon,
    /// Basalt with glowing seams.
    Lava,
}

/// Static information about the loaded map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapInfo {
    /// Edge length of the square world, centered on the origin.
    pub size: f32,
    /// Wall palette.
    pub palette: WallPalette,
}

impl Default for MapInfo {
    fn default() -> Self {
        Self {
            size: 4000.0,
            palette: WallPalette::Standard,
        }
    }
}

/// Everything the simulation publishes for one tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSnapshot {
    /// Simulation tick this snapshot was taken at.
    pub tick: u64,
    /// Entities in simulation order.
    pub entities: Vec<Entity>,
    /// The locally controlled entity, if spawned.
    pub local_player: Option<EntityId>,
    /// Map information.
    pub map: MapInfo,
}

impl WorldSnapshot {
    /// Looks up an entity by id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_radius_clamps() {
        let mut e = Entity::new(1, EntityKind::Food, Vec2::ZERO, -4.0);
        assert_eq!(e.safe_radius(), 0.0);
        e.radius = f32::NAN;
        assert_eq!(e.safe_radius(), 0.0);
        e.radius = 12.0;
        assert_eq!(e.safe_radius(), 12.0);
    }

    #[test]
    fn test_wall_bounds_use_size() {
        let mut wall = Entity::new(2, EntityKind::Wall, Vec2::new(100.0, 100.0), 0.0);
        wall.size = Some(Vec2::new(200.0, 50.0));
        let b = wall.bounds();
        assert_eq!(b.x, 0.0);
        assert_eq!(b.y, 75.0);
        assert_eq!(b.width, 200.0);
    }

    #[test]
    fn test_skill_progress() {
        let skill = SkillState { active: true, elapsed: 1.0, duration: 4.0 };
        assert!((skill.progress() - 0.25).abs() < 1e-6);
        assert_eq!(SkillState::default().progress(), 0.0);
    }
}
