//! # Weapon Catalog
//!
//! Static weapon/archetype definitions keyed by weapon id.
//!
//! The catalog is loaded once at startup (built-in table or a TOML file)
//! and is immutable for the rest of the process. Lookups never fail: an
//! unresolved id yields the catalog's default schema.
//!
//! ## TOML layout
//!
//! ```toml
//! [[weapon]]
//! id = "twin"
//! name = "Twin"
//! weapon_type = "bullet"
//!
//! [[weapon.barrels]]
//! offset = -7.0
//! width = 13.0
//! length = 36.0
//! ```
//!
//! Barrel dimensions are authored for a tank of radius [`BASE_RADIUS`].

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Tank radius the barrel dimensions are authored against.
pub const BASE_RADIUS: f32 = 20.0;

/// Id of the schema used when a lookup fails.
pub const DEFAULT_WEAPON_ID: &str = "basic";

macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Tag not known to this build.
            Unknown,
        }

        impl $name {
            /// Every known variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire tag of this variant.
            #[must_use]
            pub const fn tag(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                    Self::Unknown => "unknown",
                }
            }

            /// Parses a wire tag; unknown tags map to `Unknown`.
            #[must_use]
            pub fn from_tag(tag: &str) -> Self {
                match tag.trim().to_ascii_lowercase().as_str() {
                    $($tag => Self::$variant,)+
                    _ => Self::Unknown,
                }
            }
        }

        impl From<String> for $name {
            fn from(tag: String) -> Self {
                Self::from_tag(&tag)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.tag().to_owned()
            }
        }
    };
}

tag_enum! {
    /// What a weapon fires.
    pub enum WeaponType {
        /// Plain bullets.
        Bullet => "bullet",
        /// Continuous or bolt lasers.
        Laser => "laser",
        /// Drone carrier.
        Drone => "drone",
        /// Trap layer.
        Trap => "trap",
        /// Missile/rocket launcher.
        Launcher => "launcher",
        /// Chain-lightning emitter.
        Tesla => "tesla",
        /// Flamethrower.
        Flame => "flame",
        /// Rail accelerator.
        Railgun => "railgun",
        /// Long-range rifle.
        Sniper => "sniper",
        /// Heavy shells.
        Artillery => "artillery",
        /// Construction claw.
        Builder => "builder",
    }
}

tag_enum! {
    /// Per-barrel decoration hint.
    pub enum BarrelSubType {
        /// Plain rifled barrel.
        Standard => "standard",
        /// Cluster pod.
        Pod => "pod",
        /// Rail pair.
        Rail => "rail",
        /// Rocket tube.
        Rocket => "rocket",
        /// Builder claw.
        Claw => "claw",
        /// Drone hangar deck.
        Hangar => "hangar",
        /// Energy core.
        Core => "core",
        /// Artillery piston.
        Piston => "piston",
        /// Sniper shroud.
        Shroud => "shroud",
    }
}

tag_enum! {
    /// Chassis silhouette.
    pub enum BodyShape {
        /// Round hull (default).
        Circle => "circle",
        /// Square hull.
        Square => "square",
        /// Triangular hull.
        Triangle => "triangle",
        /// Pentagon (food).
        Pentagon => "pentagon",
        /// Hexagonal hull.
        Hexagon => "hexagon",
        /// Octagonal hull.
        Octagon => "octagon",
        /// Five-point star.
        Star => "star",
        /// Rotating spiked starburst.
        Spike => "spike",
        /// Dark rotating starburst.
        Obsidian => "obsidian",
        /// Rounded bulldozer hull with a plow.
        Dozer => "dozer",
        /// Diamond (food).
        Diamond => "diamond",
    }
}

tag_enum! {
    /// Elemental flavor of the projectiles.
    pub enum ElementTag {
        /// Burning.
        Fire => "fire",
        /// Freezing.
        Ice => "ice",
        /// Poison.
        Poison => "poison",
        /// Electric.
        Electric => "electric",
        /// Void.
        Void => "void",
    }
}

tag_enum! {
    /// Special ability attached to a weapon.
    pub enum SkillType {
        /// Hexagonal ward.
        Shield => "shield",
        /// Nano armor plating.
        NanoArmor => "nano_armor",
        /// Reflective prism.
        MirrorPrism => "mirror_prism",
        /// Electromagnetic pulse.
        Emp => "emp",
        /// Gravity well.
        GravityWell => "gravity_well",
        /// Chrono field.
        ChronoField => "chrono_field",
        /// Time warp.
        TimeWarp => "time_warp",
        /// Berserk rage.
        Berserk => "berserk",
        /// Orbital strike beam.
        OrbitalBeam => "orbital_beam",
        /// Lightning storm.
        ThunderStorm => "thunder_storm",
    }
}

/// One barrel of a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Barrel {
    /// Lateral offset from the tank axis.
    pub offset: f32,
    /// Barrel width.
    pub width: f32,
    /// Barrel length measured from the tank center.
    pub length: f32,
    /// Mount angle in radians relative to the tank facing.
    pub angle: f32,
    /// Fire delay as a fraction of the reload cycle.
    pub delay: f32,
    /// Decoration hint.
    pub sub_type: Option<BarrelSubType>,
}

impl Default for Barrel {
    fn default() -> Self {
        Self {
            offset: 0.0,
            width: 16.0,
            length: 38.0,
            angle: 0.0,
            delay: 0.0,
            sub_type: None,
        }
    }
}

impl Barrel {
    /// Creates a barrel without a sub-type.
    #[must_use]
    pub const fn new(offset: f32, width: f32, length: f32, angle: f32) -> Self {
        Self {
            offset,
            width,
            length,
            angle,
            delay: 0.0,
            sub_type: None,
        }
    }

    /// Sets the sub-type.
    #[must_use]
    pub const fn with_sub_type(mut self, sub_type: BarrelSubType) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    /// Sets the fire delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// Skill attached to a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillDescriptor {
    /// Which skill.
    pub kind: SkillType,
    /// Cooldown in seconds.
    pub cooldown: f32,
    /// Duration in seconds.
    pub duration: f32,
}

/// Static catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponSchema {
    /// Catalog key.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Projectile family.
    pub weapon_type: WeaponType,
    /// Barrels in draw order.
    #[serde(default)]
    pub barrels: Vec<Barrel>,
    /// Chassis silhouette (circle when absent).
    #[serde(default)]
    pub body: Option<BodyShape>,
    /// Elemental effect.
    #[serde(default)]
    pub element: Option<ElementTag>,
    /// Special ability.
    #[serde(default)]
    pub skill: Option<SkillDescriptor>,
}

impl WeaponSchema {
    /// Creates a schema with no barrels.
    #[must_use]
    pub fn new(id: &str, name: &str, weapon_type: WeaponType) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            weapon_type,
            barrels: Vec::new(),
            body: None,
            element: None,
            skill: None,
        }
    }

    /// Adds a barrel.
    #[must_use]
    pub fn barrel(mut self, barrel: Barrel) -> Self {
        self.barrels.push(barrel);
        self
    }

    /// Sets the chassis shape.
    #[must_use]
    pub fn body(mut self, body: BodyShape) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the element.
    #[must_use]
    pub fn element(mut self, element: ElementTag) -> Self {
        self.element = Some(element);
        self
    }

    /// Sets the skill.
    #[must_use]
    pub fn skill(mut self, kind: SkillType, cooldown: f32, duration: f32) -> Self {
        self.skill = Some(SkillDescriptor { kind, cooldown, duration });
        self
    }

    /// Chassis shape with the circle fallback applied.
    #[must_use]
    pub fn body_shape(&self) -> BodyShape {
        self.body.unwrap_or(BodyShape::Circle)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::InvalidWeapon {
                id: self.id.clone(),
                reason: "empty id".into(),
            });
        }
        for (index, barrel) in self.barrels.iter().enumerate() {
            let dims = [barrel.offset, barrel.width, barrel.length, barrel.angle, barrel.delay];
            if dims.iter().any(|v| !v.is_finite()) || barrel.width < 0.0 || barrel.length < 0.0 {
                return Err(ConfigError::InvalidWeapon {
                    id: self.id.clone(),
                    reason: format!("barrel {index} has invalid dimensions"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    weapon: Vec<WeaponSchema>,
}

/// Immutable weapon lookup table.
#[derive(Clone, Debug)]
pub struct WeaponCatalog {
    entries: HashMap<String, WeaponSchema>,
    default: WeaponSchema,
}

impl WeaponCatalog {
    /// Creates a catalog holding only the default schema.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            default: default_schema(),
        }
    }

    /// The built-in archetype table.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for schema in builtin_schemas() {
            catalog.entries.insert(schema.id.clone(), schema);
        }
        catalog
    }

    /// Parses a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML,
    /// [`ConfigError::DuplicateWeapon`] when an id appears twice and
    /// [`ConfigError::InvalidWeapon`] for non-finite or negative barrels.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let file: CatalogFile = toml::from_str(text)?;
        let mut catalog = Self::new();
        let mut seen_default = false;
        for schema in file.weapon {
            schema.validate()?;
            if schema.id == DEFAULT_WEAPON_ID {
                if seen_default {
                    return Err(ConfigError::DuplicateWeapon(schema.id));
                }
                seen_default = true;
                catalog.default = schema;
                continue;
            }
            if catalog.entries.contains_key(&schema.id) {
                return Err(ConfigError::DuplicateWeapon(schema.id));
            }
            catalog.entries.insert(schema.id.clone(), schema);
        }
        Ok(catalog)
    }

    /// Loads a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// I/O failures plus everything [`Self::from_toml_str`] reports.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Looks up a schema, falling back to the default entry.
    #[must_use]
    pub fn resolve(&self, id: Option<&str>) -> &WeaponSchema {
        id.and_then(|id| self.get(id)).unwrap_or(&self.default)
    }

    /// Looks up a schema without fallback.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&WeaponSchema> {
        if id == DEFAULT_WEAPON_ID {
            return Some(&self.default);
        }
        self.entries.get(id)
    }

    /// The default schema.
    #[must_use]
    pub fn default_schema(&self) -> &WeaponSchema {
        &self.default
    }

    /// Number of entries including the default.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len() + 1
    }

    /// Always false: the default entry is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over non-default entries.
    pub fn iter(&self) -> impl Iterator<Item = &WeaponSchema> {
        self.entries.values()
    }
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn default_schema() -> WeaponSchema {
    WeaponSchema::new(DEFAULT_WEAPON_ID, "Basic", WeaponType::Bullet)
        .barrel(Barrel::new(0.0, 16.0, 38.0, 0.0))
}

fn builtin_schemas() -> Vec<WeaponSchema> {
    use BarrelSubType as Sub;
    vec![
        WeaponSchema::new("twin", "Twin", WeaponType::Bullet)
            .barrel(Barrel::new(-7.0, 13.0, 36.0, 0.0))
            .barrel(Barrel::new(7.0, 13.0, 36.0, 0.0).with_delay(0.5)),
        WeaponSchema::new("flank", "Flank Guard", WeaponType::Bullet)
            .barrel(Barrel::new(0.0, 16.0, 38.0, 0.0))
            .barrel(Barrel::new(0.0, 16.0, 30.0, PI)),
        WeaponSchema::new("machine_gun", "Machine Gun", WeaponType::Bullet)
            .barrel(Barrel::new(0.0, 22.0, 34.0, 0.0))
            .body(BodyShape::Octagon),
        WeaponSchema::new("sniper", "Sniper", WeaponType::Sniper)
            .barrel(Barrel::new(0.0, 12.0, 52.0, 0.0).with_sub_type(Sub::Shroud))
            .skill(SkillType::MirrorPrism, 14.0, 3.0),
        WeaponSchema::new("railgun", "Railgun", WeaponType::Railgun)
            .barrel(Barrel::new(0.0, 14.0, 50.0, 0.0).with_sub_type(Sub::Rail))
            .element(ElementTag::Electric)
            .body(BodyShape::Hexagon)
            .skill(SkillType::OrbitalBeam, 20.0, 2.5),
        WeaponSchema::new("rocket", "Rocketeer", WeaponType::Launcher)
            .barrel(Barrel::new(0.0, 20.0, 40.0, 0.0).with_sub_type(Sub::Rocket))
            .element(ElementTag::Fire),
        WeaponSchema::new("cluster", "Cluster Pod", WeaponType::Launcher)
            .barrel(Barrel::new(-9.0, 12.0, 32.0, 0.0).with_sub_type(Sub::Pod))
            .barrel(Barrel::new(9.0, 12.0, 32.0, 0.0).with_sub_type(Sub::Pod).with_delay(0.25))
            .body(BodyShape::Square),
        WeaponSchema::new("builder", "Builder", WeaponType::Builder)
            .barrel(Barrel::new(0.0, 24.0, 32.0, 0.0).with_sub_type(Sub::Claw))
            .body(BodyShape::Square)
            .skill(SkillType::NanoArmor, 18.0, 5.0),
        WeaponSchema::new("hangar", "Overseer", WeaponType::Drone)
            .barrel(Barrel::new(0.0, 26.0, 30.0, FRAC_PI_2).with_sub_type(Sub::Hangar))
            .barrel(Barrel::new(0.0, 26.0, 30.0, -FRAC_PI_2).with_sub_type(Sub::Hangar))
            .skill(SkillType::GravityWell, 16.0, 4.0),
        WeaponSchema::new("tesla", "Tesla", WeaponType::Tesla)
            .barrel(Barrel::new(0.0, 18.0, 34.0, 0.0).with_sub_type(Sub::Core))
            .element(ElementTag::Electric)
            .skill(SkillType::ThunderStorm, 22.0, 4.0),
        WeaponSchema::new("artillery", "Artillery", WeaponType::Artillery)
            .barrel(Barrel::new(0.0, 26.0, 44.0, 0.0).with_sub_type(Sub::Piston))
            .body(BodyShape::Octagon)
            .skill(SkillType::Emp, 15.0, 1.5),
        WeaponSchema::new("dozer", "Dozer", WeaponType::Trap)
            .barrel(Barrel::new(0.0, 20.0, 30.0, PI))
            .body(BodyShape::Dozer)
            .skill(SkillType::Shield, 12.0, 3.0),
        WeaponSchema::new("star_gunner", "Star Gunner", WeaponType::Bullet)
            .barrel(Barrel::new(0.0, 12.0, 34.0, 0.0))
            .barrel(Barrel::new(0.0, 12.0, 34.0, FRAC_PI_3 * 2.0).with_delay(0.33))
            .barrel(Barrel::new(0.0, 12.0, 34.0, -FRAC_PI_3 * 2.0).with_delay(0.66))
            .body(BodyShape::Star)
            .skill(SkillType::TimeWarp, 25.0, 4.0),
        WeaponSchema::new("spike", "Spike", WeaponType::Flame)
            .barrel(Barrel::new(0.0, 18.0, 30.0, 0.0))
            .body(BodyShape::Spike)
            .element(ElementTag::Fire)
            .skill(SkillType::Berserk, 18.0, 5.0),
        WeaponSchema::new("obsidian", "Obsidian", WeaponType::Laser)
            .barrel(Barrel::new(0.0, 10.0, 46.0, 0.0).with_sub_type(Sub::Core))
            .body(BodyShape::Obsidian)
            .element(ElementTag::Void)
            .skill(SkillType::ChronoField, 20.0, 4.0),
        WeaponSchema::new("triangle", "Tri-Angle", WeaponType::Bullet)
            .barrel(Barrel::new(0.0, 16.0, 38.0, 0.0))
            .barrel(Barrel::new(0.0, 14.0, 30.0, PI * 0.83).with_delay(0.5))
            .barrel(Barrel::new(0.0, 14.0, 30.0, -PI * 0.83).with_delay(0.5))
            .body(BodyShape::Triangle),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_id_falls_back_to_default() {
        let catalog = WeaponCatalog::builtin();
        assert_eq!(catalog.resolve(Some("missing_id")).id, DEFAULT_WEAPON_ID);
        assert_eq!(catalog.resolve(None).id, DEFAULT_WEAPON_ID);
        assert_eq!(catalog.resolve(Some("railgun")).weapon_type, WeaponType::Railgun);
    }

    #[test]
    fn test_unknown_tags_parse_to_unknown() {
        assert_eq!(WeaponType::from_tag("plasma"), WeaponType::Unknown);
        assert_eq!(SkillType::from_tag("Time_Warp"), SkillType::TimeWarp);
        assert_eq!(BodyShape::from_tag("dozer"), BodyShape::Dozer);
    }

    #[test]
    fn test_toml_catalog_roundtrip_fields() {
        let text = r#"
            [[weapon]]
            id = "quad"
            name = "Quad"
            weapon_type = "bullet"
            body = "square"
            skill = { kind = "emp", cooldown = 10.0, duration = 1.0 }

            [[weapon.barrels]]
            width = 12.0
            length = 30.0
            sub_type = "mystery"

            [[weapon]]
            id = "beam"
            weapon_type = "laser_v2"
        "#;
        let catalog = WeaponCatalog::from_toml_str(text).unwrap();
        let quad = catalog.get("quad").unwrap();
        assert_eq!(quad.body_shape(), BodyShape::Square);
        assert_eq!(quad.barrels[0].sub_type, Some(BarrelSubType::Unknown));
        assert_eq!(quad.skill.unwrap().kind, SkillType::Emp);
        assert_eq!(catalog.get("beam").unwrap().weapon_type, WeaponType::Unknown);
        assert_eq!(catalog.default_schema().barrels.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let text = r#"
            [[weapon]]
            id = "a"
            weapon_type = "bullet"
            [[weapon]]
            id = "a"
            weapon_type = "bullet"
        "#;
        assert!(matches!(
            WeaponCatalog::from_toml_str(text),
            Err(ConfigError::DuplicateWeapon(id)) if id == "a"
        ));
    }

    #[test]
    fn test_duplicate_default_id_rejected() {
        let text = r#"
            [[weapon]]
            id = "basic"
            weapon_type = "bullet"
            [[weapon]]
            id = "basic"
            weapon_type = "bullet"
        "#;
        assert!(matches!(
            WeaponCatalog::from_toml_str(text),
            Err(ConfigError::DuplicateWeapon(id)) if id == DEFAULT_WEAPON_ID
        ));
    }

    #[test]
    fn test_single_default_override_accepted() {
        let text = r#"
            [[weapon]]
            id = "basic"
            name = "Custom"
            weapon_type = "bullet"
        "#;
        let catalog = WeaponCatalog::from_toml_str(text).unwrap();
        assert_eq!(catalog.default_schema().name, "Custom");
    }

    #[test]
    fn test_negative_barrel_rejected() {
        let text = r#"
            [[weapon]]
            id = "bad"
            weapon_type = "bullet"
            [[weapon.barrels]]
            width = -1.0
        "#;
        assert!(matches!(
            WeaponCatalog::from_toml_str(text),
            Err(ConfigError::InvalidWeapon { .. })
        ));
    }
}
