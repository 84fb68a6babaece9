//! # IRONCLAD Shared
//!
//! The read-only input contract of the arena renderer.
//!
//! ## CRITICAL RULE
//!
//! This crate holds data only. It must NEVER depend on:
//! - `ironclad_rendering`
//! - Any surface, image or drawing crate
//!
//! If you need to draw something, put it in `ironclad_rendering`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod camera;
pub mod entity;
pub mod error;
pub mod events;
pub mod math;
pub mod settings;
pub mod tokens;
pub mod weapon;

pub use camera::{Camera, DeviceClass, JoystickState, PointerState, Viewport};
pub use entity::{
    Entity, EntityId, EntityKind, MapInfo, SkillState, StatusEffect, TrailStyle, WallPalette,
    WorldSnapshot,
};
pub use error::{ConfigError, ConfigResult};
pub use events::VisualEvent;
pub use math::{Rect, Vec2};
pub use settings::{
    AccessibilitySettings, CrosshairStyle, GraphicsSettings, InterfaceSettings, ParticleBudget,
    QualityPreset, RawSettings, Settings,
};
pub use tokens::{ColorToken, ColorblindMode};
pub use weapon::{
    Barrel, BarrelSubType, BodyShape, ElementTag, SkillDescriptor, SkillType, WeaponCatalog,
    WeaponSchema, WeaponType, BASE_RADIUS, DEFAULT_WEAPON_ID,
};
