//! Stage-driven look and sound of the world.
//!
//! Everything here is a pure lookup: give it a stage (and a companion or a
//! monster) and it returns what a renderer should draw. Nothing is stored.

/// Palettes, lighting, audio, and tile grading.
pub mod preset;
/// Companion and monster sprites.
pub mod sprite;

pub use preset::{StagePreset, tile_color};
pub use sprite::{
    MonsterKind, SpriteAnimation, SpriteAppearance, companion_appearance, monster_appearance,
};
