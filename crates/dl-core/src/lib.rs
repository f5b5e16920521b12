//! Core types for Dragon's Labyrinth: the hex grid, the narrative stage, and the game state.
//!
//! This crate defines the data model every other crate reads. It carries no
//! simulation logic of its own beyond the invariants of its types: meters clamp,
//! stages only move forward, and the world is a pure function of its seed.

/// sRGB colors for sprites and presets.
pub mod color;
/// Companions and their archetypes.
pub mod companion;
/// Error types used throughout the crate.
pub mod error;
/// Axial hex coordinates and grid math.
pub mod hex;
/// Clamped psychological scalars.
pub mod meter;
/// Player position and sanity.
pub mod player;
/// Quests, tasks, and objectives.
pub mod quest;
/// The five-stage dread progression.
pub mod stage;
/// The session-wide game state store.
pub mod state;
/// Terrain, distance bands, and props.
pub mod tile;
/// The hexagonal world map.
pub mod world;

/// Re-export color type.
pub use color::Rgb;
/// Re-export companion types.
pub use companion::{Archetype, Companion, CompanionId};
/// Re-export error types.
pub use error::{DlError, DlResult};
/// Re-export hex types.
pub use hex::{HexCoord, HexDirection};
/// Re-export meter type.
pub use meter::Meter;
/// Re-export player type.
pub use player::PlayerState;
/// Re-export quest types.
pub use quest::{Objective, Quest, QuestId, QuestStatus, QuestTask};
/// Re-export stage types.
pub use stage::{NarrativeStage, StageTransition};
/// Re-export game state types.
pub use state::{GameState, SessionMeta};
/// Re-export tile types.
pub use tile::{Band, Prop, Tile, TileKind};
/// Re-export world type.
pub use world::HexWorld;
