//! Dialogue, name resolution, and presentation for Dragon's Labyrinth.
//!
//! Companions speak through a [`DialogueBook`] whose entries are gated by the
//! narrative stage, morale, sanity, and story flags. Choices can nudge morale or
//! ask the story to move on, but only the simulation's stage system ever
//! changes the stage; a [`ChoiceOutcome`] is handed back to it for that.
//!
//! The [`presentation`] module maps a stage to palettes, audio, and sprite
//! looks. It holds no state.

/// Stage-gated dialogue and conversations.
pub mod dialogue;
/// Error types for dialogue and name resolution.
pub mod error;
/// Stage presets and sprite appearance.
pub mod presentation;
/// Fuzzy companion name matching.
pub mod resolver;

pub use dialogue::{
    Choice, ChoiceOutcome, Condition, Conversation, Dialogue, DialogueBook, Effect, chose_flag,
    seen_flag,
};
pub use error::{NarrativeError, NarrativeResult};
pub use presentation::{
    MonsterKind, SpriteAnimation, SpriteAppearance, StagePreset, companion_appearance,
    monster_appearance, tile_color,
};
pub use resolver::{resolve_companion, suggest_companions};
