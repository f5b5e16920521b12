//! Dialogue scripting for companions.
//!
//! Dialogues live in a [`DialogueBook`]; the first one whose speaker filter
//! and conditions match opens when the player talks to a companion. Choices
//! carry effects: flags are set at once, while morale, sanity and stage
//! changes are queued with the simulation systems that own them.

mod book;
mod condition;
mod conversation;
mod effect;

pub use book::{Choice, Dialogue, DialogueBook};
pub use condition::Condition;
pub use conversation::{ChoiceOutcome, Conversation, chose_flag, seen_flag};
pub use effect::Effect;
