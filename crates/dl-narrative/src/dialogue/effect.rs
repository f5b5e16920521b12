//! Effects applied when a choice is made.

use serde::{Deserialize, Serialize};

/// An effect that can be applied when a choice is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Change the speaker's morale.
    AdjustMorale {
        /// Signed change.
        delta: f64,
    },
    /// Take sanity from the player.
    DrainSanity {
        /// Amount lost.
        amount: f64,
    },
    /// Set a narrative flag.
    SetFlag {
        /// Flag key.
        key: String,
    },
    /// Ask the stage system to move the story forward one stage.
    RequestStageAdvance,
}
