//! Error types for the narrative layer.

use thiserror::Error;

/// Result type for narrative operations.
pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// Errors that can occur while talking to companions.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// No companion matches the name, even loosely.
    #[error("no companion called \"{0}\"")]
    CompanionNotFound(String),

    /// The companion has left the party.
    #[error("{0} is no longer with you.")]
    CompanionInactive(String),

    /// The book has nothing for this companion right now.
    #[error("{0} has nothing to say.")]
    NoDialogue(String),

    /// A dialogue refers to an ID the book does not contain.
    #[error("unknown dialogue: {0}")]
    UnknownDialogue(String),

    /// Choice index out of range.
    #[error("invalid choice: {0}")]
    InvalidChoice(usize),

    /// Choice exists but its conditions do not hold.
    #[error("choice {0} is not available")]
    ChoiceUnavailable(usize),

    /// The conversation already ended.
    #[error("the conversation is over")]
    ConversationOver,
}
