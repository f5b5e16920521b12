use dl_core::{DlError, HexCoord};

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while driving the simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A game-state rule was violated.
    #[error(transparent)]
    Core(#[from] DlError),

    /// A* exhausted the reachable hexes without finding the target.
    #[error("no path from {from} to {to}")]
    NoPath {
        /// Start hex.
        from: HexCoord,
        /// Target hex.
        to: HexCoord,
    },

    /// `confirm` was called with no path preview pending.
    #[error("no path preview to confirm")]
    NoPreview,

    /// The configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
