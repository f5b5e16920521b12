use crate::hex::HexCoord;

/// Alias for `Result<T, DlError>`.
pub type DlResult<T> = Result<T, DlError>;

/// Errors that can occur when manipulating game state.
#[derive(Debug, thiserror::Error)]
pub enum DlError {
    /// The hex lies outside the world radius.
    #[error("hex {0} is outside the world")]
    OutOfBounds(HexCoord),

    /// The hex cannot be walked on.
    #[error("hex {0} is impassable")]
    Impassable(HexCoord),

    /// The story is already at its last stage.
    #[error("already at the final stage")]
    FinalStage,

    /// A stage name or index could not be parsed.
    #[error("invalid stage: \"{0}\"")]
    InvalidStage(String),

    /// A coordinate string could not be parsed.
    #[error("invalid coordinate: \"{0}\" (expected q,r)")]
    InvalidCoordinate(String),

    /// A color string could not be parsed.
    #[error("invalid color: \"{0}\" (expected #rrggbb)")]
    InvalidColor(String),

    /// A companion with the same name already exists.
    #[error("companion already exists: \"{0}\"")]
    DuplicateCompanion(String),
}
