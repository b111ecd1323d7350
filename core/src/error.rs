use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Cell cannot be both revealed and flagged")]
    ConflictingCellState,
    #[error("Unknown difficulty, expected one of: easy, medium, hard")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;
