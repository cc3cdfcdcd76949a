use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines: {mines} requested but the field only has {cells} cells")]
    TooManyMines { mines: u16, cells: u16 },
    #[error("Field must have at least one cell")]
    EmptyField,
    #[error("Duplicate mine at ({0}, {1})")]
    DuplicateMine(u8, u8),
    #[error("No game in progress, start one first")]
    NoActiveGame,
    #[error("Saved game does not match its own field")]
    InconsistentSnapshot,
}

pub type Result<T> = core::result::Result<T, GameError>;
