use crate::types::{CellCount, Coord};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The mine count must satisfy `0 < mines < size * size`.
    #[error("invalid mine count {mines} for a {size}x{size} grid")]
    InvalidMineCount { size: Coord, mines: CellCount },
    #[error("coordinates ({0}, {1}) are outside the grid")]
    OutOfBounds(Coord, Coord),
}

pub type Result<T> = core::result::Result<T, GameError>;
