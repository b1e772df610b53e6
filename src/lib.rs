//! Minesweeper game core: grid generation, mine placement, flood-fill
//! reveal, flagging, scoring and a countdown timer.
//!
//! Everything is ephemeral and in-memory. A presentation layer constructs a
//! session with [`new_game`], forwards player actions into it, and renders
//! from the change descriptions each operation returns; the session itself
//! never touches a view. Starting a new game replaces the session wholesale.

#![no_std]

extern crate alloc;

use alloc::string::String;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use session::*;
pub use types::*;

mod cell;
mod error;
mod generator;
mod grid;
mod session;
mod types;

/// Validated board parameters of one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    size: Coord,
    mines: CellCount,
}

impl GameConfig {
    /// Rejects any configuration where `mines` is not strictly between 0 and
    /// `size * size`. A grid with no mines, or with nothing left to open, is
    /// a caller bug, not a playable game.
    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        if size == 0 || mines == 0 || mines >= square(size) {
            return Err(GameError::InvalidMineCount { size, mines });
        }
        Ok(Self { size, mines })
    }

    pub const fn size(&self) -> Coord {
        self.size
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

/// Starts a fresh game: validates the configuration, places `mines` mines by
/// seeded rejection sampling, computes the adjacency table, and returns an
/// `Active` session owning the new grid.
pub fn new_game(
    size: Coord,
    mines: CellCount,
    player: impl Into<String>,
    seed: u64,
) -> Result<GameSession> {
    let config = GameConfig::new(size, mines)?;
    let grid = Grid::generate(config, RandomPlacer::new(seed));
    Ok(GameSession::new(grid, player))
}
