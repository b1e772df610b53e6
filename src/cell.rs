use serde::{Deserialize, Serialize};

/// Player-visible state of a single grid position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Closed,
    /// Opened safe cell, carrying the adjacent-mine count shown to the player.
    Open(u8),
    Flagged,
    /// Opened mine; only ever present on a lost board.
    Mine,
}

impl CellState {
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open(_) | Self::Mine)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Closed
    }
}
