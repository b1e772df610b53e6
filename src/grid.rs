use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::GameConfig;
use crate::error::{GameError, Result};
use crate::generator::MinePlacer;
use crate::types::{CellCount, Coord, Coord2, Neighbors, nd, square};

/// Immutable mine layout of one game, plus the adjacency table derived from
/// it.
///
/// The adjacency table is computed exactly once, at construction, as a pure
/// function of the mine mask. A session never mutates its grid; a new game
/// replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    mines: Array2<bool>,
    adjacency: Array2<u8>,
    size: Coord,
    mine_count: CellCount,
}

impl Grid {
    /// Builds a grid with mines chosen by `placer`.
    pub fn generate(config: GameConfig, placer: impl MinePlacer) -> Self {
        let mask = placer.place(config.size, config.mines);
        Self::from_mask(config.size, mask)
    }

    /// Builds a grid with an explicit mine layout, for replays and tests.
    /// Duplicate coordinates count once.
    pub fn with_mines(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mask: Array2<bool> = Array2::default((size as usize, size as usize));
        for &(x, y) in mine_coords {
            if x >= size || y >= size {
                return Err(GameError::OutOfBounds(x, y));
            }
            mask[nd((x, y))] = true;
        }

        let mines = mask.iter().filter(|&&mined| mined).count() as CellCount;
        GameConfig::new(size, mines)?;
        Ok(Self::from_mask(size, mask))
    }

    fn from_mask(size: Coord, mines: Array2<bool>) -> Self {
        let mine_count = mines.iter().filter(|&&mined| mined).count() as CellCount;

        let mut adjacency: Array2<u8> = Array2::default((size as usize, size as usize));
        for x in 0..size {
            for y in 0..size {
                if mines[nd((x, y))] {
                    continue;
                }
                adjacency[nd((x, y))] = Neighbors::new((x, y), size)
                    .filter(|&pos| mines[nd(pos)])
                    .count() as u8;
            }
        }

        Self {
            mines,
            adjacency,
            size,
            mine_count,
        }
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn check_bounds(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.size && coords.1 < self.size {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds(coords.0, coords.1))
        }
    }

    /// Whether the cell carries a mine. `coords` must be in bounds.
    pub fn has_mine(&self, coords: Coord2) -> bool {
        self.mines[nd(coords)]
    }

    /// Number of mined neighbors of the cell. `coords` must be in bounds.
    pub fn adjacent_mines(&self, coords: Coord2) -> u8 {
        self.adjacency[nd(coords)]
    }

    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        Neighbors::new(coords, self.size)
    }

    /// Positions of every mine, for endgame rendering.
    pub fn mine_positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mines
            .indexed_iter()
            .filter(|&(_, &mined)| mined)
            .map(|((x, y), _)| (x as Coord, y as Coord))
    }
}
