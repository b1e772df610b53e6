use crate::types::{CellCount, Coord};
use ndarray::Array2;

pub use random::RandomPlacer;

mod random;

/// Strategy for choosing which cells of a fresh grid carry mines.
///
/// Implementations must return a `size x size` mask with exactly `mines`
/// entries set. Callers validate the configuration first, so `mines` is
/// always strictly between 0 and the number of cells.
pub trait MinePlacer {
    fn place(self, size: Coord, mines: CellCount) -> Array2<bool>;
}
