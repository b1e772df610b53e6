use super::MinePlacer;
use crate::types::{CellCount, Coord, nd};
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform random placement by rejection sampling: draw a position, retry
/// while it is already mined. Deterministic for a fixed seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomPlacer {
    seed: u64,
}

impl RandomPlacer {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinePlacer for RandomPlacer {
    fn place(self, size: Coord, mines: CellCount) -> Array2<bool> {
        let mut mask: Array2<bool> = Array2::default((size as usize, size as usize));
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let mut placed: CellCount = 0;
        while placed < mines {
            let x: Coord = rng.random_range(0..size);
            let y: Coord = rng.random_range(0..size);
            if !mask[nd((x, y))] {
                mask[nd((x, y))] = true;
                placed += 1;
            }
        }

        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine_count(mask: &Array2<bool>) -> usize {
        mask.iter().filter(|&&mined| mined).count()
    }

    #[test]
    fn places_exactly_the_requested_number_of_mines() {
        for seed in 0..8 {
            let mask = RandomPlacer::new(seed).place(10, 10);
            assert_eq!(mine_count(&mask), 10);
        }
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let a = RandomPlacer::new(42).place(8, 12);
        let b = RandomPlacer::new(42).place(8, 12);
        assert_eq!(a, b);
    }

    #[test]
    fn near_full_grid_terminates() {
        // rejection sampling must still finish when only one cell stays free
        let mask = RandomPlacer::new(7).place(4, 15);
        assert_eq!(mine_count(&mask), 15);
    }
}
