/// Single coordinate axis used for the grid side length and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Accumulated points of a session.
pub type Score = u32;

/// `ndarray` index for a coordinate pair.
pub(crate) const fn nd((x, y): Coord2) -> [usize; 2] {
    [x as usize, y as usize]
}

/// Number of cells on a square grid of the given side length.
pub const fn square(size: Coord) -> CellCount {
    (size as CellCount) * (size as CellCount)
}

const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Iterator over the up-to-8 in-bounds neighbors of a cell on a square grid.
///
/// Exhaustive and duplicate-free; the order follows the offset table and is
/// not part of the contract.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    size: Coord,
    next_offset: usize,
}

impl Neighbors {
    pub(crate) fn new(center: Coord2, size: Coord) -> Self {
        Self {
            center,
            size,
            next_offset: 0,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Coord2> {
        while let Some(&(dx, dy)) = NEIGHBOR_OFFSETS.get(self.next_offset) {
            self.next_offset += 1;

            let next_x = self.center.0.checked_add_signed(dx);
            let next_y = self.center.1.checked_add_signed(dy);
            if let (Some(x), Some(y)) = (next_x, next_y)
                && x < self.size
                && y < self.size
            {
                return Some((x, y));
            }
        }
        None
    }
}
