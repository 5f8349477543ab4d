//! Neighbor classification
//!
//! Orthogonal neighbors are folded into a 4-bit mask; the bit order is fixed
//! because the sprite tables are indexed by it:
//!
//! ```text
//!        top=1
//! left=4   X   right=8
//!      bottom=2
//! ```
//!
//! Neighbors outside the grid contribute a caller-chosen value, so water and
//! coast rules can treat the map edge differently.

use crate::map::{Cell, GridPos, TerrainGrid};

pub const TOP: u8 = 1;
pub const BOTTOM: u8 = 2;
pub const LEFT: u8 = 4;
pub const RIGHT: u8 = 8;
pub const ALL_SIDES: u8 = TOP | BOTTOM | LEFT | RIGHT;

const ORTHOGONAL: [(i32, i32, u8); 4] = [
    (0, -1, TOP),
    (0, 1, BOTTOM),
    (-1, 0, LEFT),
    (1, 0, RIGHT),
];

/// Which of the four diagonal neighbors satisfy a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagonalNeighbors {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

impl DiagonalNeighbors {
    pub fn count(&self) -> u32 {
        [self.top_left, self.top_right, self.bottom_left, self.bottom_right]
            .iter()
            .filter(|&&hit| hit)
            .count() as u32
    }
}

fn test_neighbor<F>(grid: &TerrainGrid, pos: GridPos, dx: i32, dy: i32, predicate: &F, out_of_bounds: bool) -> bool
where
    F: Fn(&Cell) -> bool,
{
    match grid.neighbor(pos, dx, dy) {
        Some(cell) => predicate(cell),
        None => out_of_bounds,
    }
}

/// Bitmask of orthogonal neighbors matching `predicate`
pub fn neighbor_bitmask<F>(grid: &TerrainGrid, pos: GridPos, predicate: F, out_of_bounds: bool) -> u8
where
    F: Fn(&Cell) -> bool,
{
    ORTHOGONAL
        .iter()
        .filter(|(dx, dy, _)| test_neighbor(grid, pos, *dx, *dy, &predicate, out_of_bounds))
        .fold(0, |mask, (_, _, bit)| mask | bit)
}

/// Diagonal neighbors matching `predicate`
pub fn diagonal_neighbors<F>(
    grid: &TerrainGrid,
    pos: GridPos,
    predicate: F,
    out_of_bounds: bool,
) -> DiagonalNeighbors
where
    F: Fn(&Cell) -> bool,
{
    DiagonalNeighbors {
        top_left: test_neighbor(grid, pos, -1, -1, &predicate, out_of_bounds),
        top_right: test_neighbor(grid, pos, 1, -1, &predicate, out_of_bounds),
        bottom_left: test_neighbor(grid, pos, -1, 1, &predicate, out_of_bounds),
        bottom_right: test_neighbor(grid, pos, 1, 1, &predicate, out_of_bounds),
    }
}
