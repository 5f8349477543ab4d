mod cell;
mod text;

pub use cell::*;
pub use text::*;

use serde::{Deserialize, Serialize};

/// A cell coordinate, `x` = column and `y` = row, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Shift by a signed offset; `None` when the result would be negative
    pub fn offset(&self, dx: i32, dy: i32) -> Option<GridPos> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(GridPos { x, y })
    }

    pub fn manhattan(&self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Orthogonally adjacent (Manhattan distance 1)
    pub fn is_adjacent(&self, other: GridPos) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(u32, u32)> for GridPos {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// Fixed-size dense grid of terrain cells, stored row by row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl TerrainGrid {
    /// A grid where every cell is a copy of `fill`
    pub fn new(width: u32, height: u32, fill: Cell) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![fill; size],
        }
    }

    /// Build from rows of cells; every row must have the same length
    pub(crate) fn from_rows(width: u32, height: u32, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width as usize * height as usize);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, pos: GridPos) -> Option<&Cell> {
        self.index(pos).and_then(|i| self.cells.get(i))
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        let index = self.index(pos)?;
        self.cells.get_mut(index)
    }

    /// Overwrite a whole cell. Returns false when `pos` is outside the grid.
    pub fn set(&mut self, pos: GridPos, cell: Cell) -> bool {
        match self.get_mut(pos) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Cell at a signed offset from `pos`, `None` when that lands outside the grid
    pub fn neighbor(&self, pos: GridPos, dx: i32, dy: i32) -> Option<&Cell> {
        pos.offset(dx, dy).and_then(|p| self.get(p))
    }

    /// All coordinates in row-major order
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| GridPos::new(x, y)))
    }

    /// The cell itself and its up to eight in-bounds neighbors
    pub fn neighborhood(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter_map(move |(dx, dy)| pos.offset(dx, dy))
            .filter(move |p| self.contains(*p))
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &Cell)> + '_ {
        self.positions().zip(self.cells.iter())
    }

    /// Coordinates of every cell carrying the `Invalid` sprite
    pub fn malformed_cells(&self) -> Vec<GridPos> {
        self.iter()
            .filter(|(_, cell)| cell.is_malformed())
            .map(|(pos, _)| pos)
            .collect()
    }
}
