//! Mountain rings
//!
//! Mountains are drawn one cell at a time as a closed loop. Each new cell must
//! touch the previous one and may not repeat; the ring closes as soon as the
//! newest cell touches the first. On closure the winding is computed and every
//! member gets its orientation sprite. An open ring can be abandoned, which
//! restores every cell it overwrote, and a completed ring is torn down as a
//! whole when any of its cells is painted over.
//!
//! ```text
//! Idle --enter_drawing_mode--> Drawing
//! Drawing --place_tile (Accepted)--> Drawing
//! Drawing --place_tile (Closed)--> Idle
//! Drawing --cancel_drawing--> Idle
//! ```

mod detect;
pub mod winding;

pub use detect::{detect_rings, RingScan};
pub use winding::{RingShape, Winding};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::autotile::tables;
use crate::map::{Cell, GridPos, TerrainCategory, TerrainGrid};

/// Whether a ring is currently being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawMode {
    #[default]
    Idle,
    Drawing,
}

/// Result of placing one mountain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceOutcome {
    /// Cell joined the open ring
    Accepted,
    /// Not adjacent to the ring's end, already in the ring, or not drawing.
    /// The grid is untouched.
    Rejected,
    /// Cell closed the ring; it is now complete
    Closed,
}

/// A completed ring in drawing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    cells: Vec<GridPos>,
    winding: Winding,
}

impl Ring {
    pub fn cells(&self) -> &[GridPos] {
        &self.cells
    }

    pub fn winding(&self) -> Winding {
        self.winding
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.cells.contains(&pos)
    }
}

/// All completed rings on the map. Rings never share a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingSet {
    rings: Vec<Ring>,
}

impl RingSet {
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ring> {
        self.rings.iter()
    }

    /// Index of the ring containing `pos`; linear scan, maps are small
    pub fn position_of(&self, pos: GridPos) -> Option<usize> {
        self.rings.iter().position(|ring| ring.contains(pos))
    }

    fn push(&mut self, ring: Ring) {
        self.rings.push(ring);
    }

    fn remove(&mut self, index: usize) -> Ring {
        self.rings.remove(index)
    }
}

/// Ring drawing session plus the set of completed rings
#[derive(Debug, Clone, Default)]
pub struct RingTracker {
    mode: DrawMode,
    /// Cells of the open ring, in drawing order
    candidate: Vec<GridPos>,
    /// Prior state of every cell the open ring overwrote
    change_log: Vec<(GridPos, Cell)>,
    completed: RingSet,
    /// Cells mutated since the last `take_touched`
    touched: Vec<GridPos>,
}

impl RingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == DrawMode::Drawing
    }

    pub fn candidate(&self) -> &[GridPos] {
        &self.candidate
    }

    pub fn rings(&self) -> &RingSet {
        &self.completed
    }

    /// Start drawing a new ring. A ring already being drawn is kept.
    pub fn enter_drawing_mode(&mut self) {
        if self.mode == DrawMode::Drawing {
            return;
        }
        self.mode = DrawMode::Drawing;
        self.candidate.clear();
        self.change_log.clear();
    }

    /// Add one mountain cell to the open ring
    pub fn place_tile(&mut self, grid: &mut TerrainGrid, pos: GridPos) -> PlaceOutcome {
        if self.mode != DrawMode::Drawing || !grid.contains(pos) {
            return PlaceOutcome::Rejected;
        }

        if let Some(last) = self.candidate.last() {
            if !last.is_adjacent(pos) || self.candidate.contains(&pos) {
                debug!("Rejected mountain at {:?}: not continuing ring from {:?}", pos, last);
                return PlaceOutcome::Rejected;
            }
        }

        if self.completed.position_of(pos).is_some() {
            self.remove_ring_containing(grid, pos);
        }

        let Some(cell) = grid.get_mut(pos) else {
            return PlaceOutcome::Rejected;
        };
        self.change_log.push((pos, *cell));
        cell.set_category(TerrainCategory::Mountain);
        cell.set_sprite(tables::MOUNTAIN_PLACEHOLDER);
        cell.set_background(None);

        self.candidate.push(pos);
        self.touched.push(pos);

        let first = self.candidate[0];
        if self.candidate.len() > 2 && pos.is_adjacent(first) {
            self.close(grid);
            return PlaceOutcome::Closed;
        }

        PlaceOutcome::Accepted
    }

    fn close(&mut self, grid: &mut TerrainGrid) {
        let cells = std::mem::take(&mut self.candidate);
        self.change_log.clear();
        self.mode = DrawMode::Idle;

        let ring = self.complete_ring(grid, cells);
        info!(
            "Closed mountain ring of {} cells ({:?})",
            ring.len(),
            ring.winding()
        );
        self.completed.push(ring);
    }

    /// Compute winding and write orientation sprites for a closed loop
    fn complete_ring(&mut self, grid: &mut TerrainGrid, cells: Vec<GridPos>) -> Ring {
        let total = winding::winding_total(&cells);
        if total.abs() != 360 {
            warn!("Mountain ring turn total is {} instead of ±360", total);
        }
        let winding = Winding::from_total(total);

        for (pos, sprite) in cells.iter().zip(winding::ring_sprites(&cells, winding)) {
            if let Some(cell) = grid.get_mut(*pos) {
                cell.set_sprite(sprite);
                cell.set_background(None);
            }
        }
        self.touched.extend(cells.iter().copied());

        Ring { cells, winding }
    }

    /// Register a loop found while loading a map
    pub fn adopt_ring(&mut self, grid: &mut TerrainGrid, cells: Vec<GridPos>) {
        let ring = self.complete_ring(grid, cells);
        self.completed.push(ring);
    }

    /// Abandon the open ring, restoring every cell it overwrote.
    /// Returns false when no ring was being drawn.
    pub fn cancel_drawing(&mut self, grid: &mut TerrainGrid) -> bool {
        if self.mode != DrawMode::Drawing {
            return false;
        }

        let restored = self.change_log.len();
        for (pos, prior) in self.change_log.drain(..).rev() {
            grid.set(pos, prior);
            self.touched.push(pos);
        }
        self.candidate.clear();
        self.mode = DrawMode::Idle;

        if restored > 0 {
            info!("Abandoned open mountain ring, restored {} cells", restored);
        }
        true
    }

    /// Tear down the completed ring containing `pos`, turning all its cells
    /// back into bare land
    pub fn remove_ring_containing(&mut self, grid: &mut TerrainGrid, pos: GridPos) -> bool {
        let Some(index) = self.completed.position_of(pos) else {
            return false;
        };
        let ring = self.completed.remove(index);

        for member in ring.cells() {
            if let Some(cell) = grid.get_mut(*member) {
                cell.set_category(TerrainCategory::Land);
                cell.set_trees(0);
                cell.set_sprite(tables::LAND);
                cell.set_background(None);
            }
        }
        self.touched.extend(ring.cells().iter().copied());

        info!("Removed mountain ring of {} cells containing {:?}", ring.len(), pos);
        true
    }

    /// Drain the list of cells mutated since the last call
    pub fn take_touched(&mut self) -> Vec<GridPos> {
        std::mem::take(&mut self.touched)
    }
}
