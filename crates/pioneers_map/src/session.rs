//! Map session: one grid, one ring tracker and the active painting tool
//!
//! Every paint request goes through here. The session applies the edit,
//! lets the ring tracker do its part for mountains, then re-resolves the 3×3
//! neighborhood of every cell that changed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::autotile;
use crate::error::MapError;
use crate::map::{grid_to_text, parse_grid, Cell, GridPos, SpriteCoord, TerrainCategory, TerrainGrid};
use crate::mountain::{detect_rings, PlaceOutcome, RingSet, RingTracker};

/// Painting tool selected in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Water,
    Coast,
    Land,
    /// Adds one tree per click, cycling back to bare land after three
    Tree,
    Mountain,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Water => "Water",
            Tool::Coast => "Coast",
            Tool::Land => "Land",
            Tool::Tree => "Tree",
            Tool::Mountain => "Mountain",
        }
    }
}

/// Result of a single paint request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaintOutcome {
    /// The cell (and possibly a torn-down ring) changed
    Painted,
    /// The cell already looked like this
    Unchanged,
    /// A mountain ring step
    Ring(PlaceOutcome),
}

/// Everything the renderer needs for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderCell {
    pub pos: GridPos,
    pub sprite: SpriteCoord,
    pub background: Option<SpriteCoord>,
    pub trees: u8,
}

/// One editable map
#[derive(Debug, Clone)]
pub struct MapSession {
    grid: TerrainGrid,
    rings: RingTracker,
    tool: Tool,
    /// Cells re-resolved since the last `take_changed`
    changed: BTreeSet<GridPos>,
}

impl MapSession {
    /// Session over an already-built grid: resolves every cell and picks up
    /// mountain rings already present
    pub fn new(grid: TerrainGrid) -> Self {
        let mut session = Self {
            grid,
            rings: RingTracker::new(),
            tool: Tool::default(),
            changed: BTreeSet::new(),
        };
        session.resolve_all();
        session.adopt_existing_rings();
        session
    }

    /// Parse a character map and build a session from it
    pub fn from_text(text: &str) -> Result<Self, MapError> {
        let grid = parse_grid(text)?;
        let session = Self::new(grid);
        info!(
            "Loaded {}x{} map with {} mountain ring(s)",
            session.width(),
            session.height(),
            session.rings().len()
        );
        Ok(session)
    }

    /// A map of one terrain category, no trees
    pub fn blank(width: u32, height: u32, category: TerrainCategory) -> Self {
        Self::new(TerrainGrid::new(width, height, Cell::new(category, 0)))
    }

    /// A map filled with one terrain code
    pub fn filled(width: u32, height: u32, code: char) -> Result<Self, MapError> {
        let fill = Cell::from_code(code).ok_or(MapError::InvalidTerrainCode { code, x: 0, y: 0 })?;
        Ok(Self::new(TerrainGrid::new(width, height, fill)))
    }

    fn adopt_existing_rings(&mut self) {
        let scan = detect_rings(&self.grid);
        for cells in scan.rings {
            self.rings.adopt_ring(&mut self.grid, cells);
        }
        for pos in &scan.strays {
            if let Some(cell) = self.grid.get_mut(*pos) {
                cell.set_sprite(SpriteCoord::INVALID);
            }
        }
        if !scan.strays.is_empty() {
            warn!("{} mountain cell(s) are not part of a closed ring", scan.strays.len());
        }
        self.rings.take_touched();
    }

    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<&Cell> {
        self.grid.get(GridPos::new(x, y))
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn rings(&self) -> &RingSet {
        self.rings.rings()
    }

    pub fn ring_tracker(&self) -> &RingTracker {
        &self.rings
    }

    /// Switch tools. Leaving the mountain tool abandons an open ring.
    /// Returns true if an open ring was discarded.
    pub fn select_tool(&mut self, tool: Tool) -> bool {
        let mut discarded = false;
        if self.tool == Tool::Mountain && tool != Tool::Mountain {
            discarded = self.cancel_ring();
        }
        if tool == Tool::Mountain {
            self.rings.enter_drawing_mode();
        }
        if tool != self.tool {
            debug!("Selected tool {}", tool.label());
        }
        self.tool = tool;
        discarded
    }

    /// Abandon the ring being drawn, if any
    pub fn cancel_ring(&mut self) -> bool {
        let had_candidate = !self.rings.candidate().is_empty();
        self.rings.cancel_drawing(&mut self.grid);
        self.refresh_touched(&[]);
        had_candidate
    }

    /// Apply the active tool to one cell
    pub fn paint(&mut self, x: u32, y: u32) -> Result<PaintOutcome, MapError> {
        let pos = GridPos::new(x, y);
        let before = *self.grid.get(pos).ok_or(MapError::OutOfBounds { x, y })?;

        let outcome = match self.tool {
            Tool::Mountain => {
                self.rings.enter_drawing_mode();
                PaintOutcome::Ring(self.rings.place_tile(&mut self.grid, pos))
            }
            tool => {
                let tore_down = self.rings.remove_ring_containing(&mut self.grid, pos);
                let Some(cell) = self.grid.get_mut(pos) else {
                    return Err(MapError::OutOfBounds { x, y });
                };
                match tool {
                    Tool::Water => cell.set_category(TerrainCategory::Water),
                    Tool::Coast => cell.set_category(TerrainCategory::Coast),
                    Tool::Land => {
                        cell.set_category(TerrainCategory::Land);
                        cell.set_trees(0);
                    }
                    Tool::Tree => cell.cycle_trees(),
                    Tool::Mountain => {}
                }
                if !tore_down && *cell == before {
                    return Ok(PaintOutcome::Unchanged);
                }
                PaintOutcome::Painted
            }
        };

        let edited = match outcome {
            PaintOutcome::Painted => vec![pos],
            _ => Vec::new(),
        };
        self.refresh_touched(&edited);
        debug!("Painted {} at ({}, {}): {:?}", self.tool.label(), x, y, outcome);
        Ok(outcome)
    }

    /// Re-resolve around every cell the ring tracker or an edit changed
    fn refresh_touched(&mut self, edited: &[GridPos]) {
        let mut origins = self.rings.take_touched();
        origins.extend_from_slice(edited);

        let grid = &self.grid;
        let targets: BTreeSet<GridPos> = origins
            .iter()
            .flat_map(move |pos| grid.neighborhood(*pos))
            .collect();
        for pos in &targets {
            autotile::resolve_cell(&mut self.grid, *pos);
        }
        self.changed.extend(targets);
    }

    /// Recompute every non-mountain cell from scratch
    pub fn resolve_all(&mut self) {
        autotile::resolve_all(&mut self.grid);
        self.changed.extend(self.grid.positions());
    }

    /// Drain the set of cells whose sprites may have changed
    pub fn take_changed(&mut self) -> Vec<GridPos> {
        std::mem::take(&mut self.changed).into_iter().collect()
    }

    /// Cells that would not survive a save and reload: those carrying the
    /// `Invalid` sprite plus the cells of a ring still being drawn
    pub fn malformed_cells(&self) -> Vec<GridPos> {
        let open_ring = self.rings.candidate();
        self.grid
            .iter()
            .filter(|(pos, cell)| cell.is_malformed() || open_ring.contains(pos))
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn is_exportable(&self) -> bool {
        self.rings.candidate().is_empty() && self.grid.iter().all(|(_, cell)| !cell.is_malformed())
    }

    /// Serialize the map regardless of validity
    pub fn to_text(&self) -> String {
        grid_to_text(&self.grid)
    }

    /// Serialize the map, refusing when any cell is malformed
    pub fn export(&self) -> Result<String, MapError> {
        let malformed = self.malformed_cells();
        if !malformed.is_empty() {
            warn!("Export refused: {} malformed cell(s)", malformed.len());
            return Err(MapError::NotExportable { malformed });
        }
        Ok(self.to_text())
    }

    /// Per-cell sprite data for the renderer
    pub fn render_cells(&self) -> Vec<RenderCell> {
        self.grid
            .iter()
            .map(|(pos, cell)| RenderCell {
                pos,
                sprite: cell.sprite(),
                background: cell.background(),
                trees: cell.trees(),
            })
            .collect()
    }
}
