//! Redraw bookkeeping for the map viewport
//!
//! The renderer itself lives outside this crate. It drains the dirty set each
//! frame and redraws those cells from [`EditorMap`], or redraws everything
//! when `needs_rebuild` is set.

use bevy::prelude::*;
use std::collections::HashSet;

use pioneers_map::{GridPos, RenderCell};

use crate::EditorMap;

/// Cells whose sprites changed since the renderer last looked
#[derive(Resource, Default, Debug)]
pub struct RenderState {
    /// Cells to redraw
    pub dirty: HashSet<GridPos>,
    /// Whether the whole map must be redrawn (new map loaded)
    pub needs_rebuild: bool,
}

impl RenderState {
    pub fn mark(&mut self, cells: impl IntoIterator<Item = GridPos>) {
        self.dirty.extend(cells);
    }

    pub fn request_rebuild(&mut self) {
        self.dirty.clear();
        self.needs_rebuild = true;
    }

    pub fn is_clean(&self) -> bool {
        self.dirty.is_empty() && !self.needs_rebuild
    }

    /// Drain the pending redraw work as render data, in row-major order
    pub fn take_pending(&mut self, map: &EditorMap) -> Vec<RenderCell> {
        let rebuild = std::mem::take(&mut self.needs_rebuild);
        let dirty = std::mem::take(&mut self.dirty);
        map.render_cells()
            .into_iter()
            .filter(|cell| rebuild || dirty.contains(&cell.pos))
            .collect()
    }
}
