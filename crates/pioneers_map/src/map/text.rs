//! Flat character format: one terrain code per cell, rows separated by newlines

use super::{Cell, TerrainGrid};
use crate::error::MapError;

/// Parse a character grid. Cells come back unresolved; sprites are assigned
/// by the session once every category is known.
pub fn parse_grid(text: &str) -> Result<TerrainGrid, MapError> {
    let mut rows: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
    // Blank lines are only tolerated at the end; inside the map they are short rows
    while rows.last().is_some_and(|line| line.is_empty()) {
        rows.pop();
    }

    let Some(first) = rows.first() else {
        return Err(MapError::EmptyMap);
    };
    let width = first.chars().count();

    let mut cells = Vec::with_capacity(width * rows.len());
    for (y, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(MapError::RaggedRow {
                row: y,
                expected: width,
                found,
            });
        }
        for (x, code) in row.chars().enumerate() {
            let cell = Cell::from_code(code).ok_or(MapError::InvalidTerrainCode { code, x, y })?;
            cells.push(cell);
        }
    }

    Ok(TerrainGrid::from_rows(width as u32, rows.len() as u32, cells))
}

/// Serialize back to the character format, rows joined with `\n`
pub fn grid_to_text(grid: &TerrainGrid) -> String {
    let mut text = String::with_capacity(((grid.width() + 1) * grid.height()) as usize);
    for (pos, cell) in grid.iter() {
        if pos.x == 0 && pos.y > 0 {
            text.push('\n');
        }
        text.push(cell.code());
    }
    text
}
