use crate::map::GridPos;

/// Errors raised while building, editing or exporting a map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The input text contained no rows
    EmptyMap,
    /// A row's length differs from the first row
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character that is not a terrain code
    InvalidTerrainCode { code: char, x: usize, y: usize },
    /// A coordinate outside the grid
    OutOfBounds { x: u32, y: u32 },
    /// Export refused because these cells could not be resolved
    NotExportable { malformed: Vec<GridPos> },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::EmptyMap => write!(f, "Map contains no rows"),
            MapError::RaggedRow { row, expected, found } => write!(
                f,
                "Row {} has {} cells, expected {}",
                row, found, expected
            ),
            MapError::InvalidTerrainCode { code, x, y } => {
                write!(f, "Invalid terrain code {:?} at ({}, {})", code, x, y)
            }
            MapError::OutOfBounds { x, y } => write!(f, "Cell ({}, {}) is outside the map", x, y),
            MapError::NotExportable { malformed } => write!(
                f,
                "The layout of the map is not allowed: {} malformed cell(s)",
                malformed.len()
            ),
        }
    }
}

impl std::error::Error for MapError {}
