use serde::{Deserialize, Serialize};

/// Highest tree overlay count a land cell can carry
pub const MAX_TREES: u8 = 3;

/// Terrain classification of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainCategory {
    #[default]
    Land,
    Coast,
    Water,
    Mountain,
}

impl TerrainCategory {
    /// Land and mountain both count as solid ground for coastlines
    pub fn is_ground(&self) -> bool {
        matches!(self, TerrainCategory::Land | TerrainCategory::Mountain)
    }
}

/// Decode a terrain character into its category and tree overlay count.
///
/// ```text
/// W = water   K = coast   G = mountain
/// 0 = land    1/2/3 = land with that many trees
/// ```
pub fn decode_terrain(code: char) -> Option<(TerrainCategory, u8)> {
    match code {
        'W' => Some((TerrainCategory::Water, 0)),
        'K' => Some((TerrainCategory::Coast, 0)),
        'G' => Some((TerrainCategory::Mountain, 0)),
        '0' => Some((TerrainCategory::Land, 0)),
        '1' => Some((TerrainCategory::Land, 1)),
        '2' => Some((TerrainCategory::Land, 2)),
        '3' => Some((TerrainCategory::Land, 3)),
        _ => None,
    }
}

/// Position on the sprite sheet, in sheet cells rather than pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteCoord {
    pub x: i32,
    pub y: i32,
}

impl SpriteCoord {
    /// Marks a cell whose sprite could not be determined
    pub const INVALID: Self = SpriteCoord { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

/// One grid position: terrain, tree overlay and resolved sprites.
///
/// Cells are `Copy` so a full prior state can be logged and restored when a
/// mountain ring is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    category: TerrainCategory,
    trees: u8,
    sprite: SpriteCoord,
    background: Option<SpriteCoord>,
}

impl Cell {
    /// A fresh, unresolved cell. Trees are kept only on land.
    pub fn new(category: TerrainCategory, trees: u8) -> Self {
        let trees = if category == TerrainCategory::Land {
            trees.min(MAX_TREES)
        } else {
            0
        };
        Self {
            category,
            trees,
            sprite: SpriteCoord::INVALID,
            background: None,
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        decode_terrain(code).map(|(category, trees)| Self::new(category, trees))
    }

    /// The single character this cell serializes to
    pub fn code(&self) -> char {
        match self.category {
            TerrainCategory::Water => 'W',
            TerrainCategory::Coast => 'K',
            TerrainCategory::Mountain => 'G',
            TerrainCategory::Land => match self.trees {
                1 => '1',
                2 => '2',
                3 => '3',
                _ => '0',
            },
        }
    }

    pub fn category(&self) -> TerrainCategory {
        self.category
    }

    pub fn is(&self, category: TerrainCategory) -> bool {
        self.category == category
    }

    /// Change the category; anything other than land drops its trees
    pub fn set_category(&mut self, category: TerrainCategory) {
        self.category = category;
        if category != TerrainCategory::Land {
            self.trees = 0;
        }
    }

    pub fn trees(&self) -> u8 {
        self.trees
    }

    pub fn set_trees(&mut self, trees: u8) {
        self.trees = trees.min(MAX_TREES);
    }

    /// Cycle the tree overlay 0 → 1 → 2 → 3 → 0, turning the cell into land
    pub fn cycle_trees(&mut self) {
        self.category = TerrainCategory::Land;
        self.trees = if self.trees >= MAX_TREES { 0 } else { self.trees + 1 };
    }

    pub fn sprite(&self) -> SpriteCoord {
        self.sprite
    }

    pub fn set_sprite(&mut self, sprite: SpriteCoord) {
        self.sprite = sprite;
    }

    pub fn background(&self) -> Option<SpriteCoord> {
        self.background
    }

    pub fn set_background(&mut self, background: Option<SpriteCoord>) {
        self.background = background;
    }

    pub fn is_malformed(&self) -> bool {
        !self.sprite.is_valid()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(TerrainCategory::Land, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_codes() {
        assert_eq!(decode_terrain('W'), Some((TerrainCategory::Water, 0)));
        assert_eq!(decode_terrain('K'), Some((TerrainCategory::Coast, 0)));
        assert_eq!(decode_terrain('G'), Some((TerrainCategory::Mountain, 0)));
        assert_eq!(decode_terrain('0'), Some((TerrainCategory::Land, 0)));
        assert_eq!(decode_terrain('3'), Some((TerrainCategory::Land, 3)));
        assert_eq!(decode_terrain('4'), None);
        assert_eq!(decode_terrain('w'), None);
    }

    #[test]
    fn test_code_matches_decode() {
        for code in ['W', 'K', 'G', '0', '1', '2', '3'] {
            let cell = Cell::from_code(code).unwrap();
            assert_eq!(cell.code(), code);
        }
    }

    #[test]
    fn test_new_cell_is_unresolved() {
        let cell = Cell::new(TerrainCategory::Water, 0);
        assert!(cell.is_malformed());
        assert_eq!(cell.background(), None);
    }

    #[test]
    fn test_trees_only_on_land() {
        let cell = Cell::new(TerrainCategory::Coast, 2);
        assert_eq!(cell.trees(), 0);

        let mut cell = Cell::new(TerrainCategory::Land, 2);
        cell.set_category(TerrainCategory::Water);
        assert_eq!(cell.trees(), 0);
        assert_eq!(cell.code(), 'W');
    }

    #[test]
    fn test_cycle_trees_wraps() {
        let mut cell = Cell::new(TerrainCategory::Water, 0);
        cell.cycle_trees();
        assert!(cell.is(TerrainCategory::Land));
        assert_eq!(cell.trees(), 1);
        cell.cycle_trees();
        cell.cycle_trees();
        assert_eq!(cell.trees(), 3);
        cell.cycle_trees();
        assert_eq!(cell.trees(), 0);
    }
}
