//! Autotile resolution
//!
//! Picks the sprite of a single cell from its own category and the categories
//! around it. Resolution only reads categories, so resolving any set of cells
//! in any order converges to the same grid; after an edit it is enough to
//! resolve the edited cell's 3×3 neighborhood.
//!
//! ## Rules
//!
//! - **Land**: one fixed sprite.
//! - **Water**: mask of non-water neighbors (map edge counts as water). A
//!   zero mask falls back to the diagonals for the four corner sprites.
//!   Shoreline water also gets a coast background from the parallel table.
//! - **Coast**: needs at least two coast neighbors. Straight segments, outer
//!   corners (no water alongside) and inner corners (no land alongside) each
//!   have their own table; anything else renders with the generic coast.
//! - **Mountain**: left alone, ring sprites are owned by the ring tracker.

pub mod tables;

use crate::map::{Cell, GridPos, SpriteCoord, TerrainCategory, TerrainGrid};
use crate::neighbors::{diagonal_neighbors, neighbor_bitmask, DiagonalNeighbors, ALL_SIDES, BOTTOM, LEFT, RIGHT, TOP};
use tables::EdgeTable;

fn is_not_water(cell: &Cell) -> bool {
    !cell.is(TerrainCategory::Water)
}

/// Sprite and optional background for a water cell.
///
/// `edges` is the mask of orthogonal non-water neighbors, `diagonals` the
/// non-water diagonal neighbors.
pub fn water_sprite(edges: u8, diagonals: DiagonalNeighbors) -> (SpriteCoord, Option<SpriteCoord>) {
    if edges != 0 {
        let background = Some(tables::edge_sprite(EdgeTable::Coast, edges)).filter(|b| b.is_valid());
        return (tables::edge_sprite(EdgeTable::Water, edges), background);
    }

    let corner = if diagonals.top_left {
        Some(tables::DIAGONAL_TOP_LEFT)
    } else if diagonals.top_right {
        Some(tables::DIAGONAL_TOP_RIGHT)
    } else if diagonals.bottom_left {
        Some(tables::DIAGONAL_BOTTOM_LEFT)
    } else if diagonals.bottom_right {
        Some(tables::DIAGONAL_BOTTOM_RIGHT)
    } else {
        None
    };

    match corner {
        Some(corner) => (
            tables::diagonal_sprite(EdgeTable::Water, corner),
            Some(tables::diagonal_sprite(EdgeTable::Coast, corner)),
        ),
        None => (tables::edge_sprite(EdgeTable::Water, 0), None),
    }
}

/// Sprite for a coast cell given its coast, water and land neighbor masks
pub fn coast_sprite(coast: u8, water: u8, land: u8) -> SpriteCoord {
    // Isolated or dead-end coast cannot be part of a coastline
    if coast.count_ones() <= 1 {
        return SpriteCoord::INVALID;
    }

    let opposite_pair = coast == (TOP | BOTTOM) || coast == (LEFT | RIGHT);
    if opposite_pair
        && water.count_ones() == 1
        && land.count_ones() == 1
        && (water | land) == (ALL_SIDES & !coast)
    {
        return tables::COAST_STRAIGHT[water as usize];
    }

    if water == 0 {
        return tables::COAST_OUTER_CORNER[coast as usize];
    }

    if land == 0 {
        return tables::COAST_INNER_CORNER[coast as usize];
    }

    tables::COAST_FALLBACK
}

fn resolve_water(grid: &TerrainGrid, pos: GridPos) -> (SpriteCoord, Option<SpriteCoord>) {
    let edges = neighbor_bitmask(grid, pos, is_not_water, false);
    let diagonals = if edges == 0 {
        diagonal_neighbors(grid, pos, is_not_water, false)
    } else {
        DiagonalNeighbors::default()
    };
    water_sprite(edges, diagonals)
}

fn resolve_coast(grid: &TerrainGrid, pos: GridPos) -> SpriteCoord {
    let coast = neighbor_bitmask(grid, pos, |c| c.is(TerrainCategory::Coast), false);
    let water = neighbor_bitmask(grid, pos, |c| c.is(TerrainCategory::Water), true);
    let land = neighbor_bitmask(grid, pos, |c| c.category().is_ground(), false);
    coast_sprite(coast, water, land)
}

/// Recompute the sprite of one cell. Mountains and out-of-bounds positions
/// are ignored.
pub fn resolve_cell(grid: &mut TerrainGrid, pos: GridPos) {
    let Some(cell) = grid.get(pos) else { return };

    let (sprite, background) = match cell.category() {
        TerrainCategory::Land => (tables::LAND, None),
        TerrainCategory::Water => resolve_water(grid, pos),
        TerrainCategory::Coast => (resolve_coast(grid, pos), None),
        TerrainCategory::Mountain => return,
    };

    if let Some(cell) = grid.get_mut(pos) {
        cell.set_sprite(sprite);
        cell.set_background(background);
    }
}

/// Recompute a cell and its eight neighbors
pub fn resolve_neighborhood(grid: &mut TerrainGrid, pos: GridPos) {
    let targets: Vec<GridPos> = grid.neighborhood(pos).collect();
    for target in targets {
        resolve_cell(grid, target);
    }
}

/// Recompute every cell in the grid
pub fn resolve_all(grid: &mut TerrainGrid) {
    let targets: Vec<GridPos> = grid.positions().collect();
    for target in targets {
        resolve_cell(grid, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::parse_grid;

    fn resolved(text: &str) -> TerrainGrid {
        let mut grid = parse_grid(text).unwrap();
        resolve_all(&mut grid);
        grid
    }

    fn sprite_at(grid: &TerrainGrid, x: u32, y: u32) -> SpriteCoord {
        grid.get(GridPos::new(x, y)).unwrap().sprite()
    }

    #[test]
    fn test_land_sprite() {
        let grid = resolved("01\n23");
        for pos in grid.positions() {
            assert_eq!(grid.get(pos).unwrap().sprite(), tables::LAND);
        }
    }

    #[test]
    fn test_open_water() {
        let grid = resolved("WWW\nWWW\nWWW");
        let center = grid.get(GridPos::new(1, 1)).unwrap();
        assert_eq!(center.sprite(), SpriteCoord::new(1, 6));
        assert_eq!(center.background(), None);
    }

    #[test]
    fn test_water_at_map_edge_is_open() {
        let grid = resolved("W");
        assert_eq!(sprite_at(&grid, 0, 0), SpriteCoord::new(1, 6));
    }

    #[test]
    fn test_water_shore_uses_edge_table() {
        let grid = resolved("000\nWWW\nWWW");
        let center = grid.get(GridPos::new(1, 1)).unwrap();
        assert_eq!(center.sprite(), SpriteCoord::new(1, 5));
        assert_eq!(center.background(), Some(SpriteCoord::new(1, 2)));

        let corner = grid.get(GridPos::new(0, 1)).unwrap();
        assert_eq!(corner.sprite(), SpriteCoord::new(1, 5));
    }

    #[test]
    fn test_water_single_diagonal_corner() {
        let cases = [
            ("0WW\nWWW\nWWW", SpriteCoord::new(5, 7), SpriteCoord::new(4, 3)),
            ("WW0\nWWW\nWWW", SpriteCoord::new(4, 7), SpriteCoord::new(3, 3)),
            ("WWW\nWWW\n0WW", SpriteCoord::new(5, 6), SpriteCoord::new(4, 2)),
            ("WWW\nWWW\nWW0", SpriteCoord::new(4, 6), SpriteCoord::new(3, 2)),
        ];
        for (text, sprite, background) in cases {
            let grid = resolved(text);
            let center = grid.get(GridPos::new(1, 1)).unwrap();
            assert_eq!(center.sprite(), sprite, "map {:?}", text);
            assert_eq!(center.background(), Some(background), "map {:?}", text);
        }
    }

    #[test]
    fn test_water_between_opposite_shores_is_malformed() {
        let grid = resolved("000\nWWW\n000");
        assert!(grid.get(GridPos::new(1, 1)).unwrap().is_malformed());
    }

    #[test]
    fn test_isolated_water_is_malformed() {
        let grid = resolved("000\n0W0\n000");
        let center = grid.get(GridPos::new(1, 1)).unwrap();
        assert!(center.is_malformed());
        assert_eq!(center.background(), None);
    }

    #[test]
    fn test_isolated_coast_is_malformed() {
        let grid = resolved("000\n0K0\n000");
        assert!(grid.get(GridPos::new(1, 1)).unwrap().is_malformed());
    }

    #[test]
    fn test_dead_end_coast_is_malformed() {
        let grid = resolved("0KW\n0KW\n0KW");
        assert!(grid.get(GridPos::new(1, 0)).unwrap().is_malformed());
        assert!(grid.get(GridPos::new(1, 2)).unwrap().is_malformed());
    }

    #[test]
    fn test_coast_straight_segment() {
        let grid = resolved("0KW\n0KW\n0KW");
        assert_eq!(sprite_at(&grid, 1, 1), SpriteCoord::new(2, 3));

        let grid = resolved("WK0\nWK0\nWK0");
        assert_eq!(sprite_at(&grid, 1, 1), SpriteCoord::new(0, 3));

        let grid = resolved("WWW\nKKK\n000");
        assert_eq!(sprite_at(&grid, 1, 1), SpriteCoord::new(1, 2));

        let grid = resolved("000\nKKK\nWWW");
        assert_eq!(sprite_at(&grid, 1, 1), SpriteCoord::new(1, 4));
    }

    #[test]
    fn test_coast_straight_against_map_edge() {
        // The map edge counts as water for coast cells
        let grid = resolved("K0\nK0\nK0");
        assert_eq!(sprite_at(&grid, 0, 1), SpriteCoord::new(0, 3));
    }

    #[test]
    fn test_coast_outer_corner() {
        let grid = resolved("WK0\nKK0\n000");
        assert_eq!(sprite_at(&grid, 1, 1), SpriteCoord::new(4, 3));
    }

    #[test]
    fn test_coast_inner_corner() {
        let grid = resolved("0K0\nKKW\n0WW");
        assert_eq!(sprite_at(&grid, 1, 1), SpriteCoord::new(2, 4));
    }

    #[test]
    fn test_coast_corner_tables_by_mask() {
        assert_eq!(coast_sprite(TOP | LEFT, 0, BOTTOM | RIGHT), SpriteCoord::new(4, 3));
        assert_eq!(coast_sprite(BOTTOM | LEFT, 0, TOP | RIGHT), SpriteCoord::new(4, 2));
        assert_eq!(coast_sprite(TOP | RIGHT, 0, BOTTOM | LEFT), SpriteCoord::new(3, 3));
        assert_eq!(coast_sprite(BOTTOM | RIGHT, 0, TOP | LEFT), SpriteCoord::new(3, 2));

        assert_eq!(coast_sprite(TOP | LEFT, BOTTOM | RIGHT, 0), SpriteCoord::new(2, 4));
        assert_eq!(coast_sprite(BOTTOM | LEFT, TOP | RIGHT, 0), SpriteCoord::new(2, 2));
        assert_eq!(coast_sprite(TOP | RIGHT, BOTTOM | LEFT, 0), SpriteCoord::new(0, 4));
        assert_eq!(coast_sprite(BOTTOM | RIGHT, TOP | LEFT, 0), SpriteCoord::new(0, 2));
    }

    #[test]
    fn test_coast_ambiguous_uses_fallback() {
        // Coast top and left, water below, land right
        let grid = resolved("0K0\nKK0\n0W0");
        assert_eq!(sprite_at(&grid, 1, 1), tables::COAST_FALLBACK);

        // Coast on three sides is not a table entry either
        assert_eq!(coast_sprite(TOP | BOTTOM | LEFT, RIGHT, 0), tables::COAST_FALLBACK);
        assert_eq!(coast_sprite(TOP | BOTTOM, 0, LEFT | RIGHT), tables::COAST_FALLBACK);
    }

    #[test]
    fn test_mountain_is_left_alone() {
        let mut grid = parse_grid("G").unwrap();
        let marker = SpriteCoord::new(7, 7);
        grid.get_mut(GridPos::new(0, 0)).unwrap().set_sprite(marker);
        resolve_all(&mut grid);
        assert_eq!(sprite_at(&grid, 0, 0), marker);
    }

    #[test]
    fn test_mountain_counts_as_ground_for_coast() {
        let grid = resolved("GKW\nGKW\nGKW");
        assert_eq!(sprite_at(&grid, 1, 1), SpriteCoord::new(2, 3));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut grid = parse_grid("WWK0\nWKK0\nKK00\n0000").unwrap();
        resolve_all(&mut grid);
        let first = grid.clone();
        for pos in first.positions() {
            resolve_cell(&mut grid, pos);
        }
        assert_eq!(grid, first);
    }

    #[test]
    fn test_neighborhood_matches_full_resolve() {
        let source = "WWWWW\nWWWWW\nWWKKK\nWWK00\nWWK00";
        for pos in parse_grid(source).unwrap().positions() {
            for category in [TerrainCategory::Land, TerrainCategory::Water, TerrainCategory::Coast] {
                let mut grid = parse_grid(source).unwrap();
                resolve_all(&mut grid);

                grid.get_mut(pos).unwrap().set_category(category);
                resolve_neighborhood(&mut grid, pos);

                let mut reference = grid.clone();
                resolve_all(&mut reference);
                assert_eq!(grid, reference, "painting {:?} at {:?}", category, pos);
            }
        }
    }
}
