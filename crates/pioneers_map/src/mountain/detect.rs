use std::collections::HashSet;

use tracing::warn;

use crate::map::{GridPos, TerrainCategory, TerrainGrid};

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Mountain cells of a freshly loaded grid, sorted into rings and leftovers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingScan {
    /// Closed loops, each starting at its top-left cell and heading right
    pub rings: Vec<Vec<GridPos>>,
    /// Mountain cells that are not part of any closed loop
    pub strays: Vec<GridPos>,
}

fn mountain_neighbors(grid: &TerrainGrid, pos: GridPos) -> Vec<GridPos> {
    ORTHOGONAL
        .iter()
        .filter_map(|&(dx, dy)| pos.offset(dx, dy))
        .filter(|p| {
            grid.get(*p)
                .map(|cell| cell.is(TerrainCategory::Mountain))
                .unwrap_or(false)
        })
        .collect()
}

/// 4-connected mountain component containing `start`
fn component(grid: &TerrainGrid, start: GridPos, visited: &mut HashSet<GridPos>) -> Vec<GridPos> {
    let mut cells = Vec::new();
    let mut stack = vec![start];
    visited.insert(start);

    while let Some(pos) = stack.pop() {
        cells.push(pos);
        for next in mountain_neighbors(grid, pos) {
            if visited.insert(next) {
                stack.push(next);
            }
        }
    }
    cells
}

/// Search steps allowed per component before it is given up on
const SEARCH_BUDGET: usize = 10_000;

/// Splits one mountain component into closed loops that the ring tracker
/// could have drawn.
///
/// The row-major-first free cell of a component can only have ring
/// neighbors to its right and below, so each loop is walked from there
/// heading right first, which makes every loop clockwise. Shorter loops are
/// tried first so adjacent small rings are not merged into one big loop.
struct RingSearch {
    /// Component cells in row-major order
    order: Vec<GridPos>,
    /// Cells not yet assigned to a loop
    free: HashSet<GridPos>,
    rings: Vec<Vec<GridPos>>,
    steps: usize,
}

impl RingSearch {
    fn new(mut cells: Vec<GridPos>) -> Self {
        cells.sort_by_key(|p| (p.y, p.x));
        let free = cells.iter().copied().collect();
        Self {
            order: cells,
            free,
            rings: Vec::new(),
            steps: 0,
        }
    }

    fn exhausted(&self) -> bool {
        self.steps > SEARCH_BUDGET
    }

    /// Assign every free cell to a loop, or leave everything untouched
    fn partition(&mut self) -> bool {
        let Some(start) = self.order.iter().copied().find(|p| self.free.contains(p)) else {
            return true;
        };
        let Some(first_step) = start.offset(1, 0).filter(|p| self.free.contains(p)) else {
            return false;
        };

        let mut length = 4;
        while length <= self.free.len() && !self.exhausted() {
            let mut path = vec![start, first_step];
            if self.extend(&mut path, length) {
                return true;
            }
            length += 2;
        }
        false
    }

    /// Grow `path` into a loop of exactly `length` cells, then partition
    /// the rest of the component
    fn extend(&mut self, path: &mut Vec<GridPos>, length: usize) -> bool {
        self.steps += 1;
        if self.exhausted() {
            return false;
        }

        let start = path[0];
        let last = path[path.len() - 1];

        // The tracker closes a ring as soon as its newest cell touches the first
        if path.len() > 2 && last.is_adjacent(start) {
            if path.len() != length {
                return false;
            }
            for pos in path.iter() {
                self.free.remove(pos);
            }
            self.rings.push(path.clone());
            if self.partition() {
                return true;
            }
            self.rings.pop();
            self.free.extend(path.iter().copied());
            return false;
        }

        if path.len() >= length {
            return false;
        }

        for (dx, dy) in ORTHOGONAL {
            let Some(next) = last.offset(dx, dy) else {
                continue;
            };
            if !self.free.contains(&next) || path.contains(&next) {
                continue;
            }
            // Too far from the start to close within `length`
            if path.len() + next.manhattan(start) as usize > length {
                continue;
            }
            path.push(next);
            if self.extend(path, length) {
                return true;
            }
            path.pop();
        }
        false
    }
}

/// Group every mountain cell of `grid` into rings and strays.
///
/// A component becomes rings only when all of its cells can be split into
/// closed loops; otherwise every cell in it is a stray.
pub fn detect_rings(grid: &TerrainGrid) -> RingScan {
    let mut scan = RingScan::default();
    let mut visited = HashSet::new();

    for pos in grid.positions() {
        let is_mountain = grid
            .get(pos)
            .map(|cell| cell.is(TerrainCategory::Mountain))
            .unwrap_or(false);
        if !is_mountain || visited.contains(&pos) {
            continue;
        }

        let cells = component(grid, pos, &mut visited);
        let mut search = RingSearch::new(cells);
        if search.partition() {
            scan.rings.append(&mut search.rings);
        } else {
            if search.exhausted() {
                warn!(
                    "Gave up splitting a {}-cell mountain area into rings",
                    search.order.len()
                );
            }
            scan.strays.extend(search.order);
        }
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::parse_grid;

    #[test]
    fn test_single_square_ring() {
        let grid = parse_grid("GG0\nGG0\n000").unwrap();
        let scan = detect_rings(&grid);
        assert!(scan.strays.is_empty());
        assert_eq!(
            scan.rings,
            vec![vec![
                GridPos::new(0, 0),
                GridPos::new(1, 0),
                GridPos::new(1, 1),
                GridPos::new(0, 1),
            ]]
        );
    }

    #[test]
    fn test_hollow_ring_and_strays() {
        let grid = parse_grid("GGG0\nG0G0\nGGG0\n000G").unwrap();
        let scan = detect_rings(&grid);
        assert_eq!(scan.rings.len(), 1);
        assert_eq!(scan.rings[0].len(), 8);
        assert_eq!(scan.strays, vec![GridPos::new(3, 3)]);
    }

    #[test]
    fn test_filled_block_is_not_a_ring() {
        let grid = parse_grid("GGG\nGGG\nGGG").unwrap();
        let scan = detect_rings(&grid);
        assert!(scan.rings.is_empty());
        assert_eq!(scan.strays.len(), 9);
    }

    #[test]
    fn test_open_path_is_not_a_ring() {
        let grid = parse_grid("GGG\n00G\n00G").unwrap();
        let scan = detect_rings(&grid);
        assert!(scan.rings.is_empty());
        assert_eq!(scan.strays.len(), 5);
    }

    #[test]
    fn test_two_by_three_block_is_one_ring() {
        let grid = parse_grid("00000\n0GGG0\n0GGG0\n00000").unwrap();
        let scan = detect_rings(&grid);
        assert!(scan.strays.is_empty());
        assert_eq!(
            scan.rings,
            vec![vec![
                GridPos::new(1, 1),
                GridPos::new(2, 1),
                GridPos::new(3, 1),
                GridPos::new(3, 2),
                GridPos::new(2, 2),
                GridPos::new(1, 2),
            ]]
        );
    }

    #[test]
    fn test_touching_squares_stay_separate() {
        let grid = parse_grid("GGGG\nGGGG").unwrap();
        let scan = detect_rings(&grid);
        assert!(scan.strays.is_empty());
        assert_eq!(scan.rings.len(), 2);
        assert_eq!(scan.rings[0][0], GridPos::new(0, 0));
        assert_eq!(scan.rings[1][0], GridPos::new(2, 0));
        assert!(scan.rings.iter().all(|ring| ring.len() == 4));
    }

    #[test]
    fn test_stacked_rings_split_row_by_row() {
        let grid = parse_grid("GGG\nGGG\nGG0\nGG0").unwrap();
        let scan = detect_rings(&grid);
        assert!(scan.strays.is_empty());
        let sizes: Vec<usize> = scan.rings.iter().map(|ring| ring.len()).collect();
        assert_eq!(sizes, vec![6, 4]);
    }

    #[test]
    fn test_self_touching_loop() {
        // Loop around a notch cut into the top edge
        let grid = parse_grid("GG0GG\nGGGGG\nGGGGG").unwrap();
        let scan = detect_rings(&grid);
        assert!(scan.strays.is_empty());
        let cells: usize = scan.rings.iter().map(|ring| ring.len()).sum();
        assert_eq!(cells, 14);
        for ring in &scan.rings {
            assert_eq!(crate::mountain::winding::winding_total(ring), 360);
        }
    }

    #[test]
    fn test_two_disjoint_rings() {
        let grid = parse_grid("GG0GG\nGG0GG").unwrap();
        let scan = detect_rings(&grid);
        assert_eq!(scan.rings.len(), 2);
        assert_eq!(scan.rings[1][0], GridPos::new(3, 0));
    }
}
