//! Ring geometry: step directions, turn accumulation and per-cell shapes
//!
//! Rows grow downwards, so a positive turn total means the ring was drawn
//! clockwise on screen.

use serde::{Deserialize, Serialize};

use crate::map::{GridPos, SpriteCoord};

/// One orthogonal lattice step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Direction of a unit step from `from` to `to`, `None` if not adjacent
    pub fn between(from: GridPos, to: GridPos) -> Option<Direction> {
        if !from.is_adjacent(to) {
            return None;
        }
        Some(if to.y < from.y {
            Direction::Up
        } else if to.y > from.y {
            Direction::Down
        } else if to.x < from.x {
            Direction::Left
        } else {
            Direction::Right
        })
    }
}

/// Signed turn in degrees when a path arrives moving `incoming` and leaves
/// moving `outgoing`. Right-hand (clockwise) turns are positive.
pub fn turn_degrees(incoming: Direction, outgoing: Direction) -> i32 {
    use Direction::*;
    match (incoming, outgoing) {
        (Right, Down) | (Down, Left) | (Left, Up) | (Up, Right) => 90,
        (Right, Up) | (Up, Left) | (Left, Down) | (Down, Right) => -90,
        _ => 0,
    }
}

/// Winding sense of a completed ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    pub fn from_total(total: i32) -> Winding {
        if total >= 0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    fn column(self) -> usize {
        match self {
            Winding::Clockwise => 0,
            Winding::CounterClockwise => 1,
        }
    }
}

/// The `(former, current, next)` triple around index `i` of a closed ring
pub fn ring_triple(cells: &[GridPos], i: usize) -> (GridPos, GridPos, GridPos) {
    let n = cells.len();
    (cells[(i + n - 1) % n], cells[i], cells[(i + 1) % n])
}

/// Sum of signed turns over every vertex of a closed ring.
///
/// A simple closed lattice loop always totals ±360.
pub fn winding_total(cells: &[GridPos]) -> i32 {
    if cells.len() < 3 {
        return 0;
    }
    (0..cells.len())
        .filter_map(|i| {
            let (former, current, next) = ring_triple(cells, i);
            // Straight steps never turn
            if former.x == next.x || former.y == next.y {
                return Some(0);
            }
            let incoming = Direction::between(former, current)?;
            let outgoing = Direction::between(current, next)?;
            Some(turn_degrees(incoming, outgoing))
        })
        .sum()
}

/// Local shape of a ring cell, named by how the path passes through it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingShape {
    VerticalUp = 0,
    VerticalDown = 1,
    HorizontalLeft = 2,
    HorizontalRight = 3,
    LeftThenUp = 4,
    UpThenLeft = 5,
    LeftThenDown = 6,
    DownThenLeft = 7,
    RightThenUp = 8,
    UpThenRight = 9,
    RightThenDown = 10,
    DownThenRight = 11,
}

/// Ring sprites per shape: `[clockwise, counter-clockwise]`.
///
/// Each winding has its own sheet block: four edges, four outer corners and
/// four concave corners.
///
/// ```text
/// clockwise (cols 0-4)      counter-clockwise (cols 5-9)
///   TL  T  TR  cBR cBL        TL  T  TR  cBR cBL     row 10
///   L   .  R   cTR cTL        L   .  R   cTR cTL     row 11
///   BL  B  BR                 BL  B  BR              row 12
/// ```
#[rustfmt::skip]
pub const RING_SPRITES: [[SpriteCoord; 2]; 12] = [
    [SpriteCoord::new(0, 11), SpriteCoord::new(7, 11)], // VerticalUp: L | R
    [SpriteCoord::new(2, 11), SpriteCoord::new(5, 11)], // VerticalDown: R | L
    [SpriteCoord::new(1, 12), SpriteCoord::new(6, 10)], // HorizontalLeft: B | T
    [SpriteCoord::new(1, 10), SpriteCoord::new(6, 12)], // HorizontalRight: T | B
    [SpriteCoord::new(0, 12), SpriteCoord::new(9, 10)], // LeftThenUp: BL | cBL
    [SpriteCoord::new(3, 11), SpriteCoord::new(7, 10)], // UpThenLeft: cTR | TR
    [SpriteCoord::new(4, 11), SpriteCoord::new(5, 10)], // LeftThenDown: cTL | TL
    [SpriteCoord::new(2, 12), SpriteCoord::new(8, 10)], // DownThenLeft: BR | cBR
    [SpriteCoord::new(3, 10), SpriteCoord::new(7, 12)], // RightThenUp: cBR | BR
    [SpriteCoord::new(0, 10), SpriteCoord::new(9, 11)], // UpThenRight: TL | cTL
    [SpriteCoord::new(2, 10), SpriteCoord::new(8, 11)], // RightThenDown: TR | cTR
    [SpriteCoord::new(4, 10), SpriteCoord::new(5, 12)], // DownThenRight: cBL | BL
];

impl RingShape {
    /// Classify `current` from its ring predecessor and successor
    pub fn classify(former: GridPos, current: GridPos, next: GridPos) -> Option<RingShape> {
        use Direction::*;
        let incoming = Direction::between(former, current)?;
        let outgoing = Direction::between(current, next)?;
        let shape = match (incoming, outgoing) {
            (Up, Up) => RingShape::VerticalUp,
            (Down, Down) => RingShape::VerticalDown,
            (Left, Left) => RingShape::HorizontalLeft,
            (Right, Right) => RingShape::HorizontalRight,
            (Left, Up) => RingShape::LeftThenUp,
            (Up, Left) => RingShape::UpThenLeft,
            (Left, Down) => RingShape::LeftThenDown,
            (Down, Left) => RingShape::DownThenLeft,
            (Right, Up) => RingShape::RightThenUp,
            (Up, Right) => RingShape::UpThenRight,
            (Right, Down) => RingShape::RightThenDown,
            (Down, Right) => RingShape::DownThenRight,
            // Reversal: only possible on a two-cell path
            _ => return None,
        };
        Some(shape)
    }

    pub fn sprite(self, winding: Winding) -> SpriteCoord {
        RING_SPRITES[self as usize][winding.column()]
    }
}

/// Sprites for every member of a closed ring, in ring order
pub fn ring_sprites(cells: &[GridPos], winding: Winding) -> Vec<SpriteCoord> {
    (0..cells.len())
        .map(|i| {
            let (former, current, next) = ring_triple(cells, i);
            RingShape::classify(former, current, next)
                .map(|shape| shape.sprite(winding))
                .unwrap_or(SpriteCoord::INVALID)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn path(points: &[(u32, u32)]) -> Vec<GridPos> {
        points.iter().map(|&(x, y)| GridPos::new(x, y)).collect()
    }

    #[test]
    fn test_direction_between() {
        let origin = GridPos::new(1, 1);
        assert_eq!(Direction::between(origin, GridPos::new(1, 0)), Some(Direction::Up));
        assert_eq!(Direction::between(origin, GridPos::new(1, 2)), Some(Direction::Down));
        assert_eq!(Direction::between(origin, GridPos::new(0, 1)), Some(Direction::Left));
        assert_eq!(Direction::between(origin, GridPos::new(2, 1)), Some(Direction::Right));
        assert_eq!(Direction::between(origin, GridPos::new(2, 2)), None);
    }

    #[test]
    fn test_unit_square_winding() {
        let clockwise = path(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        assert_eq!(winding_total(&clockwise), 360);
        assert_eq!(Winding::from_total(winding_total(&clockwise)), Winding::Clockwise);

        let counter = path(&[(0, 0), (0, 1), (1, 1), (1, 0)]);
        assert_eq!(winding_total(&counter), -360);
        assert_eq!(Winding::from_total(winding_total(&counter)), Winding::CounterClockwise);
    }

    #[test]
    fn test_winding_independent_of_start() {
        let ring = path(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2), (0, 1)]);
        for start in 0..ring.len() {
            let mut rotated = ring.clone();
            rotated.rotate_left(start);
            assert_eq!(winding_total(&rotated), 360);
        }
    }

    #[test]
    fn test_concave_ring_still_totals_full_turn() {
        // U-shaped outline with a notch cut into the top edge
        let ring = path(&[
            (0, 0), (1, 0), (1, 1), (2, 1), (3, 1), (3, 0), (4, 0),
            (4, 1), (4, 2), (3, 2), (2, 2), (1, 2), (0, 2), (0, 1),
        ]);
        assert_eq!(winding_total(&ring), 360);

        let mut reversed = ring.clone();
        reversed.reverse();
        assert_eq!(winding_total(&reversed), -360);
    }

    #[test]
    fn test_unit_square_sprite_sets_differ_per_winding() {
        let clockwise = path(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        let counter = path(&[(0, 0), (0, 1), (1, 1), (1, 0)]);

        let cw_sprites = ring_sprites(&clockwise, Winding::Clockwise);
        let ccw_sprites = ring_sprites(&counter, Winding::CounterClockwise);

        for (i, pos) in clockwise.iter().enumerate() {
            let j = counter.iter().position(|p| p == pos).unwrap();
            assert_ne!(cw_sprites[i], ccw_sprites[j], "cell {:?}", pos);
        }
    }

    #[test]
    fn test_clockwise_square_uses_outer_corners() {
        let clockwise = path(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        let sprites = ring_sprites(&clockwise, Winding::Clockwise);
        assert_eq!(
            sprites,
            vec![
                SpriteCoord::new(0, 10),
                SpriteCoord::new(2, 10),
                SpriteCoord::new(2, 12),
                SpriteCoord::new(0, 12),
            ]
        );
    }

    #[test]
    fn test_sprite_table_entries_are_distinct() {
        let mut seen = HashSet::new();
        for pair in RING_SPRITES.iter() {
            assert_ne!(pair[0], pair[1]);
            assert!(pair[0].is_valid() && pair[1].is_valid());
            seen.insert(pair[0]);
            seen.insert(pair[1]);
        }
        // Each winding's block holds 12 distinct pieces
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn test_classify_straight_and_turns() {
        let shape = RingShape::classify(GridPos::new(0, 2), GridPos::new(0, 1), GridPos::new(0, 0));
        assert_eq!(shape, Some(RingShape::VerticalUp));

        let shape = RingShape::classify(GridPos::new(0, 0), GridPos::new(1, 0), GridPos::new(1, 1));
        assert_eq!(shape, Some(RingShape::RightThenDown));

        let shape = RingShape::classify(GridPos::new(0, 0), GridPos::new(1, 0), GridPos::new(0, 0));
        assert_eq!(shape, None);
    }
}
