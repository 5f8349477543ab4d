//! Sprite sheet lookup tables
//!
//! Edge tables are indexed by the 4-bit neighbor mask (top=1, bottom=2,
//! left=4, right=8). `X` marks a configuration the sheet has no sprite for.

use crate::map::SpriteCoord;

const fn at(x: i32, y: i32) -> SpriteCoord {
    SpriteCoord::new(x, y)
}

const X: SpriteCoord = SpriteCoord::INVALID;

pub const LAND: SpriteCoord = at(1, 1);

/// Neutral sprite for a mountain cell whose ring is still open
pub const MOUNTAIN_PLACEHOLDER: SpriteCoord = at(1, 11);

/// Generic coast sprite used when a coastline shape is ambiguous
pub const COAST_FALLBACK: SpriteCoord = at(1, 3);

/// Row selector for [`EDGE_SPRITES`] and [`DIAGONAL_SPRITES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeTable {
    Water = 0,
    Coast = 1,
}

#[rustfmt::skip]
pub const EDGE_SPRITES: [[SpriteCoord; 16]; 2] = [
    // Water, mask = non-water neighbors
    [
        at(1, 6), at(1, 5), at(1, 7), X,         // ____  T___  _B__  TB__
        at(0, 6), at(0, 5), at(0, 7), X,         // __L_  T_L_  _BL_  TBL_
        at(2, 6), at(2, 5), at(2, 7), X,         // ___R  T__R  _B_R  TB_R
        X,        X,        X,        X,         // __LR  T_LR  _BLR  TBLR
    ],
    // Coast, composited under shoreline water
    [
        at(1, 3), at(1, 2), at(1, 4), X,
        at(0, 3), at(0, 2), at(0, 4), X,
        at(2, 3), at(2, 2), at(2, 4), X,
        X,        X,        X,        X,
    ],
];

/// Corner sprites for an open cell with one diagonal hit: TL, TR, BL, BR
pub const DIAGONAL_SPRITES: [[SpriteCoord; 4]; 2] = [
    [at(5, 7), at(4, 7), at(5, 6), at(4, 6)],
    [at(4, 3), at(3, 3), at(4, 2), at(3, 2)],
];

pub const DIAGONAL_TOP_LEFT: usize = 0;
pub const DIAGONAL_TOP_RIGHT: usize = 1;
pub const DIAGONAL_BOTTOM_LEFT: usize = 2;
pub const DIAGONAL_BOTTOM_RIGHT: usize = 3;

pub fn edge_sprite(table: EdgeTable, mask: u8) -> SpriteCoord {
    EDGE_SPRITES[table as usize][(mask & 0xF) as usize]
}

pub fn diagonal_sprite(table: EdgeTable, corner: usize) -> SpriteCoord {
    DIAGONAL_SPRITES[table as usize][corner]
}

/// Straight coastline, indexed by the single water-side bit
#[rustfmt::skip]
pub const COAST_STRAIGHT: [SpriteCoord; 16] = [
    X,              at(1, 2),       at(1, 4),       X,
    at(0, 3),       X,              X,              X,
    at(2, 3),       X,              X,              X,
    X,              X,              X,              X,
];

/// Coast turning around a water diagonal, indexed by the coast-neighbor mask
#[rustfmt::skip]
pub const COAST_OUTER_CORNER: [SpriteCoord; 16] = [
    COAST_FALLBACK, COAST_FALLBACK, COAST_FALLBACK, COAST_FALLBACK,
    COAST_FALLBACK, at(4, 3),       at(4, 2),       COAST_FALLBACK,
    COAST_FALLBACK, at(3, 3),       at(3, 2),       COAST_FALLBACK,
    COAST_FALLBACK, COAST_FALLBACK, COAST_FALLBACK, COAST_FALLBACK,
];

/// Coast turning around a land diagonal, indexed by the coast-neighbor mask
#[rustfmt::skip]
pub const COAST_INNER_CORNER: [SpriteCoord; 16] = [
    COAST_FALLBACK, COAST_FALLBACK, COAST_FALLBACK, COAST_FALLBACK,
    COAST_FALLBACK, at(2, 4),       at(2, 2),       COAST_FALLBACK,
    COAST_FALLBACK, at(0, 4),       at(0, 2),       COAST_FALLBACK,
    COAST_FALLBACK, COAST_FALLBACK, COAST_FALLBACK, COAST_FALLBACK,
];
