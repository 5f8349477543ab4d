//! Paragon Pioneers map core
//!
//! Terrain categories are painted onto a rectangular grid and every edit
//! re-derives the sprite variant of the edited cell and its neighbors.
//! Mountains are drawn as closed rings of cells, tracked as whole objects
//! that can be completed, abandoned or torn down together.
//!
//! ## Layout
//!
//! - [`map`]: the terrain grid, its cells and the flat character format
//! - [`neighbors`]: direction bitmasks over orthogonal and diagonal neighbors
//! - [`autotile`]: per-cell sprite resolution for land, water and coast
//! - [`mountain`]: ring drawing, winding, ring sprites and teardown
//! - [`session`]: the orchestrator that routes paint requests

pub mod autotile;
pub mod error;
pub mod map;
pub mod mountain;
pub mod neighbors;
pub mod session;

pub use error::MapError;
pub use map::{Cell, GridPos, SpriteCoord, TerrainCategory, TerrainGrid};
pub use mountain::{PlaceOutcome, Ring, RingSet, RingTracker, Winding};
pub use session::{MapSession, PaintOutcome, RenderCell, Tool};
