//! Core geometry types for the caravel movement engine.
//!
//! - [`Point`] and [`Range`]: integer grid coordinates and half-open
//!   rectangles.
//! - [`Direction`]: the closed 8-way compass used for tile adjacency, with a
//!   fixed, stable enumeration order.
//! - [`DirSet`]: a bitmask of directions, used for per-tile improvement
//!   connection masks (roads, rivers).

mod dir;
mod geom;

pub use dir::{DirSet, Direction};
pub use geom::{Point, Range, RangeIter};
