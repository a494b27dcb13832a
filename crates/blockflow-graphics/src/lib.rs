//! Pure math/data for drawing blocks in Blockflow
//!
//! This crate contains geometry primitives, vector paths and the jigsaw
//! outline builders shared by layout, snapping and rendering.

mod geometry;
mod shape;

pub use geometry::*;
pub use shape::*;

pub mod prelude {
    pub use crate::geometry::{Path, PathCommand, Point, Rect, Size};
    pub use crate::shape::{block_outline, BlockMetrics, ShapeClass};
}
