//! Core data model for Blockflow
//!
//! Blocks live in an arena keyed by stable integer ids. Every stack link
//! (`prev`/`next`), arm link (`branches` / `parent_c_block`) and connection
//! endpoint is an id lookup into that arena, and all mutation goes through
//! [`BlockGraph`] so both ends of a relationship change together.

mod block;
mod catalog;
pub mod collections;
mod connection;
mod error;
mod graph;
mod stack;
mod walk;

pub use block::*;
pub use catalog::*;
pub use connection::*;
pub use error::*;
pub use graph::*;
pub use walk::{Anchor, MAX_WALK_STEPS};

pub use blockflow_graphics::ShapeClass;

pub mod prelude {
    pub use crate::block::{Block, BlockId, NewBlock, Payload};
    pub use crate::catalog::BlockCatalog;
    pub use crate::connection::Connection;
    pub use crate::error::GraphError;
    pub use crate::graph::{BlockGraph, GraphChange};
    pub use crate::walk::Anchor;
}
