//! Height computation and depth-first placement for Blockflow stacks

mod engine;
mod measure;

pub use engine::*;
pub use measure::*;

pub mod prelude {
    pub use crate::engine::{LayoutEngine, LayoutStats};
    pub use crate::measure::ContentMeasure;
}
