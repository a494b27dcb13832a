//! Embeddable block-programming canvas for Blockflow
//!
//! [`Canvas`] ties the graph, layout, snapping, serialization and
//! sanitizing crates to a host-provided [`RenderSurface`]. The host feeds it
//! pointer, wheel and key input and calls [`Canvas::frame`] whenever the
//! surface's frame callback fires.

mod canvas;
mod config;
mod events;
mod gesture;
mod hit_test;
mod surface;
mod viewport;

pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use events::{CanvasEvent, EventKind, ListenerId, Listeners};
pub use hit_test::hit_test;
pub use surface::{ConnectionCurve, RenderSurface};
pub use viewport::Viewport;

pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::config::CanvasConfig;
    pub use crate::events::{CanvasEvent, EventKind, ListenerId};
    pub use crate::surface::{ConnectionCurve, RenderSurface};
    pub use blockflow_core::prelude::*;
    pub use blockflow_foundation::prelude::*;
    pub use blockflow_graphics::prelude::*;
}
