//! Testing utilities and harness for Blockflow

pub mod recording_surface;
pub mod robot;
pub mod robot_assertions;

pub use recording_surface::*;
pub use robot::*;

pub mod prelude {
    pub use crate::recording_surface::{MountedBlock, RecordingSurface, SurfaceCall};
    pub use crate::robot::CanvasRobot;
    pub use crate::robot_assertions;
}
