//! Input plumbing and snap detection for Blockflow

pub mod gesture_constants;
mod input;
mod snap;
mod throttle;

pub use gesture_constants::*;
pub use input::*;
pub use snap::*;
pub use throttle::*;

pub mod prelude {
    pub use crate::input::{Affordance, KeyCode, PointerEvent, PointerEventKind, WheelEvent};
    pub use crate::snap::{SnapCandidate, SnapEngine, SnapTarget};
    pub use crate::throttle::Throttle;
}
