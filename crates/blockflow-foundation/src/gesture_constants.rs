//! Shared thresholds for pointer handling on the canvas.
//!
//! All distances are in canvas units at zoom 1.0.

use std::time::Duration;

/// Pointer travel, in screen pixels, that turns a block press into a drag.
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Farthest a dragged block's top-left may be from an attachment point and
/// still snap to it.
pub const SNAP_RADIUS: f32 = 40.0;

/// Minimum spacing between snap preview recomputations during a drag.
pub const PREVIEW_INTERVAL: Duration = Duration::from_millis(16);
