//! Pointer gesture state.

use blockflow_core::{Anchor, BlockId};
use blockflow_foundation::{PointerId, SnapCandidate};
use blockflow_graphics::Point;
use smallvec::SmallVec;

/// A chain being dragged, with enough state to put it back.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Drag {
    pub block: BlockId,
    /// Pointer position relative to the block origin, canvas space.
    pub grab: Point,
    /// Where the chain sat before it was detached.
    pub restore: Anchor,
    pub restore_position: Point,
    pub preview: Option<SnapCandidate>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum Gesture {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    /// Pressed on a block; not yet past the drag threshold.
    Pressing {
        block: BlockId,
        start: Point,
        grab: Point,
    },
    Dragging(Drag),
    Pinching {
        start_distance: f32,
        start_zoom: f32,
    },
}

impl Gesture {
    pub fn dragged_block(&self) -> Option<BlockId> {
        match self {
            Gesture::Dragging(drag) => Some(drag.block),
            _ => None,
        }
    }
}

/// Touch points currently on the surface, in screen space.
#[derive(Clone, Debug, Default)]
pub(crate) struct Touches {
    points: SmallVec<[(PointerId, Point); 2]>,
}

impl Touches {
    pub fn press(&mut self, id: PointerId, at: Point) -> usize {
        self.update(id, at);
        self.points.len()
    }

    pub fn update(&mut self, id: PointerId, at: Point) {
        match self.points.iter_mut().find(|(known, _)| *known == id) {
            Some(entry) => entry.1 = at,
            None => self.points.push((id, at)),
        }
    }

    pub fn release(&mut self, id: PointerId) {
        self.points.retain(|(known, _)| *known != id);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Spread and midpoint of the first two touches.
    pub fn pinch(&self) -> Option<(f32, Point)> {
        let [(_, a), (_, b), ..] = self.points.as_slice() else {
            return None;
        };
        let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        Some((a.distance_to(*b), mid))
    }
}
