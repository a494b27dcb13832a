//! Attachment point search for a dragged block.
//!
//! Candidates are read from the last layout pass: the bottom-left of every
//! open stack tail and the entry of every empty arm. The dragged block's own
//! subtree is skipped so a drop can never create a cycle.

use crate::gesture_constants::SNAP_RADIUS;
use blockflow_core::{BlockGraph, BlockId, GraphError};
use blockflow_graphics::Point;
use blockflow_layout::LayoutEngine;

/// Where a dropped block attaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SnapTarget {
    Below(BlockId),
    Arm { c_block: BlockId, arm: usize },
}

impl SnapTarget {
    /// Block that owns the attachment point.
    pub fn host(&self) -> BlockId {
        match *self {
            SnapTarget::Below(id) => id,
            SnapTarget::Arm { c_block, .. } => c_block,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapCandidate {
    pub target: SnapTarget,
    /// Canvas point the dragged block's top-left would move to.
    pub point: Point,
    pub distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapEngine {
    layout: LayoutEngine,
    radius: f32,
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::new(LayoutEngine::default(), SNAP_RADIUS)
    }
}

impl SnapEngine {
    pub fn new(layout: LayoutEngine, radius: f32) -> Self {
        Self { layout, radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Every attachment point valid for `moving`, in stable block order.
    ///
    /// A hat has none: flow entries only ever sit at a stack root.
    pub fn candidates(&self, graph: &BlockGraph, moving: BlockId) -> Vec<SnapCandidate> {
        let Some(dragged) = graph.get(moving) else {
            return Vec::new();
        };
        if dragged.shape().is_hat() {
            return Vec::new();
        }
        let from = dragged.position();
        let excluded = graph.subtree_set(moving);
        let mut out = Vec::new();
        for block in graph.blocks() {
            if excluded.contains(&block.id()) {
                continue;
            }
            if block.next().is_none() && !block.shape().is_cap() {
                let point = self.layout.below_point(block);
                out.push(SnapCandidate {
                    target: SnapTarget::Below(block.id()),
                    point,
                    distance: from.distance_to(point),
                });
            }
            for (arm, head) in block.branches().iter().enumerate() {
                if head.is_some() {
                    continue;
                }
                let Some(point) = self.layout.arm_entry(block, arm) else {
                    continue;
                };
                out.push(SnapCandidate {
                    target: SnapTarget::Arm {
                        c_block: block.id(),
                        arm,
                    },
                    point,
                    distance: from.distance_to(point),
                });
            }
        }
        out
    }

    /// Nearest candidate within the snap radius. Ties keep the first found.
    pub fn find(&self, graph: &BlockGraph, moving: BlockId) -> Option<SnapCandidate> {
        let mut best: Option<SnapCandidate> = None;
        for candidate in self.candidates(graph, moving) {
            if candidate.distance > self.radius {
                continue;
            }
            if best.map_or(true, |current| candidate.distance < current.distance) {
                best = Some(candidate);
            }
        }
        log::trace!("snap search for {moving}: {best:?}");
        best
    }

    /// Performs the attach described by `target`.
    pub fn apply(
        &self,
        graph: &mut BlockGraph,
        target: SnapTarget,
        moving: BlockId,
    ) -> Result<(), GraphError> {
        match target {
            SnapTarget::Below(anchor) => graph.snap_below(anchor, moving),
            SnapTarget::Arm { c_block, arm } => graph.snap_into_arm(c_block, arm, moving),
        }
    }
}

#[cfg(test)]
#[path = "tests/snap_tests.rs"]
mod tests;
