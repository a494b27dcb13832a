//! Depth-first stack placement.
//!
//! Starting at each free root, a block is placed, its arms are laid out
//! inside it, and its successor is placed directly below its total height.
//! Heights bubble up from arm contents, so a single pass places every block.

use blockflow_core::{ArmSlots, Block, BlockGraph, BlockId, MAX_WALK_STEPS};
use blockflow_core::collections::BlockSet;
use blockflow_graphics::{block_outline, BlockMetrics, Path, Point, Rect};

/// Summary of one layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutStats {
    pub stacks: usize,
    pub placed: usize,
    /// Union of every placed block, tabs excluded.
    pub bounds: Option<Rect>,
}

/// Places blocks using a fixed set of [`BlockMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutEngine {
    metrics: BlockMetrics,
}

struct Pass {
    visited: BlockSet,
    stats: LayoutStats,
}

impl LayoutEngine {
    pub fn new(metrics: BlockMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &BlockMetrics {
        &self.metrics
    }

    /// Lays out every stack in the graph.
    pub fn layout(&self, graph: &mut BlockGraph) -> LayoutStats {
        let mut pass = Pass {
            visited: BlockSet::default(),
            stats: LayoutStats::default(),
        };
        for root in graph.roots() {
            let Some(origin) = graph.get(root).map(Block::position) else {
                continue;
            };
            pass.stats.stacks += 1;
            self.place_chain(graph, root, origin, &mut pass);
        }
        if pass.visited.len() < graph.len() {
            log::debug!(
                "layout reached {} of {} blocks; the rest are unreachable from any root",
                pass.visited.len(),
                graph.len()
            );
        }
        pass.stats
    }

    /// Lays out the single stack that contains `id`.
    pub fn layout_stack(&self, graph: &mut BlockGraph, id: BlockId) -> LayoutStats {
        let root = graph.stack_root(id);
        let mut pass = Pass {
            visited: BlockSet::default(),
            stats: LayoutStats::default(),
        };
        if let Some(origin) = graph.get(root).map(Block::position) {
            pass.stats.stacks = 1;
            self.place_chain(graph, root, origin, &mut pass);
        }
        pass.stats
    }

    /// Places the chain headed by `head` with its top-left at `origin` and
    /// returns the chain's total height.
    fn place_chain(
        &self,
        graph: &mut BlockGraph,
        head: BlockId,
        origin: Point,
        pass: &mut Pass,
    ) -> f32 {
        let mut cursor = Some(head);
        let mut y = origin.y;
        while let Some(id) = cursor {
            if pass.visited.len() >= MAX_WALK_STEPS || !pass.visited.insert(id) {
                log::warn!("layout stopped at block {id}: cycle or runaway stack");
                break;
            }
            let Some(height) = self.place_block(graph, id, Point::new(origin.x, y), pass) else {
                break;
            };
            y += height;
            cursor = graph.get(id).and_then(Block::next);
        }
        y - origin.y
    }

    fn place_block(
        &self,
        graph: &mut BlockGraph,
        id: BlockId,
        at: Point,
        pass: &mut Pass,
    ) -> Option<f32> {
        let block = graph.get(id)?;
        let m = &self.metrics;
        let body = block
            .layout()
            .content
            .map_or(m.min_body_height, |content| content.height);
        let head_height = m.header_height + body;
        let arms: ArmSlots<Option<BlockId>> = block.branches().iter().copied().collect();

        let mut arm_tops = ArmSlots::new();
        let mut arm_heights = ArmSlots::new();
        let mut cavity_y = head_height;
        for head in arms {
            let content = match head {
                Some(child) => self.place_chain(
                    graph,
                    child,
                    Point::new(at.x + m.arm_indent, at.y + cavity_y),
                    pass,
                ),
                None => 0.0,
            };
            let arm_height = content.max(m.min_arm_height);
            arm_tops.push(cavity_y);
            arm_heights.push(arm_height);
            cavity_y += arm_height + m.bar_height;
        }
        let height = cavity_y;

        let block = graph.get_mut(id)?;
        block.set_position(at);
        let cache = block.layout_mut();
        cache.height = height;
        cache.head_height = head_height;
        cache.arm_tops = arm_tops;
        cache.arm_heights = arm_heights;

        let rect = Rect::new(at.x, at.y, m.block_width, height);
        pass.stats.placed += 1;
        pass.stats.bounds = Some(match pass.stats.bounds {
            Some(bounds) => bounds.union(&rect),
            None => rect,
        });
        Some(height)
    }

    /// Closed outline of `block` in block-local coordinates, from its last layout.
    pub fn outline(&self, block: &Block) -> Path {
        let cache = block.layout();
        block_outline(
            block.shape(),
            self.metrics.block_width,
            cache.height,
            cache.head_height,
            &cache.arm_heights,
            &self.metrics,
        )
    }

    /// Canvas point where a block stacked below `block` would sit.
    pub fn below_point(&self, block: &Block) -> Point {
        block.position().offset(0.0, block.layout().height)
    }

    /// Canvas point where the head of arm `arm` of `block` would sit.
    pub fn arm_entry(&self, block: &Block, arm: usize) -> Option<Point> {
        let top = block.layout().arm_tops.get(arm).copied()?;
        Some(block.position().offset(self.metrics.arm_indent, top))
    }

    /// Canvas-space bounds of `block`, tab and notch excluded.
    pub fn bounds(&self, block: &Block) -> Rect {
        block.bounds(self.metrics.block_width)
    }

    /// Canvas-space rectangles of the arm cavities of `block`.
    pub fn cavities(&self, block: &Block) -> ArmSlots<Rect> {
        let origin = block.position();
        let cache = block.layout();
        cache
            .arm_tops
            .iter()
            .zip(cache.arm_heights.iter())
            .map(|(top, height)| {
                Rect::new(
                    origin.x + self.metrics.arm_indent,
                    origin.y + top,
                    self.metrics.block_width - self.metrics.arm_indent,
                    *height,
                )
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
