use blockflow_core::{BlockGraph, BlockId};
use blockflow_graphics::Point;
use blockflow_layout::LayoutEngine;

/// Topmost block whose solid area contains `point` (canvas space).
///
/// C-block cavities are not part of the solid area, so a press inside an arm
/// reaches the nested child, or the canvas when the arm is empty. Later
/// blocks paint over earlier ones.
pub fn hit_test(graph: &BlockGraph, layout: &LayoutEngine, point: Point) -> Option<BlockId> {
    let blocks: Vec<_> = graph.blocks().collect();
    blocks
        .into_iter()
        .rev()
        .find(|block| {
            layout.bounds(block).contains(point.x, point.y)
                && !layout
                    .cavities(block)
                    .iter()
                    .any(|cavity| cavity.contains(point.x, point.y))
        })
        .map(|block| block.id())
}
