use blockflow_core::{BlockGraph, BlockId};
use blockflow_graphics::Size;

/// Source of measured body sizes, usually the rendering surface.
///
/// Returning `None` keeps the block on its placeholder body height.
pub trait ContentMeasure {
    fn content_size(&mut self, id: BlockId, width: f32) -> Option<Size>;
}

impl<F> ContentMeasure for F
where
    F: FnMut(BlockId, f32) -> Option<Size>,
{
    fn content_size(&mut self, id: BlockId, width: f32) -> Option<Size> {
        self(id, width)
    }
}

/// Copies fresh measurements into each block's layout cache.
///
/// Returns how many blocks changed size, so callers can skip a relayout
/// when nothing moved.
pub fn measure_content<M>(graph: &mut BlockGraph, width: f32, measure: &mut M) -> usize
where
    M: ContentMeasure + ?Sized,
{
    let mut changed = 0;
    for id in graph.ids() {
        let Some(size) = measure.content_size(id, width) else {
            continue;
        };
        let size = Size::new(size.width.max(0.0), size.height.max(0.0));
        if let Some(block) = graph.get_mut(id) {
            let cache = block.layout_mut();
            if cache.content != Some(size) {
                cache.content = Some(size);
                changed += 1;
            }
        }
    }
    changed
}
