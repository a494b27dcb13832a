//! Headless [`RenderSurface`] that records what the canvas asked for.

use blockflow_canvas::{ConnectionCurve, RenderSurface};
use blockflow_core::{Block, BlockId};
use blockflow_graphics::{Path, Point, Size};
use indexmap::IndexMap;

/// Element state for one mounted block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MountedBlock {
    pub name: String,
    pub body: String,
    pub origin: Option<Point>,
    pub outline: Option<Path>,
    pub selected: bool,
}

/// Surface calls in the order they arrived, for ordering assertions.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Mount(BlockId),
    Unmount(BlockId),
    Select(BlockId, bool),
    Transform(Point, f32),
    ShowPreview(Point),
    HidePreview,
    RequestFrame,
}

/// Records mounts, placements and previews; answers measurements from a script.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    blocks: IndexMap<BlockId, MountedBlock>,
    calls: Vec<SurfaceCall>,
    sizes: IndexMap<BlockId, Size>,
    transform: Option<(Point, f32)>,
    curves: Vec<ConnectionCurve>,
    preview: Option<(Point, Path)>,
    previews_shown: usize,
    frames_requested: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the body size reported for `id` from now on.
    pub fn set_content_size(&mut self, id: BlockId, size: Size) {
        self.sizes.insert(id, size);
    }

    pub fn mounted(&self, id: BlockId) -> Option<&MountedBlock> {
        self.blocks.get(&id)
    }

    pub fn mounted_ids(&self) -> Vec<BlockId> {
        self.blocks.keys().copied().collect()
    }

    pub fn body(&self, id: BlockId) -> Option<&str> {
        self.blocks.get(&id).map(|block| block.body.as_str())
    }

    pub fn origin(&self, id: BlockId) -> Option<Point> {
        self.blocks.get(&id).and_then(|block| block.origin)
    }

    pub fn selected_ids(&self) -> Vec<BlockId> {
        self.blocks
            .iter()
            .filter(|(_, block)| block.selected)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn transform(&self) -> Option<(Point, f32)> {
        self.transform
    }

    pub fn curves(&self) -> &[ConnectionCurve] {
        &self.curves
    }

    /// Origin of the snap preview currently shown.
    pub fn preview(&self) -> Option<Point> {
        self.preview.as_ref().map(|(origin, _)| *origin)
    }

    pub fn previews_shown(&self) -> usize {
        self.previews_shown
    }

    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }
}

impl RenderSurface for RecordingSurface {
    fn mount_block(&mut self, block: &Block, body: &str) {
        let entry = self.blocks.entry(block.id()).or_default();
        entry.name = block.name().to_owned();
        entry.body = body.to_owned();
        self.calls.push(SurfaceCall::Mount(block.id()));
    }

    fn unmount_block(&mut self, id: BlockId) {
        self.blocks.shift_remove(&id);
        self.calls.push(SurfaceCall::Unmount(id));
    }

    fn place_block(&mut self, id: BlockId, origin: Point, outline: &Path) {
        match self.blocks.get_mut(&id) {
            Some(block) => {
                block.origin = Some(origin);
                block.outline = Some(outline.clone());
            }
            None => log::warn!("place for unmounted block {id}"),
        }
    }

    fn measure_content(&mut self, id: BlockId, _width: f32) -> Option<Size> {
        self.sizes.get(&id).copied()
    }

    fn set_selected(&mut self, id: BlockId, selected: bool) {
        if let Some(block) = self.blocks.get_mut(&id) {
            block.selected = selected;
        }
        self.calls.push(SurfaceCall::Select(id, selected));
    }

    fn set_transform(&mut self, pan: Point, zoom: f32) {
        self.transform = Some((pan, zoom));
        self.calls.push(SurfaceCall::Transform(pan, zoom));
    }

    fn draw_connections(&mut self, curves: &[ConnectionCurve]) {
        self.curves = curves.to_vec();
    }

    fn show_snap_preview(&mut self, origin: Point, outline: &Path) {
        self.preview = Some((origin, outline.clone()));
        self.previews_shown += 1;
        self.calls.push(SurfaceCall::ShowPreview(origin));
    }

    fn hide_snap_preview(&mut self) {
        if self.preview.take().is_some() {
            self.calls.push(SurfaceCall::HidePreview);
        }
    }

    fn request_frame(&mut self) {
        self.frames_requested += 1;
        self.calls.push(SurfaceCall::RequestFrame);
    }
}
