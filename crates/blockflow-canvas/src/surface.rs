use blockflow_core::{Block, BlockId, Connection};
use blockflow_graphics::{Path, Point, Size};
use blockflow_layout::ContentMeasure;

/// Curve drawn for a connection that is not a physical snap, in canvas space.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionCurve {
    pub connection: Connection,
    pub path: Path,
}

/// Rendering capability the canvas drives.
///
/// Everything passed in is in canvas space; the surface applies the
/// viewport transform itself. Bodies handed to [`mount_block`] are already
/// sanitized.
///
/// [`mount_block`]: RenderSurface::mount_block
pub trait RenderSurface {
    /// Creates, or replaces, the element for `block` with `body` as content.
    fn mount_block(&mut self, block: &Block, body: &str);

    fn unmount_block(&mut self, id: BlockId);

    /// Moves the element to `origin` and sets its outline, given in block-local coordinates.
    fn place_block(&mut self, id: BlockId, origin: Point, outline: &Path);

    /// Rendered size of the block body at `width`, or `None` when not measurable yet.
    fn measure_content(&mut self, id: BlockId, width: f32) -> Option<Size>;

    fn set_selected(&mut self, id: BlockId, selected: bool);

    /// Screen position = canvas position * zoom + pan.
    fn set_transform(&mut self, pan: Point, zoom: f32);

    /// Replaces every drawn connection curve.
    fn draw_connections(&mut self, curves: &[ConnectionCurve]);

    fn show_snap_preview(&mut self, origin: Point, outline: &Path);

    fn hide_snap_preview(&mut self);

    /// Asks the host to call [`Canvas::frame`](crate::Canvas::frame) soon.
    fn request_frame(&mut self);
}

/// Adapts a surface to the layout crate's measurement hook.
pub(crate) struct SurfaceMeasure<'a, S: ?Sized>(pub(crate) &'a mut S);

impl<S> ContentMeasure for SurfaceMeasure<'_, S>
where
    S: RenderSurface + ?Sized,
{
    fn content_size(&mut self, id: BlockId, width: f32) -> Option<Size> {
        self.0.measure_content(id, width)
    }
}
