use blockflow_graphics::{Point, Rect, ShapeClass, Size};
use smallvec::SmallVec;

pub type BlockId = u32;

/// Opaque key/value configuration owned by the host application.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Per-arm storage; three covers every built-in C-block without spilling.
pub type ArmSlots<T> = SmallVec<[T; 3]>;

/// Values written by the layout pass. Never authoritative for topology.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutCache {
    /// Body size last reported by the rendering surface.
    pub content: Option<Size>,
    pub height: f32,
    /// Header plus body, i.e. everything above the first arm cavity.
    pub head_height: f32,
    pub arm_heights: ArmSlots<f32>,
    /// Cavity tops relative to the block origin.
    pub arm_tops: ArmSlots<f32>,
}

/// Arguments for [`BlockGraph::add_block`](crate::BlockGraph::add_block).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewBlock {
    pub name: String,
    pub class: String,
    pub position: Point,
    pub data: Payload,
    pub html: String,
}

impl NewBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_data(mut self, data: Payload) -> Self {
        self.data = data;
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }
}

/// One visual program unit.
///
/// Topology fields are read-only outside the crate; use the
/// [`BlockGraph`](crate::BlockGraph) operations to change them.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    id: BlockId,
    name: String,
    class: String,
    shape: ShapeClass,
    position: Point,
    data: Payload,
    html: String,
    pub(crate) prev: Option<BlockId>,
    pub(crate) next: Option<BlockId>,
    pub(crate) parent_c_block: Option<BlockId>,
    pub(crate) branch_index: Option<usize>,
    pub(crate) branches: ArmSlots<Option<BlockId>>,
    layout: LayoutCache,
}

impl Block {
    pub(crate) fn new(id: BlockId, shape: ShapeClass, spec: NewBlock) -> Self {
        Self {
            id,
            name: spec.name,
            class: spec.class,
            shape,
            position: spec.position,
            data: spec.data,
            html: spec.html,
            prev: None,
            next: None,
            parent_c_block: None,
            branch_index: None,
            branches: std::iter::repeat(None).take(shape.arm_count()).collect(),
            layout: LayoutCache::default(),
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn shape(&self) -> ShapeClass {
        self.shape
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn data(&self) -> &Payload {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Payload {
        &mut self.data
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    pub fn prev(&self) -> Option<BlockId> {
        self.prev
    }

    pub fn next(&self) -> Option<BlockId> {
        self.next
    }

    pub fn parent_c_block(&self) -> Option<BlockId> {
        self.parent_c_block
    }

    pub fn branch_index(&self) -> Option<usize> {
        self.branch_index
    }

    pub fn branches(&self) -> &[Option<BlockId>] {
        &self.branches
    }

    /// Enclosing C-block arm, inherited by every block of an arm's chain.
    pub fn enclosing(&self) -> Option<(BlockId, usize)> {
        self.parent_c_block.zip(self.branch_index)
    }

    /// True for a stack root: no predecessor and not nested in an arm.
    pub fn is_root(&self) -> bool {
        self.prev.is_none() && self.parent_c_block.is_none()
    }

    pub fn is_arm_head(&self) -> bool {
        self.prev.is_none() && self.parent_c_block.is_some()
    }

    pub fn layout(&self) -> &LayoutCache {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutCache {
        &mut self.layout
    }

    /// Bounds from the last layout pass, tab and notch excluded.
    pub fn bounds(&self, width: f32) -> Rect {
        Rect::from_origin_size(self.position, Size::new(width, self.layout.height))
    }

    pub(crate) fn set_enclosing(&mut self, enclosing: Option<(BlockId, usize)>) {
        self.parent_c_block = enclosing.map(|(c_block, _)| c_block);
        self.branch_index = enclosing.map(|(_, arm)| arm);
    }
}
