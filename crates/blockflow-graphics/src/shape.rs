//! Jigsaw outlines for hat, cap, stack and C-shaped blocks.
//!
//! Every outline is traced clockwise starting at the top-left corner in
//! block-local coordinates. The notch cut into the top edge and the tab
//! hanging below the bottom edge come from the same [`Scallop`] builder, so
//! a tab traced backwards and lifted by the block height is exactly the
//! notch of the block stacked beneath it.

use crate::geometry::{Path, Point};

/// Shape class selected by a block's type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeClass {
    /// Plain stack block: notch on top, tab below.
    Stack,
    /// Flow entry point: nothing attaches above it.
    Hat,
    /// Terminal block: nothing attaches below it.
    Cap,
    /// Block hosting nested child stacks in `arms` interior cavities.
    CBlock { arms: usize },
}

impl ShapeClass {
    #[inline]
    pub fn has_notch(self) -> bool {
        !matches!(self, ShapeClass::Hat)
    }

    #[inline]
    pub fn has_tab(self) -> bool {
        !matches!(self, ShapeClass::Cap)
    }

    #[inline]
    pub fn is_hat(self) -> bool {
        matches!(self, ShapeClass::Hat)
    }

    #[inline]
    pub fn is_cap(self) -> bool {
        matches!(self, ShapeClass::Cap)
    }

    #[inline]
    pub fn is_c_block(self) -> bool {
        matches!(self, ShapeClass::CBlock { .. })
    }

    /// Number of interior arms; zero for everything but C-blocks.
    #[inline]
    pub fn arm_count(self) -> usize {
        match self {
            ShapeClass::CBlock { arms } => arms,
            _ => 0,
        }
    }
}

/// Fixed dimensions shared by shape geometry, layout and snapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockMetrics {
    pub block_width: f32,
    pub header_height: f32,
    /// Body height used until the surface reports a measurement.
    pub min_body_height: f32,
    pub min_arm_height: f32,
    pub arm_indent: f32,
    pub bar_height: f32,
    pub corner_radius: f32,
    pub notch_offset: f32,
    pub notch_width: f32,
    pub notch_depth: f32,
}

impl Default for BlockMetrics {
    fn default() -> Self {
        Self {
            block_width: 240.0,
            header_height: 28.0,
            min_body_height: 24.0,
            min_arm_height: 32.0,
            arm_indent: 16.0,
            bar_height: 20.0,
            corner_radius: 6.0,
            notch_offset: 16.0,
            notch_width: 24.0,
            notch_depth: 6.0,
        }
    }
}

/// One cubic scallop between two points on a horizontal edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scallop {
    pub start: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub end: Point,
}

impl Scallop {
    /// Scallop from `from_x` to `to_x` along `y`, bulging `depth` downwards.
    pub fn between(from_x: f32, to_x: f32, y: f32, depth: f32) -> Self {
        let span = to_x - from_x;
        Self {
            start: Point::new(from_x, y),
            ctrl1: Point::new(from_x + span * 0.3, y + depth),
            ctrl2: Point::new(from_x + span * 0.7, y + depth),
            end: Point::new(to_x, y),
        }
    }

    /// The same curve traced in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            end: self.start,
        }
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            start: self.start.offset(dx, dy),
            ctrl1: self.ctrl1.offset(dx, dy),
            ctrl2: self.ctrl2.offset(dx, dy),
            end: self.end.offset(dx, dy),
        }
    }

    fn trace(&self, path: &mut Path) {
        path.line_to(self.start);
        path.cubic_to(self.ctrl1, self.ctrl2, self.end);
    }
}

/// Notch cut into the top edge, traced left to right.
pub fn top_notch(metrics: &BlockMetrics) -> Scallop {
    Scallop::between(
        metrics.notch_offset,
        metrics.notch_offset + metrics.notch_width,
        0.0,
        metrics.notch_depth,
    )
}

/// Tab hanging below the bottom edge of a block `height` tall, traced right to left.
pub fn bottom_tab(metrics: &BlockMetrics, height: f32) -> Scallop {
    Scallop::between(
        metrics.notch_offset + metrics.notch_width,
        metrics.notch_offset,
        height,
        metrics.notch_depth,
    )
}

/// Tab on the ceiling of an arm cavity starting at `arm_top`, traced right to left.
///
/// Offset by the arm indent so it mates with the top notch of a child placed
/// at the cavity entry.
pub fn arm_tab(metrics: &BlockMetrics, arm_top: f32) -> Scallop {
    bottom_tab(metrics, arm_top).translate(metrics.arm_indent, 0.0)
}

/// Builds the closed outline of a block.
///
/// `head_height` is the height above the first arm cavity and `arm_heights`
/// the cavity heights; both are only read for C-blocks. Missing arm heights
/// fall back to the minimum arm height.
pub fn block_outline(
    class: ShapeClass,
    width: f32,
    height: f32,
    head_height: f32,
    arm_heights: &[f32],
    metrics: &BlockMetrics,
) -> Path {
    let radius = metrics
        .corner_radius
        .min(width / 2.0)
        .min(height / 2.0)
        .max(0.0);
    let mut path = Path::new();

    path.move_to(Point::new(0.0, radius));
    path.quad_to(Point::ZERO, Point::new(radius, 0.0));
    if class.has_notch() {
        top_notch(metrics).trace(&mut path);
    }
    path.line_to(Point::new(width - radius, 0.0));
    path.quad_to(Point::new(width, 0.0), Point::new(width, radius));

    if let ShapeClass::CBlock { arms } = class {
        let mut y = head_height;
        for arm in 0..arms {
            let arm_height = arm_heights
                .get(arm)
                .copied()
                .unwrap_or(metrics.min_arm_height)
                .max(metrics.min_arm_height);
            path.line_to(Point::new(width, y));
            arm_tab(metrics, y).trace(&mut path);
            path.line_to(Point::new(metrics.arm_indent, y));
            path.line_to(Point::new(metrics.arm_indent, y + arm_height));
            path.line_to(Point::new(width, y + arm_height));
            y += arm_height + metrics.bar_height;
        }
    }

    path.line_to(Point::new(width, height - radius));
    path.quad_to(Point::new(width, height), Point::new(width - radius, height));
    if class.has_tab() {
        bottom_tab(metrics, height).trace(&mut path);
    }
    path.line_to(Point::new(radius, height));
    path.quad_to(Point::new(0.0, height), Point::new(0.0, height - radius));
    path.close();
    path
}

/// Curve used for a connection that is not backed by a physical snap.
pub fn connection_curve(from: Point, to: Point) -> Path {
    let bend = ((to.y - from.y).abs() / 2.0).max(40.0);
    let mut path = Path::new();
    path.move_to(from);
    path.cubic_to(from.offset(0.0, bend), to.offset(0.0, -bend), to);
    path
}

#[cfg(test)]
#[path = "tests/shape_tests.rs"]
mod tests;
