use blockflow_core::BlockCatalog;
use blockflow_drawflow::DEFAULT_GRAPH_ID;
use blockflow_foundation::gesture_constants::{DRAG_THRESHOLD, PREVIEW_INTERVAL, SNAP_RADIUS};
use blockflow_graphics::{BlockMetrics, Point};
use std::time::Duration;

/// Everything a [`Canvas`](crate::Canvas) needs to know up front.
#[derive(Clone, Debug)]
pub struct CanvasConfig {
    pub catalog: BlockCatalog,
    pub metrics: BlockMetrics,
    /// Canvas-space distance within which a dropped block snaps.
    pub snap_radius: f32,
    /// Screen-space travel before a press on a block becomes a drag.
    pub drag_threshold: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Zoom change per wheel notch and per zoom in/out call.
    pub zoom_step: f32,
    /// Minimum spacing between snap preview searches while dragging.
    pub preview_interval: Duration,
    /// Where a duplicate lands relative to its original.
    pub duplicate_offset: Point,
    /// Graph id written on export.
    pub graph_id: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            catalog: BlockCatalog::default(),
            metrics: BlockMetrics::default(),
            snap_radius: SNAP_RADIUS,
            drag_threshold: DRAG_THRESHOLD,
            zoom_min: 0.25,
            zoom_max: 2.5,
            zoom_step: 0.1,
            preview_interval: PREVIEW_INTERVAL,
            duplicate_offset: Point::new(24.0, 24.0),
            graph_id: DEFAULT_GRAPH_ID.to_owned(),
        }
    }
}

impl CanvasConfig {
    pub fn with_catalog(mut self, catalog: BlockCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_metrics(mut self, metrics: BlockMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_graph_id(mut self, graph_id: impl Into<String>) -> Self {
        self.graph_id = graph_id.into();
        self
    }

    /// Clamps `zoom` into the configured range.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }
}
