use crate::config::CanvasConfig;
use crate::events::{CanvasEvent, EventKind, ListenerId, Listeners};
use crate::gesture::{Drag, Gesture, Touches};
use crate::hit_test::hit_test;
use crate::surface::{ConnectionCurve, RenderSurface, SurfaceMeasure};
use crate::viewport::Viewport;
use blockflow_core::{
    Anchor, Block, BlockGraph, BlockId, Connection, GraphChange, NewBlock, Payload, PRIMARY_PORT,
};
use blockflow_drawflow::{
    decode_str, decode_value, export_value, import_records_with, ImportError, ImportOptions,
    ImportReport, NodeRecord,
};
use blockflow_foundation::{
    Affordance, KeyCode, PointerEvent, PointerEventKind, PointerId, PointerType, SnapCandidate,
    SnapEngine, Throttle, WheelEvent,
};
use blockflow_graphics::{connection_curve, Point, Size};
use blockflow_layout::{measure_content, LayoutEngine};
use blockflow_sanitize::sanitize_html;
use serde_json::Value;

/// Embeddable block canvas.
///
/// Owns the graph, its id allocator and the listener registry, so any
/// number of canvases can live side by side. Every mutation drains the
/// graph's change journal, mounts or unmounts elements on the surface,
/// relays events to listeners and relayouts before returning.
///
/// Operations that name an unknown block are logged at debug level and
/// return `false` or `None`; nothing here panics on bad ids.
pub struct Canvas<S>
where
    S: RenderSurface,
{
    graph: BlockGraph,
    layout: LayoutEngine,
    snap: SnapEngine,
    config: CanvasConfig,
    surface: S,
    viewport: Viewport,
    /// Container size in screen pixels, used as the pivot for zoom buttons.
    viewport_size: Size,
    listeners: Listeners,
    selected: Option<BlockId>,
    /// Embedded field with keyboard focus, as (block, payload key).
    focused_field: Option<(BlockId, String)>,
    gesture: Gesture,
    /// Pointer that owns the current gesture; other pointers are ignored.
    stream: Option<PointerId>,
    touches: Touches,
    preview_throttle: Throttle,
    frame_requested: bool,
}

impl<S> Canvas<S>
where
    S: RenderSurface,
{
    pub fn new(mut surface: S, config: CanvasConfig) -> Self {
        let layout = LayoutEngine::new(config.metrics);
        let snap = SnapEngine::new(layout, config.snap_radius);
        let viewport = Viewport::default();
        surface.set_transform(viewport.pan, viewport.zoom);
        Self {
            graph: BlockGraph::new(config.catalog.clone()),
            layout,
            snap,
            preview_throttle: Throttle::new(config.preview_interval),
            config,
            surface,
            viewport,
            viewport_size: Size::new(800.0, 600.0),
            listeners: Listeners::new(),
            selected: None,
            focused_field: None,
            gesture: Gesture::Idle,
            stream: None,
            touches: Touches::default(),
            frame_requested: false,
        }
    }

    pub fn graph(&self) -> &BlockGraph {
        &self.graph
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn zoom(&self) -> f32 {
        self.viewport.zoom
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_size = Size::new(width, height);
    }

    pub fn selected(&self) -> Option<BlockId> {
        self.selected
    }

    pub fn focused_field(&self) -> Option<(BlockId, &str)> {
        self.focused_field
            .as_ref()
            .map(|(id, key)| (*id, key.as_str()))
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.dragged_block().is_some()
    }

    /// Block currently being dragged, if any.
    pub fn dragged_block(&self) -> Option<BlockId> {
        self.gesture.dragged_block()
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// True when a frame was requested and [`frame`](Self::frame) has not run since.
    pub fn needs_frame(&self) -> bool {
        self.frame_requested
    }

    /// Canvas-space point under a screen position.
    pub fn to_canvas(&self, screen: Point) -> Point {
        self.viewport.to_canvas(screen)
    }

    pub fn block_at(&self, screen: Point) -> Option<BlockId> {
        hit_test(&self.graph, &self.layout, self.viewport.to_canvas(screen))
    }

    // ── Events ──────────────────────────────────────────────────────────

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&CanvasEvent) + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(Some(kind), callback)
    }

    /// Subscribes by wire name such as `"nodeMoved"`. Unknown names return `None`.
    pub fn subscribe_named(
        &mut self,
        name: &str,
        callback: impl FnMut(&CanvasEvent) + 'static,
    ) -> Option<ListenerId> {
        let Some(kind) = EventKind::from_name(name) else {
            log::debug!("no canvas event named {name:?}");
            return None;
        };
        Some(self.listeners.subscribe(Some(kind), callback))
    }

    pub fn subscribe_all(&mut self, callback: impl FnMut(&CanvasEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(None, callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn emit(&mut self, event: CanvasEvent) {
        self.listeners.emit(&event);
    }

    // ── Blocks ──────────────────────────────────────────────────────────

    pub fn add_block(&mut self, spec: NewBlock) -> BlockId {
        let id = self.graph.add_block(spec);
        self.commit();
        id
    }

    pub fn remove_block(&mut self, id: BlockId) -> bool {
        if !self.graph.contains(id) {
            log::debug!("remove ignored: block {id} does not exist");
            return false;
        }
        let gesture_block = match &self.gesture {
            Gesture::Pressing { block, .. } => Some(*block),
            Gesture::Dragging(drag) => Some(drag.block),
            _ => None,
        };
        if gesture_block == Some(id) {
            self.gesture = Gesture::Idle;
            self.stream = None;
            self.surface.hide_snap_preview();
        }
        if self.selected == Some(id) {
            self.deselect();
        }
        if let Err(err) = self.graph.remove_block(id) {
            log::debug!("remove ignored: {err}");
            return false;
        }
        self.commit();
        true
    }

    /// Adds a copy of `id` offset by the configured duplicate offset.
    ///
    /// Only the block itself is copied, not its successors or arm contents.
    pub fn duplicate_block(&mut self, id: BlockId) -> Option<BlockId> {
        let Some(block) = self.graph.get(id) else {
            log::debug!("duplicate ignored: block {id} does not exist");
            return None;
        };
        let offset = self.config.duplicate_offset;
        let spec = NewBlock {
            name: block.name().to_owned(),
            class: block.class().to_owned(),
            position: block.position() + offset,
            data: block.data().clone(),
            html: block.html().to_owned(),
        };
        Some(self.add_block(spec))
    }

    /// Replaces the payload of `id`.
    pub fn update_data(&mut self, id: BlockId, data: Payload) -> bool {
        let Some(block) = self.graph.get_mut(id) else {
            log::debug!("data update ignored: block {id} does not exist");
            return false;
        };
        *block.data_mut() = data.clone();
        self.emit(CanvasEvent::NodeDataChanged { id, data });
        true
    }

    /// Replaces the body markup of `id` and remounts it.
    pub fn update_html(&mut self, id: BlockId, html: impl Into<String>) -> bool {
        let Some(block) = self.graph.get_mut(id) else {
            log::debug!("html update ignored: block {id} does not exist");
            return false;
        };
        block.set_html(html);
        self.mount(id);
        self.request_frame();
        true
    }

    /// Applies an input or change event from an embedded field.
    ///
    /// Numeric fields store a JSON number when `raw` parses as one and the raw
    /// text otherwise.
    pub fn field_changed(&mut self, id: BlockId, key: &str, raw: &str, numeric: bool) -> bool {
        let Some(block) = self.graph.get_mut(id) else {
            log::debug!("field update ignored: block {id} does not exist");
            return false;
        };
        block
            .data_mut()
            .insert(key.to_owned(), coerce_field(raw, numeric));
        let data = block.data().clone();
        self.emit(CanvasEvent::NodeDataChanged { id, data });
        true
    }

    pub fn focus_field(&mut self, id: BlockId, key: impl Into<String>) -> bool {
        if !self.graph.contains(id) {
            log::debug!("focus ignored: block {id} does not exist");
            return false;
        }
        self.focused_field = Some((id, key.into()));
        true
    }

    pub fn blur_field(&mut self) {
        self.focused_field = None;
    }

    /// Selects `id`, unselecting the previous block first.
    pub fn select(&mut self, id: BlockId) -> bool {
        if !self.graph.contains(id) {
            log::debug!("select ignored: block {id} does not exist");
            return false;
        }
        if self.selected == Some(id) {
            return true;
        }
        self.deselect();
        self.selected = Some(id);
        self.surface.set_selected(id, true);
        self.emit(CanvasEvent::NodeSelected(id));
        true
    }

    pub fn deselect(&mut self) {
        if let Some(previous) = self.selected.take() {
            self.surface.set_selected(previous, false);
            self.emit(CanvasEvent::NodeUnselected(previous));
        }
    }

    // ── Connections and topology ────────────────────────────────────────

    pub fn add_connection(&mut self, connection: Connection) -> bool {
        match self.graph.add_connection(connection) {
            Ok(true) => {
                self.commit();
                true
            }
            Ok(false) => false,
            Err(err) => {
                log::debug!("connection ignored: {err}");
                false
            }
        }
    }

    pub fn remove_connection(&mut self, connection: &Connection) -> bool {
        if !self.graph.remove_connection(connection) {
            log::debug!("no connection {connection:?} to remove");
            return false;
        }
        self.commit();
        true
    }

    pub fn detach(&mut self, id: BlockId) -> bool {
        let result = self.graph.detach(id).map(|_| ());
        self.finish_surgery("detach", result)
    }

    pub fn snap_below(&mut self, anchor: BlockId, moving: BlockId) -> bool {
        let result = self.graph.snap_below(anchor, moving);
        self.finish_surgery("snap below", result)
    }

    pub fn snap_into_arm(&mut self, c_block: BlockId, arm: usize, moving: BlockId) -> bool {
        let result = self.graph.snap_into_arm(c_block, arm, moving);
        self.finish_surgery("snap into arm", result)
    }

    fn finish_surgery(
        &mut self,
        what: &str,
        result: Result<(), blockflow_core::GraphError>,
    ) -> bool {
        match result {
            Ok(()) => {
                self.commit();
                true
            }
            Err(err) => {
                log::debug!("{what} rejected: {err}");
                false
            }
        }
    }

    // ── Serialization ───────────────────────────────────────────────────

    pub fn export(&self) -> Value {
        export_value(&self.graph, &self.config.graph_id)
    }

    pub fn export_string(&self) -> String {
        self.export().to_string()
    }

    /// Replaces the canvas contents with a wire-format document.
    ///
    /// A document without a locatable node map leaves the canvas empty.
    pub fn import_value(&mut self, document: &Value) -> ImportReport {
        let decoded = decode_value(document);
        self.finish_import(decoded)
    }

    pub fn import_str(&mut self, text: &str) -> ImportReport {
        let decoded = decode_str(text);
        self.finish_import(decoded)
    }

    fn finish_import(&mut self, decoded: Result<Vec<NodeRecord>, ImportError>) -> ImportReport {
        self.reset_interaction();
        let report = match decoded {
            Ok(records) => {
                let options = ImportOptions {
                    metrics: self.config.metrics,
                    snap_radius: self.config.snap_radius,
                };
                import_records_with(&mut self.graph, &records, &options)
            }
            Err(err) => {
                log::warn!("import rejected, canvas cleared: {err}");
                self.graph.clear();
                ImportReport::default()
            }
        };
        log::debug!("imported {report:?}");
        self.apply_changes(false);
        self.relayout();
        self.request_frame();
        report
    }

    /// Removes every block and connection without emitting removal events.
    pub fn clear(&mut self) {
        self.reset_interaction();
        self.graph.clear();
        self.apply_changes(false);
        self.relayout();
    }

    fn reset_interaction(&mut self) {
        if self.is_dragging() {
            self.surface.hide_snap_preview();
        }
        self.gesture = Gesture::Idle;
        self.stream = None;
        self.touches.clear();
        self.selected = None;
        self.focused_field = None;
    }

    // ── Zoom ────────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> bool {
        let center = self.viewport_center();
        self.step_zoom(1.0, center)
    }

    pub fn zoom_out(&mut self) -> bool {
        let center = self.viewport_center();
        self.step_zoom(-1.0, center)
    }

    pub fn zoom_reset(&mut self) -> bool {
        let center = self.viewport_center();
        self.set_zoom_about(1.0, center)
    }

    /// Sets the zoom, clamped to the configured range, keeping `pivot` fixed.
    pub fn set_zoom_about(&mut self, zoom: f32, pivot: Point) -> bool {
        let zoom = self.config.clamp_zoom(zoom);
        if (zoom - self.viewport.zoom).abs() <= f32::EPSILON {
            return false;
        }
        self.viewport.zoom_about(pivot, zoom);
        self.surface.set_transform(self.viewport.pan, self.viewport.zoom);
        self.emit(CanvasEvent::Zoom(zoom));
        true
    }

    fn step_zoom(&mut self, direction: f32, pivot: Point) -> bool {
        let target = self.viewport.zoom + direction * self.config.zoom_step;
        // Two decimals keeps repeated steps from drifting.
        self.set_zoom_about((target * 100.0).round() / 100.0, pivot)
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0)
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// Routes one pointer event. Returns true when the canvas consumed it.
    pub fn pointer_input(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Down => self.pointer_pressed(event),
            PointerEventKind::Move => self.pointer_moved(event),
            PointerEventKind::Up => self.pointer_released(event),
            PointerEventKind::Cancel => {
                let owned = self.stream == Some(event.id)
                    || matches!(self.gesture, Gesture::Pinching { .. });
                if owned {
                    self.cancel_gesture();
                }
                owned
            }
        }
    }

    fn pointer_pressed(&mut self, event: &PointerEvent) -> bool {
        if event.pointer_type == PointerType::Touch
            && self.touches.press(event.id, event.position) >= 2
        {
            self.begin_pinch();
            return true;
        }
        if !event.is_primary_press() || self.stream.is_some() {
            return false;
        }
        self.stream = Some(event.id);

        let at = self.viewport.to_canvas(event.position);
        let Some(id) = hit_test(&self.graph, &self.layout, at) else {
            self.blur_field();
            self.deselect();
            self.gesture = Gesture::Panning {
                last: event.position,
            };
            return true;
        };

        match &event.affordance {
            Some(Affordance::Delete) => {
                self.stream = None;
                self.remove_block(id);
                return true;
            }
            Some(Affordance::Duplicate) => {
                self.stream = None;
                self.duplicate_block(id);
                return true;
            }
            Some(Affordance::Field { key }) => {
                self.select(id);
                self.focused_field = Some((id, key.clone()));
                self.gesture = Gesture::Idle;
                return true;
            }
            None => {}
        }

        self.blur_field();
        self.select(id);
        let origin = self.graph.get(id).map_or(at, Block::position);
        self.gesture = Gesture::Pressing {
            block: id,
            start: event.position,
            grab: at - origin,
        };
        true
    }

    fn pointer_moved(&mut self, event: &PointerEvent) -> bool {
        if event.pointer_type == PointerType::Touch {
            self.touches.update(event.id, event.position);
            if let Gesture::Pinching {
                start_distance,
                start_zoom,
            } = self.gesture
            {
                if let Some((distance, mid)) = self.touches.pinch() {
                    self.set_zoom_about(start_zoom * distance / start_distance, mid);
                }
                return true;
            }
        }
        if self.stream != Some(event.id) {
            return false;
        }
        let position = event.position;
        self.gesture = match std::mem::take(&mut self.gesture) {
            Gesture::Panning { last } => {
                self.viewport.pan_by(position.x - last.x, position.y - last.y);
                self.surface
                    .set_transform(self.viewport.pan, self.viewport.zoom);
                Gesture::Panning { last: position }
            }
            Gesture::Pressing { block, start, grab } => {
                if start.distance_to(position) > self.config.drag_threshold {
                    self.begin_drag(block, grab, position)
                } else {
                    Gesture::Pressing { block, start, grab }
                }
            }
            Gesture::Dragging(drag) => self.drag_to(drag, position),
            other => other,
        };
        true
    }

    fn pointer_released(&mut self, event: &PointerEvent) -> bool {
        if event.pointer_type == PointerType::Touch {
            self.touches.release(event.id);
            if matches!(self.gesture, Gesture::Pinching { .. }) {
                if self.touches.len() < 2 {
                    self.gesture = Gesture::Idle;
                }
                return true;
            }
        }
        if self.stream != Some(event.id) {
            return false;
        }
        self.stream = None;
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging(drag) => self.finish_drag(drag, event.position),
            // Release without travel is a selection click, already handled on press.
            Gesture::Pressing { .. } | Gesture::Panning { .. } => {}
            Gesture::Idle | Gesture::Pinching { .. } => {}
        }
        true
    }

    /// Aborts the current gesture. A dragged chain goes back where it was.
    pub fn cancel_gesture(&mut self) {
        self.stream = None;
        self.touches.clear();
        if let Gesture::Dragging(drag) = std::mem::take(&mut self.gesture) {
            self.restore_drag(drag);
        }
    }

    /// Mouse wheel zoom about the pointer.
    pub fn on_wheel(&mut self, event: &WheelEvent) -> bool {
        if event.delta_y == 0.0 {
            return false;
        }
        let direction = if event.delta_y < 0.0 { 1.0 } else { -1.0 };
        self.step_zoom(direction, event.position)
    }

    /// Handles canvas shortcuts. Returns false for keys left to the host.
    pub fn on_key_event(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Delete | KeyCode::Backspace => {
                if self.focused_field.is_some() {
                    return false;
                }
                match self.selected {
                    Some(id) => self.remove_block(id),
                    None => false,
                }
            }
            KeyCode::Escape => {
                if self.is_dragging() {
                    self.cancel_gesture();
                    true
                } else if self.focused_field.is_some() {
                    self.blur_field();
                    true
                } else {
                    false
                }
            }
            KeyCode::Other => false,
        }
    }

    fn begin_pinch(&mut self) {
        if let Gesture::Dragging(drag) = std::mem::take(&mut self.gesture) {
            self.restore_drag(drag);
        }
        self.stream = None;
        let Some((distance, _)) = self.touches.pinch() else {
            return;
        };
        self.gesture = Gesture::Pinching {
            start_distance: distance.max(1.0),
            start_zoom: self.viewport.zoom,
        };
    }

    fn begin_drag(&mut self, block: BlockId, grab: Point, position: Point) -> Gesture {
        let Some(restore_position) = self.graph.get(block).map(Block::position) else {
            return Gesture::Idle;
        };
        let restore = match self.graph.detach(block) {
            Ok(anchor) => anchor,
            Err(err) => {
                log::debug!("drag ignored: {err}");
                return Gesture::Idle;
            }
        };
        log::trace!("drag {block} out of {restore:?}");
        self.preview_throttle.reset();
        self.apply_changes(true);
        let drag = Drag {
            block,
            grab,
            restore,
            restore_position,
            preview: None,
        };
        self.drag_to(drag, position)
    }

    fn drag_to(&mut self, mut drag: Drag, position: Point) -> Gesture {
        let origin = self.viewport.to_canvas(position) - drag.grab;
        if let Err(err) = self.graph.set_position(drag.block, origin) {
            log::debug!("drag ended: {err}");
            self.surface.hide_snap_preview();
            return Gesture::Idle;
        }
        self.layout.layout(&mut self.graph);
        if self.preview_throttle.ready() {
            drag.preview = self.snap.find(&self.graph, drag.block);
            self.show_preview(drag.block, drag.preview);
        }
        self.render();
        Gesture::Dragging(drag)
    }

    fn finish_drag(&mut self, drag: Drag, position: Point) {
        let origin = self.viewport.to_canvas(position) - drag.grab;
        if self.graph.set_position(drag.block, origin).is_ok() {
            self.layout.layout(&mut self.graph);
            if let Some(candidate) = self.snap.find(&self.graph, drag.block) {
                log::trace!("drop {} onto {:?}", drag.block, candidate.target);
                if let Err(err) = self.snap.apply(&mut self.graph, candidate.target, drag.block) {
                    log::debug!("drop snap rejected: {err}");
                }
            }
        }
        self.surface.hide_snap_preview();
        self.commit();
        self.emit(CanvasEvent::NodeMoved(drag.block));
    }

    fn restore_drag(&mut self, drag: Drag) {
        self.surface.hide_snap_preview();
        if let Err(err) = self.graph.set_position(drag.block, drag.restore_position) {
            log::debug!("cannot restore drag: {err}");
            return;
        }
        let restored = match drag.restore {
            Anchor::Root => Ok(()),
            Anchor::Below(prev) => self.graph.snap_below(prev, drag.block),
            Anchor::Arm { c_block, arm } => self.graph.snap_into_arm(c_block, arm, drag.block),
        };
        if let Err(err) = restored {
            log::debug!("drag restored as a free stack: {err}");
        }
        self.commit();
    }

    fn show_preview(&mut self, block: BlockId, candidate: Option<SnapCandidate>) {
        match (candidate, self.graph.get(block)) {
            (Some(candidate), Some(dragged)) => {
                let outline = self.layout.outline(dragged);
                self.surface.show_snap_preview(candidate.point, &outline);
            }
            _ => self.surface.hide_snap_preview(),
        }
    }

    // ── Frame and rendering ─────────────────────────────────────────────

    /// Post-mutation pass run from the surface's frame callback.
    ///
    /// Re-measures block bodies and relayouts when any size changed.
    /// Returns true when something moved.
    pub fn frame(&mut self) -> bool {
        self.frame_requested = false;
        let width = self.config.metrics.block_width;
        let changed = measure_content(
            &mut self.graph,
            width,
            &mut SurfaceMeasure(&mut self.surface),
        );
        if changed == 0 {
            return false;
        }
        log::trace!("{changed} block bodies changed size");
        self.relayout();
        true
    }

    /// Drains graph changes into the surface and listeners, then relayouts.
    fn commit(&mut self) {
        self.apply_changes(true);
        self.relayout();
        self.request_frame();
    }

    fn apply_changes(&mut self, notify: bool) {
        let mut changes = Vec::new();
        self.graph.drain_changes(|change| changes.push(change));
        for change in changes {
            let event = match change {
                GraphChange::BlockAdded(id) => {
                    self.mount(id);
                    CanvasEvent::NodeCreated(id)
                }
                GraphChange::BlockRemoved(id) => {
                    self.surface.unmount_block(id);
                    if self.selected == Some(id) {
                        self.selected = None;
                    }
                    if self.focused_field.as_ref().is_some_and(|(field, _)| *field == id) {
                        self.focused_field = None;
                    }
                    CanvasEvent::NodeRemoved(id)
                }
                GraphChange::ConnectionCreated(connection) => {
                    CanvasEvent::ConnectionCreated(connection)
                }
                GraphChange::ConnectionRemoved(connection) => {
                    CanvasEvent::ConnectionRemoved(connection)
                }
            };
            if notify {
                self.emit(event);
            }
        }
    }

    fn mount(&mut self, id: BlockId) {
        if let Some(block) = self.graph.get(id) {
            let body = sanitize_html(block.html());
            self.surface.mount_block(block, &body);
        }
    }

    fn relayout(&mut self) {
        self.layout.layout(&mut self.graph);
        self.render();
    }

    fn render(&mut self) {
        for block in self.graph.blocks() {
            let outline = self.layout.outline(block);
            self.surface
                .place_block(block.id(), block.position(), &outline);
        }
        let curves = self.connection_curves();
        self.surface.draw_connections(&curves);
    }

    /// Curves for every connection that is not a physical snap.
    pub fn connection_curves(&self) -> Vec<ConnectionCurve> {
        self.graph
            .connections()
            .iter()
            .filter(|connection| !self.graph.is_snapped(connection))
            .filter_map(|connection| {
                let source = self.graph.get(connection.source)?;
                let target = self.graph.get(connection.target)?;
                let from = self.output_anchor(source, connection.source_port);
                let to = self.input_anchor(target);
                Some(ConnectionCurve {
                    connection: *connection,
                    path: connection_curve(from, to),
                })
            })
            .collect()
    }

    /// Centre of the tab that a port's connections leave from.
    fn output_anchor(&self, block: &Block, port: u16) -> Point {
        let m = self.layout.metrics();
        let tab_center = m.notch_offset + m.notch_width / 2.0;
        let base = if port == PRIMARY_PORT {
            None
        } else {
            usize::from(port)
                .checked_sub(2)
                .and_then(|arm| self.layout.arm_entry(block, arm))
        };
        base.unwrap_or_else(|| self.layout.below_point(block))
            .offset(tab_center, 0.0)
    }

    fn input_anchor(&self, block: &Block) -> Point {
        let m = self.layout.metrics();
        block
            .position()
            .offset(m.notch_offset + m.notch_width / 2.0, 0.0)
    }

    fn request_frame(&mut self) {
        if !self.frame_requested {
            self.frame_requested = true;
            self.surface.request_frame();
        }
    }
}

/// Payload value for a field edit.
pub(crate) fn coerce_field(raw: &str, numeric: bool) -> Value {
    if numeric {
        if let Ok(number) = raw.trim().parse::<f64>() {
            if number.is_finite() && number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
                return Value::from(number as i64);
            }
            if let Some(number) = serde_json::Number::from_f64(number) {
                return Value::Number(number);
            }
        }
    }
    Value::String(raw.to_owned())
}

#[cfg(test)]
#[path = "tests/canvas_tests.rs"]
mod tests;
