use super::*;
use blockflow_foundation::{PointerButton, PointerButtons};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct Probe {
    bodies: HashMap<BlockId, String>,
    placed: HashMap<BlockId, Point>,
    selected: Vec<(BlockId, bool)>,
    transform: Option<(Point, f32)>,
    curves: Vec<ConnectionCurve>,
    preview: Option<Point>,
    frames: usize,
    sizes: HashMap<BlockId, Size>,
}

impl RenderSurface for Probe {
    fn mount_block(&mut self, block: &Block, body: &str) {
        self.bodies.insert(block.id(), body.to_owned());
    }

    fn unmount_block(&mut self, id: BlockId) {
        self.bodies.remove(&id);
        self.placed.remove(&id);
    }

    fn place_block(&mut self, id: BlockId, origin: Point, _outline: &blockflow_graphics::Path) {
        self.placed.insert(id, origin);
    }

    fn measure_content(&mut self, id: BlockId, _width: f32) -> Option<Size> {
        self.sizes.get(&id).copied()
    }

    fn set_selected(&mut self, id: BlockId, selected: bool) {
        self.selected.push((id, selected));
    }

    fn set_transform(&mut self, pan: Point, zoom: f32) {
        self.transform = Some((pan, zoom));
    }

    fn draw_connections(&mut self, curves: &[ConnectionCurve]) {
        self.curves = curves.to_vec();
    }

    fn show_snap_preview(&mut self, origin: Point, _outline: &blockflow_graphics::Path) {
        self.preview = Some(origin);
    }

    fn hide_snap_preview(&mut self) {
        self.preview = None;
    }

    fn request_frame(&mut self) {
        self.frames += 1;
    }
}

fn canvas() -> (Canvas<Probe>, Rc<RefCell<Vec<CanvasEvent>>>) {
    let mut canvas = Canvas::new(Probe::default(), CanvasConfig::default());
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    canvas.subscribe_all(move |event| sink.borrow_mut().push(event.clone()));
    (canvas, log)
}

fn press(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(PointerEventKind::Down, Point::new(x, y))
}

fn moved(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(PointerEventKind::Move, Point::new(x, y))
}

fn release(x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(PointerEventKind::Up, Point::new(x, y))
}

#[test]
fn add_mounts_sanitized_body_and_emits_created() {
    let (mut canvas, log) = canvas();
    let id = canvas.add_block(
        NewBlock::new("llm_call")
            .at(10.0, 10.0)
            .with_html("<p onclick=\"x()\">hi</p><script>bad()</script>"),
    );
    assert_eq!(canvas.surface().bodies[&id], "<p>hi</p>");
    assert_eq!(canvas.surface().placed[&id], Point::new(10.0, 10.0));
    assert_eq!(*log.borrow(), vec![CanvasEvent::NodeCreated(id)]);
    assert!(canvas.needs_frame());
    assert_eq!(canvas.surface().frames, 1);
}

#[test]
fn unknown_ids_are_ignored() {
    let (mut canvas, log) = canvas();
    assert!(!canvas.remove_block(42));
    assert!(!canvas.update_data(42, Payload::new()));
    assert!(!canvas.update_html(42, "<b>x</b>"));
    assert!(!canvas.field_changed(42, "k", "1", true));
    assert!(!canvas.snap_below(1, 2));
    assert!(!canvas.add_connection(Connection::stack(1, 2)));
    assert!(!canvas.select(42));
    assert_eq!(canvas.duplicate_block(42), None);
    assert!(log.borrow().is_empty());
}

#[test]
fn removing_the_selection_unselects_first() {
    let (mut canvas, log) = canvas();
    let a = canvas.add_block(NewBlock::new("a"));
    let b = canvas.add_block(NewBlock::new("b"));
    canvas.snap_below(a, b);
    canvas.select(b);
    log.borrow_mut().clear();

    assert!(canvas.remove_block(b));
    assert_eq!(
        *log.borrow(),
        vec![
            CanvasEvent::NodeUnselected(b),
            CanvasEvent::ConnectionRemoved(Connection::stack(a, b)),
            CanvasEvent::NodeRemoved(b),
        ]
    );
    assert_eq!(canvas.selected(), None);
    assert!(!canvas.surface().bodies.contains_key(&b));
}

#[test]
fn reselecting_emits_unselect_before_select() {
    let (mut canvas, log) = canvas();
    let a = canvas.add_block(NewBlock::new("a"));
    let b = canvas.add_block(NewBlock::new("b").at(400.0, 0.0));
    log.borrow_mut().clear();

    canvas.select(a);
    canvas.select(a);
    canvas.select(b);
    assert_eq!(
        *log.borrow(),
        vec![
            CanvasEvent::NodeSelected(a),
            CanvasEvent::NodeUnselected(a),
            CanvasEvent::NodeSelected(b),
        ]
    );
    assert_eq!(
        canvas.surface().selected,
        vec![(a, true), (a, false), (b, true)]
    );
}

#[test]
fn press_in_an_empty_arm_falls_through_to_the_canvas() {
    let (mut canvas, _) = canvas();
    let c = canvas.add_block(NewBlock::new("if"));
    // Head is 52 tall; the empty cavity spans y 52..84 from x 16.
    assert_eq!(canvas.block_at(Point::new(100.0, 20.0)), Some(c));
    assert_eq!(canvas.block_at(Point::new(100.0, 70.0)), None);
    assert_eq!(canvas.block_at(Point::new(8.0, 70.0)), Some(c));
    assert_eq!(canvas.block_at(Point::new(100.0, 95.0)), Some(c));

    let child = canvas.add_block(NewBlock::new("log"));
    canvas.snap_into_arm(c, 0, child);
    assert_eq!(canvas.block_at(Point::new(100.0, 70.0)), Some(child));
}

#[test]
fn panning_moves_the_transform() {
    let (mut canvas, log) = canvas();
    assert!(canvas.pointer_input(&press(500.0, 500.0)));
    assert!(canvas.is_panning());
    canvas.pointer_input(&moved(520.0, 490.0));
    canvas.pointer_input(&moved(530.0, 480.0));
    canvas.pointer_input(&release(530.0, 480.0));
    assert!(!canvas.is_panning());
    assert_eq!(canvas.viewport().pan, Point::new(30.0, -20.0));
    assert_eq!(
        canvas.surface().transform,
        Some((Point::new(30.0, -20.0), 1.0))
    );
    assert!(log.borrow().is_empty());
}

#[test]
fn only_primary_presses_start_gestures() {
    let (mut canvas, log) = canvas();
    let a = canvas.add_block(NewBlock::new("a"));
    log.borrow_mut().clear();

    let secondary = PointerButtons::NONE.with(PointerButton::Secondary);
    assert!(!canvas.pointer_input(&press(20.0, 20.0).with_buttons(secondary)));
    assert!(!canvas.pointer_input(&press(500.0, 500.0).with_buttons(secondary)));
    assert_eq!(canvas.selected(), None);
    assert!(!canvas.is_panning());
    assert!(log.borrow().is_empty());

    let chord = secondary.with(PointerButton::Primary);
    assert!(canvas.pointer_input(&press(20.0, 20.0).with_buttons(chord)));
    assert_eq!(canvas.selected(), Some(a));
}

#[test]
fn wheel_zoom_is_clamped_and_reported() {
    let (mut canvas, log) = canvas();
    let pivot = Point::new(200.0, 100.0);
    assert!(canvas.on_wheel(&WheelEvent::new(pivot, -120.0)));
    assert!((canvas.zoom() - 1.1).abs() < 1e-6);
    let anchored = canvas.to_canvas(pivot);
    assert!((anchored.x - 200.0).abs() < 1e-3 && (anchored.y - 100.0).abs() < 1e-3);

    for _ in 0..40 {
        canvas.on_wheel(&WheelEvent::new(pivot, -120.0));
    }
    assert_eq!(canvas.zoom(), 2.5);
    assert!(!canvas.on_wheel(&WheelEvent::new(pivot, -120.0)));

    for _ in 0..40 {
        canvas.on_wheel(&WheelEvent::new(pivot, 120.0));
    }
    assert_eq!(canvas.zoom(), 0.25);
    assert!(matches!(log.borrow().last(), Some(CanvasEvent::Zoom(z)) if *z == 0.25));
    assert!(!canvas.on_wheel(&WheelEvent::new(pivot, 0.0)));
}

#[test]
fn zoom_buttons_step_about_the_center() {
    let (mut canvas, _) = canvas();
    canvas.set_viewport_size(400.0, 300.0);
    assert!(canvas.zoom_in());
    assert!(canvas.zoom_in());
    assert!((canvas.zoom() - 1.2).abs() < 1e-6);
    let center = canvas.to_canvas(Point::new(200.0, 150.0));
    assert!((center.x - 200.0).abs() < 1e-3);
    assert!(canvas.zoom_out());
    assert!(canvas.zoom_reset());
    assert_eq!(canvas.zoom(), 1.0);
    assert!(!canvas.zoom_reset());
}

#[test]
fn numeric_fields_are_coerced() {
    assert_eq!(coerce_field("42", true), serde_json::json!(42));
    assert_eq!(coerce_field(" 0.5 ", true), serde_json::json!(0.5));
    assert_eq!(coerce_field("abc", true), serde_json::json!("abc"));
    assert_eq!(coerce_field("42", false), serde_json::json!("42"));
    assert_eq!(coerce_field("inf", true), serde_json::json!("inf"));
}

#[test]
fn field_edits_update_payload_and_notify() {
    let (mut canvas, log) = canvas();
    let id = canvas.add_block(NewBlock::new("http_request"));
    log.borrow_mut().clear();
    assert!(canvas.field_changed(id, "timeout", "30", true));
    assert_eq!(canvas.graph().get(id).unwrap().data()["timeout"], 30);
    match log.borrow().as_slice() {
        [CanvasEvent::NodeDataChanged { id: changed, data }] => {
            assert_eq!(*changed, id);
            assert_eq!(data["timeout"], 30);
        }
        other => panic!("unexpected events {other:?}"),
    };
}

#[test]
fn frame_applies_measured_sizes() {
    let (mut canvas, _) = canvas();
    let a = canvas.add_block(NewBlock::new("a"));
    let b = canvas.add_block(NewBlock::new("b"));
    canvas.snap_below(a, b);
    assert_eq!(canvas.surface().placed[&b], Point::new(0.0, 52.0));

    canvas
        .surface_mut()
        .sizes
        .insert(a, Size::new(240.0, 100.0));
    assert!(canvas.frame());
    assert!(!canvas.needs_frame());
    assert_eq!(canvas.surface().placed[&b], Point::new(0.0, 128.0));
    assert!(!canvas.frame());
}

#[test]
fn unsnapped_connections_are_drawn() {
    let (mut canvas, _) = canvas();
    let a = canvas.add_block(NewBlock::new("a"));
    let b = canvas.add_block(NewBlock::new("b").at(400.0, 200.0));
    canvas.add_connection(Connection::stack(a, b));
    let curves = &canvas.surface().curves;
    assert_eq!(curves.len(), 1);
    let bounds = curves[0].path.bounds().unwrap();
    assert_eq!(bounds.origin(), Point::new(28.0, 52.0));

    canvas.snap_below(a, b);
    assert!(canvas.surface().curves.is_empty());
}

#[test]
fn failed_import_leaves_an_empty_canvas() {
    let (mut canvas, log) = canvas();
    let a = canvas.add_block(NewBlock::new("a"));
    log.borrow_mut().clear();
    let report = canvas.import_str("{\"version\": 2}");
    assert_eq!(report, ImportReport::default());
    assert!(canvas.graph().is_empty());
    assert!(!canvas.surface().bodies.contains_key(&a));
    assert!(log.borrow().is_empty());
}

#[test]
fn canvases_do_not_share_state() {
    let (mut first, _) = canvas();
    let (mut second, second_log) = canvas();
    first.add_block(NewBlock::new("a"));
    first.add_block(NewBlock::new("b"));
    assert_eq!(second.add_block(NewBlock::new("c")), 1);
    assert_eq!(second_log.borrow().len(), 1);
}
