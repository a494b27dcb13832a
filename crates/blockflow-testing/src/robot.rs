//! Robot-style driver for canvas tests
//!
//! [`CanvasRobot`] owns a [`Canvas`] over a [`RecordingSurface`] and
//! performs interactions the way a user would: press, move in steps,
//! release, wheel, pinch and key presses. Every lifecycle event the canvas
//! emits is captured for assertions.
//!
//! # Example
//!
//! ```
//! use blockflow_testing::CanvasRobot;
//!
//! let mut robot = CanvasRobot::new();
//! let start = robot.add("start", 40.0, 40.0);
//! let step = robot.add("llm_call", 400.0, 300.0);
//! robot.drag_block_to(step, 40.0, 92.0);
//! assert_eq!(robot.graph().get(start).unwrap().next(), Some(step));
//! ```

use crate::recording_surface::RecordingSurface;
use blockflow_canvas::{Canvas, CanvasConfig, CanvasEvent, RenderSurface};
use blockflow_core::{BlockGraph, BlockId, NewBlock};
use blockflow_foundation::{Affordance, KeyCode, PointerEvent, PointerEventKind, WheelEvent};
use blockflow_graphics::Point;
use std::cell::RefCell;
use std::rc::Rc;

/// Steps used to interpolate a drag, so throttled previews get a chance to run.
pub const DRAG_STEPS: usize = 10;

/// Where a robot grabs a block, relative to its origin.
const GRAB_OFFSET: Point = Point::new(10.0, 10.0);

/// Programmatic user driving a canvas.
pub struct CanvasRobot<S = RecordingSurface>
where
    S: RenderSurface,
{
    canvas: Canvas<S>,
    events: Rc<RefCell<Vec<CanvasEvent>>>,
    cursor: Point,
}

impl CanvasRobot<RecordingSurface> {
    /// Robot over a fresh recording surface with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    pub fn with_config(config: CanvasConfig) -> Self {
        Self::with_surface(RecordingSurface::new(), config)
    }
}

impl Default for CanvasRobot<RecordingSurface> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CanvasRobot<S>
where
    S: RenderSurface,
{
    pub fn with_surface(surface: S, config: CanvasConfig) -> Self {
        let mut canvas = Canvas::new(surface, config);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        canvas.subscribe_all(move |event| sink.borrow_mut().push(event.clone()));
        Self {
            canvas,
            events,
            cursor: Point::ZERO,
        }
    }

    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas<S> {
        &mut self.canvas
    }

    pub fn graph(&self) -> &BlockGraph {
        self.canvas.graph()
    }

    pub fn surface(&self) -> &S {
        self.canvas.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.canvas.surface_mut()
    }

    /// Adds a block of type `name` with its origin at canvas `(x, y)`.
    pub fn add(&mut self, name: &str, x: f32, y: f32) -> BlockId {
        let id = self.canvas.add_block(NewBlock::new(name).at(x, y));
        self.wait_for_idle();
        id
    }

    /// Runs pending frames until the canvas stops asking for one.
    pub fn wait_for_idle(&mut self) {
        for _ in 0..10 {
            if !self.canvas.needs_frame() {
                break;
            }
            self.canvas.frame();
        }
    }

    // ── Events ──────────────────────────────────────────────────────────

    pub fn events(&self) -> Vec<CanvasEvent> {
        self.events.borrow().clone()
    }

    /// Returns and forgets every event captured so far.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Wire names of the captured events, e.g. `["nodeSelected", "nodeMoved"]`.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events
            .borrow()
            .iter()
            .map(|event| event.kind().name())
            .collect()
    }

    // ── Pointer ─────────────────────────────────────────────────────────

    pub fn press_at(&mut self, x: f32, y: f32) -> bool {
        self.cursor = Point::new(x, y);
        self.send(PointerEvent::new(PointerEventKind::Down, self.cursor))
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> bool {
        self.cursor = Point::new(x, y);
        self.send(PointerEvent::new(PointerEventKind::Move, self.cursor))
    }

    pub fn release(&mut self) -> bool {
        let consumed = self.send(PointerEvent::new(PointerEventKind::Up, self.cursor));
        self.wait_for_idle();
        consumed
    }

    pub fn click_at(&mut self, x: f32, y: f32) -> bool {
        let consumed = self.press_at(x, y);
        self.release();
        consumed
    }

    /// Press on an affordance inside a block body, then release.
    pub fn click_affordance(&mut self, x: f32, y: f32, affordance: Affordance) -> bool {
        self.cursor = Point::new(x, y);
        let press = PointerEvent::new(PointerEventKind::Down, self.cursor).on_affordance(affordance);
        let consumed = self.send(press);
        self.release();
        consumed
    }

    /// Press, move in [`DRAG_STEPS`] steps, release.
    pub fn drag(&mut self, from: Point, to: Point) {
        self.press_at(from.x, from.y);
        self.move_in_steps(from, to);
        self.release();
    }

    /// Press and move, but keep the button down.
    pub fn drag_and_hold(&mut self, from: Point, to: Point) {
        self.press_at(from.x, from.y);
        self.move_in_steps(from, to);
    }

    fn move_in_steps(&mut self, from: Point, to: Point) {
        for i in 1..=DRAG_STEPS {
            let t = i as f32 / DRAG_STEPS as f32;
            self.move_to(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        }
    }

    /// Drags `id` so that its origin ends at canvas `(x, y)`.
    pub fn drag_block_to(&mut self, id: BlockId, x: f32, y: f32) {
        let Some(from) = self.grab_point(id) else {
            log::warn!("cannot drag unknown block {id}");
            return;
        };
        let to = self.screen_point(Point::new(x, y) + GRAB_OFFSET);
        self.drag(from, to);
    }

    /// Screen point a robot presses to grab `id`.
    pub fn grab_point(&self, id: BlockId) -> Option<Point> {
        let origin = self.graph().get(id)?.position();
        Some(self.screen_point(origin + GRAB_OFFSET))
    }

    pub fn screen_point(&self, canvas: Point) -> Point {
        self.canvas.viewport().to_screen(canvas)
    }

    // ── Touch ───────────────────────────────────────────────────────────

    pub fn touch_down(&mut self, finger: u64, x: f32, y: f32) -> bool {
        self.send(PointerEvent::touch(PointerEventKind::Down, Point::new(x, y)).with_id(finger))
    }

    pub fn touch_move(&mut self, finger: u64, x: f32, y: f32) -> bool {
        self.send(PointerEvent::touch(PointerEventKind::Move, Point::new(x, y)).with_id(finger))
    }

    pub fn touch_up(&mut self, finger: u64, x: f32, y: f32) -> bool {
        let consumed =
            self.send(PointerEvent::touch(PointerEventKind::Up, Point::new(x, y)).with_id(finger));
        self.wait_for_idle();
        consumed
    }

    /// Two-finger horizontal pinch about `center`, from one spread to another.
    pub fn pinch(&mut self, center: Point, from_spread: f32, to_spread: f32) {
        let half = from_spread / 2.0;
        self.touch_down(1, center.x - half, center.y);
        self.touch_down(2, center.x + half, center.y);
        for i in 1..=DRAG_STEPS {
            let t = i as f32 / DRAG_STEPS as f32;
            let half = (from_spread + (to_spread - from_spread) * t) / 2.0;
            self.touch_move(1, center.x - half, center.y);
            self.touch_move(2, center.x + half, center.y);
        }
        let half = to_spread / 2.0;
        self.touch_up(1, center.x - half, center.y);
        self.touch_up(2, center.x + half, center.y);
    }

    // ── Wheel and keys ──────────────────────────────────────────────────

    pub fn wheel(&mut self, x: f32, y: f32, delta_y: f32) -> bool {
        self.canvas
            .on_wheel(&WheelEvent::new(Point::new(x, y), delta_y))
    }

    pub fn key(&mut self, key: KeyCode) -> bool {
        let consumed = self.canvas.on_key_event(key);
        self.wait_for_idle();
        consumed
    }

    fn send(&mut self, event: PointerEvent) -> bool {
        self.canvas.pointer_input(&event)
    }
}
