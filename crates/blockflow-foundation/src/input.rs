use blockflow_graphics::Point;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Device that produced a pointer event. Single-finger touch drives the
/// canvas exactly like the primary mouse button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary = 0,
    Secondary = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);

    pub fn with(self, button: PointerButton) -> Self {
        Self(self.0 | 1 << (button as u8))
    }

    pub fn contains(&self, button: PointerButton) -> bool {
        (self.0 & (1 << (button as u8))) != 0
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

/// Control inside a block body that the surface reported under the pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Affordance {
    Delete,
    Duplicate,
    /// An embedded input field bound to `key` in the block payload.
    Field { key: String },
}

/// Pointer event in screen coordinates relative to the canvas container.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub pointer_type: PointerType,
    pub position: Point,
    pub buttons: PointerButtons,
    pub affordance: Option<Affordance>,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            id: 0,
            kind,
            pointer_type: PointerType::Mouse,
            position,
            buttons: match kind {
                PointerEventKind::Down | PointerEventKind::Move => PointerButtons::PRIMARY,
                PointerEventKind::Up | PointerEventKind::Cancel => PointerButtons::NONE,
            },
            affordance: None,
        }
    }

    pub fn touch(kind: PointerEventKind, position: Point) -> Self {
        Self {
            pointer_type: PointerType::Touch,
            buttons: PointerButtons::NONE,
            ..Self::new(kind, position)
        }
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }

    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn on_affordance(mut self, affordance: Affordance) -> Self {
        self.affordance = Some(affordance);
        self
    }

    /// True for presses the canvas reacts to: primary button or a touch.
    pub fn is_primary_press(&self) -> bool {
        self.kind == PointerEventKind::Down
            && (self.pointer_type == PointerType::Touch
                || self.buttons.contains(PointerButton::Primary))
    }
}

/// Mouse wheel or trackpad scroll. Negative `delta_y` zooms in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    pub position: Point,
    pub delta_y: f32,
}

impl WheelEvent {
    pub fn new(position: Point, delta_y: f32) -> Self {
        Self { position, delta_y }
    }
}

/// Keys the canvas handles itself; everything else is left to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Delete,
    Backspace,
    Escape,
    Other,
}
