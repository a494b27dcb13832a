//! Typed lifecycle events and the listener registry.
//!
//! Listeners run synchronously, in subscription order, once the mutation
//! that produced the event has completed.

use blockflow_core::{BlockId, Connection, Payload};

#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    NodeCreated(BlockId),
    NodeRemoved(BlockId),
    NodeSelected(BlockId),
    NodeUnselected(BlockId),
    /// A drag finished; the block may or may not have snapped.
    NodeMoved(BlockId),
    /// Payload after a field edit or an explicit data update.
    NodeDataChanged { id: BlockId, data: Payload },
    ConnectionCreated(Connection),
    ConnectionRemoved(Connection),
    Zoom(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    NodeCreated,
    NodeRemoved,
    NodeSelected,
    NodeUnselected,
    NodeMoved,
    NodeDataChanged,
    ConnectionCreated,
    ConnectionRemoved,
    Zoom,
}

const KIND_NAMES: &[(EventKind, &str)] = &[
    (EventKind::NodeCreated, "nodeCreated"),
    (EventKind::NodeRemoved, "nodeRemoved"),
    (EventKind::NodeSelected, "nodeSelected"),
    (EventKind::NodeUnselected, "nodeUnselected"),
    (EventKind::NodeMoved, "nodeMoved"),
    (EventKind::NodeDataChanged, "nodeDataChanged"),
    (EventKind::ConnectionCreated, "connectionCreated"),
    (EventKind::ConnectionRemoved, "connectionRemoved"),
    (EventKind::Zoom, "zoom"),
];

impl EventKind {
    /// Name hosts use when subscribing by string.
    pub fn name(self) -> &'static str {
        KIND_NAMES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or("", |(_, name)| name)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        KIND_NAMES
            .iter()
            .find(|(_, known)| *known == name)
            .map(|(kind, _)| *kind)
    }
}

impl CanvasEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CanvasEvent::NodeCreated(_) => EventKind::NodeCreated,
            CanvasEvent::NodeRemoved(_) => EventKind::NodeRemoved,
            CanvasEvent::NodeSelected(_) => EventKind::NodeSelected,
            CanvasEvent::NodeUnselected(_) => EventKind::NodeUnselected,
            CanvasEvent::NodeMoved(_) => EventKind::NodeMoved,
            CanvasEvent::NodeDataChanged { .. } => EventKind::NodeDataChanged,
            CanvasEvent::ConnectionCreated(_) => EventKind::ConnectionCreated,
            CanvasEvent::ConnectionRemoved(_) => EventKind::ConnectionRemoved,
            CanvasEvent::Zoom(_) => EventKind::Zoom,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    filter: Option<EventKind>,
    callback: Box<dyn FnMut(&CanvasEvent)>,
}

/// Per-canvas listener registry. Never shared between canvases.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for one kind, or for every event when `filter` is `None`.
    pub fn subscribe(
        &mut self,
        filter: Option<EventKind>,
        callback: impl FnMut(&CanvasEvent) + 'static,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push(Listener {
            id,
            filter,
            callback: Box::new(callback),
        });
        id
    }

    /// Returns false when `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|listener| listener.id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn emit(&mut self, event: &CanvasEvent) {
        let kind = event.kind();
        for listener in &mut self.entries {
            if listener.filter.map_or(true, |filter| filter == kind) {
                (listener.callback)(event);
            }
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn names_round_trip() {
        for (kind, name) in KIND_NAMES {
            assert_eq!(kind.name(), *name);
            assert_eq!(EventKind::from_name(name), Some(*kind));
        }
        assert_eq!(EventKind::from_name("nodeDeleted"), None);
    }

    #[test]
    fn filtered_and_catch_all_listeners() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        let all = Rc::clone(&seen);
        listeners.subscribe(None, move |event| all.borrow_mut().push(("all", event.clone())));
        let zoom = Rc::clone(&seen);
        let zoom_id = listeners.subscribe(Some(EventKind::Zoom), move |event| {
            zoom.borrow_mut().push(("zoom", event.clone()))
        });

        listeners.emit(&CanvasEvent::NodeSelected(3));
        listeners.emit(&CanvasEvent::Zoom(1.5));
        assert_eq!(
            *seen.borrow(),
            vec![
                ("all", CanvasEvent::NodeSelected(3)),
                ("all", CanvasEvent::Zoom(1.5)),
                ("zoom", CanvasEvent::Zoom(1.5)),
            ]
        );

        assert!(listeners.unsubscribe(zoom_id));
        assert!(!listeners.unsubscribe(zoom_id));
        seen.borrow_mut().clear();
        listeners.emit(&CanvasEvent::Zoom(1.0));
        assert_eq!(seen.borrow().len(), 1);
    }
}
