//! Input events delivered to the interaction core and the listener registry
//! that gates them.

use bevy::math::Vec2;

use crate::types::PlanetData;

/// Where a listener is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// The pointer-input surface the scene is drawn on.
    Surface,
    /// Document-wide keyboard and UI bus events.
    Document,
    /// Window-level events.
    Window,
}

/// Kinds of events the interaction core listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEventKind {
    PointerMove,
    Click,
    TouchStart,
    TouchEnd,
    PointerLeave,
    KeyDown,
    Resize,
    ShowPlanetInfo,
    HidePlanetInfo,
}

impl InputEventKind {
    pub fn target(self) -> ListenerTarget {
        match self {
            InputEventKind::PointerMove
            | InputEventKind::Click
            | InputEventKind::TouchStart
            | InputEventKind::TouchEnd
            | InputEventKind::PointerLeave => ListenerTarget::Surface,
            InputEventKind::KeyDown
            | InputEventKind::ShowPlanetInfo
            | InputEventKind::HidePlanetInfo => ListenerTarget::Document,
            InputEventKind::Resize => ListenerTarget::Window,
        }
    }
}

/// Every event kind registered during initialization, in registration order.
pub const LISTENED_EVENTS: [InputEventKind; 9] = [
    InputEventKind::PointerMove,
    InputEventKind::Click,
    InputEventKind::TouchStart,
    InputEventKind::TouchEnd,
    InputEventKind::PointerLeave,
    InputEventKind::KeyDown,
    InputEventKind::ShowPlanetInfo,
    InputEventKind::HidePlanetInfo,
    InputEventKind::Resize,
];

/// Keys the core reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    KeyI,
    Other,
}

/// A single input event in client (pixel) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerMove {
        position: Vec2,
    },
    Click {
        position: Vec2,
        timestamp_ms: f64,
    },
    TouchStart {
        position: Vec2,
        touch_count: usize,
    },
    TouchEnd {
        position: Vec2,
        touch_count: usize,
    },
    PointerLeave,
    KeyDown(Key),
    Resize,
    ShowPlanetInfo(PlanetData),
    HidePlanetInfo,
}

impl InputEvent {
    pub fn kind(&self) -> InputEventKind {
        match self {
            InputEvent::PointerMove { .. } => InputEventKind::PointerMove,
            InputEvent::Click { .. } => InputEventKind::Click,
            InputEvent::TouchStart { .. } => InputEventKind::TouchStart,
            InputEvent::TouchEnd { .. } => InputEventKind::TouchEnd,
            InputEvent::PointerLeave => InputEventKind::PointerLeave,
            InputEvent::KeyDown(_) => InputEventKind::KeyDown,
            InputEvent::Resize => InputEventKind::Resize,
            InputEvent::ShowPlanetInfo(_) => InputEventKind::ShowPlanetInfo,
            InputEvent::HidePlanetInfo => InputEventKind::HidePlanetInfo,
        }
    }
}

/// Identifier handed out by a pointer surface for an attached listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A listener attached during initialization, kept for cleanup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerRegistration {
    pub target: ListenerTarget,
    pub kind: InputEventKind,
    pub id: ListenerId,
}

/// Attached listeners. Every entry is removed exactly once on drain.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: Vec<ListenerRegistration>,
}

impl ListenerRegistry {
    pub fn record(&mut self, registration: ListenerRegistration) {
        self.entries.push(registration);
    }

    pub fn is_registered(&self, kind: InputEventKind) -> bool {
        self.entries.iter().any(|r| r.kind == kind)
    }

    /// Remove and return every registration.
    pub fn drain(&mut self) -> Vec<ListenerRegistration> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListenerRegistration> {
        self.entries.iter()
    }
}
