//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and pen events into a unified `InputEvent`
//! enum before any gesture logic sees them. Coordinates are client-space
//! CSS pixels.

use sm_core::Point;

/// Stable identifier of one contact for the duration of a gesture.
/// Matches the DOM `pointerId`; mice usually report 1.
pub type PointerId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Parse the DOM `pointerType` string. Unknown types count as mouse.
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }
}

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Contact started (mouse button down, touch start, pen contact).
    PointerDown {
        id: PointerId,
        kind: PointerKind,
        point: Point,
    },

    PointerMove { id: PointerId, point: Point },

    /// Contact ended normally.
    PointerUp { id: PointerId, point: Point },

    /// Contact lost (browser took over, window blurred). Never produces a tap.
    PointerCancel { id: PointerId },

    /// Mouse wheel or trackpad scroll. Positive `delta_y` scrolls down.
    Wheel { point: Point, delta_y: f64 },
}

impl InputEvent {
    pub fn down(id: PointerId, kind: PointerKind, x: f64, y: f64) -> Self {
        Self::PointerDown {
            id,
            kind,
            point: Point::new(x, y),
        }
    }

    pub fn moved(id: PointerId, x: f64, y: f64) -> Self {
        Self::PointerMove {
            id,
            point: Point::new(x, y),
        }
    }

    pub fn up(id: PointerId, x: f64, y: f64) -> Self {
        Self::PointerUp {
            id,
            point: Point::new(x, y),
        }
    }

    pub fn wheel(x: f64, y: f64, delta_y: f64) -> Self {
        Self::Wheel {
            point: Point::new(x, y),
            delta_y,
        }
    }

    /// Extract position if the event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { point, .. }
            | Self::PointerMove { point, .. }
            | Self::PointerUp { point, .. }
            | Self::Wheel { point, .. } => Some(*point),
            Self::PointerCancel { .. } => None,
        }
    }
}
