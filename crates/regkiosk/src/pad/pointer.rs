//! Pointer input mapping for the signature pad.
//!
//! Mouse-style and touch-style events are folded into one event type so
//! both map into the same local coordinate space: the raw device
//! coordinate minus the drawing surface's top-left screen offset.

/// A point in the surface's local pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Horizontal pixel offset from the surface's left edge.
    pub x: i32,
    /// Vertical pixel offset from the surface's top edge.
    pub y: i32,
}

/// The drawing surface's on-screen placement and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFrame {
    /// Screen coordinate of the surface's left edge.
    pub left: f64,
    /// Screen coordinate of the surface's top edge.
    pub top: f64,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
}

impl SurfaceFrame {
    /// A frame anchored at the screen origin.
    #[must_use]
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Map a pointer event into this frame's local space.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn local_point(&self, event: &PointerEvent) -> Point {
        let (client_x, client_y) = event.client_position();
        Point {
            x: (client_x - self.left).round() as i32,
            y: (client_y - self.top).round() as i32,
        }
    }
}

/// A single pointer input sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Mouse-style input.
    Mouse {
        /// Raw horizontal device coordinate.
        client_x: f64,
        /// Raw vertical device coordinate.
        client_y: f64,
    },
    /// Touch-style input, already reduced to the primary touch point.
    Touch {
        /// Raw horizontal device coordinate.
        client_x: f64,
        /// Raw vertical device coordinate.
        client_y: f64,
    },
}

impl PointerEvent {
    /// A mouse event at the given device coordinate.
    #[must_use]
    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        Self::Mouse { client_x, client_y }
    }

    /// A touch event from a set of active touch points.
    ///
    /// The primary (first) touch point wins when several are present.
    /// Returns `None` for an empty set, which carries no position.
    #[must_use]
    pub fn touch(points: &[(f64, f64)]) -> Option<Self> {
        points.first().map(|&(client_x, client_y)| Self::Touch {
            client_x,
            client_y,
        })
    }

    /// The raw device coordinate of this event.
    #[must_use]
    pub fn client_position(&self) -> (f64, f64) {
        match *self {
            Self::Mouse { client_x, client_y } | Self::Touch { client_x, client_y } => {
                (client_x, client_y)
            }
        }
    }

    /// Whether this event came from touch-style input.
    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(self, Self::Touch { .. })
    }
}
