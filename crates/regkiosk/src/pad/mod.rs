//! Signature pad for regkiosk.
//!
//! An Idle/Drawing state machine over an owned raster buffer, independent
//! of any UI toolkit so it can be driven and tested without a real
//! pointer device. Strokes are painted as straight segments between input
//! samples; rendering fidelity is bounded by the input sampling rate.

pub mod pointer;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::error::{Error, Result};

pub use pointer::{Point, PointerEvent, SurfaceFrame};

/// Default brush width in pixels.
pub const DEFAULT_STROKE_WIDTH: u32 = 3;

/// Result of feeding a pointer sample into the pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeUpdate {
    /// Where the sample landed in the surface's local space.
    pub point: Point,
    /// Whether the host must suppress default scroll/pan handling for
    /// the rest of the gesture. True only for touch-style input; mouse
    /// input never requests suppression so ordinary click interactions
    /// elsewhere stay unaffected.
    pub suppress_scroll: bool,
}

/// Stroke state of the pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PadState {
    /// No stroke in progress.
    Idle,
    /// A stroke is in progress, anchored at the last painted point.
    Drawing {
        /// Last painted point of the active stroke.
        last: Point,
    },
}

/// Freehand signature capture surface.
///
/// The raster stores one byte per pixel: 0 for blank, 255 for ink.
#[derive(Debug)]
pub struct SignaturePad {
    frame: SurfaceFrame,
    pixels: Vec<u8>,
    stroke_width: u32,
    state: PadState,
}

impl SignaturePad {
    /// Create a pad fitted to the given frame.
    #[must_use]
    pub fn new(frame: SurfaceFrame, stroke_width: u32) -> Self {
        let mut pad = Self {
            frame,
            pixels: Vec::new(),
            stroke_width: stroke_width.max(1),
            state: PadState::Idle,
        };
        pad.resize(frame);
        pad
    }

    /// Re-fit the pixel buffer to the container's current frame.
    ///
    /// Reallocates the buffer, so all drawn content is discarded and any
    /// in-progress stroke is aborted. Call this before drawing begins and
    /// avoid calling it mid-stroke.
    pub fn resize(&mut self, frame: SurfaceFrame) {
        if matches!(self.state, PadState::Drawing { .. }) {
            debug!("resize during active stroke; aborting stroke");
        }
        self.frame = frame;
        self.pixels = vec![0; frame.width as usize * frame.height as usize];
        self.state = PadState::Idle;
    }

    /// The surface frame the pad is currently fitted to.
    #[must_use]
    pub fn frame(&self) -> SurfaceFrame {
        self.frame
    }

    /// Whether a stroke is currently in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, PadState::Drawing { .. })
    }

    /// Anchor a new stroke at the event's position.
    ///
    /// # Errors
    ///
    /// Returns `StrokeInProgress` when called while a stroke is active.
    pub fn begin_stroke(&mut self, event: &PointerEvent) -> Result<StrokeUpdate> {
        if self.is_drawing() {
            return Err(Error::StrokeInProgress);
        }
        let point = self.frame.local_point(event);
        self.paint_dot(point);
        self.state = PadState::Drawing { last: point };
        Ok(StrokeUpdate {
            point,
            suppress_scroll: event.is_touch(),
        })
    }

    /// Append a straight segment from the last point to the event's
    /// position and paint it immediately.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveStroke` when no stroke is in progress.
    pub fn extend_stroke(&mut self, event: &PointerEvent) -> Result<StrokeUpdate> {
        let PadState::Drawing { last } = self.state else {
            return Err(Error::NoActiveStroke);
        };
        let point = self.frame.local_point(event);
        self.paint_segment(last, point);
        self.state = PadState::Drawing { last: point };
        Ok(StrokeUpdate {
            point,
            suppress_scroll: event.is_touch(),
        })
    }

    /// Finish the active stroke, keeping its content.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveStroke` when no stroke is in progress.
    pub fn end_stroke(&mut self) -> Result<()> {
        if !self.is_drawing() {
            return Err(Error::NoActiveStroke);
        }
        self.state = PadState::Idle;
        Ok(())
    }

    /// Erase all drawn content, leaving the surface blank.
    ///
    /// Callers invoke this outside a stroke.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// True iff the raster is pixel-identical to a freshly cleared
    /// surface of the same dimensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0)
    }

    /// Encode the current raster as an embeddable image string.
    ///
    /// The encoding is a `data:` URL carrying a base64 PGM (P5) snapshot,
    /// ink dark on a white background.
    #[must_use]
    pub fn snapshot(&self) -> String {
        let mut bytes = format!("P5 {} {} 255\n", self.frame.width, self.frame.height).into_bytes();
        bytes.extend(self.pixels.iter().map(|&p| 255 - p));
        format!(
            "data:image/x-portable-graymap;base64,{}",
            STANDARD.encode(bytes)
        )
    }

    /// Paint a straight segment between two local points.
    ///
    /// Standard integer Bresenham; pixels outside the raster are clipped.
    fn paint_segment(&mut self, from: Point, to: Point) {
        let (mut x, mut y) = (from.x, from.y);
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.paint_dot(Point { x, y });
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Paint a square brush dab centered on the point.
    #[allow(clippy::cast_possible_wrap)]
    fn paint_dot(&mut self, center: Point) {
        let radius = (self.stroke_width / 2) as i32;
        let width = self.frame.width as i32;
        let height = self.frame.height as i32;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let (x, y) = (center.x + dx, center.y + dy);
                if x >= 0 && x < width && y >= 0 && y < height {
                    self.pixels[(y * width + x) as usize] = 255;
                }
            }
        }
    }
}
