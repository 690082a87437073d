//! Overlay placement against the usable area of a display.
//!
//! All rects use a bottom-left origin with y growing upward. Backends with a
//! top-left native space convert through [`Rect::flipped_within`].

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::config::FALLBACK_DISPLAY;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Mirrors the rect vertically inside `display`, converting between
    /// y-up and y-down coordinate spaces. Applying it twice is the identity.
    pub fn flipped_within(&self, display: &Rect) -> Rect {
        Rect {
            y: display.y + (display.max_y() - self.max_y()),
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayDimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("display geometry unavailable")]
pub struct DisplayUnavailable;

/// Turns a display query into usable bounds, substituting the fallback
/// display when the query failed or returned an empty area.
///
/// Returns the bounds and whether the fallback was used.
pub fn resolve_display_bounds(queried: Result<Rect, DisplayUnavailable>) -> (Rect, bool) {
    match queried {
        Ok(bounds) if !bounds.is_degenerate() => (bounds, false),
        Ok(bounds) => {
            warn!(?bounds, "display bounds are degenerate, using fallback display");
            (FALLBACK_DISPLAY, true)
        }
        Err(err) => {
            warn!("{err}, using fallback display");
            (FALLBACK_DISPLAY, true)
        }
    }
}

/// Places an overlay of `dims` in the top-right corner of `display`, inset
/// by `margin` from both the top and right edges.
///
/// On displays too small to hold the overlay plus margins the origin is
/// clamped so the frame never starts left of or below the display origin.
pub fn anchored_frame(display: &Rect, dims: &OverlayDimensions, margin: f64) -> Rect {
    let x = display.max_x() - dims.width - margin;
    let y = display.max_y() - dims.height - margin;

    Rect::new(x.max(display.x), y.max(display.y), dims.width, dims.height)
}
