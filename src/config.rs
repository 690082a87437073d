use serde::Serialize;

use crate::geometry::{OverlayDimensions, Rect};

pub const OVERLAY_WINDOW_LABEL: &str = "overlay";
pub const CONTENT_WEBVIEW_LABEL: &str = "overlay-content";
pub const CONTENT_ENTRY: &str = "index.html";

pub const OVERLAY_WIDTH: f64 = 420.0;
pub const OVERLAY_HEIGHT: f64 = 640.0;
pub const OVERLAY_MARGIN: f64 = 24.0;

pub const CORNER_RADIUS: f64 = 16.0;
pub const BORDER_WIDTH: f64 = 0.5;
pub const BORDER_WHITE: f64 = 1.0;
pub const BORDER_ALPHA: f64 = 0.08;

/// Substituted whenever the main display cannot be queried.
pub const FALLBACK_DISPLAY: Rect = Rect::new(0.0, 0.0, 1440.0, 900.0);

pub const OVERLAY_DIMENSIONS: OverlayDimensions = OverlayDimensions {
    width: OVERLAY_WIDTH,
    height: OVERLAY_HEIGHT,
};

/// Read-only view of the design constants, served to the hosted UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub corner_radius: f64,
    pub border_width: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width: OVERLAY_WIDTH,
            height: OVERLAY_HEIGHT,
            margin: OVERLAY_MARGIN,
            corner_radius: CORNER_RADIUS,
            border_width: BORDER_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serializes_camel_case() {
        let value = serde_json::to_value(OverlayConfig::default()).expect("serialize config");
        assert_eq!(value["width"], 420.0);
        assert_eq!(value["height"], 640.0);
        assert_eq!(value["cornerRadius"], 16.0);
        assert_eq!(value["borderWidth"], 0.5);
    }
}
