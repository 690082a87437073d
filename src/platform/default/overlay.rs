//! Cross-platform backend built on Tauri's window API.
//!
//! Tauri reports geometry with a top-left origin; rects are flipped within
//! the monitor work area to match the y-up space the placement math uses.

use crate::chrome::ChromeTarget;
use crate::compositing::{BlurLayer, CompositingTarget, ContentClip};
use crate::config::FALLBACK_DISPLAY;
use crate::geometry::{DisplayUnavailable, Rect};
use crate::platform::overlay::{attach_webview, WebviewSurface};
use crate::policy::{PolicyTarget, StackingLevel};
use crate::sequencer::OverlayWindow;
use crate::AppRuntime;
use anyhow::{Context, Result};
use tauri::window::{Color, Effect, EffectState, EffectsBuilder};
use tauri::{LogicalPosition, LogicalSize, Window};
use tracing::debug;

pub struct TauriOverlayWindow {
    window: Window<AppRuntime>,
}

impl TauriOverlayWindow {
    pub fn new(window: Window<AppRuntime>) -> Self {
        Self { window }
    }

    /// Logical work area of the monitor holding the window, top-left origin.
    fn work_area(&self) -> Option<Rect> {
        let monitor = self
            .window
            .current_monitor()
            .ok()
            .flatten()
            .or_else(|| self.window.primary_monitor().ok().flatten())?;

        let scale = monitor.scale_factor();
        let area = monitor.work_area();
        let position = area.position.to_logical::<f64>(scale);
        let size = area.size.to_logical::<f64>(scale);
        Some(Rect::new(position.x, position.y, size.width, size.height))
    }

    fn reference_area(&self) -> Rect {
        self.work_area().unwrap_or(FALLBACK_DISPLAY)
    }

    fn logical_sizes(&self) -> Result<(LogicalSize<f64>, LogicalSize<f64>)> {
        let scale = self.window.scale_factor()?;
        let outer = self.window.outer_size()?.to_logical::<f64>(scale);
        let inner = self.window.inner_size()?.to_logical::<f64>(scale);
        Ok((outer, inner))
    }
}

/// Inner size to request so the outer frame comes out at `frame`'s size.
/// `frame()` reports the outer frame while `set_size` sets the inner size,
/// so the current decoration extent is taken off.
fn inner_size_for_frame(
    frame: &Rect,
    outer: LogicalSize<f64>,
    inner: LogicalSize<f64>,
) -> LogicalSize<f64> {
    let decoration_width = (outer.width - inner.width).max(0.0);
    let decoration_height = (outer.height - inner.height).max(0.0);
    LogicalSize::new(
        (frame.width - decoration_width).max(0.0),
        (frame.height - decoration_height).max(0.0),
    )
}

impl ChromeTarget for TauriOverlayWindow {
    fn set_full_size_content(&mut self, enabled: bool) -> Result<()> {
        // Content takes over the decoration area; the outer frame stays put.
        let frame = self.frame()?;
        self.window
            .set_decorations(!enabled)
            .context("toggle overlay decorations")?;
        self.set_frame(frame)
    }

    fn set_titlebar_transparent(&mut self, transparent: bool) -> Result<()> {
        debug!(transparent, "titlebar transparency follows decorations on this platform");
        Ok(())
    }

    fn set_title_hidden(&mut self, hidden: bool) -> Result<()> {
        if hidden {
            self.window.set_title("").context("hide overlay title")?;
        }
        Ok(())
    }

    fn set_opaque(&mut self, opaque: bool) -> Result<()> {
        let color = if opaque { None } else { Some(Color(0, 0, 0, 0)) };
        self.window
            .set_background_color(color)
            .context("set overlay background color")
    }

    fn set_shadow(&mut self, shadow: bool) -> Result<()> {
        self.window.set_shadow(shadow).context("set overlay shadow")
    }
}

impl PolicyTarget for TauriOverlayWindow {
    fn set_stacking_level(&mut self, level: StackingLevel) -> Result<()> {
        let on_top = match level {
            StackingLevel::Floating => true,
        };
        self.window
            .set_always_on_top(on_top)
            .context("set overlay stacking level")
    }

    fn set_movable_by_background(&mut self, movable: bool) -> Result<()> {
        // Dragging is driven by the content's drag region here.
        debug!(movable, "background drag delegated to the content surface");
        Ok(())
    }

    fn set_capture_excluded(&mut self, excluded: bool) -> Result<()> {
        self.window
            .set_content_protected(excluded)
            .context("set overlay capture exclusion")
    }
}

impl CompositingTarget for TauriOverlayWindow {
    fn content_bounds(&self) -> Result<Rect> {
        let scale = self.window.scale_factor()?;
        let size = self.window.inner_size()?.to_logical::<f64>(scale);
        Ok(Rect::new(0.0, 0.0, size.width, size.height))
    }

    fn enable_layer_backing(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_layer_backed(&self) -> Result<bool> {
        // The webview is composited on every platform Tauri targets.
        Ok(true)
    }

    fn insert_blur_below_content(&mut self, layer: &BlurLayer, _frame: Rect) -> Result<()> {
        let state = if layer.active {
            EffectState::Active
        } else {
            EffectState::Inactive
        };
        let effects = EffectsBuilder::new()
            .effect(Effect::Acrylic)
            .state(state)
            .build();
        self.window
            .set_effects(effects)
            .context("apply overlay backdrop effect")
    }

    fn apply_content_clip(&mut self, clip: &ContentClip) -> Result<()> {
        debug!(
            radius = clip.corner_radius,
            "corner clipping is drawn by the content surface on this platform"
        );
        Ok(())
    }
}

impl OverlayWindow for TauriOverlayWindow {
    type Content = WebviewSurface;

    fn frame(&self) -> Result<Rect> {
        let scale = self.window.scale_factor()?;
        let position = self.window.outer_position()?.to_logical::<f64>(scale);
        let (size, _) = self.logical_sizes()?;
        let top_left = Rect::new(position.x, position.y, size.width, size.height);
        Ok(top_left.flipped_within(&self.reference_area()))
    }

    fn set_frame(&mut self, frame: Rect) -> Result<()> {
        let top_left = frame.flipped_within(&self.reference_area());
        let (outer, inner) = self.logical_sizes()?;
        self.window
            .set_size(inner_size_for_frame(&top_left, outer, inner))
            .context("resize overlay window")?;
        self.window
            .set_position(LogicalPosition::new(top_left.x, top_left.y))
            .context("move overlay window")
    }

    fn display_bounds(&self) -> Result<Rect, DisplayUnavailable> {
        // Flipping the work area within itself is the identity, so it can be
        // handed to the placement math as is.
        self.work_area().ok_or(DisplayUnavailable)
    }

    fn attach_content(&mut self) -> Result<WebviewSurface> {
        attach_webview(&self.window)
    }

    fn present(&mut self) -> Result<()> {
        self.window.show().context("show overlay window")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restored_frame_keeps_outer_size_with_titlebar() {
        let captured = Rect::new(100.0, 100.0, 800.0, 628.0);
        let outer = LogicalSize::new(800.0, 628.0);
        let inner = LogicalSize::new(800.0, 600.0);

        let requested = inner_size_for_frame(&captured, outer, inner);
        assert_eq!(requested, LogicalSize::new(800.0, 600.0));
        assert_eq!(requested.height + (outer.height - inner.height), captured.height);
    }

    #[test]
    fn test_undecorated_frame_is_passed_through() {
        let anchored = Rect::new(1068.0, 24.0, 420.0, 640.0);
        let size = LogicalSize::new(420.0, 640.0);

        assert_eq!(inner_size_for_frame(&anchored, size, size), size);
    }

    #[test]
    fn test_frame_smaller_than_decorations_does_not_go_negative() {
        let tiny = Rect::new(0.0, 0.0, 10.0, 10.0);
        let requested = inner_size_for_frame(
            &tiny,
            LogicalSize::new(820.0, 640.0),
            LogicalSize::new(800.0, 600.0),
        );
        assert_eq!(requested, LogicalSize::new(0.0, 0.0));
    }
}
