use crate::config::{CONTENT_ENTRY, CONTENT_WEBVIEW_LABEL};
use crate::geometry::Rect;
use crate::sequencer::{ContentSurface, OverlaySequencer, SetupReport};
use crate::{AppRuntime, EVENT_OVERLAY_READY};
use anyhow::{Context, Result};
use tauri::webview::WebviewBuilder;
use tauri::{AppHandle, Emitter, LogicalPosition, Webview, WebviewUrl, Window};
use tracing::{info, warn};

/// The hosted webview. Only its bounds are ever inspected.
pub struct WebviewSurface {
    webview: Webview<AppRuntime>,
}

impl WebviewSurface {
    pub fn label(&self) -> &str {
        self.webview.label()
    }
}

impl ContentSurface for WebviewSurface {
    fn bounds(&self) -> Result<Rect> {
        let scale = self.webview.window().scale_factor()?;
        let position = self.webview.position()?.to_logical::<f64>(scale);
        let size = self.webview.size()?.to_logical::<f64>(scale);
        Ok(Rect::new(position.x, position.y, size.width, size.height))
    }
}

/// Attaches the content webview as a child filling the window's content
/// area. The webview follows window resizes.
pub fn attach_webview(window: &Window<AppRuntime>) -> Result<WebviewSurface> {
    let builder = WebviewBuilder::new(CONTENT_WEBVIEW_LABEL, WebviewUrl::App(CONTENT_ENTRY.into()))
        .transparent(true)
        .auto_resize();

    let size = window.inner_size().context("read overlay content size")?;
    let webview = window
        .add_child(builder, LogicalPosition::new(0.0, 0.0), size)
        .with_context(|| format!("attach '{CONTENT_WEBVIEW_LABEL}' webview"))?;

    Ok(WebviewSurface { webview })
}

pub fn init(app: &AppHandle<AppRuntime>, window: Window<AppRuntime>) -> Result<SetupReport> {
    #[cfg(target_os = "macos")]
    let backend = crate::platform::macos::overlay::MacOverlayWindow::new(window)?;
    #[cfg(not(target_os = "macos"))]
    let backend = crate::platform::default::overlay::TauriOverlayWindow::new(window);

    let app = app.clone();
    let mut sequencer = OverlaySequencer::new(backend);
    sequencer.run(&move |content: &WebviewSurface| register_plugins(&app, content))
}

fn register_plugins(app: &AppHandle<AppRuntime>, content: &WebviewSurface) {
    info!(webview = content.label(), "content surface attached");
    if let Err(err) = app.emit_to(content.label(), EVENT_OVERLAY_READY, ()) {
        warn!("Failed to notify content surface: {err}");
    }
}
