mod chrome;
mod compositing;
mod config;
mod geometry;
mod logging;
mod platform;
mod policy;
mod sequencer;

use anyhow::{anyhow, Context, Result};
use config::{OverlayConfig, OVERLAY_WINDOW_LABEL};
use parking_lot::Mutex;
use sequencer::SetupReport;
use serde::Serialize;
use tauri::window::WindowBuilder;
use tauri::{AppHandle, Manager, State, Window, Wry};
use tracing::error;

const EVENT_OVERLAY_READY: &str = "overlay:ready";

type AppRuntime = Wry;

#[derive(Default)]
struct AppState {
    layout: Mutex<Option<SetupReport>>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct OverlayLayout {
    config: OverlayConfig,
    setup: Option<SetupReport>,
}

#[tauri::command]
fn get_overlay_layout(state: State<'_, AppState>) -> OverlayLayout {
    OverlayLayout {
        config: OverlayConfig::default(),
        setup: *state.layout.lock(),
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    dotenvy::dotenv().ok();
    logging::init_logging();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(AppState::default())
        .setup(|app| {
            let handle = app.handle();
            let window = build_overlay_window(handle)?;

            // A partially styled window is still usable; keep the app alive.
            match platform::overlay::init(handle, window) {
                Ok(report) => *handle.state::<AppState>().layout.lock() = Some(report),
                Err(err) => error!("Failed to set up overlay window: {err:#}"),
            }

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![get_overlay_layout])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// Materializes the overlay window hidden, with the frame declared in
/// `tauri.conf.json`.
fn build_overlay_window(app: &AppHandle<AppRuntime>) -> Result<Window<AppRuntime>> {
    let config = app
        .config()
        .app
        .windows
        .iter()
        .find(|window| window.label == OVERLAY_WINDOW_LABEL)
        .ok_or_else(|| anyhow!("no '{OVERLAY_WINDOW_LABEL}' window in tauri.conf.json"))?;

    WindowBuilder::from_config(app, config)
        .context("read overlay window config")?
        .visible(false)
        .build()
        .context("materialize overlay window")
}
