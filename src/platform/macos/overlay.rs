//! AppKit backend. Every call here must happen on the main thread, which is
//! where the Tauri setup hook runs.

use crate::chrome::ChromeTarget;
use crate::compositing::{Autoresize, BlendMode, BlurLayer, BlurMaterial, CompositingError, CompositingTarget, ContentClip};
use crate::geometry::{DisplayUnavailable, Rect};
use crate::platform::overlay::{attach_webview, WebviewSurface};
use crate::policy::{PolicyTarget, StackingLevel};
use crate::sequencer::OverlayWindow;
use crate::AppRuntime;
use anyhow::{anyhow, ensure, Context, Result};
use cocoa::base::{id, nil, BOOL, NO, YES};
use cocoa::foundation::{NSPoint, NSRect, NSSize};
use objc::{class, msg_send, sel, sel_impl};
use tauri::Window;

const STYLE_MASK_FULL_SIZE_CONTENT_VIEW: u64 = 1 << 15;
const TITLE_VISIBLE: i64 = 0;
const TITLE_HIDDEN: i64 = 1;
const FLOATING_WINDOW_LEVEL: i64 = 3;
const SHARING_NONE: u64 = 0;
const SHARING_READ_ONLY: u64 = 1;

const MATERIAL_HUD_WINDOW: i64 = 13;
const BLENDING_BEHIND_WINDOW: i64 = 0;
const EFFECT_STATE_ACTIVE: i64 = 1;
const EFFECT_STATE_INACTIVE: i64 = 2;
const VIEW_WIDTH_SIZABLE: u64 = 1 << 1;
const VIEW_HEIGHT_SIZABLE: u64 = 1 << 4;
const WINDOW_BELOW: i64 = -1;

fn to_ns_rect(rect: Rect) -> NSRect {
    NSRect::new(NSPoint::new(rect.x, rect.y), NSSize::new(rect.width, rect.height))
}

fn from_ns_rect(rect: NSRect) -> Rect {
    Rect::new(rect.origin.x, rect.origin.y, rect.size.width, rect.size.height)
}

fn to_bool(value: bool) -> BOOL {
    if value {
        YES
    } else {
        NO
    }
}

pub struct MacOverlayWindow {
    window: Window<AppRuntime>,
    ns_window: id,
}

impl MacOverlayWindow {
    pub fn new(window: Window<AppRuntime>) -> Result<Self> {
        let ns_window = window.ns_window().context("resolve NSWindow for overlay")? as id;
        ensure!(ns_window != nil, "overlay window has no NSWindow");
        Ok(Self { window, ns_window })
    }

    fn content_view(&self) -> Result<id> {
        let content: id = unsafe { msg_send![self.ns_window, contentView] };
        if content == nil {
            return Err(anyhow!("overlay window has no content view"));
        }
        Ok(content)
    }
}

impl ChromeTarget for MacOverlayWindow {
    fn set_full_size_content(&mut self, enabled: bool) -> Result<()> {
        unsafe {
            let mask: u64 = msg_send![self.ns_window, styleMask];
            let mask = if enabled {
                mask | STYLE_MASK_FULL_SIZE_CONTENT_VIEW
            } else {
                mask & !STYLE_MASK_FULL_SIZE_CONTENT_VIEW
            };
            let _: () = msg_send![self.ns_window, setStyleMask: mask];
        }
        Ok(())
    }

    fn set_titlebar_transparent(&mut self, transparent: bool) -> Result<()> {
        unsafe {
            let _: () = msg_send![self.ns_window, setTitlebarAppearsTransparent: to_bool(transparent)];
        }
        Ok(())
    }

    fn set_title_hidden(&mut self, hidden: bool) -> Result<()> {
        let visibility = if hidden { TITLE_HIDDEN } else { TITLE_VISIBLE };
        unsafe {
            let _: () = msg_send![self.ns_window, setTitleVisibility: visibility];
        }
        Ok(())
    }

    fn set_opaque(&mut self, opaque: bool) -> Result<()> {
        unsafe {
            let color: id = if opaque {
                msg_send![class!(NSColor), windowBackgroundColor]
            } else {
                msg_send![class!(NSColor), clearColor]
            };
            let _: () = msg_send![self.ns_window, setOpaque: to_bool(opaque)];
            let _: () = msg_send![self.ns_window, setBackgroundColor: color];
        }
        Ok(())
    }

    fn set_shadow(&mut self, shadow: bool) -> Result<()> {
        unsafe {
            let _: () = msg_send![self.ns_window, setHasShadow: to_bool(shadow)];
        }
        Ok(())
    }
}

impl PolicyTarget for MacOverlayWindow {
    fn set_stacking_level(&mut self, level: StackingLevel) -> Result<()> {
        let level = match level {
            StackingLevel::Floating => FLOATING_WINDOW_LEVEL,
        };
        unsafe {
            let _: () = msg_send![self.ns_window, setLevel: level];
        }
        Ok(())
    }

    fn set_movable_by_background(&mut self, movable: bool) -> Result<()> {
        unsafe {
            let _: () = msg_send![self.ns_window, setMovableByWindowBackground: to_bool(movable)];
        }
        Ok(())
    }

    fn set_capture_excluded(&mut self, excluded: bool) -> Result<()> {
        let sharing = if excluded { SHARING_NONE } else { SHARING_READ_ONLY };
        unsafe {
            let _: () = msg_send![self.ns_window, setSharingType: sharing];
        }
        Ok(())
    }
}

impl CompositingTarget for MacOverlayWindow {
    fn content_bounds(&self) -> Result<Rect> {
        let content = self.content_view()?;
        let bounds: NSRect = unsafe { msg_send![content, bounds] };
        Ok(from_ns_rect(bounds))
    }

    fn enable_layer_backing(&mut self) -> Result<()> {
        let content = self.content_view()?;
        unsafe {
            let _: () = msg_send![content, setWantsLayer: YES];
        }
        Ok(())
    }

    fn is_layer_backed(&self) -> Result<bool> {
        let content = self.content_view()?;
        let layer: id = unsafe { msg_send![content, layer] };
        Ok(layer != nil)
    }

    fn insert_blur_below_content(&mut self, layer: &BlurLayer, frame: Rect) -> Result<()> {
        let content = self.content_view()?;

        let material = match layer.material {
            BlurMaterial::HudWindow => MATERIAL_HUD_WINDOW,
        };
        let blending = match layer.blend_mode {
            BlendMode::BehindWindow => BLENDING_BEHIND_WINDOW,
        };
        let state = if layer.active {
            EFFECT_STATE_ACTIVE
        } else {
            EFFECT_STATE_INACTIVE
        };
        let autoresize = match layer.autoresize {
            Autoresize::WidthAndHeight => VIEW_WIDTH_SIZABLE | VIEW_HEIGHT_SIZABLE,
        };

        unsafe {
            let blur: id = msg_send![class!(NSVisualEffectView), alloc];
            let blur: id = msg_send![blur, initWithFrame: to_ns_rect(frame)];
            ensure!(blur != nil, "failed to create NSVisualEffectView");

            let _: () = msg_send![blur, setMaterial: material];
            let _: () = msg_send![blur, setBlendingMode: blending];
            let _: () = msg_send![blur, setState: state];
            let _: () = msg_send![blur, setWantsLayer: YES];
            let _: () = msg_send![blur, setAutoresizingMask: autoresize];
            let _: () = msg_send![content, addSubview: blur positioned: WINDOW_BELOW relativeTo: nil];
            // The content view retains it now.
            let _: () = msg_send![blur, release];
        }
        Ok(())
    }

    fn apply_content_clip(&mut self, clip: &ContentClip) -> Result<()> {
        let content = self.content_view()?;
        unsafe {
            let layer: id = msg_send![content, layer];
            ensure!(layer != nil, CompositingError::NotLayerBacked);

            let border: id = msg_send![
                class!(NSColor),
                colorWithWhite: clip.border_color.white
                alpha: clip.border_color.alpha
            ];
            let border_cg: id = msg_send![border, CGColor];

            let _: () = msg_send![layer, setCornerRadius: clip.corner_radius];
            let _: () = msg_send![layer, setMasksToBounds: to_bool(clip.masks_to_bounds)];
            let _: () = msg_send![layer, setBorderWidth: clip.border_width];
            let _: () = msg_send![layer, setBorderColor: border_cg];
        }
        Ok(())
    }
}

impl OverlayWindow for MacOverlayWindow {
    type Content = WebviewSurface;

    fn frame(&self) -> Result<Rect> {
        let frame: NSRect = unsafe { msg_send![self.ns_window, frame] };
        Ok(from_ns_rect(frame))
    }

    fn set_frame(&mut self, frame: Rect) -> Result<()> {
        unsafe {
            let _: () = msg_send![self.ns_window, setFrame: to_ns_rect(frame) display: YES];
        }
        Ok(())
    }

    fn display_bounds(&self) -> Result<Rect, DisplayUnavailable> {
        unsafe {
            let screen: id = msg_send![class!(NSScreen), mainScreen];
            if screen == nil {
                return Err(DisplayUnavailable);
            }
            let visible: NSRect = msg_send![screen, visibleFrame];
            Ok(from_ns_rect(visible))
        }
    }

    fn attach_content(&mut self) -> Result<WebviewSurface> {
        attach_webview(&self.window)
    }

    fn present(&mut self) -> Result<()> {
        self.window.show().context("show overlay window")
    }
}
