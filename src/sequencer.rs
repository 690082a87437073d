//! One-shot setup of the overlay window.
//!
//! The steps run in the order of [`SETUP_SEQUENCE`], once, on the thread
//! that materialized the window. Compositing depends on the content area
//! existing with its final geometry, and chrome and policy must land before
//! the window is first presented.

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::chrome::{apply_chrome, ChromeStyle, ChromeTarget};
use crate::compositing::{insert_backdrop, BlurLayer, CompositingTarget, ContentClip};
use crate::config::{OVERLAY_DIMENSIONS, OVERLAY_MARGIN};
use crate::geometry::{anchored_frame, resolve_display_bounds, DisplayUnavailable, Rect};
use crate::policy::{apply_policy, PolicyTarget, WindowPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SetupStep {
    CaptureFrame,
    AttachContent,
    RestoreFrame,
    Anchor,
    ApplyChrome,
    ApplyPolicy,
    InsertBackdrop,
    RegisterPlugins,
    Present,
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupStep::CaptureFrame => write!(f, "capture-frame"),
            SetupStep::AttachContent => write!(f, "attach-content"),
            SetupStep::RestoreFrame => write!(f, "restore-frame"),
            SetupStep::Anchor => write!(f, "anchor"),
            SetupStep::ApplyChrome => write!(f, "apply-chrome"),
            SetupStep::ApplyPolicy => write!(f, "apply-policy"),
            SetupStep::InsertBackdrop => write!(f, "insert-backdrop"),
            SetupStep::RegisterPlugins => write!(f, "register-plugins"),
            SetupStep::Present => write!(f, "present"),
        }
    }
}

pub const SETUP_SEQUENCE: [SetupStep; 9] = [
    SetupStep::CaptureFrame,
    SetupStep::AttachContent,
    SetupStep::RestoreFrame,
    SetupStep::Anchor,
    SetupStep::ApplyChrome,
    SetupStep::ApplyPolicy,
    SetupStep::InsertBackdrop,
    SetupStep::RegisterPlugins,
    SetupStep::Present,
];

/// Externally owned surface hosted as the window's content.
pub trait ContentSurface {
    fn bounds(&self) -> Result<Rect>;
}

pub trait OverlayWindow: ChromeTarget + PolicyTarget + CompositingTarget {
    type Content: ContentSurface;

    fn frame(&self) -> Result<Rect>;
    fn set_frame(&mut self, frame: Rect) -> Result<()>;
    fn display_bounds(&self) -> Result<Rect, DisplayUnavailable>;
    /// Attaching may reset the window geometry.
    fn attach_content(&mut self) -> Result<Self::Content>;
    fn present(&mut self) -> Result<()>;
}

/// Wires the attached surface to its runtime. Fire-and-forget.
pub trait PluginRegistrar<C> {
    fn register(&self, content: &C);
}

impl<C, F> PluginRegistrar<C> for F
where
    F: Fn(&C),
{
    fn register(&self, content: &C) {
        self(content)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("overlay setup already ran")]
    AlreadyRan,
    #[error("step '{0}' ran before the state it needs was produced")]
    MissingState(SetupStep),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupReport {
    pub original_frame: Rect,
    pub display: Rect,
    pub used_fallback_display: bool,
    pub anchored_frame: Rect,
    pub content_bounds: Rect,
}

pub struct OverlaySequencer<W: OverlayWindow> {
    window: W,
    chrome: ChromeStyle,
    policy: WindowPolicy,
    blur: BlurLayer,
    content: Option<W::Content>,
    original_frame: Option<Rect>,
    display: Option<(Rect, bool)>,
    anchored: Option<Rect>,
    content_bounds: Option<Rect>,
    ran: bool,
}

impl<W: OverlayWindow> OverlaySequencer<W> {
    pub fn new(window: W) -> Self {
        Self {
            window,
            chrome: ChromeStyle::overlay(),
            policy: WindowPolicy::overlay(),
            blur: BlurLayer::hud(),
            content: None,
            original_frame: None,
            display: None,
            anchored: None,
            content_bounds: None,
            ran: false,
        }
    }

    #[cfg(test)]
    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn run<R: PluginRegistrar<W::Content>>(&mut self, registrar: &R) -> Result<SetupReport> {
        if self.ran {
            return Err(SequenceError::AlreadyRan.into());
        }
        self.ran = true;

        for step in SETUP_SEQUENCE {
            debug!(%step, "overlay setup step");
            self.perform(step, registrar)
                .with_context(|| format!("overlay setup step '{step}'"))?;
        }

        let report = self.report()?;
        info!(
            x = report.anchored_frame.x,
            y = report.anchored_frame.y,
            fallback = report.used_fallback_display,
            "overlay window ready"
        );
        Ok(report)
    }

    fn perform<R: PluginRegistrar<W::Content>>(&mut self, step: SetupStep, registrar: &R) -> Result<()> {
        match step {
            SetupStep::CaptureFrame => {
                self.original_frame = Some(self.window.frame()?);
            }
            SetupStep::AttachContent => {
                self.content = Some(self.window.attach_content()?);
            }
            SetupStep::RestoreFrame => {
                let frame = self.original_frame.ok_or(SequenceError::MissingState(step))?;
                self.window.set_frame(frame)?;
            }
            SetupStep::Anchor => {
                let (display, used_fallback) = resolve_display_bounds(self.window.display_bounds());
                let frame = anchored_frame(&display, &OVERLAY_DIMENSIONS, OVERLAY_MARGIN);
                self.window.set_frame(frame)?;
                self.display = Some((display, used_fallback));
                self.anchored = Some(frame);
            }
            SetupStep::ApplyChrome => apply_chrome(&mut self.window, &self.chrome)?,
            SetupStep::ApplyPolicy => apply_policy(&mut self.window, &self.policy)?,
            SetupStep::InsertBackdrop => {
                let content = self.content.as_ref().ok_or(SequenceError::MissingState(step))?;
                self.content_bounds = Some(content.bounds()?);
                let clip = ContentClip::from_chrome(&self.chrome);
                insert_backdrop(&mut self.window, &self.blur, &clip)?;
            }
            SetupStep::RegisterPlugins => {
                let content = self.content.as_ref().ok_or(SequenceError::MissingState(step))?;
                registrar.register(content);
            }
            SetupStep::Present => self.window.present()?,
        }
        Ok(())
    }

    fn report(&self) -> Result<SetupReport> {
        let (display, used_fallback_display) =
            self.display.ok_or(SequenceError::MissingState(SetupStep::Anchor))?;

        Ok(SetupReport {
            original_frame: self
                .original_frame
                .ok_or(SequenceError::MissingState(SetupStep::CaptureFrame))?,
            display,
            used_fallback_display,
            anchored_frame: self
                .anchored
                .ok_or(SequenceError::MissingState(SetupStep::Anchor))?,
            content_bounds: self
                .content_bounds
                .ok_or(SequenceError::MissingState(SetupStep::InsertBackdrop))?,
        })
    }
}
