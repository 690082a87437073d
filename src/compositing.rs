//! Frosted backdrop and content-area clipping.
//!
//! The blur layer sits below every other view in the content area and
//! follows its size. Corner clipping and the border apply to the content
//! area as a whole, which requires the content area to be layer-backed.

use anyhow::{ensure, Context, Result};
use serde::Serialize;
use thiserror::Error;

use crate::chrome::{ChromeStyle, WhiteAlpha};
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlurMaterial {
    HudWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendMode {
    BehindWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Autoresize {
    WidthAndHeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlurLayer {
    pub material: BlurMaterial,
    pub blend_mode: BlendMode,
    pub active: bool,
    pub autoresize: Autoresize,
}

impl BlurLayer {
    pub const fn hud() -> Self {
        Self {
            material: BlurMaterial::HudWindow,
            blend_mode: BlendMode::BehindWindow,
            active: true,
            autoresize: Autoresize::WidthAndHeight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentClip {
    pub corner_radius: f64,
    pub masks_to_bounds: bool,
    pub border_width: f64,
    pub border_color: WhiteAlpha,
}

impl ContentClip {
    pub fn from_chrome(style: &ChromeStyle) -> Self {
        Self {
            corner_radius: style.corner_radius,
            masks_to_bounds: true,
            border_width: style.border_width,
            border_color: style.border_color,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompositingError {
    #[error("content clipping requires a layer-backed content area")]
    NotLayerBacked,
}

pub trait CompositingTarget {
    fn content_bounds(&self) -> Result<Rect>;
    fn enable_layer_backing(&mut self) -> Result<()>;
    fn is_layer_backed(&self) -> Result<bool>;
    /// Adds `layer` as the furthest-back view of the content area.
    fn insert_blur_below_content(&mut self, layer: &BlurLayer, frame: Rect) -> Result<()>;
    fn apply_content_clip(&mut self, clip: &ContentClip) -> Result<()>;
}

pub fn insert_backdrop<T: CompositingTarget + ?Sized>(
    target: &mut T,
    layer: &BlurLayer,
    clip: &ContentClip,
) -> Result<()> {
    let bounds = target.content_bounds().context("read content area bounds")?;
    target
        .insert_blur_below_content(layer, bounds)
        .context("insert blur layer")?;

    target.enable_layer_backing().context("enable content layer backing")?;
    // Corner radius, border and clipping are silently ignored without a
    // backing layer.
    ensure!(target.is_layer_backed()?, CompositingError::NotLayerBacked);
    target.apply_content_clip(clip).context("clip content area")?;
    Ok(())
}
