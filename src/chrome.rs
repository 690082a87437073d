use anyhow::Result;
use serde::Serialize;

use crate::config::{BORDER_ALPHA, BORDER_WHITE, BORDER_WIDTH, CORNER_RADIUS};

/// Grayscale color with alpha, matching how the border is specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WhiteAlpha {
    pub white: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeStyle {
    pub corner_radius: f64,
    pub border_width: f64,
    pub border_color: WhiteAlpha,
    pub background_opaque: bool,
    pub titlebar_transparent: bool,
    pub title_hidden: bool,
    pub shadow: bool,
    pub full_size_content: bool,
}

impl ChromeStyle {
    pub const fn overlay() -> Self {
        Self {
            corner_radius: CORNER_RADIUS,
            border_width: BORDER_WIDTH,
            border_color: WhiteAlpha {
                white: BORDER_WHITE,
                alpha: BORDER_ALPHA,
            },
            background_opaque: false,
            titlebar_transparent: true,
            title_hidden: true,
            shadow: true,
            full_size_content: true,
        }
    }
}

/// Window-level chrome setters. Every setter takes the final value, so
/// repeating a call leaves the window unchanged.
pub trait ChromeTarget {
    fn set_full_size_content(&mut self, enabled: bool) -> Result<()>;
    fn set_titlebar_transparent(&mut self, transparent: bool) -> Result<()>;
    fn set_title_hidden(&mut self, hidden: bool) -> Result<()>;
    /// `false` also clears the window background color.
    fn set_opaque(&mut self, opaque: bool) -> Result<()>;
    fn set_shadow(&mut self, shadow: bool) -> Result<()>;
}

pub fn apply_chrome<T: ChromeTarget + ?Sized>(target: &mut T, style: &ChromeStyle) -> Result<()> {
    target.set_full_size_content(style.full_size_content)?;
    target.set_titlebar_transparent(style.titlebar_transparent)?;
    target.set_title_hidden(style.title_hidden)?;
    target.set_opaque(style.background_opaque)?;
    target.set_shadow(style.shadow)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct DefaultWindow {
        full_size_content: bool,
        titlebar_transparent: bool,
        title_hidden: bool,
        opaque: bool,
        shadow: bool,
        writes: usize,
    }

    impl Default for DefaultWindow {
        fn default() -> Self {
            Self {
                full_size_content: false,
                titlebar_transparent: false,
                title_hidden: false,
                opaque: true,
                shadow: false,
                writes: 0,
            }
        }
    }

    impl ChromeTarget for DefaultWindow {
        fn set_full_size_content(&mut self, enabled: bool) -> Result<()> {
            self.full_size_content = enabled;
            self.writes += 1;
            Ok(())
        }

        fn set_titlebar_transparent(&mut self, transparent: bool) -> Result<()> {
            self.titlebar_transparent = transparent;
            self.writes += 1;
            Ok(())
        }

        fn set_title_hidden(&mut self, hidden: bool) -> Result<()> {
            self.title_hidden = hidden;
            self.writes += 1;
            Ok(())
        }

        fn set_opaque(&mut self, opaque: bool) -> Result<()> {
            self.opaque = opaque;
            self.writes += 1;
            Ok(())
        }

        fn set_shadow(&mut self, shadow: bool) -> Result<()> {
            self.shadow = shadow;
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_chrome_transforms_default_window() {
        let mut window = DefaultWindow::default();
        apply_chrome(&mut window, &ChromeStyle::overlay()).expect("apply chrome");

        assert!(!window.opaque);
        assert!(window.titlebar_transparent);
        assert!(window.title_hidden);
        assert!(window.shadow);
        assert!(window.full_size_content);
    }

    #[test]
    fn test_chrome_is_idempotent() {
        let style = ChromeStyle::overlay();

        let mut once = DefaultWindow::default();
        apply_chrome(&mut once, &style).expect("apply once");

        let mut twice = DefaultWindow::default();
        apply_chrome(&mut twice, &style).expect("apply first");
        apply_chrome(&mut twice, &style).expect("apply second");

        twice.writes = once.writes;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_overlay_style_constants() {
        let style = ChromeStyle::overlay();
        assert_eq!(style.corner_radius, 16.0);
        assert_eq!(style.border_width, 0.5);
        assert_eq!(style.border_color, WhiteAlpha { white: 1.0, alpha: 0.08 });
    }
}
