//! Filled rectangular container

use std::any::Any;

use crate::foundation::geometry::Rect;
use crate::surface::DrawSurface;
use crate::theme::{Color, Theme};
use crate::tree::Widget;

/// A plain container: background fill plus an optional border
///
/// Panels are usually marked passthrough on their node so they group and
/// position children without blocking clicks aimed at whatever sits behind
/// them. A non-passthrough panel is an opaque click shield.
pub struct Panel {
    bg: Color,
    border: Option<Color>,
    theme: Theme,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    /// Create a panel painted with the default theme
    pub fn new() -> Self {
        let theme = Theme::default();
        Self {
            bg: theme.bg,
            border: Some(theme.border),
            theme,
        }
    }

    /// Drop the border outline
    #[must_use]
    pub fn borderless(mut self) -> Self {
        self.border = None;
        self
    }

    /// Current background color
    pub fn background(&self) -> Color {
        self.bg
    }
}

impl Widget for Panel {
    fn name(&self) -> &str {
        "panel"
    }

    fn draw(&self, surface: &mut dyn DrawSurface, rect: Rect) {
        surface.fill_rect(rect, self.bg);
        if let Some(border) = self.border {
            surface.stroke_rect(rect, border);
        }
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.theme = *theme;
        self.bg = theme.bg;
        if self.border.is_some() {
            self.border = Some(theme.border);
        }
    }

    fn apply_contrast(&mut self, factor: f32) {
        let recolored = self.theme.with_contrast(factor * 100.0);
        self.apply_theme(&recolored);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{DrawOp, RecordingSurface};

    #[test]
    fn test_draws_fill_then_border() {
        let panel = Panel::new();
        let mut surface = RecordingSurface::new(100, 100);
        panel.draw(&mut surface, Rect::new(10, 10, 50, 40));
        assert_eq!(surface.ops.len(), 2);
        assert!(matches!(surface.ops[0], DrawOp::Fill(..)));
        assert!(matches!(surface.ops[1], DrawOp::Stroke(..)));
    }

    #[test]
    fn test_borderless_skips_stroke() {
        let panel = Panel::new().borderless();
        let mut surface = RecordingSurface::new(100, 100);
        panel.draw(&mut surface, Rect::new(0, 0, 10, 10));
        assert_eq!(surface.ops.len(), 1);
        assert!(matches!(surface.ops[0], DrawOp::Fill(..)));
    }

    #[test]
    fn test_theme_application_is_idempotent() {
        let mut a = Panel::new();
        let mut b = Panel::new();
        let theme = Theme::from_hue(120.0);
        a.apply_theme(&theme);
        b.apply_theme(&theme);
        b.apply_theme(&theme);
        assert_eq!(a.background(), b.background());
    }
}
