//! Single-line and word-wrapped text widgets

use std::any::Any;

use crate::foundation::geometry::{Point, Rect};
use crate::surface::{line_height, text_width, DrawSurface};
use crate::theme::{Color, Theme};
use crate::tree::Widget;

use super::{HAlign, Style, VAlign};

/// Clip a line to a pixel budget, appending an ellipsis when it overflows
fn clip_line(text: &str, font_px: u32, max_width: u32) -> String {
    if text_width(text, font_px) <= max_width {
        return text.to_string();
    }
    let ellipsis_width = text_width("\u{2026}", font_px);
    let budget = max_width.saturating_sub(ellipsis_width);
    let mut clipped = String::new();
    for ch in text.chars() {
        let mut candidate = clipped.clone();
        candidate.push(ch);
        if text_width(&candidate, font_px) > budget {
            break;
        }
        clipped = candidate;
    }
    clipped.push('\u{2026}');
    clipped
}

/// Greedy word wrap into lines that fit a pixel budget
///
/// A single word wider than the budget gets a line of its own rather than
/// being broken mid-word.
fn wrap_text(text: &str, font_px: u32, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && text_width(&candidate, font_px) > max_width {
                lines.push(current);
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

fn anchor_x(rect: Rect, width: u32, align: HAlign) -> i32 {
    match align {
        HAlign::Left => rect.x,
        HAlign::Center => rect.x + (rect.width().saturating_sub(width) / 2) as i32,
        HAlign::Right => rect.right() - width as i32,
    }
}

fn anchor_y(rect: Rect, height: u32, align: VAlign) -> i32 {
    match align {
        VAlign::Top => rect.y,
        VAlign::Middle => rect.y + (rect.height().saturating_sub(height) / 2) as i32,
        VAlign::Bottom => rect.bottom() - height as i32,
    }
}

/// A single line of text, clipped with an ellipsis when it overflows
///
/// Labels never react to input; the builder marks their nodes passthrough so
/// clicks reach whatever the label annotates.
pub struct Label {
    text: String,
    style: Style,
    halign: HAlign,
    valign: VAlign,
    theme: Theme,
    color: Color,
}

impl Label {
    /// Create a label with body-text style, centered
    pub fn new(text: impl Into<String>) -> Self {
        let theme = Theme::default();
        Self {
            text: text.into(),
            style: Style::Normal,
            halign: HAlign::Center,
            valign: VAlign::Middle,
            theme,
            color: theme.fg,
        }
    }

    /// Set the text size preset
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set horizontal anchoring
    #[must_use]
    pub fn with_halign(mut self, halign: HAlign) -> Self {
        self.halign = halign;
        self
    }

    /// Set vertical anchoring
    #[must_use]
    pub fn with_valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    /// Current text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Widget for Label {
    fn name(&self) -> &str {
        "label"
    }

    fn draw(&self, surface: &mut dyn DrawSurface, rect: Rect) {
        let font_px = self.style.font_px();
        let line = clip_line(&self.text, font_px, rect.width());
        let width = text_width(&line, font_px);
        let pos = Point {
            x: anchor_x(rect, width, self.halign),
            y: anchor_y(rect, line_height(font_px), self.valign),
        };
        surface.draw_text(pos, &line, font_px, self.color);
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.theme = *theme;
        self.color = theme.fg;
    }

    fn apply_contrast(&mut self, factor: f32) {
        // Text tracks the foreground of the current palette at the new level.
        self.theme = self.theme.with_contrast(factor * 100.0);
        self.color = self.theme.fg;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A word-wrapped paragraph of text
///
/// The wrap is recomputed only when the text or the available width changes;
/// drawing reuses the cached lines.
pub struct MultiLabel {
    text: String,
    style: Style,
    theme: Theme,
    color: Color,
    lines: Vec<String>,
    wrapped_for: u32,
}

impl MultiLabel {
    /// Create a wrapped label with body-text style
    pub fn new(text: impl Into<String>) -> Self {
        let theme = Theme::default();
        Self {
            text: text.into(),
            style: Style::Normal,
            theme,
            color: theme.fg,
            lines: Vec::new(),
            wrapped_for: 0,
        }
    }

    /// Set the text size preset
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self.lines.clear();
        self.wrapped_for = 0;
        self
    }

    /// Replace the text, invalidating the cached wrap
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.lines.clear();
        self.wrapped_for = 0;
    }

    fn ensure_wrapped(&mut self, width: u32) {
        if self.wrapped_for == width && !self.lines.is_empty() {
            return;
        }
        self.lines = wrap_text(&self.text, self.style.font_px(), width);
        self.wrapped_for = width;
    }

    /// Pixel height required to show every wrapped line at the given width
    pub fn required_height(&mut self, width: u32) -> u32 {
        self.ensure_wrapped(width);
        self.lines.len() as u32 * line_height(self.style.font_px())
    }
}

impl Widget for MultiLabel {
    fn name(&self) -> &str {
        "multilabel"
    }

    fn update(&mut self, ctx: &mut crate::tree::WidgetCtx<'_>, _dt: f32) {
        // Re-wrap off the draw path when the node was resized.
        let width = ctx.rect().width();
        self.ensure_wrapped(width);
    }

    fn draw(&self, surface: &mut dyn DrawSurface, rect: Rect) {
        let font_px = self.style.font_px();
        let step = line_height(font_px) as i32;
        let mut y = rect.y;
        for line in &self.lines {
            if y + step > rect.bottom() {
                break;
            }
            surface.draw_text(Point { x: rect.x, y }, line, font_px, self.color);
            y += step;
        }
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.theme = *theme;
        self.color = theme.fg;
    }

    fn apply_contrast(&mut self, factor: f32) {
        self.theme = self.theme.with_contrast(factor * 100.0);
        self.color = self.theme.fg;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
