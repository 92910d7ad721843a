//! Push button with press/release click semantics

use std::any::Any;

use crate::foundation::geometry::{Point, Rect};
use crate::surface::{line_height, text_width, DrawSurface};
use crate::theme::Theme;
use crate::tree::{InputEvent, Widget, WidgetCtx};

use super::Style;

/// Callback invoked when a click completes
pub type ClickHandler = Box<dyn FnMut(&mut WidgetCtx<'_>)>;

/// A clickable button
///
/// A click is a press inside the bounds followed by a release inside the
/// bounds. The pointer is captured between the two so the release is seen
/// even if the pointer wanders; releasing outside disarms without firing.
pub struct Button {
    caption: String,
    style: Style,
    theme: Theme,
    pressed: bool,
    on_click: Option<ClickHandler>,
}

impl Button {
    /// Create a button with the given caption
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            style: Style::Normal,
            theme: Theme::default(),
            pressed: false,
            on_click: None,
        }
    }

    /// Set the caption size preset
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Attach the click callback
    #[must_use]
    pub fn on_click(mut self, handler: impl FnMut(&mut WidgetCtx<'_>) + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    /// Whether the button is currently held down
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl Widget for Button {
    fn name(&self) -> &str {
        "button"
    }

    fn draw(&self, surface: &mut dyn DrawSurface, rect: Rect) {
        // Pressed state swaps fill and border so the press reads visually.
        let (fill, edge) = if self.pressed {
            (self.theme.border, self.theme.fg)
        } else {
            (self.theme.bg, self.theme.border)
        };
        surface.fill_rect(rect, fill);
        surface.stroke_rect(rect, edge);

        let font_px = self.style.font_px();
        let width = text_width(&self.caption, font_px);
        let pos = Point {
            x: rect.x + (rect.width().saturating_sub(width) / 2) as i32,
            y: rect.y + (rect.height().saturating_sub(line_height(font_px)) / 2) as i32,
        };
        surface.draw_text(pos, &self.caption, font_px, self.theme.fg);
    }

    fn on_event(&mut self, ctx: &mut WidgetCtx<'_>, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { pos, .. } if ctx.hit(*pos) => {
                self.pressed = true;
                ctx.capture();
                ctx.reset();
                true
            }
            InputEvent::PointerUp { pos, .. } if self.pressed => {
                self.pressed = false;
                ctx.release_capture();
                ctx.reset();
                if ctx.hit(*pos) {
                    if let Some(mut handler) = self.on_click.take() {
                        handler(ctx);
                        self.on_click = Some(handler);
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.theme = *theme;
    }

    fn apply_contrast(&mut self, factor: f32) {
        self.theme = self.theme.with_contrast(factor * 100.0);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
