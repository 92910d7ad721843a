//! Horizontal value slider

use std::any::Any;

use crate::foundation::geometry::Rect;
use crate::surface::DrawSurface;
use crate::theme::Theme;
use crate::tree::{InputEvent, Widget, WidgetCtx};

/// Callback invoked whenever the value changes during a drag
pub type ChangeHandler = Box<dyn FnMut(&mut WidgetCtx<'_>, f32)>;

const KNOB_WIDTH: u32 = 10;

/// A horizontal slider mapping pointer position to a value in `[min, max]`
///
/// Pressing anywhere on the track jumps the value there and captures the
/// pointer, so the drag keeps tracking even when the pointer leaves the
/// widget's bounds.
pub struct Slider {
    min: f32,
    max: f32,
    value: f32,
    dragging: bool,
    theme: Theme,
    on_change: Option<ChangeHandler>,
}

impl Slider {
    /// Create a slider over the given range, starting at `value`
    pub fn new(min: f32, max: f32, value: f32) -> Self {
        Self {
            min,
            max,
            value: value.clamp(min, max),
            dragging: false,
            theme: Theme::default(),
            on_change: None,
        }
    }

    /// Attach the change callback
    #[must_use]
    pub fn on_change(mut self, handler: impl FnMut(&mut WidgetCtx<'_>, f32) + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    /// Current value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Set the value directly, clamped to the range (does not fire the callback)
    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn value_at(&self, rect: Rect, x: i32) -> f32 {
        let span = rect.width().saturating_sub(1).max(1) as f32;
        let t = ((x - rect.x) as f32 / span).clamp(0.0, 1.0);
        self.min + t * (self.max - self.min)
    }

    fn track_pointer(&mut self, ctx: &mut WidgetCtx<'_>, x: i32) {
        let next = self.value_at(ctx.absolute_rect(), x);
        if (next - self.value).abs() < f32::EPSILON {
            return;
        }
        self.value = next;
        ctx.reset();
        if let Some(mut handler) = self.on_change.take() {
            handler(ctx, next);
            self.on_change = Some(handler);
        }
    }
}

impl Widget for Slider {
    fn name(&self) -> &str {
        "slider"
    }

    fn draw(&self, surface: &mut dyn DrawSurface, rect: Rect) {
        // Track line through the vertical middle.
        let track = Rect::new(
            rect.x,
            rect.y + (rect.height() / 2) as i32 - 1,
            rect.width(),
            2,
        );
        surface.fill_rect(track, self.theme.border);

        let t = if self.max > self.min {
            (self.value - self.min) / (self.max - self.min)
        } else {
            0.0
        };
        let travel = rect.width().saturating_sub(KNOB_WIDTH) as f32;
        let knob = Rect::new(
            rect.x + (t * travel).round() as i32,
            rect.y,
            KNOB_WIDTH,
            rect.height(),
        );
        surface.fill_rect(knob, self.theme.fg);
        surface.stroke_rect(knob, self.theme.border);
    }

    fn on_event(&mut self, ctx: &mut WidgetCtx<'_>, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { pos, .. } if ctx.hit(*pos) => {
                self.dragging = true;
                ctx.capture();
                self.track_pointer(ctx, pos.x);
                true
            }
            InputEvent::PointerMove { pos } if self.dragging => {
                self.track_pointer(ctx, pos.x);
                true
            }
            InputEvent::PointerUp { .. } if self.dragging => {
                self.dragging = false;
                ctx.release_capture();
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
