//! Drawing abstraction decoupling widgets from any particular backend
//!
//! Widgets paint through [`DrawSurface`] so the tree can be rendered to a
//! real framebuffer, a terminal, or a recording sink in tests without any
//! widget code changing.

use crate::foundation::geometry::Rect;
use crate::theme::Color;

/// Pixel height of a line of text at a given font size, including leading
pub fn line_height(font_px: u32) -> u32 {
    font_px + font_px / 4
}

/// Approximate pixel width of a string at a given font size
///
/// Backends with real font metrics should override text measurement; this
/// monospace-ish estimate (0.6em advance) is what layout and clipping use
/// when nothing better is available.
pub fn text_width(text: &str, font_px: u32) -> u32 {
    let advance = (f64::from(font_px) * 0.6).ceil() as u32;
    text.chars().count() as u32 * advance
}

/// A render target widgets draw into
///
/// Coordinates are absolute pixels; the shell passes each widget its
/// already-resolved absolute rectangle, so implementations never need the
/// tree.
pub trait DrawSurface {
    /// Target dimensions in pixels (width, height)
    fn size(&self) -> (u32, u32);

    /// Fill a rectangle with a solid color
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline a rectangle with a 1px border
    fn stroke_rect(&mut self, rect: Rect, color: Color);

    /// Draw a single line of text anchored at its top-left corner
    fn draw_text(&mut self, pos: crate::foundation::geometry::Point, text: &str, font_px: u32, color: Color);

    /// Measure a string; backends with font metrics should override
    fn measure_text(&self, text: &str, font_px: u32) -> u32 {
        text_width(text, font_px)
    }
}

/// Surface that logs each primitive instead of rasterizing
///
/// Useful for headless runs where the frame contract still needs exercising.
pub struct LoggingSurface {
    width: u32,
    height: u32,
}

impl LoggingSurface {
    /// Create a surface reporting the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl DrawSurface for LoggingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        log::trace!("fill {rect:?} {color:?}");
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        log::trace!("stroke {rect:?} {color:?}");
    }

    fn draw_text(&mut self, pos: crate::foundation::geometry::Point, text: &str, font_px: u32, color: Color) {
        log::trace!("text {pos:?} {font_px}px {color:?} {text:?}");
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use crate::foundation::geometry::Point;

    /// One recorded draw call
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Fill(Rect, Color),
        Stroke(Rect, Color),
        Text(Point, String, u32, Color),
    }

    /// Surface that captures every primitive for assertions
    pub struct RecordingSurface {
        pub width: u32,
        pub height: u32,
        pub ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ops: Vec::new(),
            }
        }

        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text(_, text, _, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl DrawSurface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ops.push(DrawOp::Fill(rect, color));
        }

        fn stroke_rect(&mut self, rect: Rect, color: Color) {
            self.ops.push(DrawOp::Stroke(rect, color));
        }

        fn draw_text(&mut self, pos: Point, text: &str, font_px: u32, color: Color) {
            self.ops.push(DrawOp::Text(pos, text.to_string(), font_px, color));
        }
    }
}
