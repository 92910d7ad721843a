//! Geometry primitives for widget layout and hit testing

/// A point in pixel coordinates (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// X coordinate in pixels
    pub x: i32,
    /// Y coordinate in pixels
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with a guaranteed non-degenerate size
///
/// Width and height are clamped to at least one pixel on every construction
/// and mutation, so downstream code never has to handle empty rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// X coordinate of the top-left corner
    pub x: i32,
    /// Y coordinate of the top-left corner
    pub y: i32,
    width: u32,
    height: u32,
}

impl Rect {
    /// Create a new rectangle; width and height are clamped to >= 1
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Get the width in pixels (always >= 1)
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels (always >= 1)
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set the width, clamped to >= 1
    pub fn set_width(&mut self, width: u32) {
        self.width = width.max(1);
    }

    /// Set the height, clamped to >= 1
    pub fn set_height(&mut self, height: u32) {
        self.height = height.max(1);
    }

    /// Get the top-left corner as a point
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// X coordinate of the right edge (exclusive)
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Y coordinate of the bottom edge (exclusive)
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Check if a point is inside the rectangle
    ///
    /// The left/top edges are inclusive, the right/bottom edges exclusive,
    /// so adjacent rectangles never both claim a point.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Return a copy of this rectangle translated by the given offset
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
        }
    }

    /// Return a copy of this rectangle moved to the given position
    pub fn at(&self, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0, 0, 1, 1)
    }
}
