//! Color themes delivered over the address bus
//!
//! A [`Theme`] is computed from a base hue (0-360) and a contrast level
//! (0-100). The palette is derived deterministically, so re-applying the same
//! theme to a widget is idempotent - broadcast order across widgets does not
//! matter.

/// An RGBA color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Color {
    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from HSV components (hue 0-360, sat/val 0-1)
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let hue = hue.rem_euclid(360.0);
        let c = value * saturation;
        let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
        let m = value - c;

        let (r, g, b) = match hue as u32 {
            0..=59 => (c, x, 0.0),
            60..=119 => (x, c, 0.0),
            120..=179 => (0.0, c, x),
            180..=239 => (0.0, x, c),
            240..=299 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::rgb(
            ((r + m) * 255.0).round() as u8,
            ((g + m) * 255.0).round() as u8,
            ((b + m) * 255.0).round() as u8,
        )
    }
}

/// A widget color palette derived from a hue and a contrast level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Base hue in degrees (0-360)
    pub hue: f32,
    /// Contrast level (0-100)
    pub contrast: f32,
    /// Foreground color (text, borders of focused widgets)
    pub fg: Color,
    /// Background fill color
    pub bg: Color,
    /// Border color
    pub border: Color,
}

impl Theme {
    /// Default contrast level used when only a hue is given
    pub const DEFAULT_CONTRAST: f32 = 50.0;

    /// Derive a palette from a base hue with the default contrast
    pub fn from_hue(hue: f32) -> Self {
        Self::new(hue, Self::DEFAULT_CONTRAST)
    }

    /// Derive a palette from a base hue and contrast level
    pub fn new(hue: f32, contrast: f32) -> Self {
        let hue = hue.rem_euclid(360.0);
        let contrast = contrast.clamp(0.0, 100.0);

        // Contrast widens the value gap between background and foreground.
        let spread = 0.25 + 0.5 * (contrast / 100.0);
        let bg_value = (0.55 - spread / 2.0).max(0.05);
        let fg_value = (0.55 + spread / 2.0).min(1.0);

        Self {
            hue,
            contrast,
            fg: Color::from_hsv(hue, 0.15, fg_value),
            bg: Color::from_hsv(hue, 0.45, bg_value),
            border: Color::from_hsv(hue, 0.30, (bg_value + fg_value) / 2.0),
        }
    }

    /// Recompute this palette at a new contrast level, keeping the hue
    pub fn with_contrast(&self, contrast: f32) -> Self {
        Self::new(self.hue, contrast)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_hue(225.0)
    }
}
