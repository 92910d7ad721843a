//! Stock widget collection
//!
//! Every widget here is an ordinary [`Widget`](crate::tree::Widget)
//! implementation; nothing in the tree or bus knows about any of them.

pub mod blinker;
pub mod button;
pub mod desktop;
pub mod label;
pub mod panel;
pub mod pulsar;
pub mod slider;
pub mod window;

pub use blinker::Blinker;
pub use button::Button;
pub use desktop::Desktop;
pub use label::{Label, MultiLabel};
pub use panel::Panel;
pub use pulsar::Pulsar;
pub use slider::Slider;
pub use window::{post_cancel, post_ok, toggle_lock, Window};

/// Text size presets shared by labels and buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Fine print
    Small,
    /// Body text
    #[default]
    Normal,
    /// Headings
    Big,
}

impl Style {
    /// Font size in pixels
    pub const fn font_px(self) -> u32 {
        match self {
            Self::Small => 12,
            Self::Normal => 16,
            Self::Big => 24,
        }
    }
}

/// Horizontal text anchoring inside a widget's rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    /// Anchor to the left edge
    #[default]
    Left,
    /// Center between the edges
    Center,
    /// Anchor to the right edge
    Right,
}

/// Vertical text anchoring inside a widget's rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    /// Anchor to the top edge
    Top,
    /// Center between the edges
    #[default]
    Middle,
    /// Anchor to the bottom edge
    Bottom,
}
