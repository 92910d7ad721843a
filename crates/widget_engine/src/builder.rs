//! Fluent window assembly
//!
//! [`GuiBuilder`] composes the stock widgets into the usual shapes - a
//! titled window, a toolbar, theme controls, a confirm/dismiss dialog -
//! attaches the result to the shell's root, registers every component on the
//! bus, and announces the newcomers with a ping.

use crate::bus::{Packet, PacketData, Response};
use crate::foundation::geometry::Rect;
use crate::shell::Shell;
use crate::theme::Theme;
use crate::tree::NodeId;
use crate::widgets::window::HEADER_HEIGHT;
use crate::widgets::{
    post_cancel, post_ok, toggle_lock, Blinker, Button, HAlign, Label, MultiLabel, Panel, Slider,
    Style, Window,
};

const PAD: i32 = 8;
const ROW_HEIGHT: u32 = 24;
const BUTTON_WIDTH: u32 = 80;

/// Glyph size for the title-bar icon button
///
/// A zero scale means the glyph's native size; anything above zero
/// interpolates toward the largest size the header can hold.
fn icon_font_px(scale: f32) -> u32 {
    let native = Style::Normal.font_px() as f32;
    let best_fit = (HEADER_HEIGHT - 8) as f32;
    if scale <= 0.0 {
        return native as u32;
    }
    (native + (best_fit - native) * scale.min(1.0)).round() as u32
}

/// Fluent builder for a window and its contents
pub struct GuiBuilder {
    rect: Rect,
    title: Option<String>,
    icon_scale: f32,
    toolbar_divisor: Option<u32>,
    with_controls: bool,
    dialog_message: Option<String>,
}

/// Keys of everything a build produced
pub struct BuiltWindow {
    /// The window node, attached to the shell root
    pub window: NodeId,
    /// The toolbar panel, when one was requested
    pub toolbar: Option<NodeId>,
    /// The hue slider, when controls were requested
    pub hue_slider: Option<NodeId>,
    /// The contrast slider, when controls were requested
    pub contrast_slider: Option<NodeId>,
}

impl GuiBuilder {
    /// Start a build for a window at the given rectangle
    pub fn create(rect: Rect) -> Self {
        Self {
            rect,
            title: None,
            icon_scale: 0.0,
            toolbar_divisor: None,
            with_controls: false,
            dialog_message: None,
        }
    }

    /// Add a header title and a lock-toggle icon button
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Scale the title-bar icon glyph (0.0 keeps its native size)
    #[must_use]
    pub fn with_icon_scale(mut self, scale: f32) -> Self {
        self.icon_scale = scale;
        self
    }

    /// Add a toolbar strip taking `1/divisor` of the content height
    #[must_use]
    pub fn with_toolbar(mut self, divisor: u32) -> Self {
        self.toolbar_divisor = Some(divisor.max(1));
        self
    }

    /// Add the theme controls: hue and contrast sliders with labels
    #[must_use]
    pub fn with_controls(mut self) -> Self {
        self.with_controls = true;
        self
    }

    /// Turn the window into a dialog: wrapped message plus OK and CANCEL
    #[must_use]
    pub fn as_dialog(mut self, message: impl Into<String>) -> Self {
        self.dialog_message = Some(message.into());
        self
    }

    /// Assemble the window, attach it to the root, register, and ping
    pub fn build(self, shell: &mut Shell) -> BuiltWindow {
        let root = shell.root();
        let window = shell.tree().insert(Window::new(), self.rect);
        shell.tree().add(root, window);
        shell.register(window);

        if let Some(title) = &self.title {
            self.build_header(shell, window, title);
        }

        let content = Rect::new(
            PAD,
            HEADER_HEIGHT as i32 + PAD,
            self.rect.width().saturating_sub(2 * PAD as u32).max(1),
            self.rect
                .height()
                .saturating_sub(HEADER_HEIGHT + 2 * PAD as u32)
                .max(1),
        );

        let mut cursor_y = content.y;
        let mut toolbar = None;
        if let Some(divisor) = self.toolbar_divisor {
            let height = (content.height() / divisor).max(ROW_HEIGHT);
            let key = shell
                .tree()
                .insert(Panel::new(), Rect::new(content.x, cursor_y, content.width(), height));
            shell.tree().add(window, key);
            shell.tree().set_passthrough(key, true);
            shell.register(key);
            cursor_y += height as i32 + PAD;
            toolbar = Some(key);
        }

        let mut hue_slider = None;
        let mut contrast_slider = None;
        if self.with_controls {
            let (host, mut area) = match toolbar {
                Some(key) => {
                    let rect = shell.tree().node(key).map(|n| n.rect()).unwrap_or_default();
                    (key, Rect::new(PAD, PAD, rect.width().saturating_sub(2 * PAD as u32).max(1), rect.height()))
                }
                None => {
                    let rect = Rect::new(content.x, cursor_y, content.width(), content.height());
                    cursor_y += 2 * (ROW_HEIGHT as i32 + PAD);
                    (window, rect)
                }
            };

            hue_slider = Some(Self::control_row(
                shell,
                host,
                &mut area,
                "Hue",
                Slider::new(0.0, 360.0, Theme::default().hue).on_change(|ctx, hue| {
                    let Some(sender) = ctx.address() else { return };
                    ctx.post(Packet::broadcast(
                        sender,
                        Response::Theme,
                        PacketData::Theme(Theme::from_hue(hue)),
                    ));
                }),
            ));
            contrast_slider = Some(Self::control_row(
                shell,
                host,
                &mut area,
                "Contrast",
                Slider::new(0.0, 100.0, Theme::DEFAULT_CONTRAST).on_change(|ctx, level| {
                    let Some(sender) = ctx.address() else { return };
                    ctx.post(Packet::broadcast(
                        sender,
                        Response::Contrast,
                        PacketData::Scalar(level / 100.0),
                    ));
                }),
            ));
        }

        if let Some(message) = &self.dialog_message {
            self.build_dialog(shell, window, content, cursor_y, message);
        }

        shell.ping();
        log::info!(
            "built window {:?} (\"{}\")",
            window,
            self.title.as_deref().unwrap_or("untitled")
        );
        BuiltWindow {
            window,
            toolbar,
            hue_slider,
            contrast_slider,
        }
    }

    fn build_header(&self, shell: &mut Shell, window: NodeId, title: &str) {
        let icon_side = HEADER_HEIGHT.saturating_sub(8).max(1);
        let icon = shell.tree().insert(
            Button::new("\u{1F512}")
                .with_style(style_for_px(icon_font_px(self.icon_scale)))
                .on_click(move |ctx| toggle_lock(ctx, window)),
            Rect::new(4, 4, icon_side, icon_side),
        );
        shell.tree().add(window, icon);
        shell.register(icon);

        let label_x = icon_side as i32 + PAD;
        let label = shell.tree().insert(
            Label::new(title).with_halign(HAlign::Left),
            Rect::new(
                label_x,
                0,
                self.rect.width().saturating_sub(label_x as u32).max(1),
                HEADER_HEIGHT,
            ),
        );
        shell.tree().add(window, label);
        shell.tree().set_passthrough(label, true);
        shell.register(label);

        let lamp_side = 8;
        let lamp = shell.tree().insert(
            Blinker::new(),
            Rect::new(
                self.rect.width() as i32 - lamp_side - 4,
                (HEADER_HEIGHT as i32 - lamp_side) / 2,
                lamp_side as u32,
                lamp_side as u32,
            ),
        );
        shell.tree().add(window, lamp);
        shell.tree().set_passthrough(lamp, true);
        shell.register(lamp);
    }

    fn control_row(
        shell: &mut Shell,
        host: NodeId,
        area: &mut Rect,
        caption: &str,
        slider: Slider,
    ) -> NodeId {
        let label_width = 80u32;
        let label = shell.tree().insert(
            Label::new(caption)
                .with_style(Style::Small)
                .with_halign(HAlign::Left),
            Rect::new(area.x, area.y, label_width, ROW_HEIGHT),
        );
        shell.tree().add(host, label);
        shell.tree().set_passthrough(label, true);
        shell.register(label);

        let slider_x = area.x + label_width as i32 + PAD;
        let key = shell.tree().insert(
            slider,
            Rect::new(
                slider_x,
                area.y,
                area.width()
                    .saturating_sub(label_width + PAD as u32)
                    .max(1),
                ROW_HEIGHT,
            ),
        );
        shell.tree().add(host, key);
        shell.register(key);

        area.y += ROW_HEIGHT as i32 + PAD;
        key
    }

    fn build_dialog(
        &self,
        shell: &mut Shell,
        window: NodeId,
        content: Rect,
        cursor_y: i32,
        message: &str,
    ) {
        let buttons_h = ROW_HEIGHT + PAD as u32;
        let body_h = ((content.bottom() - cursor_y).max(1) as u32)
            .saturating_sub(buttons_h)
            .max(1);
        let body = shell.tree().insert(
            MultiLabel::new(message),
            Rect::new(content.x, cursor_y, content.width(), body_h),
        );
        shell.tree().add(window, body);
        shell.tree().set_passthrough(body, true);
        shell.register(body);

        let button_y = content.bottom() - ROW_HEIGHT as i32;
        let ok = shell.tree().insert(
            Button::new("OK").on_click(move |ctx| post_ok(ctx, window)),
            Rect::new(
                content.right() - BUTTON_WIDTH as i32,
                button_y,
                BUTTON_WIDTH,
                ROW_HEIGHT,
            ),
        );
        shell.tree().add(window, ok);
        shell.register(ok);

        let cancel = shell.tree().insert(
            Button::new("Cancel").on_click(move |ctx| post_cancel(ctx, window)),
            Rect::new(
                content.right() - 2 * (BUTTON_WIDTH as i32 + PAD),
                button_y,
                BUTTON_WIDTH,
                ROW_HEIGHT,
            ),
        );
        shell.tree().add(window, cancel);
        shell.register(cancel);
    }
}

fn style_for_px(px: u32) -> Style {
    if px >= Style::Big.font_px() {
        Style::Big
    } else if px > Style::Small.font_px() {
        Style::Normal
    } else {
        Style::Small
    }
}
