//! Bus activity indicator

use std::any::Any;

use crate::bus::{Packet, PacketData, Response};
use crate::foundation::geometry::Rect;
use crate::surface::DrawSurface;
use crate::theme::{Color, Theme};
use crate::tree::{reply_ping, Widget, WidgetCtx};

/// Seconds the indicator stays lit after a packet arrives
const HOLD: f32 = 0.25;

/// A small lamp that lights whenever its node receives a bus packet
///
/// Brightness decays linearly over [`update`](Widget::update), so a steady
/// packet stream reads as a steady glow and a lone packet as a blink.
pub struct Blinker {
    glow: f32,
    theme: Theme,
}

impl Default for Blinker {
    fn default() -> Self {
        Self::new()
    }
}

impl Blinker {
    /// Create an unlit indicator
    pub fn new() -> Self {
        Self {
            glow: 0.0,
            theme: Theme::default(),
        }
    }

    /// Current brightness, 1.0 right after a packet down to 0.0
    pub fn glow(&self) -> f32 {
        self.glow
    }
}

impl Widget for Blinker {
    fn name(&self) -> &str {
        "blinker"
    }

    fn update(&mut self, ctx: &mut WidgetCtx<'_>, dt: f32) {
        if self.glow > 0.0 {
            self.glow = (self.glow - dt / HOLD).max(0.0);
            ctx.reset();
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface, rect: Rect) {
        let lerp = |a: u8, b: u8| -> u8 {
            (f32::from(a) + (f32::from(b) - f32::from(a)) * self.glow).round() as u8
        };
        let off = self.theme.bg;
        let on = self.theme.fg;
        let color = Color::rgb(lerp(off.r, on.r), lerp(off.g, on.g), lerp(off.b, on.b));
        surface.fill_rect(rect, color);
        surface.stroke_rect(rect, self.theme.border);
    }

    fn on_message(&mut self, ctx: &mut WidgetCtx<'_>, packet: &Packet) {
        self.glow = 1.0;
        ctx.reset();
        match (&packet.response, &packet.data) {
            (Response::Ping, PacketData::Ping { sent }) => {
                reply_ping(ctx, self.name(), packet.sender, *sent);
            }
            (Response::Theme, PacketData::Theme(theme)) => self.apply_theme(theme),
            (Response::Contrast, PacketData::Scalar(factor)) => self.apply_contrast(*factor),
            _ => {}
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{Address, AddressBus};
    use crate::tree::WidgetTree;

    #[test]
    fn test_packet_lights_the_lamp() {
        let mut tree = WidgetTree::new();
        let mut bus = AddressBus::new();
        let key = tree.insert(Blinker::new(), Rect::new(0, 0, 8, 8));
        let addr = bus.register(&mut tree, key).unwrap();

        bus.post(Packet::new(addr, Address(9), Response::Ok, PacketData::None));
        bus.pump(&mut tree);

        let blinker = tree.widget_as_mut::<Blinker>(key).unwrap();
        assert!((blinker.glow() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_glow_decays_to_zero() {
        let mut tree = WidgetTree::new();
        let mut bus = AddressBus::new();
        let key = tree.insert(Blinker::new(), Rect::new(0, 0, 8, 8));
        bus.register(&mut tree, key);

        tree.widget_as_mut::<Blinker>(key).unwrap().glow = 1.0;

        let mut widget = tree.take_widget(key).unwrap();
        {
            let mut ctx = WidgetCtx::new(&mut tree, &mut bus, key);
            widget.update(&mut ctx, HOLD * 2.0);
        }
        tree.put_widget(key, widget);

        let blinker = tree.widget_as_mut::<Blinker>(key).unwrap();
        assert!(blinker.glow().abs() < f32::EPSILON);
    }
}
