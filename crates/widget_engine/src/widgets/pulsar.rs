//! Pulsing bus activity indicator

use std::any::Any;

use crate::bus::{Packet, PacketData, Response};
use crate::foundation::geometry::Rect;
use crate::surface::DrawSurface;
use crate::theme::{Color, Theme};
use crate::tree::{reply_ping, Widget, WidgetCtx};

/// Seconds a pulse stays active after a packet arrives
const ACTIVE_HOLD: f32 = 0.15;

/// Phase units advanced per second while active
const RAMP_SPEED: f32 = 15.0;

/// Brightness shown while no pulse is running
const IDLE: f32 = 0.2;

/// A lamp that fires a short fading pulse whenever its node receives a packet
///
/// Unlike [`Blinker`](super::Blinker), which holds full brightness and decays,
/// the pulse ramps up over a few frames and fades out with the activity timer,
/// then settles back to a dim idle glow.
pub struct Pulsar {
    phase: f32,
    hold: f32,
    active: bool,
    theme: Theme,
}

impl Default for Pulsar {
    fn default() -> Self {
        Self::new()
    }
}

impl Pulsar {
    /// Create an idle indicator
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            hold: 0.0,
            active: false,
            theme: Theme::default(),
        }
    }

    /// Whether a pulse is currently running
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current brightness, [`IDLE`] when quiet up to 1.0 at the pulse peak
    pub fn level(&self) -> f32 {
        if self.active {
            let ramp = self.phase.min(1.0);
            let fade = (self.hold / ACTIVE_HOLD).max(0.0);
            (ramp * fade).max(IDLE)
        } else {
            IDLE
        }
    }

    fn trigger(&mut self) {
        self.active = true;
        self.hold = ACTIVE_HOLD;
        self.phase = 0.0;
    }
}

impl Widget for Pulsar {
    fn name(&self) -> &str {
        "pulsar"
    }

    fn update(&mut self, ctx: &mut WidgetCtx<'_>, dt: f32) {
        if self.active {
            self.phase += dt * RAMP_SPEED;
            self.hold -= dt;
            if self.hold <= 0.0 {
                self.active = false;
            }
            ctx.reset();
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface, rect: Rect) {
        let level = self.level();
        let lerp = |a: u8, b: u8| -> u8 {
            (f32::from(a) + (f32::from(b) - f32::from(a)) * level).round() as u8
        };
        let off = self.theme.bg;
        let on = self.theme.fg;
        let color = Color::rgb(lerp(off.r, on.r), lerp(off.g, on.g), lerp(off.b, on.b));
        surface.fill_rect(rect, color);
        surface.stroke_rect(rect, self.theme.border);
    }

    fn on_message(&mut self, ctx: &mut WidgetCtx<'_>, packet: &Packet) {
        self.trigger();
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
