//! Root host widget

use std::any::Any;

use crate::bus::{Packet, PacketData, Response};
use crate::foundation::geometry::Rect;
use crate::surface::DrawSurface;
use crate::theme::Theme;
use crate::tree::{reply_ping, Widget, WidgetCtx};

/// The widget behind the tree root
///
/// The shell registers it first, so it holds [`MASTER`](crate::bus::MASTER)
/// and receives every lifecycle notification: BYE from departing windows,
/// OK/CANCEL dialog verdicts, PONG liveness replies (whose round-trip latency
/// it logs). It paints only the background wash.
pub struct Desktop {
    theme: Theme,
    byes: u32,
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new()
    }
}

impl Desktop {
    /// Create the host widget
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
            byes: 0,
        }
    }

    /// Number of BYE notifications received so far
    pub fn byes(&self) -> u32 {
        self.byes
    }
}

impl Widget for Desktop {
    fn name(&self) -> &str {
        "desktop"
    }

    fn draw(&self, surface: &mut dyn DrawSurface, rect: Rect) {
        surface.fill_rect(rect, self.theme.bg);
    }

    fn on_message(&mut self, ctx: &mut WidgetCtx<'_>, packet: &Packet) {
        match (&packet.response, &packet.data) {
            (Response::Bye, _) => {
                self.byes += 1;
                log::info!("{:?} says goodbye", packet.sender);
            }
            (Response::Ok, _) => log::info!("dialog {:?} confirmed", packet.sender),
            (Response::Cancel, _) => log::info!("dialog {:?} dismissed", packet.sender),
            (Response::Pong, PacketData::Pong { name, observed, .. }) => {
                let latency = ctx.now() - observed;
                log::debug!("pong from {name} ({:?}), {latency:.6}s", packet.sender);
            }
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
