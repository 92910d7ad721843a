//! Widget behavior trait and handler context
//!
//! Behavior is split into three capability seams - drawing, event
//! consumption, and message handling - expressed as default methods on one
//! trait so concrete widgets override only what they need.

use std::any::Any;

use super::dispatch::InputEvent;
use super::node::Node;
use super::{NodeId, WidgetTree};
use crate::bus::{Address, AddressBus, Packet, PacketData, Response};
use crate::foundation::geometry::{Point, Rect};
use crate::surface::DrawSurface;
use crate::theme::Theme;

/// Behavior attached to a tree node
///
/// All methods have defaults: a plain node consumes pointer-down events
/// inside its own bounds (unless passthrough), answers liveness pings, and
/// applies theme broadcasts. Handlers receive a [`WidgetCtx`] rather than the
/// tree directly; the node's own widget is temporarily detached while a
/// handler runs, so a handler can never re-entrantly invoke itself.
pub trait Widget: 'static {
    /// Display name, used in liveness replies and logs
    fn name(&self) -> &str {
        "widget"
    }

    /// Per-frame state update
    fn update(&mut self, _ctx: &mut WidgetCtx<'_>, _dt: f32) {}

    /// Draw this widget's own visuals into the given absolute rectangle
    ///
    /// Children are drawn by the caller after this returns (back-to-front),
    /// so later siblings paint over earlier ones.
    fn draw(&self, _surface: &mut dyn DrawSurface, _rect: Rect) {}

    /// Offer an input event; return true when consumed
    ///
    /// Called only after all children declined. The default consumes a
    /// pointer-down inside the node's absolute bounds, which is what makes
    /// opaque panels block clicks from reaching whatever is behind them.
    fn on_event(&mut self, ctx: &mut WidgetCtx<'_>, event: &InputEvent) -> bool {
        if ctx.is_passthrough() {
            return false;
        }
        match event {
            InputEvent::PointerDown { pos, .. } => ctx.hit(*pos),
            _ => false,
        }
    }

    /// Handle a delivered bus packet
    ///
    /// The default implements the shared protocol: answer foreign pings with
    /// a pong, apply theme and contrast broadcasts. Overriders that still
    /// want the protocol re-dispatch the kinds they care about (see
    /// [`reply_ping`]).
    fn on_message(&mut self, ctx: &mut WidgetCtx<'_>, packet: &Packet) {
        match (&packet.response, &packet.data) {
            (Response::Ping, PacketData::Ping { sent }) => {
                reply_ping(ctx, self.name(), packet.sender, *sent);
            }
            (Response::Theme, PacketData::Theme(theme)) => self.apply_theme(theme),
            (Response::Contrast, PacketData::Scalar(factor)) => self.apply_contrast(*factor),
            _ => {}
        }
    }

    /// Apply a new color palette to this widget's rendering state
    fn apply_theme(&mut self, _theme: &Theme) {}

    /// Apply a new contrast factor (0.0-1.0) to the current palette
    fn apply_contrast(&mut self, _factor: f32) {}

    /// Upcast for downcasting to the concrete widget type
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete widget type
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Reply to a liveness ping on behalf of the named widget
///
/// Posts a pong addressed back to the ping's sender, carrying this node's
/// address, display name, and the timestamp echoed from the ping. A node
/// never answers its own ping - the bus delivers broadcasts to the sender
/// too, and the exclusion is the receiver's job.
pub fn reply_ping(ctx: &mut WidgetCtx<'_>, name: &str, ping_sender: Address, sent: f64) {
    let Some(own) = ctx.address() else {
        return;
    };
    if own == ping_sender {
        return;
    }
    ctx.post(Packet::new(
        ping_sender,
        own,
        Response::Pong,
        PacketData::Pong {
            address: own,
            name: name.to_owned(),
            observed: sent,
        },
    ));
}

/// Handler context: the node's view of the tree and bus while a handler runs
pub struct WidgetCtx<'a> {
    tree: &'a mut WidgetTree,
    bus: &'a mut AddressBus,
    key: NodeId,
}

impl<'a> WidgetCtx<'a> {
    /// Create a context for the given node
    pub fn new(tree: &'a mut WidgetTree, bus: &'a mut AddressBus, key: NodeId) -> Self {
        Self { tree, bus, key }
    }

    /// Key of the node this handler runs on
    pub fn key(&self) -> NodeId {
        self.key
    }

    /// The whole tree, for structural operations on other nodes
    pub fn tree(&mut self) -> &mut WidgetTree {
        self.tree
    }

    /// The address bus
    pub fn bus(&mut self) -> &mut AddressBus {
        self.bus
    }

    /// This node's local rectangle
    pub fn rect(&self) -> Rect {
        self.tree.node(self.key).map(Node::rect).unwrap_or_default()
    }

    /// This node's absolute rectangle
    pub fn absolute_rect(&self) -> Rect {
        self.tree.absolute_rect(self.key).unwrap_or_default()
    }

    /// Whether an absolute point falls inside this node's bounds
    pub fn hit(&self, pos: Point) -> bool {
        self.absolute_rect().contains(pos)
    }

    /// Whether this node has the passthrough flag set
    pub fn is_passthrough(&self) -> bool {
        self.tree.node(self.key).is_some_and(Node::is_passthrough)
    }

    /// This node's bus address, if registered
    pub fn address(&self) -> Option<Address> {
        self.tree.node(self.key).and_then(Node::address)
    }

    /// This node's parent, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.tree.node(self.key).and_then(Node::parent)
    }

    /// Seconds on the bus clock
    pub fn now(&self) -> f64 {
        self.bus.now()
    }

    /// Queue a packet for the next bus flush
    pub fn post(&mut self, packet: Packet) {
        self.bus.post(packet);
    }

    /// Move this node to a new local position and invalidate
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.tree.set_position(self.key, x, y);
    }

    /// Resize this node (clamped to >= 1) and invalidate
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.tree.set_size(self.key, width, height);
    }

    /// Move this node to the front of its parent's z-order
    pub fn bring_to_front(&mut self) {
        self.tree.bring_to_front(self.key);
    }

    /// Move this node to the back of its parent's z-order
    pub fn send_to_back(&mut self) {
        self.tree.send_to_back(self.key);
    }

    /// Start a modal pointer capture on this node
    pub fn capture(&mut self) {
        self.tree.capture(self.key);
    }

    /// Release this node's pointer capture
    pub fn release_capture(&mut self) {
        self.tree.release_capture(self.key);
    }

    /// Mark this node's ancestry dirty
    pub fn reset(&mut self) {
        self.tree.reset(self.key);
    }

    /// Destroy this node and its subtree
    pub fn destroy_self(&mut self) {
        self.tree.destroy(self.key);
    }

    /// Downcast another node's widget to a concrete type
    ///
    /// Returns `None` for this node itself: its widget is detached while the
    /// handler runs.
    pub fn widget_as_mut<W: Widget>(&mut self, key: NodeId) -> Option<&mut W> {
        self.tree.widget_as_mut(key)
    }
}
