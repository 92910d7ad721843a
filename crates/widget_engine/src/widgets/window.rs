//! Draggable window with edge snapping, lock toggle, and dialog replies

use std::any::Any;

use crate::bus::{Packet, PacketData, Response, MASTER};
use crate::foundation::geometry::{Point, Rect};
use crate::surface::DrawSurface;
use crate::theme::Theme;
use crate::tree::{InputEvent, NodeId, Widget, WidgetCtx};

/// Height of the drag header strip in pixels
pub const HEADER_HEIGHT: u32 = 28;

/// Pixel distance at which a dragged edge sticks to a sibling window's edge
pub const SNAP_THRESHOLD: i32 = 10;

/// A top-level floating window
///
/// Pressing the header brings the window to the front and starts a drag with
/// the pointer captured; while dragging, edges within [`SNAP_THRESHOLD`] of a
/// sibling window's edges snap flush. A locked window still raises on press
/// but refuses to move.
pub struct Window {
    theme: Theme,
    locked: bool,
    // Pointer offset from the window origin while a drag is in progress.
    drag_grab: Option<Point>,
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl Window {
    /// Create an unlocked window
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
            locked: false,
            drag_grab: None,
        }
    }

    /// Whether dragging is currently disabled
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Enable or disable dragging
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.drag_grab = None;
        }
    }

    fn header_rect(abs: Rect) -> Rect {
        Rect::new(abs.x, abs.y, abs.width(), HEADER_HEIGHT.min(abs.height()))
    }

    fn sibling_rects(ctx: &mut WidgetCtx<'_>) -> Vec<Rect> {
        let own = ctx.key();
        let Some(parent) = ctx.parent() else {
            return Vec::new();
        };
        let siblings: Vec<NodeId> = ctx
            .tree()
            .node(parent)
            .map(|n| n.children().to_vec())
            .unwrap_or_default();
        let mut rects = Vec::new();
        for key in siblings {
            if key == own || ctx.tree().widget_as_mut::<Self>(key).is_none() {
                continue;
            }
            if let Some(rect) = ctx.tree().absolute_rect(key) {
                rects.push(rect);
            }
        }
        rects
    }

    fn snap_axis(lo: i32, hi: i32, other_lo: i32, other_hi: i32) -> Option<i32> {
        // Flush-outside first (adjacent edges), then flush-aligned.
        for (mine, theirs, shift) in [
            (lo, other_hi, other_hi - lo),
            (hi, other_lo, other_lo - hi),
            (lo, other_lo, other_lo - lo),
            (hi, other_hi, other_hi - hi),
        ] {
            if (mine - theirs).abs() <= SNAP_THRESHOLD {
                return Some(shift);
            }
        }
        None
    }

    fn snapped(proposed: Rect, siblings: &[Rect]) -> Rect {
        let mut dx = None;
        let mut dy = None;
        for other in siblings {
            if dx.is_none() {
                dx = Self::snap_axis(proposed.x, proposed.right(), other.x, other.right());
            }
            if dy.is_none() {
                dy = Self::snap_axis(proposed.y, proposed.bottom(), other.y, other.bottom());
            }
        }
        proposed.translated(dx.unwrap_or(0), dy.unwrap_or(0))
    }

    fn drag_to(&self, ctx: &mut WidgetCtx<'_>, pos: Point, grab: Point) {
        let rect = ctx.rect();
        let parent_origin = {
            let abs = ctx.absolute_rect();
            Point {
                x: abs.x - rect.x,
                y: abs.y - rect.y,
            }
        };
        let proposed_abs = rect.at(pos.x - grab.x, pos.y - grab.y).translated(
            parent_origin.x,
            parent_origin.y,
        );
        let snapped = Self::snapped(proposed_abs, &Self::sibling_rects(ctx));
        ctx.set_position(snapped.x - parent_origin.x, snapped.y - parent_origin.y);
    }
}

impl Widget for Window {
    fn name(&self) -> &str {
        "window"
    }

    fn draw(&self, surface: &mut dyn DrawSurface, rect: Rect) {
        surface.fill_rect(rect, self.theme.bg);
        surface.fill_rect(Self::header_rect(rect), self.theme.border);
        surface.stroke_rect(rect, self.theme.fg);
    }

    fn on_event(&mut self, ctx: &mut WidgetCtx<'_>, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { pos, .. } if ctx.hit(*pos) => {
                ctx.bring_to_front();
                let abs = ctx.absolute_rect();
                if !self.locked && Self::header_rect(abs).contains(*pos) {
                    self.drag_grab = Some(Point {
                        x: pos.x - abs.x,
                        y: pos.y - abs.y,
                    });
                    ctx.capture();
                }
                // The body is opaque either way.
                true
            }
            InputEvent::PointerMove { pos } => {
                let Some(grab) = self.drag_grab else {
                    return false;
                };
                self.drag_to(ctx, *pos, grab);
                true
            }
            InputEvent::PointerUp { .. } if self.drag_grab.is_some() => {
                self.drag_grab = None;
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

/// Flip a window's drag lock and announce the new state on the bus
///
/// Called from the title-bar icon button's click handler, so `ctx` belongs to
/// the button and the window is reached by key.
pub fn toggle_lock(ctx: &mut WidgetCtx<'_>, window: NodeId) {
    let Some(address) = ctx.tree().node(window).and_then(|n| n.address()) else {
        return;
    };
    let locked = {
        let Some(widget) = ctx.widget_as_mut::<Window>(window) else {
            return;
        };
        widget.set_locked(!widget.is_locked());
        widget.is_locked()
    };
    log::info!("window {address:?} lock -> {locked}");
    ctx.post(Packet::broadcast(
        address,
        Response::Lock,
        PacketData::Lock { locked, address },
    ));
}

/// Confirm a dialog: broadcast OK, say goodbye to the host, tear down
pub fn post_ok(ctx: &mut WidgetCtx<'_>, window: NodeId) {
    close_with(ctx, window, Response::Ok);
}

/// Dismiss a dialog: broadcast CANCEL, say goodbye to the host, tear down
pub fn post_cancel(ctx: &mut WidgetCtx<'_>, window: NodeId) {
    close_with(ctx, window, Response::Cancel);
}

fn close_with(ctx: &mut WidgetCtx<'_>, window: NodeId, verdict: Response) {
    let Some(address) = ctx.tree().node(window).and_then(|n| n.address()) else {
        return;
    };
    // BYE must go out while the window is still registered.
    ctx.post(Packet::broadcast(address, verdict, PacketData::None));
    ctx.post(Packet::new(MASTER, address, Response::Bye, PacketData::None));
    ctx.tree().destroy(window);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::AddressBus;
    use crate::tree::{dispatch_event, PointerButton, WidgetTree};
    use crate::widgets::Panel;

    struct Rig {
        tree: WidgetTree,
        bus: AddressBus,
        root: NodeId,
    }

    impl Rig {
        fn new() -> Self {
            let mut tree = WidgetTree::new();
            let root = tree.insert(Panel::new(), Rect::new(0, 0, 800, 600));
            Self {
                tree,
                bus: AddressBus::new(),
                root,
            }
        }

        fn window(&mut self, rect: Rect) -> NodeId {
            let key = self.tree.insert(Window::new(), rect);
            self.tree.add(self.root, key);
            self.bus.register(&mut self.tree, key);
            key
        }

        fn press(&mut self, x: i32, y: i32) -> bool {
            dispatch_event(
                &mut self.tree,
                &mut self.bus,
                self.root,
                &InputEvent::PointerDown {
                    pos: Point { x, y },
                    button: PointerButton::Left,
                },
            )
        }

        fn drag(&mut self, x: i32, y: i32) -> bool {
            dispatch_event(
                &mut self.tree,
                &mut self.bus,
                self.root,
                &InputEvent::PointerMove {
                    pos: Point { x, y },
                },
            )
        }

        fn release(&mut self, x: i32, y: i32) -> bool {
            dispatch_event(
                &mut self.tree,
                &mut self.bus,
                self.root,
                &InputEvent::PointerUp {
                    pos: Point { x, y },
                    button: PointerButton::Left,
                },
            )
        }
    }

    #[test]
    fn test_header_press_starts_captured_drag() {
        let mut rig = Rig::new();
        let win = rig.window(Rect::new(100, 100, 200, 150));
        assert!(rig.press(150, 110));
        assert_eq!(rig.tree.captured(), Some(win));

        rig.drag(250, 210);
        let rect = rig.tree.node(win).unwrap().rect();
        assert_eq!((rect.x, rect.y), (200, 200));

        rig.release(250, 210);
        assert_eq!(rig.tree.captured(), None);
    }

    #[test]
    fn test_body_press_raises_without_dragging() {
        let mut rig = Rig::new();
        let win = rig.window(Rect::new(100, 100, 200, 150));
        let other = rig.window(Rect::new(400, 100, 200, 150));
        // `other` was added last and sits in front; clicking `win`'s body
        // raises it but must not start a drag.
        assert!(rig.press(150, 200));
        assert_eq!(rig.tree.node(rig.root).unwrap().children().last(), Some(&win));
        assert_eq!(rig.tree.captured(), None);
        let _ = other;
    }

    #[test]
    fn test_locked_window_raises_but_stays_put() {
        let mut rig = Rig::new();
        let win = rig.window(Rect::new(100, 100, 200, 150));
        rig.tree
            .widget_as_mut::<Window>(win)
            .unwrap()
            .set_locked(true);

        assert!(rig.press(150, 110));
        assert_eq!(rig.tree.captured(), None);
        rig.drag(500, 500);
        let rect = rig.tree.node(win).unwrap().rect();
        assert_eq!((rect.x, rect.y), (100, 100));
    }

    #[test]
    fn test_drag_snaps_to_sibling_edge() {
        let mut rig = Rig::new();
        let anchor = rig.window(Rect::new(100, 100, 200, 150));
        let win = rig.window(Rect::new(500, 100, 200, 150));

        rig.press(550, 110);
        // Drop the left edge 7px short of the anchor's right edge (300).
        rig.drag(357, 110);
        let rect = rig.tree.node(win).unwrap().rect();
        assert_eq!(rect.x, 300);
        let _ = anchor;
    }

    #[test]
    fn test_far_drag_does_not_snap() {
        let mut rig = Rig::new();
        let _anchor = rig.window(Rect::new(100, 100, 200, 150));
        let win = rig.window(Rect::new(500, 300, 200, 150));

        rig.press(550, 310);
        rig.drag(600, 360);
        let rect = rig.tree.node(win).unwrap().rect();
        assert_eq!((rect.x, rect.y), (550, 350));
    }

    #[test]
    fn test_toggle_lock_broadcasts_new_state() {
        let mut rig = Rig::new();
        let win = rig.window(Rect::new(100, 100, 200, 150));
        let address = rig.tree.node(win).unwrap().address().unwrap();

        let button = rig.tree.insert(Panel::new(), Rect::default());
        rig.tree.add(win, button);
        let widget = rig.tree.take_widget(button).unwrap();
        {
            let mut ctx = WidgetCtx::new(&mut rig.tree, &mut rig.bus, button);
            toggle_lock(&mut ctx, win);
        }
        rig.tree.put_widget(button, widget);

        assert!(rig.tree.widget_as_mut::<Window>(win).unwrap().is_locked());
        let packet = rig.bus.peek_queue().next().unwrap();
        assert_eq!(packet.response, Response::Lock);
        assert_eq!(
            packet.data,
            PacketData::Lock {
                locked: true,
                address
            }
        );
    }

    #[test]
    fn test_ok_broadcasts_then_destroys() {
        let mut rig = Rig::new();
        let win = rig.window(Rect::new(100, 100, 200, 150));
        let address = rig.tree.node(win).unwrap().address().unwrap();

        let button = rig.tree.insert(Panel::new(), Rect::default());
        rig.tree.add(win, button);
        // The handler destroys the button's own subtree, so the detached
        // widget is simply dropped instead of being put back.
        let widget = rig.tree.take_widget(button).unwrap();
        {
            let mut ctx = WidgetCtx::new(&mut rig.tree, &mut rig.bus, button);
            post_ok(&mut ctx, win);
        }
        drop(widget);

        let queued: Vec<(Response, crate::bus::Address)> = rig
            .bus
            .peek_queue()
            .map(|p| (p.response, p.receiver))
            .collect();
        assert_eq!(
            queued,
            vec![
                (Response::Ok, crate::bus::BROADCAST),
                (Response::Bye, MASTER)
            ]
        );
        assert_eq!(
            rig.bus.peek_queue().map(|p| p.sender).collect::<Vec<_>>(),
            vec![address, address]
        );
        assert!(rig.tree.node(win).unwrap().is_terminated());
    }
}
