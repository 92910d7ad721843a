//! Input event routing through the component tree
//!
//! Events are offered to children in front-to-back order (the reverse of
//! draw order) so the visually topmost node gets first refusal; the first
//! consumer stops propagation. A node holding the pointer capture receives
//! every event directly, regardless of position, until it releases.

use super::widget::WidgetCtx;
use super::{NodeId, WidgetTree};
use crate::bus::AddressBus;
use crate::foundation::geometry::Point;

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left (primary) button
    Left,
    /// Right button
    Right,
    /// Middle button
    Middle,
}

/// An input event in absolute surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A pointer button was pressed
    PointerDown {
        /// Absolute position
        pos: Point,
        /// Which button
        button: PointerButton,
    },
    /// A pointer button was released
    PointerUp {
        /// Absolute position
        pos: Point,
        /// Which button
        button: PointerButton,
    },
    /// The pointer moved
    PointerMove {
        /// Absolute position
        pos: Point,
    },
}

impl InputEvent {
    /// Left-button press at the given position
    pub fn pointer_down(pos: Point) -> Self {
        Self::PointerDown {
            pos,
            button: PointerButton::Left,
        }
    }

    /// Left-button release at the given position
    pub fn pointer_up(pos: Point) -> Self {
        Self::PointerUp {
            pos,
            button: PointerButton::Left,
        }
    }

    /// Position carried by the event
    pub fn pos(&self) -> Point {
        match self {
            Self::PointerDown { pos, .. } | Self::PointerUp { pos, .. } | Self::PointerMove { pos } => {
                *pos
            }
        }
    }
}

/// Route one input event into the tree rooted at `root`
///
/// Returns true when some node consumed the event; the caller must not apply
/// any further default handling in that case.
pub fn dispatch_event(
    tree: &mut WidgetTree,
    bus: &mut AddressBus,
    root: NodeId,
    event: &InputEvent,
) -> bool {
    // A modal capture short-circuits traversal entirely.
    if let Some(captured) = tree.captured() {
        return deliver(tree, bus, captured, event);
    }
    offer(tree, bus, root, event)
}

/// Offer the event to a subtree: children front-to-back, then the node itself
fn offer(tree: &mut WidgetTree, bus: &mut AddressBus, key: NodeId, event: &InputEvent) -> bool {
    let Some(node) = tree.node(key) else {
        return false;
    };
    if !node.is_visible() || !node.is_active() || node.is_terminated() {
        return false;
    }

    let children = node.children().to_vec();
    for child in children.into_iter().rev() {
        if offer(tree, bus, child, event) {
            return true;
        }
    }

    deliver(tree, bus, key, event)
}

fn deliver(tree: &mut WidgetTree, bus: &mut AddressBus, key: NodeId, event: &InputEvent) -> bool {
    let Some(mut widget) = tree.take_widget(key) else {
        return false;
    };
    let consumed = {
        let mut ctx = WidgetCtx::new(tree, bus, key);
        widget.on_event(&mut ctx, event)
    };
    if consumed {
        log::trace!("{} consumed {event:?}", widget.name());
    }
    tree.put_widget(key, widget);
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::geometry::Rect;
    use crate::tree::Widget;
    use std::any::Any;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Records offers and consumes according to a fixed policy
    struct Probe {
        label: &'static str,
        consume: bool,
        offers: Rc<Cell<u32>>,
        order: Rc<std::cell::RefCell<Vec<&'static str>>>,
    }

    impl Widget for Probe {
        fn name(&self) -> &str {
            self.label
        }

        fn on_event(&mut self, ctx: &mut WidgetCtx<'_>, event: &InputEvent) -> bool {
            self.offers.set(self.offers.get() + 1);
            self.order.borrow_mut().push(self.label);
            match event {
                InputEvent::PointerDown { pos, .. } => self.consume && ctx.hit(*pos),
                _ => self.consume,
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Rig {
        tree: WidgetTree,
        bus: AddressBus,
        order: Rc<std::cell::RefCell<Vec<&'static str>>>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                tree: WidgetTree::new(),
                bus: AddressBus::new(),
                order: Rc::default(),
            }
        }

        fn probe(&mut self, label: &'static str, rect: Rect, consume: bool) -> NodeId {
            let probe = Probe {
                label,
                consume,
                offers: Rc::default(),
                order: Rc::clone(&self.order),
            };
            self.tree.insert(probe, rect)
        }

        fn order(&self) -> Vec<&'static str> {
            self.order.borrow().clone()
        }
    }

    #[test]
    fn test_front_to_back_offer_order() {
        let mut rig = Rig::new();
        let root = rig.probe("root", Rect::new(0, 0, 300, 300), false);
        // All three overlap the click point; added back-to-front.
        let back = rig.probe("back", Rect::new(0, 0, 100, 100), false);
        let middle = rig.probe("middle", Rect::new(0, 0, 100, 100), false);
        let front = rig.probe("front", Rect::new(0, 0, 100, 100), true);
        rig.tree.add(root, back);
        rig.tree.add(root, middle);
        rig.tree.add(root, front);

        let event = InputEvent::pointer_down(Point::new(50, 50));
        let consumed = dispatch_event(&mut rig.tree, &mut rig.bus, root, &event);

        assert!(consumed);
        // Frontmost first, consumer stops the walk before "middle"/"back".
        assert_eq!(rig.order(), vec!["front"]);
    }

    #[test]
    fn test_decliners_fall_through_in_order() {
        let mut rig = Rig::new();
        let root = rig.probe("root", Rect::new(0, 0, 300, 300), false);
        let back = rig.probe("back", Rect::new(0, 0, 100, 100), false);
        let front = rig.probe("front", Rect::new(0, 0, 100, 100), false);
        rig.tree.add(root, back);
        rig.tree.add(root, front);

        let event = InputEvent::pointer_down(Point::new(50, 50));
        let consumed = dispatch_event(&mut rig.tree, &mut rig.bus, root, &event);

        assert!(!consumed);
        assert_eq!(rig.order(), vec!["front", "back", "root"]);
    }

    #[test]
    fn test_grandchild_consumes_before_ancestors() {
        // Tree root R contains A (0,0,100,100) containing B (10,10,20,20).
        // A click at (15,15) lands in B's bounds and must be consumed by B.
        let mut rig = Rig::new();
        let r = rig.probe("R", Rect::new(0, 0, 300, 300), true);
        let a = rig.probe("A", Rect::new(0, 0, 100, 100), true);
        let b = rig.probe("B", Rect::new(10, 10, 20, 20), true);
        rig.tree.add(r, a);
        rig.tree.add(a, b);

        let event = InputEvent::pointer_down(Point::new(15, 15));
        assert!(dispatch_event(&mut rig.tree, &mut rig.bus, r, &event));
        assert_eq!(rig.order(), vec!["B"]);
    }

    #[test]
    fn test_hidden_and_inactive_nodes_do_not_participate() {
        let mut rig = Rig::new();
        let root = rig.probe("root", Rect::new(0, 0, 300, 300), false);
        let hidden = rig.probe("hidden", Rect::new(0, 0, 100, 100), true);
        let inactive = rig.probe("inactive", Rect::new(0, 0, 100, 100), true);
        rig.tree.add(root, hidden);
        rig.tree.add(root, inactive);
        rig.tree.set_visible(hidden, false);
        rig.tree.set_active(inactive, false);

        let event = InputEvent::pointer_down(Point::new(50, 50));
        let consumed = dispatch_event(&mut rig.tree, &mut rig.bus, root, &event);

        assert!(!consumed);
        assert_eq!(rig.order(), vec!["root"]);
    }

    #[test]
    fn test_terminated_nodes_do_not_participate() {
        let mut rig = Rig::new();
        let root = rig.probe("root", Rect::new(0, 0, 300, 300), false);
        let doomed = rig.probe("doomed", Rect::new(0, 0, 100, 100), true);
        rig.tree.add(root, doomed);
        rig.tree.destroy(doomed);

        let event = InputEvent::pointer_down(Point::new(50, 50));
        assert!(!dispatch_event(&mut rig.tree, &mut rig.bus, root, &event));
        assert_eq!(rig.order(), vec!["root"]);
    }

    #[test]
    fn test_capture_bypasses_traversal() {
        let mut rig = Rig::new();
        let root = rig.probe("root", Rect::new(0, 0, 300, 300), false);
        let dragger = rig.probe("dragger", Rect::new(0, 0, 50, 50), true);
        rig.tree.add(root, dragger);
        rig.tree.capture(dragger);

        // Far outside the dragger's bounds, still delivered to it.
        let event = InputEvent::PointerMove {
            pos: Point::new(250, 250),
        };
        assert!(dispatch_event(&mut rig.tree, &mut rig.bus, root, &event));
        assert_eq!(rig.order(), vec!["dragger"]);
    }

    #[test]
    fn test_passthrough_panel_hosts_interactive_children() {
        // A passthrough panel (default on_event declines) with a consuming
        // child on top: the child gets the event, the panel never blocks.
        let mut rig = Rig::new();
        let root = rig.probe("root", Rect::new(0, 0, 300, 300), false);

        struct Panel;
        impl Widget for Panel {
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
        let panel = rig.tree.insert(Panel, Rect::new(0, 0, 200, 200));
        rig.tree.set_passthrough(panel, true);
        let button = rig.probe("button", Rect::new(10, 10, 50, 20), true);
        rig.tree.add(root, panel);
        rig.tree.add(panel, button);

        // Inside the button: consumed by the button.
        let event = InputEvent::pointer_down(Point::new(20, 20));
        assert!(dispatch_event(&mut rig.tree, &mut rig.bus, root, &event));
        assert_eq!(rig.order(), vec!["button"]);

        // Outside the button but inside the panel: panel declines (it is
        // passthrough), root declines, nothing consumed.
        let event = InputEvent::pointer_down(Point::new(150, 150));
        assert!(!dispatch_event(&mut rig.tree, &mut rig.bus, root, &event));
    }

    #[test]
    fn test_opaque_node_blocks_by_default() {
        let mut rig = Rig::new();
        let root = rig.probe("root", Rect::new(0, 0, 300, 300), false);

        struct Panel;
        impl Widget for Panel {
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
        let panel = rig.tree.insert(Panel, Rect::new(0, 0, 200, 200));
        rig.tree.add(root, panel);

        // Default widget behavior consumes a pointer-down inside its bounds.
        let event = InputEvent::pointer_down(Point::new(150, 150));
        assert!(dispatch_event(&mut rig.tree, &mut rig.bus, root, &event));
        assert!(rig.order().is_empty());
    }
}
