//! Component tree - ownership, z-order, coordinate composition, invalidation
//!
//! Nodes live in a slot-map arena and reference each other by key, so parent
//! back-references are weak by construction and there are no ownership
//! cycles. Child order encodes z-order: index 0 is drawn first (back), the
//! last child is drawn last (front) and offered input first.

pub mod dispatch;
pub mod node;
pub mod widget;

use slotmap::{new_key_type, SlotMap};

pub use dispatch::{dispatch_event, InputEvent, PointerButton};
pub use node::{Node, NodeFlags};
pub use widget::{reply_ping, Widget, WidgetCtx};

use crate::foundation::geometry::Rect;

new_key_type! {
    /// Stable key of a node in the tree arena
    pub struct NodeId;
}

/// Arena of tree nodes plus the process-wide pointer-capture slot
#[derive(Default)]
pub struct WidgetTree {
    nodes: SlotMap<NodeId, node::Node>,
    captured: Option<NodeId>,
}

impl WidgetTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a standalone node (no parent, no address) and return its key
    pub fn insert(&mut self, widget: impl Widget, rect: Rect) -> NodeId {
        self.insert_boxed(Box::new(widget), rect)
    }

    /// Insert a standalone node from an already-boxed widget
    pub fn insert_boxed(&mut self, widget: Box<dyn Widget>, rect: Rect) -> NodeId {
        self.nodes.insert(node::Node::new(widget, rect))
    }

    /// Number of live nodes in the arena (including terminated, unswept ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the key refers to a live node
    pub fn contains(&self, key: NodeId) -> bool {
        self.nodes.contains_key(key)
    }

    /// Borrow a node
    pub fn node(&self, key: NodeId) -> Option<&node::Node> {
        self.nodes.get(key)
    }

    /// Mutably borrow a node
    pub(crate) fn node_mut(&mut self, key: NodeId) -> Option<&mut node::Node> {
        self.nodes.get_mut(key)
    }

    // MANAGEMENT

    /// Attach `child` under `parent`, detaching it from any previous parent
    ///
    /// Re-adding to the same parent detaches and re-appends (an effective
    /// no-op that still pays the invalidation cost). Adding a node to itself
    /// or under one of its own descendants is silently refused.
    pub fn add(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("refusing to attach a node under its own descendant");
            return;
        }

        if let Some(old_parent) = self.nodes[child].parent {
            self.detach(old_parent, child);
        }

        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.clear_root_memo(child);
        self.reset(parent);
    }

    /// Detach `child` from `parent`; no-op when it is not a current child
    pub fn remove(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        if self.nodes[child].parent != Some(parent) {
            return;
        }
        self.detach(parent, child);
        self.clear_root_memo(child);
        self.reset(parent);
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        let kids = &mut self.nodes[parent].children;
        if let Some(index) = kids.iter().position(|&k| k == child) {
            kids.remove(index);
        }
        self.nodes[child].parent = None;
        self.reset(parent);
    }

    /// Whether `ancestor` appears on `key`'s parent chain (or is `key`)
    fn is_ancestor(&self, ancestor: NodeId, key: NodeId) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.nodes.get(k).and_then(|n| n.parent);
        }
        false
    }

    /// Move a node to the front of its parent's z-order; no-op without parent
    pub fn bring_to_front(&mut self, key: NodeId) {
        let Some(parent) = self.nodes.get(key).and_then(|n| n.parent) else {
            return;
        };
        let kids = &mut self.nodes[parent].children;
        if let Some(index) = kids.iter().position(|&k| k == key) {
            kids.remove(index);
            kids.push(key);
            self.reset(parent);
        }
    }

    /// Move a node to the back of its parent's z-order; no-op without parent
    pub fn send_to_back(&mut self, key: NodeId) {
        let Some(parent) = self.nodes.get(key).and_then(|n| n.parent) else {
            return;
        };
        let kids = &mut self.nodes[parent].children;
        if let Some(index) = kids.iter().position(|&k| k == key) {
            kids.remove(index);
            kids.insert(0, key);
            self.reset(parent);
        }
    }

    /// The ancestor with no parent, memoized per node
    ///
    /// The memo is cleared recursively on every re-parent anywhere in the
    /// ancestor chain; a stale memo here would silently leak old roots across
    /// re-parenting, so the invalidation in [`add`]/[`remove`] is a
    /// correctness contract, not an optimization.
    ///
    /// [`add`]: Self::add
    /// [`remove`]: Self::remove
    pub fn root_of(&mut self, key: NodeId) -> Option<NodeId> {
        self.nodes.get(key)?;

        // Walk up until a memoized node or the root, then memoize the path.
        let mut path = Vec::new();
        let mut current = key;
        let root = loop {
            let node = &self.nodes[current];
            if let Some(memo) = node.root_memo {
                break memo;
            }
            match node.parent {
                Some(parent) => {
                    path.push(current);
                    current = parent;
                }
                None => break current,
            }
        };
        path.push(current);
        for k in path {
            self.nodes[k].root_memo = Some(root);
        }
        Some(root)
    }

    /// Clear the root memo for `key` and its whole subtree
    pub(crate) fn clear_root_memo(&mut self, key: NodeId) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        node.root_memo = None;
        let kids = node.children.clone();
        for child in kids {
            self.clear_root_memo(child);
        }
    }

    /// Recursively destroy a node and all of its descendants
    ///
    /// Children go first, then the node detaches from its parent, is marked
    /// terminated, and its rect collapses to a single pixel so a stale draw
    /// cannot paint over anything meaningful. Safe to call repeatedly.
    pub fn destroy(&mut self, key: NodeId) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        if node.is_terminated() {
            return;
        }

        let kids = node.children.clone();
        for child in kids {
            self.destroy(child);
        }

        if self.captured == Some(key) {
            self.release_capture(key);
        }
        if let Some(parent) = self.nodes[key].parent {
            self.detach(parent, key);
        }

        let node = &mut self.nodes[key];
        node.children.clear();
        node.flags.insert(NodeFlags::TERMINATED);
        node.rect = Rect::new(node.rect.x, node.rect.y, 1, 1);
        log::debug!(
            "destroyed node {:?} ({})",
            key,
            node.widget.as_deref().map_or("?", Widget::name)
        );
    }

    /// Mark a node dirty and propagate the mark up to the root
    pub fn reset(&mut self, key: NodeId) {
        let mut current = Some(key);
        while let Some(k) = current {
            let Some(node) = self.nodes.get_mut(k) else {
                break;
            };
            node.flags.insert(NodeFlags::REDRAW);
            current = node.parent;
        }
    }

    /// Clear a node's dirty flag (render pass consumed it)
    pub fn clear_redraw(&mut self, key: NodeId) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.flags.remove(NodeFlags::REDRAW);
        }
    }

    // GEOMETRY

    /// Local rect offset by the cumulative position of every ancestor
    ///
    /// O(depth) walk each call; depth is expected small and caching here
    /// would need the same invalidation discipline as the root memo.
    pub fn absolute_rect(&self, key: NodeId) -> Option<Rect> {
        let node = self.nodes.get(key)?;
        let mut rect = node.rect;
        let mut current = node.parent;
        while let Some(k) = current {
            let parent = self.nodes.get(k)?;
            rect = rect.translated(parent.rect.x, parent.rect.y);
            current = parent.parent;
        }
        Some(rect)
    }

    /// Move a node, marking its ancestry dirty
    pub fn set_position(&mut self, key: NodeId, x: i32, y: i32) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.rect.x = x;
            node.rect.y = y;
            self.reset(key);
        }
    }

    /// Resize a node (clamped to >= 1), marking its ancestry dirty
    pub fn set_size(&mut self, key: NodeId, width: u32, height: u32) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.rect.set_width(width);
            node.rect.set_height(height);
            self.reset(key);
        }
    }

    /// Show or hide a node
    pub fn set_visible(&mut self, key: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.flags.set(NodeFlags::VISIBLE, visible);
            self.reset(key);
        }
    }

    /// Enable or disable input consumption
    pub fn set_active(&mut self, key: NodeId, active: bool) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.flags.set(NodeFlags::ACTIVE, active);
            self.reset(key);
        }
    }

    /// Set or clear the passthrough flag
    pub fn set_passthrough(&mut self, key: NodeId, passthrough: bool) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.flags.set(NodeFlags::PASSTHROUGH, passthrough);
        }
    }

    // POINTER CAPTURE

    /// Give a node the modal pointer capture
    pub fn capture(&mut self, key: NodeId) {
        if let Some(previous) = self.captured.take() {
            if let Some(node) = self.nodes.get_mut(previous) {
                node.flags.remove(NodeFlags::CAPTURED);
            }
        }
        if let Some(node) = self.nodes.get_mut(key) {
            node.flags.insert(NodeFlags::CAPTURED);
            self.captured = Some(key);
        }
    }

    /// Release the pointer capture if this node holds it
    pub fn release_capture(&mut self, key: NodeId) {
        if self.captured == Some(key) {
            self.captured = None;
            if let Some(node) = self.nodes.get_mut(key) {
                node.flags.remove(NodeFlags::CAPTURED);
            }
        }
    }

    /// Node currently holding the pointer capture, if it is still live
    pub fn captured(&self) -> Option<NodeId> {
        let key = self.captured?;
        let node = self.nodes.get(key)?;
        (!node.is_terminated()).then_some(key)
    }

    // WIDGET ACCESS

    /// Detach a node's widget for a handler call; pair with [`put_widget`]
    ///
    /// [`put_widget`]: Self::put_widget
    pub fn take_widget(&mut self, key: NodeId) -> Option<Box<dyn Widget>> {
        self.nodes.get_mut(key)?.widget.take()
    }

    /// Reattach a widget taken with [`take_widget`]
    ///
    /// [`take_widget`]: Self::take_widget
    pub fn put_widget(&mut self, key: NodeId, widget: Box<dyn Widget>) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.widget = Some(widget);
        }
    }

    /// Borrow a node's widget
    pub fn widget(&self, key: NodeId) -> Option<&dyn Widget> {
        self.nodes.get(key)?.widget.as_deref()
    }

    /// Mutably borrow a node's widget
    pub fn widget_mut(&mut self, key: NodeId) -> Option<&mut dyn Widget> {
        self.nodes.get_mut(key)?.widget.as_deref_mut()
    }

    /// Downcast a node's widget to its concrete type
    pub fn widget_as_mut<W: Widget>(&mut self, key: NodeId) -> Option<&mut W> {
        self.widget_mut(key)?.as_any_mut().downcast_mut::<W>()
    }

    // SWEEPING

    /// Collect the keys of all terminated nodes awaiting removal
    pub fn terminated_keys(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.is_terminated())
            .map(|(key, _)| key)
            .collect()
    }

    /// Remove a node from the arena entirely
    ///
    /// The caller must unregister the node from the bus first; the tree does
    /// not know about registrations.
    pub fn free(&mut self, key: NodeId) {
        if self.captured == Some(key) {
            self.captured = None;
        }
        self.nodes.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::geometry::Point;
    use std::any::Any;

    struct Plain;

    impl Widget for Plain {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn plain(tree: &mut WidgetTree, x: i32, y: i32, w: u32, h: u32) -> NodeId {
        tree.insert(Plain, Rect::new(x, y, w, h))
    }

    #[test]
    fn test_absolute_rect_sums_ancestor_offsets() {
        let mut tree = WidgetTree::new();
        let root = plain(&mut tree, 5, 7, 500, 400);
        let mid = plain(&mut tree, 10, 20, 200, 200);
        let leaf = plain(&mut tree, 1, 2, 50, 50);
        tree.add(root, mid);
        tree.add(mid, leaf);

        let abs = tree.absolute_rect(leaf).unwrap();
        assert_eq!(abs.position(), Point::new(16, 29));
        assert_eq!(abs.width(), 50);

        // A standalone node's absolute rect is its local rect.
        let lone = plain(&mut tree, 3, 4, 10, 10);
        assert_eq!(tree.absolute_rect(lone).unwrap(), Rect::new(3, 4, 10, 10));
    }

    #[test]
    fn test_reparent_moves_exactly_once() {
        let mut tree = WidgetTree::new();
        let a = plain(&mut tree, 0, 0, 100, 100);
        let b = plain(&mut tree, 0, 0, 100, 100);
        let child = plain(&mut tree, 0, 0, 10, 10);

        tree.add(a, child);
        let before = tree.len();

        tree.add(b, child);
        assert_eq!(tree.len(), before);
        assert!(tree.node(a).unwrap().children().is_empty());
        assert_eq!(tree.node(b).unwrap().children(), &[child]);
        assert_eq!(tree.node(child).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_add_self_is_noop() {
        let mut tree = WidgetTree::new();
        let a = plain(&mut tree, 0, 0, 10, 10);
        tree.add(a, a);
        assert!(tree.node(a).unwrap().children().is_empty());
        assert_eq!(tree.node(a).unwrap().parent(), None);
    }

    #[test]
    fn test_add_under_descendant_is_refused() {
        let mut tree = WidgetTree::new();
        let a = plain(&mut tree, 0, 0, 10, 10);
        let b = plain(&mut tree, 0, 0, 10, 10);
        tree.add(a, b);
        tree.add(b, a);
        assert_eq!(tree.node(a).unwrap().parent(), None);
        assert_eq!(tree.node(b).unwrap().parent(), Some(a));
    }

    #[test]
    fn test_remove_non_child_is_noop() {
        let mut tree = WidgetTree::new();
        let a = plain(&mut tree, 0, 0, 10, 10);
        let b = plain(&mut tree, 0, 0, 10, 10);
        tree.remove(a, b);
        assert!(tree.node(a).unwrap().children().is_empty());
    }

    #[test]
    fn test_z_order_moves() {
        let mut tree = WidgetTree::new();
        let parent = plain(&mut tree, 0, 0, 100, 100);
        let first = plain(&mut tree, 0, 0, 10, 10);
        let second = plain(&mut tree, 0, 0, 10, 10);
        let third = plain(&mut tree, 0, 0, 10, 10);
        tree.add(parent, first);
        tree.add(parent, second);
        tree.add(parent, third);

        tree.bring_to_front(first);
        assert_eq!(tree.node(parent).unwrap().children(), &[second, third, first]);

        tree.send_to_back(third);
        assert_eq!(tree.node(parent).unwrap().children(), &[third, second, first]);

        // Without a parent these are no-ops.
        tree.bring_to_front(parent);
        tree.send_to_back(parent);
    }

    #[test]
    fn test_root_memo_survives_lookup_and_clears_on_reparent() {
        let mut tree = WidgetTree::new();
        let root_a = plain(&mut tree, 0, 0, 100, 100);
        let root_b = plain(&mut tree, 0, 0, 100, 100);
        let mid = plain(&mut tree, 0, 0, 50, 50);
        let leaf = plain(&mut tree, 0, 0, 10, 10);
        tree.add(root_a, mid);
        tree.add(mid, leaf);

        assert_eq!(tree.root_of(leaf), Some(root_a));
        assert_eq!(tree.root_of(mid), Some(root_a));

        // Re-parenting the middle node must invalidate the leaf's memo too.
        tree.add(root_b, mid);
        assert_eq!(tree.root_of(leaf), Some(root_b));
        assert_eq!(tree.root_of(mid), Some(root_b));
        assert_eq!(tree.root_of(root_a), Some(root_a));
    }

    #[test]
    fn test_detached_subtree_root_is_its_own_top() {
        let mut tree = WidgetTree::new();
        let root = plain(&mut tree, 0, 0, 100, 100);
        let mid = plain(&mut tree, 0, 0, 50, 50);
        let leaf = plain(&mut tree, 0, 0, 10, 10);
        tree.add(root, mid);
        tree.add(mid, leaf);
        assert_eq!(tree.root_of(leaf), Some(root));

        tree.remove(root, mid);
        assert_eq!(tree.root_of(leaf), Some(mid));
    }

    #[test]
    fn test_destroy_terminates_whole_subtree() {
        let mut tree = WidgetTree::new();
        let root = plain(&mut tree, 0, 0, 100, 100);
        let window = plain(&mut tree, 10, 10, 80, 80);
        let label = plain(&mut tree, 2, 2, 20, 10);
        let button = plain(&mut tree, 2, 20, 20, 10);
        tree.add(root, window);
        tree.add(window, label);
        tree.add(window, button);

        tree.destroy(window);

        for key in [window, label, button] {
            let node = tree.node(key).unwrap();
            assert!(node.is_terminated());
            assert!(node.children().is_empty());
            assert_eq!(node.rect().width(), 1);
            assert_eq!(node.rect().height(), 1);
        }
        // The remaining tree holds no references to the destroyed subtree.
        assert!(tree.node(root).unwrap().children().is_empty());
        assert_eq!(tree.node(window).unwrap().parent(), None);

        // Idempotent.
        tree.destroy(window);
        assert!(tree.node(window).unwrap().is_terminated());
    }

    #[test]
    fn test_destroy_releases_capture() {
        let mut tree = WidgetTree::new();
        let a = plain(&mut tree, 0, 0, 10, 10);
        tree.capture(a);
        assert_eq!(tree.captured(), Some(a));
        tree.destroy(a);
        assert_eq!(tree.captured(), None);
    }

    #[test]
    fn test_reset_marks_ancestry_dirty() {
        let mut tree = WidgetTree::new();
        let root = plain(&mut tree, 0, 0, 100, 100);
        let mid = plain(&mut tree, 0, 0, 50, 50);
        let leaf = plain(&mut tree, 0, 0, 10, 10);
        tree.add(root, mid);
        tree.add(mid, leaf);

        for key in [root, mid, leaf] {
            tree.clear_redraw(key);
        }
        tree.reset(leaf);

        assert!(tree.node(leaf).unwrap().needs_redraw());
        assert!(tree.node(mid).unwrap().needs_redraw());
        assert!(tree.node(root).unwrap().needs_redraw());
    }

    #[test]
    fn test_sweep_removes_terminated_nodes() {
        let mut tree = WidgetTree::new();
        let root = plain(&mut tree, 0, 0, 100, 100);
        let doomed = plain(&mut tree, 0, 0, 10, 10);
        tree.add(root, doomed);

        tree.destroy(doomed);
        let terminated = tree.terminated_keys();
        assert_eq!(terminated, vec![doomed]);

        for key in terminated {
            tree.free(key);
        }
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(doomed));
    }
}
