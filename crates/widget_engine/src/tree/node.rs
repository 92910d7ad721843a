//! Tree node storage - flags and per-node state

use bitflags::bitflags;

use super::{NodeId, Widget};
use crate::bus::Address;
use crate::foundation::geometry::Rect;

bitflags! {
    /// Per-node state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// Node is drawn and participates in event dispatch
        const VISIBLE = 1 << 0;
        /// Node may consume input (cleared for disabled widgets)
        const ACTIVE = 1 << 1;
        /// Node forwards events to children even when it could consume them
        const PASSTHROUGH = 1 << 2;
        /// Node has been destroyed and must not be touched again
        const TERMINATED = 1 << 3;
        /// Node's subtree needs redrawing
        const REDRAW = 1 << 4;
        /// Node holds the pointer capture for a modal interaction
        const CAPTURED = 1 << 5;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ACTIVE | Self::REDRAW
    }
}

/// A node of the component tree
///
/// Structure (parent/children links, flags, bus address) lives here; behavior
/// lives in the boxed [`Widget`]. The widget slot is `None` only transiently
/// while a handler runs on it.
pub struct Node {
    pub(crate) rect: Rect,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) flags: NodeFlags,
    pub(crate) address: Option<Address>,
    /// Memoized root ancestor; cleared for the whole subtree on re-parent
    pub(crate) root_memo: Option<NodeId>,
    pub(crate) widget: Option<Box<dyn Widget>>,
}

impl Node {
    pub(crate) fn new(widget: Box<dyn Widget>, rect: Rect) -> Self {
        Self {
            rect,
            parent: None,
            children: Vec::new(),
            flags: NodeFlags::default(),
            address: None,
            root_memo: None,
            widget: Some(widget),
        }
    }

    /// Local rectangle relative to the parent
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Parent node, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in z-order (index 0 = back, last = front)
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Bus address, if the node is registered
    pub fn address(&self) -> Option<Address> {
        self.address
    }

    /// Current flag set
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Whether the node is drawn and dispatched to
    pub fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    /// Whether the node may consume input
    pub fn is_active(&self) -> bool {
        self.flags.contains(NodeFlags::ACTIVE)
    }

    /// Whether events pass through to children preferentially
    pub fn is_passthrough(&self) -> bool {
        self.flags.contains(NodeFlags::PASSTHROUGH)
    }

    /// Whether the node has been destroyed
    pub fn is_terminated(&self) -> bool {
        self.flags.contains(NodeFlags::TERMINATED)
    }

    /// Whether the node's subtree is marked dirty
    pub fn needs_redraw(&self) -> bool {
        self.flags.contains(NodeFlags::REDRAW)
    }
}
