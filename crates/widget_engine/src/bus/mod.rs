//! Address bus - process-wide publish/subscribe for tree nodes
//!
//! Nodes register to receive a stable [`Address`]; anyone can post a
//! [`Packet`] to a specific address or to [`BROADCAST`]. Posting only
//! enqueues: delivery happens at the single [`AddressBus::pump`] call per
//! frame, so a handler never observes another node mid-mutation and packets
//! posted while a flush is running are deferred to the next flush.

pub mod packet;

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

pub use packet::{Address, Packet, PacketData, Response, BROADCAST, MASTER};

use crate::tree::{NodeId, WidgetCtx, WidgetTree};

/// The process-wide message bus
///
/// The registry maps addresses to arena keys - never to owned nodes - so the
/// bus cannot keep a node alive, and delivery to a node that has since been
/// destroyed or freed is skipped defensively.
pub struct AddressBus {
    registry: BTreeMap<Address, NodeId>,
    queue: VecDeque<Packet>,
    next_address: u64,
    epoch: Instant,
}

impl Default for AddressBus {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressBus {
    /// Create an empty bus; the first registration receives [`MASTER`]
    pub fn new() -> Self {
        Self {
            registry: BTreeMap::new(),
            queue: VecDeque::new(),
            next_address: MASTER.0,
            epoch: Instant::now(),
        }
    }

    /// Seconds elapsed on the bus clock (used for liveness timestamps)
    pub fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Register a node and return its address
    ///
    /// Addresses are allocated monotonically and never reused, so an address
    /// freed by [`unregister`] can never be misdelivered to a newcomer.
    /// Registering an already-registered node returns its existing address
    /// without creating a second entry. Returns `None` for a stale key.
    ///
    /// [`unregister`]: Self::unregister
    pub fn register(&mut self, tree: &mut WidgetTree, key: NodeId) -> Option<Address> {
        let node = tree.node(key)?;
        if let Some(existing) = node.address() {
            return Some(existing);
        }

        let address = Address(self.next_address);
        self.next_address += 1;
        self.registry.insert(address, key);
        if let Some(node) = tree.node_mut(key) {
            node.address = Some(address);
        }
        log::debug!(
            "registered {:?} as {:?}",
            key,
            address
        );
        Some(address)
    }

    /// Remove a node's registration
    ///
    /// Must be called before a node is discarded; a lingering entry keeps
    /// receiving traffic (the bus tolerates the dead key, but the address
    /// stays occupied).
    pub fn unregister(&mut self, tree: &mut WidgetTree, key: NodeId) {
        let Some(address) = tree.node(key).and_then(|n| n.address()) else {
            return;
        };
        self.registry.remove(&address);
        if let Some(node) = tree.node_mut(key) {
            node.address = None;
        }
        log::debug!("unregistered {:?}", address);
    }

    /// Resolve an address to its arena key, if registered
    pub fn resolve(&self, address: Address) -> Option<NodeId> {
        self.registry.get(&address).copied()
    }

    /// Number of registered nodes
    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }

    /// Queue a packet; it is delivered at the next [`pump`]
    ///
    /// [`pump`]: Self::pump
    pub fn post(&mut self, packet: Packet) {
        self.queue.push_back(packet);
    }

    /// Broadcast a liveness ping carrying the current bus timestamp
    pub fn send_ping(&mut self, sender: Address) {
        let sent = self.now();
        self.post(Packet::broadcast(
            sender,
            Response::Ping,
            PacketData::Ping { sent },
        ));
    }

    /// Number of packets awaiting the next flush
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Iterate the pending queue without draining it (oldest first)
    pub fn peek_queue(&self) -> impl Iterator<Item = &Packet> {
        self.queue.iter()
    }

    /// Drain the queue and deliver every packet, once per frame
    ///
    /// The queue is snapshotted before iterating: a packet posted by a
    /// handler during this flush lands in the next one, which bounds
    /// re-entrancy. Packets are delivered oldest-first; a broadcast reaches
    /// every registered node (including the sender - receivers ignore their
    /// own echo where that matters) in registration order, which is address
    /// order because addresses are monotonic.
    pub fn pump(&mut self, tree: &mut WidgetTree) {
        let packets = std::mem::take(&mut self.queue);
        for packet in packets {
            if packet.is_broadcast() {
                let targets: Vec<NodeId> = self.registry.values().copied().collect();
                for key in targets {
                    self.deliver(tree, key, &packet);
                }
            } else if let Some(key) = self.resolve(packet.receiver) {
                self.deliver(tree, key, &packet);
            } else {
                // Addressing miss: the sender cannot know receiver liveness.
                log::debug!("dropping {:?} for unknown {:?}", packet.response, packet.receiver);
            }
        }
    }

    fn deliver(&mut self, tree: &mut WidgetTree, key: NodeId, packet: &Packet) {
        let Some(node) = tree.node(key) else {
            log::warn!("skipping delivery to freed node {key:?}");
            return;
        };
        if node.is_terminated() {
            log::debug!("skipping delivery to terminated node {key:?}");
            return;
        }
        let Some(mut widget) = tree.take_widget(key) else {
            return;
        };
        {
            let mut ctx = WidgetCtx::new(tree, self, key);
            widget.on_message(&mut ctx, packet);
        }
        tree.put_widget(key, widget);
    }
}
