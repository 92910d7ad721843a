//! Bus message vocabulary - addresses, response kinds, and packets

use crate::theme::Theme;

/// A stable bus address assigned to a registered node
///
/// Addresses are allocated monotonically and never reused for the lifetime of
/// the process, so a stale packet can never be misattributed to a node that
/// recycled another node's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub u64);

/// Address of the application root, always the first registration
pub const MASTER: Address = Address(0);

/// Reserved receiver address meaning "deliver to all registered nodes"
pub const BROADCAST: Address = Address(u64::MAX);

/// The closed vocabulary of bus messages
///
/// New kinds are additive; existing kinds are never repurposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Liveness probe, answered by every other node with a `Pong`
    Ping,
    /// Reply to a `Ping`, addressed back to the original sender
    Pong,
    /// New color palette for every registered node
    Theme,
    /// New contrast factor for every registered node
    Contrast,
    /// Dialog confirmed
    Ok,
    /// Dialog dismissed
    Cancel,
    /// A window's drag lock was toggled
    Lock,
    /// A node is about to be destroyed
    Bye,
}

/// Payload carried by a packet, shaped by its [`Response`] kind
#[derive(Debug, Clone, PartialEq)]
pub enum PacketData {
    /// No payload
    None,
    /// Ping payload: the bus timestamp at which the ping was posted
    Ping {
        /// Seconds on the bus clock when the sender posted the ping
        sent: f64,
    },
    /// Pong payload: the responder's identity plus the echoed timestamp
    Pong {
        /// Address of the responding node
        address: Address,
        /// Display name of the responding node
        name: String,
        /// Timestamp the responder observed in the originating ping
        observed: f64,
    },
    /// A full color palette
    Theme(Theme),
    /// A scalar value (contrast factor 0.0-1.0)
    Scalar(f32),
    /// Lock payload: whether the window is now locked, and whose
    Lock {
        /// True when dragging is now disabled
        locked: bool,
        /// Address of the window that toggled
        address: Address,
    },
    /// A boolean flag
    Flag(bool),
}

/// A bus message, immutable once constructed
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    /// Address of the posting node
    pub sender: Address,
    /// Destination address, or [`BROADCAST`]
    pub receiver: Address,
    /// Message kind
    pub response: Response,
    /// Payload, shaped by `response`
    pub data: PacketData,
}

impl Packet {
    /// Create a new packet
    pub fn new(receiver: Address, sender: Address, response: Response, data: PacketData) -> Self {
        Self {
            sender,
            receiver,
            response,
            data,
        }
    }

    /// Create a broadcast packet
    pub fn broadcast(sender: Address, response: Response, data: PacketData) -> Self {
        Self::new(BROADCAST, sender, response, data)
    }

    /// Whether this packet is addressed to every registered node
    pub fn is_broadcast(&self) -> bool {
        self.receiver == BROADCAST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_constructor() {
        let packet = Packet::broadcast(Address(3), Response::Ping, PacketData::Ping { sent: 1.5 });
        assert!(packet.is_broadcast());
        assert_eq!(packet.sender, Address(3));
        assert_eq!(packet.response, Response::Ping);
    }

    #[test]
    fn test_reserved_addresses_are_distinct() {
        assert_ne!(MASTER, BROADCAST);
    }
}
