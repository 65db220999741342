//! Item resolution capability.
//!
//! The missive service asks an [`ItemResolver`] whether a sender holds a
//! qualifying item. [`LocalResolver`] answers on the spot from the
//! authoritative inventory. [`RemoteResolver`] forwards the question to the
//! sender's resolver peer and hands the answer back on a later tick through
//! [`ItemResolver::poll_replies`].

use std::collections::BTreeMap;

use parley_types::{ActorId, Inventory, MissivePacket, Resolution};
use tracing::{debug, warn};

use crate::error::ProtocolError;
use crate::protocol::{self, PeerEndpoint, PeerLink};
use crate::requirement::ItemRequirement;

/// Result of starting a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStep {
    /// Resolution finished synchronously.
    Ready(Resolution),
    /// The request is in flight; the answer arrives through
    /// [`ItemResolver::poll_replies`].
    Deferred,
}

/// A reply received from a resolver peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReply {
    /// The actor the peer answered for.
    pub sender: ActorId,
    /// The reply packet. Its resolution is always present.
    pub packet: MissivePacket,
}

/// Decides whether a sender may pay for a missive.
pub trait ItemResolver: Send {
    /// Start resolving `requirement` for `sender`.
    ///
    /// `inventory` is the authoritative view of the sender's inventory.
    /// Implementations that resolve elsewhere ignore it.
    fn begin(
        &mut self,
        requirement: &ItemRequirement,
        sender: ActorId,
        inventory: &Inventory,
        request: MissivePacket,
    ) -> Result<ResolveStep, ProtocolError>;

    /// Collect replies that arrived since the last call.
    fn poll_replies(&mut self) -> Vec<ResolvedReply>;

    /// Attach a resolver peer for `actor`. Resolvers that do not use peers
    /// return `None`.
    fn connect_peer(&mut self, _actor: ActorId) -> Option<PeerEndpoint> {
        None
    }

    /// Detach the resolver peer for `actor`.
    fn disconnect_peer(&mut self, _actor: ActorId) {}
}

// ---------------------------------------------------------------------------
// Local
// ---------------------------------------------------------------------------

/// Resolves against the authoritative inventory immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalResolver;

impl LocalResolver {
    /// Create a local resolver.
    pub const fn new() -> Self {
        Self
    }
}

impl ItemResolver for LocalResolver {
    fn begin(
        &mut self,
        requirement: &ItemRequirement,
        _sender: ActorId,
        inventory: &Inventory,
        _request: MissivePacket,
    ) -> Result<ResolveStep, ProtocolError> {
        Ok(ResolveStep::Ready(requirement.resolve(inventory)))
    }

    fn poll_replies(&mut self) -> Vec<ResolvedReply> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Remote
// ---------------------------------------------------------------------------

/// Resolves through per-actor peer links.
#[derive(Debug, Default)]
pub struct RemoteResolver {
    links: BTreeMap<ActorId, PeerLink>,
}

impl RemoteResolver {
    /// Create a resolver with no peers.
    pub const fn new() -> Self {
        Self {
            links: BTreeMap::new(),
        }
    }

    /// Open a link for `actor`, replacing any previous one, and return the
    /// endpoint its resolver peer should use.
    pub fn connect(&mut self, actor: ActorId) -> PeerEndpoint {
        let (link, endpoint) = protocol::link(actor);
        if self.links.insert(actor, link).is_some() {
            debug!(%actor, "replaced resolver link");
        }
        endpoint
    }

    /// Drop the link for `actor`. Requests still in flight are lost.
    pub fn disconnect(&mut self, actor: ActorId) -> bool {
        self.links.remove(&actor).is_some()
    }

    /// Whether `actor` has a registered link.
    pub fn is_connected(&self, actor: ActorId) -> bool {
        self.links.contains_key(&actor)
    }
}

impl ItemResolver for RemoteResolver {
    fn begin(
        &mut self,
        _requirement: &ItemRequirement,
        sender: ActorId,
        _inventory: &Inventory,
        request: MissivePacket,
    ) -> Result<ResolveStep, ProtocolError> {
        let link = self
            .links
            .get(&sender)
            .ok_or(ProtocolError::UnknownPeer { actor: sender })?;
        link.send_request(&request)?;
        debug!(%sender, target = %request.target, "resolver request sent");
        Ok(ResolveStep::Deferred)
    }

    fn poll_replies(&mut self) -> Vec<ResolvedReply> {
        let mut replies = Vec::new();
        let mut closed = Vec::new();

        for (sender, link) in &mut self.links {
            loop {
                match link.try_reply() {
                    Ok(Some(packet)) => replies.push(ResolvedReply {
                        sender: *sender,
                        packet,
                    }),
                    Ok(None) => break,
                    Err(ProtocolError::LinkClosed { .. }) => {
                        closed.push(*sender);
                        break;
                    }
                    Err(e) => warn!(%sender, error = %e, "dropping resolver reply"),
                }
            }
        }

        for sender in closed {
            warn!(%sender, "resolver link closed");
            self.links.remove(&sender);
        }
        replies
    }

    fn connect_peer(&mut self, actor: ActorId) -> Option<PeerEndpoint> {
        Some(self.connect(actor))
    }

    fn disconnect_peer(&mut self, actor: ActorId) {
        self.disconnect(actor);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use parley_types::{InventorySlot, ItemStack};

    use super::*;

    fn requirement() -> ItemRequirement {
        ItemRequirement::new(Vec::new(), vec!["minecraft:paper".to_owned()])
    }

    #[test]
    fn local_resolution_is_immediate() {
        let mut inventory = Inventory::default();
        inventory.main_hand = Some(ItemStack::stack("minecraft:paper", 2));
        let mut resolver = LocalResolver::new();

        let step = resolver
            .begin(
                &requirement(),
                ActorId::new(),
                &inventory,
                MissivePacket::request("hi".to_owned(), ActorId::new()),
            )
            .unwrap();

        assert_eq!(
            step,
            ResolveStep::Ready(Resolution::Consumable(InventorySlot::MainHand))
        );
        assert!(resolver.poll_replies().is_empty());
    }

    #[test]
    fn remote_resolution_without_a_peer_fails() {
        let mut resolver = RemoteResolver::new();
        let sender = ActorId::new();

        let result = resolver.begin(
            &requirement(),
            sender,
            &Inventory::default(),
            MissivePacket::request("hi".to_owned(), ActorId::new()),
        );

        assert!(matches!(result, Err(ProtocolError::UnknownPeer { actor }) if actor == sender));
    }

    #[test]
    fn remote_reply_is_collected_on_poll() {
        let mut resolver = RemoteResolver::new();
        let sender = ActorId::new();
        let mut endpoint = resolver.connect(sender);
        let request = MissivePacket::request("hi".to_owned(), ActorId::new());

        let step = resolver
            .begin(&requirement(), sender, &Inventory::default(), request.clone())
            .unwrap();
        assert_eq!(step, ResolveStep::Deferred);
        assert!(resolver.poll_replies().is_empty());

        let received = endpoint.try_request().unwrap().unwrap();
        endpoint
            .send_reply(&received.into_reply(Resolution::Catalyst(InventorySlot::OffHand)))
            .unwrap();

        let replies = resolver.poll_replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].sender, sender);
        assert_eq!(replies[0].packet.message, request.message);
    }

    #[test]
    fn closed_links_are_forgotten() {
        let mut resolver = RemoteResolver::new();
        let sender = ActorId::new();
        drop(resolver.connect(sender));

        assert!(resolver.poll_replies().is_empty());
        assert!(!resolver.is_connected(sender));
    }
}
