//! Wire framing and the duplex link to a resolver peer.
//!
//! Packets travel as JSON text frames. The reference transport is a pair of
//! unbounded `tokio` channels: the authoritative side holds the
//! [`PeerLink`], the resolver side holds the [`PeerEndpoint`]. Both ends
//! poll without blocking, each on its own tick, so a round trip completes
//! over at least two ticks.
//!
//! # Frames
//!
//! ```text
//! request: {"message":"meet me at the docks","target":"0190..."}
//! reply:   {"message":"meet me at the docks","target":"0190...","resolution":{"Consumable":{"Index":3}}}
//! ```

use parley_types::{ActorId, MAX_MISSIVE_CHARS, MissivePacket};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::error::ProtocolError;

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

/// Serialize a packet into a text frame.
pub fn encode(packet: &MissivePacket) -> Result<String, ProtocolError> {
    serde_json::to_string(packet).map_err(ProtocolError::Encode)
}

/// Parse a text frame, rejecting messages over the length cap.
pub fn decode(frame: &str) -> Result<MissivePacket, ProtocolError> {
    let packet: MissivePacket = serde_json::from_str(frame).map_err(ProtocolError::Decode)?;
    let chars = packet.message_chars();
    if chars > MAX_MISSIVE_CHARS {
        return Err(ProtocolError::MessageTooLong { chars });
    }
    Ok(packet)
}

// ---------------------------------------------------------------------------
// Duplex
// ---------------------------------------------------------------------------

/// One end of a bidirectional frame channel.
#[derive(Debug)]
struct Duplex {
    /// The actor whose inventory this link resolves.
    actor: ActorId,
    outbound: UnboundedSender<String>,
    inbound: UnboundedReceiver<String>,
}

impl Duplex {
    fn send(&self, packet: &MissivePacket) -> Result<(), ProtocolError> {
        let frame = encode(packet)?;
        self.outbound
            .send(frame)
            .map_err(|_closed| ProtocolError::LinkClosed { actor: self.actor })
    }

    /// Take the next frame if one is waiting.
    ///
    /// `Ok(None)` means nothing has arrived yet. A frame that fails to
    /// decode is consumed and reported; the next call moves on.
    fn try_next(&mut self) -> Result<Option<MissivePacket>, ProtocolError> {
        match self.inbound.try_recv() {
            Ok(frame) => decode(&frame).map(Some),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ProtocolError::LinkClosed { actor: self.actor }),
        }
    }
}

/// Create a connected link pair for `actor`.
pub fn link(actor: ActorId) -> (PeerLink, PeerEndpoint) {
    let (to_peer, from_authority) = unbounded_channel();
    let (to_authority, from_peer) = unbounded_channel();
    let link = PeerLink {
        duplex: Duplex {
            actor,
            outbound: to_peer,
            inbound: from_peer,
        },
    };
    let endpoint = PeerEndpoint {
        duplex: Duplex {
            actor,
            outbound: to_authority,
            inbound: from_authority,
        },
    };
    (link, endpoint)
}

// ---------------------------------------------------------------------------
// Authoritative end
// ---------------------------------------------------------------------------

/// The authoritative side of a resolver link.
#[derive(Debug)]
pub struct PeerLink {
    duplex: Duplex,
}

impl PeerLink {
    /// The actor this link resolves for.
    pub const fn actor(&self) -> ActorId {
        self.duplex.actor
    }

    /// Send a resolution request.
    pub fn send_request(&self, request: &MissivePacket) -> Result<(), ProtocolError> {
        self.duplex.send(request)
    }

    /// Take the next reply, if one has arrived.
    ///
    /// A reply must carry a resolution.
    pub fn try_reply(&mut self) -> Result<Option<MissivePacket>, ProtocolError> {
        match self.duplex.try_next()? {
            Some(reply) if reply.resolution.is_none() => Err(ProtocolError::MissingResolution {
                target: reply.target,
            }),
            other => Ok(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver end
// ---------------------------------------------------------------------------

/// The resolver side of a link.
#[derive(Debug)]
pub struct PeerEndpoint {
    duplex: Duplex,
}

impl PeerEndpoint {
    /// The actor whose inventory this endpoint answers for.
    pub const fn actor(&self) -> ActorId {
        self.duplex.actor
    }

    /// Take the next request, if one has arrived.
    pub fn try_request(&mut self) -> Result<Option<MissivePacket>, ProtocolError> {
        self.duplex.try_next()
    }

    /// Send a reply.
    pub fn send_reply(&self, reply: &MissivePacket) -> Result<(), ProtocolError> {
        self.duplex.send(reply)
    }

    /// Send a raw text frame, bypassing encoding.
    ///
    /// Lets a non-Rust peer bridge (or a test) inject frames verbatim.
    pub fn send_frame(&self, frame: impl Into<String>) -> Result<(), ProtocolError> {
        self.duplex
            .outbound
            .send(frame.into())
            .map_err(|_closed| ProtocolError::LinkClosed {
                actor: self.duplex.actor,
            })
    }
}
