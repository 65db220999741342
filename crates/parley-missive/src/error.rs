//! Error types for the `parley-missive` crate.
//!
//! Every missive failure is reported to the sending actor when one is
//! addressable and otherwise only logged. [`MissiveError::user_notice`]
//! renders the player-facing line; failures the player already heard about
//! (or never needs to) render nothing.

use parley_types::{ActorId, InventorySlot, MAX_MISSIVE_CHARS};

/// Errors raised while accepting a missive for delivery.
#[derive(Debug, thiserror::Error)]
pub enum MissiveError {
    /// The missive text exceeds the length cap.
    #[error("missive has {chars} characters, limit is {limit}")]
    MessageTooLong {
        /// Length of the rejected text in characters.
        chars: usize,
        /// The configured cap.
        limit: usize,
    },

    /// No connected actor has the given name.
    #[error("unknown missive target: {name}")]
    UnknownTarget {
        /// The name that failed to resolve.
        name: String,
    },

    /// The target disconnected while its item check was in flight.
    #[error("missive target {target} disconnected during resolution")]
    TargetVanished {
        /// The target that could no longer be found.
        target: ActorId,
    },

    /// The sending actor is no longer connected.
    #[error("missive sender {sender} is unavailable")]
    SenderUnavailable {
        /// The sender that could not be found.
        sender: ActorId,
    },

    /// The sender holds none of the qualifying items.
    #[error("sender holds no qualifying item")]
    ItemsMissing {
        /// Itemized notice listing what would have qualified.
        notice: String,
    },

    /// A remote peer answered that the sender holds no qualifying item.
    /// The peer already told its actor.
    #[error("remote peer found no qualifying item")]
    RemoteRefused,

    /// The slot named by a remote reply no longer holds a qualifying item.
    #[error("slot {slot:?} no longer holds a qualifying item")]
    StaleResolution {
        /// The slot the reply designated.
        slot: InventorySlot,
    },

    /// The peer exchange failed.
    #[error("resolver protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl MissiveError {
    /// The line shown to the sending actor, if any.
    pub fn user_notice(&self) -> Option<String> {
        match self {
            Self::MessageTooLong { chars, limit } => Some(format!(
                "§c§oA missive must be at most {limit} characters. Your missive has {chars} characters!"
            )),
            Self::UnknownTarget { .. } => Some("§c§oThat player doesn't exist!".to_owned()),
            Self::TargetVanished { .. } => {
                Some("§c§oThat player doesn't exist, but did very recently!".to_owned())
            }
            Self::ItemsMissing { notice } => Some(notice.clone()),
            Self::StaleResolution { .. } => Some("§c§oRequired items not found!".to_owned()),
            Self::Protocol(ProtocolError::UnknownPeer { .. } | ProtocolError::LinkClosed { .. }) => {
                Some("§c§oYour missive could not be sent right now.".to_owned())
            }
            Self::SenderUnavailable { .. } | Self::RemoteRefused | Self::Protocol(_) => None,
        }
    }
}

/// Errors on the link between the authoritative side and a resolver peer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A packet could not be serialized.
    #[error("failed to encode missive packet: {0}")]
    Encode(#[source] serde_json::Error),

    /// A frame was not a valid packet.
    #[error("failed to decode missive packet: {0}")]
    Decode(#[source] serde_json::Error),

    /// A decoded packet carried a message over the length cap.
    #[error("packet message has {chars} characters, limit is {MAX_MISSIVE_CHARS}")]
    MessageTooLong {
        /// Length of the offending message in characters.
        chars: usize,
    },

    /// A reply arrived without a resolution.
    #[error("reply for target {target} carries no resolution")]
    MissingResolution {
        /// Target named in the reply.
        target: ActorId,
    },

    /// No peer link is registered for the actor.
    #[error("no resolver peer registered for actor {actor}")]
    UnknownPeer {
        /// The actor whose peer was looked up.
        actor: ActorId,
    },

    /// The other end of the link has gone away.
    #[error("resolver link for actor {actor} is closed")]
    LinkClosed {
        /// The actor the link belonged to.
        actor: ActorId,
    },
}
