//! Wire payload exchanged with a remote resolver peer.
//!
//! A request carries only the message and target; the peer answers with
//! the same two fields plus the [`Resolution`] it computed against its own
//! view of the sender's inventory. TypeScript bindings are exported so a
//! non-Rust peer can speak the same format.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Resolution;
use crate::ids::ActorId;

/// Maximum missive length in characters, on the wire and at every entry point.
pub const MAX_MISSIVE_CHARS: usize = 800;

/// A missive resolution request or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MissivePacket {
    /// The missive text.
    pub message: String,
    /// The intended recipient.
    pub target: ActorId,
    /// Present on replies only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub resolution: Option<Resolution>,
}

impl MissivePacket {
    /// Build a request (no resolution yet).
    pub const fn request(message: String, target: ActorId) -> Self {
        Self {
            message,
            target,
            resolution: None,
        }
    }

    /// Turn a request into the reply carrying `resolution`.
    #[must_use]
    pub fn into_reply(self, resolution: Resolution) -> Self {
        Self {
            resolution: Some(resolution),
            ..self
        }
    }

    /// Length of the message in characters.
    pub fn message_chars(&self) -> usize {
        self.message.chars().count()
    }
}
