//! The resolver side of the remote handshake.
//!
//! A [`ResolverPeer`] runs next to an actor's own copy of its inventory
//! (typically on that actor's client). Each tick it answers every pending
//! request by resolving the requirement locally. When nothing qualifies it
//! tells its actor directly and still replies `NotFound`, so the
//! authoritative side can drop the request.

use parley_chat::Actor;
use tracing::{debug, warn};

use crate::error::ProtocolError;
use crate::protocol::PeerEndpoint;
use crate::requirement::ItemRequirement;

/// What one [`ResolverPeer::process`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeerReport {
    /// Requests answered with a satisfied resolution.
    pub satisfied: u32,
    /// Requests answered with `NotFound`.
    pub refused: u32,
    /// Frames dropped because they could not be decoded.
    pub dropped: u32,
    /// Set once the authoritative side has gone away.
    pub closed: bool,
}

/// Answers resolution requests for one actor.
#[derive(Debug)]
pub struct ResolverPeer {
    endpoint: PeerEndpoint,
    requirement: ItemRequirement,
}

impl ResolverPeer {
    /// Create a peer answering on `endpoint` with the given requirement.
    pub const fn new(endpoint: PeerEndpoint, requirement: ItemRequirement) -> Self {
        Self {
            endpoint,
            requirement,
        }
    }

    /// Answer every request waiting on the endpoint.
    ///
    /// `actor` is this peer's view of the sending actor.
    pub fn process(&mut self, actor: &mut impl Actor) -> PeerReport {
        let mut report = PeerReport::default();

        loop {
            let request = match self.endpoint.try_request() {
                Ok(Some(request)) => request,
                Ok(None) => break,
                Err(ProtocolError::LinkClosed { .. }) => {
                    report.closed = true;
                    break;
                }
                Err(e) => {
                    warn!(actor = %self.endpoint.actor(), error = %e, "dropping resolver request");
                    report.dropped = report.dropped.saturating_add(1);
                    continue;
                }
            };

            let resolution = self.requirement.resolve(actor.inventory());
            if resolution.is_satisfied() {
                report.satisfied = report.satisfied.saturating_add(1);
            } else {
                actor.send(&self.requirement.notice());
                report.refused = report.refused.saturating_add(1);
            }

            debug!(
                actor = %self.endpoint.actor(),
                target = %request.target,
                ?resolution,
                "answering resolver request"
            );
            if let Err(e) = self.endpoint.send_reply(&request.into_reply(resolution)) {
                warn!(actor = %self.endpoint.actor(), error = %e, "resolver reply not sent");
                report.closed = true;
                break;
            }
        }

        report
    }
}
