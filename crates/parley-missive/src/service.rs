//! Missive entry points.
//!
//! [`MissiveService`] validates a missive, gates it on the sender's items
//! through its [`ItemResolver`], consumes the paying item and hands the
//! missive to the [`DeliveryScheduler`]. Every rejection is reported to an
//! addressable sender before it is returned to the caller, so callers only
//! need to log.
//!
//! With a remote resolver the send completes on a later tick: the reply
//! comes back through [`MissiveService::tick`], which re-validates it
//! against the authoritative world before anything is consumed.

use parley_chat::{Actor, SpatialDomain};
use parley_types::{ActorId, DeliveryId, Location, MissivePacket, Resolution};
use tracing::{debug, warn};

use crate::error::{MissiveError, ProtocolError};
use crate::inventory::consume_one;
use crate::protocol::PeerEndpoint;
use crate::requirement::ItemRequirement;
use crate::resolver::{ItemResolver, LocalResolver, ResolveStep, ResolvedReply};
use crate::rules::MissiveRules;
use crate::scheduler::{AdvanceReport, DeliveryScheduler, MissiveSender};

/// How an accepted send proceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The missive is in transit.
    Enqueued(DeliveryId),
    /// The item check is running on a resolver peer.
    AwaitingResolution,
}

/// What one [`MissiveService::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MissiveTick {
    /// Resolver replies that ended in an enqueue.
    pub accepted: u32,
    /// Resolver replies that were rejected.
    pub rejected: u32,
    /// The scheduler's advance.
    pub advance: AdvanceReport,
}

/// Front door for missives.
pub struct MissiveService {
    rules: MissiveRules,
    scheduler: DeliveryScheduler,
    resolver: Box<dyn ItemResolver>,
}

impl std::fmt::Debug for MissiveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissiveService")
            .field("rules", &self.rules)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl MissiveService {
    /// Create a service with the given resolver.
    pub fn new(rules: MissiveRules, resolver: Box<dyn ItemResolver>) -> Self {
        let scheduler = DeliveryScheduler::new(rules.delay);
        Self {
            rules,
            scheduler,
            resolver,
        }
    }

    /// Create a service that resolves items on the authoritative side.
    pub fn local(rules: MissiveRules) -> Self {
        Self::new(rules, Box::new(LocalResolver::new()))
    }

    /// The rules in use.
    pub const fn rules(&self) -> &MissiveRules {
        &self.rules
    }

    /// The delivery queue.
    pub const fn scheduler(&self) -> &DeliveryScheduler {
        &self.scheduler
    }

    /// Attach a resolver peer for `actor`, if the resolver uses peers.
    pub fn connect_peer(&mut self, actor: ActorId) -> Option<PeerEndpoint> {
        self.resolver.connect_peer(actor)
    }

    /// Detach the resolver peer for `actor`.
    pub fn disconnect_peer(&mut self, actor: ActorId) {
        self.resolver.disconnect_peer(actor);
    }

    /// Send a missive from a connected actor to the actor named
    /// `target_name`.
    pub fn send_missive<D: SpatialDomain>(
        &mut self,
        domain: &mut D,
        sender: ActorId,
        target_name: &str,
        message: &str,
    ) -> Result<SendOutcome, MissiveError> {
        if domain.actor(sender).is_none() {
            return Err(MissiveError::SenderUnavailable { sender });
        }
        if let Err(e) = self.check_length(message) {
            return Err(reject(domain, sender, e));
        }
        let Some(target) = domain.find_by_name(target_name) else {
            return Err(reject(
                domain,
                sender,
                MissiveError::UnknownTarget {
                    name: target_name.to_owned(),
                },
            ));
        };

        let Some(requirement) = self.rules.items.as_ref() else {
            return self.accept(domain, sender, target, message.to_owned());
        };

        let step = {
            let inventory = domain
                .actor(sender)
                .map(Actor::inventory)
                .ok_or(MissiveError::SenderUnavailable { sender })?;
            let request = MissivePacket::request(message.to_owned(), target);
            self.resolver.begin(requirement, sender, inventory, request)
        };

        match step {
            Ok(ResolveStep::Ready(Resolution::NotFound)) => {
                let notice = requirement.notice();
                Err(reject(domain, sender, MissiveError::ItemsMissing { notice }))
            }
            Ok(ResolveStep::Ready(resolution)) => {
                self.settle(domain, sender, target, message.to_owned(), resolution)
            }
            Ok(ResolveStep::Deferred) => {
                debug!(%sender, %target, "missive awaiting item resolution");
                Ok(SendOutcome::AwaitingResolution)
            }
            Err(e) => {
                warn!(%sender, error = %e, "item resolution could not start");
                Err(reject(domain, sender, MissiveError::Protocol(e)))
            }
        }
    }

    /// Send a missive from a non-actor source. Announcements are never
    /// item-gated and produce no acknowledgement or receipts.
    pub fn send_announcement<D: SpatialDomain>(
        &mut self,
        domain: &mut D,
        name: &str,
        location: Location,
        target_name: &str,
        message: &str,
    ) -> Result<DeliveryId, MissiveError> {
        self.check_length(message)?;
        let target = domain
            .find_by_name(target_name)
            .ok_or_else(|| MissiveError::UnknownTarget {
                name: target_name.to_owned(),
            })?;
        let sender = MissiveSender::Named {
            name: name.to_owned(),
            location,
        };
        self.scheduler
            .enqueue(domain, message.to_owned(), sender, target)
    }

    /// Continue a send after a resolver peer answered.
    pub fn on_reply<D: SpatialDomain>(
        &mut self,
        domain: &mut D,
        reply: ResolvedReply,
    ) -> Result<SendOutcome, MissiveError> {
        let ResolvedReply { sender, packet } = reply;
        let MissivePacket {
            message,
            target,
            resolution,
        } = packet;

        if domain.actor(sender).is_none() {
            return Err(MissiveError::SenderUnavailable { sender });
        }
        if let Err(e) = self.check_length(&message) {
            return Err(reject(domain, sender, e));
        }
        let resolution = resolution.ok_or(ProtocolError::MissingResolution { target })?;
        if resolution == Resolution::NotFound {
            return Err(MissiveError::RemoteRefused);
        }
        if domain.actor(target).is_none() {
            return Err(reject(domain, sender, MissiveError::TargetVanished { target }));
        }

        self.settle(domain, sender, target, message, resolution)
    }

    /// Process resolver replies, then advance the delivery queue by one
    /// tick.
    pub fn tick<D: SpatialDomain>(&mut self, domain: &mut D) -> MissiveTick {
        let mut report = MissiveTick::default();

        for reply in self.resolver.poll_replies() {
            let sender = reply.sender;
            match self.on_reply(domain, reply) {
                Ok(_) => report.accepted = report.accepted.saturating_add(1),
                Err(e) => {
                    debug!(%sender, error = %e, "resolver reply rejected");
                    report.rejected = report.rejected.saturating_add(1);
                }
            }
        }

        report.advance = self.scheduler.advance(domain);
        report
    }

    fn check_length(&self, message: &str) -> Result<(), MissiveError> {
        let chars = message.chars().count();
        if chars > self.rules.max_length {
            return Err(MissiveError::MessageTooLong {
                chars,
                limit: self.rules.max_length,
            });
        }
        Ok(())
    }

    /// Verify `resolution` against the authoritative inventory, consume the
    /// paying item and enqueue.
    fn settle<D: SpatialDomain>(
        &mut self,
        domain: &mut D,
        sender: ActorId,
        target: ActorId,
        message: String,
        resolution: Resolution,
    ) -> Result<SendOutcome, MissiveError> {
        let Some(requirement) = self.rules.items.as_ref() else {
            return self.accept(domain, sender, target, message);
        };

        if let Err(e) = pay(domain, requirement, sender, resolution) {
            return Err(reject(domain, sender, e));
        }
        self.accept(domain, sender, target, message)
    }

    fn accept<D: SpatialDomain>(
        &mut self,
        domain: &mut D,
        sender: ActorId,
        target: ActorId,
        message: String,
    ) -> Result<SendOutcome, MissiveError> {
        self.scheduler
            .enqueue(domain, message, MissiveSender::Actor(sender), target)
            .map(SendOutcome::Enqueued)
            .map_err(|e| reject(domain, sender, e))
    }
}

/// Check that `resolution` still holds and consume its slot, if any.
fn pay<D: SpatialDomain>(
    domain: &mut D,
    requirement: &ItemRequirement,
    sender: ActorId,
    resolution: Resolution,
) -> Result<(), MissiveError> {
    let actor = domain
        .actor_mut(sender)
        .ok_or(MissiveError::SenderUnavailable { sender })?;
    let stale = |slot| MissiveError::StaleResolution { slot };

    if !requirement.qualifies(actor.inventory(), resolution) {
        let slot = match resolution {
            Resolution::Catalyst(slot) | Resolution::Consumable(slot) => slot,
            Resolution::NotFound => return Err(MissiveError::RemoteRefused),
        };
        return Err(stale(slot));
    }

    if let Some(slot) = resolution.consumed_slot() {
        let item = consume_one(actor.inventory_mut(), slot).ok_or_else(|| stale(slot))?;
        debug!(%sender, %item, ?slot, "missive item consumed");
    }
    Ok(())
}

/// Tell the sender why their missive was rejected.
fn reject<D: SpatialDomain>(domain: &mut D, sender: ActorId, error: MissiveError) -> MissiveError {
    if let Some(notice) = error.user_notice() {
        domain.send_to(sender, &notice);
    }
    debug!(%sender, %error, "missive rejected");
    error
}
