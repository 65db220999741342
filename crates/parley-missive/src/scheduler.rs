//! Deferred delivery queue.
//!
//! Each accepted missive becomes a [`PendingDelivery`] with a travel time
//! in ticks. [`DeliveryScheduler::advance`] runs once per tick: it bumps
//! every entry's elapsed counter and resolves the entries that are due,
//! removing them in the same pass. An entry with delay `k` is still pending
//! after `k - 1` advances and resolves on the `k`-th, exactly once.
//!
//! Resolution never fails loudly. A target who left before arrival turns
//! the missive around to its sender; a sender who left simply misses the
//! receipt.

use parley_chat::{Actor, SpatialDomain};
use parley_types::{ActorId, DeliveryId, Location};
use tracing::{debug, info};

use crate::error::MissiveError;
use crate::notices;
use crate::rules::DelayRules;

/// Who a missive is from.
#[derive(Debug, Clone, PartialEq)]
pub enum MissiveSender {
    /// A connected actor, who gets acknowledgements and receipts.
    Actor(ActorId),
    /// A non-actor source such as a scripted announcement. It has a name
    /// and a location but receives nothing back.
    Named {
        /// Name shown to the target.
        name: String,
        /// Where the missive departs from.
        location: Location,
    },
}

impl MissiveSender {
    /// The sending actor, if the sender is addressable.
    pub const fn actor(&self) -> Option<ActorId> {
        match self {
            Self::Actor(id) => Some(*id),
            Self::Named { .. } => None,
        }
    }
}

/// A missive in transit.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelivery {
    /// Identity of this delivery.
    pub id: DeliveryId,
    /// The missive text.
    pub message: String,
    /// Who sent it.
    pub sender: MissiveSender,
    /// Sender's name as captured on enqueue.
    pub sender_name: String,
    /// Who it is for.
    pub target: ActorId,
    /// Target's name as captured on enqueue, used if the target is gone.
    pub target_name: String,
    /// Total travel time in ticks.
    pub delay_ticks: u64,
    /// Ticks spent in transit so far.
    pub elapsed: u64,
}

impl PendingDelivery {
    /// Whether the travel time has run out.
    pub const fn is_due(&self) -> bool {
        self.elapsed >= self.delay_ticks
    }

    /// Ticks left before arrival.
    pub const fn remaining(&self) -> u64 {
        self.delay_ticks.saturating_sub(self.elapsed)
    }
}

/// What one [`DeliveryScheduler::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceReport {
    /// Missives handed to their target.
    pub delivered: u32,
    /// Missives whose target was gone.
    pub returned: u32,
    /// Missives still in transit afterwards.
    pub pending: usize,
}

/// Queue of missives in transit.
#[derive(Debug, Clone, Default)]
pub struct DeliveryScheduler {
    delay: DelayRules,
    queue: Vec<PendingDelivery>,
}

impl DeliveryScheduler {
    /// Create an empty scheduler.
    pub const fn new(delay: DelayRules) -> Self {
        Self {
            delay,
            queue: Vec::new(),
        }
    }

    /// The travel-time parameters.
    pub const fn delay_rules(&self) -> &DelayRules {
        &self.delay
    }

    /// Missives in transit, in queue order.
    pub fn pending(&self) -> &[PendingDelivery] {
        &self.queue
    }

    /// Number of missives in transit.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is in transit.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queue `message` from `sender` to `target`.
    ///
    /// Snapshots both names, computes the travel time and acknowledges an
    /// addressable sender. Fails if either actor is not connected.
    pub fn enqueue<D: SpatialDomain>(
        &mut self,
        domain: &mut D,
        message: String,
        sender: MissiveSender,
        target: ActorId,
    ) -> Result<DeliveryId, MissiveError> {
        let (sender_name, origin) = match &sender {
            MissiveSender::Actor(id) => {
                let actor = domain
                    .actor(*id)
                    .ok_or(MissiveError::SenderUnavailable { sender: *id })?;
                (actor.display_name().to_owned(), actor.location())
            }
            MissiveSender::Named { name, location } => (name.clone(), *location),
        };

        let recipient = domain
            .actor(target)
            .ok_or(MissiveError::TargetVanished { target })?;
        let target_name = recipient.display_name().to_owned();
        let delay_ticks = self.delay.delay_ticks(&origin, &recipient.location());

        let id = DeliveryId::new();
        if let Some(sender_id) = sender.actor() {
            domain.send_to(sender_id, &notices::being_delivered(&target_name));
        }

        debug!(
            delivery = %id,
            sender = %sender_name,
            target = %target_name,
            delay_ticks,
            "missive enqueued"
        );
        self.queue.push(PendingDelivery {
            id,
            message,
            sender,
            sender_name,
            target,
            target_name,
            delay_ticks,
            elapsed: 0,
        });
        Ok(id)
    }

    /// Advance every missive by one tick and resolve those that are due.
    pub fn advance<D: SpatialDomain>(&mut self, domain: &mut D) -> AdvanceReport {
        let mut report = AdvanceReport::default();

        self.queue.retain_mut(|entry| {
            entry.elapsed = entry.elapsed.saturating_add(1);
            if !entry.is_due() {
                return true;
            }
            resolve(domain, entry, &mut report);
            false
        });

        report.pending = self.queue.len();
        report
    }
}

/// Deliver or return a due missive.
fn resolve<D: SpatialDomain>(domain: &mut D, entry: &PendingDelivery, report: &mut AdvanceReport) {
    let sender = entry.sender.actor();

    if domain.actor(entry.target).is_none() {
        if let Some(sender) = sender {
            domain.send_to(sender, &notices::returned(&entry.target_name, &entry.message));
        }
        info!(delivery = %entry.id, target = %entry.target_name, "missive returned unread");
        report.returned = report.returned.saturating_add(1);
        return;
    }

    domain.send_to(
        entry.target,
        &notices::received(&entry.sender_name, &entry.message),
    );
    if let Some(sender) = sender {
        domain.send_to(sender, &notices::delivered(&entry.target_name));
    }
    info!(
        delivery = %entry.id,
        sender = %entry.sender_name,
        target = %entry.target_name,
        ticks = entry.elapsed,
        "missive delivered"
    );
    report.delivered = report.delivered.saturating_add(1);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parley_chat::{MemoryActor, MemoryWorld};
    use parley_types::{DimensionId, Position};

    use super::*;

    struct Fixture {
        world: MemoryWorld,
        scheduler: DeliveryScheduler,
        sender: ActorId,
        target: ActorId,
    }

    /// Sender and target `distance` blocks apart in one dimension.
    fn fixture(distance: f64) -> Fixture {
        let dimension = DimensionId::new();
        let mut world = MemoryWorld::new();
        let sender = world.join(MemoryActor::new(
            "Alice",
            Location::new(dimension, Position::default()),
        ));
        let target = world.join(MemoryActor::new(
            "Bob",
            Location::new(dimension, Position::new(distance, 0.0, 0.0)),
        ));
        Fixture {
            world,
            scheduler: DeliveryScheduler::new(DelayRules::default()),
            sender,
            target,
        }
    }

    #[test]
    fn enqueue_acknowledges_and_records_the_delay() {
        let mut f = fixture(100.0);

        f.scheduler
            .enqueue(
                &mut f.world,
                "hello".to_owned(),
                MissiveSender::Actor(f.sender),
                f.target,
            )
            .unwrap();

        assert_eq!(
            f.world.inbox(f.sender),
            ["§a§oYour missive to Bob is being delivered!".to_owned()]
        );
        assert_eq!(f.scheduler.pending().first().map(|p| p.delay_ticks), Some(120));
    }

    #[test]
    fn delivery_happens_on_exactly_the_delay_tick() {
        let mut f = fixture(100.0);
        f.scheduler
            .enqueue(
                &mut f.world,
                "hello".to_owned(),
                MissiveSender::Actor(f.sender),
                f.target,
            )
            .unwrap();

        for _ in 0..119 {
            let report = f.scheduler.advance(&mut f.world);
            assert_eq!(report.delivered, 0);
            assert_eq!(report.pending, 1);
        }
        assert!(f.world.inbox(f.target).is_empty());

        let report = f.scheduler.advance(&mut f.world);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.pending, 0);
        assert_eq!(
            f.world.inbox(f.target),
            ["§a§oYou receive a missive from Alice that reads: §e§ohello".to_owned()]
        );
        assert_eq!(
            f.world.inbox(f.sender).last().map(String::as_str),
            Some("§a§oYour missive to Bob has been delivered.")
        );

        let report = f.scheduler.advance(&mut f.world);
        assert_eq!(report, AdvanceReport::default());
        assert_eq!(f.world.inbox(f.target).len(), 1);
    }

    #[test]
    fn missing_target_returns_the_missive() {
        let mut f = fixture(0.0);
        f.scheduler
            .enqueue(
                &mut f.world,
                "see you".to_owned(),
                MissiveSender::Actor(f.sender),
                f.target,
            )
            .unwrap();
        f.world.leave(f.target);

        let returned: u32 = (0..60)
            .map(|_| f.scheduler.advance(&mut f.world).returned)
            .sum();

        assert_eq!(returned, 1);
        assert_eq!(
            f.world.inbox(f.sender).last().map(String::as_str),
            Some("§a§oYour missive to Bob returned unread. The missive read: §c§osee you")
        );
    }

    #[test]
    fn departed_sender_still_reaches_the_target() {
        let mut f = fixture(0.0);
        f.scheduler
            .enqueue(
                &mut f.world,
                "hi".to_owned(),
                MissiveSender::Actor(f.sender),
                f.target,
            )
            .unwrap();
        f.world.leave(f.sender);

        let delivered: u32 = (0..60)
            .map(|_| f.scheduler.advance(&mut f.world).delivered)
            .sum();

        assert_eq!(delivered, 1);
        assert_eq!(
            f.world.inbox(f.target),
            ["§a§oYou receive a missive from Alice that reads: §e§ohi".to_owned()]
        );
        assert!(f.world.inbox(f.sender).is_empty());
        assert!(f.scheduler.is_empty());
    }

    #[test]
    fn both_parties_gone_drops_the_missive_quietly() {
        let mut f = fixture(0.0);
        f.scheduler
            .enqueue(
                &mut f.world,
                "anyone?".to_owned(),
                MissiveSender::Actor(f.sender),
                f.target,
            )
            .unwrap();
        f.world.leave(f.sender);
        f.world.leave(f.target);

        let returned: u32 = (0..60)
            .map(|_| f.scheduler.advance(&mut f.world).returned)
            .sum();

        assert_eq!(returned, 1);
        assert!(f.scheduler.is_empty());
        assert!(f.world.inbox(f.sender).is_empty());
        assert!(f.world.inbox(f.target).is_empty());
    }

    #[test]
    fn named_sender_gets_no_receipts() {
        let mut f = fixture(0.0);
        let origin = f.world.actor(f.target).unwrap().location;
        f.scheduler
            .enqueue(
                &mut f.world,
                "the gates open at dawn".to_owned(),
                MissiveSender::Named {
                    name: "The Herald".to_owned(),
                    location: origin,
                },
                f.target,
            )
            .unwrap();

        while !f.scheduler.is_empty() {
            f.scheduler.advance(&mut f.world);
        }

        assert!(f.world.inbox(f.sender).is_empty());
        assert_eq!(
            f.world.inbox(f.target),
            ["§a§oYou receive a missive from The Herald that reads: §e§othe gates open at dawn"
                .to_owned()]
        );
    }

    #[test]
    fn removal_does_not_skip_neighbours() {
        let mut f = fixture(0.0);
        let far = f.world.join(MemoryActor::new(
            "Carol",
            Location::new(
                f.world.actor(f.sender).unwrap().location.dimension,
                Position::new(100.0, 0.0, 0.0),
            ),
        ));
        for (text, target) in [("one", f.target), ("two", far), ("three", f.target)] {
            f.scheduler
                .enqueue(
                    &mut f.world,
                    text.to_owned(),
                    MissiveSender::Actor(f.sender),
                    target,
                )
                .unwrap();
        }

        let mut report = AdvanceReport::default();
        for _ in 0..60 {
            report = f.scheduler.advance(&mut f.world);
        }

        assert_eq!(report.delivered, 2);
        assert_eq!(report.pending, 1);
        assert_eq!(f.world.inbox(f.target).len(), 2);
        assert_eq!(f.scheduler.pending().first().map(|p| p.remaining()), Some(60));
    }

    #[test]
    fn unknown_actors_are_rejected_on_enqueue() {
        let mut f = fixture(0.0);
        let ghost = ActorId::new();

        let result = f.scheduler.enqueue(
            &mut f.world,
            "boo".to_owned(),
            MissiveSender::Actor(ghost),
            f.target,
        );
        assert!(matches!(result, Err(MissiveError::SenderUnavailable { sender }) if sender == ghost));

        let result = f.scheduler.enqueue(
            &mut f.world,
            "boo".to_owned(),
            MissiveSender::Actor(f.sender),
            ghost,
        );
        assert!(matches!(result, Err(MissiveError::TargetVanished { target }) if target == ghost));
        assert!(f.scheduler.is_empty());
    }
}
