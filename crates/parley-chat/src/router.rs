//! Spatial message router for the immediate delivery modes.
//!
//! Every mode follows the same two-step selection: ask the domain for the
//! actors inside an axis-aligned box, then re-filter each candidate by
//! squared distance against the mode's ranges. The box alone would let
//! listeners in its corners hear more than the circular range allows.
//!
//! | Mode | Box half extent | Behaviour |
//! |---|---|---|
//! | Say | `2R` | clear below `R^2`, muffled below `(2R)^2` |
//! | Emote | `R` | styled line below `R^2` |
//! | Shout | `3R` | reflexive for the speaker, third person below `(3R)^2` |
//! | Whisper | `W + 1` | full message up to `W^2`, notice below `(W + 1)^2` |
//! | Broadcast | none | every connected actor |
//!
//! A non-authoritative domain is a silent no-op.

use parley_types::{ActorId, DeliveryMode, Location};
use rand::Rng;
use tracing::debug;

use crate::domain::{Actor, SpatialDomain};
use crate::error::RouteError;
use crate::muffle::Muffler;
use crate::notices;
use crate::rules::ChatRules;

/// Who is speaking.
///
/// Speakers are usually actors, but commands may also originate from
/// non-actor sources (a console, a scripted block) that only have a name
/// and a location.
#[derive(Debug, Clone, PartialEq)]
pub struct Speaker {
    /// The speaking actor, if the source is one.
    pub id: Option<ActorId>,
    /// Name shown to listeners.
    pub name: String,
    /// Where the message originates.
    pub location: Location,
}

impl Speaker {
    /// Snapshot an actor as a speaker.
    pub fn of(actor: &impl Actor) -> Self {
        Self {
            id: Some(actor.id()),
            name: actor.display_name().to_owned(),
            location: actor.location(),
        }
    }

    /// A non-actor source.
    pub fn named(name: impl Into<String>, location: Location) -> Self {
        Self {
            id: None,
            name: name.into(),
            location,
        }
    }

    fn is(&self, id: ActorId) -> bool {
        self.id == Some(id)
    }
}

/// What a single routing call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteReport {
    /// Listeners who received the full message (speaker included).
    pub delivered: u32,
    /// Listeners who received a muffled copy.
    pub muffled: u32,
    /// Listeners who received a content-free notice.
    pub notices: u32,
    /// Set when the domain was not authoritative and nothing was sent.
    pub skipped: bool,
}

impl RouteReport {
    const fn skipped() -> Self {
        Self {
            delivered: 0,
            muffled: 0,
            notices: 0,
            skipped: true,
        }
    }

    /// Total number of lines sent.
    pub const fn reached(&self) -> u32 {
        self.delivered
            .saturating_add(self.muffled)
            .saturating_add(self.notices)
    }
}

/// Routes immediate messages to listeners selected by distance.
#[derive(Debug, Clone)]
pub struct SpatialRouter {
    /// Range configuration.
    rules: ChatRules,
    /// Muffler wrapping at the Say falloff range.
    muffler: Muffler,
}

impl SpatialRouter {
    /// Create a router from its range rules.
    pub fn new(rules: ChatRules) -> Self {
        let muffler = Muffler::new(rules.falloff_sq(), rules.style);
        Self { rules, muffler }
    }

    /// The range rules in use.
    pub const fn rules(&self) -> &ChatRules {
        &self.rules
    }

    /// Route `message` in the given immediate `mode`.
    ///
    /// `rng` seeds the muffle offset once for the whole call.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::DeferredMode`] for [`DeliveryMode::Missive`].
    pub fn route<D: SpatialDomain>(
        &self,
        domain: &mut D,
        mode: DeliveryMode,
        speaker: &Speaker,
        message: &str,
        rng: &mut impl Rng,
    ) -> Result<RouteReport, RouteError> {
        let report = match mode {
            DeliveryMode::Say | DeliveryMode::SayNoSymbols => {
                let offset = rng.random::<f64>() * self.muffler.threshold();
                self.say(domain, speaker, message, offset)
            }
            DeliveryMode::Emote => self.emote(domain, speaker, message),
            DeliveryMode::Shout => self.shout(domain, speaker, message),
            DeliveryMode::Whisper => self.whisper(domain, speaker, message),
            DeliveryMode::Broadcast => Self::broadcast(domain, message),
            DeliveryMode::Missive => return Err(RouteError::DeferredMode { mode }),
        };

        debug!(
            %mode,
            speaker = %speaker.name,
            delivered = report.delivered,
            muffled = report.muffled,
            notices = report.notices,
            skipped = report.skipped,
            "message routed"
        );
        Ok(report)
    }

    /// Distance chat. Listeners inside `R` hear the message clearly, those
    /// inside `2R` hear it muffled starting from `start_offset`.
    pub fn say<D: SpatialDomain>(
        &self,
        domain: &mut D,
        speaker: &Speaker,
        message: &str,
        start_offset: f64,
    ) -> RouteReport {
        if !domain.is_authoritative() {
            return RouteReport::skipped();
        }

        let clear_sq = self.rules.clear_sq();
        let falloff_sq = self.rules.falloff_sq();
        let mut report = RouteReport::default();

        for (id, distance_sq) in candidates(domain, &speaker.location, self.rules.say_extent()) {
            if distance_sq < clear_sq {
                if domain.send_to(id, &notices::say(&speaker.name, message)) {
                    report.delivered = report.delivered.saturating_add(1);
                }
            } else if distance_sq < falloff_sq {
                let muffled = self.muffler.muffle(message, distance_sq, start_offset);
                if domain.send_to(id, &notices::say(&speaker.name, &muffled)) {
                    report.muffled = report.muffled.saturating_add(1);
                }
            }
        }
        report
    }

    /// Emote to everyone within `R`.
    pub fn emote<D: SpatialDomain>(
        &self,
        domain: &mut D,
        speaker: &Speaker,
        message: &str,
    ) -> RouteReport {
        if !domain.is_authoritative() {
            return RouteReport::skipped();
        }

        let line = notices::emote(&speaker.name, message);
        let clear_sq = self.rules.clear_sq();
        let mut report = RouteReport::default();

        for (id, distance_sq) in candidates(domain, &speaker.location, self.rules.range) {
            if distance_sq < clear_sq && domain.send_to(id, &line) {
                report.delivered = report.delivered.saturating_add(1);
            }
        }
        report
    }

    /// Shout to everyone within `3R`. The speaker always gets the reflexive
    /// line, matched by identity.
    pub fn shout<D: SpatialDomain>(
        &self,
        domain: &mut D,
        speaker: &Speaker,
        message: &str,
    ) -> RouteReport {
        if !domain.is_authoritative() {
            return RouteReport::skipped();
        }

        let mut report = RouteReport::default();
        if let Some(id) = speaker.id {
            if domain.send_to(id, &notices::shout_reflexive(message)) {
                report.delivered = report.delivered.saturating_add(1);
            }
        }

        let line = notices::shout(&speaker.name, message);
        let shout_sq = self.rules.shout_sq();
        for (id, distance_sq) in candidates(domain, &speaker.location, self.rules.shout_extent()) {
            if speaker.is(id) {
                continue;
            }
            if distance_sq < shout_sq && domain.send_to(id, &line) {
                report.delivered = report.delivered.saturating_add(1);
            }
        }
        report
    }

    /// Whisper to everyone within `W` (inclusive); listeners strictly
    /// between `W` and `W + 1` only learn that a whisper happened.
    pub fn whisper<D: SpatialDomain>(
        &self,
        domain: &mut D,
        speaker: &Speaker,
        message: &str,
    ) -> RouteReport {
        if !domain.is_authoritative() {
            return RouteReport::skipped();
        }

        let mut report = RouteReport::default();
        if let Some(id) = speaker.id {
            if domain.send_to(id, &notices::whisper_reflexive(message)) {
                report.delivered = report.delivered.saturating_add(1);
            }
        }

        let full = notices::whisper(&speaker.name, message);
        let notice = notices::whisper_notice(&speaker.name);
        let whisper_sq = self.rules.whisper_sq();
        let notice_sq = self.rules.whisper_notice_sq();

        for (id, distance_sq) in candidates(
            domain,
            &speaker.location,
            self.rules.whisper_notice_extent(),
        ) {
            if speaker.is(id) {
                continue;
            }
            if distance_sq <= whisper_sq {
                if domain.send_to(id, &full) {
                    report.delivered = report.delivered.saturating_add(1);
                }
            } else if distance_sq < notice_sq && domain.send_to(id, &notice) {
                report.notices = report.notices.saturating_add(1);
            }
        }
        report
    }

    /// Send an unattributed broadcast to every connected actor.
    pub fn broadcast<D: SpatialDomain>(domain: &mut D, message: &str) -> RouteReport {
        if !domain.is_authoritative() {
            return RouteReport::skipped();
        }

        let line = notices::broadcast(message);
        let mut report = RouteReport::default();
        for id in domain.connected_actors() {
            if domain.send_to(id, &line) {
                report.delivered = report.delivered.saturating_add(1);
            }
        }
        report
    }
}

/// Box-query `center` and pair each candidate with its squared distance.
///
/// Candidates that vanished or sit in another dimension are dropped.
fn candidates<D: SpatialDomain>(
    domain: &D,
    center: &Location,
    half_extent: f64,
) -> Vec<(ActorId, f64)> {
    domain
        .query_box(center, half_extent)
        .into_iter()
        .filter_map(|id| {
            let actor = domain.actor(id)?;
            let distance_sq = center.distance_sq(&actor.location())?;
            Some((id, distance_sq))
        })
        .collect()
}
