//! The engine facade.
//!
//! [`Engine`] owns everything a host needs to run Parley: the validated
//! configuration, the chat dispatcher, the spatial router, the missive
//! service and the tick clock. The host keeps the world and passes it in
//! on every call, so the engine never holds a reference into host state.
//!
//! A host calls [`Engine::handle_chat`] for every chat line,
//! [`Engine::send_missive`] and [`Engine::send_announcement`] from its
//! command layer, and [`Engine::tick`] once per tick boundary.

use parley_chat::{RouteReport, Speaker, SpatialDomain, SpatialRouter};
use parley_missive::{
    ItemResolver, LocalResolver, MissiveService, MissiveTick, PeerEndpoint, RemoteResolver,
    SendOutcome,
};
use parley_types::{ActorId, DeliveryId, Location};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::clock::TickClock;
use crate::config::ParleyConfig;
use crate::dispatch::{ChatCommand, ChatDispatcher, Privileges};
use crate::error::EngineError;

/// What happened to a chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The line was routed immediately.
    Routed(RouteReport),
    /// The line was a missive.
    Missive(SendOutcome),
    /// Distance chat is off; the host should deliver the line itself.
    Passthrough(String),
    /// The speaker was told why nothing was sent.
    Rejected,
}

/// What one [`Engine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTick {
    /// The tick that just began.
    pub tick: u64,
    /// Missive activity during the tick.
    pub missives: MissiveTick,
}

/// The Parley engine.
#[derive(Debug)]
pub struct Engine {
    config: ParleyConfig,
    dispatcher: ChatDispatcher,
    router: SpatialRouter,
    missives: MissiveService,
    clock: TickClock,
    rng: StdRng,
}

impl Engine {
    /// Build an engine from a configuration.
    ///
    /// Items are resolved on the authoritative side when
    /// `missive.items.resolve_locally` is set, and by per-actor resolver
    /// peers otherwise (see [`Engine::connect_peer`]).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration fails
    /// validation, or [`EngineError::Clock`] if the tick rate is invalid.
    pub fn new(config: ParleyConfig) -> Result<Self, EngineError> {
        let resolver: Box<dyn ItemResolver> = if config.missive.items.resolve_locally {
            Box::new(LocalResolver::new())
        } else {
            Box::new(RemoteResolver::new())
        };
        Self::with_resolver(config, resolver)
    }

    /// Build an engine with an explicit item resolver.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::new`].
    pub fn with_resolver(
        config: ParleyConfig,
        resolver: Box<dyn ItemResolver>,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let clock = TickClock::new(config.missive.ticks_per_second)?;
        let rng = config
            .engine
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        let engine = Self {
            dispatcher: ChatDispatcher::new(&config.chat, config.missive.enabled),
            router: SpatialRouter::new(config.chat.rules()),
            missives: MissiveService::new(config.missive.rules(), resolver),
            clock,
            rng,
            config,
        };

        info!(
            range = engine.config.chat.range,
            whisper_range = engine.config.chat.whisper_range,
            missives = engine.config.missive.enabled,
            item_gating = engine.config.missive.items.enabled,
            resolve_locally = engine.config.missive.items.resolve_locally,
            "engine ready"
        );
        Ok(engine)
    }

    /// The configuration in use.
    pub const fn config(&self) -> &ParleyConfig {
        &self.config
    }

    /// The tick clock.
    pub const fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// The spatial router.
    pub const fn router(&self) -> &SpatialRouter {
        &self.router
    }

    /// The missive service.
    pub const fn missives(&self) -> &MissiveService {
        &self.missives
    }

    /// Privileges for an actor at `level`.
    pub const fn privileges(&self, level: u32) -> Privileges {
        Privileges::from_level(level, &self.config.permissions)
    }

    /// Attach a resolver peer for `actor`. Returns `None` when items are
    /// resolved locally.
    pub fn connect_peer(&mut self, actor: ActorId) -> Option<PeerEndpoint> {
        self.missives.connect_peer(actor)
    }

    /// Detach the resolver peer for `actor`.
    pub fn disconnect_peer(&mut self, actor: ActorId) {
        self.missives.disconnect_peer(actor);
    }

    /// Handle one chat line from a connected actor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSpeaker`] if `speaker` is not
    /// connected, or [`EngineError::Missive`] if a missive line was
    /// rejected (the speaker has been told why).
    pub fn handle_chat<D: SpatialDomain>(
        &mut self,
        domain: &mut D,
        speaker: ActorId,
        line: &str,
        privileges: Privileges,
    ) -> Result<ChatOutcome, EngineError> {
        let source = domain
            .actor(speaker)
            .map(Speaker::of)
            .ok_or(EngineError::UnknownSpeaker { actor: speaker })?;

        match self.dispatcher.classify(line, privileges) {
            ChatCommand::Route { mode, message } => {
                let report = self
                    .router
                    .route(domain, mode, &source, &message, &mut self.rng)?;
                Ok(ChatOutcome::Routed(report))
            }
            ChatCommand::Missive { target, message } => {
                let outcome = self.send_missive(domain, speaker, &target, &message)?;
                Ok(ChatOutcome::Missive(outcome))
            }
            ChatCommand::Passthrough(line) => Ok(ChatOutcome::Passthrough(line)),
            ChatCommand::Rejected { notice } => {
                domain.send_to(speaker, &notice);
                debug!(%speaker, "chat line rejected");
                Ok(ChatOutcome::Rejected)
            }
        }
    }

    /// Send a missive from a connected actor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissivesDisabled`] when missives are off, or
    /// [`EngineError::Missive`] when the missive was rejected.
    pub fn send_missive<D: SpatialDomain>(
        &mut self,
        domain: &mut D,
        sender: ActorId,
        target_name: &str,
        message: &str,
    ) -> Result<SendOutcome, EngineError> {
        if !self.config.missive.enabled {
            return Err(EngineError::MissivesDisabled);
        }
        Ok(self
            .missives
            .send_missive(domain, sender, target_name, message)?)
    }

    /// Send a missive on behalf of a non-actor source.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissivesDisabled`] when missives are off, or
    /// [`EngineError::Missive`] when the missive was rejected.
    pub fn send_announcement<D: SpatialDomain>(
        &mut self,
        domain: &mut D,
        name: &str,
        location: Location,
        target_name: &str,
        message: &str,
    ) -> Result<DeliveryId, EngineError> {
        if !self.config.missive.enabled {
            return Err(EngineError::MissivesDisabled);
        }
        Ok(self
            .missives
            .send_announcement(domain, name, location, target_name, message)?)
    }

    /// Run one tick: advance the clock, pick up resolver replies and
    /// advance the delivery queue.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Clock`] if the tick counter would overflow.
    pub fn tick<D: SpatialDomain>(&mut self, domain: &mut D) -> Result<EngineTick, EngineError> {
        let tick = self.clock.advance()?;
        let missives = self.missives.tick(domain);

        let advance = missives.advance;
        if advance.delivered > 0 || advance.returned > 0 || missives.rejected > 0 {
            info!(
                tick,
                accepted = missives.accepted,
                rejected = missives.rejected,
                delivered = advance.delivered,
                returned = advance.returned,
                pending = advance.pending,
                "missive activity"
            );
        } else {
            debug!(tick, pending = advance.pending, "tick complete");
        }

        Ok(EngineTick { tick, missives })
    }
}
