//! Error types for the `parley-core` crate.
//!
//! [`EngineError`] wraps every failure the engine facade can surface, so a
//! host can propagate it with `?`.

use parley_chat::RouteError;
use parley_missive::MissiveError;
use parley_types::ActorId;

use crate::clock::ClockError;
use crate::config::ConfigError;

/// Errors returned by [`Engine`](crate::engine::Engine).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration was invalid.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The tick clock could not be created or advanced.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// Routing an immediate message failed.
    #[error("route error: {source}")]
    Route {
        /// The underlying route error.
        #[from]
        source: RouteError,
    },

    /// A missive was rejected. The sender has already been told why.
    #[error("missive error: {source}")]
    Missive {
        /// The underlying missive error.
        #[from]
        source: MissiveError,
    },

    /// The speaking actor is not connected.
    #[error("actor {actor} is not connected")]
    UnknownSpeaker {
        /// The missing actor.
        actor: ActorId,
    },

    /// Missives are turned off in the configuration.
    #[error("missives are disabled")]
    MissivesDisabled,
}
