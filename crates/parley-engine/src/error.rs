//! Error types for the engine binary.
//!
//! [`AppError`] is the top-level error type that wraps all possible
//! failure modes during startup and the tick loop.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: parley_core::ConfigError,
    },

    /// The engine rejected a call.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: parley_core::EngineError,
    },

    /// Reading input failed.
    #[error("input error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A chat line named an actor that is not in the world.
    #[error("no actor named {name}")]
    UnknownActor {
        /// The name given.
        name: String,
    },

    /// The tick task stopped unexpectedly.
    #[error("tick task failed: {message}")]
    Task {
        /// Description of the failure.
        message: String,
    },
}
