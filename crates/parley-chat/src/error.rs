//! Error types for the `parley-chat` crate.

use parley_types::DeliveryMode;

/// Errors returned by the spatial router.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The mode is not delivered immediately and must go through the
    /// missive scheduler instead.
    #[error("{mode} is a deferred mode and cannot be routed immediately")]
    DeferredMode {
        /// The rejected mode.
        mode: DeliveryMode,
    },
}
