//! Spatial chat routing and distance muffling for the Parley messaging engine.
//!
//! This crate owns everything that happens within a single tick: deciding
//! who hears a message and how much of it they hear. It talks to the host
//! only through the traits in [`domain`], so the same router runs against
//! a game server, a test fixture or the in-memory world in [`memory`].
//!
//! # Modules
//!
//! - [`domain`] -- Host collaborator traits ([`Actor`], [`SpatialDomain`])
//! - [`error`] -- Routing errors ([`RouteError`])
//! - [`memory`] -- In-memory host world ([`MemoryWorld`])
//! - [`muffle`] -- Distance muffling codec ([`Muffler`], [`degrade`])
//! - [`notices`] -- Player-facing line formats
//! - [`router`] -- Per-mode recipient selection ([`SpatialRouter`])
//! - [`rules`] -- Range parameters ([`ChatRules`])

pub mod domain;
pub mod error;
pub mod memory;
pub mod muffle;
pub mod notices;
pub mod router;
pub mod rules;

// Re-export primary types at crate root for convenience.
pub use domain::{Actor, SpatialDomain};
pub use error::RouteError;
pub use memory::{MemoryActor, MemoryWorld};
pub use muffle::{MuffleStyle, Muffler, degrade};
pub use router::{RouteReport, Speaker, SpatialRouter};
pub use rules::ChatRules;
