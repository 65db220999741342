//! Distance-delayed missives for the Parley messaging engine.
//!
//! A missive is a private message that travels: it arrives after a delay
//! derived from the distance between sender and target, and may require
//! the sender to hold (or spend) an item. Item checks can run on the
//! authoritative side or on a resolver peer that owns its own view of the
//! sender's inventory.
//!
//! # Modules
//!
//! - [`error`] -- Missive and protocol errors ([`MissiveError`], [`ProtocolError`])
//! - [`inventory`] -- Consuming the paying item
//! - [`notices`] -- Player-facing delivery lines
//! - [`peer`] -- The resolver side of the handshake ([`ResolverPeer`])
//! - [`protocol`] -- JSON framing and the peer link ([`PeerLink`], [`PeerEndpoint`])
//! - [`requirement`] -- Catalysts, consumables and the search order ([`ItemRequirement`])
//! - [`resolver`] -- Local and remote resolution ([`ItemResolver`])
//! - [`rules`] -- Travel-time and gating parameters ([`MissiveRules`])
//! - [`scheduler`] -- The delivery queue ([`DeliveryScheduler`])
//! - [`service`] -- Entry points ([`MissiveService`])

pub mod error;
pub mod inventory;
pub mod notices;
pub mod peer;
pub mod protocol;
pub mod requirement;
pub mod resolver;
pub mod rules;
pub mod scheduler;
pub mod service;

// Re-export primary types at crate root for convenience.
pub use error::{MissiveError, ProtocolError};
pub use inventory::consume_one;
pub use peer::{PeerReport, ResolverPeer};
pub use protocol::{PeerEndpoint, PeerLink};
pub use requirement::ItemRequirement;
pub use resolver::{ItemResolver, LocalResolver, RemoteResolver, ResolveStep, ResolvedReply};
pub use rules::{DelayRules, MissiveRules};
pub use scheduler::{AdvanceReport, DeliveryScheduler, MissiveSender, PendingDelivery};
pub use service::{MissiveService, MissiveTick, SendOutcome};
