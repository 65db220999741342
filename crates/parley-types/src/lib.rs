//! Shared type definitions for the Parley messaging engine.
//!
//! This crate is the single source of truth for the data passed between
//! the router, the missive scheduler and the remote resolver peers. Wire
//! types flow to `TypeScript` via `ts-rs` so a non-Rust peer can implement
//! the resolver side.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for actors, dimensions and deliveries
//! - [`enums`] -- Delivery modes, inventory slots and resolution outcomes
//! - [`structs`] -- Positions, locations, item stacks and inventories
//! - [`packet`] -- The missive request/reply payload

pub mod enums;
pub mod ids;
pub mod packet;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DeliveryMode, InventorySlot, Resolution};
pub use ids::{ActorId, DeliveryId, DimensionId};
pub use packet::{MAX_MISSIVE_CHARS, MissivePacket};
pub use structs::{Inventory, ItemStack, Location, Position};
