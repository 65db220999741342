//! Configuration, tick clock, chat dispatch and the engine facade for the
//! Parley messaging engine.
//!
//! This crate ties the router and the missive service together behind a
//! single [`Engine`] that a host drives with chat lines, commands and tick
//! boundaries.
//!
//! # Modules
//!
//! - [`clock`] -- Monotonic tick counter ([`TickClock`])
//! - [`config`] -- Loading `parley-config.yaml` into strongly-typed structs
//! - [`dispatch`] -- Classifying chat lines by their leading symbol
//! - [`engine`] -- The [`Engine`] facade
//! - [`error`] -- [`EngineError`]

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;

pub use clock::{ClockError, TickClock};
pub use config::{ConfigError, ParleyConfig};
pub use dispatch::{ChatCommand, ChatDispatcher, Privileges};
pub use engine::{ChatOutcome, Engine, EngineTick};
pub use error::EngineError;
