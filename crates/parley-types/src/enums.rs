//! Enumeration types for the Parley messaging engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Delivery modes
// ---------------------------------------------------------------------------

/// How a message travels from its speaker to its recipients.
///
/// Every mode except [`DeliveryMode::Missive`] is delivered immediately by
/// the spatial router. Missives are queued and delivered after a
/// distance-derived delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeliveryMode {
    /// Local speech: clear up to the base range, muffled up to twice the
    /// base range.
    Say,
    /// Local speech selected because chat symbols are disabled. Routed
    /// exactly like [`DeliveryMode::Say`].
    SayNoSymbols,
    /// Third-person action text, visible within the base range.
    Emote,
    /// Raised voice, audible within three times the base range.
    Shout,
    /// Lowered voice, audible within the whisper range.
    Whisper,
    /// Server-wide announcement without sender attribution.
    Broadcast,
    /// Deferred letter delivered after a travel delay.
    Missive,
}

impl DeliveryMode {
    /// Whether this mode is delivered immediately by the router.
    pub const fn is_immediate(self) -> bool {
        !matches!(self, Self::Missive)
    }
}

impl core::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Say => "say",
            Self::SayNoSymbols => "say_no_symbols",
            Self::Emote => "emote",
            Self::Shout => "shout",
            Self::Whisper => "whisper",
            Self::Broadcast => "broadcast",
            Self::Missive => "missive",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Inventory slots and item resolution
// ---------------------------------------------------------------------------

/// A single addressable inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum InventorySlot {
    /// The primary hand.
    MainHand,
    /// The secondary hand.
    OffHand,
    /// A numbered storage slot (0-based).
    Index(usize),
}

/// Outcome of searching an actor's inventory for a missive requirement.
///
/// Exactly one winning slot is reported. Catalysts are never consumed;
/// consumables are consumed by the authoritative side once the missive is
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Resolution {
    /// No qualifying item was found.
    NotFound,
    /// A catalyst is held in the given slot.
    Catalyst(InventorySlot),
    /// A consumable sits in the given slot and must be consumed.
    Consumable(InventorySlot),
}

impl Resolution {
    /// Whether the requirement is satisfied.
    pub const fn is_satisfied(self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// The slot that must be consumed, if any.
    pub const fn consumed_slot(self) -> Option<InventorySlot> {
        match self {
            Self::Consumable(slot) => Some(slot),
            Self::NotFound | Self::Catalyst(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missive_is_deferred() {
        assert!(DeliveryMode::Say.is_immediate());
        assert!(DeliveryMode::Broadcast.is_immediate());
        assert!(!DeliveryMode::Missive.is_immediate());
    }

    #[test]
    fn catalysts_are_not_consumed() {
        assert_eq!(Resolution::Catalyst(InventorySlot::OffHand).consumed_slot(), None);
        assert_eq!(
            Resolution::Consumable(InventorySlot::Index(4)).consumed_slot(),
            Some(InventorySlot::Index(4))
        );
        assert!(!Resolution::NotFound.is_satisfied());
    }
}
