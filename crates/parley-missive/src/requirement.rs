//! Item gating for missives.
//!
//! An [`ItemRequirement`] lists catalysts (held, never consumed) and
//! consumables (held or stored, one consumed per missive). Resolution walks
//! a fixed search order and reports the first matching slot:
//!
//! 1. catalysts against the main hand
//! 2. catalysts against the off hand
//! 3. consumables against the main hand
//! 4. consumables against the off hand
//! 5. consumables against storage slots, ascending
//!
//! Within a step the configured list is walked in order, so the first
//! listed consumable found anywhere in storage wins over later entries in
//! lower slots.

use std::collections::BTreeMap;

use parley_types::{Inventory, InventorySlot, ItemStack, Resolution};
use tracing::warn;

/// The two hand slots, in search order.
const HANDS: [InventorySlot; 2] = [InventorySlot::MainHand, InventorySlot::OffHand];

/// Items that allow an actor to send a missive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRequirement {
    /// Item ids that qualify when held, without being consumed.
    pub catalysts: Vec<String>,
    /// Item ids that qualify anywhere in the inventory and are consumed.
    pub consumables: Vec<String>,
    /// Human-readable names by item id, used in the requirement notice.
    pub display_names: BTreeMap<String, String>,
}

impl ItemRequirement {
    /// Create a requirement without display names.
    pub fn new(catalysts: Vec<String>, consumables: Vec<String>) -> Self {
        Self {
            catalysts,
            consumables,
            display_names: BTreeMap::new(),
        }
    }

    /// Builder-style display name table.
    #[must_use]
    pub fn with_display_names(mut self, display_names: BTreeMap<String, String>) -> Self {
        self.display_names = display_names;
        self
    }

    /// Whether both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.catalysts.is_empty() && self.consumables.is_empty()
    }

    /// Name shown for `item`, falling back to the raw id.
    pub fn display_name<'a>(&'a self, item: &'a str) -> &'a str {
        self.display_names.get(item).map_or(item, String::as_str)
    }

    /// Search `inventory` for a qualifying item.
    ///
    /// An empty requirement is satisfied vacuously as a main-hand catalyst,
    /// which consumes nothing.
    pub fn resolve(&self, inventory: &Inventory) -> Resolution {
        if self.is_empty() {
            warn!("missive item gating is enabled but no items are configured");
            return Resolution::Catalyst(InventorySlot::MainHand);
        }

        for slot in HANDS {
            if holds_any(inventory.get(slot), &self.catalysts) {
                return Resolution::Catalyst(slot);
            }
        }

        for slot in HANDS {
            if holds_any(inventory.get(slot), &self.consumables) {
                return Resolution::Consumable(slot);
            }
        }

        self.consumables
            .iter()
            .find_map(|wanted| {
                inventory
                    .stored()
                    .find(|(_, stack)| is_live(stack) && stack.item == *wanted)
                    .map(|(index, _)| InventorySlot::Index(index))
            })
            .map_or(Resolution::NotFound, Resolution::Consumable)
    }

    /// Whether `resolution` still describes `inventory`.
    ///
    /// Used to re-check a reply computed elsewhere before acting on it: the
    /// designated slot must still hold an item of the right kind.
    pub fn qualifies(&self, inventory: &Inventory, resolution: Resolution) -> bool {
        match resolution {
            Resolution::NotFound => false,
            Resolution::Catalyst(_) if self.is_empty() => true,
            Resolution::Catalyst(slot) => {
                HANDS.contains(&slot) && holds_any(inventory.get(slot), &self.catalysts)
            }
            Resolution::Consumable(slot) => holds_any(inventory.get(slot), &self.consumables),
        }
    }

    /// The notice sent to an actor holding none of the qualifying items.
    pub fn notice(&self) -> String {
        let mut notice = String::from("§c§oTo send a missive ");

        if !self.catalysts.is_empty() {
            notice.push_str("you must be holding one of: ");
            notice.push_str(&self.join_names(&self.catalysts));
            if self.consumables.is_empty() {
                notice.push('.');
            } else {
                notice.push_str(", §c§oor ");
            }
        }

        if !self.consumables.is_empty() {
            notice.push_str("you must have one of: ");
            notice.push_str(&self.join_names(&self.consumables));
            notice.push_str(" in your inventory (consumes one).");
        }

        notice
    }

    fn join_names(&self, items: &[String]) -> String {
        items
            .iter()
            .map(|item| self.display_name(item))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A stack counts only while it holds at least one item.
const fn is_live(stack: &ItemStack) -> bool {
    stack.count > 0
}

fn holds_any(stack: Option<&ItemStack>, wanted: &[String]) -> bool {
    stack.is_some_and(|stack| is_live(stack) && wanted.contains(&stack.item))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPER: &str = "minecraft:paper";
    const BOOK: &str = "minecraft:writable_book";

    fn requirement() -> ItemRequirement {
        ItemRequirement::new(vec![BOOK.to_owned()], vec![PAPER.to_owned()])
    }

    #[test]
    fn off_hand_catalyst_beats_main_hand_consumable() {
        let mut inventory = Inventory::with_size(4);
        inventory.main_hand = Some(ItemStack::stack(PAPER, 3));
        inventory.off_hand = Some(ItemStack::single(BOOK));

        assert_eq!(
            requirement().resolve(&inventory),
            Resolution::Catalyst(InventorySlot::OffHand)
        );
    }

    #[test]
    fn held_consumable_beats_stored_one() {
        let mut inventory = Inventory::with_size(4);
        inventory.put(InventorySlot::Index(0), ItemStack::stack(PAPER, 10));
        inventory.off_hand = Some(ItemStack::stack(PAPER, 1));

        assert_eq!(
            requirement().resolve(&inventory),
            Resolution::Consumable(InventorySlot::OffHand)
        );
    }

    #[test]
    fn storage_walks_the_list_before_the_slots() {
        let req = ItemRequirement::new(Vec::new(), vec!["a:ink".to_owned(), PAPER.to_owned()]);
        let mut inventory = Inventory::with_size(6);
        inventory.put(InventorySlot::Index(1), ItemStack::stack(PAPER, 1));
        inventory.put(InventorySlot::Index(4), ItemStack::stack("a:ink", 1));
        inventory.put(InventorySlot::Index(5), ItemStack::stack("a:ink", 1));

        assert_eq!(
            req.resolve(&inventory),
            Resolution::Consumable(InventorySlot::Index(4))
        );
    }

    #[test]
    fn stored_catalyst_does_not_count() {
        let mut inventory = Inventory::with_size(2);
        inventory.put(InventorySlot::Index(0), ItemStack::single(BOOK));

        assert_eq!(requirement().resolve(&inventory), Resolution::NotFound);
    }

    #[test]
    fn empty_requirement_is_vacuously_satisfied() {
        let req = ItemRequirement::default();
        let resolution = req.resolve(&Inventory::default());
        assert_eq!(resolution, Resolution::Catalyst(InventorySlot::MainHand));
        assert!(resolution.consumed_slot().is_none());
        assert!(req.qualifies(&Inventory::default(), resolution));
    }

    #[test]
    fn qualifies_detects_a_moved_item() {
        let req = requirement();
        let mut inventory = Inventory::with_size(2);
        inventory.put(InventorySlot::Index(1), ItemStack::stack(PAPER, 1));
        let resolution = req.resolve(&inventory);
        assert!(req.qualifies(&inventory, resolution));

        inventory.slots = vec![None, None];
        assert!(!req.qualifies(&inventory, resolution));
    }

    #[test]
    fn notice_lists_both_clauses() {
        let req = ItemRequirement::new(
            vec![BOOK.to_owned(), "minecraft:feather".to_owned()],
            vec![PAPER.to_owned()],
        )
        .with_display_names(BTreeMap::from([
            (BOOK.to_owned(), "Book and Quill".to_owned()),
            (PAPER.to_owned(), "Paper".to_owned()),
        ]));

        assert_eq!(
            req.notice(),
            "§c§oTo send a missive you must be holding one of: Book and Quill, minecraft:feather, \
             §c§oor you must have one of: Paper in your inventory (consumes one)."
        );
    }

    #[test]
    fn notice_with_catalysts_only_ends_with_a_period() {
        let req = ItemRequirement::new(vec![BOOK.to_owned()], Vec::new());
        assert_eq!(
            req.notice(),
            "§c§oTo send a missive you must be holding one of: minecraft:writable_book."
        );
    }
}
