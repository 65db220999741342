//! Consuming the item that paid for a missive.
//!
//! Stackable items lose one from the stack and the slot empties at zero;
//! non-stackable items are removed whole. Slot indices never shift.

use parley_types::{Inventory, InventorySlot};

/// Consume one item from `slot`. Returns the consumed item's id, or `None`
/// if the slot was empty or out of range.
pub fn consume_one(inventory: &mut Inventory, slot: InventorySlot) -> Option<String> {
    let cell = inventory.cell_mut(slot)?;
    let stack = cell.as_mut()?;
    let item = stack.item.clone();

    let remaining = if stack.stackable {
        stack.count.saturating_sub(1)
    } else {
        0
    };

    if remaining == 0 {
        *cell = None;
    } else {
        stack.count = remaining;
    }
    Some(item)
}

#[cfg(test)]
mod tests {
    use parley_types::ItemStack;

    use super::*;

    #[test]
    fn stackable_item_is_decremented() {
        let mut inventory = Inventory::default();
        inventory.main_hand = Some(ItemStack::stack("minecraft:paper", 3));

        let consumed = consume_one(&mut inventory, InventorySlot::MainHand);

        assert_eq!(consumed.as_deref(), Some("minecraft:paper"));
        assert_eq!(inventory.main_hand.map(|s| s.count), Some(2));
    }

    #[test]
    fn last_item_empties_the_slot() {
        let mut inventory = Inventory::with_size(3);
        inventory.put(InventorySlot::Index(2), ItemStack::stack("minecraft:paper", 1));

        consume_one(&mut inventory, InventorySlot::Index(2));

        assert_eq!(inventory.slots.len(), 3);
        assert!(inventory.get(InventorySlot::Index(2)).is_none());
    }

    #[test]
    fn non_stackable_item_is_removed_whole() {
        let mut inventory = Inventory::default();
        inventory.off_hand = Some(ItemStack {
            item: "minecraft:written_book".to_owned(),
            count: 4,
            stackable: false,
        });

        consume_one(&mut inventory, InventorySlot::OffHand);

        assert!(inventory.off_hand.is_none());
    }

    #[test]
    fn empty_or_missing_slot_consumes_nothing() {
        let mut inventory = Inventory::with_size(1);
        assert!(consume_one(&mut inventory, InventorySlot::MainHand).is_none());
        assert!(consume_one(&mut inventory, InventorySlot::Index(9)).is_none());
    }
}
