//! Core data structs: positions, locations, item stacks and inventories.

use serde::{Deserialize, Serialize};

use crate::enums::InventorySlot;
use crate::ids::DimensionId;

// ---------------------------------------------------------------------------
// Space
// ---------------------------------------------------------------------------

/// A point in a dimension, in the host's spatial unit (blocks).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
}

impl Position {
    /// Create a position from its three coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Every range check in Parley compares squared values so no square
    /// root is ever taken.
    pub fn distance_sq(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx.mul_add(dx, dy.mul_add(dy, dz * dz))
    }

    /// Whether this point lies inside the axis-aligned cube centred on
    /// `center` with the given half extent (bounds inclusive).
    pub fn within_box(&self, center: &Self, half_extent: f64) -> bool {
        (self.x - center.x).abs() <= half_extent
            && (self.y - center.y).abs() <= half_extent
            && (self.z - center.z).abs() <= half_extent
    }
}

/// A position qualified by the dimension it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// The dimension containing the position.
    pub dimension: DimensionId,
    /// The position within the dimension.
    pub position: Position,
}

impl Location {
    /// Create a location.
    pub const fn new(dimension: DimensionId, position: Position) -> Self {
        Self { dimension, position }
    }

    /// Squared distance between two locations, or `None` when they are in
    /// different dimensions.
    pub fn distance_sq(&self, other: &Self) -> Option<f64> {
        (self.dimension == other.dimension).then(|| self.position.distance_sq(&other.position))
    }

    /// Whether both locations are in the same dimension.
    pub fn same_dimension(&self, other: &Self) -> bool {
        self.dimension == other.dimension
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A stack of identical items occupying one inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Registry identifier of the item, e.g. `minecraft:paper`.
    pub item: String,
    /// Number of items in the stack (at least 1 for a live stack).
    pub count: u32,
    /// Whether the item stacks. Non-stackable items are removed whole when
    /// consumed.
    pub stackable: bool,
}

impl ItemStack {
    /// Create a stackable stack of `count` items.
    pub fn stack(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
            stackable: true,
        }
    }

    /// Create a single non-stackable item.
    pub fn single(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            count: 1,
            stackable: false,
        }
    }
}

/// An actor's inventory: two hand slots plus ordered storage slots.
///
/// Empty slots are `None`. Storage slot indices are stable; removing an
/// item never shifts other slots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Item held in the main hand.
    pub main_hand: Option<ItemStack>,
    /// Item held in the off hand.
    pub off_hand: Option<ItemStack>,
    /// Storage slots in ascending index order.
    pub slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    /// Create an empty inventory with `size` storage slots.
    pub fn with_size(size: usize) -> Self {
        Self {
            main_hand: None,
            off_hand: None,
            slots: vec![None; size],
        }
    }

    /// Return the stack in `slot`, if the slot exists and is occupied.
    pub fn get(&self, slot: InventorySlot) -> Option<&ItemStack> {
        match slot {
            InventorySlot::MainHand => self.main_hand.as_ref(),
            InventorySlot::OffHand => self.off_hand.as_ref(),
            InventorySlot::Index(index) => self.slots.get(index).and_then(Option::as_ref),
        }
    }

    /// Mutable access to the slot cell itself (so callers may clear it).
    ///
    /// Returns `None` only when an indexed slot is out of range.
    pub fn cell_mut(&mut self, slot: InventorySlot) -> Option<&mut Option<ItemStack>> {
        match slot {
            InventorySlot::MainHand => Some(&mut self.main_hand),
            InventorySlot::OffHand => Some(&mut self.off_hand),
            InventorySlot::Index(index) => self.slots.get_mut(index),
        }
    }

    /// Place `stack` into `slot`, returning the previous occupant.
    ///
    /// Indexed slots beyond the current size grow the storage with empty
    /// slots.
    pub fn put(&mut self, slot: InventorySlot, stack: ItemStack) -> Option<ItemStack> {
        if let InventorySlot::Index(index) = slot {
            if index >= self.slots.len() {
                self.slots.resize(index.saturating_add(1), None);
            }
        }
        self.cell_mut(slot).and_then(|cell| cell.replace(stack))
    }

    /// Iterate over occupied storage slots with their indices.
    pub fn stored(&self) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.as_ref().map(|stack| (index, stack)))
    }
}
