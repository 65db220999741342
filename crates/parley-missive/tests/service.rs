//! Integration tests for the missive service, mostly with local item
//! resolution.
//!
//! Covers validation, item gating and consumption, and end-to-end delivery
//! through the scheduler against the in-memory world.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use parley_chat::{MemoryActor, MemoryWorld, SpatialDomain};
use parley_missive::{
    ItemRequirement, MissiveError, MissiveRules, MissiveService, ProtocolError, RemoteResolver,
    SendOutcome,
};
use parley_types::{
    ActorId, DimensionId, Inventory, InventorySlot, ItemStack, Location, Position,
};

const PAPER: &str = "minecraft:paper";
const BOOK: &str = "minecraft:writable_book";

// =============================================================================
// Fixture
// =============================================================================

struct Town {
    world: MemoryWorld,
    alice: ActorId,
    bob: ActorId,
    dimension: DimensionId,
}

/// Alice at the origin, Bob 100 blocks east.
fn town(alice_inventory: Inventory) -> Town {
    let dimension = DimensionId::new();
    let mut world = MemoryWorld::new();
    let alice = world.join(
        MemoryActor::new("Alice", Location::new(dimension, Position::default()))
            .with_inventory(alice_inventory),
    );
    let bob = world.join(MemoryActor::new(
        "Bob",
        Location::new(dimension, Position::new(100.0, 0.0, 0.0)),
    ));
    Town {
        world,
        alice,
        bob,
        dimension,
    }
}

fn gated() -> MissiveService {
    MissiveService::local(MissiveRules {
        items: Some(ItemRequirement::new(
            vec![BOOK.to_owned()],
            vec![PAPER.to_owned()],
        )),
        ..MissiveRules::default()
    })
}

fn inventory_of(world: &MemoryWorld, id: ActorId) -> &Inventory {
    &world.actor(id).unwrap().inventory
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn free_missive_arrives_after_travel_time() {
    let mut town = town(Inventory::default());
    let mut service = MissiveService::local(MissiveRules::default());

    let outcome = service
        .send_missive(&mut town.world, town.alice, "Bob", "meet at the docks")
        .unwrap();
    assert!(matches!(outcome, SendOutcome::Enqueued(_)));
    assert_eq!(
        town.world.inbox(town.alice),
        ["§a§oYour missive to Bob is being delivered!".to_owned()]
    );

    for _ in 0..119 {
        service.tick(&mut town.world);
    }
    assert!(town.world.inbox(town.bob).is_empty());

    let tick = service.tick(&mut town.world);
    assert_eq!(tick.advance.delivered, 1);
    assert_eq!(
        town.world.inbox(town.bob),
        ["§a§oYou receive a missive from Alice that reads: §e§omeet at the docks".to_owned()]
    );
    assert_eq!(
        town.world.inbox(town.alice)[1],
        "§a§oYour missive to Bob has been delivered."
    );
}

#[test]
fn length_cap_is_inclusive() {
    let mut town = town(Inventory::default());
    let mut service = MissiveService::local(MissiveRules::default());

    let at_cap = "a".repeat(800);
    assert!(
        service
            .send_missive(&mut town.world, town.alice, "Bob", &at_cap)
            .is_ok()
    );

    let over = "a".repeat(801);
    let result = service.send_missive(&mut town.world, town.alice, "Bob", &over);
    assert!(matches!(
        result,
        Err(MissiveError::MessageTooLong { chars: 801, .. })
    ));
    assert_eq!(
        town.world.inbox(town.alice).last().map(String::as_str),
        Some("§c§oA missive must be at most 800 characters. Your missive has 801 characters!")
    );
    assert_eq!(service.scheduler().len(), 1);
}

#[test]
fn unknown_target_is_reported() {
    let mut town = town(Inventory::default());
    let mut service = MissiveService::local(MissiveRules::default());

    let result = service.send_missive(&mut town.world, town.alice, "Mallory", "hi");

    assert!(matches!(result, Err(MissiveError::UnknownTarget { name }) if name == "Mallory"));
    assert_eq!(
        town.world.inbox(town.alice),
        ["§c§oThat player doesn't exist!".to_owned()]
    );
    assert!(service.scheduler().is_empty());
}

// =============================================================================
// Item gating
// =============================================================================

#[test]
fn stored_consumable_is_spent() {
    let mut inventory = Inventory::with_size(9);
    inventory.put(InventorySlot::Index(3), ItemStack::stack(PAPER, 2));
    let mut town = town(inventory);
    let mut service = gated();

    service
        .send_missive(&mut town.world, town.alice, "Bob", "one sheet left")
        .unwrap();

    let stack = inventory_of(&town.world, town.alice).get(InventorySlot::Index(3));
    assert_eq!(stack.map(|s| s.count), Some(1));
    assert_eq!(service.scheduler().len(), 1);
}

#[test]
fn held_catalyst_spends_nothing() {
    let mut inventory = Inventory::default();
    inventory.main_hand = Some(ItemStack::stack(PAPER, 5));
    inventory.off_hand = Some(ItemStack::single(BOOK));
    let mut town = town(inventory);
    let mut service = gated();

    service
        .send_missive(&mut town.world, town.alice, "Bob", "written in ink")
        .unwrap();

    let inventory = inventory_of(&town.world, town.alice);
    assert_eq!(inventory.main_hand.as_ref().map(|s| s.count), Some(5));
    assert!(inventory.off_hand.is_some());
}

#[test]
fn missing_items_list_what_would_qualify() {
    let mut town = town(Inventory::with_size(9));
    let mut service = gated();

    let result = service.send_missive(&mut town.world, town.alice, "Bob", "hello?");

    assert!(matches!(result, Err(MissiveError::ItemsMissing { .. })));
    assert_eq!(
        town.world.inbox(town.alice),
        [
            "§c§oTo send a missive you must be holding one of: minecraft:writable_book, \
             §c§oor you must have one of: minecraft:paper in your inventory (consumes one)."
                .to_owned()
        ]
    );
    assert!(service.scheduler().is_empty());
}

#[test]
fn send_without_a_live_peer_is_explained() {
    let mut town = town(Inventory::with_size(9));
    let mut service = MissiveService::new(
        MissiveRules {
            items: Some(ItemRequirement::new(
                vec![BOOK.to_owned()],
                vec![PAPER.to_owned()],
            )),
            ..MissiveRules::default()
        },
        Box::new(RemoteResolver::new()),
    );

    let result = service.send_missive(&mut town.world, town.alice, "Bob", "hello?");

    assert!(matches!(
        result,
        Err(MissiveError::Protocol(ProtocolError::UnknownPeer { actor })) if actor == town.alice
    ));
    assert_eq!(
        town.world.inbox(town.alice),
        ["§c§oYour missive could not be sent right now.".to_owned()]
    );
    assert!(service.scheduler().is_empty());
}

// =============================================================================
// Announcements
// =============================================================================

#[test]
fn announcement_needs_no_items_and_sends_no_receipts() {
    let mut town = town(Inventory::default());
    let mut service = gated();
    let square = Location::new(town.dimension, Position::new(100.0, 0.0, 0.0));

    service
        .send_announcement(&mut town.world, "Town Crier", square, "Bob", "market day")
        .unwrap();
    while !service.scheduler().is_empty() {
        service.tick(&mut town.world);
    }

    assert!(town.world.inbox(town.alice).is_empty());
    assert_eq!(
        town.world.inbox(town.bob),
        ["§a§oYou receive a missive from Town Crier that reads: §e§omarket day".to_owned()]
    );
}
