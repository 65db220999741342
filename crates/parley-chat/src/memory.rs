//! In-memory host world.
//!
//! [`MemoryWorld`] implements the collaborator traits over a plain map of
//! actors whose delivered lines accumulate in an inbox. The engine binary
//! runs on it, and every crate's tests use it as the fake domain.
//!
//! The box query is a linear scan. That is fine for the handful of actors a
//! test or a demo session has; a real host answers it from its own spatial
//! index.

use std::collections::BTreeMap;

use parley_types::{ActorId, Inventory, Location};

use crate::domain::{Actor, SpatialDomain};

/// An actor held by [`MemoryWorld`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryActor {
    /// Identity.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Current location.
    pub location: Location,
    /// Inventory.
    pub inventory: Inventory,
    /// Every line delivered to this actor, oldest first.
    pub inbox: Vec<String>,
}

impl MemoryActor {
    /// Create an actor with a fresh id and an empty inventory.
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            location,
            inventory: Inventory::default(),
            inbox: Vec::new(),
        }
    }

    /// Builder-style inventory override.
    #[must_use]
    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }
}

impl Actor for MemoryActor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Location {
        self.location
    }

    fn send(&mut self, text: &str) {
        self.inbox.push(text.to_owned());
    }

    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }
}

/// A world whose actors live in a map.
#[derive(Debug, Clone)]
pub struct MemoryWorld {
    /// Connected actors.
    actors: BTreeMap<ActorId, MemoryActor>,
    /// Whether this copy of the world is authoritative.
    authoritative: bool,
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorld {
    /// Create an empty authoritative world.
    pub const fn new() -> Self {
        Self {
            actors: BTreeMap::new(),
            authoritative: true,
        }
    }

    /// Create an empty non-authoritative world (a client-side echo).
    pub const fn echo() -> Self {
        Self {
            actors: BTreeMap::new(),
            authoritative: false,
        }
    }

    /// Connect an actor, returning its id.
    pub fn join(&mut self, actor: MemoryActor) -> ActorId {
        let id = actor.id;
        self.actors.insert(id, actor);
        id
    }

    /// Disconnect an actor, returning it if it was connected.
    pub fn leave(&mut self, id: ActorId) -> Option<MemoryActor> {
        self.actors.remove(&id)
    }

    /// Move a connected actor. Returns whether the actor was found.
    pub fn move_to(&mut self, id: ActorId, location: Location) -> bool {
        self.actors
            .get_mut(&id)
            .map(|actor| actor.location = location)
            .is_some()
    }

    /// Lines delivered to `id` so far (empty if not connected).
    pub fn inbox(&self, id: ActorId) -> &[String] {
        self.actors
            .get(&id)
            .map(|actor| actor.inbox.as_slice())
            .unwrap_or_default()
    }

    /// Drain and return the lines delivered to `id`.
    pub fn take_inbox(&mut self, id: ActorId) -> Vec<String> {
        self.actors
            .get_mut(&id)
            .map(|actor| std::mem::take(&mut actor.inbox))
            .unwrap_or_default()
    }

    /// Number of connected actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether no actor is connected.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Iterate over connected actors.
    pub fn actors(&self) -> impl Iterator<Item = &MemoryActor> {
        self.actors.values()
    }
}

impl SpatialDomain for MemoryWorld {
    type Actor = MemoryActor;

    fn is_authoritative(&self) -> bool {
        self.authoritative
    }

    fn query_box(&self, center: &Location, half_extent: f64) -> Vec<ActorId> {
        self.actors
            .values()
            .filter(|actor| {
                actor.location.same_dimension(center)
                    && actor
                        .location
                        .position
                        .within_box(&center.position, half_extent)
            })
            .map(|actor| actor.id)
            .collect()
    }

    fn connected_actors(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    fn actor(&self, id: ActorId) -> Option<&MemoryActor> {
        self.actors.get(&id)
    }

    fn actor_mut(&mut self, id: ActorId) -> Option<&mut MemoryActor> {
        self.actors.get_mut(&id)
    }

    fn find_by_name(&self, name: &str) -> Option<ActorId> {
        self.actors
            .values()
            .find(|actor| actor.name == name)
            .map(|actor| actor.id)
    }
}
