//! Host collaborator traits.
//!
//! Parley never owns the world. The host exposes its participants through
//! [`Actor`] and its spatial index through [`SpatialDomain`]; the router and
//! the missive scheduler only ever talk to those two traits. Lookups by id
//! return `Option` because an actor may disconnect between any two calls.

use parley_types::{ActorId, Inventory, Location};

/// A message participant.
pub trait Actor {
    /// Stable identity of the actor.
    fn id(&self) -> ActorId;

    /// Name shown to other participants (may contain format codes).
    fn display_name(&self) -> &str;

    /// Current location.
    fn location(&self) -> Location;

    /// Deliver a line of text to the actor.
    fn send(&mut self, text: &str);

    /// The actor's inventory.
    fn inventory(&self) -> &Inventory;

    /// Mutable access to the actor's inventory.
    fn inventory_mut(&mut self) -> &mut Inventory;
}

/// The host's view of every connected actor and where they are.
pub trait SpatialDomain {
    /// Concrete actor type handed out by this domain.
    type Actor: Actor;

    /// Whether this domain is the authoritative copy of the world.
    ///
    /// A non-authoritative domain (a client-side echo) must never fan
    /// messages out; the router treats it as a silent no-op.
    fn is_authoritative(&self) -> bool;

    /// Ids of actors whose position lies inside the axis-aligned cube of
    /// the given half extent around `center`, in `center`'s dimension.
    ///
    /// This over-selects compared to a sphere; callers re-filter by
    /// squared distance.
    fn query_box(&self, center: &Location, half_extent: f64) -> Vec<ActorId>;

    /// Ids of every connected actor, in every dimension.
    fn connected_actors(&self) -> Vec<ActorId>;

    /// Look up a connected actor.
    fn actor(&self, id: ActorId) -> Option<&Self::Actor>;

    /// Look up a connected actor mutably.
    fn actor_mut(&mut self, id: ActorId) -> Option<&mut Self::Actor>;

    /// Find a connected actor by its exact (unformatted) name.
    fn find_by_name(&self, name: &str) -> Option<ActorId>;

    /// Send `text` to `id` if it is still connected. Returns whether the
    /// actor was reached.
    fn send_to(&mut self, id: ActorId, text: &str) -> bool {
        self.actor_mut(id).map(|actor| actor.send(text)).is_some()
    }
}
