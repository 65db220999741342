//! The demo session.
//!
//! A [`Session`] owns the in-memory world seeded from the configured
//! scenario, the [`Engine`], and, when items are resolved remotely, one
//! resolver peer per actor standing in for that actor's client. The peer
//! answers against a client-side copy of the actor that is refreshed from
//! the world before every tick.

use std::collections::BTreeMap;

use parley_chat::{MemoryActor, MemoryWorld, SpatialDomain};
use parley_core::config::{ActorSeed, ItemSeed};
use parley_core::{ChatOutcome, Engine, EngineTick, ParleyConfig};
use parley_missive::ResolverPeer;
use parley_types::{
    ActorId, DimensionId, Inventory, InventorySlot, ItemStack, Location, Position,
};
use tracing::{info, warn};

use crate::error::AppError;

/// Command prefix for an explicit missive: `/missive Target message`.
const MISSIVE_COMMAND: &str = "/missive";

/// An actor's client: its own view of the actor plus the resolver peer.
#[derive(Debug)]
struct Client {
    actor: ActorId,
    view: MemoryActor,
    peer: ResolverPeer,
}

/// World, engine and clients for one run of the binary.
#[derive(Debug)]
pub struct Session {
    engine: Engine,
    world: MemoryWorld,
    levels: BTreeMap<ActorId, u32>,
    clients: Vec<Client>,
}

impl Session {
    /// Seed the world from `config.scenario` and build the engine.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Engine`] if the engine rejects the configuration.
    pub fn new(config: ParleyConfig) -> Result<Self, AppError> {
        let seeds = config.scenario.actors.clone();
        let requirement = config.missive.items.requirement();
        let mut engine = Engine::new(config)?;

        let mut world = MemoryWorld::new();
        let mut dimensions = BTreeMap::new();
        let mut levels = BTreeMap::new();
        let mut clients = Vec::new();

        for seed in &seeds {
            let actor = build_actor(seed, &mut dimensions);
            let view = actor.clone();
            let id = world.join(actor);
            levels.insert(id, seed.permission_level);

            if let Some(endpoint) = engine.connect_peer(id) {
                clients.push(Client {
                    actor: id,
                    view,
                    peer: ResolverPeer::new(endpoint, requirement.clone()),
                });
            }
        }

        info!(
            actors = world.len(),
            dimensions = dimensions.len(),
            peers = clients.len(),
            "World seeded"
        );

        Ok(Self {
            engine,
            world,
            levels,
            clients,
        })
    }

    /// The engine.
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Handle one input line of the form `Name: text`.
    ///
    /// `text` is either a chat line or `/missive Target message`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownActor`] for a name not in the world, and
    /// [`AppError::Engine`] when the engine rejects the line.
    pub fn input(&mut self, line: &str) -> Result<(), AppError> {
        let Some((name, text)) = parse_input(line) else {
            warn!(line, "expected `Name: text`");
            return Ok(());
        };

        if let Some(rest) = text.strip_prefix(MISSIVE_COMMAND) {
            let Some((target, message)) = rest.trim().split_once(char::is_whitespace) else {
                warn!(line, "expected `/missive Target message`");
                return Ok(());
            };
            let sender = self.find(name)?;
            self.engine
                .send_missive(&mut self.world, sender, target, message.trim())?;
            return Ok(());
        }

        self.chat(name, text).map(|_| ())
    }

    /// Handle a chat line from the actor called `name`.
    ///
    /// When distance chat is off the line goes to everyone unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`Session::input`].
    pub fn chat(&mut self, name: &str, text: &str) -> Result<ChatOutcome, AppError> {
        let speaker = self.find(name)?;
        let level = self.levels.get(&speaker).copied().unwrap_or_default();
        let privileges = self.engine.privileges(level);

        let outcome = self
            .engine
            .handle_chat(&mut self.world, speaker, text, privileges)?;

        if let ChatOutcome::Passthrough(line) = &outcome {
            let plain = format!("<{name}> {line}");
            for id in self.world.connected_actors() {
                self.world.send_to(id, &plain);
            }
        }
        Ok(outcome)
    }

    /// Let every client answer its resolver requests, then tick the engine.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Engine`] if the tick counter overflows.
    pub fn tick(&mut self) -> Result<EngineTick, AppError> {
        for client in &mut self.clients {
            let Some(actor) = self.world.actor(client.actor) else {
                continue;
            };
            client.view.inventory.clone_from(&actor.inventory);

            let report = client.peer.process(&mut client.view);
            if report.closed {
                warn!(actor = %client.actor, "resolver link closed");
            }
        }

        Ok(self.engine.tick(&mut self.world)?)
    }

    /// Take every line delivered since the last call, paired with the
    /// recipient's name. Lines a client showed its own actor are included.
    pub fn drain(&mut self) -> Vec<(String, String)> {
        let mut lines = Vec::new();

        for id in self.world.connected_actors() {
            let name = self
                .world
                .actor(id)
                .map(|a| a.name.clone())
                .unwrap_or_default();
            lines.extend(
                self.world
                    .take_inbox(id)
                    .into_iter()
                    .map(|line| (name.clone(), line)),
            );
        }
        for client in &mut self.clients {
            let name = &client.view.name;
            lines.extend(
                client
                    .view
                    .inbox
                    .drain(..)
                    .map(|line| (name.clone(), line)),
            );
        }
        lines
    }

    fn find(&self, name: &str) -> Result<ActorId, AppError> {
        self.world
            .find_by_name(name)
            .ok_or_else(|| AppError::UnknownActor {
                name: name.to_owned(),
            })
    }
}

/// Split `Name: text`. Both parts must be non-empty.
fn parse_input(line: &str) -> Option<(&str, &str)> {
    let (name, text) = line.split_once(':')?;
    let name = name.trim();
    let text = text.trim_start();
    (!name.is_empty() && !text.is_empty()).then_some((name, text))
}

/// Build an actor from its seed, giving each dimension label one id.
fn build_actor(seed: &ActorSeed, dimensions: &mut BTreeMap<String, DimensionId>) -> MemoryActor {
    let dimension = *dimensions
        .entry(seed.dimension.clone())
        .or_insert_with(DimensionId::new);
    let [x, y, z] = seed.position;

    let mut inventory = Inventory::with_size(seed.slots.len());
    inventory.main_hand = seed.main_hand.as_ref().map(stack_of);
    inventory.off_hand = seed.off_hand.as_ref().map(stack_of);
    for (index, item) in seed.slots.iter().enumerate() {
        if let Some(item) = item {
            inventory.put(InventorySlot::Index(index), stack_of(item));
        }
    }

    MemoryActor::new(&seed.name, Location::new(dimension, Position::new(x, y, z)))
        .with_inventory(inventory)
}

fn stack_of(seed: &ItemSeed) -> ItemStack {
    ItemStack {
        item: seed.item.clone(),
        count: seed.count,
        stackable: seed.stackable,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
engine:
  seed: 3
scenario:
  actors:
    - name: Alice
      position: [0, 64, 0]
      permission_level: 2
      main_hand: { item: "minecraft:paper", count: 3 }
    - name: Bob
      position: [10, 64, 0]
    - name: Imp
      dimension: nether
      position: [0, 64, 0]
      slots: [null, { item: "minecraft:writable_book", stackable: false }]
"#;

    fn session() -> Session {
        Session::new(ParleyConfig::parse(SCENARIO).unwrap()).unwrap()
    }

    fn lines_for<'a>(lines: &'a [(String, String)], name: &str) -> Vec<&'a str> {
        lines
            .iter()
            .filter(|(to, _)| to == name)
            .map(|(_, line)| line.as_str())
            .collect()
    }

    #[test]
    fn input_needs_a_name_and_text() {
        assert_eq!(parse_input("Alice: hi there"), Some(("Alice", "hi there")));
        assert_eq!(parse_input("Alice:"), None);
        assert_eq!(parse_input(": hi"), None);
        assert_eq!(parse_input("no separator"), None);
    }

    #[test]
    fn scenario_seeds_actors_and_peers() {
        let s = session();
        assert_eq!(s.world.len(), 3);
        assert_eq!(s.clients.len(), 3);

        let imp = s.world.find_by_name("Imp").unwrap();
        let alice = s.world.find_by_name("Alice").unwrap();
        let imp = s.world.actor(imp).unwrap();
        let alice = s.world.actor(alice).unwrap();
        assert!(!imp.location.same_dimension(&alice.location));
        assert_eq!(
            imp.inventory.get(InventorySlot::Index(1)).map(|s| s.stackable),
            Some(false)
        );
    }

    #[test]
    fn speech_is_heard_nearby_only() {
        let mut s = session();
        s.input("Alice: hello").unwrap();

        let lines = s.drain();
        assert_eq!(lines_for(&lines, "Bob"), ["Alice: hello"]);
        assert!(lines_for(&lines, "Imp").is_empty());
    }

    #[test]
    fn unknown_speaker_is_reported() {
        let mut s = session();
        let result = s.input("Mallory: hi");
        assert!(matches!(result, Err(AppError::UnknownActor { name }) if name == "Mallory"));
    }

    #[test]
    fn chat_missive_resolves_through_the_client_and_arrives() {
        let mut s = session();
        s.input("Alice: >Bob bring rope").unwrap();
        assert!(s.engine().missives().scheduler().is_empty());

        // Bob is 10 blocks away: three seconds of travel.
        for _ in 0..60 {
            s.tick().unwrap();
        }

        let lines = s.drain();
        assert_eq!(
            lines_for(&lines, "Bob"),
            ["§a§oYou receive a missive from Alice that reads: §e§obring rope"]
        );
        let alice = s.world.find_by_name("Alice").unwrap();
        let held = s.world.actor(alice).unwrap().inventory.main_hand.clone();
        assert_eq!(held.map(|h| h.count), Some(2));
    }

    #[test]
    fn missive_command_without_items_is_refused_by_the_client() {
        let mut s = session();
        s.input("Bob: /missive Alice are you there").unwrap();
        s.tick().unwrap();

        let lines = s.drain();
        let bob = lines_for(&lines, "Bob");
        assert_eq!(bob.len(), 1);
        assert!(bob[0].starts_with("§c§oTo send a missive you must be holding one of: Book and Quill"));
        assert!(s.engine().missives().scheduler().is_empty());
    }
}
