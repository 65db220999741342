//! Configuration loading and typed config structures for Parley.
//!
//! The canonical configuration lives in `parley-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, a loader that reads and validates the file, and conversions
//! into the plain rule structs the chat and missive crates consume.

use std::collections::BTreeMap;
use std::path::Path;

use parley_chat::{ChatRules, MuffleStyle};
use parley_missive::{DelayRules, ItemRequirement, MissiveRules};
use parley_types::MAX_MISSIVE_CHARS;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Which value is wrong and why.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Parley configuration.
///
/// Mirrors the structure of `parley-config.yaml`. Every field has a
/// default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParleyConfig {
    /// Distance chat settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Missive settings.
    #[serde(default)]
    pub missive: MissiveConfig,

    /// Permission levels for privileged chat features.
    #[serde(default)]
    pub permissions: PermissionConfig,

    /// Engine loop settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Actors the demo engine starts with.
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

impl ParleyConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        in_range("chat.range", self.chat.range, 1.0, 256.0)?;
        in_range("chat.whisper_range", self.chat.whisper_range, 1.0, 256.0)?;
        in_range("missive.unit_distance", self.missive.unit_distance, 1.0, 10_000.0)?;
        in_range(
            "missive.unit_duration_secs",
            self.missive.unit_duration_secs,
            1.0,
            10_000.0,
        )?;

        if self.missive.ticks_per_second == 0 {
            return Err(invalid("missive.ticks_per_second must be at least 1"));
        }
        if self.missive.dimension_penalty == 0 {
            return Err(invalid("missive.dimension_penalty must be at least 1"));
        }
        if self.missive.max_length == 0 || self.missive.max_length > MAX_MISSIVE_CHARS {
            return Err(invalid(&format!(
                "missive.max_length must be between 1 and {MAX_MISSIVE_CHARS}"
            )));
        }
        if self.engine.tick_interval_ms == 0 {
            return Err(invalid("engine.tick_interval_ms must be at least 1"));
        }

        self.chat.symbols.validate()
    }
}

fn in_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be between {min} and {max}, got {value}")))
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Distance chat configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatConfig {
    /// Enable distance chat. When off, chat lines are left to the host.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Range in blocks at which chat is fully readable. Chat muffles out to
    /// twice this, emotes reach it, shouts reach three times it.
    #[serde(default = "default_range")]
    pub range: f64,

    /// Range in blocks at which whispers are heard in full.
    #[serde(default = "default_whisper_range")]
    pub whisper_range: f64,

    /// Muffle with the obfuscation format code rather than a replacement
    /// character.
    #[serde(default = "default_true")]
    pub use_obfuscation: bool,

    /// Replacement character when obfuscation is off.
    #[serde(default = "default_muffle_character")]
    pub muffle_character: char,

    /// Convert chat lines by their leading symbol.
    #[serde(default = "default_true")]
    pub use_symbols: bool,

    /// The leading symbols.
    #[serde(default)]
    pub symbols: SymbolConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            range: default_range(),
            whisper_range: default_whisper_range(),
            use_obfuscation: true,
            muffle_character: default_muffle_character(),
            use_symbols: true,
            symbols: SymbolConfig::default(),
        }
    }
}

impl ChatConfig {
    /// The router's range rules.
    pub const fn rules(&self) -> ChatRules {
        ChatRules {
            range: self.range,
            whisper_range: self.whisper_range,
            style: if self.use_obfuscation {
                MuffleStyle::Obfuscate
            } else {
                MuffleStyle::Replace(self.muffle_character)
            },
        }
    }
}

/// Leading symbols that select a delivery mode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SymbolConfig {
    /// Shout prefix.
    #[serde(default = "default_shout_symbol")]
    pub shout: String,

    /// Emote prefix.
    #[serde(default = "default_emote_symbol")]
    pub emote: String,

    /// Whisper prefix.
    #[serde(default = "default_whisper_symbol")]
    pub whisper: String,

    /// Broadcast prefix.
    #[serde(default = "default_broadcast_symbol")]
    pub broadcast: String,

    /// Missive prefix.
    #[serde(default = "default_missive_symbol")]
    pub missive: String,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        Self {
            shout: default_shout_symbol(),
            emote: default_emote_symbol(),
            whisper: default_whisper_symbol(),
            broadcast: default_broadcast_symbol(),
            missive: default_missive_symbol(),
        }
    }
}

impl SymbolConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            ("shout", &self.shout),
            ("emote", &self.emote),
            ("whisper", &self.whisper),
            ("broadcast", &self.broadcast),
            ("missive", &self.missive),
        ];
        for (name, symbol) in all {
            if symbol.is_empty() {
                return Err(invalid(&format!("chat.symbols.{name} must not be empty")));
            }
        }
        for (i, (name, symbol)) in all.iter().enumerate() {
            if all.iter().skip(i.saturating_add(1)).any(|(_, other)| other == symbol) {
                return Err(invalid(&format!(
                    "chat.symbols.{name} duplicates another symbol"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Missives
// ---------------------------------------------------------------------------

/// Missive configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MissiveConfig {
    /// Enable missives.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Blocks travelled per time unit.
    #[serde(default = "default_unit_distance")]
    pub unit_distance: f64,

    /// Seconds per time unit.
    #[serde(default = "default_unit_duration_secs")]
    pub unit_duration_secs: f64,

    /// Host ticks per second.
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u32,

    /// Travel time multiplier across dimensions.
    #[serde(default = "default_dimension_penalty")]
    pub dimension_penalty: u32,

    /// Longest accepted missive in characters.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Item gating.
    #[serde(default)]
    pub items: MissiveItemsConfig,
}

impl Default for MissiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            unit_distance: default_unit_distance(),
            unit_duration_secs: default_unit_duration_secs(),
            ticks_per_second: default_ticks_per_second(),
            dimension_penalty: default_dimension_penalty(),
            max_length: default_max_length(),
            items: MissiveItemsConfig::default(),
        }
    }
}

impl MissiveConfig {
    /// The missive service's rules.
    pub fn rules(&self) -> MissiveRules {
        MissiveRules {
            delay: DelayRules {
                unit_distance: self.unit_distance,
                unit_duration_secs: self.unit_duration_secs,
                ticks_per_second: self.ticks_per_second,
                dimension_penalty: self.dimension_penalty,
            },
            max_length: self.max_length,
            items: self.items.enabled.then(|| self.items.requirement()),
        }
    }
}

/// Item gating for missives sent by actors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MissiveItemsConfig {
    /// Require an item to send a missive.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Check items on the authoritative side instead of asking the
    /// sender's resolver peer.
    #[serde(default)]
    pub resolve_locally: bool,

    /// Items consumed when no catalyst is held. Held items are checked
    /// first, then storage in list order.
    #[serde(default = "default_consumables")]
    pub consumables: Vec<String>,

    /// Items that, when held, allow sending without consuming anything.
    #[serde(default = "default_catalysts")]
    pub catalysts: Vec<String>,

    /// Human-readable item names for notices.
    #[serde(default = "default_display_names")]
    pub display_names: BTreeMap<String, String>,
}

impl Default for MissiveItemsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resolve_locally: false,
            consumables: default_consumables(),
            catalysts: default_catalysts(),
            display_names: default_display_names(),
        }
    }
}

impl MissiveItemsConfig {
    /// The configured requirement.
    pub fn requirement(&self) -> ItemRequirement {
        ItemRequirement::new(self.catalysts.clone(), self.consumables.clone())
            .with_display_names(self.display_names.clone())
    }
}

// ---------------------------------------------------------------------------
// Permissions, engine, logging
// ---------------------------------------------------------------------------

/// Permission levels required for privileged chat features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PermissionConfig {
    /// Level needed to use `&` colour codes in chat.
    #[serde(default = "default_permission_level")]
    pub color_level: u32,

    /// Level needed to broadcast.
    #[serde(default = "default_permission_level")]
    pub broadcast_level: u32,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            color_level: default_permission_level(),
            broadcast_level: default_permission_level(),
        }
    }
}

/// Engine loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Seed for the muffle offsets. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            seed: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// Actors the demo engine places in its in-memory world.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScenarioConfig {
    /// Actors in join order.
    #[serde(default)]
    pub actors: Vec<ActorSeed>,
}

/// One actor in the scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActorSeed {
    /// Display name, also the name used to address missives.
    pub name: String,

    /// Dimension label. Actors with the same label share a dimension.
    #[serde(default = "default_dimension")]
    pub dimension: String,

    /// Position as `[x, y, z]`.
    #[serde(default)]
    pub position: [f64; 3],

    /// Permission level.
    #[serde(default)]
    pub permission_level: u32,

    /// Item in the main hand.
    #[serde(default)]
    pub main_hand: Option<ItemSeed>,

    /// Item in the off hand.
    #[serde(default)]
    pub off_hand: Option<ItemSeed>,

    /// Storage slots from index 0. `null` leaves a slot empty.
    #[serde(default)]
    pub slots: Vec<Option<ItemSeed>>,
}

/// An item stack in the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemSeed {
    /// Item id.
    pub item: String,

    /// Stack size.
    #[serde(default = "default_count")]
    pub count: u32,

    /// Whether the item stacks.
    #[serde(default = "default_true")]
    pub stackable: bool,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_range() -> f64 {
    15.0
}

const fn default_whisper_range() -> f64 {
    2.0
}

const fn default_muffle_character() -> char {
    '.'
}

fn default_shout_symbol() -> String {
    "!".to_owned()
}

fn default_emote_symbol() -> String {
    "*".to_owned()
}

fn default_whisper_symbol() -> String {
    "_".to_owned()
}

fn default_broadcast_symbol() -> String {
    "#".to_owned()
}

fn default_missive_symbol() -> String {
    ">".to_owned()
}

const fn default_unit_distance() -> f64 {
    100.0
}

const fn default_unit_duration_secs() -> f64 {
    3.0
}

const fn default_ticks_per_second() -> u32 {
    20
}

const fn default_dimension_penalty() -> u32 {
    8
}

const fn default_max_length() -> usize {
    MAX_MISSIVE_CHARS
}

fn default_consumables() -> Vec<String> {
    vec!["minecraft:paper".to_owned()]
}

fn default_catalysts() -> Vec<String> {
    vec!["minecraft:writable_book".to_owned()]
}

fn default_display_names() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("minecraft:paper".to_owned(), "Paper".to_owned()),
        (
            "minecraft:writable_book".to_owned(),
            "Book and Quill".to_owned(),
        ),
    ])
}

const fn default_permission_level() -> u32 {
    2
}

const fn default_tick_interval_ms() -> u64 {
    50
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_dimension() -> String {
    "overworld".to_owned()
}

const fn default_count() -> u32 {
    1
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ParleyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chat.range, 15.0);
        assert_eq!(config.missive.ticks_per_second, 20);
        assert_eq!(config.engine.tick_interval_ms, 50);
        assert!(!config.missive.items.resolve_locally);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r##"
chat:
  enabled: true
  range: 20
  whisper_range: 3
  use_obfuscation: false
  muffle_character: "~"
  use_symbols: true
  symbols:
    shout: "!!"
    emote: "*"
    whisper: "_"
    broadcast: "#"
    missive: "@"

missive:
  unit_distance: 50
  unit_duration_secs: 2
  ticks_per_second: 10
  dimension_penalty: 4
  max_length: 400
  items:
    enabled: true
    resolve_locally: true
    consumables: ["minecraft:paper", "minecraft:map"]
    catalysts: []
    display_names:
      "minecraft:map": "Map"

permissions:
  color_level: 1
  broadcast_level: 4

engine:
  tick_interval_ms: 100
  seed: 9

logging:
  level: "debug"

scenario:
  actors:
    - name: Alice
      position: [0, 64, 0]
      permission_level: 4
      main_hand: { item: "minecraft:paper", count: 16 }
    - name: Bob
      dimension: nether
      position: [10, 40, -3]
      slots: [null, { item: "minecraft:writable_book", stackable: false }]
"##;

        let config = ParleyConfig::parse(yaml).unwrap();

        assert_eq!(config.chat.range, 20.0);
        assert_eq!(config.chat.symbols.shout, "!!");
        assert_eq!(config.chat.rules().style, MuffleStyle::Replace('~'));
        assert_eq!(config.missive.max_length, 400);
        assert!(config.missive.items.catalysts.is_empty());
        assert_eq!(config.permissions.broadcast_level, 4);
        assert_eq!(config.engine.seed, Some(9));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.scenario.actors.len(), 2);

        let bob = config.scenario.actors.get(1);
        assert_eq!(bob.map(|b| b.dimension.as_str()), Some("nether"));
        assert_eq!(
            bob.and_then(|b| b.slots.get(1).cloned().flatten())
                .map(|s| (s.count, s.stackable)),
            Some((1, false))
        );

        let rules = config.missive.rules();
        assert_eq!(rules.delay.dimension_penalty, 4);
        let requirement = rules.items.unwrap();
        assert_eq!(requirement.display_name("minecraft:map"), "Map");
    }

    #[test]
    fn parse_empty_yaml() {
        let config = ParleyConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn disabled_items_mean_free_missives() {
        let config = ParleyConfig::parse("missive:\n  items:\n    enabled: false\n");
        let rules = config.map(|c| c.missive.rules()).ok();
        assert!(rules.is_some_and(|r| r.items.is_none()));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for yaml in [
            "chat:\n  range: 0.5\n",
            "chat:\n  whisper_range: 300\n",
            "missive:\n  ticks_per_second: 0\n",
            "missive:\n  max_length: 801\n",
            "chat:\n  symbols:\n    shout: \"*\"\n",
            "chat:\n  symbols:\n    missive: \"\"\n",
        ] {
            assert!(
                matches!(ParleyConfig::parse(yaml), Err(ConfigError::Invalid { .. })),
                "accepted: {yaml}"
            );
        }
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("parley-config.yaml");
        if path.exists() {
            let config = ParleyConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
