//! Chat-symbol dispatch.
//!
//! A raw chat line is classified by its leading symbol into an immediate
//! delivery mode, a missive, or a rejection. Symbols are plain string
//! prefixes and are stripped before the message is routed. The missive
//! symbol is checked first, then shout, emote, whisper and broadcast in
//! that order; anything else is ordinary speech.
//!
//! Privileges come from the host's permission check. Speakers allowed to
//! use colour codes have `&` translated to the format marker before any
//! symbol is matched.

use parley_chat::muffle::FORMAT_MARKER;
use parley_types::DeliveryMode;

use crate::config::{ChatConfig, PermissionConfig, SymbolConfig};

/// Shown when a missive chat line has no message part.
pub const MALFORMED_MISSIVE: &str = "§c§oThe missive couldn't be understood. Use the following format: \n>[playername] [message]  (without brackets)";

/// Shown when a speaker without the privilege tries to broadcast.
pub const BROADCAST_DENIED: &str = "§6You don't have permission to broadcast!";

/// Host-granted abilities of a speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Privileges {
    /// May use `&` colour codes.
    pub color_codes: bool,
    /// May broadcast.
    pub broadcast: bool,
}

impl Privileges {
    /// Derive privileges from a permission level.
    pub const fn from_level(level: u32, permissions: &PermissionConfig) -> Self {
        Self {
            color_codes: level >= permissions.color_level,
            broadcast: level >= permissions.broadcast_level,
        }
    }
}

/// What to do with a chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Route the message immediately.
    Route {
        /// Delivery mode selected by the symbol.
        mode: DeliveryMode,
        /// The message with its symbol stripped.
        message: String,
    },
    /// Send a missive to the named actor.
    Missive {
        /// Name of the target actor.
        target: String,
        /// Missive text, trimmed.
        message: String,
    },
    /// Distance chat is off; the host handles the line as it is.
    Passthrough(String),
    /// Tell the speaker why nothing was sent.
    Rejected {
        /// Line for the speaker.
        notice: String,
    },
}

/// Classifies chat lines according to the chat configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDispatcher {
    distance_chat: bool,
    missives: bool,
    use_symbols: bool,
    symbols: SymbolConfig,
}

impl ChatDispatcher {
    /// Create a dispatcher. `missives` enables the missive symbol.
    pub fn new(chat: &ChatConfig, missives: bool) -> Self {
        Self {
            distance_chat: chat.enabled,
            missives,
            use_symbols: chat.use_symbols,
            symbols: chat.symbols.clone(),
        }
    }

    /// Classify one chat line.
    pub fn classify(&self, line: &str, privileges: Privileges) -> ChatCommand {
        let line = if privileges.color_codes {
            line.replace('&', &FORMAT_MARKER.to_string())
        } else {
            line.to_owned()
        };

        let missive = (self.missives && self.use_symbols)
            .then(|| line.strip_prefix(self.symbols.missive.as_str()))
            .flatten();
        if let Some(rest) = missive {
            return parse_missive(rest);
        }

        if !self.distance_chat {
            return ChatCommand::Passthrough(line);
        }
        if !self.use_symbols {
            return route(DeliveryMode::SayNoSymbols, &line);
        }

        let symbols = &self.symbols;
        let prefixed = [
            (symbols.shout.as_str(), DeliveryMode::Shout),
            (symbols.emote.as_str(), DeliveryMode::Emote),
            (symbols.whisper.as_str(), DeliveryMode::Whisper),
            (symbols.broadcast.as_str(), DeliveryMode::Broadcast),
        ];
        for (symbol, mode) in prefixed {
            let Some(rest) = line.strip_prefix(symbol) else {
                continue;
            };
            if mode == DeliveryMode::Broadcast && !privileges.broadcast {
                return ChatCommand::Rejected {
                    notice: BROADCAST_DENIED.to_owned(),
                };
            }
            return route(mode, rest);
        }

        route(DeliveryMode::Say, &line)
    }
}

fn route(mode: DeliveryMode, message: &str) -> ChatCommand {
    ChatCommand::Route {
        mode,
        message: message.to_owned(),
    }
}

/// Split `target message` at the first whitespace.
fn parse_missive(rest: &str) -> ChatCommand {
    let parsed = rest.split_once(char::is_whitespace).and_then(|(target, message)| {
        let message = message.trim();
        (!target.is_empty() && !message.is_empty()).then(|| ChatCommand::Missive {
            target: target.to_owned(),
            message: message.to_owned(),
        })
    });
    parsed.unwrap_or_else(|| ChatCommand::Rejected {
        notice: MALFORMED_MISSIVE.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: Privileges = Privileges {
        color_codes: false,
        broadcast: false,
    };

    const ADMIN: Privileges = Privileges {
        color_codes: true,
        broadcast: true,
    };

    fn dispatcher() -> ChatDispatcher {
        ChatDispatcher::new(&ChatConfig::default(), true)
    }

    #[test]
    fn symbols_select_modes() {
        let d = dispatcher();
        assert_eq!(d.classify("!help", PLAIN), route(DeliveryMode::Shout, "help"));
        assert_eq!(d.classify("*waves", PLAIN), route(DeliveryMode::Emote, "waves"));
        assert_eq!(d.classify("_psst", PLAIN), route(DeliveryMode::Whisper, "psst"));
        assert_eq!(d.classify("#news", ADMIN), route(DeliveryMode::Broadcast, "news"));
        assert_eq!(d.classify("hello", PLAIN), route(DeliveryMode::Say, "hello"));
    }

    #[test]
    fn broadcast_needs_the_privilege() {
        let outcome = dispatcher().classify("#news", PLAIN);
        assert_eq!(
            outcome,
            ChatCommand::Rejected {
                notice: BROADCAST_DENIED.to_owned()
            }
        );
    }

    #[test]
    fn missive_line_splits_target_and_message() {
        let outcome = dispatcher().classify(">Bob   meet me at noon  ", PLAIN);
        assert_eq!(
            outcome,
            ChatCommand::Missive {
                target: "Bob".to_owned(),
                message: "meet me at noon".to_owned(),
            }
        );
    }

    #[test]
    fn malformed_missives_are_rejected() {
        let d = dispatcher();
        for line in [">Bob", ">Bob   ", "> hello"] {
            assert_eq!(
                d.classify(line, PLAIN),
                ChatCommand::Rejected {
                    notice: MALFORMED_MISSIVE.to_owned()
                },
                "line: {line:?}"
            );
        }
    }

    #[test]
    fn missive_symbol_is_plain_speech_when_missives_are_off() {
        let d = ChatDispatcher::new(&ChatConfig::default(), false);
        assert_eq!(
            d.classify(">Bob hi", PLAIN),
            route(DeliveryMode::Say, ">Bob hi")
        );
    }

    #[test]
    fn without_symbols_everything_is_speech() {
        let chat = ChatConfig {
            use_symbols: false,
            ..ChatConfig::default()
        };
        let d = ChatDispatcher::new(&chat, true);
        assert_eq!(
            d.classify("!loud", PLAIN),
            route(DeliveryMode::SayNoSymbols, "!loud")
        );
        assert_eq!(
            d.classify(">Bob hi", PLAIN),
            route(DeliveryMode::SayNoSymbols, ">Bob hi")
        );
    }

    #[test]
    fn disabled_distance_chat_passes_through() {
        let chat = ChatConfig {
            enabled: false,
            ..ChatConfig::default()
        };
        let d = ChatDispatcher::new(&chat, true);
        assert_eq!(
            d.classify("&ahello", ADMIN),
            ChatCommand::Passthrough("§ahello".to_owned())
        );
        assert!(matches!(
            d.classify(">Bob hi", PLAIN),
            ChatCommand::Missive { .. }
        ));
    }

    #[test]
    fn colour_codes_need_the_privilege() {
        let d = dispatcher();
        assert_eq!(
            d.classify("&chot", ADMIN),
            route(DeliveryMode::Say, "§chot")
        );
        assert_eq!(
            d.classify("&chot", PLAIN),
            route(DeliveryMode::Say, "&chot")
        );
    }

    #[test]
    fn multi_character_symbols_are_stripped_whole() {
        let chat = ChatConfig {
            symbols: SymbolConfig {
                shout: "!!".to_owned(),
                ..SymbolConfig::default()
            },
            ..ChatConfig::default()
        };
        let d = ChatDispatcher::new(&chat, true);
        assert_eq!(d.classify("!!hey", PLAIN), route(DeliveryMode::Shout, "hey"));
        assert_eq!(d.classify("!hey", PLAIN), route(DeliveryMode::Say, "!hey"));
    }

    #[test]
    fn privileges_follow_permission_levels() {
        let permissions = PermissionConfig {
            color_level: 1,
            broadcast_level: 3,
        };
        assert_eq!(
            Privileges::from_level(2, &permissions),
            Privileges {
                color_codes: true,
                broadcast: false
            }
        );
        assert_eq!(Privileges::from_level(0, &permissions), Privileges::default());
    }
}
