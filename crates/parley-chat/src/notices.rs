//! Player-facing line formats for the immediate modes.
//!
//! Lines use the host's `§` format codes: `§7` grey, `§o` italic, `§l` bold,
//! `§6` gold, `§b` aqua.

/// `name: message`, the clear Say line. Also the prefix of a muffled line.
pub fn say(name: &str, message: &str) -> String {
    format!("{name}: {message}")
}

/// Grey italic third-person emote.
pub fn emote(name: &str, message: &str) -> String {
    format!("§7§o*{name} {message}")
}

/// What the shouter sees.
pub fn shout_reflexive(message: &str) -> String {
    format!("§lYou shout: {message}")
}

/// What everyone else in shout range sees.
pub fn shout(name: &str, message: &str) -> String {
    format!("§l{name} shouts: {message}")
}

/// What the whisperer sees.
pub fn whisper_reflexive(message: &str) -> String {
    format!("§7§oYou whisper: {message}")
}

/// What listeners within the whisper range see.
pub fn whisper(name: &str, message: &str) -> String {
    format!("§7§o{name} whispers: {message}")
}

/// Content-free notice for listeners just outside the whisper range.
pub fn whisper_notice(name: &str) -> String {
    format!("§7§o*{name} whispers.")
}

/// Unattributed server-wide broadcast.
pub fn broadcast(message: &str) -> String {
    format!("§6<§bBROADCAST§6>§b {message}")
}
