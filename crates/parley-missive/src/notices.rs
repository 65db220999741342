//! Player-facing lines for missive delivery (`§a` green, `§e` yellow,
//! `§c` red, `§o` italic).

/// Acknowledgement sent to the sender on enqueue.
pub fn being_delivered(target: &str) -> String {
    format!("§a§oYour missive to {target} is being delivered!")
}

/// The missive itself, as the target reads it.
pub fn received(sender: &str, message: &str) -> String {
    format!("§a§oYou receive a missive from {sender} that reads: §e§o{message}")
}

/// Receipt sent to the sender after delivery.
pub fn delivered(target: &str) -> String {
    format!("§a§oYour missive to {target} has been delivered.")
}

/// Sent to the sender when the target was gone on arrival.
pub fn returned(target: &str, message: &str) -> String {
    format!("§a§oYour missive to {target} returned unread. The missive read: §c§o{message}")
}
