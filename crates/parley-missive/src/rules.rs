//! Tunables for missive delivery.
//!
//! [`MissiveRules`] is built from the YAML configuration at startup, the
//! same way the chat crate's range rules are.

use parley_types::{Location, MAX_MISSIVE_CHARS};

use crate::requirement::ItemRequirement;

/// Parameters of the travel-time formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRules {
    /// Distance a missive covers per unit of time, in blocks (default: 100).
    pub unit_distance: f64,
    /// Seconds per unit distance, also the minimum travel time (default: 3).
    pub unit_duration_secs: f64,
    /// Host ticks per second (default: 20).
    pub ticks_per_second: u32,
    /// Multiplier when sender and target are in different dimensions
    /// (default: 8).
    pub dimension_penalty: u32,
}

impl Default for DelayRules {
    fn default() -> Self {
        Self {
            unit_distance: 100.0,
            unit_duration_secs: 3.0,
            ticks_per_second: 20,
            dimension_penalty: 8,
        }
    }
}

impl DelayRules {
    /// Travel time in ticks from `from` to `to`.
    ///
    /// `round((d^2 / unit^2) * duration + duration) * ticks_per_second`,
    /// multiplied by the dimension penalty when the dimensions differ.
    /// Coordinates are compared even across dimensions. The result
    /// saturates at `u64::MAX` and never goes below zero.
    pub fn delay_ticks(&self, from: &Location, to: &Location) -> u64 {
        let distance_sq = from.position.distance_sq(&to.position);
        let unit_sq = self.unit_distance * self.unit_distance;
        let seconds = (distance_sq / unit_sq)
            .mul_add(self.unit_duration_secs, self.unit_duration_secs)
            .round();

        let mut ticks = seconds * f64::from(self.ticks_per_second);
        if !from.same_dimension(to) {
            ticks *= f64::from(self.dimension_penalty);
        }
        saturating_ticks(ticks)
    }
}

/// `2^64`, the first float past `u64::MAX`.
const TICK_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Convert a tick count to `u64`, clamping out-of-range values.
fn saturating_ticks(ticks: f64) -> u64 {
    if ticks.is_nan() || ticks <= 0.0 {
        return 0;
    }
    if ticks >= TICK_LIMIT {
        return u64::MAX;
    }
    // Safe: 0 < ticks < 2^64 was checked above.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let result = ticks as u64;
    result
}

/// Everything the missive service needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct MissiveRules {
    /// Travel-time parameters.
    pub delay: DelayRules,
    /// Longest accepted missive in characters (at most 800).
    pub max_length: usize,
    /// Item gating, or `None` when missives are free.
    pub items: Option<ItemRequirement>,
}

impl Default for MissiveRules {
    fn default() -> Self {
        Self {
            delay: DelayRules::default(),
            max_length: MAX_MISSIVE_CHARS,
            items: None,
        }
    }
}
