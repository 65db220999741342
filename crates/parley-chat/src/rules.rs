//! Range rules for the immediate delivery modes.
//!
//! [`ChatRules`] bundles the tunables the router needs. The engine builds it
//! from the YAML configuration at startup; tests construct it directly.

use crate::muffle::MuffleStyle;

/// Range and muffling parameters for spatial chat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatRules {
    /// Base range `R` in blocks (default: 15).
    pub range: f64,

    /// Whisper range `W` in blocks (default: 2).
    pub whisper_range: f64,

    /// How muffled characters are rendered (default: obfuscation).
    pub style: MuffleStyle,
}

impl Default for ChatRules {
    fn default() -> Self {
        Self {
            range: 15.0,
            whisper_range: 2.0,
            style: MuffleStyle::Obfuscate,
        }
    }
}

impl ChatRules {
    /// Box half extent for Say: `2R`.
    pub fn say_extent(&self) -> f64 {
        self.range * 2.0
    }

    /// Squared clear range for Say and Emote: `R^2`.
    pub fn clear_sq(&self) -> f64 {
        self.range * self.range
    }

    /// Squared falloff range for Say: `(2R)^2`.
    pub fn falloff_sq(&self) -> f64 {
        let extent = self.say_extent();
        extent * extent
    }

    /// Box half extent for Shout: `3R`.
    pub fn shout_extent(&self) -> f64 {
        self.range * 3.0
    }

    /// Squared audible range for Shout: `(3R)^2`.
    pub fn shout_sq(&self) -> f64 {
        let extent = self.shout_extent();
        extent * extent
    }

    /// Squared full-message range for Whisper: `W^2`.
    pub fn whisper_sq(&self) -> f64 {
        self.whisper_range * self.whisper_range
    }

    /// Box half extent for Whisper: `W + 1`.
    pub fn whisper_notice_extent(&self) -> f64 {
        self.whisper_range + 1.0
    }

    /// Squared notice range for Whisper: `(W + 1)^2`.
    pub fn whisper_notice_sq(&self) -> f64 {
        let extent = self.whisper_notice_extent();
        extent * extent
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn derived_ranges_for_defaults() {
        let rules = ChatRules::default();
        assert_eq!(rules.clear_sq(), 225.0);
        assert_eq!(rules.falloff_sq(), 900.0);
        assert_eq!(rules.shout_sq(), 2025.0);
        assert_eq!(rules.whisper_sq(), 4.0);
        assert_eq!(rules.whisper_notice_sq(), 9.0);
    }
}
