//! Tick clock for the Parley engine.
//!
//! The clock counts tick boundaries. It is the only temporal state the
//! engine keeps: missive travel is measured in ticks and every pending
//! delivery carries its own elapsed counter, so wall time is derived from
//! the tick number and the configured tick rate.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid clock configuration (e.g. zero ticks per second).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Monotonic tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    /// Current tick number (0 before the first advance).
    tick: u64,

    /// Host ticks per second.
    ticks_per_second: u32,
}

impl TickClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `ticks_per_second` is 0.
    pub fn new(ticks_per_second: u32) -> Result<Self, ClockError> {
        Self::from_tick(0, ticks_per_second)
    }

    /// Create a clock resuming at `tick`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `ticks_per_second` is 0.
    pub fn from_tick(tick: u64, ticks_per_second: u32) -> Result<Self, ClockError> {
        if ticks_per_second == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "ticks_per_second must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            tick,
            ticks_per_second,
        })
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Return the configured tick rate.
    pub const fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    /// Whole seconds of host time covered so far.
    pub fn elapsed_secs(&self) -> u64 {
        self.tick
            .checked_div(u64::from(self.ticks_per_second))
            .unwrap_or(0)
    }
}
