//! Periodic ticks derived from accumulated frame time.
//!
//! Polling systems (proximity, loading progress, midnight check) do not run
//! every frame; each owns a [`Ticker`] with its own rate and is advanced from
//! the single world tick.

/// Caps catch-up ticks after a stall.
const MAX_TICKS_PER_ADVANCE: u32 = 4;

/// Fires every `interval` seconds of accumulated time.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticker {
    interval: f32,
    accumulator: f32,
}

impl Ticker {
    /// A ticker firing every `interval` seconds (clamped to at least 1 ms).
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.001),
            accumulator: 0.0,
        }
    }

    /// A ticker firing every `ms` milliseconds.
    pub fn from_millis(ms: u32) -> Self {
        Self::new(ms as f32 / 1000.0)
    }

    /// Seconds between ticks.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Add `dt` and return how many ticks elapsed.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut fired = 0;
        while self.accumulator >= self.interval && fired < MAX_TICKS_PER_ADVANCE {
            self.accumulator -= self.interval;
            fired += 1;
        }
        if fired == MAX_TICKS_PER_ADVANCE {
            self.accumulator = self.accumulator.min(self.interval);
        }
        fired
    }

    /// Forget accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Gate for non-essential per-frame work: opens at most once per interval.
///
/// Unlike [`Ticker`] there is no catch-up; leftover time is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Throttle {
    interval: f32,
    elapsed: f32,
}

impl Throttle {
    /// A throttle opening every `ms` milliseconds.
    pub fn from_millis(ms: u32) -> Self {
        Self {
            interval: ms as f32 / 1000.0,
            elapsed: 0.0,
        }
    }

    /// Accumulate `dt`; true when the gate opens this frame.
    pub fn ready(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        if self.elapsed > self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}
