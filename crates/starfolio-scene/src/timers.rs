//! Delayed actions driven by frame time, cancellable by generation.
//!
//! Cancelling bumps the generation instead of hunting down entries; anything
//! scheduled under an older generation is dropped when it comes due, so a
//! stale callback can never fire after a reset.

use tracing::debug;

/// A timer that came due this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub generation: u64,
    pub action: T,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    remaining: f32,
    generation: u64,
    action: T,
}

/// Pending delayed actions.
#[derive(Debug, Clone)]
pub struct Timers<T> {
    generation: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation; new timers are tagged with it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run `action` after `delay_secs` of frame time.
    pub fn schedule(&mut self, delay_secs: f32, action: T) {
        self.pending.push(Pending {
            remaining: delay_secs.max(0.0),
            generation: self.generation,
            action,
        });
    }

    pub fn schedule_ms(&mut self, delay_ms: u32, action: T) {
        self.schedule(delay_ms as f32 / 1000.0, action);
    }

    /// Invalidate everything scheduled so far and start a new generation.
    pub fn cancel_all(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Live timers (stale ones excluded).
    pub fn pending(&self) -> usize {
        self.pending
            .iter()
            .filter(|p| p.generation == self.generation)
            .count()
    }

    /// Advance by `dt` seconds and return the current-generation timers
    /// that came due, earliest first.
    pub fn advance(&mut self, dt: f32) -> Vec<Fired<T>> {
        let generation = self.generation;
        let before = self.pending.len();
        self.pending.retain(|p| p.generation == generation);
        let dropped = before - self.pending.len();
        if dropped > 0 {
            debug!(dropped, "stale timers dropped");
        }

        let dt = dt.max(0.0);
        for p in &mut self.pending {
            p.remaining -= dt;
        }
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.remaining <= 0.0);
        self.pending = rest;
        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        due.into_iter()
            .map(|p| Fired {
                generation: p.generation,
                action: p.action,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timers = Timers::new();
        timers.schedule_ms(200, "tick");
        assert!(timers.advance(0.1).is_empty());
        let fired = timers.advance(0.11);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].action, "tick");
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_earliest_first() {
        let mut timers = Timers::new();
        timers.schedule(0.3, 3);
        timers.schedule(0.1, 1);
        timers.schedule(0.2, 2);
        let order: Vec<_> = timers.advance(1.0).into_iter().map(|f| f.action).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_cancelled_timers_never_fire() {
        let mut timers = Timers::new();
        timers.schedule(0.5, "old");
        timers.cancel_all();
        timers.schedule(0.5, "new");
        assert_eq!(timers.pending(), 1);
        let fired = timers.advance(1.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].action, "new");
        assert_eq!(fired[0].generation, timers.generation());
    }
}
