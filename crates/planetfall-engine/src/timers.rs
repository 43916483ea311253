//! Named, cancelable delayed callbacks scoped to a session generation.
//!
//! A stale timer surviving a session reset is the classic source of
//! cross-session state corruption: a landing or narrative timer armed for
//! generation N must never fire into generation N+1. Every entry carries
//! the generation that armed it, teardown cancels by generation, and
//! firing returns the generation so callers can discard leftovers.

/// Well-known timer names used by the exploration session.
pub mod names {
    /// Landing descent — fires when the rover touches down (or gives up).
    pub const LANDING: &str = "landing";
    /// Short cue between arrival and free exploration.
    pub const INTRO: &str = "intro";
    /// Settle window between meeting the mission goal and evaluation.
    pub const SETTLE: &str = "mission-settle";
}

/// A timer that came due during [`TimerPool::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub name: &'static str,
    pub generation: u32,
}

#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    name: &'static str,
    generation: u32,
    fires_at_ms: f64,
}

/// Cooperative timer pool driven by the tick loop. No threads, no wall
/// clock — time only moves when `advance` is called.
#[derive(Debug, Default)]
pub struct TimerPool {
    now_ms: f64,
    entries: Vec<TimerEntry>,
}

impl TimerPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Arm a timer. Re-arming the same (name, generation) pair replaces
    /// the pending entry instead of stacking a duplicate.
    pub fn schedule(&mut self, name: &'static str, generation: u32, delay_ms: f64) {
        self.cancel(name, generation);
        self.entries.push(TimerEntry {
            name,
            generation,
            fires_at_ms: self.now_ms + delay_ms.max(0.0),
        });
    }

    pub fn cancel(&mut self, name: &'static str, generation: u32) {
        self.entries
            .retain(|e| !(e.name == name && e.generation == generation));
    }

    /// Cancel every timer owned by one session generation.
    pub fn cancel_generation(&mut self, generation: u32) {
        self.entries.retain(|e| e.generation != generation);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, name: &'static str, generation: u32) -> bool {
        self.entries
            .iter()
            .any(|e| e.name == name && e.generation == generation)
    }

    /// Move time forward and return every timer that came due, in firing
    /// order.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<FiredTimer> {
        self.now_ms += dt_ms.max(0.0);
        let now = self.now_ms;

        let mut due: Vec<TimerEntry> = Vec::new();
        self.entries.retain(|e| {
            if e.fires_at_ms <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.fires_at_ms.total_cmp(&b.fires_at_ms));
        due.into_iter()
            .map(|e| FiredTimer {
                name: e.name,
                generation: e.generation,
            })
            .collect()
    }
}
