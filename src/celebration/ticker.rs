//! Spawn timers driven by the animation-frame timestamp.
//!
//! A `Ticker` is plain data owned by the effect, so dropping it cancels it and
//! there is never a second copy to fire twice.

/// Most firings handed out in a single frame after falling behind (background
/// tab, debugger pause). Past that the ticker re-phases to the current time.
pub const MAX_CATCH_UP: u32 = 3;

#[derive(Clone, Debug)]
pub struct Ticker {
    period_ms: f64,
    next_due_ms: f64,
    repeat: bool,
    done: bool,
}

impl Ticker {
    /// Fires every `period_ms`, first at `now + period_ms`.
    pub fn every(period_ms: f64, now: f64) -> Self {
        let period_ms = period_ms.max(1.0);
        Self {
            period_ms,
            next_due_ms: now + period_ms,
            repeat: true,
            done: false,
        }
    }

    /// Fires once at `now + delay_ms`.
    pub fn once(delay_ms: f64, now: f64) -> Self {
        let delay_ms = delay_ms.max(0.0);
        Self {
            period_ms: delay_ms,
            next_due_ms: now + delay_ms,
            repeat: false,
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of firings due at `now`; advances the schedule past them.
    pub fn fire_count(&mut self, now: f64) -> u32 {
        if self.done || now < self.next_due_ms {
            return 0;
        }
        if !self.repeat {
            self.done = true;
            return 1;
        }
        let behind = ((now - self.next_due_ms) / self.period_ms).floor() as u64 + 1;
        if behind > MAX_CATCH_UP as u64 {
            self.next_due_ms = now + self.period_ms;
            return MAX_CATCH_UP;
        }
        self.next_due_ms += behind as f64 * self.period_ms;
        behind as u32
    }
}
