// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

pub const MIN_CATCH_UP: u32 = 4;

/// Periods an interval may fire for in one poll: every period that fits in a
/// normal frame, plus one of slack, and never fewer than `MIN_CATCH_UP`.
pub fn catch_up_for(period: Duration, frame_period: Duration) -> u32 {
    let period = period.max(Duration::from_millis(1)).as_nanos();
    let per_frame = frame_period.as_nanos().div_ceil(period);
    let per_frame = u32::try_from(per_frame).unwrap_or(u32::MAX - 1);
    (per_frame + 1).max(MIN_CATCH_UP)
}

#[derive(Clone, Copy, Debug)]
pub struct Interval {
    period: Duration,
    next: Instant,
    max_catch_up: u32,
}

impl Interval {
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next: start + period,
            max_catch_up: MIN_CATCH_UP,
        }
    }

    pub fn with_catch_up(mut self, max_catch_up: u32) -> Self {
        self.max_catch_up = max_catch_up.max(1);
        self
    }

    #[cfg(test)]
    pub fn next_fire(&self) -> Instant {
        self.next
    }

    /// Scheduled instants that are due at `now`, oldest first. A stall longer
    /// than `max_catch_up` periods is not replayed: the schedule is
    /// re-anchored one period after `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<Instant> {
        let mut due = Vec::new();
        while self.next <= now {
            if due.len() as u32 == self.max_catch_up {
                self.next = now + self.period;
                break;
            }
            due.push(self.next);
            self.next += self.period;
        }
        due
    }
}
