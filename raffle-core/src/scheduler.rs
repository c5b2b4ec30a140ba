use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use raffle_types::SessionId;

/// Phase step a timer fires into the draw sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStep {
    CountdownTick { remaining: u32 },
    SpinComplete,
    ScrambleTick,
}

/// A scheduled step for one draw session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawTimer {
    pub session_id: SessionId,
    pub step: DrawStep,
}

/// Source of time and delayed wake-ups for the draw sequencer.
///
/// Implementations deliver each timer back to `Raffle::handle_timer` once
/// `delay` has passed. Nothing is invoked re-entrantly from `after`.
pub trait Scheduler {
    fn now(&self) -> Instant;
    fn after(&mut self, delay: Duration, timer: DrawTimer);
}

#[derive(Debug)]
struct Pending {
    due: Duration,
    seq: u64,
    timer: DrawTimer,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    // Reversed so the max-heap pops the earliest due, then earliest scheduled
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Scheduler with a virtual clock that only moves when told to.
#[derive(Debug)]
pub struct ManualScheduler {
    origin: Instant,
    elapsed: Duration,
    queue: BinaryHeap<Pending>,
    next_seq: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Virtual time since the scheduler was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Delay until the next timer is due, if any.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.queue
            .peek()
            .map(|pending| pending.due.saturating_sub(self.elapsed))
    }

    /// Jump the clock to the next timer and hand it out.
    pub fn pop_due(&mut self) -> Option<DrawTimer> {
        let pending = self.queue.pop()?;
        if pending.due > self.elapsed {
            self.elapsed = pending.due;
        }
        Some(pending.timer)
    }

    /// Move the clock forward and return every timer that became due, in order.
    /// Timers scheduled while handling the returned ones are not included.
    pub fn advance(&mut self, by: Duration) -> Vec<DrawTimer> {
        self.elapsed += by;
        let mut due = Vec::new();
        while self
            .queue
            .peek()
            .is_some_and(|pending| pending.due <= self.elapsed)
        {
            if let Some(pending) = self.queue.pop() {
                due.push(pending.timer);
            }
        }
        due
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn after(&mut self, delay: Duration, timer: DrawTimer) {
        let pending = Pending {
            due: self.elapsed + delay,
            seq: self.next_seq,
            timer,
        };
        self.next_seq += 1;
        self.queue.push(pending);
    }
}
