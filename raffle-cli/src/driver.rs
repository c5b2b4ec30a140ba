use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::debug;

use raffle_core::{DrawTimer, Scheduler};

/// Delivers draw timers through a channel once their delay has passed.
///
/// Each `after` call spawns a sleeping task, so this must be used from
/// inside a tokio runtime. The receiving end is drained by the one loop
/// that owns the raffle.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    sender: mpsc::UnboundedSender<DrawTimer>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DrawTimer>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn after(&mut self, delay: Duration, timer: DrawTimer) {
        // Deadline is fixed here, not when the task is first polled
        let deadline = tokio::time::Instant::now() + delay;
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if sender.send(timer).is_err() {
                debug!("Dispatch loop is gone, dropping timer");
            }
        });
    }
}
