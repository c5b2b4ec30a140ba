use std::time::Duration;

/// Phase durations of a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawTimings {
    pub countdown_from: u32,          // First countdown value shown
    pub countdown_tick: Duration,     // Delay between countdown values
    pub spin_duration: Duration,      // Wheel animation before the reveal
    pub scramble_interval: Duration,  // Delay between scramble names
    pub scramble_duration: Duration,  // Total scramble time before the winner shows
}

impl Default for DrawTimings {
    fn default() -> Self {
        Self {
            countdown_from: 10,
            countdown_tick: Duration::from_secs(1),
            spin_duration: Duration::from_millis(4500), // 4 s transition + buffer
            scramble_interval: Duration::from_millis(100),
            scramble_duration: Duration::from_secs(3),
        }
    }
}

impl DrawTimings {
    /// Time from draw start to settle, ignoring scheduler jitter.
    pub fn total(&self, countdown_enabled: bool) -> Duration {
        let countdown = if countdown_enabled {
            self.countdown_tick * (self.countdown_from + 1)
        } else {
            Duration::ZERO
        };
        countdown + self.spin_duration + self.scramble_duration
    }
}
