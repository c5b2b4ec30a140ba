use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DrawStatus {
    Idle,         // No draw has run, or the last one was dismissed
    CountingDown, // 10..1 countdown before the spin
    Spinning,     // Winner fixed, wheel animating
    Revealing,    // Name scramble before the winner is shown
    Settled,      // Winner shown and committed to history
}

impl DrawStatus {
    /// True while a draw session is running and a new one must be rejected.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            DrawStatus::CountingDown | DrawStatus::Spinning | DrawStatus::Revealing
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WinnerRecord {
    pub name: String,
    pub timestamp: String, // Local date-time captured when the draw settled
}

impl WinnerRecord {
    pub fn new(name: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp: timestamp.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SoundCue {
    Spin, // Draw started
    Tick, // Countdown tick
    Win,  // Reveal started
}

impl SoundCue {
    /// Asset id the browser front end binds to an audio element.
    pub fn asset_id(&self) -> &'static str {
        match self {
            SoundCue::Spin => "spin-sound",
            SoundCue::Tick => "tick-sound",
            SoundCue::Win => "win-sound",
        }
    }
}
