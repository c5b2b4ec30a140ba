use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{RaffleError, Settings, SoundCue, WheelSegment, WinnerRecord};

/// One presentation update, mirroring a call on the rendering collaborator.
/// Serialized one per line for a browser front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum DisplayUpdate {
    EligibleList {
        names: Vec<String>,
        count: usize,
    },
    /// Redrawn whenever the eligible list changes.
    WheelSegments {
        segments: Vec<WheelSegment>,
    },
    WinnerHistory {
        records: Vec<WinnerRecord>, // Most recent first
    },
    CountdownTick {
        remaining: u32,
    },
    ScrambleName {
        name: String,
    },
    FinalWinner {
        name: String,
    },
    SpinTarget {
        winner_index: usize,
        eligible_count: usize,
        rotation_degrees: f64,
    },
    DrawHeader {
        text: String,
    },
    RevealCleared,
    SettingsApplied {
        settings: Settings,
    },
    Notice {
        error: RaffleError,
    },
    PlaySound {
        cue: SoundCue,
        asset_id: String,
    },
    /// Yes/no question that must be answered before anything changes.
    ConfirmPrompt {
        question: String,
    },
    Message {
        text: String,
    },
}
