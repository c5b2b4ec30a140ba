use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Process-wide toggles, persisted on every change.
///
/// Field names on the wire match the keys the browser widget has always
/// stored, so existing saved settings keep loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settings {
    #[serde(rename = "isSoundOn")]
    pub sound_on: bool,
    #[serde(rename = "isRemoveWinnerEnabled")]
    pub remove_winner_enabled: bool,
    #[serde(rename = "isCountdownEnabled")]
    pub countdown_enabled: bool,
    #[serde(rename = "isSingleDisplay")]
    pub single_display: bool,
    #[serde(rename = "darkMode")]
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_on: true,
            remove_winner_enabled: true,
            countdown_enabled: false,
            single_display: true,
            dark_mode: true,
        }
    }
}
