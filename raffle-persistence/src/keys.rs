//! Storage keys. Values under each key are JSON-encoded strings.

pub const PARTICIPANTS_KEY: &str = "raffleParticipants";
pub const WINNERS_KEY: &str = "raffleWinners";
pub const REMOVED_WINNERS_KEY: &str = "raffleRemovedWinners";
pub const SETTINGS_KEY: &str = "raffleSettings";
