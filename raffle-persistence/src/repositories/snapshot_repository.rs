use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::keys::{PARTICIPANTS_KEY, REMOVED_WINNERS_KEY, SETTINGS_KEY, WINNERS_KEY};
use crate::{KeyValueStore, PersistenceError};
use raffle_types::{Settings, WinnerRecord};

/// Everything the raffle keeps across sessions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaffleSnapshot {
    pub participants: Vec<String>,
    pub winners: Vec<WinnerRecord>, // Chronological
    pub removed_names: Vec<String>,
    pub settings: Settings,
}

/// Persistence port used by the raffle coordinator.
///
/// `load` never fails: absent or corrupt fields come back as their defaults.
/// `save` reports failures so the caller can log them and carry on in memory.
pub trait SnapshotStore {
    fn load(&mut self) -> RaffleSnapshot;
    fn save(&mut self, snapshot: &RaffleSnapshot) -> Result<(), PersistenceError>;
}

pub struct SnapshotRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SnapshotRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| PersistenceError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.read_json(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("Nothing stored under '{}', using default", key);
                T::default()
            }
            Err(e) => {
                warn!("Falling back to default for '{}': {}", key, e);
                T::default()
            }
        }
    }

    fn read_settings(&self) -> Settings {
        match self.read_json::<Value>(SETTINGS_KEY) {
            Ok(Some(value)) => settings_from_value(&value),
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!("Falling back to default settings: {}", e);
                Settings::default()
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(value).map_err(|source| PersistenceError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, encoded)
    }
}

impl<S: KeyValueStore> SnapshotStore for SnapshotRepository<S> {
    fn load(&mut self) -> RaffleSnapshot {
        RaffleSnapshot {
            participants: self.read_or_default(PARTICIPANTS_KEY),
            winners: self.read_or_default(WINNERS_KEY),
            removed_names: self.read_or_default(REMOVED_WINNERS_KEY),
            settings: self.read_settings(),
        }
    }

    fn save(&mut self, snapshot: &RaffleSnapshot) -> Result<(), PersistenceError> {
        // Attempt every key even if one fails; report the first failure.
        let results = [
            self.write_json(PARTICIPANTS_KEY, &snapshot.participants),
            self.write_json(WINNERS_KEY, &snapshot.winners),
            self.write_json(REMOVED_WINNERS_KEY, &snapshot.removed_names),
            self.write_json(SETTINGS_KEY, &snapshot.settings),
        ];
        results.into_iter().collect()
    }
}

/// Rebuild settings flag by flag, so one bad or missing flag does not reset
/// the others.
fn settings_from_value(value: &Value) -> Settings {
    let defaults = Settings::default();
    let flag = |field: &str, default: bool| {
        match value.get(field) {
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                warn!("Setting '{}' has non-boolean value {}, using default", field, other);
                default
            }
            None => default,
        }
    };

    Settings {
        sound_on: flag("isSoundOn", defaults.sound_on),
        remove_winner_enabled: flag("isRemoveWinnerEnabled", defaults.remove_winner_enabled),
        countdown_enabled: flag("isCountdownEnabled", defaults.countdown_enabled),
        single_display: flag("isSingleDisplay", defaults.single_display),
        dark_mode: flag("darkMode", defaults.dark_mode),
    }
}
