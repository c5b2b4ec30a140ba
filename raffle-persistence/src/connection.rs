use std::path::Path;

use tracing::info;

use crate::{FileStore, MemoryStore};

pub const STATE_FILE_ENV: &str = "RAFFLE_STATE_FILE";
pub const DEFAULT_STATE_FILE: &str = "./raffle_state.json";

pub fn connect_to_state_file(path: impl AsRef<Path>) -> FileStore {
    let path = path.as_ref();
    info!("Opening raffle state at {}", path.display());
    FileStore::open(path)
}

pub fn connect_to_memory_store() -> MemoryStore {
    MemoryStore::new()
}
