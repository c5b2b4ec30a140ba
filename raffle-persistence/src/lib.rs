pub mod connection;
pub mod error;
pub mod keys;
pub mod repositories;
pub mod store;

pub use error::PersistenceError;
pub use repositories::{RaffleSnapshot, SnapshotRepository, SnapshotStore};
pub use store::{FileStore, KeyValueStore, MemoryStore};
