//! Cache module for remembering the last search of each kind
//!
//! `CacheStore` is the in-memory record of the latest capital, country-name
//! and region searches. `Storage` is where that record is persisted between
//! runs: a JSON file per key on disk, or process memory when no cache
//! directory is available.

mod storage;
mod store;

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{CacheStore, RegionSlot, TermSlot, CACHE_STORE_KEY};
