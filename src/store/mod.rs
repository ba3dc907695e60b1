//! Shared key-value store holding room records.
//!
//! Every client reads and writes the same keys without any lock, so two
//! writers can overwrite each other. Room logic lives in [`crate::rooms`].

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Synchronous string store shared by all clients of a room.
pub trait RoomStore: Send + Sync + std::fmt::Debug {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
