//! An in-process slot, used when nothing should touch the disk.

use super::{ExpenseStorage, LoadError, StorageError};

/// Keeps the serialized expense list in memory.
///
/// Useful for tests and for running without durable storage. An optional
/// capacity makes writes fail the way a full browser or disk quota would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: Option<String>,
    capacity: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty slot with unlimited capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `contents`.
    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: Some(contents.to_owned()),
            capacity: None,
        }
    }

    /// Limit the slot to `capacity` bytes.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// The raw contents of the slot.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ExpenseStorage for MemoryStorage {
    fn read_slot(&self) -> Result<Option<String>, LoadError> {
        Ok(self.contents.clone())
    }

    fn write_slot(&mut self, contents: &str) -> Result<(), StorageError> {
        match self.capacity {
            Some(capacity) if contents.len() > capacity => {
                return Err(StorageError::CapacityExceeded {
                    needed: contents.len(),
                    capacity,
                });
            }
            _ => {}
        }

        self.contents = Some(contents.to_owned());

        Ok(())
    }
}
