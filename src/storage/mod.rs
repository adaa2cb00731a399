//! Durable storage for the expense list.
//!
//! The whole list is kept as one JSON array in a single named slot. Backends
//! only know how to read and write that slot, the [ExpenseStorage] trait
//! provides the (de)serialization on top.

mod json_file;
mod memory;
mod sqlite;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use std::collections::HashSet;

use crate::{expense::Expense, validation::validate_stored};

/// The name of the slot that holds the expense list.
pub const SLOT_KEY: &str = "expenses";

/// Errors that may occur when writing the expense list.
///
/// The in-memory expense list is still correct when a write fails, only the
/// durable copy is out of date.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StorageError {
    /// The serialized list does not fit in the capacity configured for the slot.
    #[error("storage capacity exceeded: {needed} bytes needed but the limit is {capacity} bytes")]
    CapacityExceeded {
        /// The size of the serialized expense list in bytes.
        needed: usize,
        /// The configured capacity of the slot in bytes.
        capacity: usize,
    },

    /// The device holding the slot has no space left.
    #[error("the storage device is full")]
    StorageFull,

    /// An I/O error other than running out of space.
    #[error("could not write to storage: {0}")]
    Io(String),

    /// The expense list could not be serialized as JSON.
    #[error("could not serialize expenses as JSON: {0}")]
    Serialization(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(String),
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::StorageFull => StorageError::StorageFull,
            _ => StorageError::Io(error.to_string()),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: rusqlite::ErrorCode::DiskFull,
                    extended_code: _,
                },
                _,
            ) => StorageError::StorageFull,
            error => StorageError::Sql(error.to_string()),
        }
    }
}

/// Errors that may occur when reading the expense list.
///
/// These are never fatal: [ExpenseStorage::load] logs them and starts from an
/// empty list.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LoadError {
    /// The slot could not be read.
    #[error("could not read from storage: {0}")]
    Unreadable(String),

    /// The slot does not hold a valid expense list.
    #[error("stored expenses are corrupt: {0}")]
    Corrupt(String),
}

/// A durable home for the expense list.
///
/// Implementers provide raw access to the slot and get loading and saving of
/// expenses for free.
pub trait ExpenseStorage {
    /// Read the contents of the slot, or `None` if nothing has been saved yet.
    ///
    /// # Errors
    /// Returns [LoadError::Unreadable] if the slot exists but cannot be read.
    fn read_slot(&self) -> Result<Option<String>, LoadError>;

    /// Replace the contents of the slot.
    ///
    /// # Errors
    /// Returns a [StorageError] if the write did not complete.
    fn write_slot(&mut self, contents: &str) -> Result<(), StorageError>;

    /// Load the expense list, in the order it was saved.
    ///
    /// # Errors
    /// Returns a [LoadError] if the slot cannot be read or does not hold a
    /// valid expense list. A list is only valid if every expense has a unique
    /// ID and a title, amount and date that the new expense form would accept.
    fn try_load(&self) -> Result<Vec<Expense>, LoadError> {
        let Some(contents) = self.read_slot()? else {
            return Ok(Vec::new());
        };

        let expenses: Vec<Expense> = serde_json::from_str(&contents)
            .map_err(|error| LoadError::Corrupt(error.to_string()))?;

        let mut ids = HashSet::with_capacity(expenses.len());
        for expense in &expenses {
            validate_stored(expense)
                .map_err(|error| LoadError::Corrupt(format!("expense {}: {error}", expense.id)))?;

            if !ids.insert(&expense.id) {
                return Err(LoadError::Corrupt(format!(
                    "expense {}: duplicate ID",
                    expense.id
                )));
            }
        }

        Ok(expenses)
    }

    /// Load the expense list, or an empty list if it is missing or corrupt.
    fn load(&self) -> Vec<Expense> {
        match self.try_load() {
            Ok(expenses) => {
                tracing::debug!("Loaded {} expenses from storage", expenses.len());
                expenses
            }
            Err(error) => {
                tracing::error!("Error loading expenses, starting with none: {error}");
                Vec::new()
            }
        }
    }

    /// Save the expense list, replacing whatever was saved before.
    ///
    /// # Errors
    /// Returns a [StorageError] if the list could not be serialized or written.
    fn save(&mut self, expenses: &[Expense]) -> Result<(), StorageError> {
        let contents = serde_json::to_string(expenses)
            .map_err(|error| StorageError::Serialization(error.to_string()))?;

        self.write_slot(&contents).inspect_err(|error| {
            tracing::error!("Error saving expenses: {error}");
        })
    }
}

impl<S: ExpenseStorage + ?Sized> ExpenseStorage for Box<S> {
    fn read_slot(&self) -> Result<Option<String>, LoadError> {
        (**self).read_slot()
    }

    fn write_slot(&mut self, contents: &str) -> Result<(), StorageError> {
        (**self).write_slot(contents)
    }
}
