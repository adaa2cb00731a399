//! Stores the expense list in a key-value table of a SQLite database.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use super::{ExpenseStorage, LoadError, SLOT_KEY, StorageError};

/// A slot backed by a row of the `slot` table in a SQLite database.
///
/// The row holds the same JSON as [super::JsonFileStorage] does.
#[derive(Debug)]
pub struct SqliteStorage {
    connection: Connection,
    key: String,
}

impl SqliteStorage {
    /// Use the slot [SLOT_KEY] in the database at `path`, creating the
    /// database and the slot table if needed.
    ///
    /// # Errors
    /// Returns a [StorageError] if the database cannot be opened or the table
    /// cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let connection = Connection::open(path)?;
        Self::new(connection)
    }

    /// Use the slot [SLOT_KEY] in the database behind `connection`.
    ///
    /// # Errors
    /// Returns a [StorageError] if the slot table cannot be created.
    pub fn new(connection: Connection) -> Result<Self, StorageError> {
        create_slot_table(&connection)?;

        Ok(Self {
            connection,
            key: SLOT_KEY.to_owned(),
        })
    }
}

/// Create the slot table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
fn create_slot_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS slot (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

impl ExpenseStorage for SqliteStorage {
    fn read_slot(&self) -> Result<Option<String>, LoadError> {
        self.connection
            .query_row(
                "SELECT value FROM slot WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|error| LoadError::Unreadable(error.to_string()))
    }

    fn write_slot(&mut self, contents: &str) -> Result<(), StorageError> {
        self.connection.execute(
            "INSERT INTO slot (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (&self.key, contents),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use super::SqliteStorage;
    use crate::{
        expense::{Amount, Expense, ExpenseId, ExpenseTitle},
        storage::{ExpenseStorage, LoadError},
    };

    fn get_test_storage() -> SqliteStorage {
        let conn = Connection::open_in_memory().unwrap();
        SqliteStorage::new(conn).unwrap()
    }

    fn expense(id: &str) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            title: ExpenseTitle::new_unchecked("Dinner"),
            amount: Amount::from_cents(4_210),
            date: date!(2023 - 11 - 30),
            timestamp: 1_701_300_000_000,
        }
    }

    #[test]
    fn empty_database_loads_as_empty() {
        let storage = get_test_storage();

        assert_eq!(storage.try_load(), Ok(Vec::new()));
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut storage = get_test_storage();
        let expenses = vec![expense("b"), expense("a")];

        storage.save(&expenses).unwrap();

        assert_eq!(storage.try_load(), Ok(expenses));
    }

    #[test]
    fn save_replaces_previous_list() {
        let mut storage = get_test_storage();
        storage.save(&[expense("a"), expense("b")]).unwrap();

        storage.save(&[expense("c")]).unwrap();

        assert_eq!(storage.load(), vec![expense("c")]);
    }

    #[test]
    fn corrupt_row_loads_as_empty() {
        let mut storage = get_test_storage();
        storage.write_slot("{oops").unwrap();

        assert!(matches!(storage.try_load(), Err(LoadError::Corrupt(_))));
        assert_eq!(storage.load(), Vec::new());
    }

    #[test]
    fn reopening_file_keeps_expenses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.db");
        SqliteStorage::open(&path)
            .unwrap()
            .save(&[expense("a")])
            .unwrap();

        let storage = SqliteStorage::open(&path).unwrap();

        assert_eq!(storage.load(), vec![expense("a")]);
    }
}
