//! The in-memory list of expenses and its link to durable storage.

use time::OffsetDateTime;

use crate::{
    expense::{Amount, Expense, ExpenseId},
    filter,
    storage::{ExpenseStorage, StorageError},
    validation::ValidatedExpense,
};

/// The result of a change to the [ExpenseStore].
///
/// The change has always been applied to the in-memory list. `saved` says
/// whether the durable copy was updated too, so the caller can tell the user
/// when it was not.
#[derive(Debug, PartialEq)]
#[must_use]
pub struct Persisted<T> {
    /// The outcome of the change itself.
    pub value: T,
    /// The result of writing the list to storage.
    pub saved: Result<(), StorageError>,
}

/// Owns the expense list, newest first, and saves it after every change.
///
/// Create one with [ExpenseStore::open] and hand it to the front end; there
/// is no global instance.
#[derive(Debug)]
pub struct ExpenseStore<S> {
    expenses: Vec<Expense>,
    storage: S,
}

impl<S: ExpenseStorage> ExpenseStore<S> {
    /// Load the expense list from `storage`.
    ///
    /// A missing or corrupt list gives an empty store.
    pub fn open(storage: S) -> Self {
        let expenses = storage.load();

        Self { expenses, storage }
    }

    /// Add a new expense to the front of the list and save the list.
    pub fn insert(&mut self, expense: ValidatedExpense) -> Persisted<Expense> {
        let (title, amount, date) = expense.into_parts();
        let expense = Expense {
            id: self.unused_id(),
            title,
            amount,
            date,
            timestamp: self.next_timestamp(),
        };

        tracing::debug!("Adding expense {} for ${}", expense.id, expense.amount);
        self.expenses.insert(0, expense.clone());

        Persisted {
            value: expense,
            saved: self.storage.save(&self.expenses),
        }
    }

    /// Remove the expense with `id`, saving the list if it was found.
    ///
    /// `value` is `false`, and nothing is written, if no expense has that ID.
    pub fn delete_by_id(&mut self, id: &ExpenseId) -> Persisted<bool> {
        let Some(index) = self.expenses.iter().position(|expense| &expense.id == id) else {
            tracing::debug!("Tried to delete missing expense {id}");
            return Persisted {
                value: false,
                saved: Ok(()),
            };
        };

        let removed = self.expenses.remove(index);
        tracing::debug!("Deleted expense {} for ${}", removed.id, removed.amount);

        Persisted {
            value: true,
            saved: self.storage.save(&self.expenses),
        }
    }

    /// The sum of every expense.
    pub fn total(&self) -> Amount {
        filter::total(&self.expenses)
    }

    /// Every expense, newest first.
    pub fn all(&self) -> &[Expense] {
        &self.expenses
    }

    /// Get an expense by its ID.
    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| &expense.id == id)
    }

    /// The number of expenses.
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Whether there are no expenses.
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn unused_id(&self) -> ExpenseId {
        loop {
            let id = ExpenseId::generate();

            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Milliseconds since the Unix epoch, bumped past the newest existing
    /// timestamp if the clock has not moved on (or has gone backwards).
    fn next_timestamp(&self) -> i64 {
        let now = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        let latest = self.expenses.iter().map(|expense| expense.timestamp).max();

        match latest {
            Some(latest) if latest >= now => latest.saturating_add(1),
            _ => now,
        }
    }
}
