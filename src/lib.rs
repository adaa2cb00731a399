//! Expense tracker is a small personal expense log.
//!
//! This library holds everything except the user interface: validation of
//! user-entered expenses, the in-memory [ExpenseStore], month/year filtering
//! and durable storage of the expense list in a single named slot.
//!
//! A typical front end wires the pieces together like so:
//!
//! ```no_run
//! use expense_tracker::{ExpenseStore, JsonFileStorage, validate_form};
//! use time::macros::date;
//!
//! let mut store = ExpenseStore::open(JsonFileStorage::new("expenses.json"));
//!
//! match validate_form("Coffee", "4.50", "2024-03-05", date!(2024 - 03 - 06)) {
//!     Ok(expense) => {
//!         let inserted = store.insert(expense);
//!         if let Err(error) = inserted.saved {
//!             eprintln!("Failed to save expense: {error}");
//!         }
//!     }
//!     Err(errors) => eprintln!("{errors}"),
//! }
//! ```

#![warn(missing_docs)]

mod display;
mod expense;
mod filter;
mod logging;
mod render;
mod storage;
mod store;
mod timezone;
mod validation;

pub use display::{format_currency, format_long_date};
pub use expense::{Amount, Expense, ExpenseId, ExpenseTitle};
pub use filter::{
    ExpenseFilter, ExpenseView, RECENT_YEAR_COUNT, apply, available_years, parse_month,
    parse_year, total,
};
pub use logging::setup_logging;
pub use render::{
    EMPTY_LIST_MESSAGE, FILTERED_EMPTY_HINT, UNFILTERED_EMPTY_HINT, render_expense_line,
    render_expense_list, render_form_errors,
};
pub use storage::{
    ExpenseStorage, JsonFileStorage, LoadError, MemoryStorage, SLOT_KEY, SqliteStorage,
    StorageError,
};
pub use store::{ExpenseStore, Persisted};
pub use timezone::{get_local_offset, resolve_local_offset, today};
pub use validation::{
    EARLIEST_DATE, Field, FormErrors, MAX_AMOUNT, MIN_TITLE_LENGTH, ValidatedExpense,
    ValidationError, validate_amount, validate_date, validate_form, validate_title,
};

/// The errors that may occur in the application outside of form validation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A month filter was not a number from 1 to 12.
    #[error("invalid month \"{0}\", expected a number from 01 to 12")]
    InvalidMonth(String),

    /// A year filter was not a four digit year.
    #[error("invalid year \"{0}\", expected a four digit year such as 2024")]
    InvalidYear(String),

    /// A date could not be formatted for display.
    #[error("could not format date: {0}")]
    DateFormat(String),

    /// The storage backend could not be opened or written to.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
