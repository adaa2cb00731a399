//! Formatting of amounts and dates for people to read.

use time::{Date, macros::format_description};

use crate::{Error, expense::Amount};

/// Format `amount` as dollars with two decimal places, e.g. `$1234.50`.
pub fn format_currency(amount: Amount) -> String {
    let amount = amount.to_string();

    match amount.strip_prefix('-') {
        Some(magnitude) => format!("-${magnitude}"),
        None => format!("${amount}"),
    }
}

/// Format `date` in long form, e.g. `March 5, 2024`.
///
/// # Errors
/// Returns [Error::DateFormat] if the date cannot be formatted.
pub fn format_long_date(date: Date) -> Result<String, Error> {
    date.format(format_description!(
        "[month repr:long] [day padding:none], [year]"
    ))
    .map_err(|error| Error::DateFormat(error.to_string()))
}
