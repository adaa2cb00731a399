//! Validation rules for the fields of the new expense form.
//!
//! Each field has its own validator so a front end can check a field as soon
//! as the user leaves it, and [validate_form] runs all of them at once when
//! the form is submitted.

use std::fmt::Display;

use time::{Date, macros::date, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::expense::{Amount, Expense, ExpenseTitle};

/// The minimum number of characters in an expense title.
pub const MIN_TITLE_LENGTH: usize = 2;

/// The largest amount a single expense may have.
pub const MAX_AMOUNT: Amount = Amount::from_cents(100_000_000);

/// The earliest date an expense may have.
pub const EARLIEST_DATE: Date = date!(2000 - 01 - 01);

/// Why a form field was rejected.
///
/// The messages are written for the person filling in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The title was empty or only whitespace.
    #[error("Title is required")]
    TitleRequired,

    /// The trimmed title was shorter than [MIN_TITLE_LENGTH].
    #[error("Title must be at least 2 characters long")]
    TitleTooShort,

    /// The amount was empty.
    #[error("Amount is required")]
    AmountRequired,

    /// The amount was not a number or was not greater than zero.
    #[error("Amount must be greater than 0")]
    AmountInvalid,

    /// The amount was greater than [MAX_AMOUNT].
    #[error("Amount cannot exceed $1,000,000")]
    AmountTooLarge,

    /// The date was empty.
    #[error("Date is required")]
    DateRequired,

    /// The date was not in the `YYYY-MM-DD` format or does not exist.
    #[error("Date must be a valid date")]
    DateInvalid,

    /// The date is later than today.
    ///
    /// Expenses record money that has already been spent, therefore future
    /// dates are not allowed.
    #[error("Date cannot be in the future")]
    FutureDate,

    /// The date is earlier than [EARLIEST_DATE].
    #[error("Date cannot be before year 2000")]
    DateTooOld,
}

impl ValidationError {
    /// The form field that this error belongs to.
    pub fn field(self) -> Field {
        match self {
            Self::TitleRequired | Self::TitleTooShort => Field::Title,
            Self::AmountRequired | Self::AmountInvalid | Self::AmountTooLarge => Field::Amount,
            Self::DateRequired | Self::DateInvalid | Self::FutureDate | Self::DateTooOld => {
                Field::Date
            }
        }
    }
}

/// A field of the new expense form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// What the money was spent on.
    Title,
    /// How much was spent.
    Amount,
    /// When it was spent.
    Date,
}

impl Field {
    /// Every field, in the order they appear on the form.
    pub const ALL: [Field; 3] = [Field::Title, Field::Amount, Field::Date];

    /// The label shown next to the field.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Amount => "Amount",
            Self::Date => "Date",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The errors for each field of a rejected form.
///
/// At least one field has an error when this is returned from
/// [validate_form].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    /// The error for the title field, if any.
    pub title: Option<ValidationError>,
    /// The error for the amount field, if any.
    pub amount: Option<ValidationError>,
    /// The error for the date field, if any.
    pub date: Option<ValidationError>,
}

impl FormErrors {
    /// The error for `field`, if any.
    pub fn get(&self, field: Field) -> Option<ValidationError> {
        match field {
            Field::Title => self.title,
            Field::Amount => self.amount,
            Field::Date => self.date,
        }
    }

    /// Whether no field has an error.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).is_none())
    }

    /// The fields with errors, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, ValidationError)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|error| (field, error)))
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (_, error)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }

        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// The fields of a form that passed [validate_form].
///
/// This is the only way to create an expense in the store, so every stored
/// amount, title and date has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedExpense {
    title: ExpenseTitle,
    amount: Amount,
    date: Date,
}

impl ValidatedExpense {
    /// The trimmed title.
    pub fn title(&self) -> &ExpenseTitle {
        &self.title
    }

    /// The amount, rounded to the nearest cent.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// The date the money was spent.
    pub fn date(&self) -> Date {
        self.date
    }

    pub(crate) fn into_parts(self) -> (ExpenseTitle, Amount, Date) {
        (self.title, self.amount, self.date)
    }
}

/// Validate a raw title and return it trimmed.
///
/// # Errors
/// This function will return a:
/// - [ValidationError::TitleRequired] if `raw` is empty after trimming,
/// - or [ValidationError::TitleTooShort] if the trimmed title has fewer than
///   [MIN_TITLE_LENGTH] characters.
pub fn validate_title(raw: &str) -> Result<ExpenseTitle, ValidationError> {
    let title = raw.trim();

    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    if title.graphemes(true).count() < MIN_TITLE_LENGTH {
        return Err(ValidationError::TitleTooShort);
    }

    Ok(ExpenseTitle::new_unchecked(title))
}

/// Parse and validate a raw amount of dollars, e.g. `"12.50"`.
///
/// # Errors
/// This function will return a:
/// - [ValidationError::AmountRequired] if `raw` is empty,
/// - [ValidationError::AmountInvalid] if `raw` is not a finite number or is
///   not at least one cent,
/// - or [ValidationError::AmountTooLarge] if the amount is over [MAX_AMOUNT].
pub fn validate_amount(raw: &str) -> Result<Amount, ValidationError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::AmountRequired);
    }

    let dollars: f64 = raw.parse().map_err(|_| ValidationError::AmountInvalid)?;

    if !dollars.is_finite() || dollars <= 0.0 {
        return Err(ValidationError::AmountInvalid);
    }

    if dollars > MAX_AMOUNT.as_dollars() {
        return Err(ValidationError::AmountTooLarge);
    }

    let amount = Amount::from_dollars(dollars);

    // Positive amounts under half a cent would be stored as zero.
    if amount <= Amount::ZERO {
        return Err(ValidationError::AmountInvalid);
    }

    Ok(amount)
}

/// Parse and validate a raw `YYYY-MM-DD` date.
///
/// `today` is the current date in the user's local timezone, see
/// [crate::today]. A date equal to `today` is accepted.
///
/// # Errors
/// This function will return a:
/// - [ValidationError::DateRequired] if `raw` is empty,
/// - [ValidationError::DateInvalid] if `raw` is not a real `YYYY-MM-DD` date,
/// - [ValidationError::FutureDate] if the date is after `today`,
/// - or [ValidationError::DateTooOld] if the date is before [EARLIEST_DATE].
pub fn validate_date(raw: &str, today: Date) -> Result<Date, ValidationError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::DateRequired);
    }

    let date = Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::DateInvalid)?;

    if date > today {
        return Err(ValidationError::FutureDate);
    }

    if date < EARLIEST_DATE {
        return Err(ValidationError::DateTooOld);
    }

    Ok(date)
}

/// Check an expense read back from storage against the same bounds as the
/// form.
///
/// Dates are not checked against today, since "today" depends on the
/// timezone the list was saved in.
///
/// # Errors
/// Returns the [ValidationError] of the first field that is out of bounds.
pub(crate) fn validate_stored(expense: &Expense) -> Result<(), ValidationError> {
    validate_title(expense.title.as_ref())?;

    if expense.amount <= Amount::ZERO {
        return Err(ValidationError::AmountInvalid);
    }

    if expense.amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge);
    }

    if expense.date < EARLIEST_DATE {
        return Err(ValidationError::DateTooOld);
    }

    Ok(())
}

/// Validate every field of the new expense form.
///
/// All fields are checked even if an earlier one fails, so that every
/// problem can be shown to the user at once.
///
/// # Errors
/// Returns [FormErrors] holding the error of each field that failed.
pub fn validate_form(
    title: &str,
    amount: &str,
    date: &str,
    today: Date,
) -> Result<ValidatedExpense, FormErrors> {
    let title = validate_title(title);
    let amount = validate_amount(amount);
    let date = validate_date(date, today);

    match (title, amount, date) {
        (Ok(title), Ok(amount), Ok(date)) => Ok(ValidatedExpense {
            title,
            amount,
            date,
        }),
        (title, amount, date) => Err(FormErrors {
            title: title.err(),
            amount: amount.err(),
            date: date.err(),
        }),
    }
}
