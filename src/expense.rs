//! Defines the core data model for expenses.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Date;
use uuid::Uuid;

use crate::validation::{ValidationError, validate_amount, validate_title};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Money spent on something, e.g. a coffee or the rent.
///
/// Expenses are only created by [crate::ExpenseStore::insert] from a
/// [crate::ValidatedExpense] and are never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// The opaque, unique ID of the expense.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub title: ExpenseTitle,
    /// How much money was spent.
    pub amount: Amount,
    /// When the money was spent.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// When the expense was recorded, in milliseconds since the Unix epoch.
    ///
    /// Strictly increases with each insert. Only the position in the store
    /// decides display order, not this field.
    pub timestamp: i64,
}

/// The unique identifier of an [Expense].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Create a new random ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing ID, e.g. one given by the user on the command line.
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for ExpenseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// A validated, trimmed expense title of at least two characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseTitle(String);

impl ExpenseTitle {
    /// Create a title without validation.
    ///
    /// The caller should ensure that the string is trimmed and at least two
    /// characters long. Violating this does not affect memory safety, it only
    /// lets an invalid title into the store.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_owned())
    }
}

impl AsRef<str> for ExpenseTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ExpenseTitle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_title(s)
    }
}

impl Display for ExpenseTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// An amount of money with cent precision.
///
/// Amounts are kept as a whole number of cents so that totals are exact. On
/// disk they are written as a plain decimal number of dollars, e.g. `12.5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount { cents: 0 };

    /// Create an amount from a whole number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Create an amount from a decimal number of dollars, rounding to the
    /// nearest cent.
    pub fn from_dollars(dollars: f64) -> Self {
        Self {
            cents: (dollars * 100.0).round() as i64,
        }
    }

    /// The amount as a whole number of cents.
    pub const fn cents(self) -> i64 {
        self.cents
    }

    /// The amount as a decimal number of dollars.
    pub fn as_dollars(self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_amount(s)
    }
}

/// Formats the amount with exactly two decimal places, e.g. `1234.50`.
impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let cents = self.cents.unsigned_abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

/// Saturates at the largest and smallest representable amounts.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::from_cents(self.cents.saturating_add(rhs.cents))
    }
}

/// Saturates at the largest and smallest representable amounts.
impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount::from_cents(self.cents.saturating_sub(rhs.cents))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_dollars())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;

        if !dollars.is_finite() {
            return Err(serde::de::Error::custom("amount must be a finite number"));
        }

        Ok(Amount::from_dollars(dollars))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{Amount, Expense, ExpenseId, ExpenseTitle};

    #[test]
    fn amount_displays_two_decimal_places() {
        let cases = [(0, "0.00"), (1, "0.01"), (1250, "12.50"), (100_000_000, "1000000.00")];

        for (cents, want) in cases {
            assert_eq!(Amount::from_cents(cents).to_string(), want);
        }
    }

    #[test]
    fn amount_rounds_dollars_to_nearest_cent() {
        assert_eq!(Amount::from_dollars(0.1 + 0.2), Amount::from_cents(30));
        assert_eq!(Amount::from_dollars(19.999), Amount::from_cents(2000));
    }

    #[test]
    fn amount_sum_is_exact() {
        let amounts = [Amount::from_cents(10), Amount::from_cents(20)];

        let total: Amount = amounts.iter().sum();

        assert_eq!(total, Amount::from_cents(30));
        assert_eq!(total.to_string(), "0.30");
    }

    #[test]
    fn amount_arithmetic_saturates() {
        let max = Amount::from_cents(i64::MAX);
        let min = Amount::from_cents(i64::MIN);

        assert_eq!(max + Amount::from_cents(1), max);
        assert_eq!([max, max].iter().sum::<Amount>(), max);
        assert_eq!(min - Amount::from_cents(1), min);
    }

    #[test]
    fn expense_serializes_to_slot_layout() {
        let expense = Expense {
            id: ExpenseId::new("_abc123"),
            title: ExpenseTitle::new_unchecked("Coffee"),
            amount: Amount::from_cents(450),
            date: date!(2024 - 03 - 05),
            timestamp: 1_709_600_000_000,
        };

        let json = serde_json::to_value(&expense).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "_abc123",
                "title": "Coffee",
                "amount": 4.5,
                "date": "2024-03-05",
                "timestamp": 1_709_600_000_000_i64,
            })
        );
    }

    #[test]
    fn expense_deserializes_from_slot_layout() {
        let json = r#"{"id":"_k2j4h5","title":"Rent","amount":1200,"date":"2023-12-01","timestamp":1701388800000}"#;

        let expense: Expense = serde_json::from_str(json).unwrap();

        assert_eq!(expense.id, ExpenseId::new("_k2j4h5"));
        assert_eq!(expense.title.as_ref(), "Rent");
        assert_eq!(expense.amount, Amount::from_cents(120_000));
        assert_eq!(expense.date, date!(2023 - 12 - 01));
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(ExpenseId::generate(), ExpenseId::generate());
    }
}
