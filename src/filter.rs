//! Month and year filtering of the expense list.
//!
//! Filters never modify or copy the store's expenses, they borrow them.

use std::collections::BTreeSet;

use time::Month;

use crate::{
    Error,
    expense::{Amount, Expense},
};

/// How many years, counting the current one, are always offered by
/// [available_years].
pub const RECENT_YEAR_COUNT: i32 = 6;

/// Selects expenses by the calendar month and/or year of their date.
///
/// The default filter selects every expense.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Keep only expenses in this month of any year.
    pub month: Option<Month>,
    /// Keep only expenses in this year.
    pub year: Option<i32>,
}

impl ExpenseFilter {
    /// Create a filter from the raw month and year selections, where an empty
    /// string means "any".
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidMonth] if `month` is not empty or a number from 1 to 12,
    /// - or [Error::InvalidYear] if `year` is not empty or a four digit year.
    pub fn from_selection(month: &str, year: &str) -> Result<Self, Error> {
        Ok(Self {
            month: parse_month(month)?,
            year: parse_year(year)?,
        })
    }

    /// Whether the filter excludes anything.
    pub fn is_active(&self) -> bool {
        self.month.is_some() || self.year.is_some()
    }

    /// Whether `expense` is selected by the filter.
    pub fn matches(&self, expense: &Expense) -> bool {
        let month_matches = self.month.is_none_or(|month| expense.date.month() == month);
        let year_matches = self.year.is_none_or(|year| expense.date.year() == year);

        month_matches && year_matches
    }
}

/// Parse a month selection such as `"03"`. An empty string means no month.
///
/// # Errors
/// Returns [Error::InvalidMonth] if `raw` is not a number from 1 to 12.
pub fn parse_month(raw: &str) -> Result<Option<Month>, Error> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Ok(None);
    }

    if !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(Error::InvalidMonth(raw.to_owned()));
    }

    raw.parse::<u8>()
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .map(Some)
        .ok_or_else(|| Error::InvalidMonth(raw.to_owned()))
}

/// Parse a four digit year selection such as `"2024"`. An empty string means
/// no year.
///
/// # Errors
/// Returns [Error::InvalidYear] if `raw` is not exactly four digits.
pub fn parse_year(raw: &str) -> Result<Option<i32>, Error> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Ok(None);
    }

    if raw.len() != 4 || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(Error::InvalidYear(raw.to_owned()));
    }

    raw.parse()
        .map(Some)
        .map_err(|_| Error::InvalidYear(raw.to_owned()))
}

/// The expenses selected by `filter`, in their original order.
pub fn apply<'a>(expenses: &'a [Expense], filter: &ExpenseFilter) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|expense| filter.matches(expense))
        .collect()
}

/// The years a user can filter by, newest first.
///
/// This is the current year, the five years before it and every year that
/// has an expense.
pub fn available_years(expenses: &[Expense], current_year: i32) -> Vec<i32> {
    let recent_years = (0..RECENT_YEAR_COUNT).map(|offset| current_year - offset);
    let expense_years = expenses.iter().map(|expense| expense.date.year());
    let years: BTreeSet<i32> = recent_years.chain(expense_years).collect();

    years.into_iter().rev().collect()
}

/// The sum of the amounts of `expenses`.
pub fn total<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Amount {
    expenses.into_iter().map(|expense| expense.amount).sum()
}

/// The part of the expense list a user is looking at.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseView<'a> {
    /// The selected expenses, newest first.
    pub expenses: Vec<&'a Expense>,
    /// The sum of the selected expenses.
    pub total: Amount,
    /// Whether a filter is hiding some expenses.
    pub filtered: bool,
}

impl<'a> ExpenseView<'a> {
    /// Select the expenses matching `filter` and total them.
    pub fn new(expenses: &'a [Expense], filter: &ExpenseFilter) -> Self {
        let expenses = apply(expenses, filter);
        let sum = total(expenses.iter().copied());

        Self {
            expenses,
            total: sum,
            filtered: filter.is_active(),
        }
    }

    /// Whether no expenses are selected.
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, Month, macros::date};

    use super::{ExpenseFilter, ExpenseView, apply, available_years, parse_month, parse_year, total};
    use crate::{
        Error,
        expense::{Amount, Expense, ExpenseId, ExpenseTitle},
    };

    fn expense(id: &str, cents: i64, date: Date) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            title: ExpenseTitle::new_unchecked(id),
            amount: Amount::from_cents(cents),
            date,
            timestamp: 0,
        }
    }

    fn expenses() -> Vec<Expense> {
        vec![
            expense("march-2024-late", 300, date!(2024 - 03 - 31)),
            expense("april-2024", 400, date!(2024 - 04 - 01)),
            expense("march-2023", 1_000, date!(2023 - 03 - 15)),
            expense("march-2024-early", 200, date!(2024 - 03 - 01)),
            expense("january-2019", 50, date!(2019 - 01 - 20)),
        ]
    }

    #[track_caller]
    fn assert_ids(got: &[&Expense], want: &[&str]) {
        let got: Vec<&str> = got.iter().map(|expense| expense.id.as_ref()).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn month_and_year_filter_keeps_order() {
        let expenses = expenses();
        let filter = ExpenseFilter::from_selection("03", "2024").unwrap();

        let got = apply(&expenses, &filter);

        assert_ids(&got, &["march-2024-late", "march-2024-early"]);
    }

    #[test]
    fn month_filter_matches_any_year() {
        let expenses = expenses();
        let filter = ExpenseFilter::from_selection("03", "").unwrap();

        let got = apply(&expenses, &filter);

        assert_ids(&got, &["march-2024-late", "march-2023", "march-2024-early"]);
    }

    #[test]
    fn year_filter_matches_any_month() {
        let expenses = expenses();
        let filter = ExpenseFilter::from_selection("", "2024").unwrap();

        let got = apply(&expenses, &filter);

        assert_ids(&got, &["march-2024-late", "april-2024", "march-2024-early"]);
    }

    #[test]
    fn no_filter_keeps_everything() {
        let expenses = expenses();
        let filter = ExpenseFilter::default();

        let got = apply(&expenses, &filter);

        assert_eq!(got.len(), expenses.len());
        assert!(!filter.is_active());
    }

    #[test]
    fn filter_without_matches_is_empty() {
        let expenses = expenses();
        let filter = ExpenseFilter {
            month: Some(Month::December),
            year: Some(2024),
        };

        assert!(apply(&expenses, &filter).is_empty());
    }

    #[test]
    fn parse_month_accepts_one_to_twelve() {
        assert_eq!(parse_month(""), Ok(None));
        assert_eq!(parse_month("01"), Ok(Some(Month::January)));
        assert_eq!(parse_month("3"), Ok(Some(Month::March)));
        assert_eq!(parse_month("12"), Ok(Some(Month::December)));
    }

    #[test]
    fn parse_month_rejects_everything_else() {
        for raw in ["0", "13", "00", "-1", "March", "+3"] {
            assert_eq!(
                parse_month(raw),
                Err(Error::InvalidMonth(raw.to_owned())),
                "want {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn parse_year_accepts_four_digits_only() {
        assert_eq!(parse_year(""), Ok(None));
        assert_eq!(parse_year("2024"), Ok(Some(2024)));

        for raw in ["24", "20245", "two", "+202"] {
            assert_eq!(
                parse_year(raw),
                Err(Error::InvalidYear(raw.to_owned())),
                "want {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn available_years_without_expenses() {
        assert_eq!(
            available_years(&[], 2026),
            vec![2026, 2025, 2024, 2023, 2022, 2021]
        );
    }

    #[test]
    fn available_years_include_expense_years_once() {
        let got = available_years(&expenses(), 2026);

        assert_eq!(got, vec![2026, 2025, 2024, 2023, 2022, 2021, 2019]);
    }

    #[test]
    fn total_of_filtered_expenses() {
        let expenses = expenses();
        let filter = ExpenseFilter::from_selection("03", "").unwrap();

        assert_eq!(total(apply(&expenses, &filter)), Amount::from_cents(1_500));
        assert_eq!(total(&expenses), Amount::from_cents(1_950));
        assert_eq!(total(Vec::<&Expense>::new()), Amount::ZERO);
    }

    #[test]
    fn view_reports_filtered_total() {
        let expenses = expenses();
        let filter = ExpenseFilter::from_selection("", "2024").unwrap();

        let view = ExpenseView::new(&expenses, &filter);

        assert_eq!(view.total, Amount::from_cents(900));
        assert!(view.filtered);
        assert!(!view.is_empty());
    }

    #[test]
    fn unfiltered_view_matches_everything() {
        let expenses = expenses();

        let view = ExpenseView::new(&expenses, &ExpenseFilter::default());

        assert_eq!(view.expenses.len(), expenses.len());
        assert_eq!(view.total, total(&expenses));
        assert!(!view.filtered);
    }
}
