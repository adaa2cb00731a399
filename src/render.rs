//! Plain text views of the expense list and of rejected forms.
//!
//! Front ends print these as they are, so everything a user reads about
//! their expenses is produced (and tested) here.

use crate::{
    Error,
    display::{format_currency, format_long_date},
    expense::Expense,
    filter::ExpenseView,
    validation::FormErrors,
};

/// Shown in place of the list when there is nothing to show.
pub const EMPTY_LIST_MESSAGE: &str = "No expenses found";

/// Shown under [EMPTY_LIST_MESSAGE] when a filter may be hiding expenses.
pub const FILTERED_EMPTY_HINT: &str = "Try adjusting your filters or add a new expense";

/// Shown under [EMPTY_LIST_MESSAGE] when no expenses have been added yet.
pub const UNFILTERED_EMPTY_HINT: &str = "Start by adding your first expense";

/// One expense as a row of aligned columns: title, amount, date and ID.
///
/// # Errors
/// Returns [Error::DateFormat] if the date cannot be formatted.
pub fn render_expense_line(expense: &Expense) -> Result<String, Error> {
    Ok(format!(
        "{:<32} {:>14}  {:<18}  {}",
        expense.title,
        format_currency(expense.amount),
        format_long_date(expense.date)?,
        expense.id
    ))
}

/// The expense rows, or the empty state, followed by the total.
///
/// The total is marked `(filtered)` when a filter is active.
///
/// # Errors
/// Returns [Error::DateFormat] if a date cannot be formatted.
pub fn render_expense_list(view: &ExpenseView) -> Result<String, Error> {
    let mut lines = Vec::with_capacity(view.expenses.len() + 2);

    if view.is_empty() {
        lines.push(EMPTY_LIST_MESSAGE.to_owned());
        lines.push(if view.filtered {
            FILTERED_EMPTY_HINT.to_owned()
        } else {
            UNFILTERED_EMPTY_HINT.to_owned()
        });
    }

    for expense in &view.expenses {
        lines.push(render_expense_line(expense)?);
    }

    let total = format_currency(view.total);
    lines.push(if view.filtered {
        format!("Total: {total} (filtered)")
    } else {
        format!("Total: {total}")
    });

    Ok(lines.join("\n"))
}

/// One `Field: message` line per rejected field, in form order.
pub fn render_form_errors(errors: &FormErrors) -> String {
    errors
        .iter()
        .map(|(field, error)| format!("{field}: {error}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{render_expense_line, render_expense_list, render_form_errors};
    use crate::{
        expense::{Amount, Expense, ExpenseId, ExpenseTitle},
        filter::{ExpenseFilter, ExpenseView},
        validation::validate_form,
    };

    fn get_test_expenses() -> Vec<Expense> {
        vec![
            Expense {
                id: ExpenseId::new("lunch"),
                title: ExpenseTitle::new_unchecked("Lunch"),
                amount: Amount::from_cents(1_225),
                date: date!(2024 - 03 - 05),
                timestamp: 2,
            },
            Expense {
                id: ExpenseId::new("rent"),
                title: ExpenseTitle::new_unchecked("Rent"),
                amount: Amount::from_cents(120_000),
                date: date!(2023 - 12 - 01),
                timestamp: 1,
            },
        ]
    }

    fn no_filter() -> ExpenseFilter {
        ExpenseFilter::from_selection("", "").unwrap()
    }

    #[test]
    fn expense_line_has_aligned_columns() {
        let expenses = get_test_expenses();

        let line = render_expense_line(&expenses[0]).unwrap();

        assert_eq!(
            line,
            format!("{:<32} {:>14}  {:<18}  lunch", "Lunch", "$12.25", "March 5, 2024")
        );
    }

    #[test]
    fn empty_list_suggests_adding_an_expense() {
        let view = ExpenseView::new(&[], &no_filter());

        assert_eq!(
            render_expense_list(&view).unwrap(),
            "No expenses found\nStart by adding your first expense\nTotal: $0.00"
        );
    }

    #[test]
    fn empty_filtered_list_suggests_adjusting_filters() {
        let expenses = get_test_expenses();
        let filter = ExpenseFilter::from_selection("07", "2024").unwrap();
        let view = ExpenseView::new(&expenses, &filter);

        assert_eq!(
            render_expense_list(&view).unwrap(),
            "No expenses found\nTry adjusting your filters or add a new expense\n\
             Total: $0.00 (filtered)"
        );
    }

    #[test]
    fn unfiltered_list_shows_every_expense_and_total() {
        let expenses = get_test_expenses();
        let view = ExpenseView::new(&expenses, &no_filter());

        let rendered = render_expense_list(&view).unwrap();

        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Lunch"));
        assert!(lines[1].starts_with("Rent"));
        assert_eq!(lines[2], "Total: $1212.25");
    }

    #[test]
    fn filtered_list_marks_total_as_filtered() {
        let expenses = get_test_expenses();
        let filter = ExpenseFilter::from_selection("", "2024").unwrap();
        let view = ExpenseView::new(&expenses, &filter);

        let rendered = render_expense_list(&view).unwrap();

        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Lunch"));
        assert_eq!(lines[1], "Total: $12.25 (filtered)");
    }

    #[test]
    fn form_errors_are_listed_in_form_order() {
        let errors = validate_form("", "abc", "2024-06-16", date!(2024 - 06 - 15)).unwrap_err();

        assert_eq!(
            render_form_errors(&errors),
            "Title: Title is required\n\
             Amount: Amount must be greater than 0\n\
             Date: Date cannot be in the future"
        );
    }

    #[test]
    fn form_errors_skip_valid_fields() {
        let errors = validate_form("Coffee", "", "2024-06-01", date!(2024 - 06 - 15)).unwrap_err();

        assert_eq!(render_form_errors(&errors), "Amount: Amount is required");
    }
}
