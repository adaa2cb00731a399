use std::{
    error::Error,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::exit,
};

use clap::{Parser, Subcommand, ValueEnum};
use time::Date;
use tracing_subscriber::filter::LevelFilter;

use expense_tracker::{
    ExpenseFilter, ExpenseId, ExpenseStorage, ExpenseStore, ExpenseView, JsonFileStorage,
    SqliteStorage, StorageError, available_years, format_currency, format_long_date,
    render_expense_list, render_form_errors, resolve_local_offset, setup_logging, today,
    validate_form,
};

type Store = ExpenseStore<Box<dyn ExpenseStorage>>;

/// Keep track of what you spend.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the expense data.
    #[arg(long, env = "EXPENSES_DATA_PATH", default_value = "expenses.json")]
    data_path: PathBuf,

    /// How the expense data is stored.
    #[arg(long, value_enum, default_value_t = Backend::Json)]
    backend: Backend,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    /// Defaults to the system timezone.
    #[arg(long, env = "EXPENSES_TIMEZONE")]
    timezone: Option<String>,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    /// A JSON file.
    Json,
    /// A SQLite database.
    Sqlite,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new expense.
    Add {
        /// What the money was spent on.
        #[arg(long)]
        title: String,

        /// How much was spent, e.g. 12.50.
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// When it was spent as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },

    /// List expenses, newest first.
    List {
        /// Only show expenses from this month (01-12).
        #[arg(long, default_value = "")]
        month: String,

        /// Only show expenses from this year, e.g. 2024.
        #[arg(long, default_value = "")]
        year: String,
    },

    /// Delete an expense.
    Delete {
        /// The ID shown by `list`.
        id: String,

        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },

    /// List the years that `list --year` is usually used with.
    Years,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    });

    let local_offset = resolve_local_offset(args.timezone.as_deref())?;
    let today = today(local_offset);

    let mut store = open_store(args.backend, &args.data_path)?;

    match args.command {
        Command::Add {
            title,
            amount,
            date,
        } => add_expense(&mut store, &title, &amount, date.as_deref(), today),
        Command::List { month, year } => list_expenses(&store, &month, &year),
        Command::Delete { id, yes } => delete_expense(&mut store, &id, yes),
        Command::Years => {
            for year in available_years(store.all(), today.year()) {
                println!("{year}");
            }
            Ok(())
        }
    }
}

fn open_store(backend: Backend, data_path: &Path) -> Result<Store, expense_tracker::Error> {
    let storage: Box<dyn ExpenseStorage> = match backend {
        Backend::Json => Box::new(JsonFileStorage::new(data_path)),
        Backend::Sqlite => Box::new(SqliteStorage::open(data_path)?),
    };
    tracing::debug!("Using {backend:?} storage at {data_path:#?}");

    Ok(ExpenseStore::open(storage))
}

fn add_expense(
    store: &mut Store,
    title: &str,
    amount: &str,
    date: Option<&str>,
    today: Date,
) -> Result<(), Box<dyn Error>> {
    let date = date.map_or_else(|| today.to_string(), str::to_owned);

    let expense = match validate_form(title, amount, &date, today) {
        Ok(expense) => expense,
        Err(errors) => {
            print_error(render_form_errors(&errors));
            exit(1);
        }
    };

    let inserted = store.insert(expense);
    report_save_failure(inserted.saved);

    let expense = inserted.value;
    println!(
        "Added {} for {} on {}",
        expense.title,
        format_currency(expense.amount),
        format_long_date(expense.date)?
    );
    println!("ID: {}", expense.id);

    Ok(())
}

fn list_expenses(store: &Store, month: &str, year: &str) -> Result<(), Box<dyn Error>> {
    let filter = ExpenseFilter::from_selection(month, year)?;
    let view = ExpenseView::new(store.all(), &filter);

    println!("{}", render_expense_list(&view)?);

    Ok(())
}

fn delete_expense(store: &mut Store, id: &str, confirmed: bool) -> Result<(), Box<dyn Error>> {
    let id = ExpenseId::new(id);

    let Some(expense) = store.get(&id) else {
        print_error(format!("No expense has the ID {id}"));
        exit(1);
    };
    println!(
        "{} for {} on {}",
        expense.title,
        format_currency(expense.amount),
        format_long_date(expense.date)?
    );

    if !confirmed && !confirm("Are you sure you want to delete this expense?")? {
        println!("Nothing was deleted.");
        return Ok(());
    }

    let deleted = store.delete_by_id(&id);
    report_save_failure(deleted.saved);

    if deleted.value {
        println!("Deleted expense {id}");
    }

    Ok(())
}

fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn report_save_failure(saved: Result<(), StorageError>) {
    if saved.is_err() {
        print_error("Failed to save expense. Storage may be full.");
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string())
}
