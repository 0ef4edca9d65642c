//! These structs provide the CLI interface for the expenses CLI.

use crate::export::{Column, DEFAULT_COLUMNS};
use crate::model::{Amount, Category};
use crate::query::{Query, SortDirection, SortKey};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// expenses: a command-line client for a remote expense-tracking service.
///
/// The program fetches your expense records from the service, lets you
/// filter, sort and page through them locally, computes category and monthly
/// totals, creates, updates and deletes records, and exports CSV.
///
/// Run `expenses init --base-url <url>` once to point the program at your
/// service. Setting EXPENSES_IN_TEST_MODE to a non-empty value runs the
/// whole program against built-in sample data instead of a server.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. Decide where configuration
    /// should live and pass it as --expenses-home (default ~/.expenses),
    /// then provide the base URL of your expense service with --base-url.
    Init(InitArgs),
    /// Fetch expenses and show a filtered, sorted, paginated view.
    List(ListArgs),
    /// Fetch a single expense by id.
    Show(IdArgs),
    /// Create a new expense.
    Add(AddArgs),
    /// Update fields of an existing expense.
    Update(UpdateArgs),
    /// Delete an expense.
    Delete(IdArgs),
    /// Show totals, averages, category totals and the monthly trend.
    Stats(StatsArgs),
    /// Write the filtered expenses to a CSV file.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration is held. Defaults to ~/.expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_expenses_home())]
    expenses_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, expenses_home: PathBuf) -> Self {
        Self {
            log_level,
            expenses_home: expenses_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expenses_home(&self) -> &DisplayPath {
        &self.expenses_home
    }
}

/// Args for the `expenses init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the expense service, e.g. http://localhost:4000
    #[arg(long)]
    base_url: String,

    /// Per-call network timeout in milliseconds.
    #[arg(long, default_value_t = crate::config::DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
}

impl InitArgs {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}

/// Filter, sort and pagination flags shared by `list`, `stats` and `export`.
#[derive(Debug, Parser, Clone)]
pub struct QueryArgs {
    /// Case-insensitive substring matched against title or description.
    #[arg(long, default_value = "")]
    search: String,

    /// Only expenses in this category.
    #[arg(long, value_enum)]
    category: Option<Category>,

    /// Only expenses on or after this date (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Only expenses on or before this date (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Only expenses with at least this amount.
    #[arg(long)]
    min: Option<Decimal>,

    /// Only expenses with at most this amount.
    #[arg(long)]
    max: Option<Decimal>,

    /// The field to sort by.
    #[arg(long, value_enum, default_value_t = SortKey::Date)]
    sort: SortKey,

    /// Sort ascending or descending.
    #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
    direction: SortDirection,

    /// 1-indexed page number.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Records per page.
    #[arg(long, default_value_t = 25)]
    page_size: usize,
}

impl QueryArgs {
    pub fn to_query(&self) -> Query {
        Query {
            search: self.search.clone(),
            category: self.category,
            from: self.from,
            to: self.to,
            min: self.min,
            max: self.max,
            sort: self.sort,
            direction: self.direction,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// How `list` output should be rendered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// Args for the `expenses list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    #[clap(flatten)]
    query: QueryArgs,

    /// The output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

impl ListArgs {
    pub fn query(&self) -> &QueryArgs {
        &self.query
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }
}

/// Args for commands that take a single expense id (`show`, `delete`).
#[derive(Debug, Parser, Clone)]
pub struct IdArgs {
    /// The id of the expense.
    id: String,
}

impl IdArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `expenses add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// A short title for the expense.
    #[arg(long)]
    title: String,

    /// Optional free-text description.
    #[arg(long)]
    description: Option<String>,

    /// The amount, e.g. 12.50 or $1,200.00
    #[arg(long)]
    amount: Amount,

    /// The expense category.
    #[arg(long, value_enum, default_value_t = Category::Other)]
    category: Category,

    /// The date of the expense (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl AddArgs {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Args for the `expenses update` command.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    /// The id of the expense to update.
    id: String,

    /// A new title.
    #[arg(long)]
    title: Option<String>,

    /// A new description.
    #[arg(long)]
    description: Option<String>,

    /// A new amount.
    #[arg(long)]
    amount: Option<Amount>,

    /// A new category.
    #[arg(long, value_enum)]
    category: Option<Category>,

    /// A new date (YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl UpdateArgs {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Args for the `expenses stats` command.
#[derive(Debug, Parser, Clone)]
pub struct StatsArgs {
    #[clap(flatten)]
    query: QueryArgs,
}

impl StatsArgs {
    pub fn query(&self) -> &QueryArgs {
        &self.query
    }
}

/// Args for the `expenses export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    #[clap(flatten)]
    query: QueryArgs,

    /// The file to write. Defaults to expenses-<date>.csv in the current
    /// directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// The columns to include, in order.
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = DEFAULT_COLUMNS.to_vec())]
    columns: Vec<Column>,
}

impl ExportArgs {
    pub fn query(&self) -> &QueryArgs {
        &self.query
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

fn default_expenses_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join(".expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expenses-home or EXPENSES_HOME instead of relying on the \
                default. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from(".expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_args_map_onto_the_descriptor() {
        let args = QueryArgs::try_parse_from([
            "query",
            "--search",
            "coffee",
            "--category",
            "food",
            "--from",
            "2025-01-01",
            "--min",
            "5",
            "--sort",
            "amount",
            "--direction",
            "asc",
            "--page",
            "2",
            "--page-size",
            "10",
        ])
        .unwrap();
        let query = args.to_query();
        assert_eq!(query.search, "coffee");
        assert_eq!(query.category, Some(Category::Food));
        assert_eq!(query.from, "2025-01-01".parse().ok());
        assert_eq!(query.min, Some(Decimal::from(5)));
        assert_eq!(query.sort, SortKey::Amount);
        assert_eq!(query.direction, SortDirection::Asc);
        assert_eq!(query.page, 2);
        assert_eq!(query.page_size, 10);
    }

    #[test]
    fn add_args_parse_formatted_amounts() {
        let args = AddArgs::try_parse_from([
            "add",
            "--title",
            "Lunch",
            "--amount",
            "$12.50",
        ])
        .unwrap();
        assert_eq!(args.amount().to_string(), "$12.50");
        assert_eq!(args.category(), Category::Other);
    }
}
