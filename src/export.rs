//! Delimited-text export of expense records.
//!
//! Formatting only; writing the result to a file is the command layer's job.
//! Quoting is minimal on purpose: a field containing a comma is wrapped in
//! double quotes, and embedded quotes are not escaped. That limitation is
//! carried over from the original export format rather than silently fixed.

use crate::model::ExpenseRecord;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// The columns that can appear in an export, in the order given.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Id,
    Title,
    Description,
    Amount,
    Category,
    Date,
}

serde_plain::derive_display_from_serialize!(Column);
serde_plain::derive_fromstr_from_deserialize!(Column);

/// The default column set, matching the list view.
pub const DEFAULT_COLUMNS: &[Column] = &[
    Column::Date,
    Column::Title,
    Column::Category,
    Column::Amount,
    Column::Description,
];

impl Column {
    /// The header cell for this column.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Title => "Title",
            Column::Description => "Description",
            Column::Amount => "Amount",
            Column::Category => "Category",
            Column::Date => "Date",
        }
    }

    fn value(&self, record: &ExpenseRecord) -> String {
        match self {
            Column::Id => record.id().to_string(),
            Column::Title => record.title().to_string(),
            Column::Description => record.description().to_string(),
            Column::Amount => record.amount().value().to_string(),
            Column::Category => record.category().to_string(),
            Column::Date => record
                .occurred_at()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Produces the export lazily: a header row of column names, then one
/// comma-joined row per record.
pub fn delimited_lines<'a>(
    records: &'a [ExpenseRecord],
    columns: &'a [Column],
) -> impl Iterator<Item = String> + 'a {
    let header = columns
        .iter()
        .map(|c| c.header().to_string())
        .collect::<Vec<_>>()
        .join(",");
    std::iter::once(header).chain(records.iter().map(move |record| {
        columns
            .iter()
            .map(|c| quote_if_needed(c.value(record)))
            .collect::<Vec<_>>()
            .join(",")
    }))
}

fn quote_if_needed(value: String) -> String {
    if value.contains(',') {
        format!("\"{value}\"")
    } else {
        value
    }
}

/// The default export filename, `expenses-<ISO-date>.csv`.
pub fn default_filename() -> String {
    format!("expenses-{}.csv", Local::now().format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category};
    use std::str::FromStr;

    fn record(title: &str) -> ExpenseRecord {
        ExpenseRecord::new(
            "e1",
            title,
            "desc",
            Amount::from_str("12.5").unwrap(),
            Category::Food,
            "2025-08-30".parse().ok(),
        )
    }

    #[test]
    fn header_row_lists_columns_in_the_given_order() {
        let columns = [Column::Amount, Column::Title];
        let lines: Vec<String> = delimited_lines(&[], &columns).collect();
        assert_eq!(lines, vec!["Amount,Title".to_string()]);
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let records = [record("Dinner, drinks and a movie")];
        let lines: Vec<String> =
            delimited_lines(&records, &[Column::Title, Column::Amount]).collect();
        assert_eq!(lines[1], "\"Dinner, drinks and a movie\",12.5");
    }

    #[test]
    fn default_columns_render_a_full_row() {
        let records = [record("Dinner")];
        let lines: Vec<String> = delimited_lines(&records, DEFAULT_COLUMNS).collect();
        assert_eq!(lines[0], "Date,Title,Category,Amount,Description");
        assert_eq!(lines[1], "2025-08-30,Dinner,food,12.5,desc");
    }

    #[test]
    fn default_filename_has_the_iso_date_pattern() {
        let name = default_filename();
        assert!(name.starts_with("expenses-"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "expenses-2025-08-30.csv".len());
    }
}
