//! The `list` command: fetch, derive a view, render.

use crate::args::{ListArgs, OutputFormat};
use crate::commands::Out;
use crate::export::{delimited_lines, DEFAULT_COLUMNS};
use crate::query::{self, Page};
use crate::store::ExpenseStore;
use crate::{api, Config, Mode, Result};

pub async fn list(config: Config, mode: Mode, args: &ListArgs) -> Result<Out<Page>> {
    let store = ExpenseStore::new(api::client(&config, mode)?);
    store.refresh().await?;

    let query = args.query().to_query();
    let page = query::apply(&store.records(), &query);

    let rendered = match args.output() {
        OutputFormat::Table => render_table(&page),
        OutputFormat::Json => serde_json::to_string_pretty(&page.records)?,
        OutputFormat::Csv => delimited_lines(&page.records, DEFAULT_COLUMNS)
            .collect::<Vec<_>>()
            .join("\n"),
    };
    let message = format!(
        "{rendered}\nShowing {} of {} matching expenses (page {})",
        page.records.len(),
        page.total,
        page.page,
    );
    Ok(Out::new(message, page))
}

/// Renders records as a markdown table with padded columns.
fn render_table(page: &Page) -> String {
    let mut rows: Vec<[String; 5]> = vec![[
        "ID".to_string(),
        "Date".to_string(),
        "Title".to_string(),
        "Category".to_string(),
        "Amount".to_string(),
    ]];
    for record in &page.records {
        rows.push([
            record.id().to_string(),
            record
                .occurred_at()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            record.title().to_string(),
            record.category().label().to_string(),
            record.amount().to_string(),
        ]);
    }

    let mut widths = [0usize; 5];
    for row in &rows {
        for (ix, cell) in row.iter().enumerate() {
            widths[ix] = widths[ix].max(cell.len());
        }
    }

    let mut out = String::new();
    for (row_ix, row) in rows.iter().enumerate() {
        out.push('|');
        for (ix, cell) in row.iter().enumerate() {
            out.push_str(&format!(" {cell:<width$} |", width = widths[ix]));
        }
        out.push('\n');
        if row_ix == 0 {
            out.push('|');
            for width in widths {
                out.push_str(&format!("{}|", "-".repeat(width + 2)));
            }
            out.push('\n');
        }
    }
    out
}
