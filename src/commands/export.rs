use crate::args::ExportArgs;
use crate::commands::Out;
use crate::export::{default_filename, delimited_lines};
use crate::query::{self, Query};
use crate::store::ExpenseStore;
use crate::{api, utils, Config, Mode, Result};
use std::path::PathBuf;

/// Writes the filtered expenses to a CSV file.
pub async fn export(config: Config, mode: Mode, args: &ExportArgs) -> Result<Out<()>> {
    let store = ExpenseStore::new(api::client(&config, mode)?);
    store.refresh().await?;

    // Exports cover the whole filtered set, not a single page.
    let query = Query {
        page: 1,
        page_size: usize::MAX,
        ..args.query().to_query()
    };
    let records = query::apply(&store.records(), &query).records;

    let mut contents = delimited_lines(&records, args.columns())
        .collect::<Vec<_>>()
        .join("\n");
    contents.push('\n');

    let path: PathBuf = match args.out() {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_filename()),
    };
    utils::write(&path, contents).await?;

    Ok(Out::new_message(format!(
        "Wrote {} expenses to '{}'",
        records.len(),
        path.display()
    )))
}
