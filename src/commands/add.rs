use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::{ExpenseDraft, ExpenseRecord};
use crate::store::ExpenseStore;
use crate::{api, Config, Mode, Result};
use chrono::Local;

/// Creates a new expense. Validation happens locally before anything is
/// sent to the service.
pub async fn add(config: Config, mode: Mode, args: &AddArgs) -> Result<Out<ExpenseRecord>> {
    let draft = ExpenseDraft {
        title: args.title().to_string(),
        description: args.description().map(str::to_string),
        amount: args.amount(),
        category: args.category(),
        occurred_at: Some(args.date().unwrap_or_else(|| Local::now().date_naive())),
    };
    let store = ExpenseStore::new(api::client(&config, mode)?);
    let record = store.add(&draft).await?;
    Ok(Out::new(
        format!("Created expense '{}' ({})", record.title(), record.id()),
        record,
    ))
}
