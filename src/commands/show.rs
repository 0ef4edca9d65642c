use crate::args::IdArgs;
use crate::commands::Out;
use crate::model::ExpenseRecord;
use crate::store::ExpenseStore;
use crate::{api, Config, Mode, Result};

/// Fetches a single expense by id straight from the service.
pub async fn show(config: Config, mode: Mode, args: &IdArgs) -> Result<Out<ExpenseRecord>> {
    let store = ExpenseStore::new(api::client(&config, mode)?);
    let record = store.fetch(args.id()).await?;
    let date = record
        .occurred_at()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "(no date)".to_string());
    let message = format!(
        "{}: {} on {} ({})\n{}",
        record.title(),
        record.amount(),
        date,
        record.category().label(),
        record.description(),
    );
    Ok(Out::new(message.trim_end().to_string(), record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn show_fetches_a_seeded_record() {
        let env = TestEnv::new().await;
        let target = env.any_seeded_id().await;
        let out = show(env.config(), Mode::Test, &IdArgs::new(&target))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().id(), target);
    }
}
