use crate::args::UpdateArgs;
use crate::commands::Out;
use crate::model::{ExpensePatch, ExpenseRecord};
use crate::store::ExpenseStore;
use crate::{api, Config, Error, Mode, Result};

/// Applies a partial update. Only the fields given on the command line are
/// sent; everything else keeps its current value.
pub async fn update(config: Config, mode: Mode, args: &UpdateArgs) -> Result<Out<ExpenseRecord>> {
    let patch = ExpensePatch {
        title: args.title().map(str::to_string),
        description: args.description().map(str::to_string),
        amount: args.amount(),
        category: args.category(),
        occurred_at: args.date(),
    };
    if patch.is_empty() {
        return Err(Error::Validation(
            "at least one field to update is required".to_string(),
        ));
    }

    let store = ExpenseStore::new(api::client(&config, mode)?);
    // Populate the cache first so the response merges into the prior copy.
    store.refresh().await?;
    let record = store.modify(args.id(), &patch).await?;
    Ok(Out::new(
        format!("Updated expense '{}' ({})", record.title(), record.id()),
        record,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use clap::Parser;

    #[tokio::test]
    async fn update_merges_into_the_existing_record() {
        let env = TestEnv::new().await;
        let target = env.any_seeded_id().await;
        let args =
            UpdateArgs::try_parse_from(["update", &target, "--amount", "99.99"]).unwrap();
        let out = update(env.config(), Mode::Test, &args).await.unwrap();
        let record = out.structure().unwrap();
        assert_eq!(record.id(), target);
        assert_eq!(record.amount().to_string(), "$99.99");
        assert!(!record.title().is_empty());
    }

    #[tokio::test]
    async fn update_requires_at_least_one_field() {
        let env = TestEnv::new().await;
        let args = UpdateArgs::try_parse_from(["update", "some-id"]).unwrap();
        let err = update(env.config(), Mode::Test, &args).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
