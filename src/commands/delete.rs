use crate::args::IdArgs;
use crate::commands::Out;
use crate::store::ExpenseStore;
use crate::{api, Config, Mode, Result};

/// Deletes an expense by id.
pub async fn delete(config: Config, mode: Mode, args: &IdArgs) -> Result<Out<()>> {
    let store = ExpenseStore::new(api::client(&config, mode)?);
    store.remove(args.id()).await?;
    Ok(Out::new_message(format!("Deleted expense {}", args.id())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use crate::Error;

    #[tokio::test]
    async fn delete_reports_success_for_a_seeded_record() {
        let env = TestEnv::new().await;
        let target = env.any_seeded_id().await;
        let out = delete(env.config(), Mode::Test, &IdArgs::new(&target))
            .await
            .unwrap();
        assert!(out.message().contains(&target));
    }

    #[tokio::test]
    async fn delete_surfaces_not_found() {
        let env = TestEnv::new().await;
        let err = delete(env.config(), Mode::Test, &IdArgs::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Request { status: 404, .. }));
    }
}
