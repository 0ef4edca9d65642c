//! The `stats` command: totals, averages, category totals and the monthly
//! trend over the filtered set.

use crate::args::StatsArgs;
use crate::commands::Out;
use crate::model::{Amount, Category};
use crate::query::{self, Query};
use crate::store::ExpenseStore;
use crate::{api, Config, Mode, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// The aggregate report over one filtered set of expenses.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub count: usize,
    pub total: Decimal,
    pub average: Decimal,
    pub by_category: BTreeMap<Category, Decimal>,
    pub by_month: BTreeMap<String, Decimal>,
}

pub async fn stats(config: Config, mode: Mode, args: &StatsArgs) -> Result<Out<StatsReport>> {
    let store = ExpenseStore::new(api::client(&config, mode)?);
    store.refresh().await?;

    // Aggregations run over the whole filtered set, not a single page.
    let query = Query {
        page: 1,
        page_size: usize::MAX,
        ..args.query().to_query()
    };
    let records = query::apply(&store.records(), &query).records;

    let report = StatsReport {
        count: records.len(),
        total: query::total_amount(&records),
        average: query::average(&records).round_dp(2),
        by_category: query::category_totals(&records),
        by_month: query::monthly_totals(&records),
    };
    Ok(Out::new(render(&report), report))
}

fn render(report: &StatsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Expenses: {}", report.count);
    let _ = writeln!(out, "Total:    {}", Amount::new(report.total));
    let _ = writeln!(out, "Average:  {}", Amount::new(report.average));
    if !report.by_category.is_empty() {
        let _ = writeln!(out, "\nBy category:");
        for (category, total) in &report.by_category {
            let _ = writeln!(out, "  {:<18} {}", category.label(), Amount::new(*total));
        }
    }
    if !report.by_month.is_empty() {
        let _ = writeln!(out, "\nBy month:");
        for (month, total) in &report.by_month {
            let _ = writeln!(out, "  {month}  {}", Amount::new(*total));
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use clap::Parser;

    #[tokio::test]
    async fn stats_aggregate_the_whole_filtered_set() {
        let env = TestEnv::new().await;
        let args = StatsArgs::try_parse_from(["stats", "--page-size", "2"]).unwrap();
        let out = stats(env.config(), Mode::Test, &args).await.unwrap();
        let report = out.structure().unwrap();
        // The tiny page size must not truncate the aggregation input.
        assert!(report.count > 2);
        assert_eq!(
            report.total,
            report.by_category.values().copied().sum::<Decimal>()
        );
        assert!(out.message().contains("By category:"));
    }

    #[tokio::test]
    async fn stats_respect_filters() {
        let env = TestEnv::new().await;
        let all = stats(
            env.config(),
            Mode::Test,
            &StatsArgs::try_parse_from(["stats"]).unwrap(),
        )
        .await
        .unwrap();
        let food = stats(
            env.config(),
            Mode::Test,
            &StatsArgs::try_parse_from(["stats", "--category", "food"]).unwrap(),
        )
        .await
        .unwrap();
        let all_report = all.structure().unwrap();
        let food_report = food.structure().unwrap();
        assert!(food_report.count < all_report.count);
        assert_eq!(food_report.by_category.len(), 1);
    }
}
