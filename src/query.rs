//! The query engine: pure functions that filter, sort, paginate and
//! aggregate a collection of expense records.
//!
//! Nothing in this module mutates the collection store or performs IO, and
//! nothing here returns an error: out-of-range input degrades to an empty
//! result.

use crate::model::{Category, ExpenseRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The field a derived view is ordered by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Title,
    Category,
}

serde_plain::derive_display_from_serialize!(SortKey);
serde_plain::derive_fromstr_from_deserialize!(SortKey);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

serde_plain::derive_display_from_serialize!(SortDirection);
serde_plain::derive_fromstr_from_deserialize!(SortDirection);

/// The full set of filter, sort and pagination parameters for one derived
/// view. All filters are conjunctive; inactive filters match everything.
#[derive(Debug, Clone, Serialize)]
pub struct Query {
    /// Case-insensitive substring match against title or description.
    pub search: String,
    pub category: Option<Category>,
    /// Inclusive date bounds; either may be open.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Inclusive amount bounds; either may be open.
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub sort: SortKey,
    pub direction: SortDirection,
    /// 1-indexed page number.
    pub page: usize,
    pub page_size: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            from: None,
            to: None,
            min: None,
            max: None,
            sort: SortKey::default(),
            direction: SortDirection::default(),
            page: 1,
            page_size: 25,
        }
    }
}

impl Query {
    /// True when the record satisfies every active filter.
    pub fn matches(&self, record: &ExpenseRecord) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let in_title = record.title().to_lowercase().contains(&needle);
            let in_description = record.description().to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }
        if let Some(category) = self.category {
            if record.category() != category {
                return false;
            }
        }
        if self.from.is_some() || self.to.is_some() {
            // A record with no usable date cannot satisfy a date bound.
            let Some(date) = record.occurred_at() else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) {
                return false;
            }
            if self.to.is_some_and(|to| date > to) {
                return false;
            }
        }
        let amount = record.amount().value();
        if self.min.is_some_and(|min| amount < min) {
            return false;
        }
        if self.max.is_some_and(|max| amount > max) {
            return false;
        }
        true
    }
}

/// One page of a derived view.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub records: Vec<ExpenseRecord>,
    /// Total matching records before pagination.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Derives a filtered, sorted, paginated view. Pure: the same collection and
/// query always produce the same page, and the input is never mutated.
pub fn apply(records: &[ExpenseRecord], query: &Query) -> Page {
    let mut matched: Vec<ExpenseRecord> = records
        .iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect();
    // Vec::sort_by is stable, so ties keep their cache order.
    matched.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort);
        match query.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let total = matched.len();
    let page = query.page.max(1);
    let page_size = query.page_size.max(1);
    let start = (page - 1).saturating_mul(page_size);
    let records = if start >= total {
        Vec::new()
    } else {
        matched[start..start.saturating_add(page_size).min(total)].to_vec()
    };
    Page {
        records,
        total,
        page,
        page_size,
    }
}

/// Date sorts missing dates earliest; title and category compare the
/// normalized display values, case-sensitively.
fn compare(a: &ExpenseRecord, b: &ExpenseRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.occurred_at().cmp(&b.occurred_at()),
        SortKey::Amount => a.amount().cmp(&b.amount()),
        SortKey::Title => a.title().cmp(b.title()),
        SortKey::Category => a.category().to_string().cmp(&b.category().to_string()),
    }
}

/// Sum of amounts. Missing or invalid amounts were already coerced to zero
/// at normalization, so the sum is always defined.
pub fn total_amount(records: &[ExpenseRecord]) -> Decimal {
    records.iter().map(|r| r.amount().value()).sum()
}

/// Summed amount per category. Only categories present in the input appear
/// as keys; absent categories are not zero-filled.
pub fn category_totals(records: &[ExpenseRecord]) -> BTreeMap<Category, Decimal> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.category()).or_insert(Decimal::ZERO) += record.amount().value();
    }
    totals
}

/// Summed amount per `YYYY-MM` month. Records with no usable date are
/// skipped. BTreeMap iteration is lexicographic, which is chronological for
/// `YYYY-MM` keys.
pub fn monthly_totals(records: &[ExpenseRecord]) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for record in records {
        if let Some(month) = record.month_key() {
            *totals.entry(month).or_insert(Decimal::ZERO) += record.amount().value();
        }
    }
    totals
}

/// Mean amount, defined as zero for an empty slice.
pub fn average(records: &[ExpenseRecord]) -> Decimal {
    if records.is_empty() {
        return Decimal::ZERO;
    }
    total_amount(records) / Decimal::from(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use std::str::FromStr;

    fn rec(id: &str, title: &str, amount: &str, category: Category, date: &str) -> ExpenseRecord {
        ExpenseRecord::new(
            id,
            title,
            format!("{title} description"),
            Amount::from_str(amount).unwrap(),
            category,
            date.parse().ok(),
        )
    }

    fn sample() -> Vec<ExpenseRecord> {
        vec![
            rec("1", "Groceries", "87.43", Category::Food, "2025-08-28"),
            rec("2", "Transit pass", "64.00", Category::Transport, "2025-08-27"),
            rec("3", "Electric bill", "142.67", Category::Housing, "2025-08-25"),
            rec("4", "Running shoes", "96.50", Category::Shopping, "2025-08-22"),
            rec("5", "Dentist", "120.00", Category::Health, "2025-07-18"),
            rec("6", "Coffee beans", "18.75", Category::Food, "2025-07-12"),
        ]
    }

    #[test]
    fn apply_is_pure() {
        let records = sample();
        let query = Query {
            search: "e".to_string(),
            sort: SortKey::Amount,
            ..Default::default()
        };
        let first = apply(&records, &query);
        let second = apply(&records, &query);
        assert_eq!(first.records, second.records);
        assert_eq!(first.total, second.total);
    }

    #[test]
    fn filters_are_conjunctive_and_non_increasing() {
        let records = sample();
        let loose = Query {
            category: Some(Category::Food),
            ..Default::default()
        };
        let tight = Query {
            category: Some(Category::Food),
            min: Some(Decimal::from(50)),
            ..Default::default()
        };
        let loose_page = apply(&records, &loose);
        let tight_page = apply(&records, &tight);
        assert!(tight_page.total <= loose_page.total);
        assert_eq!(tight_page.total, 1);
        assert_eq!(tight_page.records[0].id(), "1");
        for record in &tight_page.records {
            assert_eq!(record.category(), Category::Food);
            assert!(record.amount().value() >= Decimal::from(50));
        }
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let records = sample();
        let by_title = apply(
            &records,
            &Query {
                search: "GROCER".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(by_title.total, 1);

        let by_description = apply(
            &records,
            &Query {
                search: "dentist descr".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(by_description.total, 1);
    }

    #[test]
    fn date_bounds_are_inclusive_and_exclude_undated_records() {
        let mut records = sample();
        records.push(ExpenseRecord::new(
            "7",
            "No date",
            "",
            Amount::from_str("5").unwrap(),
            Category::Other,
            None,
        ));
        let query = Query {
            from: "2025-08-22".parse().ok(),
            to: "2025-08-28".parse().ok(),
            ..Default::default()
        };
        let page = apply(&records, &query);
        let ids: Vec<&str> = page.records.iter().map(|r| r.id()).collect();
        assert_eq!(page.total, 4);
        assert!(!ids.contains(&"7"));
        assert!(ids.contains(&"4")); // on the lower bound
        assert!(ids.contains(&"1")); // on the upper bound
    }

    #[test]
    fn pagination_slices_and_degrades_to_empty() {
        let records: Vec<ExpenseRecord> = (0..25)
            .map(|ix| rec(&ix.to_string(), &format!("Item {ix}"), "1", Category::Other, "2025-01-01"))
            .collect();
        let base = Query {
            page_size: 10,
            ..Default::default()
        };

        let all = apply(&records, &Query { page_size: 25, ..base.clone() });
        let first = apply(&records, &Query { page: 1, ..base.clone() });
        let third = apply(&records, &Query { page: 3, ..base.clone() });
        let fourth = apply(&records, &Query { page: 4, ..base });

        assert_eq!(first.records.len(), 10);
        assert_eq!(first.records[..], all.records[..10]);
        assert_eq!(third.records.len(), 5);
        assert_eq!(fourth.records.len(), 0);
        assert_eq!(fourth.total, 25);
    }

    #[test]
    fn reversing_the_direction_reverses_distinct_amounts() {
        let records = sample();
        let asc = apply(
            &records,
            &Query {
                sort: SortKey::Amount,
                direction: SortDirection::Asc,
                ..Default::default()
            },
        );
        let desc = apply(
            &records,
            &Query {
                sort: SortKey::Amount,
                direction: SortDirection::Desc,
                ..Default::default()
            },
        );
        let mut reversed = asc.records.clone();
        reversed.reverse();
        assert_eq!(reversed, desc.records);
    }

    #[test]
    fn undated_records_sort_earliest_under_the_date_key() {
        let records = vec![
            rec("1", "Dated", "1", Category::Other, "2025-01-01"),
            ExpenseRecord::new("2", "Undated", "", Amount::ZERO, Category::Other, None),
        ];
        let asc = apply(
            &records,
            &Query {
                sort: SortKey::Date,
                direction: SortDirection::Asc,
                ..Default::default()
            },
        );
        assert_eq!(asc.records[0].id(), "2");
    }

    #[test]
    fn aggregations_over_empty_input() {
        assert_eq!(total_amount(&[]), Decimal::ZERO);
        assert_eq!(average(&[]), Decimal::ZERO);
        assert!(category_totals(&[]).is_empty());
        assert!(monthly_totals(&[]).is_empty());
    }

    #[test]
    fn aggregation_worked_example() {
        let records = vec![
            rec("1", "a", "10", Category::Food, "2025-01-05"),
            rec("2", "b", "5", Category::Food, "2025-01-20"),
            rec("3", "c", "20", Category::Other, "2025-02-01"),
        ];
        assert_eq!(total_amount(&records), Decimal::from(35));

        let by_category = category_totals(&records);
        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category[&Category::Food], Decimal::from(15));
        assert_eq!(by_category[&Category::Other], Decimal::from(20));

        let expected = Decimal::from(35) / Decimal::from(3);
        assert_eq!(average(&records), expected);
    }

    #[test]
    fn monthly_totals_group_chronologically_and_skip_undated() {
        let mut records = vec![
            rec("1", "a", "10", Category::Food, "2025-02-05"),
            rec("2", "b", "5", Category::Food, "2025-01-20"),
            rec("3", "c", "20", Category::Other, "2025-02-11"),
        ];
        records.push(ExpenseRecord::new(
            "4",
            "undated",
            "",
            Amount::from_str("99").unwrap(),
            Category::Other,
            None,
        ));
        let totals = monthly_totals(&records);
        let keys: Vec<&String> = totals.keys().collect();
        assert_eq!(keys, ["2025-01", "2025-02"]);
        assert_eq!(totals["2025-01"], Decimal::from(5));
        assert_eq!(totals["2025-02"], Decimal::from(30));
    }
}
