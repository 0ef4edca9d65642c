//! The expense record model and its wire representations.
//!
//! The remote service has two known backends that disagree on field names
//! (`_id` vs `id`, `value` vs `amount`, `date` vs `occurredAt`) and on which
//! fields are present. `ExpensePayload` accepts all of them; `normalize`
//! resolves every fallback exactly once, when a record enters the collection
//! store, so read sites never re-derive them.

use crate::model::{Amount, Category};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// An expense exactly as it appears on the wire. Every field is optional and
/// tolerant; use [`ExpensePayload::normalize`] to obtain a usable record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpensePayload {
    #[serde(default, alias = "_id")]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default, alias = "value", deserialize_with = "lenient_amount")]
    pub(crate) amount: Option<Amount>,
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default, alias = "occurredAt")]
    pub(crate) date: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub(crate) created_at: Option<String>,
}

impl ExpensePayload {
    /// Resolves all field fallbacks and produces the canonical record:
    ///
    /// - `title` falls back to `description`;
    /// - missing, unparseable or negative amounts become zero;
    /// - unknown categories become [`Category::Other`];
    /// - the record date falls back to the creation timestamp, and an
    ///   unparseable date becomes `None`.
    pub fn normalize(self) -> ExpenseRecord {
        let description = self.description.unwrap_or_default();
        let title = match self.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => description.clone(),
        };
        let occurred_at = self
            .date
            .as_deref()
            .and_then(parse_wire_date)
            .or_else(|| self.created_at.as_deref().and_then(parse_wire_date));
        ExpenseRecord {
            id: self.id.unwrap_or_default(),
            title,
            description,
            amount: self.amount.unwrap_or(Amount::ZERO).clamped(),
            category: Category::from_wire(self.category.as_deref()),
            occurred_at,
        }
    }
}

/// Amounts arrive as numbers, formatted strings, or garbage. Anything that
/// cannot be parsed is treated as absent so that it later coerces to zero
/// instead of failing the whole fetch.
fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<Option<Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => {
            n.as_f64().and_then(Decimal::from_f64).map(Amount::new)
        }
        serde_json::Value::String(s) => Amount::from_str(&s).ok(),
        _ => None,
    }))
}

/// Accepts `2024-03-01`, full RFC 3339 timestamps, and timestamp-like
/// strings with a date prefix.
fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// The canonical, fully normalized expense record held by the collection
/// store. Records are immutable once they appear in a derived view; all
/// mutation goes through the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseRecord {
    id: String,
    title: String,
    description: String,
    amount: Amount,
    category: Category,
    occurred_at: Option<NaiveDate>,
}

impl ExpenseRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
        category: Category,
        occurred_at: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            amount,
            category,
            occurred_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn occurred_at(&self) -> Option<NaiveDate> {
        self.occurred_at
    }

    /// The `YYYY-MM` key used for monthly aggregation, if the record has a
    /// usable date.
    pub fn month_key(&self) -> Option<String> {
        self.occurred_at.map(|d| d.format("%Y-%m").to_string())
    }

    /// Merges an update response into this record. Only fields the service
    /// actually returned overwrite the local copy; everything else is
    /// preserved as-is.
    pub fn merge(&mut self, payload: ExpensePayload) {
        if let Some(title) = payload.title {
            if !title.trim().is_empty() {
                self.title = title;
            }
        }
        if let Some(description) = payload.description {
            self.description = description;
        }
        if let Some(amount) = payload.amount {
            self.amount = amount.clamped();
        }
        if let Some(category) = payload.category.as_deref() {
            self.category = Category::from_wire(Some(category));
        }
        if let Some(date) = payload.date.as_deref().and_then(parse_wire_date) {
            self.occurred_at = Some(date);
        }
    }
}

/// The request body for creating an expense.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: Amount,
    pub category: Category,
    #[serde(rename = "occurredAt")]
    pub occurred_at: Option<NaiveDate>,
}

impl ExpenseDraft {
    /// Local validation, performed before any network call is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("a title is required".to_string()));
        }
        if !self.amount.is_positive() {
            return Err(Error::Validation(
                "the amount must be greater than zero".to_string(),
            ));
        }
        if self.occurred_at.is_none() {
            return Err(Error::Validation("a date is required".to_string()));
        }
        Ok(())
    }
}

/// The request body for a partial update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpensePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(rename = "occurredAt", skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<NaiveDate>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.occurred_at.is_none()
    }
}
