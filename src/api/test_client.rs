//! Implements the `ExpenseApi` trait using in-memory data for testing.
//!
//! Note: this is compiled even in the "production" version of this app so
//! that we can run the whole app, top-to-bottom, without a server.

use crate::api::ExpenseApi;
use crate::model::{ExpenseDraft, ExpensePatch, ExpensePayload};
use crate::{Error, Result};
use std::io::Cursor;
use std::sync::Mutex;
use uuid::Uuid;

/// An implementation of the `ExpenseApi` trait that keeps its records in
/// memory. By default it is seeded with some existing data.
pub struct TestExpenseApi {
    records: Mutex<Vec<ExpensePayload>>,
}

impl TestExpenseApi {
    /// Create a new `TestExpenseApi` holding `records`.
    pub fn new(records: Vec<ExpensePayload>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Create an empty `TestExpenseApi`.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn not_found(id: &str) -> Error {
        Error::Request {
            status: 404,
            message: format!("no expense with id '{id}'"),
        }
    }
}

impl Default for TestExpenseApi {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::new(seed_records())
    }
}

#[async_trait::async_trait]
impl ExpenseApi for TestExpenseApi {
    async fn list(&self) -> Result<Vec<ExpensePayload>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn get(&self, id: &str) -> Result<ExpensePayload> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, draft: &ExpenseDraft) -> Result<ExpensePayload> {
        let payload = ExpensePayload {
            id: Some(Uuid::new_v4().to_string()),
            title: Some(draft.title.clone()),
            description: draft.description.clone(),
            amount: Some(draft.amount),
            category: Some(draft.category.to_string()),
            date: draft.occurred_at.map(|d| d.format("%Y-%m-%d").to_string()),
            created_at: None,
        };
        // Newest first, the same order the real service lists in.
        self.records.lock().unwrap().insert(0, payload.clone());
        Ok(payload)
    }

    async fn update(&self, id: &str, patch: &ExpensePatch) -> Result<ExpensePayload> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|p| p.id.as_deref() == Some(id))
            .ok_or_else(|| Self::not_found(id))?;
        if let Some(title) = &patch.title {
            record.title = Some(title.clone());
        }
        if let Some(description) = &patch.description {
            record.description = Some(description.clone());
        }
        if let Some(amount) = patch.amount {
            record.amount = Some(amount);
        }
        if let Some(category) = patch.category {
            record.category = Some(category.to_string());
        }
        if let Some(date) = patch.occurred_at {
            record.date = Some(date.format("%Y-%m-%d").to_string());
        }
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|p| p.id.as_deref() != Some(id));
        if records.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

/// Provides the seed records from this module's embedded CSV data.
fn seed_records() -> Vec<ExpensePayload> {
    load_csv(SEED_DATA).unwrap_or_default()
}

/// Loads expense payloads from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Result<Vec<ExpensePayload>> {
    let mut rdr = csv::Reader::from_reader(Cursor::new(csv_data.as_bytes()));
    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|err| Error::Config(format!("bad seed data: {err}")))?;
        let field = |ix: usize| row.get(ix).filter(|s| !s.is_empty()).map(str::to_string);
        records.push(ExpensePayload {
            id: field(0),
            title: field(1),
            description: field(2),
            amount: field(3).and_then(|s| s.parse().ok()),
            category: field(4),
            date: field(5),
            created_at: None,
        });
    }
    Ok(records)
}

/// Seed expense data, newest first.
const SEED_DATA: &str = r##"id,title,description,amount,category,date
e3f1a9c2,Weekly groceries,Supermarket run,87.43,food,2025-08-28
b7d20e55,Monthly transit pass,,64.00,transport,2025-08-27
91c4aa08,Electric bill,August usage,142.67,housing,2025-08-25
4fe8b310,New running shoes,,96.50,shopping,2025-08-22
a20cd971,Dentist visit,Cleaning and checkup,120.00,health,2025-08-18
6b93f5d4,Textbooks,Fall semester,212.30,education,2025-08-15
cc01e782,Coffee beans,,18.75,food,2025-08-12
58a7d3b9,Taxi to airport,,42.10,transport,2025-08-03
7d45c0ef,Rent,August,1450.00,housing,2025-08-01
02b9e6a1,Pharmacy,Allergy medicine,23.40,health,2025-07-29
e5518c37,Dinner out,Birthday dinner,76.20,food,2025-07-26
38d0f9b6,Desk lamp,,34.99,shopping,2025-07-20
"##;
