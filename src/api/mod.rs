//! Typed access to the remote expense service.

mod http;
mod test_client;

pub use http::HttpExpenseApi;
pub use test_client::TestExpenseApi;

use crate::model::{ExpenseDraft, ExpensePatch, ExpensePayload};
use crate::{Config, Result};

/// The environment variable that switches the program to the in-memory
/// client, allowing the whole app to run without a server.
pub const TEST_MODE_ENV: &str = "EXPENSES_IN_TEST_MODE";

/// The contract with the remote expense service: one network round-trip per
/// call, no retries. Implementations distinguish transport failures
/// (`Error::Connectivity`) from error responses (`Error::Request`).
#[async_trait::async_trait]
pub trait ExpenseApi: Send + Sync {
    /// `GET /expenses`. Returns records in the order the service sends them.
    async fn list(&self) -> Result<Vec<ExpensePayload>>;

    /// `GET /expenses/{id}`.
    async fn get(&self, id: &str) -> Result<ExpensePayload>;

    /// `POST /expenses`. The response carries the server-assigned id.
    async fn create(&self, draft: &ExpenseDraft) -> Result<ExpensePayload>;

    /// `PUT /expenses/{id}` with only the fields present in `patch`.
    async fn update(&self, id: &str, patch: &ExpensePatch) -> Result<ExpensePayload>;

    /// `DELETE /expenses/{id}`.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Selects which `ExpenseApi` implementation the program uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Talk to the configured remote service over HTTP.
    Remote,
    /// Use the seeded in-memory client.
    Test,
}

impl Mode {
    /// When `EXPENSES_IN_TEST_MODE` is set and non-zero in length, the mode
    /// is `Mode::Test`, otherwise `Mode::Remote`.
    pub fn from_env() -> Mode {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Remote,
        }
    }
}

/// Creates the `ExpenseApi` implementation for `mode`, dynamically
/// dispatched so callers do not care which backend they are talking to.
pub fn client(config: &Config, mode: Mode) -> Result<Box<dyn ExpenseApi>> {
    match mode {
        Mode::Remote => Ok(Box::new(HttpExpenseApi::new(
            config.base_url(),
            config.timeout(),
        )?)),
        Mode::Test => Ok(Box::new(TestExpenseApi::default())),
    }
}
