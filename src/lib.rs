pub mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod export;
mod model;
pub mod query;
mod store;
mod utils;

pub use api::{client, ExpenseApi, Mode};
pub use config::Config;
pub use error::{Error, Result};
pub use model::{Amount, Category, ExpenseDraft, ExpensePatch, ExpensePayload, ExpenseRecord};
pub use query::{Page, Query};
pub use store::ExpenseStore;
