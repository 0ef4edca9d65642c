//! Types that represent the core data model, such as `ExpenseRecord` and
//! `Category`.
mod amount;
mod category;
mod record;

pub use amount::{Amount, AmountError};
pub use category::Category;
pub use record::{ExpenseDraft, ExpensePatch, ExpensePayload, ExpenseRecord};
