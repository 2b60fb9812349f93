//! Persistence model and repository access for the finance bot.
//!
//! The [`Engine`] is the only way the conversation layer touches storage: it
//! registers users, manages expense categories, records incomes/expenses and
//! aggregates balances.

pub use categories::Category;
pub use date::{DatePolicy, EntryDate};
pub use error::EngineError;
pub use expenses::Expense;
pub use incomes::Income;
pub use money::Money;
pub use ops::{Balance, Engine, EngineBuilder};
pub use users::{Registration, User};

mod cache;
mod categories;
mod date;
mod error;
mod expenses;
mod incomes;
mod money;
mod ops;
mod user_profiles;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
