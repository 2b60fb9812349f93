//! Schema management for the finance bot database.
//!
//! `DATABASE_URL=sqlite:./finance_bot.db?mode=rwc cargo run -p migration -- up`
//! applies pending migrations; `status`, `down`, `fresh`, `refresh` and `reset`
//! are also available.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
