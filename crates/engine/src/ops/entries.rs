use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{
    EngineError, EntryDate, Expense, Income, Money, ResultEngine, categories, expenses,
    incomes, users,
};

use super::{Engine, with_tx};

impl Engine {
    /// Records an income for `user_id`.
    pub async fn add_income(
        &self,
        user_id: i32,
        amount: Money,
        date: &EntryDate,
        description: &str,
    ) -> ResultEngine<Income> {
        ensure_positive(amount)?;
        with_tx!(self, |db_tx| {
            require_user(&db_tx, user_id).await?;
            let model = incomes::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                amount: ActiveValue::Set(amount.to_stored()),
                date: ActiveValue::Set(date.to_string()),
                description: ActiveValue::Set(description.to_string()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(user_id, income_id = model.id, %amount, "income recorded");
            Income::try_from(model)
        })
    }

    /// Records an expense for `user_id` under `category_id`.
    pub async fn add_expense(
        &self,
        user_id: i32,
        category_id: i32,
        amount: Money,
        date: &EntryDate,
        description: &str,
    ) -> ResultEngine<Expense> {
        ensure_positive(amount)?;
        with_tx!(self, |db_tx| {
            require_user(&db_tx, user_id).await?;
            if categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .is_none()
            {
                return Err(EngineError::KeyNotFound(
                    "expense category not exists".to_string(),
                ));
            }
            let model = expenses::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                category_id: ActiveValue::Set(category_id),
                amount: ActiveValue::Set(amount.to_stored()),
                date: ActiveValue::Set(date.to_string()),
                description: ActiveValue::Set(description.to_string()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(user_id, expense_id = model.id, %amount, "expense recorded");
            Expense::try_from(model)
        })
    }
}

fn ensure_positive(amount: Money) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

async fn require_user(db_tx: &DatabaseTransaction, user_id: i32) -> ResultEngine<()> {
    if users::Entity::find_by_id(user_id).one(db_tx).await?.is_none() {
        return Err(EngineError::KeyNotFound("user not exists".to_string()));
    }
    Ok(())
}
