use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Category, EngineError, ResultEngine, categories};

use super::{Engine, with_tx};

impl Engine {
    /// All categories, ordered by name.
    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Exact, case-sensitive lookup.
    pub async fn category_by_name(&self, name: &str) -> ResultEngine<Option<Category>> {
        let model = categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .one(&self.database)
            .await?;
        Ok(model.map(Category::from))
    }

    /// Creates a category. Fails with [`EngineError::ExistingKey`] when the
    /// exact name is already taken.
    pub async fn create_category(&self, name: &str) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find()
                .filter(categories::Column::Name.eq(name))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                Err(EngineError::ExistingKey(name.to_string()))
            } else {
                let model = categories::ActiveModel {
                    name: ActiveValue::Set(name.to_string()),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;
                tracing::info!(category = %model.name, "created expense category");
                Ok(Category::from(model))
            }
        })
    }
}
