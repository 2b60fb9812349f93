use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{Registration, ResultEngine, User, user_profiles, users};

use super::{Engine, with_tx};

impl Engine {
    /// Returns the user registered for `telegram_id`, creating it (and its
    /// profile, in the same transaction) when missing.
    pub async fn get_or_create_user(
        &self,
        telegram_id: i64,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> ResultEngine<Registration> {
        let registration: ResultEngine<Registration> = with_tx!(self, |db_tx| {
            if let Some(model) = users::Entity::find()
                .filter(users::Column::TelegramId.eq(telegram_id))
                .one(&db_tx)
                .await?
            {
                Ok(Registration::Existing(User::from(model)))
            } else {
                let model = users::ActiveModel {
                    telegram_id: ActiveValue::Set(telegram_id),
                    first_name: ActiveValue::Set(first_name.map(ToString::to_string)),
                    last_name: ActiveValue::Set(last_name.map(ToString::to_string)),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;

                user_profiles::ActiveModel {
                    user_id: ActiveValue::Set(model.id),
                    telegram_id: ActiveValue::Set(telegram_id),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;

                Ok(Registration::Created(User::from(model)))
            }
        });
        let registration = registration?;

        if registration.is_new() {
            tracing::info!(telegram_id, "registered new user");
        }
        self.users.put(registration.user().clone()).await;
        Ok(registration)
    }

    /// Looks a user up by chat identifier.
    pub async fn user_by_telegram_id(&self, telegram_id: i64) -> ResultEngine<Option<User>> {
        if let Some(user) = self.users.get(telegram_id).await {
            return Ok(Some(user));
        }

        let user = users::Entity::find()
            .filter(users::Column::TelegramId.eq(telegram_id))
            .one(&self.database)
            .await?
            .map(User::from);

        if let Some(user) = &user {
            self.users.put(user.clone()).await;
        }
        Ok(user)
    }

    /// Drops the cached entry for `telegram_id`, if any.
    pub async fn forget_user(&self, telegram_id: i64) {
        self.users.invalidate(telegram_id).await;
    }
}
