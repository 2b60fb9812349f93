//! Income entries. Immutable once created.

use sea_orm::entity::prelude::*;

use crate::{EngineError, EntryDate, Money};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Income {
    pub id: i32,
    pub user_id: i32,
    pub amount: Money,
    pub date: EntryDate,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub amount: String,
    pub date: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Income {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            amount: Money::from_stored(&model.amount)?,
            date: EntryDate::from_stored(model.date),
            description: model.description,
        })
    }
}
