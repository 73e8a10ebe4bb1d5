use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "visits")]
pub struct Model {
    #[sea_orm(indexed)]
    pub property_id: i32,
    #[sea_orm(indexed)]
    pub user_id: i32,
    pub scheduled_at: DateTimeWithTimeZone,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(has_many)]
    pub data: HasMany<super::visit_data::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
