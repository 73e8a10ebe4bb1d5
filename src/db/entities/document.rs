use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    pub name: String,
    pub url: String,
    pub mime_type: Option<String>,
    #[sea_orm(indexed)]
    pub property_id: Option<i32>,
    #[sea_orm(indexed)]
    pub user_id: Option<i32>,
    #[sea_orm(has_many)]
    pub data: HasMany<super::document_data::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
