use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(indexed)]
    pub property_type: String,
    #[sea_orm(indexed)]
    pub status: String,
    pub price: i64,
    pub address: Option<String>,
    #[sea_orm(indexed)]
    pub city: String,
    pub zip_code: Option<String>,
    pub surface: Option<i32>,
    pub rooms: Option<i32>,
    pub bedrooms: Option<i32>,
    #[sea_orm(indexed)]
    pub agency_id: Option<i32>,
    #[sea_orm(has_many)]
    pub data: HasMany<super::property_data::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
