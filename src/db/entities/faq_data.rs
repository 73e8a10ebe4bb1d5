use base_entity_derive::{base_entity, data_entity};
use sea_orm::entity::prelude::*;

#[base_entity]
#[data_entity(parent = "faq_id")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "faq_data")]
pub struct Model {
    #[sea_orm(indexed)]
    pub faq_id: i32,
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub value: String,
    #[sea_orm(belongs_to, from = "faq_id", to = "id", on_delete = "Cascade")]
    pub faq: HasOne<super::faq::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
