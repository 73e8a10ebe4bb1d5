use base_entity_derive::{base_entity, data_entity};
use sea_orm::entity::prelude::*;

#[base_entity]
#[data_entity(parent = "visit_id")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "visit_data")]
pub struct Model {
    #[sea_orm(indexed)]
    pub visit_id: i32,
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub value: String,
    #[sea_orm(belongs_to, from = "visit_id", to = "id", on_delete = "Cascade")]
    pub visit: HasOne<super::visit::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
