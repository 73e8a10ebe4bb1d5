use base_entity_derive::{base_entity, data_entity};
use sea_orm::entity::prelude::*;

#[base_entity]
#[data_entity(parent = "agency_id")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "agency_data")]
pub struct Model {
    #[sea_orm(indexed)]
    pub agency_id: i32,
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub value: String,
    #[sea_orm(belongs_to, from = "agency_id", to = "id", on_delete = "Cascade")]
    pub agency: HasOne<super::agency::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
