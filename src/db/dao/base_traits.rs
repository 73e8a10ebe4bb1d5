use sea_orm::EntityTrait;
use sea_orm::entity::prelude::DateTimeWithTimeZone;

pub trait HasCreatedAtColumn: EntityTrait {
    fn created_at_column() -> Self::Column;
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
}

pub trait AuditedActiveModel {
    fn set_created_by(&mut self, user_id: Option<i32>);
    fn set_updated_by(&mut self, user_id: Option<i32>);
}

/// A `(parent, key, value)` side-table entity.
pub trait DataEntity:
    EntityTrait<Model: DataModel, ActiveModel: DataActiveModel> + HasCreatedAtColumn
{
    fn parent_column() -> Self::Column;
    fn key_column() -> Self::Column;
}

pub trait DataModel: serde::Serialize + Clone + Send + Sync {
    fn parent_id(&self) -> i32;
    fn key(&self) -> &str;
    fn value(&self) -> &str;
}

pub trait DataActiveModel: Sized {
    fn new_entry(parent_id: i32, key: String, value: String) -> Self;
    fn set_value(&mut self, value: String);
}
