//! Key/value entries attached to a parent row.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::db::dao::{DaoBase, DaoLayerError, DataDao};
use crate::error::AppError;
use crate::services::crud_service::{CrudModel, require_exists};

pub const MAX_KEY_LENGTH: usize = 191;

#[derive(Debug, Deserialize)]
pub struct DataEntryInput {
    pub key: String,
    pub value: JsonValue,
}

/// Body of `POST /{id}/data`: one entry or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NewDataEntries {
    Many { entries: Vec<DataEntryInput> },
    One(DataEntryInput),
}

impl NewDataEntries {
    fn into_vec(self) -> Vec<DataEntryInput> {
        match self {
            NewDataEntries::Many { entries } => entries,
            NewDataEntries::One(entry) => vec![entry],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DataValueUpdate {
    pub value: JsonValue,
}

#[derive(Clone)]
pub struct DataService<P, D> {
    parents: P,
    entries: D,
    parent_label: &'static str,
}

impl<P, D> DataService<P, D>
where
    P: DaoBase,
    D: DataDao,
{
    pub fn new(parents: P, entries: D, parent_label: &'static str) -> Self {
        Self {
            parents,
            entries,
            parent_label,
        }
    }

    async fn require_parent(&self, parent_id: i32) -> Result<(), AppError> {
        require_exists(&self.parents, parent_id, self.parent_label).await
    }

    pub async fn list(&self, parent_id: i32) -> Result<Vec<CrudModel<D>>, AppError> {
        self.require_parent(parent_id).await?;
        self.entries
            .list_entries(parent_id)
            .await
            .map_err(data_error)
    }

    pub async fn add(
        &self,
        parent_id: i32,
        actor_id: i32,
        payload: NewDataEntries,
    ) -> Result<Vec<CrudModel<D>>, AppError> {
        self.require_parent(parent_id).await?;

        let inputs = payload.into_vec();
        if inputs.is_empty() {
            return Err(AppError::unprocessable("entries must not be empty"));
        }

        let mut seen = HashSet::with_capacity(inputs.len());
        let mut entries = Vec::with_capacity(inputs.len());
        for input in inputs {
            let key = normalize_key(&input.key)?;
            let value = stringify_value(input.value)?;
            if !seen.insert(key.clone()) {
                return Err(AppError::conflict(format!("Duplicate data key: {key}")));
            }
            entries.push((key, value));
        }

        let keys: Vec<String> = entries.iter().map(|(key, _)| key.clone()).collect();
        let stored = self
            .entries
            .existing_keys(parent_id, &keys)
            .await
            .map_err(data_error)?;
        if let Some(key) = stored.first() {
            return Err(AppError::conflict(format!("Data key already exists: {key}")));
        }

        self.entries
            .add_entries(parent_id, Some(actor_id), entries)
            .await
            .map_err(data_error)
    }

    pub async fn get(&self, parent_id: i32, key: &str) -> Result<CrudModel<D>, AppError> {
        self.require_parent(parent_id).await?;
        self.entries
            .find_entry(parent_id, key.trim())
            .await
            .map_err(data_error)?
            .ok_or_else(entry_not_found)
    }

    pub async fn update(
        &self,
        parent_id: i32,
        actor_id: i32,
        key: &str,
        payload: DataValueUpdate,
    ) -> Result<CrudModel<D>, AppError> {
        self.require_parent(parent_id).await?;
        let value = stringify_value(payload.value)?;
        self.entries
            .update_value(parent_id, key.trim(), value, Some(actor_id))
            .await
            .map_err(data_error)?
            .ok_or_else(entry_not_found)
    }

    pub async fn delete(&self, parent_id: i32, key: &str) -> Result<CrudModel<D>, AppError> {
        self.require_parent(parent_id).await?;
        self.entries
            .delete_entry(parent_id, key.trim())
            .await
            .map_err(data_error)?
            .ok_or_else(entry_not_found)
    }
}

fn entry_not_found() -> AppError {
    AppError::not_found("Data entry not found")
}

fn data_error(err: DaoLayerError) -> AppError {
    match err {
        DaoLayerError::Db(db_err) => AppError::internal_with_source(
            "Data operation failed. Please check the logs for more details",
            db_err,
        ),
        other => AppError::from(other),
    }
}

fn normalize_key(raw: &str) -> Result<String, AppError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(AppError::unprocessable("key is required"));
    }
    if key.chars().count() > MAX_KEY_LENGTH {
        return Err(AppError::unprocessable(format!(
            "key must be at most {MAX_KEY_LENGTH} characters"
        )));
    }
    Ok(key.to_string())
}

/// Values are stored as text; scalars are accepted as-is.
fn stringify_value(value: JsonValue) -> Result<String, AppError> {
    match value {
        JsonValue::String(text) => Ok(text),
        JsonValue::Number(number) => Ok(number.to_string()),
        JsonValue::Bool(flag) => Ok(flag.to_string()),
        _ => Err(AppError::unprocessable(
            "value must be a string, number or boolean",
        )),
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult};
    use serde_json::json;

    use super::{DataService, DataValueUpdate, NewDataEntries};
    use crate::db::dao::{DaoBase, PropertyDao, PropertyDataDao};
    use crate::db::entities::{property, property_data};
    use crate::error::AppError;
    use crate::test_helpers::fixtures;

    fn service(db: &DatabaseConnection) -> DataService<PropertyDao, PropertyDataDao> {
        DataService::new(PropertyDao::new(db), PropertyDataDao::new(db), "Property")
    }

    fn entries(body: serde_json::Value) -> NewDataEntries {
        serde_json::from_value(body).expect("payload should decode")
    }

    fn no_property() -> Vec<property::Model> {
        Vec::new()
    }

    #[test]
    fn payload_accepts_single_entry_and_batch() {
        assert!(matches!(
            entries(json!({"key": "garden", "value": "yes"})),
            NewDataEntries::One(_)
        ));
        assert!(matches!(
            entries(json!({"entries": [{"key": "garden", "value": true}]})),
            NewDataEntries::Many { .. }
        ));
    }

    #[tokio::test]
    async fn add_for_missing_parent_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([no_property()])
            .into_connection();

        let err = service(&db)
            .add(10, 1, entries(json!({"key": "garden", "value": "yes"})))
            .await
            .expect_err("parent is missing");

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), "Property not found");
    }

    #[tokio::test]
    async fn add_rejects_duplicate_keys_in_request() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::property(10)]])
            .into_connection();

        let err = service(&db)
            .add(
                10,
                1,
                entries(json!({"entries": [
                    {"key": "garden", "value": "yes"},
                    {"key": " garden ", "value": "no"}
                ]})),
            )
            .await
            .expect_err("duplicate key");

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn add_rejects_key_already_stored() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::property(10)]])
            .append_query_results([[fixtures::property_entry(1, 10, "garden", "yes")]])
            .into_connection();

        let err = service(&db)
            .add(10, 1, entries(json!({"key": "garden", "value": "no"})))
            .await
            .expect_err("stored key");

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.message(), "Data key already exists: garden");
    }

    #[tokio::test]
    async fn add_validates_keys_and_values() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::property(10)]])
            .append_query_results([[fixtures::property(10)]])
            .append_query_results([[fixtures::property(10)]])
            .into_connection();
        let service = service(&db);

        let blank = service
            .add(10, 1, entries(json!({"key": "  ", "value": "x"})))
            .await
            .expect_err("blank key");
        assert!(matches!(blank, AppError::Unprocessable(_)));

        let nested = service
            .add(10, 1, entries(json!({"key": "rooms", "value": {"a": 1}})))
            .await
            .expect_err("object value");
        assert!(matches!(nested, AppError::Unprocessable(_)));

        let empty = service
            .add(10, 1, entries(json!({"entries": []})))
            .await
            .expect_err("empty batch");
        assert!(matches!(empty, AppError::Unprocessable(_)));
    }

    #[tokio::test]
    async fn add_stores_stringified_values() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::property(10)]])
            .append_query_results([Vec::<property_data::Model>::new()])
            .append_query_results([[fixtures::property_entry(1, 10, "floor", "3")]])
            .into_connection();

        let created = service(&db)
            .add(10, 1, entries(json!({"key": "floor", "value": 3})))
            .await
            .expect("insert should succeed");

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].value, "3");
    }

    #[tokio::test]
    async fn get_missing_key_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::property(10)]])
            .append_query_results([Vec::<property_data::Model>::new()])
            .into_connection();

        let err = service(&db)
            .get(10, "pool")
            .await
            .expect_err("missing key");

        assert_eq!(err.message(), "Data entry not found");
    }

    #[tokio::test]
    async fn update_sets_new_value() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::property(10)]])
            .append_query_results([[fixtures::property_entry(1, 10, "garden", "yes")]])
            .append_query_results([[fixtures::property_entry(1, 10, "garden", "no")]])
            .into_connection();

        let updated = service(&db)
            .update(10, 2, "garden", DataValueUpdate { value: json!("no") })
            .await
            .expect("update should succeed");

        assert_eq!(updated.value, "no");
    }

    #[tokio::test]
    async fn delete_returns_removed_entry() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::property(10)]])
            .append_query_results([[fixtures::property_entry(1, 10, "garden", "yes")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let removed = service(&db)
            .delete(10, "garden")
            .await
            .expect("delete should succeed");

        assert_eq!(removed.key, "garden");
    }

    #[tokio::test]
    async fn database_errors_are_not_leaked() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::property(10)]])
            .append_query_errors([DbErr::Custom("relation property_data missing".to_string())])
            .into_connection();

        let err = service(&db).list(10).await.expect_err("db error");

        assert!(matches!(err, AppError::Internal { .. }));
        assert!(!err.message().contains("property_data"));
    }
}
