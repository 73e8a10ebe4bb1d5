use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, IntoActiveModel, Select};
use serde::de::DeserializeOwned;

use crate::db::dao::{AuditedActiveModel, DaoBase, DaoLayerError, PaginatedResponse};
use crate::error::AppError;
use crate::services::filters::{FilterMode, build_column_filters};

pub(crate) type CrudEntity<D> = <D as DaoBase>::Entity;
pub(crate) type CrudModel<D> = <CrudEntity<D> as EntityTrait>::Model;
pub(crate) type CrudActiveModel<D> = <CrudEntity<D> as EntityTrait>::ActiveModel;
pub(crate) type CrudColumn<D> = <CrudEntity<D> as EntityTrait>::Column;

/// A query refinement that is not a plain column filter, e.g. a subquery.
pub type Scope<E> = Box<dyn FnOnce(Select<E>) -> Select<E> + Send>;

#[derive(Clone, Copy, Debug)]
pub enum CrudOp {
    Create,
    Find,
    List,
    Update,
    Delete,
}

impl CrudOp {
    fn failed_message(self) -> &'static str {
        match self {
            CrudOp::Create => "Create failed",
            CrudOp::Find | CrudOp::List => "Find failed",
            CrudOp::Update => "Update failed",
            CrudOp::Delete => "Delete failed",
        }
    }
}

/// Request DTO for resources that cannot be patched.
#[derive(Debug, serde::Deserialize)]
pub struct Immutable {}

/// Typed create/patch/list/delete over one DAO.
///
/// Create runs `build_create` (422) then `check_constraints` (404/409) before
/// inserting. Patch runs `validate_update`, loads the row (404), merges the
/// supplied fields through `apply_update`, re-checks constraints for the
/// fields that changed, then persists.
#[async_trait::async_trait]
pub trait CrudService: Send + Sync {
    type Dao: DaoBase;
    type Create: DeserializeOwned + Send + 'static;
    type Update: DeserializeOwned + Send + 'static;

    fn dao(&self) -> &Self::Dao;

    /// Display name used in client messages, e.g. `"Property"`.
    fn label(&self) -> &'static str;

    fn list_filter_mode(&self) -> FilterMode<CrudColumn<Self::Dao>> {
        FilterMode::AllColumns { deny: &[] }
    }

    /// Removes the query keys this service handles itself and returns the
    /// matching query refinements. Whatever is left goes to column filtering.
    fn take_scopes(
        &self,
        _filters: &mut HashMap<String, String>,
    ) -> Result<Vec<Scope<CrudEntity<Self::Dao>>>, AppError> {
        Ok(Vec::new())
    }

    fn build_create(
        &self,
        payload: Self::Create,
        actor_id: i32,
    ) -> Result<CrudActiveModel<Self::Dao>, AppError>;

    fn validate_update(&self, _payload: &Self::Update) -> Result<(), AppError> {
        Ok(())
    }

    fn apply_update(
        &self,
        active: &mut CrudActiveModel<Self::Dao>,
        payload: Self::Update,
    ) -> Result<(), AppError>;

    /// Reference and uniqueness checks over the `Set` columns of `active`.
    /// `id` is the row being patched, `None` on create.
    async fn check_constraints(
        &self,
        _active: &CrudActiveModel<Self::Dao>,
        _id: Option<i32>,
    ) -> Result<(), AppError> {
        Ok(())
    }

    fn not_found(&self) -> AppError {
        AppError::not_found(format!("{} not found", self.label()))
    }

    fn map_error(&self, op: CrudOp, err: DaoLayerError) -> AppError {
        match err {
            DaoLayerError::Db(db_err) => {
                let message = format!(
                    "{}. Please check the logs for more details",
                    op.failed_message()
                );
                AppError::internal_with_source(message, db_err)
            }
            DaoLayerError::NotFound { .. } => self.not_found(),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
        }
    }

    async fn create_as(
        &self,
        actor_id: i32,
        payload: Self::Create,
    ) -> Result<CrudModel<Self::Dao>, AppError> {
        let mut active = self.build_create(payload, actor_id)?;
        self.check_constraints(&active, None).await?;
        active.set_created_by(Some(actor_id));
        active.set_updated_by(Some(actor_id));
        self.dao()
            .create(active)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    async fn find_by_id(&self, id: i32) -> Result<CrudModel<Self::Dao>, AppError> {
        self.dao()
            .find_by_id(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    async fn list(
        &self,
        page: u64,
        page_size: u64,
        mut filters: HashMap<String, String>,
    ) -> Result<PaginatedResponse<CrudModel<Self::Dao>>, AppError>
    where
        CrudColumn<Self::Dao>: ColumnTrait + Copy,
    {
        let scopes = self.take_scopes(&mut filters)?;
        let column_filters = build_column_filters(self.list_filter_mode(), filters)?;
        self.dao()
            .find_with_filters(page, page_size, None, &column_filters, move |query| {
                scopes.into_iter().fold(query, |query, scope| scope(query))
            })
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    async fn update_as(
        &self,
        actor_id: i32,
        id: i32,
        payload: Self::Update,
    ) -> Result<CrudModel<Self::Dao>, AppError> {
        self.validate_update(&payload)?;
        let current = self.find_by_id(id).await?;
        let mut active = current.into_active_model();
        self.apply_update(&mut active, payload)?;
        self.check_constraints(&active, Some(id)).await?;
        active.set_updated_by(Some(actor_id));
        self.dao()
            .save_changes(active)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    /// Deletes the row and returns what was stored.
    async fn delete(&self, id: i32) -> Result<CrudModel<Self::Dao>, AppError> {
        self.dao()
            .delete(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Delete, err))
    }
}

/// 404 with `"<label> not found"` unless the referenced row exists.
pub async fn require_exists<D: DaoBase>(dao: &D, id: i32, label: &str) -> Result<(), AppError> {
    match dao.exists(id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::not_found(format!("{label} not found"))),
        Err(err) => Err(AppError::internal_with_source(
            "Reference check failed. Please check the logs for more details",
            err,
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{FixedOffset, TimeZone};
    use sea_orm::entity::prelude::*;
    use sea_orm::{
        DatabaseBackend, DatabaseConnection, DbErr, IntoMockRow, MockDatabase, MockExecResult, Set,
    };

    use crate::db::dao::{
        AuditedActiveModel, DaoBase, HasCreatedAtColumn, TimestampedActiveModel,
    };
    use crate::error::AppError;
    use crate::services::validation::{required_text, supplied};

    use super::{CrudService, require_exists};

    mod test_entity {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, serde::Serialize)]
        #[sea_orm(table_name = "test_crud_records")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub created_at: DateTimeWithTimeZone,
            pub updated_at: DateTimeWithTimeZone,
            pub title: String,
            pub score: i32,
            pub parent_id: Option<i32>,
            pub created_by: Option<i32>,
            pub updated_by: Option<i32>,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    impl HasCreatedAtColumn for test_entity::Entity {
        fn created_at_column() -> Self::Column {
            test_entity::Column::CreatedAt
        }
    }

    impl TimestampedActiveModel for test_entity::ActiveModel {
        fn set_created_at(&mut self, ts: DateTimeWithTimeZone) {
            self.created_at = Set(ts);
        }

        fn set_updated_at(&mut self, ts: DateTimeWithTimeZone) {
            self.updated_at = Set(ts);
        }
    }

    impl AuditedActiveModel for test_entity::ActiveModel {
        fn set_created_by(&mut self, user_id: Option<i32>) {
            self.created_by = Set(user_id);
        }

        fn set_updated_by(&mut self, user_id: Option<i32>) {
            self.updated_by = Set(user_id);
        }
    }

    #[derive(Clone)]
    struct TestDao {
        db: DatabaseConnection,
    }

    impl DaoBase for TestDao {
        type Entity = test_entity::Entity;

        fn new(db: &DatabaseConnection) -> Self {
            Self { db: db.clone() }
        }

        fn db(&self) -> &DatabaseConnection {
            &self.db
        }
    }

    #[derive(serde::Deserialize)]
    struct NewRecord {
        title: String,
        score: i32,
        parent_id: Option<i32>,
    }

    #[derive(Default, serde::Deserialize)]
    struct RecordPatch {
        title: Option<String>,
        score: Option<i32>,
        parent_id: Option<i32>,
    }

    struct TestCrudService {
        dao: TestDao,
    }

    #[async_trait::async_trait]
    impl CrudService for TestCrudService {
        type Dao = TestDao;
        type Create = NewRecord;
        type Update = RecordPatch;

        fn dao(&self) -> &Self::Dao {
            &self.dao
        }

        fn label(&self) -> &'static str {
            "Record"
        }

        fn build_create(
            &self,
            payload: NewRecord,
            _actor_id: i32,
        ) -> Result<test_entity::ActiveModel, AppError> {
            Ok(test_entity::ActiveModel {
                title: Set(required_text("title", &payload.title)?),
                score: Set(payload.score),
                parent_id: Set(payload.parent_id),
                ..Default::default()
            })
        }

        fn validate_update(&self, payload: &RecordPatch) -> Result<(), AppError> {
            if let Some(title) = &payload.title {
                required_text("title", title)?;
            }
            Ok(())
        }

        fn apply_update(
            &self,
            active: &mut test_entity::ActiveModel,
            payload: RecordPatch,
        ) -> Result<(), AppError> {
            if let Some(title) = payload.title {
                active.title = Set(required_text("title", &title)?);
            }
            if let Some(score) = payload.score {
                active.score = Set(score);
            }
            if let Some(parent_id) = payload.parent_id {
                active.parent_id = Set(Some(parent_id));
            }
            Ok(())
        }

        async fn check_constraints(
            &self,
            active: &test_entity::ActiveModel,
            _id: Option<i32>,
        ) -> Result<(), AppError> {
            if let Some(Some(parent_id)) = supplied(&active.parent_id) {
                require_exists(&self.dao, *parent_id, "Parent").await?;
            }
            Ok(())
        }
    }

    struct CrudFixtureBuilder {
        mock: MockDatabase,
    }

    impl CrudFixtureBuilder {
        fn new() -> Self {
            Self {
                mock: MockDatabase::new(DatabaseBackend::Postgres),
            }
        }

        fn with_query_results<T, I, II>(mut self, sets: II) -> Self
        where
            T: IntoMockRow,
            I: IntoIterator<Item = T>,
            II: IntoIterator<Item = I>,
        {
            self.mock = self.mock.append_query_results(sets);
            self
        }

        fn with_query_error(mut self, error: DbErr) -> Self {
            self.mock = self.mock.append_query_errors([error]);
            self
        }

        fn with_exec_result(mut self, rows_affected: u64) -> Self {
            self.mock = self.mock.append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected,
            }]);
            self
        }

        fn with_exec_error(mut self, error: DbErr) -> Self {
            self.mock = self.mock.append_exec_errors([error]);
            self
        }

        fn build(self) -> TestCrudService {
            let db = self.mock.into_connection();
            TestCrudService {
                dao: TestDao::new(&db),
            }
        }
    }

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn model(id: i32, title: &str, score: i32) -> test_entity::Model {
        let now = ts();
        test_entity::Model {
            id,
            created_at: now,
            updated_at: now,
            title: title.to_string(),
            score,
            parent_id: None,
            created_by: Some(1),
            updated_by: Some(1),
        }
    }

    fn new_record(title: &str, parent_id: Option<i32>) -> NewRecord {
        NewRecord {
            title: title.to_string(),
            score: 1,
            parent_id,
        }
    }

    fn filters(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[tokio::test]
    async fn create_returns_model_on_success() {
        let service = CrudFixtureBuilder::new()
            .with_query_results([vec![model(1, "first", 1)]])
            .build();

        let created = service
            .create_as(1, new_record("first", None))
            .await
            .expect("create should succeed");

        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn create_rejects_blank_title_before_touching_the_database() {
        let service = CrudFixtureBuilder::new().build();

        let err = service
            .create_as(1, new_record("   ", None))
            .await
            .expect_err("blank title");

        assert!(matches!(err, AppError::Unprocessable(_)));
    }

    #[tokio::test]
    async fn create_with_missing_reference_is_not_found() {
        let service = CrudFixtureBuilder::new()
            .with_query_results([Vec::<test_entity::Model>::new()])
            .build();

        let err = service
            .create_as(1, new_record("child", Some(99)))
            .await
            .expect_err("parent is missing");

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), "Parent not found");
    }

    #[tokio::test]
    async fn create_with_existing_reference_inserts() {
        let mut child = model(2, "child", 1);
        child.parent_id = Some(1);
        let service = CrudFixtureBuilder::new()
            .with_query_results([vec![model(1, "parent", 1)], vec![child]])
            .build();

        let created = service
            .create_as(1, new_record("child", Some(1)))
            .await
            .expect("create should succeed");

        assert_eq!(created.parent_id, Some(1));
    }

    #[tokio::test]
    async fn create_maps_db_error_to_generic_internal_message() {
        let service = CrudFixtureBuilder::new()
            .with_query_error(DbErr::Custom(
                "duplicate key value violates unique constraint".to_string(),
            ))
            .build();

        let err = service
            .create_as(1, new_record("first", None))
            .await
            .expect_err("create should fail");

        assert_eq!(
            err.message(),
            "Create failed. Please check the logs for more details"
        );
        assert!(!err.message().contains("duplicate"));
    }

    #[tokio::test]
    async fn find_by_id_maps_not_found_to_label() {
        let service = CrudFixtureBuilder::new()
            .with_query_results([Vec::<test_entity::Model>::new()])
            .build();

        let err = service.find_by_id(7).await.expect_err("missing");

        assert_eq!(err.message(), "Record not found");
    }

    #[tokio::test]
    async fn find_by_id_maps_db_error_to_internal_with_find_message() {
        let service = CrudFixtureBuilder::new()
            .with_query_error(DbErr::Custom("select failed".to_string()))
            .build();

        let err = service.find_by_id(7).await.expect_err("db error");

        assert_eq!(
            err.message(),
            "Find failed. Please check the logs for more details"
        );
    }

    #[tokio::test]
    async fn list_returns_paginated_response() {
        let service = CrudFixtureBuilder::new()
            .with_query_results([vec![model(1, "alpha", 7), model(2, "beta", 8)]])
            .build();

        let response = service
            .list(1, 1, filters(&[("title", "alpha")]))
            .await
            .expect("list should succeed");

        assert_eq!(response.data.len(), 1);
        assert!(response.has_next);
    }

    #[tokio::test]
    async fn list_rejects_unknown_filter_before_dao_call() {
        let service = CrudFixtureBuilder::new().build();

        let err = service
            .list(1, 10, filters(&[("unknown", "1")]))
            .await
            .expect_err("unknown filter");

        assert_eq!(err.message(), "Invalid filter");
    }

    #[tokio::test]
    async fn list_maps_invalid_pagination_to_bad_request() {
        let service = CrudFixtureBuilder::new().build();

        let err = service
            .list(0, 10, HashMap::new())
            .await
            .expect_err("page 0");

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.message(), "Invalid pagination: page=0 page_size=10");
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let mut after = model(1, "after", 1);
        after.updated_by = Some(2);
        let service = CrudFixtureBuilder::new()
            .with_query_results([vec![model(1, "before", 1)], vec![after]])
            .build();

        let updated = service
            .update_as(
                2,
                1,
                RecordPatch {
                    title: Some("after".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(updated.title, "after");
        assert_eq!(updated.score, 1);
        assert_eq!(updated.updated_by, Some(2));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let service = CrudFixtureBuilder::new()
            .with_query_results([Vec::<test_entity::Model>::new()])
            .build();

        let err = service
            .update_as(1, 5, RecordPatch::default())
            .await
            .expect_err("missing row");

        assert_eq!(err.message(), "Record not found");
    }

    #[tokio::test]
    async fn update_validates_before_loading() {
        let service = CrudFixtureBuilder::new().build();

        let err = service
            .update_as(
                1,
                5,
                RecordPatch {
                    title: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("blank title");

        assert!(matches!(err, AppError::Unprocessable(_)));
    }

    #[tokio::test]
    async fn update_rechecks_supplied_reference() {
        let service = CrudFixtureBuilder::new()
            .with_query_results([vec![model(1, "row", 1)], Vec::new()])
            .build();

        let err = service
            .update_as(
                1,
                1,
                RecordPatch {
                    parent_id: Some(42),
                    ..Default::default()
                },
            )
            .await
            .expect_err("parent is missing");

        assert_eq!(err.message(), "Parent not found");
    }

    #[tokio::test]
    async fn delete_returns_deleted_row() {
        let service = CrudFixtureBuilder::new()
            .with_query_results([vec![model(3, "gone", 1)]])
            .with_exec_result(1)
            .build();

        let deleted = service.delete(3).await.expect("delete should succeed");

        assert_eq!(deleted.title, "gone");
    }

    #[tokio::test]
    async fn delete_of_missing_row_is_not_found() {
        let service = CrudFixtureBuilder::new()
            .with_query_results([Vec::<test_entity::Model>::new()])
            .build();

        let err = service.delete(3).await.expect_err("missing row");

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), "Record not found");
    }

    #[tokio::test]
    async fn delete_maps_db_error_to_internal_with_delete_message() {
        let service = CrudFixtureBuilder::new()
            .with_query_results([vec![model(3, "gone", 1)]])
            .with_exec_error(DbErr::Custom("delete failed".to_string()))
            .build();

        let err = service.delete(3).await.expect_err("db error");

        assert_eq!(
            err.message(),
            "Delete failed. Please check the logs for more details"
        );
    }
}
