use sea_orm::Set;
use serde::Deserialize;

use crate::{
    db::dao::{DocumentDao, PropertyDao, UserDao},
    db::entities::document,
    error::AppError,
    services::{
        crud_service::{CrudService, require_exists},
        validation::{optional_text, required_text, supplied},
    },
};

#[derive(Debug, Deserialize)]
pub struct NewDocument {
    pub name: String,
    pub url: String,
    pub mime_type: Option<String>,
    pub property_id: Option<i32>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub mime_type: Option<String>,
    pub property_id: Option<i32>,
    pub user_id: Option<i32>,
}

#[derive(Clone)]
pub struct DocumentService {
    documents: DocumentDao,
    properties: PropertyDao,
    users: UserDao,
}

impl DocumentService {
    pub fn new(documents: DocumentDao, properties: PropertyDao, users: UserDao) -> Self {
        Self {
            documents,
            properties,
            users,
        }
    }
}

#[async_trait::async_trait]
impl CrudService for DocumentService {
    type Dao = DocumentDao;
    type Create = NewDocument;
    type Update = DocumentPatch;

    fn dao(&self) -> &Self::Dao {
        &self.documents
    }

    fn label(&self) -> &'static str {
        "Document"
    }

    fn build_create(
        &self,
        payload: NewDocument,
        _actor_id: i32,
    ) -> Result<document::ActiveModel, AppError> {
        Ok(document::ActiveModel {
            name: Set(required_text("name", &payload.name)?),
            url: Set(required_text("url", &payload.url)?),
            mime_type: Set(optional_text(payload.mime_type)),
            property_id: Set(payload.property_id),
            user_id: Set(payload.user_id),
            ..Default::default()
        })
    }

    fn validate_update(&self, payload: &DocumentPatch) -> Result<(), AppError> {
        if let Some(name) = &payload.name {
            required_text("name", name)?;
        }
        if let Some(url) = &payload.url {
            required_text("url", url)?;
        }
        Ok(())
    }

    fn apply_update(
        &self,
        active: &mut document::ActiveModel,
        payload: DocumentPatch,
    ) -> Result<(), AppError> {
        if let Some(name) = payload.name {
            active.name = Set(required_text("name", &name)?);
        }
        if let Some(url) = payload.url {
            active.url = Set(required_text("url", &url)?);
        }
        if let Some(mime_type) = payload.mime_type {
            active.mime_type = Set(optional_text(Some(mime_type)));
        }
        if let Some(property_id) = payload.property_id {
            active.property_id = Set(Some(property_id));
        }
        if let Some(user_id) = payload.user_id {
            active.user_id = Set(Some(user_id));
        }
        Ok(())
    }

    async fn check_constraints(
        &self,
        active: &document::ActiveModel,
        _id: Option<i32>,
    ) -> Result<(), AppError> {
        if let Some(Some(property_id)) = supplied(&active.property_id) {
            require_exists(&self.properties, *property_id, "Property").await?;
        }
        if let Some(Some(user_id)) = supplied(&active.user_id) {
            require_exists(&self.users, *user_id, "User").await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    use super::{DocumentPatch, DocumentService, NewDocument};
    use crate::db::dao::{DaoBase, DocumentDao, PropertyDao, UserDao};
    use crate::db::entities::{property, user};
    use crate::error::AppError;
    use crate::services::crud_service::CrudService;
    use crate::test_helpers::fixtures;

    fn service(db: &DatabaseConnection) -> DocumentService {
        DocumentService::new(DocumentDao::new(db), PropertyDao::new(db), UserDao::new(db))
    }

    fn new_document(url: &str, property_id: Option<i32>) -> NewDocument {
        NewDocument {
            name: "Floor plan".to_string(),
            url: url.to_string(),
            mime_type: Some("application/pdf".to_string()),
            property_id,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn url_is_required() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .create_as(1, new_document(" ", None))
            .await
            .expect_err("blank url");

        assert!(matches!(err, AppError::Unprocessable(_)));
    }

    #[tokio::test]
    async fn unknown_property_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<property::Model>::new()])
            .into_connection();

        let err = service(&db)
            .create_as(1, new_document("https://cdn.example.com/plan.pdf", Some(12)))
            .await
            .expect_err("missing property");

        assert_eq!(err.message(), "Property not found");
    }

    #[tokio::test]
    async fn patch_checks_supplied_user_only() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::document(5)]])
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let err = service(&db)
            .update_as(
                1,
                5,
                DocumentPatch {
                    user_id: Some(77),
                    ..Default::default()
                },
            )
            .await
            .expect_err("missing user");

        assert_eq!(err.message(), "User not found");
    }
}
