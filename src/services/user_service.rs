use sea_orm::Set;
use serde::Deserialize;

use crate::{
    auth::password::{MIN_PASSWORD_LEN, hash_password},
    db::dao::{RoleDao, UserDao},
    db::entities::user,
    error::AppError,
    services::{
        crud_service::{CrudOp, CrudService, require_exists},
        filters::FilterMode,
        validation::{email, optional_text, required_text, supplied},
    },
};

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub role_id: Option<i32>,
}

#[derive(Clone)]
pub struct UserService {
    users: UserDao,
    roles: RoleDao,
}

impl UserService {
    pub fn new(users: UserDao, roles: RoleDao) -> Self {
        Self { users, roles }
    }
}

#[async_trait::async_trait]
impl CrudService for UserService {
    type Dao = UserDao;
    type Create = NewUser;
    type Update = UserPatch;

    fn dao(&self) -> &Self::Dao {
        &self.users
    }

    fn label(&self) -> &'static str {
        "User"
    }

    fn list_filter_mode(&self) -> FilterMode<user::Column> {
        FilterMode::AllColumns {
            deny: &["password_hash"],
        }
    }

    fn build_create(&self, payload: NewUser, _actor_id: i32) -> Result<user::ActiveModel, AppError> {
        Ok(user::ActiveModel {
            name: Set(required_text("name", &payload.name)?),
            email: Set(email("email", &payload.email)?),
            password_hash: Set(hash_password(&payload.password)?),
            phone: Set(optional_text(payload.phone)),
            role_id: Set(payload.role_id),
            ..Default::default()
        })
    }

    fn validate_update(&self, payload: &UserPatch) -> Result<(), AppError> {
        if let Some(name) = &payload.name {
            required_text("name", name)?;
        }
        if let Some(address) = &payload.email {
            email("email", address)?;
        }
        if let Some(password) = &payload.password
            && password.chars().count() < MIN_PASSWORD_LEN
        {
            return Err(AppError::unprocessable(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }

    fn apply_update(&self, active: &mut user::ActiveModel, payload: UserPatch) -> Result<(), AppError> {
        if let Some(name) = payload.name {
            active.name = Set(required_text("name", &name)?);
        }
        if let Some(address) = payload.email {
            active.email = Set(email("email", &address)?);
        }
        if let Some(password) = payload.password {
            active.password_hash = Set(hash_password(&password)?);
        }
        if let Some(phone) = payload.phone {
            active.phone = Set(optional_text(Some(phone)));
        }
        if let Some(role_id) = payload.role_id {
            active.role_id = Set(Some(role_id));
        }
        Ok(())
    }

    async fn check_constraints(
        &self,
        active: &user::ActiveModel,
        id: Option<i32>,
    ) -> Result<(), AppError> {
        if let Some(Some(role_id)) = supplied(&active.role_id) {
            require_exists(&self.roles, *role_id, "Role").await?;
        }
        if let Some(address) = supplied(&active.email) {
            let existing = self
                .users
                .find_by_email(address)
                .await
                .map_err(|err| self.map_error(CrudOp::Find, err))?;
            if existing.is_some_and(|user| Some(user.id) != id) {
                return Err(AppError::conflict("Email already in use"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    use super::{NewUser, UserPatch, UserService};
    use crate::db::dao::{DaoBase, RoleDao, UserDao};
    use crate::db::entities::role;
    use crate::error::AppError;
    use crate::services::crud_service::CrudService;
    use crate::test_helpers::fixtures;

    fn service(db: &DatabaseConnection) -> UserService {
        UserService::new(UserDao::new(db), RoleDao::new(db))
    }

    fn new_user(email: &str, password: &str, role_id: Option<i32>) -> NewUser {
        NewUser {
            name: "Alice".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            phone: None,
            role_id,
        }
    }

    #[tokio::test]
    async fn create_rejects_malformed_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .create_as(1, new_user("not-an-email", "password123", None))
            .await
            .expect_err("bad email");

        assert!(matches!(err, AppError::Unprocessable(_)));
    }

    #[tokio::test]
    async fn create_rejects_short_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(&db)
            .create_as(1, new_user("alice@example.com", "short", None))
            .await
            .expect_err("short password");

        assert!(matches!(err, AppError::Unprocessable(_)));
    }

    #[tokio::test]
    async fn create_with_unknown_role_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<role::Model>::new()])
            .into_connection();

        let err = service(&db)
            .create_as(1, new_user("alice@example.com", "password123", Some(9)))
            .await
            .expect_err("missing role");

        assert_eq!(err.message(), "Role not found");
    }

    #[tokio::test]
    async fn create_with_taken_email_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::user(3, "alice@example.com", None)]])
            .into_connection();

        let err = service(&db)
            .create_as(1, new_user("Alice@Example.com", "password123", None))
            .await
            .expect_err("duplicate email");

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn patch_keeping_own_email_is_allowed() {
        let mut renamed = fixtures::user(3, "alice@example.com", None);
        renamed.name = "Alicia".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                [fixtures::user(3, "alice@example.com", None)],
                [fixtures::user(3, "alice@example.com", None)],
                [renamed],
            ])
            .into_connection();

        let updated = service(&db)
            .update_as(
                1,
                3,
                UserPatch {
                    name: Some("Alicia".to_string()),
                    email: Some("alice@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(updated.name, "Alicia");
    }

    #[tokio::test]
    async fn list_rejects_password_hash_filter() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let filters = HashMap::from([("password_hash".to_string(), "x".to_string())]);

        let err = service(&db)
            .list(1, 10, filters)
            .await
            .expect_err("denied filter");

        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
