use sea_orm::Set;
use serde::Deserialize;

use crate::{
    db::dao::RoleDao,
    db::entities::role,
    error::AppError,
    services::{
        crud_service::{CrudOp, CrudService},
        validation::{optional_text, required_text, supplied},
    },
};

#[derive(Debug, Deserialize)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RolePatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct RoleService {
    roles: RoleDao,
}

impl RoleService {
    pub fn new(roles: RoleDao) -> Self {
        Self { roles }
    }
}

/// Role names are compared lowercase so `Admin` and `admin` collide.
fn role_name(raw: &str) -> Result<String, AppError> {
    required_text("name", raw).map(|name| name.to_ascii_lowercase())
}

#[async_trait::async_trait]
impl CrudService for RoleService {
    type Dao = RoleDao;
    type Create = NewRole;
    type Update = RolePatch;

    fn dao(&self) -> &Self::Dao {
        &self.roles
    }

    fn label(&self) -> &'static str {
        "Role"
    }

    fn build_create(&self, payload: NewRole, _actor_id: i32) -> Result<role::ActiveModel, AppError> {
        Ok(role::ActiveModel {
            name: Set(role_name(&payload.name)?),
            description: Set(optional_text(payload.description)),
            ..Default::default()
        })
    }

    fn validate_update(&self, payload: &RolePatch) -> Result<(), AppError> {
        if let Some(name) = &payload.name {
            role_name(name)?;
        }
        Ok(())
    }

    fn apply_update(&self, active: &mut role::ActiveModel, payload: RolePatch) -> Result<(), AppError> {
        if let Some(name) = payload.name {
            active.name = Set(role_name(&name)?);
        }
        if let Some(description) = payload.description {
            active.description = Set(optional_text(Some(description)));
        }
        Ok(())
    }

    async fn check_constraints(
        &self,
        active: &role::ActiveModel,
        id: Option<i32>,
    ) -> Result<(), AppError> {
        let Some(name) = supplied(&active.name) else {
            return Ok(());
        };
        let existing = self
            .roles
            .find_by_name(name)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?;
        if existing.is_some_and(|role| Some(role.id) != id) {
            return Err(AppError::conflict("Role name already exists"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::{NewRole, RoleService};
    use crate::db::dao::{DaoBase, RoleDao};
    use crate::db::entities::role;
    use crate::error::AppError;
    use crate::services::crud_service::CrudService;
    use crate::test_helpers::fixtures;

    #[tokio::test]
    async fn duplicate_name_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixtures::role(1, "admin")]])
            .into_connection();
        let service = RoleService::new(RoleDao::new(&db));

        let err = service
            .create_as(
                1,
                NewRole {
                    name: "Admin".to_string(),
                    description: None,
                },
            )
            .await
            .expect_err("duplicate");

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn new_name_is_stored_lowercase() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<role::Model>::new()])
            .append_query_results([[fixtures::role(3, "agent")]])
            .into_connection();
        let service = RoleService::new(RoleDao::new(&db));

        let created = service
            .create_as(
                1,
                NewRole {
                    name: " Agent ".to_string(),
                    description: Some("Listing agents".to_string()),
                },
            )
            .await
            .expect("create should succeed");

        assert_eq!(created.name, "agent");
    }

    #[tokio::test]
    async fn blank_name_is_unprocessable() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = RoleService::new(RoleDao::new(&db));

        let err = service
            .create_as(
                1,
                NewRole {
                    name: "  ".to_string(),
                    description: None,
                },
            )
            .await
            .expect_err("blank");

        assert!(matches!(err, AppError::Unprocessable(_)));
    }
}
