use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::Role, role};

#[derive(Clone)]
pub struct RoleDao {
    db: DatabaseConnection,
}

impl DaoBase for RoleDao {
    type Entity = Role;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RoleDao {
    pub async fn find_by_name(&self, name: &str) -> DaoResult<Option<role::Model>> {
        let name = name.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(role::Column::Name.eq(name))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    /// Returns the role with `name`, inserting it first when absent.
    pub async fn ensure(&self, name: &str, description: &str) -> DaoResult<role::Model> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }
        let model = role::ActiveModel {
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            ..Default::default()
        };
        self.create(model).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::db::entities::role;

    use super::RoleDao;
    use crate::db::dao::DaoBase;

    fn role_model(id: i32, name: &str) -> role::Model {
        let now = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid");
        role::Model {
            id,
            created_at: now,
            updated_at: now,
            name: name.to_string(),
            description: None,
            created_by: None,
            updated_by: None,
        }
    }

    #[tokio::test]
    async fn ensure_returns_existing_role_without_insert() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[role_model(1, "admin")]])
            .into_connection();
        let dao = RoleDao::new(&db);

        let role = dao.ensure("admin", "Administrators").await.expect("ensure");
        assert_eq!(role.id, 1);
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn ensure_inserts_missing_role() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<role::Model>::new()])
            .append_query_results([[role_model(2, "user")]])
            .into_connection();
        let dao = RoleDao::new(&db);

        let role = dao.ensure("user", "Regular users").await.expect("ensure");
        assert_eq!(role.name, "user");
        assert_eq!(db.into_transaction_log().len(), 2);
    }
}
