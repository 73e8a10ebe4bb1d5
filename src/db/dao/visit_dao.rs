use sea_orm::DatabaseConnection;

use super::DaoBase;
use crate::db::entities::prelude::Visit;

#[derive(Clone)]
pub struct VisitDao {
    db: DatabaseConnection,
}

impl DaoBase for VisitDao {
    type Entity = Visit;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
