use sea_orm::DatabaseConnection;

use super::DaoBase;
use crate::db::entities::prelude::Agency;

#[derive(Clone)]
pub struct AgencyDao {
    db: DatabaseConnection,
}

impl DaoBase for AgencyDao {
    type Entity = Agency;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
