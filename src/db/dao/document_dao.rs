use sea_orm::DatabaseConnection;

use super::DaoBase;
use crate::db::entities::prelude::Document;

#[derive(Clone)]
pub struct DocumentDao {
    db: DatabaseConnection,
}

impl DaoBase for DocumentDao {
    type Entity = Document;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
