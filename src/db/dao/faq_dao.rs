use sea_orm::DatabaseConnection;

use super::DaoBase;
use crate::db::entities::prelude::Faq;

#[derive(Clone)]
pub struct FaqDao {
    db: DatabaseConnection,
}

impl DaoBase for FaqDao {
    type Entity = Faq;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
