use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter};

use super::{DaoBase, DaoResult};
use crate::db::entities::{favorite, prelude::Favorite};

#[derive(Clone)]
pub struct FavoriteDao {
    db: DatabaseConnection,
}

impl DaoBase for FavoriteDao {
    type Entity = Favorite;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl FavoriteDao {
    pub async fn find_by_user_and_property(
        &self,
        user_id: i32,
        property_id: i32,
    ) -> DaoResult<Option<favorite::Model>> {
        self.find(1, 1, None, move |query| {
            query
                .filter(favorite::Column::UserId.eq(user_id))
                .filter(favorite::Column::PropertyId.eq(property_id))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }
}
