use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::refresh_token::{self, Entity as RefreshToken};

pub const REFRESH_TTL_DAYS: i64 = 30;

/// Opaque refresh tokens. A token is used once: refreshing revokes it and
/// issues its successor in the same transaction. Rows are stamped with the
/// owning user as creator and revoker.
#[derive(Clone)]
pub struct RefreshTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for RefreshTokenDao {
    type Entity = RefreshToken;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn new_token(user_id: i32) -> refresh_token::ActiveModel {
    let now = Utc::now().fixed_offset();
    refresh_token::ActiveModel {
        token: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        expires_at: Set(now + Duration::days(REFRESH_TTL_DAYS)),
        revoked: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(Some(user_id)),
        updated_by: Set(Some(user_id)),
        ..Default::default()
    }
}

async fn insert_token<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> DaoResult<refresh_token::Model> {
    new_token(user_id)
        .insert(conn)
        .await
        .map_err(DaoLayerError::Db)
}

impl RefreshTokenDao {
    pub async fn issue(&self, user_id: i32) -> DaoResult<refresh_token::Model> {
        insert_token(&self.db, user_id).await
    }

    /// The stored token if it has not been revoked. Expiry is left to the caller.
    pub async fn find_unrevoked(&self, token: &str) -> DaoResult<Option<refresh_token::Model>> {
        RefreshToken::find()
            .filter(refresh_token::Column::Token.eq(token))
            .filter(refresh_token::Column::Revoked.eq(false))
            .one(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Revokes `current` and issues its replacement atomically.
    ///
    /// Returns `None` when `current` was revoked in the meantime, so a token
    /// presented twice concurrently yields a single successor.
    pub async fn rotate(
        &self,
        current: &refresh_token::Model,
    ) -> DaoResult<Option<refresh_token::Model>> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;
        let revoked = RefreshToken::update_many()
            .col_expr(refresh_token::Column::Revoked, Expr::value(true))
            .col_expr(
                refresh_token::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .col_expr(
                refresh_token::Column::UpdatedBy,
                Expr::value(Some(current.user_id)),
            )
            .filter(refresh_token::Column::Id.eq(current.id))
            .filter(refresh_token::Column::Revoked.eq(false))
            .exec(&txn)
            .await
            .map_err(DaoLayerError::Db)?;
        if revoked.rows_affected == 0 {
            txn.rollback().await.map_err(DaoLayerError::Db)?;
            return Ok(None);
        }

        let next = insert_token(&txn, current.user_id).await?;
        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(Some(next))
    }
}
