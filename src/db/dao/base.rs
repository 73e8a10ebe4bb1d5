use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait, LikeExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, Order, PrimaryKeyTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

use super::base_traits::{AuditedActiveModel, HasCreatedAtColumn, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult, entity_label};

#[derive(Debug, serde::Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub has_next: bool,
}

#[derive(Debug, Clone)]
pub enum FilterOp {
    Eq(sea_orm::sea_query::Value),
    Compare {
        op: CompareOp,
        value: sea_orm::sea_query::Value,
    },
    Like { pattern: String, escape: char },
    Between {
        min: sea_orm::sea_query::Value,
        max: sea_orm::sea_query::Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Lte,
    Gt,
    Gte,
}

#[derive(Debug, Clone)]
pub struct ColumnFilter<C> {
    pub column: C,
    pub op: FilterOp,
}

pub(crate) type DaoModel<D> = <<D as DaoBase>::Entity as EntityTrait>::Model;
pub(crate) type DaoActiveModel<D> = <<D as DaoBase>::Entity as EntityTrait>::ActiveModel;
pub(crate) type DaoColumn<D> = <<D as DaoBase>::Entity as EntityTrait>::Column;

/// Rows skipped before `page`, if the database can bind it as a signed
/// 64-bit offset.
fn page_offset(page: u64, page_size: u64) -> Option<u64> {
    (page - 1)
        .checked_mul(page_size)
        .filter(|offset| *offset <= i64::MAX as u64)
}

fn apply_filter<E>(select: Select<E>, filter: &ColumnFilter<E::Column>) -> Select<E>
where
    E: EntityTrait,
{
    match &filter.op {
        FilterOp::Eq(value) => select.filter(filter.column.eq(value.clone())),
        FilterOp::Compare { op, value } => {
            let expr = Expr::col(filter.column);
            let value = Expr::val(value.clone());
            let expr = match op {
                CompareOp::Lt => expr.lt(value),
                CompareOp::Lte => expr.lte(value),
                CompareOp::Gt => expr.gt(value),
                CompareOp::Gte => expr.gte(value),
            };
            select.filter(expr)
        }
        FilterOp::Like { pattern, escape } => select.filter(
            Expr::col(filter.column).like(LikeExpr::new(pattern).escape(*escape)),
        ),
        FilterOp::Between { min, max } => select.filter(
            Expr::col(filter.column).between(Expr::val(min.clone()), Expr::val(max.clone())),
        ),
    }
}

/// Data access over one sea-orm entity with integer ids and audit columns.
#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized {
    type Entity: EntityTrait<
            Model: FromQueryResult
                       + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel>
                       + serde::Serialize
                       + Clone
                       + Send
                       + Sync,
            ActiveModel: ActiveModelTrait<Entity = Self::Entity>
                             + ActiveModelBehavior
                             + TimestampedActiveModel
                             + AuditedActiveModel
                             + Send
                             + Sync,
            PrimaryKey: PrimaryKeyTrait<ValueType: From<i32> + Send + Sync>,
        > + HasCreatedAtColumn
        + Send
        + Sync;

    const MAX_PAGE_SIZE: u64 = 100;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    fn not_found(id: i32) -> DaoLayerError {
        DaoLayerError::NotFound {
            entity: entity_label::<Self::Entity>(),
            id,
        }
    }

    async fn create(
        &self,
        data: impl IntoActiveModel<DaoActiveModel<Self>> + Send,
    ) -> DaoResult<DaoModel<Self>> {
        let now = Utc::now().fixed_offset();
        let mut active = data.into_active_model();
        active.set_created_at(now);
        active.set_updated_at(now);
        active.insert(self.db()).await.map_err(DaoLayerError::Db)
    }

    async fn find_by_id(&self, id: i32) -> DaoResult<DaoModel<Self>> {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        model.ok_or_else(|| Self::not_found(id))
    }

    async fn exists(&self, id: i32) -> DaoResult<bool> {
        match self.find_by_id(id).await {
            Ok(_) => Ok(true),
            Err(DaoLayerError::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn find(
        &self,
        page: u64,
        page_size: u64,
        order: Option<(DaoColumn<Self>, Order)>,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<PaginatedResponse<DaoModel<Self>>> {
        self.find_with_filters(page, page_size, order, &[], apply)
            .await
    }

    async fn find_with_filters(
        &self,
        page: u64,
        page_size: u64,
        order: Option<(DaoColumn<Self>, Order)>,
        filters: &[ColumnFilter<DaoColumn<Self>>],
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<PaginatedResponse<DaoModel<Self>>> {
        if page == 0 || page_size == 0 || page_size > Self::MAX_PAGE_SIZE {
            return Err(DaoLayerError::InvalidPagination { page, page_size });
        }
        let offset = page_offset(page, page_size)
            .ok_or(DaoLayerError::InvalidPagination { page, page_size })?;

        let filtered = filters
            .iter()
            .fold(apply(Self::Entity::find()), apply_filter::<Self::Entity>);
        let ordered = match order {
            Some((column, order)) => filtered.order_by(column, order),
            None => filtered.order_by_desc(Self::Entity::created_at_column()),
        };
        let fetch_size = page_size.saturating_add(1);
        let mut data = ordered
            .limit(fetch_size)
            .offset(offset)
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        let has_next = data.len() > page_size as usize;
        if has_next {
            data.truncate(page_size as usize);
        }

        Ok(PaginatedResponse {
            data,
            page,
            page_size,
            has_next,
        })
    }

    async fn update<F>(&self, id: i32, apply: F) -> DaoResult<DaoModel<Self>>
    where
        F: for<'a> FnOnce(&'a mut DaoActiveModel<Self>) + Send,
    {
        let model = self.find_by_id(id).await?;

        let mut active = model.into_active_model();
        apply(&mut active);
        self.save_changes(active).await
    }

    /// Persists an already-loaded row whose changed columns are `Set`.
    async fn save_changes(&self, mut active: DaoActiveModel<Self>) -> DaoResult<DaoModel<Self>> {
        active.set_updated_at(Utc::now().fixed_offset());
        active.update(self.db()).await.map_err(DaoLayerError::Db)
    }

    /// Removes the row and hands back what was stored.
    async fn delete(&self, id: i32) -> DaoResult<DaoModel<Self>> {
        let model = self.find_by_id(id).await?;
        let result = Self::Entity::delete_by_id(id)
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::page_offset;

    #[test]
    fn offset_starts_at_zero_on_first_page() {
        assert_eq!(page_offset(1, 25), Some(0));
        assert_eq!(page_offset(3, 25), Some(50));
    }

    #[test]
    fn offset_outside_signed_range_is_rejected() {
        assert_eq!(page_offset(100_000_000_000_000_000, 100), None);
        assert_eq!(page_offset(u64::MAX, 1), None);
        assert_eq!(page_offset(i64::MAX as u64 + 1, 1), Some(i64::MAX as u64));
        assert_eq!(page_offset(i64::MAX as u64 + 2, 1), None);
    }
}
