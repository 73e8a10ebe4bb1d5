use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, TransactionTrait,
};

use super::base::{DaoActiveModel, DaoModel};
use super::base_traits::{
    AuditedActiveModel, DataActiveModel, DataEntity, DataModel, TimestampedActiveModel,
};
use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::prelude::{AgencyData, DocumentData, FaqData, PropertyData, VisitData};

/// Key/value rows attached to a parent entity.
///
/// Keys are unique per parent. Uniqueness is checked by callers through
/// [`DataDao::existing_keys`] before [`DataDao::add_entries`].
#[async_trait::async_trait]
pub trait DataDao: DaoBase<Entity: DataEntity> {
    async fn list_entries(&self, parent_id: i32) -> DaoResult<Vec<DaoModel<Self>>> {
        Self::Entity::find()
            .filter(<Self::Entity as DataEntity>::parent_column().eq(parent_id))
            .order_by_asc(<Self::Entity as DataEntity>::key_column())
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn find_entry(&self, parent_id: i32, key: &str) -> DaoResult<Option<DaoModel<Self>>> {
        Self::Entity::find()
            .filter(<Self::Entity as DataEntity>::parent_column().eq(parent_id))
            .filter(<Self::Entity as DataEntity>::key_column().eq(key))
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    /// The subset of `keys` already stored for `parent_id`.
    async fn existing_keys(&self, parent_id: i32, keys: &[String]) -> DaoResult<Vec<String>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let rows = Self::Entity::find()
            .filter(<Self::Entity as DataEntity>::parent_column().eq(parent_id))
            .filter(<Self::Entity as DataEntity>::key_column().is_in(keys.iter().cloned()))
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(rows.iter().map(|row| row.key().to_string()).collect())
    }

    /// Inserts every entry in one transaction; nothing is stored if any insert fails.
    async fn add_entries(
        &self,
        parent_id: i32,
        actor: Option<i32>,
        entries: Vec<(String, String)>,
    ) -> DaoResult<Vec<DaoModel<Self>>> {
        let txn = self.db().begin().await.map_err(DaoLayerError::Db)?;
        let now = Utc::now().fixed_offset();
        let mut created = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let mut active = <DaoActiveModel<Self> as DataActiveModel>::new_entry(parent_id, key, value);
            active.set_created_at(now);
            active.set_updated_at(now);
            active.set_created_by(actor);
            active.set_updated_by(actor);
            created.push(active.insert(&txn).await.map_err(DaoLayerError::Db)?);
        }
        txn.commit().await.map_err(DaoLayerError::Db)?;
        Ok(created)
    }

    async fn update_value(
        &self,
        parent_id: i32,
        key: &str,
        value: String,
        actor: Option<i32>,
    ) -> DaoResult<Option<DaoModel<Self>>> {
        let Some(existing) = self.find_entry(parent_id, key).await? else {
            return Ok(None);
        };
        let mut active = existing.into_active_model();
        active.set_value(value);
        active.set_updated_at(Utc::now().fixed_offset());
        active.set_updated_by(actor);
        active
            .update(self.db())
            .await
            .map(Some)
            .map_err(DaoLayerError::Db)
    }

    async fn delete_entry(&self, parent_id: i32, key: &str) -> DaoResult<Option<DaoModel<Self>>> {
        let Some(existing) = self.find_entry(parent_id, key).await? else {
            return Ok(None);
        };
        Self::Entity::delete_many()
            .filter(<Self::Entity as DataEntity>::parent_column().eq(parent_id))
            .filter(<Self::Entity as DataEntity>::key_column().eq(key))
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(Some(existing))
    }
}

macro_rules! data_dao {
    ($name:ident, $entity:ty) => {
        #[derive(Clone)]
        pub struct $name {
            db: DatabaseConnection,
        }

        impl DaoBase for $name {
            type Entity = $entity;

            fn new(db: &DatabaseConnection) -> Self {
                Self { db: db.clone() }
            }

            fn db(&self) -> &DatabaseConnection {
                &self.db
            }
        }

        impl DataDao for $name {}
    };
}

data_dao!(PropertyDataDao, PropertyData);
data_dao!(AgencyDataDao, AgencyData);
data_dao!(DocumentDataDao, DocumentData);
data_dao!(FaqDataDao, FaqData);
data_dao!(VisitDataDao, VisitData);
