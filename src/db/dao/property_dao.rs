use sea_orm::sea_query::Query;
use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Select};

use super::DaoBase;
use crate::db::entities::prelude::Property;
use crate::db::entities::{property, property_data};

#[derive(Clone)]
pub struct PropertyDao {
    db: DatabaseConnection,
}

impl DaoBase for PropertyDao {
    type Entity = Property;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl PropertyDao {
    /// Restricts `query` to properties carrying a `key = value` data entry.
    /// Both values are bound as parameters.
    pub fn with_data_entry(query: Select<Property>, key: &str, value: &str) -> Select<Property> {
        let matching = Query::select()
            .column(property_data::Column::PropertyId)
            .from(property_data::Entity)
            .and_where(property_data::Column::Key.eq(key))
            .and_where(property_data::Column::Value.eq(value))
            .to_owned();
        query.filter(property::Column::Id.in_subquery(matching))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    use super::PropertyDao;
    use crate::db::entities::prelude::Property;

    #[test]
    fn data_entry_filter_uses_bound_parameters() {
        let statement = PropertyDao::with_data_entry(Property::find(), "parking", "yes'; --")
            .build(DbBackend::Postgres);

        assert!(statement.sql.contains("IN (SELECT"));
        assert!(statement.sql.contains("\"property_data\""));
        assert!(!statement.sql.contains("yes'; --"));
        let values = statement.values.expect("statement should carry values");
        assert_eq!(values.0.len(), 2);
    }
}
