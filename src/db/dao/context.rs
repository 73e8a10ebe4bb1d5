use sea_orm::DatabaseConnection;

use super::{
    AgencyDao, AgencyDataDao, DaoBase, DocumentDao, DocumentDataDao, FaqDao, FaqDataDao,
    FavoriteDao, PropertyDao, PropertyDataDao, RefreshTokenDao, RoleDao, UserDao, VisitDao,
    VisitDataDao,
};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn role(&self) -> RoleDao {
        DaoBase::new(&self.db)
    }

    pub fn refresh_token(&self) -> RefreshTokenDao {
        DaoBase::new(&self.db)
    }

    pub fn property(&self) -> PropertyDao {
        DaoBase::new(&self.db)
    }

    pub fn property_data(&self) -> PropertyDataDao {
        DaoBase::new(&self.db)
    }

    pub fn agency(&self) -> AgencyDao {
        DaoBase::new(&self.db)
    }

    pub fn agency_data(&self) -> AgencyDataDao {
        DaoBase::new(&self.db)
    }

    pub fn document(&self) -> DocumentDao {
        DaoBase::new(&self.db)
    }

    pub fn document_data(&self) -> DocumentDataDao {
        DaoBase::new(&self.db)
    }

    pub fn faq(&self) -> FaqDao {
        DaoBase::new(&self.db)
    }

    pub fn faq_data(&self) -> FaqDataDao {
        DaoBase::new(&self.db)
    }

    pub fn visit(&self) -> VisitDao {
        DaoBase::new(&self.db)
    }

    pub fn visit_data(&self) -> VisitDataDao {
        DaoBase::new(&self.db)
    }

    pub fn favorite(&self) -> FavoriteDao {
        DaoBase::new(&self.db)
    }
}
