use sea_orm::DatabaseConnection;

use crate::{
    db::dao::{
        AgencyDao, AgencyDataDao, DaoContext, DocumentDao, DocumentDataDao, FaqDao, FaqDataDao,
        PropertyDao, PropertyDataDao, VisitDao, VisitDataDao,
    },
    services::{
        agency_service::AgencyService, data_service::DataService,
        document_service::DocumentService, faq_service::FaqService,
        favorite_service::FavoriteService, property_service::PropertyService,
        role_service::RoleService, user_service::UserService, visit_service::VisitService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn daos(&self) -> &DaoContext {
        &self.daos
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.daos.user(), self.daos.role())
    }

    pub fn roles(&self) -> RoleService {
        RoleService::new(self.daos.role())
    }

    pub fn agencies(&self) -> AgencyService {
        AgencyService::new(self.daos.agency())
    }

    pub fn properties(&self) -> PropertyService {
        PropertyService::new(self.daos.property(), self.daos.agency())
    }

    pub fn documents(&self) -> DocumentService {
        DocumentService::new(self.daos.document(), self.daos.property(), self.daos.user())
    }

    pub fn faqs(&self) -> FaqService {
        FaqService::new(self.daos.faq())
    }

    pub fn visits(&self) -> VisitService {
        VisitService::new(self.daos.visit(), self.daos.property(), self.daos.user())
    }

    pub fn favorites(&self) -> FavoriteService {
        FavoriteService::new(self.daos.favorite(), self.daos.property(), self.daos.user())
    }

    pub fn agency_data(&self) -> DataService<AgencyDao, AgencyDataDao> {
        DataService::new(self.daos.agency(), self.daos.agency_data(), "Agency")
    }

    pub fn property_data(&self) -> DataService<PropertyDao, PropertyDataDao> {
        DataService::new(self.daos.property(), self.daos.property_data(), "Property")
    }

    pub fn document_data(&self) -> DataService<DocumentDao, DocumentDataDao> {
        DataService::new(self.daos.document(), self.daos.document_data(), "Document")
    }

    pub fn faq_data(&self) -> DataService<FaqDao, FaqDataDao> {
        DataService::new(self.daos.faq(), self.daos.faq_data(), "Faq")
    }

    pub fn visit_data(&self) -> DataService<VisitDao, VisitDataDao> {
        DataService::new(self.daos.visit(), self.daos.visit_data(), "Visit")
    }
}
