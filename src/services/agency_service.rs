use sea_orm::Set;
use serde::Deserialize;

use crate::{
    db::dao::AgencyDao,
    db::entities::agency,
    error::AppError,
    services::{
        crud_service::CrudService,
        validation::{email, optional_email, optional_text, required_text},
    },
};

#[derive(Debug, Deserialize)]
pub struct NewAgency {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AgencyPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct AgencyService {
    agencies: AgencyDao,
}

impl AgencyService {
    pub fn new(agencies: AgencyDao) -> Self {
        Self { agencies }
    }
}

#[async_trait::async_trait]
impl CrudService for AgencyService {
    type Dao = AgencyDao;
    type Create = NewAgency;
    type Update = AgencyPatch;

    fn dao(&self) -> &Self::Dao {
        &self.agencies
    }

    fn label(&self) -> &'static str {
        "Agency"
    }

    fn build_create(
        &self,
        payload: NewAgency,
        _actor_id: i32,
    ) -> Result<agency::ActiveModel, AppError> {
        Ok(agency::ActiveModel {
            name: Set(required_text("name", &payload.name)?),
            email: Set(optional_email("email", payload.email)?),
            phone: Set(optional_text(payload.phone)),
            address: Set(optional_text(payload.address)),
            city: Set(optional_text(payload.city)),
            description: Set(optional_text(payload.description)),
            ..Default::default()
        })
    }

    fn validate_update(&self, payload: &AgencyPatch) -> Result<(), AppError> {
        if let Some(name) = &payload.name {
            required_text("name", name)?;
        }
        if let Some(address) = &payload.email {
            email("email", address)?;
        }
        Ok(())
    }

    fn apply_update(
        &self,
        active: &mut agency::ActiveModel,
        payload: AgencyPatch,
    ) -> Result<(), AppError> {
        if let Some(name) = payload.name {
            active.name = Set(required_text("name", &name)?);
        }
        if let Some(address) = payload.email {
            active.email = Set(Some(email("email", &address)?));
        }
        if let Some(phone) = payload.phone {
            active.phone = Set(optional_text(Some(phone)));
        }
        if let Some(address) = payload.address {
            active.address = Set(optional_text(Some(address)));
        }
        if let Some(city) = payload.city {
            active.city = Set(optional_text(Some(city)));
        }
        if let Some(description) = payload.description {
            active.description = Set(optional_text(Some(description)));
        }
        Ok(())
    }
}
