use chrono::{DateTime, FixedOffset};
use sea_orm::Set;
use serde::Deserialize;

use crate::{
    db::dao::{PropertyDao, UserDao, VisitDao},
    db::entities::visit,
    error::AppError,
    services::{
        crud_service::{CrudService, require_exists},
        validation::{one_of, optional_text, supplied},
    },
};

pub const VISIT_STATUSES: &[&str] = &["pending", "confirmed", "cancelled", "done"];
const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Deserialize)]
pub struct NewVisit {
    pub property_id: i32,
    /// Defaults to the caller.
    pub user_id: Option<i32>,
    pub scheduled_at: DateTime<FixedOffset>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VisitPatch {
    pub property_id: Option<i32>,
    pub user_id: Option<i32>,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct VisitService {
    visits: VisitDao,
    properties: PropertyDao,
    users: UserDao,
}

impl VisitService {
    pub fn new(visits: VisitDao, properties: PropertyDao, users: UserDao) -> Self {
        Self {
            visits,
            properties,
            users,
        }
    }
}

fn status(raw: &str) -> Result<String, AppError> {
    one_of("status", raw, VISIT_STATUSES)
}

#[async_trait::async_trait]
impl CrudService for VisitService {
    type Dao = VisitDao;
    type Create = NewVisit;
    type Update = VisitPatch;

    fn dao(&self) -> &Self::Dao {
        &self.visits
    }

    fn label(&self) -> &'static str {
        "Visit"
    }

    fn build_create(&self, payload: NewVisit, actor_id: i32) -> Result<visit::ActiveModel, AppError> {
        let status = match payload.status.as_deref() {
            Some(raw) => status(raw)?,
            None => DEFAULT_STATUS.to_string(),
        };
        Ok(visit::ActiveModel {
            property_id: Set(payload.property_id),
            user_id: Set(payload.user_id.unwrap_or(actor_id)),
            scheduled_at: Set(payload.scheduled_at),
            status: Set(status),
            notes: Set(optional_text(payload.notes)),
            ..Default::default()
        })
    }

    fn validate_update(&self, payload: &VisitPatch) -> Result<(), AppError> {
        if let Some(raw) = &payload.status {
            status(raw)?;
        }
        Ok(())
    }

    fn apply_update(&self, active: &mut visit::ActiveModel, payload: VisitPatch) -> Result<(), AppError> {
        if let Some(property_id) = payload.property_id {
            active.property_id = Set(property_id);
        }
        if let Some(user_id) = payload.user_id {
            active.user_id = Set(user_id);
        }
        if let Some(scheduled_at) = payload.scheduled_at {
            active.scheduled_at = Set(scheduled_at);
        }
        if let Some(raw) = payload.status {
            active.status = Set(status(&raw)?);
        }
        if let Some(notes) = payload.notes {
            active.notes = Set(optional_text(Some(notes)));
        }
        Ok(())
    }

    async fn check_constraints(
        &self,
        active: &visit::ActiveModel,
        _id: Option<i32>,
    ) -> Result<(), AppError> {
        if let Some(property_id) = supplied(&active.property_id) {
            require_exists(&self.properties, *property_id, "Property").await?;
        }
        if let Some(user_id) = supplied(&active.user_id) {
            require_exists(&self.users, *user_id, "User").await?;
        }
        Ok(())
    }
}
