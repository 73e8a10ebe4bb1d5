use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::LocalAuth, config::AppConfig, services::ServiceContext};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub auth: LocalAuth,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        auth: LocalAuth,
    ) -> Arc<Self> {
        Arc::new(Self {
            db,
            config,
            auth,
        })
    }

    pub fn services(&self) -> ServiceContext {
        ServiceContext::from_state(self)
    }
}
