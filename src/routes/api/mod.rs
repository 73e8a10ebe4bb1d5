pub mod agencies;
pub mod auth;
pub mod documents;
pub mod faqs;
pub mod favorites;
pub mod properties;
pub mod protected;
pub mod public;
pub mod roles;
mod router;
pub mod users;
pub mod visits;

use std::sync::Arc;

use axum::Router;

use crate::{
    auth::Role,
    db::dao::{DaoBase, DataDao},
    middleware::AuthRolGuardLayer,
    routes::{
        CrudApiRouter, DataApiRouter,
        base_router::{Method, READ_METHODS, WRITE_METHODS},
    },
    services::{crud_service::CrudService, data_service::DataService},
    state::AppState,
};

pub use router::router;

/// Role required to read (`None` is public) and to write a resource.
#[derive(Clone, Copy, Debug)]
pub struct Access {
    pub read: Option<Role>,
    pub write: Role,
}

impl Access {
    pub const PUBLIC_READ: Self = Self {
        read: None,
        write: Role::User,
    };
    pub const USERS_ONLY: Self = Self {
        read: Some(Role::User),
        write: Role::User,
    };
    pub const ADMIN_WRITE: Self = Self {
        read: Some(Role::User),
        write: Role::Admin,
    };
}

pub(crate) fn crud_routes<S>(
    state: &Arc<AppState>,
    service: S,
    base_path: &'static str,
    access: Access,
    methods: &[Method],
) -> Router<Arc<AppState>>
where
    S: CrudService + Clone + 'static,
{
    let mut router = CrudApiRouter::new(service, base_path)
        .set_allowed_methods(methods)
        .set_methods_middleware(
            &WRITE_METHODS,
            AuthRolGuardLayer::new(Arc::clone(state), access.write),
        );
    if let Some(role) = access.read {
        router = router
            .set_methods_middleware(&READ_METHODS, AuthRolGuardLayer::new(Arc::clone(state), role));
    }
    router.router()
}

pub(crate) fn data_routes<P, D>(
    state: &Arc<AppState>,
    service: DataService<P, D>,
    base_path: &'static str,
    access: Access,
) -> Router<Arc<AppState>>
where
    P: DaoBase + 'static,
    D: DataDao + 'static,
{
    let mut router = DataApiRouter::new(service, base_path).set_methods_middleware(
        &WRITE_METHODS,
        AuthRolGuardLayer::new(Arc::clone(state), access.write),
    );
    if let Some(role) = access.read {
        router = router
            .set_methods_middleware(&READ_METHODS, AuthRolGuardLayer::new(Arc::clone(state), role));
    }
    router.router()
}
