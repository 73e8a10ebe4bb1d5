use std::sync::Arc;

use axum::Router;

use super::{Access, crud_routes, data_routes};
use crate::{routes::base_router::ALL_METHODS, state::AppState};

const BASE_PATH: &str = "/agency";
const ACCESS: Access = Access::PUBLIC_READ;

pub fn router(state: Arc<AppState>) -> Router {
    let services = state.services();
    Router::new()
        .merge(crud_routes(&state, services.agencies(), BASE_PATH, ACCESS, &ALL_METHODS))
        .merge(data_routes(&state, services.agency_data(), BASE_PATH, ACCESS))
        .with_state(state)
}
