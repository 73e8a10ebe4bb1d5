//! `/properties` plus its `data` sub-resource. Listing accepts the search
//! parameters handled by `PropertyService`, including `data.<key>=<value>`.

use std::sync::Arc;

use axum::Router;

use super::{Access, crud_routes, data_routes};
use crate::{routes::base_router::ALL_METHODS, state::AppState};

const BASE_PATH: &str = "/properties";

pub fn router(state: Arc<AppState>) -> Router {
    let services = state.services();
    Router::new()
        .merge(crud_routes(
            &state,
            services.properties(),
            BASE_PATH,
            Access::PUBLIC_READ,
            &ALL_METHODS,
        ))
        .merge(data_routes(
            &state,
            services.property_data(),
            BASE_PATH,
            Access::PUBLIC_READ,
        ))
        .with_state(state)
}
