use std::sync::Arc;

use axum::Router;

use super::{Access, crud_routes};
use crate::{routes::base_router::ALL_METHODS, state::AppState};

const BASE_PATH: &str = "/users";

pub fn router(state: Arc<AppState>) -> Router {
    let service = state.services().users();
    crud_routes(&state, service, BASE_PATH, Access::ADMIN_WRITE, &ALL_METHODS).with_state(state)
}
