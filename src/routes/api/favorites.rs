use std::sync::Arc;

use axum::Router;

use super::{Access, crud_routes};
use crate::{routes::base_router::Method, state::AppState};

const BASE_PATH: &str = "/favorites";

// A favorite is created or removed, never edited.
const METHODS: [Method; 4] = [Method::Create, Method::List, Method::Get, Method::Delete];

pub fn router(state: Arc<AppState>) -> Router {
    let service = state.services().favorites();
    crud_routes(&state, service, BASE_PATH, Access::USERS_ONLY, &METHODS).with_state(state)
}
