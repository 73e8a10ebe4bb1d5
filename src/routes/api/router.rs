use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{
    agencies, auth, documents, faqs, favorites, properties, protected, public, roles, users,
    visits,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router())
        .merge(auth::router(Arc::clone(&state)))
        .merge(protected::router(Arc::clone(&state)))
        .merge(users::router(Arc::clone(&state)))
        .merge(roles::router(Arc::clone(&state)))
        .merge(agencies::router(Arc::clone(&state)))
        .merge(properties::router(Arc::clone(&state)))
        .merge(documents::router(Arc::clone(&state)))
        .merge(faqs::router(Arc::clone(&state)))
        .merge(visits::router(Arc::clone(&state)))
        .merge(favorites::router(state))
}
