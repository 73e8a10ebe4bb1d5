use std::sync::Arc;

use axum::{Router, routing::get};
use serde::Serialize;

use crate::{
    auth::Role,
    db::entities::user,
    middleware::Actor,
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: user::Model,
    pub roles: Vec<Role>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/me", get(me)).with_state(state)
}

async fn me(actor: Actor) -> ApiResult<Profile> {
    JsonApiResponse::ok(Profile {
        roles: actor.claims.roles.clone(),
        user: actor.user,
    })
}
