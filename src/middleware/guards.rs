use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::{
    auth::Claims,
    db::dao::{DaoBase, DaoLayerError},
    db::entities::user,
    error::AppError,
    state::AppState,
};

// Reuses claims stored by `AuthRolGuardLayer`, otherwise verifies the header.
impl<S> FromRequestParts<S> for Claims
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>().cloned() {
            return Ok(claims);
        }

        let app = Arc::<AppState>::from_ref(state);
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let claims = app.auth.verify_bearer(header)?;

        parts.extensions.insert(claims.clone());
        Ok(claims)
    }
}

/// The authenticated caller, loaded from `users`. Mutations stamp
/// `created_by`/`updated_by` with its id.
#[derive(Clone, Debug)]
pub struct Actor {
    pub user: user::Model,
    pub claims: Claims,
}

impl Actor {
    pub fn id(&self) -> i32 {
        self.user.id
    }
}

impl<S> FromRequestParts<S> for Actor
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(actor) = parts.extensions.get::<Actor>().cloned() {
            return Ok(actor);
        }

        let claims = Claims::from_request_parts(parts, state).await?;
        let user_id = claims.user_id()?;
        let app = Arc::<AppState>::from_ref(state);
        let user = match app.services().daos().user().find_by_id(user_id).await {
            Ok(user) => user,
            Err(DaoLayerError::NotFound { .. }) => {
                return Err(AppError::not_found("User not found"));
            }
            Err(err) => return Err(err.into()),
        };

        let actor = Self { user, claims };
        parts.extensions.insert(actor.clone());
        Ok(actor)
    }
}
