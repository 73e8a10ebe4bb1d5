use std::{
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    http::{Request as HttpRequest, header},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::{auth::Role, error::AppError, state::AppState};

/// Verifies the bearer token with the local authenticator and requires
/// `required` among its roles. The claims are stored in request extensions.
#[derive(Clone)]
pub struct AuthRolGuardLayer {
    state: Arc<AppState>,
    required: Role,
}

impl AuthRolGuardLayer {
    pub fn new(state: Arc<AppState>, required: Role) -> Self {
        Self { state, required }
    }
}

#[derive(Clone)]
pub struct RequireRole<S> {
    inner: S,
    state: Arc<AppState>,
    required: Role,
}

impl<S> Layer<S> for AuthRolGuardLayer {
    type Service = RequireRole<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireRole {
            inner,
            state: Arc::clone(&self.state),
            required: self.required,
        }
    }
}

impl<S> Service<HttpRequest<Body>> for RequireRole<S>
where
    S: Service<HttpRequest<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: HttpRequest<Body>) -> Self::Future {
        let required = self.required;
        let state = Arc::clone(&self.state);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let claims = match state.auth.verify_bearer(header.as_deref()) {
                Ok(claims) => claims,
                Err(err) => return Ok(err.into_response()),
            };

            if !claims.has_role(required) {
                return Ok(AppError::forbidden("Missing required role").into_response());
            }

            req.extensions_mut().insert(claims);
            inner.call(req).await
        })
    }
}
