use std::{convert::Infallible, sync::Arc};

use axum::{
    Router,
    extract::{FromRef, Request},
    response::Response,
    routing::{MethodRouter, Route},
};
use tower::{Layer, Service};

use super::{
    base_api_router::BaseApiRouter,
    base_router::{ALL_METHODS, BaseRouter, Method, MethodLayers},
};
use crate::{services::crud_service::CrudService, state::AppState};

/// CRUD routes for one service, configured with the methods it exposes and
/// the route layers (usually auth guards) each method gets.
pub struct CrudApiRouter<S> {
    service: S,
    base_path: &'static str,
    allowed_methods: Vec<Method>,
    method_middlewares: MethodLayers,
}

impl<S> CrudApiRouter<S> {
    pub fn new(service: S, base_path: &'static str) -> Self {
        Self {
            service,
            base_path,
            allowed_methods: ALL_METHODS.to_vec(),
            method_middlewares: MethodLayers::default(),
        }
    }

    pub fn set_allowed_methods(mut self, methods: &[Method]) -> Self {
        self.allowed_methods = methods.to_vec();
        self
    }

    pub fn set_methods_middleware<L>(mut self, methods: &[Method], layer: L) -> Self
    where
        L: Layer<Route<Infallible>> + Clone + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = Infallible>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        for method in methods {
            self.method_middlewares.push(*method, layer.clone());
        }
        self
    }
}

impl<S> CrudApiRouter<S>
where
    S: CrudService + Clone + 'static,
{
    pub fn router<State>(self) -> Router<State>
    where
        State: Clone + Send + Sync + 'static,
        Arc<AppState>: FromRef<State>,
    {
        self.router_for()
    }
}

impl<S> BaseApiRouter for CrudApiRouter<S>
where
    S: CrudService + Clone + 'static,
{
    type Service = S;

    fn service(&self) -> Self::Service {
        self.service.clone()
    }

    fn base_path(&self) -> &'static str {
        self.base_path
    }

    fn allowed_methods(&self) -> &[Method] {
        self.allowed_methods.as_slice()
    }

    fn apply_method_middleware<State>(
        &self,
        method: Method,
        route: MethodRouter<State>,
    ) -> MethodRouter<State>
    where
        State: Clone + Send + Sync + 'static,
    {
        self.method_middlewares.apply(method, route)
    }
}

impl<S> BaseRouter for CrudApiRouter<S>
where
    S: CrudService + Clone + 'static,
{
    fn router_for<State>(&self) -> Router<State>
    where
        State: Clone + Send + Sync + 'static,
        Arc<AppState>: FromRef<State>,
    {
        self.crud_router()
    }
}
