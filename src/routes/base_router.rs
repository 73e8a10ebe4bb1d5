use std::{collections::HashMap, convert::Infallible, sync::Arc};

use axum::{
    Router,
    extract::{FromRef, Request},
    response::Response,
    routing::{MethodRouter, Route},
};
use tower::{Layer, Service, util::BoxCloneSyncServiceLayer};

use crate::state::AppState;

/// Anything that can mount its routes into the API router.
pub trait BaseRouter {
    fn router_for<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
        Arc<AppState>: FromRef<S>;
}

/// The operations a generated router can expose.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Method {
    Create,
    List,
    Get,
    Patch,
    Delete,
}

pub const ALL_METHODS: [Method; 5] = [
    Method::Create,
    Method::List,
    Method::Get,
    Method::Patch,
    Method::Delete,
];

pub const READ_METHODS: [Method; 2] = [Method::List, Method::Get];

pub const WRITE_METHODS: [Method; 3] = [Method::Create, Method::Patch, Method::Delete];

type MethodLayer = BoxCloneSyncServiceLayer<Route<Infallible>, Request, Response, Infallible>;

/// Route layers registered per `Method`, applied in registration order.
#[derive(Clone, Default)]
pub struct MethodLayers {
    layers: HashMap<Method, Vec<MethodLayer>>,
}

impl MethodLayers {
    pub fn push<L>(&mut self, method: Method, layer: L)
    where
        L: Layer<Route<Infallible>> + Clone + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = Infallible>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.layers
            .entry(method)
            .or_default()
            .push(BoxCloneSyncServiceLayer::new(layer));
    }

    pub fn apply<S>(&self, method: Method, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        match self.layers.get(&method) {
            Some(layers) => layers
                .iter()
                .fold(route, |route, layer| route.route_layer(layer.clone())),
            None => route,
        }
    }
}
