use std::{convert::Infallible, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        FromRef, Path, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Response,
    routing::{Route, delete, get, patch, post},
};
use tower::{Layer, Service};

use super::{
    base_api_router::{json_body, path_value},
    base_router::{BaseRouter, Method, MethodLayers},
};
use crate::{
    db::dao::{DaoBase, DataDao},
    middleware::Actor,
    response::JsonApiResponse,
    services::data_service::{DataService, DataValueUpdate, NewDataEntries},
    state::AppState,
};

/// `{base}/{id}/data` and `{base}/{id}/data/{key}` over one parent's
/// key/value side-table.
pub struct DataApiRouter<P, D> {
    service: DataService<P, D>,
    base_path: &'static str,
    method_middlewares: MethodLayers,
}

impl<P, D> DataApiRouter<P, D>
where
    P: DaoBase + 'static,
    D: DataDao + 'static,
{
    pub fn new(service: DataService<P, D>, base_path: &'static str) -> Self {
        Self {
            service,
            base_path,
            method_middlewares: MethodLayers::default(),
        }
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

    pub fn router<State>(self) -> Router<State>
    where
        State: Clone + Send + Sync + 'static,
        Arc<AppState>: FromRef<State>,
    {
        self.router_for()
    }
}

impl<P, D> BaseRouter for DataApiRouter<P, D>
where
    P: DaoBase + 'static,
    D: DataDao + 'static,
{
    fn router_for<State>(&self) -> Router<State>
    where
        State: Clone + Send + Sync + 'static,
        Arc<AppState>: FromRef<State>,
    {
        let collection = format!("{}/{{id}}/data", self.base_path);
        let entry = format!("{collection}/{{key}}");
        let layers = &self.method_middlewares;

        let list = get({
            let service = self.service.clone();
            move |id: Result<Path<i32>, PathRejection>| async move {
                let entries = service.list(path_value(id)?).await?;
                JsonApiResponse::ok(entries)
            }
        });
        let add = post({
            let service = self.service.clone();
            move |actor: Actor,
                  id: Result<Path<i32>, PathRejection>,
                  payload: Result<Json<NewDataEntries>, JsonRejection>| async move {
                let parent_id = path_value(id)?;
                let payload = json_body(payload)?;
                let entries = service.add(parent_id, actor.id(), payload).await?;
                JsonApiResponse::created(entries)
            }
        });
        let fetch = get({
            let service = self.service.clone();
            move |path: Result<Path<(i32, String)>, PathRejection>| async move {
                let (parent_id, key) = path_value(path)?;
                let entry = service.get(parent_id, &key).await?;
                JsonApiResponse::ok(entry)
            }
        });
        let update = patch({
            let service = self.service.clone();
            move |actor: Actor,
                  path: Result<Path<(i32, String)>, PathRejection>,
                  payload: Result<Json<DataValueUpdate>, JsonRejection>| async move {
                let (parent_id, key) = path_value(path)?;
                let payload = json_body(payload)?;
                let entry = service.update(parent_id, actor.id(), &key, payload).await?;
                JsonApiResponse::ok(entry)
            }
        });
        let remove = delete({
            let service = self.service.clone();
            move |_actor: Actor, path: Result<Path<(i32, String)>, PathRejection>| async move {
                let (parent_id, key) = path_value(path)?;
                let entry = service.delete(parent_id, &key).await?;
                JsonApiResponse::with_status(StatusCode::OK, "deleted", entry)
            }
        });

        Router::new()
            .route(
                &collection,
                layers
                    .apply(Method::List, list)
                    .merge(layers.apply(Method::Create, add)),
            )
            .route(
                &entry,
                layers
                    .apply(Method::Get, fetch)
                    .merge(layers.apply(Method::Patch, update))
                    .merge(layers.apply(Method::Delete, remove)),
            )
    }
}
