use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        FromRef, Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{MethodRouter, delete, get, patch, post},
};

use super::base_router::Method;
use crate::{
    error::AppError,
    middleware::Actor,
    response::JsonApiResponse,
    services::crud_service::CrudService,
    state::AppState,
};

pub(crate) type CreateOf<S> = <S as CrudService>::Create;
pub(crate) type UpdateOf<S> = <S as CrudService>::Update;

pub const DEFAULT_PAGE_SIZE: u64 = 25;

const INVALID_PAYLOAD_MESSAGE: &str = "Invalid payload";
const INVALID_QUERY_MESSAGE: &str = "Invalid query";

/// `page`/`page_size` split off the query string; everything else is a filter.
#[derive(Debug)]
pub struct ListParams {
    pub page: u64,
    pub page_size: u64,
    pub filters: HashMap<String, String>,
}

impl ListParams {
    pub fn from_query(
        mut query: HashMap<String, String>,
        default_page_size: u64,
    ) -> Result<Self, AppError> {
        let page = take_number(&mut query, "page")?.unwrap_or(1);
        let page_size = take_number(&mut query, "page_size")?.unwrap_or(default_page_size);
        Ok(Self {
            page,
            page_size,
            filters: query,
        })
    }
}

fn take_number(query: &mut HashMap<String, String>, name: &str) -> Result<Option<u64>, AppError> {
    query
        .remove(name)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                AppError::bad_request(format!(
                    "{INVALID_QUERY_MESSAGE}: {name} must be a positive integer"
                ))
            })
        })
        .transpose()
}

/// Malformed JSON is a 400; well-formed JSON that does not fit the DTO is a 422.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::JsonDataError(err)) => Err(AppError::unprocessable(format!(
            "{INVALID_PAYLOAD_MESSAGE}: {}",
            err.body_text()
        ))),
        Err(err) => Err(AppError::bad_request(format!(
            "{INVALID_PAYLOAD_MESSAGE}: {}",
            err.body_text()
        ))),
    }
}

pub fn path_value<T>(path: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    path.map(|Path(value)| value)
        .map_err(|err| AppError::bad_request(format!("Invalid path: {}", err.body_text())))
}

pub fn query_map(
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<HashMap<String, String>, AppError> {
    query
        .map(|Query(query)| query)
        .map_err(|err| AppError::bad_request(format!("{INVALID_QUERY_MESSAGE}: {}", err.body_text())))
}

/// Builds `POST {base}`, `GET {base}`, `GET|PATCH|DELETE {base}/{id}` over a
/// `CrudService`. Mutations resolve the caller through the `Actor` extractor.
pub trait BaseApiRouter {
    type Service: CrudService + Clone + 'static;

    fn service(&self) -> Self::Service;
    fn base_path(&self) -> &'static str;

    fn allowed_methods(&self) -> &[Method];

    fn apply_method_middleware<S>(&self, _method: Method, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        route
    }

    fn crud_router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
        Arc<AppState>: FromRef<S>,
    {
        let base = self.base_path();
        let id_path = format!("{base}/{{id}}");
        let allowed = self.allowed_methods();
        let mut router = Router::<S>::new();

        if allowed.contains(&Method::Create) {
            let route = post({
                let service = self.service();
                move |actor: Actor,
                      payload: Result<Json<CreateOf<Self::Service>>, JsonRejection>| async move {
                    let payload = json_body(payload)?;
                    let model = service.create_as(actor.id(), payload).await?;
                    JsonApiResponse::created(model)
                }
            });
            router = router.route(base, self.apply_method_middleware(Method::Create, route));
        }

        if allowed.contains(&Method::List) {
            let route = get({
                let service = self.service();
                move |query: Result<Query<HashMap<String, String>>, QueryRejection>| async move {
                    let params = ListParams::from_query(query_map(query)?, DEFAULT_PAGE_SIZE)?;
                    let response = service
                        .list(params.page, params.page_size, params.filters)
                        .await?;
                    JsonApiResponse::ok(response)
                }
            });
            router = router.route(base, self.apply_method_middleware(Method::List, route));
        }

        if allowed.contains(&Method::Get) {
            let route = get({
                let service = self.service();
                move |id: Result<Path<i32>, PathRejection>| async move {
                    let model = service.find_by_id(path_value(id)?).await?;
                    JsonApiResponse::ok(model)
                }
            });
            router = router.route(&id_path, self.apply_method_middleware(Method::Get, route));
        }

        if allowed.contains(&Method::Patch) {
            let route = patch({
                let service = self.service();
                move |actor: Actor,
                      id: Result<Path<i32>, PathRejection>,
                      payload: Result<Json<UpdateOf<Self::Service>>, JsonRejection>| async move {
                    let id = path_value(id)?;
                    let payload = json_body(payload)?;
                    let model = service.update_as(actor.id(), id, payload).await?;
                    JsonApiResponse::ok(model)
                }
            });
            router = router.route(&id_path, self.apply_method_middleware(Method::Patch, route));
        }

        if allowed.contains(&Method::Delete) {
            let route = delete({
                let service = self.service();
                move |_actor: Actor, id: Result<Path<i32>, PathRejection>| async move {
                    let model = service.delete(path_value(id)?).await?;
                    JsonApiResponse::with_status(StatusCode::OK, "deleted", model)
                }
            });
            router = router.route(
                &id_path,
                self.apply_method_middleware(Method::Delete, route),
            );
        }

        router
    }
}
