pub mod api;
pub mod base_api_router;
pub mod base_router;
pub mod crud_api_router;
pub mod data_api_router;
mod entry;

pub use base_router::{BaseRouter, Method};
pub use crud_api_router::CrudApiRouter;
pub use data_api_router::DataApiRouter;
pub use entry::{API_PREFIX, app, router};
