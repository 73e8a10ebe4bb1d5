mod auth;
mod cors;
mod guards;
mod json_error;
mod panic;

pub use auth::{AuthRolGuardLayer, RequireRole};
pub use cors::cors_layer;
pub use guards::Actor;
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
