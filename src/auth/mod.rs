pub mod bootstrap;
pub mod jwt;
pub mod local;
pub mod password;
mod types;

pub use local::LocalAuth;
pub use types::{Claims, Role, TokenBundle};
