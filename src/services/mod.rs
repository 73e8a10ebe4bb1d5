pub mod agency_service;
pub mod context;
pub mod crud_service;
pub mod data_service;
pub mod document_service;
pub mod faq_service;
pub mod favorite_service;
pub mod filters;
pub mod property_service;
pub mod role_service;
pub mod user_service;
pub mod validation;
pub mod visit_service;

pub use context::ServiceContext;
