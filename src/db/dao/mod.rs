pub mod agency_dao;
pub mod base;
pub mod base_traits;
mod context;
pub mod data_dao;
pub mod document_dao;
pub mod error;
pub mod faq_dao;
pub mod favorite_dao;
pub mod property_dao;
pub mod refresh_token_dao;
pub mod role_dao;
pub mod user_dao;
pub mod visit_dao;

pub use agency_dao::AgencyDao;
pub use base::{ColumnFilter, CompareOp, DaoBase, FilterOp, PaginatedResponse};
pub use base_traits::{
    AuditedActiveModel, DataActiveModel, DataEntity, DataModel, HasCreatedAtColumn,
    TimestampedActiveModel,
};
pub use context::DaoContext;
pub use data_dao::{
    AgencyDataDao, DataDao, DocumentDataDao, FaqDataDao, PropertyDataDao, VisitDataDao,
};
pub use document_dao::DocumentDao;
pub use error::{DaoLayerError, DaoResult};
pub use faq_dao::FaqDao;
pub use favorite_dao::FavoriteDao;
pub use property_dao::PropertyDao;
pub use refresh_token_dao::RefreshTokenDao;
pub use role_dao::RoleDao;
pub use user_dao::UserDao;
pub use visit_dao::VisitDao;
