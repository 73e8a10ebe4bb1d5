use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: i32 },
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

/// Short entity name for messages, e.g. `estate_api::db::entities::property::Entity` -> `property`.
pub(crate) fn entity_label<E>() -> &'static str {
    let full = std::any::type_name::<E>();
    let trimmed = full.strip_suffix("::Entity").unwrap_or(full);
    trimmed.rsplit("::").next().unwrap_or(trimmed)
}
