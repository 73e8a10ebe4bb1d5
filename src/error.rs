use std::error::Error as StdError;

use crate::db::dao::DaoLayerError;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors surfaced to HTTP clients. Each variant maps to one status code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unprocessable(String),
    /// The message is what the client sees; `source` is only logged.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Unprocessable(message)
            | Self::Internal { message, .. } => message.as_str(),
        }
    }
}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { .. } => AppError::not_found(err.to_string()),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
            DaoLayerError::Db(db) => {
                AppError::internal_with_source("Database operation failed", db)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use sea_orm::DbErr;

    use super::AppError;
    use crate::db::dao::DaoLayerError;

    #[test]
    fn db_errors_keep_source_but_hide_details() {
        let err = AppError::from(DaoLayerError::Db(DbErr::Custom(
            "relation \"users\" does not exist".to_string(),
        )));

        assert_eq!(err.message(), "Database operation failed");
        let source = err.source().expect("source should be kept");
        assert!(source.to_string().contains("does not exist"));
    }

    #[test]
    fn pagination_errors_are_bad_requests() {
        let err = AppError::from(DaoLayerError::InvalidPagination {
            page: 0,
            page_size: 10,
        });
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
