use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::result::DatabaseErrorKind;
use serde::Serialize;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Blocking task failed")]
    Blocking(#[from] actix_web::error::BlockingError),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<diesel::result::Error> for CatalogError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => CatalogError::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation => {
                    CatalogError::ConstraintViolation(info.message().to_string())
                }
                other => CatalogError::Database(diesel::result::Error::DatabaseError(other, info)),
            },
            other => CatalogError::Database(other),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CatalogError::ConstraintViolation(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            // internals stay in the log, not in the response
            log::error!("{}", self);
            return HttpResponse::build(status).json(ErrorBody {
                error: "Internal server error",
            });
        }
        HttpResponse::build(status).json(ErrorBody {
            error: &self.to_string(),
        })
    }
}
