use std::{fmt::Display, num::ParseIntError, sync::Arc};

use actix_session::{SessionGetError, SessionInsertError};
use actix_web::{HttpResponse, ResponseError};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;

use crate::database::db_utils;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/** Used for storing the database connection pool while handling requests */
pub struct AppState {
    pub pool: Arc<DbPool>,
}

impl AppState {
    /// Connects to `DATABASE_URL` (falling back to `blog.db`) unless a path
    /// is supplied directly; tests pass `Some(":memory:")`. Creates the
    /// schema if it is absent.
    pub fn new(database_url: Option<&str>) -> Self {
        Self {
            pool: Arc::new(db_utils::init_pool(database_url)),
        }
    }
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

/** Holds the errors we will use during request processing */
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    BadRequest,
    Forbidden,
    NotFound,
    DuplicateEmail,
    DuplicateTitle,
    InternalServerError,
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest => f.write_str("Bad request"),
            AppError::Forbidden => f.write_str("Forbidden"),
            AppError::NotFound => f.write_str("Not found"),
            AppError::DuplicateEmail => f.write_str("Email already registered"),
            AppError::DuplicateTitle => f.write_str("Title already used"),
            AppError::InternalServerError => f.write_str("Internal server error"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            AppError::BadRequest => actix_web::http::StatusCode::BAD_REQUEST,
            AppError::Forbidden => actix_web::http::StatusCode::FORBIDDEN,
            AppError::NotFound => actix_web::http::StatusCode::NOT_FOUND,
            AppError::DuplicateEmail => actix_web::http::StatusCode::BAD_REQUEST,
            AppError::DuplicateTitle => actix_web::http::StatusCode::BAD_REQUEST,
            AppError::InternalServerError => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        HttpResponse::new(self.status_code())
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => AppError::NotFound,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => AppError::BadRequest,
            diesel::result::Error::InvalidCString(_) => AppError::BadRequest,
            diesel::result::Error::QueryBuilderError(_) => AppError::BadRequest,
            diesel::result::Error::DeserializationError(_) => AppError::BadRequest,
            _ => AppError::InternalServerError,
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(_: diesel::r2d2::PoolError) -> Self {
        AppError::InternalServerError
    }
}

impl From<ParseIntError> for AppError {
    fn from(_: ParseIntError) -> Self {
        Self::BadRequest
    }
}

impl From<askama::Error> for AppError {
    fn from(_: askama::Error) -> Self {
        AppError::InternalServerError
    }
}

impl From<SessionInsertError> for AppError {
    fn from(_: SessionInsertError) -> Self {
        AppError::InternalServerError
    }
}

impl From<SessionGetError> for AppError {
    fn from(_: SessionGetError) -> Self {
        AppError::InternalServerError
    }
}

impl std::error::Error for AppError {}
