use axum::extract::multipart::MultipartError;
use axum::http::{self, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[cfg(feature = "s3")]
use aws_sdk_s3 as s3;
#[cfg(feature = "s3")]
use s3::types::SdkError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    #[error("page has no content or files")]
    EmptyPage,
    #[error("not found")]
    NotFound,
    #[error("identifier collision")]
    IdCollision,
    #[error("insufficient storage")]
    InsufficientStorage,
    #[error("missing multipart file")]
    MissingFile,
    #[error("missing multipart file name")]
    MissingFileName,
    #[error("error reading multipart data")]
    Multipart {
        #[from]
        source: MultipartError,
    },
    #[error("http error")]
    Http {
        #[from]
        source: http::Error,
    },
    #[error("serialization error")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("database error")]
    Database { source: sqlx::Error },
    #[error("IO error")]
    Io { source: std::io::Error },
    #[error("storage backend error")]
    #[cfg(feature = "s3")]
    S3 {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::EmptyPage => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::IdCollision => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InsufficientStorage => StatusCode::INSUFFICIENT_STORAGE,
            ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::MissingFileName => StatusCode::BAD_REQUEST,
            ApiError::Multipart { .. } => StatusCode::BAD_REQUEST,
            ApiError::Http { .. } => StatusCode::BAD_REQUEST,
            ApiError::Json { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            #[cfg(feature = "s3")]
            ApiError::S3 { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // clients get the generic message, the cause stays in the log
        if status_code.is_server_error() {
            error!("request failed: {self:?}");
        }

        (status_code, Json(json!({ "error": format!("{self}") }))).into_response()
    }
}

#[cfg(feature = "s3")]
impl From<SdkError<s3::error::DeleteObjectError>> for ApiError {
    fn from(source: SdkError<s3::error::DeleteObjectError>) -> Self {
        ApiError::S3 {
            source: Box::new(source),
        }
    }
}

#[cfg(feature = "s3")]
impl From<SdkError<s3::error::GetObjectError>> for ApiError {
    fn from(source: SdkError<s3::error::GetObjectError>) -> Self {
        let error = source.into_service_error();
        match error.kind {
            s3::error::GetObjectErrorKind::NoSuchKey(_) => ApiError::NotFound,
            _ => ApiError::S3 {
                source: Box::new(error),
            },
        }
    }
}

#[cfg(feature = "s3")]
impl From<SdkError<s3::error::PutObjectError>> for ApiError {
    fn from(source: SdkError<s3::error::PutObjectError>) -> Self {
        ApiError::S3 {
            source: Box::new(source),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            _ => ApiError::Database { source },
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => ApiError::NotFound,
            std::io::ErrorKind::StorageFull => ApiError::InsufficientStorage,
            _ => ApiError::Io { source },
        }
    }
}
