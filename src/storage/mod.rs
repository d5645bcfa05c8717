use axum::body::Bytes;
use chrono::Utc;

pub mod file;
#[cfg(feature = "s3")]
pub mod s3;

pub use file::FileStorage;
#[cfg(feature = "s3")]
pub use s3::S3Storage;

use crate::error::ApiResult;

pub trait Storage {
    /// Get an object by key.
    async fn get_object(&mut self, key: &str) -> ApiResult<Bytes>;

    /// Put an object's data by key.
    async fn put_object(&mut self, key: &str, data: Bytes) -> ApiResult<()>;

    /// Delete an object by key.
    async fn delete_object(&mut self, key: &str) -> ApiResult<()>;
}

#[derive(Clone)]
pub enum AnyStorage {
    File(FileStorage),
    #[cfg(feature = "s3")]
    S3(S3Storage),
}

impl Storage for AnyStorage {
    async fn get_object(&mut self, key: &str) -> ApiResult<Bytes> {
        match self {
            AnyStorage::File(file) => file.get_object(key).await,
            #[cfg(feature = "s3")]
            AnyStorage::S3(s3) => s3.get_object(key).await,
        }
    }

    async fn put_object(&mut self, key: &str, data: Bytes) -> ApiResult<()> {
        match self {
            AnyStorage::File(file) => file.put_object(key, data).await,
            #[cfg(feature = "s3")]
            AnyStorage::S3(s3) => s3.put_object(key, data).await,
        }
    }

    async fn delete_object(&mut self, key: &str) -> ApiResult<()> {
        match self {
            AnyStorage::File(file) => file.delete_object(key).await,
            #[cfg(feature = "s3")]
            AnyStorage::S3(s3) => s3.delete_object(key).await,
        }
    }
}

impl From<FileStorage> for AnyStorage {
    fn from(value: FileStorage) -> Self {
        AnyStorage::File(value)
    }
}

#[cfg(feature = "s3")]
impl From<S3Storage> for AnyStorage {
    fn from(value: S3Storage) -> Self {
        AnyStorage::S3(value)
    }
}

/// Build an object key for an uploaded file name. The millisecond prefix
/// keeps repeated uploads of the same name from colliding.
pub fn object_key(file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), sanitized)
}
