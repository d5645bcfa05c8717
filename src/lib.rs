//! pagebin: short-lived text and file sharing behind six-character links.

pub mod client;
pub mod commands;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod ids;
pub mod models;
pub mod storage;
pub mod types;

#[cfg(not(feature = "s3"))]
use anyhow::bail;

pub use config::Config;
pub use db::Database;
pub use error::{ApiError, ApiResult};

use config::StorageKind;
use storage::{AnyStorage, FileStorage};

/// Shared application state: configuration, database pool, blob store.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub database: Database,
    pub storage: AnyStorage,
}

impl App {
    /// Connect the database and the storage backend described by `config`.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let mut database = Database::connect(&config.database.url).await?;
        database.migrate().await?;

        let storage = match config.storage.kind {
            StorageKind::File => FileStorage::new(config.storage.file.dir.clone())
                .await?
                .into(),
            #[cfg(feature = "s3")]
            StorageKind::S3 => {
                let s3 = config
                    .storage
                    .s3
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("storage kind is s3 but [storage.s3] is missing"))?;
                storage::S3Storage::new(&s3.bucket, s3.region.as_deref(), s3.endpoint.as_deref())
                    .await
                    .into()
            }
            #[cfg(not(feature = "s3"))]
            StorageKind::S3 => bail!("built without the s3 feature"),
        };

        Ok(App {
            config,
            database,
            storage,
        })
    }
}
