use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories_next::ProjectDirs;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub port: u16,
    pub database: Database,
    pub storage: Storage,
    pub limits: Limits,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub kind: StorageKind,
    pub file: FileStorage,
    pub s3: Option<S3Storage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileStorage {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Storage {
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    S3,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_upload_size: usize,
    pub expiration_days: i64,
}

impl Config {
    /// Load configuration from an explicit path, `./config.toml`, or the
    /// platform config directory, in that order. Without any config file
    /// the defaults give a local sqlite + directory-storage setup.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        if let Some(path) = path {
            return Self::read(path);
        }

        for candidate in Self::search_paths() {
            if candidate.exists() {
                return Self::read(&candidate);
            }
        }

        Ok(Config::default())
    }

    fn read(path: &Path) -> anyhow::Result<Config> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];
        if let Some(dirs) = ProjectDirs::from("", "", "pagebin") {
            paths.push(dirs.config_dir().join("config.toml"));
        }
        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://localhost:3000".to_owned(),
            port: 3000,
            database: Database::default(),
            storage: Storage::default(),
            limits: Limits::default(),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Database {
            url: "sqlite://pagebin.db?mode=rwc".to_owned(),
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Storage {
            kind: StorageKind::File,
            file: FileStorage::default(),
            s3: None,
        }
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        FileStorage {
            dir: PathBuf::from("blobs"),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_upload_size: 25 * 1024 * 1024,
            expiration_days: 365,
        }
    }
}
