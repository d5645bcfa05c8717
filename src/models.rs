use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shared page: text content plus attached files, addressed by a short
/// identifier until it expires.
#[derive(Debug, Clone)]
pub struct Page {
    pub id: String,
    pub content: String,
    pub files: Vec<FileEntry>,
    pub expires_at: DateTime<Utc>,
}

/// A stored file referenced from a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub url: String,
    pub size: u64,
}
